//! Service name validation
//!
//! Catalog names are human-readable ("Vaccination", "Dental Cleaning").
//! Surrounding whitespace is stripped once here so every code path compares
//! the same canonical form; matching stays case-sensitive.

use super::ValidationError;

/// Maximum length for service names
const MAX_SERVICE_NAME_LEN: usize = 100;

/// Validated, trimmed service name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    /// Create a new service name.
    ///
    /// # Rules
    /// - Surrounding whitespace is trimmed
    /// - Must be non-empty after trimming
    /// - Max 100 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "service name",
            });
        }

        if trimmed.len() > MAX_SERVICE_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "service name",
                max: MAX_SERVICE_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
