//! User roles

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Role of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Service provider
    Vet,
    /// Consumer booking appointments
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vet => "vet",
            Self::Client => "client",
        }
    }

    /// Parse a role from its database/API representation.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "vet" => Ok(Self::Vet),
            "client" => Ok(Self::Client),
            other => Err(ValidationError::InvalidVariant {
                field: "role",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        assert_eq!(UserRole::parse("vet").unwrap(), UserRole::Vet);
        assert_eq!(UserRole::parse("client").unwrap(), UserRole::Client);
        assert_eq!(UserRole::Vet.as_str(), "vet");
    }

    #[test]
    fn rejects_unknown_role() {
        let err = UserRole::parse("admin").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }
}
