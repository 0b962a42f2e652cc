//! Appointment status lifecycle

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Parse a status from its database/API representation.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            other => Err(ValidationError::InvalidVariant {
                field: "status",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_statuses() {
        for s in ["pending", "confirmed", "completed", "canceled"] {
            assert_eq!(AppointmentStatus::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let err = AppointmentStatus::parse("cancelled").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }
}
