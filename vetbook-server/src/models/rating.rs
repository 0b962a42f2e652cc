//! Review rating bounds

use super::ValidationError;

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;

/// Validated review rating (1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(i32);

impl Rating {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                min: MIN_RATING as i64,
                max: MAX_RATING as i64,
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(Rating::new(1).unwrap().value(), 1);
        assert_eq!(Rating::new(5).unwrap().value(), 5);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            Rating::new(0).unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));
        assert!(matches!(
            Rating::new(6).unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));
    }
}
