//! Bridge between `validator` derive checks and [`CoreError`].

use validator::Validate;

use crate::error::CoreError;

/// Run the declarative checks on a DTO, converting failures into
/// [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5, message = "name must be 1-5 characters"))]
        name: String,
    }

    #[test]
    fn test_valid_input_passes() {
        let sample = Sample {
            name: "ok".to_string(),
        };
        assert!(validate_input(&sample).is_ok());
    }

    #[test]
    fn test_invalid_input_becomes_validation_error() {
        let sample = Sample {
            name: "far too long".to_string(),
        };
        let err = validate_input(&sample).unwrap_err();
        assert_matches!(&err, CoreError::Validation(msg) if msg.contains("name"));
    }
}
