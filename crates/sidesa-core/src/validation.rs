//! Validation utilities.

use crate::SidesaError;
use tracing::debug;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and replaces field-level details with a single
    /// user-facing message.
    ///
    /// The field-level details are still logged at debug level.
    fn validate_form(&self, message: &str) -> Result<(), SidesaError> {
        self.validate().map_err(|errors| {
            debug!("Form validation failed: {}", describe_validation_errors(&errors));
            SidesaError::Validation(message.to_string())
        })
    }
}

impl<T: Validate> ValidateExt for T {}

/// Renders validation errors as `field: message` pairs joined by `; `.
///
/// Fields are sorted so the output is stable.
#[must_use]
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut pairs: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{}: {}", field, message)
            })
        })
        .collect();
    pairs.sort();
    pairs.join("; ")
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct Form {
        #[validate(custom(function = "not_blank", message = "required"))]
        name: String,
        #[validate(email(message = "invalid email"))]
        email: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_describe_validation_errors_sorts_fields() {
        let form = Form {
            name: " ".to_string(),
            email: "nope".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            describe_validation_errors(&errors),
            "email: invalid email; name: required"
        );
    }

    #[test]
    fn test_validate_form_uses_single_message() {
        let form = Form {
            name: String::new(),
            email: "a@b.com".to_string(),
        };
        let err = form.validate_form("isi form dengan benar!").unwrap_err();
        assert!(matches!(err, SidesaError::Validation(ref m) if m == "isi form dengan benar!"));
    }

    #[test]
    fn test_valid_form_passes() {
        let form = Form {
            name: "Budi".to_string(),
            email: "budi@x.com".to_string(),
        };
        assert!(form.validate_form("unused").is_ok());
    }
}
