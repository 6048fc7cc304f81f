//! Registration and login inputs.

use serde::{Deserialize, Serialize};
use sidesa_core::validation::rules::not_blank;
use utoipa::ToSchema;
use validator::Validate;

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserInput {
    #[validate(custom(function = "not_blank", message = "Nama wajib diisi"))]
    pub nama: String,

    #[validate(
        custom(function = "not_blank", message = "Email wajib diisi"),
        email(message = "Format email tidak valid")
    )]
    pub email: String,

    #[validate(custom(function = "not_blank", message = "Password wajib diisi"))]
    pub password: String,

    /// Must equal `password`.
    #[serde(rename = "password-Retype")]
    #[validate(custom(function = "not_blank", message = "Ulangi password wajib diisi"))]
    pub password_retype: String,

    #[validate(custom(function = "not_blank", message = "No HP wajib diisi"))]
    pub no_hp: String,

    /// `YYYY-MM-DD`, `DD-MM-YYYY` or `DD/MM/YYYY`.
    #[validate(custom(function = "not_blank", message = "Tanggal lahir wajib diisi"))]
    pub tanggal_lahir: String,
}

/// Login form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginInput {
    #[validate(
        custom(function = "not_blank", message = "Email wajib diisi"),
        email(message = "Format email tidak valid")
    )]
    pub email: String,

    #[validate(custom(function = "not_blank", message = "Password wajib diisi"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_input() -> RegisterUserInput {
        RegisterUserInput {
            nama: "Budi".to_string(),
            email: "budi@x.com".to_string(),
            password: "pw1".to_string(),
            password_retype: "pw1".to_string(),
            no_hp: "0811".to_string(),
            tanggal_lahir: "1990-01-01".to_string(),
        }
    }

    #[test]
    fn test_register_input_valid() {
        assert!(register_input().validate().is_ok());
    }

    #[test]
    fn test_register_input_requires_every_field() {
        let mut input = register_input();
        input.no_hp = "   ".to_string();
        assert!(input.validate().is_err());

        let mut input = register_input();
        input.password_retype = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_register_input_rejects_bad_email() {
        let mut input = register_input();
        input.email = "budi-at-x".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_register_input_wire_names() {
        let json = r#"{
            "nama": "Budi",
            "email": "budi@x.com",
            "password": "pw1",
            "password-Retype": "pw1",
            "no_hp": "0811",
            "tanggal_lahir": "1990-01-01"
        }"#;
        let input: RegisterUserInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.password_retype, "pw1");

        let back = serde_json::to_value(&input).unwrap();
        assert!(back.get("password-Retype").is_some());
    }

    #[test]
    fn test_login_input_validation() {
        let ok = LoginInput {
            email: "budi@x.com".to_string(),
            password: "pw1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = LoginInput {
            email: "budi@x.com".to_string(),
            password: String::new(),
        };
        assert!(blank.validate().is_err());
    }
}
