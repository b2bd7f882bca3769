use serde::{Deserialize, Serialize};
use tracing::debug;

use super::password::meets_policy;

/// Sign-up form as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub accept_terms: bool,
}

/// Registration data that passed validation, trimmed and ready for account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// First failing registration rule, carrying the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error(
        "Password must be at least 12 characters long and include uppercase, lowercase, number, and special character."
    )]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("First name is required.")]
    MissingFirstName,
    #[error("Last name is required.")]
    MissingLastName,
    #[error("Email is required.")]
    MissingEmail,
    #[error("Please accept the terms and conditions.")]
    TermsNotAccepted,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<ValidatedRegistration, RegistrationError> {
        let result = self.check();
        if let Err(err) = &result {
            debug!(reason = ?err, "registration rejected");
        }
        result
    }

    fn check(&self) -> Result<ValidatedRegistration, RegistrationError> {
        if !meets_policy(&self.password) {
            return Err(RegistrationError::WeakPassword);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        let first_name = required(&self.first_name).ok_or(RegistrationError::MissingFirstName)?;
        let last_name = required(&self.last_name).ok_or(RegistrationError::MissingLastName)?;
        let email = required(&self.email).ok_or(RegistrationError::MissingEmail)?;

        if !self.accept_terms {
            return Err(RegistrationError::TermsNotAccepted);
        }

        Ok(ValidatedRegistration {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        })
    }
}

fn required(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: " Dana ".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@reyesroofing.example".to_string(),
            password: "Roofline#2025x".to_string(),
            confirm_password: "Roofline#2025x".to_string(),
            accept_terms: true,
        }
    }

    #[test]
    fn valid_form_is_trimmed() {
        let registration = form().validate().expect("valid");
        assert_eq!(registration.first_name, "Dana");
        assert_eq!(registration.email, "dana@reyesroofing.example");
    }

    #[test]
    fn password_rules_are_checked_before_names() {
        let mut form = form();
        form.password = "short".to_string();
        form.first_name.clear();
        assert_eq!(form.validate(), Err(RegistrationError::WeakPassword));

        form.password = "Roofline#2025y".to_string();
        assert_eq!(form.validate(), Err(RegistrationError::PasswordMismatch));
    }

    #[test]
    fn reports_first_missing_field() {
        let mut form = form();
        form.last_name = "   ".to_string();
        form.accept_terms = false;
        assert_eq!(form.validate(), Err(RegistrationError::MissingLastName));
        assert_eq!(
            RegistrationError::MissingLastName.to_string(),
            "Last name is required."
        );

        form.last_name = "Reyes".to_string();
        assert_eq!(form.validate(), Err(RegistrationError::TermsNotAccepted));

        form.email.clear();
        assert_eq!(form.validate(), Err(RegistrationError::MissingEmail));
    }
}
