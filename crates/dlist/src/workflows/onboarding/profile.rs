use serde::{Deserialize, Serialize};

const PHONE_DIGITS: usize = 10;
const ZIP_DIGITS: usize = 5;

/// Contractor business profile as edited on the profile page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub trade: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Profile ready to persist; the phone number is stored as bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedProfile {
    pub business_name: String,
    pub trade: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub phone_display: String,
    pub zip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Please fill {field}")]
    MissingField { field: &'static str },
    #[error("Please enter a valid 10-digit US phone number")]
    InvalidPhone,
    #[error("Please enter a valid 5-digit ZIP code")]
    InvalidZip,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ValidatedProfile, ProfileError> {
        let required = [
            ("business name", &self.business_name),
            ("trade", &self.trade),
            ("city", &self.city),
            ("state", &self.state),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ProfileError::MissingField { field });
            }
        }

        let phone = digits(&self.phone);
        if phone.len() != PHONE_DIGITS {
            return Err(ProfileError::InvalidPhone);
        }

        let zip = self.zip.trim();
        if zip.len() != ZIP_DIGITS || !zip.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProfileError::InvalidZip);
        }

        Ok(ValidatedProfile {
            business_name: self.business_name.trim().to_string(),
            trade: self.trade.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            phone_display: format_phone(&phone),
            phone,
            zip: zip.to_string(),
            bio: self
                .bio
                .as_deref()
                .map(str::trim)
                .filter(|bio| !bio.is_empty())
                .map(str::to_string),
        })
    }
}

/// `(AAA) BBB-CCCC` for a ten-digit number; anything else comes back as its digits.
pub fn format_phone(phone: &str) -> String {
    let digits = digits(phone);
    if digits.len() != PHONE_DIGITS {
        return digits;
    }
    format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
}

/// Formatting applied while a number is being typed, capped at ten digits.
pub fn format_phone_input(input: &str) -> String {
    let mut digits = digits(input);
    digits.truncate(PHONE_DIGITS);

    match digits.len() {
        6.. => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        3.. => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => digits,
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            business_name: "Reyes Roofing".to_string(),
            trade: "Roofing".to_string(),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            phone: "(515) 555-0142".to_string(),
            zip: "50309".to_string(),
            bio: Some("  ".to_string()),
        }
    }

    #[test]
    fn stores_phone_as_digits() {
        let profile = form().validate().expect("valid profile");
        assert_eq!(profile.phone, "5155550142");
        assert_eq!(profile.phone_display, "(515) 555-0142");
        assert_eq!(profile.bio, None);
    }

    #[test]
    fn reports_missing_fields_in_order() {
        let mut form = form();
        form.city.clear();
        form.business_name = " ".to_string();
        let err = form.validate().expect_err("missing fields");
        assert_eq!(err.to_string(), "Please fill business name");
    }

    #[test]
    fn rejects_bad_phone_and_zip() {
        let mut form = form();
        form.phone = "555-0142".to_string();
        assert_eq!(form.validate(), Err(ProfileError::InvalidPhone));

        form.phone = "+1 515 555 0142".to_string();
        assert_eq!(form.validate(), Err(ProfileError::InvalidPhone));

        form.phone = "515.555.0142".to_string();
        form.zip = "5030".to_string();
        assert_eq!(form.validate(), Err(ProfileError::InvalidZip));

        form.zip = "5030a".to_string();
        assert_eq!(form.validate(), Err(ProfileError::InvalidZip));
    }

    #[test]
    fn formats_phone_numbers() {
        assert_eq!(format_phone("5155550142"), "(515) 555-0142");
        assert_eq!(format_phone("555-0142"), "5550142");

        assert_eq!(format_phone_input("51"), "51");
        assert_eq!(format_phone_input("515"), "(515) ");
        assert_eq!(format_phone_input("51555"), "(515) 55");
        assert_eq!(format_phone_input("515555"), "(515) 555-");
        assert_eq!(format_phone_input("515-555-0142 ext 9"), "(515) 555-0142");
    }
}
