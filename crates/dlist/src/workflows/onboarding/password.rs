use serde::Serialize;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MIN_PASSWORD_LENGTH: usize = 12;

const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    pub const fn from_score(score: u8) -> Self {
        match score {
            0..=2 => Self::Weak,
            3 | 4 => Self::Medium,
            _ => Self::Strong,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }
}

/// Live strength meter shown while a password is typed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub percent: f64,
    pub level: StrengthLevel,
    pub long_enough: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PasswordStrength {
    pub fn evaluate(password: &str) -> Self {
        let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
        let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(is_special);

        let score = [long_enough, has_uppercase, has_lowercase, has_digit, has_special]
            .into_iter()
            .filter(|passed| *passed)
            .count() as u8;

        Self {
            score,
            percent: f64::from(score) * 100.0 / f64::from(MAX_SCORE),
            level: StrengthLevel::from_score(score),
            long_enough,
            has_uppercase,
            has_lowercase,
            has_digit,
            has_special,
        }
    }

    pub fn all_rules_passed(&self) -> bool {
        self.score == MAX_SCORE
    }
}

/// Registration policy: every strength rule, and nothing outside letters, digits and
/// the special set.
pub fn meets_policy(password: &str) -> bool {
    PasswordStrength::evaluate(password).all_rules_passed()
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || is_special(c))
}

fn is_special(c: char) -> bool {
    SPECIAL_CHARACTERS.contains(c)
}
