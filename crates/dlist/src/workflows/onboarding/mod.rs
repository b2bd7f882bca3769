//! Sign-up and contractor profile form validation.

pub mod password;
pub mod profile;
pub mod registration;
pub mod router;

pub use password::{meets_policy, PasswordStrength, StrengthLevel, SPECIAL_CHARACTERS};
pub use profile::{format_phone, format_phone_input, ProfileError, ProfileForm, ValidatedProfile};
pub use registration::{RegistrationError, RegistrationForm, ValidatedRegistration};
pub use router::onboarding_router;
