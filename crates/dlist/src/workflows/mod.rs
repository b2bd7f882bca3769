pub mod onboarding;
pub mod reviews;
