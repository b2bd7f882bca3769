use super::domain::{ContractorId, ContractorIdentity, ReviewId, ReviewRecord, SubjectId};
use super::identity::Preferences;

/// Storage abstraction over the managed backend so the service can be exercised in isolation.
pub trait ReviewRepository: Send + Sync {
    fn reviews_for_subject(
        &self,
        subject: &SubjectId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError>;
    fn reviews_by_contractor(
        &self,
        contractor: &ContractorId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError>;
    fn fetch_review(&self, id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError>;
    fn update_review(&self, record: ReviewRecord) -> Result<(), RepositoryError>;
    fn contractor(&self, id: &ContractorId) -> Result<Option<ContractorIdentity>, RepositoryError>;
    fn preferences(&self, user_id: &str) -> Result<Option<Preferences>, RepositoryError>;
    fn upsert_preferences(&self, preferences: Preferences) -> Result<Preferences, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
