use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::ReviewConfig;
use crate::workflows::reviews::domain::{
    ContractorId, ContractorIdentity, ReviewId, ReviewRecord, ReviewStatus, SubjectId,
};
use crate::workflows::reviews::identity::Preferences;
use crate::workflows::reviews::repository::{RepositoryError, ReviewRepository};
use crate::workflows::reviews::{review_router, ReviewPresentationService};

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn project_review(id: &str, author: &str, ratings: &[(&str, Value)]) -> ReviewRecord {
    let mut record = blank_review(id, author, "project");
    record.homeowner_first_name = Some("Jordan".to_string());
    record.homeowner_last_name = Some("Mills".to_string());
    record.project_type = Some("Roofing".to_string());
    record.project_date = Some("2025-08-14".to_string());
    record.address = Some("12 Elm St".to_string());
    record.city = Some("Des Moines".to_string());
    record.state = Some("IA".to_string());
    record.zip = Some("50309".to_string());
    record.comments = Some("Paid on time, clear scope.".to_string());
    record.files = vec![
        "https://cdn.example/review-files/roof.jpg".to_string(),
        "https://cdn.example/review-files/invoice.pdf?token=abc".to_string(),
    ];
    with_ratings(record, ratings)
}

pub(super) fn social_review(id: &str, author: &str, ratings: &[(&str, Value)]) -> ReviewRecord {
    let mut record = blank_review(id, author, "social");
    record.social_name = Some("Riley".to_string());
    with_ratings(record, ratings)
}

fn blank_review(id: &str, author: &str, subject_type: &str) -> ReviewRecord {
    ReviewRecord {
        id: ReviewId(id.to_string()),
        subject_id: SubjectId("h-1".to_string()),
        subject_type: subject_type.to_string(),
        contractor_id: ContractorId(author.to_string()),
        status: ReviewStatus::Published,
        created_at: at(24, 10),
        homeowner_first_name: None,
        homeowner_last_name: None,
        social_name: None,
        project_type: None,
        project_date: None,
        address: None,
        city: None,
        state: None,
        zip: None,
        comments: None,
        files: Vec::new(),
        columns: BTreeMap::new(),
    }
}

fn with_ratings(mut record: ReviewRecord, ratings: &[(&str, Value)]) -> ReviewRecord {
    for (key, value) in ratings {
        record.columns.insert((*key).to_string(), value.clone());
    }
    record
}

pub(super) fn contractor(id: &str, name: &str) -> ContractorIdentity {
    ContractorIdentity {
        id: ContractorId(id.to_string()),
        display_name: Some(name.to_string()),
        first_name: None,
        last_name: None,
        business_name: None,
        avatar_uri: Some(format!("https://cdn.example/profile-images/{id}.jpg")),
    }
}

pub(super) fn visible(user_id: &str) -> Preferences {
    Preferences {
        hide_name: false,
        ..Preferences::default_for(user_id)
    }
}

pub(super) fn review_config() -> ReviewConfig {
    ReviewConfig {
        dashboard_limit: 2,
        ..ReviewConfig::default()
    }
}

pub(super) fn build_service() -> (
    ReviewPresentationService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ReviewPresentationService::new(repository.clone(), &review_config());
    (service, repository)
}

pub(super) fn review_router_with_service(
    service: ReviewPresentationService<MemoryRepository>,
) -> axum::Router {
    review_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) reviews: Arc<Mutex<Vec<ReviewRecord>>>,
    pub(super) contractors: Arc<Mutex<HashMap<ContractorId, ContractorIdentity>>>,
    pub(super) preferences: Arc<Mutex<HashMap<String, Preferences>>>,
}

impl MemoryRepository {
    pub(super) fn insert_review(&self, record: ReviewRecord) {
        self.reviews
            .lock()
            .expect("repository mutex poisoned")
            .push(record);
    }

    pub(super) fn insert_contractor(&self, identity: ContractorIdentity) {
        self.contractors
            .lock()
            .expect("repository mutex poisoned")
            .insert(identity.id.clone(), identity);
    }

    pub(super) fn insert_preferences(&self, preferences: Preferences) {
        self.preferences
            .lock()
            .expect("repository mutex poisoned")
            .insert(preferences.user_id.clone(), preferences);
    }

    pub(super) fn stored_preferences(&self, user_id: &str) -> Option<Preferences> {
        self.preferences
            .lock()
            .expect("repository mutex poisoned")
            .get(user_id)
            .cloned()
    }
}

impl ReviewRepository for MemoryRepository {
    fn reviews_for_subject(
        &self,
        subject: &SubjectId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let guard = self.reviews.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|review| &review.subject_id == subject)
            .cloned()
            .collect())
    }

    fn reviews_by_contractor(
        &self,
        contractor: &ContractorId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let guard = self.reviews.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|review| &review.contractor_id == contractor)
            .cloned()
            .collect())
    }

    fn fetch_review(&self, id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError> {
        let guard = self.reviews.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|review| &review.id == id).cloned())
    }

    fn update_review(&self, record: ReviewRecord) -> Result<(), RepositoryError> {
        let mut guard = self.reviews.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|review| review.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn contractor(&self, id: &ContractorId) -> Result<Option<ContractorIdentity>, RepositoryError> {
        let guard = self.contractors.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn preferences(&self, user_id: &str) -> Result<Option<Preferences>, RepositoryError> {
        Ok(self.stored_preferences(user_id))
    }

    fn upsert_preferences(&self, preferences: Preferences) -> Result<Preferences, RepositoryError> {
        self.insert_preferences(preferences.clone());
        Ok(preferences)
    }
}

pub(super) struct UnavailableRepository;

impl ReviewRepository for UnavailableRepository {
    fn reviews_for_subject(
        &self,
        _subject: &SubjectId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn reviews_by_contractor(
        &self,
        _contractor: &ContractorId,
    ) -> Result<Vec<ReviewRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_review(&self, _id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_review(&self, _record: ReviewRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn contractor(
        &self,
        _id: &ContractorId,
    ) -> Result<Option<ContractorIdentity>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn preferences(&self, _user_id: &str) -> Result<Option<Preferences>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_preferences(
        &self,
        _preferences: Preferences,
    ) -> Result<Preferences, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
