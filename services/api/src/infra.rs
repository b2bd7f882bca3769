use dlist::error::AppError;
use dlist::workflows::reviews::{
    ContractorId, ContractorIdentity, Preferences, RepositoryError, ReviewExport,
    ReviewExportImporter, ReviewId, ReviewRecord, ReviewRepository, SubjectId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local review store standing in for the managed backend.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewRepository {
    reviews: Arc<Mutex<Vec<ReviewRecord>>>,
    contractors: Arc<Mutex<HashMap<ContractorId, ContractorIdentity>>>,
    preferences: Arc<Mutex<HashMap<String, Preferences>>>,
}

impl InMemoryReviewRepository {
    pub(crate) fn from_export(export: ReviewExport) -> Self {
        let repository = Self::default();
        let ReviewExport {
            reviews,
            contractors,
            preferences,
        } = export;

        repository
            .reviews
            .lock()
            .expect("repository mutex poisoned")
            .extend(reviews);
        repository
            .contractors
            .lock()
            .expect("repository mutex poisoned")
            .extend(contractors.into_iter().map(|c| (c.id.clone(), c)));
        repository
            .preferences
            .lock()
            .expect("repository mutex poisoned")
            .extend(preferences.into_iter().map(|p| (p.user_id.clone(), p)));
        repository
    }

    pub(crate) fn review_count(&self) -> usize {
        self.reviews.lock().expect("repository mutex poisoned").len()
    }
}

impl ReviewRepository for InMemoryReviewRepository {
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
        match guard.iter_mut().find(|review| review.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn contractor(&self, id: &ContractorId) -> Result<Option<ContractorIdentity>, RepositoryError> {
        let guard = self.contractors.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn preferences(&self, user_id: &str) -> Result<Option<Preferences>, RepositoryError> {
        let guard = self.preferences.lock().expect("repository mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn upsert_preferences(&self, preferences: Preferences) -> Result<Preferences, RepositoryError> {
        let mut guard = self.preferences.lock().expect("repository mutex poisoned");
        guard.insert(preferences.user_id.clone(), preferences.clone());
        Ok(preferences)
    }
}

/// Load an export into a fresh in-memory store.
pub(crate) fn load_seed(path: &Path) -> Result<InMemoryReviewRepository, AppError> {
    let export = ReviewExportImporter::from_path(path)?;
    let repository = InMemoryReviewRepository::from_export(export);
    info!(
        path = %path.display(),
        reviews = repository.review_count(),
        "seeded review store"
    );
    Ok(repository)
}
