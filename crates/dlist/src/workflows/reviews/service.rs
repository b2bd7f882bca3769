use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::aggregate::{latest, ratings_as, AggregateScore, RatingAggregator, SubjectSummary};
use super::attachments::AttachmentView;
use super::domain::{non_blank, ContractorId, ReviewEdit, ReviewId, ReviewRecord, SubjectId};
use super::editing::{apply_edit, ReviewEditError};
use super::identity::{mask, Identity, Preferences, PreferencesPatch};
use super::normalizer::normalize;
use super::repository::{RepositoryError, ReviewRepository};
use super::schema::SubjectType;
use super::views::{
    score_display, DashboardRow, DashboardView, RatingEntry, ReviewDetailView, ReviewDetailsPage,
    SubjectHeaderView, SubjectSummaryView, DEFAULT_PROFILE_PICTURE, NOT_APPLICABLE,
    SOCIAL_FALLBACK_NAME,
};
use crate::config::ReviewConfig;

/// Service composing the repository, identity mask, and rating aggregator.
pub struct ReviewPresentationService<R> {
    repository: Arc<R>,
    aggregator: RatingAggregator,
    dashboard_limit: usize,
}

impl<R> ReviewPresentationService<R>
where
    R: ReviewRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: &ReviewConfig) -> Self {
        Self {
            repository,
            aggregator: RatingAggregator::new(config.unknown_subject),
            dashboard_limit: config.dashboard_limit.max(1),
        }
    }

    pub fn aggregator(&self) -> &RatingAggregator {
        &self.aggregator
    }

    /// Every published review of a subject, attributed and scored.
    pub fn review_details(
        &self,
        subject_id: &SubjectId,
    ) -> Result<ReviewDetailsPage, ReviewServiceError> {
        let reviews: Vec<ReviewRecord> = self
            .repository
            .reviews_for_subject(subject_id)?
            .into_iter()
            .filter(ReviewRecord::is_published)
            .collect();

        let authors: BTreeSet<&ContractorId> =
            reviews.iter().map(|review| &review.contractor_id).collect();
        let mut identities: HashMap<&ContractorId, (Identity, bool)> = HashMap::new();
        for author in authors {
            let identity = self
                .repository
                .contractor(author)?
                .as_ref()
                .map(Identity::from)
                .unwrap_or_default();
            let stored = self.repository.preferences(&author.0)?;
            let preferences = Preferences::effective(&author.0, stored);
            identities.insert(author, (identity, preferences.hide_name));
        }

        let mut pooled = Vec::with_capacity(reviews.len());
        let mut views = Vec::with_capacity(reviews.len());
        for review in &reviews {
            let (identity, hide_name) = identities
                .get(&review.contractor_id)
                .cloned()
                .unwrap_or_default();
            let scored = self.score(review);
            views.push(self.detail_view(review, &scored, &identity, hide_name));
            pooled.push(scored.ratings);
        }

        let summary: SubjectSummaryView = SubjectSummary::pooled(pooled).into();
        debug!(subject = %subject_id, reviews = reviews.len(), "built review details");

        Ok(ReviewDetailsPage {
            subject: reviews.first().map(|review| self.subject_header(review)),
            summary,
            reviews: views,
        })
    }

    /// Latest published reviews authored by a contractor, with the pooled score over them.
    pub fn dashboard(
        &self,
        contractor_id: &ContractorId,
    ) -> Result<DashboardView, ReviewServiceError> {
        let reviews: Vec<ReviewRecord> = self
            .repository
            .reviews_by_contractor(contractor_id)?
            .into_iter()
            .filter(ReviewRecord::is_published)
            .collect();

        let recent = latest(&reviews, self.dashboard_limit);
        let mut pooled = Vec::with_capacity(recent.len());
        let mut latest_reviews = Vec::with_capacity(recent.len());
        for review in recent {
            let scored = self.score(review);
            latest_reviews.push(self.dashboard_row(review, &scored));
            pooled.push(scored.ratings);
        }
        let summary: SubjectSummaryView = SubjectSummary::pooled(pooled).into();

        Ok(DashboardView {
            contractor_id: contractor_id.clone(),
            summary,
            latest_reviews,
        })
    }

    /// Apply an edit on behalf of `author`; only the original author may edit.
    pub fn edit_review(
        &self,
        review_id: &ReviewId,
        author: &ContractorId,
        edit: ReviewEdit,
    ) -> Result<ReviewRecord, ReviewServiceError> {
        let mut record = self
            .repository
            .fetch_review(review_id)?
            .ok_or_else(|| ReviewServiceError::ReviewNotFound(review_id.clone()))?;

        apply_edit(&mut record, author, edit)?;
        self.repository.update_review(record.clone())?;

        info!(review = %review_id, author = %author, "review updated by author");
        Ok(record)
    }

    pub fn preferences(&self, user_id: &str) -> Result<Preferences, ReviewServiceError> {
        let stored = self.repository.preferences(user_id)?;
        Ok(Preferences::effective(user_id, stored))
    }

    pub fn update_preferences(
        &self,
        user_id: &str,
        patch: PreferencesPatch,
    ) -> Result<Preferences, ReviewServiceError> {
        let mut preferences = self.preferences(user_id)?;
        preferences.apply(&patch, Utc::now());
        let stored = self.repository.upsert_preferences(preferences)?;
        info!(
            user_id,
            hide_name = stored.hide_name,
            allow_push = stored.allow_push,
            "preferences updated"
        );
        Ok(stored)
    }

    /// First-run provisioning: persist the default row when none exists yet.
    pub fn provision_preferences(&self, user_id: &str) -> Result<Preferences, ReviewServiceError> {
        if let Some(existing) = self.repository.preferences(user_id)? {
            return Ok(existing);
        }

        let stored = self
            .repository
            .upsert_preferences(Preferences::default_for(user_id))?;
        info!(user_id, "default preferences provisioned");
        Ok(stored)
    }

    /// Resolves the category set once per review so unknown tags are logged once.
    fn score(&self, review: &ReviewRecord) -> ScoredReview {
        let subject_type = self
            .aggregator
            .policy()
            .resolve(&review.id.0, &review.subject_type);
        let ratings = subject_type
            .map(|subject_type| ratings_as(review, subject_type))
            .unwrap_or_default();
        ScoredReview {
            subject_type,
            ratings,
        }
    }

    fn detail_view(
        &self,
        review: &ReviewRecord,
        scored: &ScoredReview,
        identity: &Identity,
        hide_name: bool,
    ) -> ReviewDetailView {
        ReviewDetailView {
            review_id: review.id.clone(),
            contractor_id: review.contractor_id.clone(),
            subject_type: scored.subject_type,
            score: score_display(AggregateScore::from_values(&scored.ratings)),
            ratings: rating_entries(review, scored.subject_type),
            display_identity: mask(identity, Some(hide_name)),
            comments: non_blank(review.comments.as_deref()).map(str::to_string),
            attachments: review
                .files
                .iter()
                .map(|uri| AttachmentView::from_uri(uri))
                .collect(),
            created_at: review.created_at,
        }
    }

    fn subject_header(&self, review: &ReviewRecord) -> SubjectHeaderView {
        let social = self.is_social(review);
        let (first_name, last_name) = subject_names(review, social);
        let name = [first_name, last_name]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        SubjectHeaderView {
            subject_id: review.subject_id.clone(),
            name,
            project_type: project_field(social, review.project_type.as_deref()),
            project_date: project_field(social, review.project_date.as_deref()),
            address: project_field(social, review.address.as_deref()),
            city: project_field(social, review.city.as_deref()),
            state: project_field(social, review.state.as_deref()),
            zip: project_field(social, review.zip.as_deref()),
        }
    }

    fn dashboard_row(&self, review: &ReviewRecord, scored: &ScoredReview) -> DashboardRow {
        let social = self.is_social(review);
        let (first_name, last_name) = subject_names(review, social);
        let profile_picture = review
            .column("profile_picture")
            .and_then(|value| value.as_str())
            .and_then(|value| non_blank(Some(value)))
            .unwrap_or(DEFAULT_PROFILE_PICTURE)
            .to_string();

        DashboardRow {
            review_id: review.id.clone(),
            subject_id: review.subject_id.clone(),
            is_social: social,
            first_name,
            last_name,
            project_type: project_field(social, review.project_type.as_deref()),
            project_date: project_field(social, review.project_date.as_deref()),
            address: project_field(social, review.address.as_deref()),
            zip: project_field(social, review.zip.as_deref()),
            comments: review.comments.clone().unwrap_or_default(),
            score: score_display(AggregateScore::from_values(&scored.ratings)),
            ratings: rating_entries(review, scored.subject_type),
            profile_picture,
            created_at: review.created_at,
        }
    }

    fn is_social(&self, review: &ReviewRecord) -> bool {
        review.subject_type() == Ok(SubjectType::Social)
    }
}

struct ScoredReview {
    subject_type: Option<SubjectType>,
    ratings: Vec<f64>,
}

fn rating_entries(review: &ReviewRecord, subject_type: Option<SubjectType>) -> Vec<RatingEntry> {
    let Some(subject_type) = subject_type else {
        return Vec::new();
    };

    subject_type
        .categories()
        .iter()
        .map(|category| RatingEntry {
            key: category.key,
            label: category.label,
            value: normalize(review.column(category.key)),
        })
        .collect()
}

fn subject_names(review: &ReviewRecord, social: bool) -> (String, String) {
    if social {
        let name = non_blank(review.social_name.as_deref()).unwrap_or(SOCIAL_FALLBACK_NAME);
        return (name.to_string(), String::new());
    }

    let first = non_blank(review.homeowner_first_name.as_deref()).unwrap_or(NOT_APPLICABLE);
    let last = non_blank(review.homeowner_last_name.as_deref()).unwrap_or_default();
    (first.to_string(), last.to_string())
}

/// Social reviews never carry project or location fields.
fn project_field(social: bool, value: Option<&str>) -> String {
    if social {
        return NOT_APPLICABLE.to_string();
    }
    non_blank(value).unwrap_or(NOT_APPLICABLE).to_string()
}

/// Error raised by the review presentation service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error("review {0} not found")]
    ReviewNotFound(ReviewId),
    #[error(transparent)]
    Edit(#[from] ReviewEditError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
