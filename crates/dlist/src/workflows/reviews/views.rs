use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregate::{AggregateScore, SubjectSummary};
use super::attachments::AttachmentView;
use super::domain::{ContractorId, ReviewId, SubjectId};
use super::identity::DisplayIdentity;
use super::schema::SubjectType;

pub const NOT_APPLICABLE: &str = "N/A";
pub const SOCIAL_FALLBACK_NAME: &str = "Social User";
pub const DEFAULT_PROFILE_PICTURE: &str = "assets/default-user.png";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectSummaryView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    pub review_count: usize,
}

impl From<SubjectSummary> for SubjectSummaryView {
    fn from(summary: SubjectSummary) -> Self {
        Self {
            overall_score: summary.display_score(),
            review_count: summary.review_count,
        }
    }
}

/// One category's value as shown on a review card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingEntry {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDetailView {
    pub review_id: ReviewId,
    pub contractor_id: ContractorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<SubjectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub ratings: Vec<RatingEntry>,
    pub display_identity: DisplayIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub attachments: Vec<AttachmentView>,
    pub created_at: DateTime<Utc>,
}

/// Homeowner/individual fields shown at the top of the review-details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectHeaderView {
    pub subject_id: SubjectId,
    pub name: String,
    pub project_type: String,
    pub project_date: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDetailsPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectHeaderView>,
    pub summary: SubjectSummaryView,
    pub reviews: Vec<ReviewDetailView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub review_id: ReviewId,
    pub subject_id: SubjectId,
    pub is_social: bool,
    pub first_name: String,
    pub last_name: String,
    pub project_type: String,
    pub project_date: String,
    pub address: String,
    pub zip: String,
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub ratings: Vec<RatingEntry>,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub contractor_id: ContractorId,
    pub summary: SubjectSummaryView,
    pub latest_reviews: Vec<DashboardRow>,
}

pub(crate) fn score_display(score: Option<AggregateScore>) -> Option<f64> {
    score.map(|score| score.display)
}
