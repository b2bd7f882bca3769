//! Rating aggregation and review presentation.
//!
//! Raw review rows are normalized per category, pooled into subject summaries, and
//! rendered with each author's identity masked according to their stored preferences.

pub mod aggregate;
pub mod attachments;
pub mod domain;
pub(crate) mod editing;
pub mod identity;
pub mod import;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use aggregate::{latest, round_for_display, AggregateScore, RatingAggregator, SubjectSummary};
pub use attachments::{AttachmentKind, AttachmentView};
pub use domain::{
    ContractorId, ContractorIdentity, ReviewEdit, ReviewId, ReviewRecord, ReviewStatus, SubjectId,
};
pub use editing::ReviewEditError;
pub use identity::{
    mask, DisplayIdentity, Identity, Preferences, PreferencesPatch, ANONYMOUS_AVATAR,
    ANONYMOUS_NAME,
};
pub use import::{ExportFormat, ReviewExport, ReviewExportImporter, ReviewImportError};
pub use normalizer::{normalize, try_normalize, InvalidRatingValue};
pub use repository::{RepositoryError, ReviewRepository};
pub use router::{review_router, ReviewEditRequest};
pub use schema::{
    RatingCategory, SubjectType, UnknownSubjectPolicy, UnknownSubjectType, SOCIAL_CATEGORIES,
    STANDARD_CATEGORIES,
};
pub use service::{ReviewPresentationService, ReviewServiceError};
pub use views::{
    DashboardRow, DashboardView, RatingEntry, ReviewDetailView, ReviewDetailsPage,
    SubjectHeaderView, SubjectSummaryView,
};
