use serde_json::Value;

use super::domain::{ContractorId, ReviewEdit, ReviewId, ReviewRecord};
use super::schema::SubjectType;

/// Star ratings are whole numbers; zero means the category was left unrated.
pub const MAX_STARS: u8 = 5;

/// Validation errors raised while applying an author's edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewEditError {
    #[error("review {review_id} can only be edited by its author")]
    NotAuthor { review_id: ReviewId },
    #[error("rating field '{key}' does not belong to {subject_type} reviews")]
    UnexpectedRatingField {
        key: String,
        subject_type: SubjectType,
    },
    #[error("rating field '{key}' must be between 0 and 5 (found {value})")]
    RatingOutOfRange { key: String, value: u8 },
}

/// Apply `edit` to `record` in place, enforcing authorship and the category set.
pub fn apply_edit(
    record: &mut ReviewRecord,
    author: &ContractorId,
    edit: ReviewEdit,
) -> Result<(), ReviewEditError> {
    if &record.contractor_id != author {
        return Err(ReviewEditError::NotAuthor {
            review_id: record.id.clone(),
        });
    }

    let subject_type = edit.subject_type;
    for (key, value) in &edit.ratings {
        if !subject_type.owns_field(key) {
            return Err(ReviewEditError::UnexpectedRatingField {
                key: key.clone(),
                subject_type,
            });
        }
        if *value > MAX_STARS {
            return Err(ReviewEditError::RatingOutOfRange {
                key: key.clone(),
                value: *value,
            });
        }
    }

    for other in SubjectType::ordered() {
        if other != subject_type {
            for key in other.field_keys() {
                record.columns.remove(key);
            }
        }
    }
    for key in subject_type.field_keys() {
        let stars = edit.ratings.get(key).copied().unwrap_or(0);
        record.columns.insert(key.to_string(), Value::from(stars));
    }

    record.subject_type = match subject_type {
        SubjectType::Standard => "project".to_string(),
        SubjectType::Social => "social".to_string(),
    };
    record.homeowner_first_name = edit.homeowner_first_name;
    record.homeowner_last_name = edit.homeowner_last_name;
    record.social_name = edit.social_name;
    record.comments = edit.comments;

    if subject_type == SubjectType::Social {
        record.project_type = None;
        record.project_date = None;
        record.address = None;
        record.city = None;
        record.state = None;
        record.zip = None;
    } else {
        record.project_type = edit.project_type;
        record.project_date = edit.project_date;
        record.address = edit.address;
        record.city = edit.city;
        record.state = edit.state;
        record.zip = edit.zip;
    }

    record
        .files
        .retain(|uri| !edit.removed_files.iter().any(|removed| removed == uri));
    for uri in edit.added_files {
        if !record.files.contains(&uri) {
            record.files.push(uri);
        }
    }

    Ok(())
}
