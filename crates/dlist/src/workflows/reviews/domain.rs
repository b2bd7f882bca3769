use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attachments::deserialize_uris;
use super::schema::SubjectType;

/// Identifier wrapper for stored reviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewId(pub String);

/// Identifier of the contractor who authored a review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractorId(pub String);

/// Identifier of the homeowner or individual a review is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

macro_rules! display_id {
    ($($name:ident),+) => {
        $(impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })+
    };
}

display_id!(ReviewId, ContractorId, SubjectId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Published,
    Pending,
    Removed,
    #[serde(other)]
    Unknown,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Published => "Published",
            Self::Pending => "Pending",
            Self::Removed => "Removed",
            Self::Unknown => "Unknown",
        }
    }
}

/// A review row as the backend stores it.
///
/// Rating columns stay as raw JSON values in `columns`; only the normalizer decides
/// what counts as a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub subject_type: String,
    pub contractor_id: ContractorId,
    #[serde(default)]
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub homeowner_first_name: Option<String>,
    #[serde(default)]
    pub homeowner_last_name: Option<String>,
    #[serde(default)]
    pub social_name: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub project_date: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "deserialize_uris")]
    pub files: Vec<String>,
    #[serde(flatten)]
    pub columns: BTreeMap<String, Value>,
}

impl ReviewRecord {
    pub fn column(&self, key: &str) -> Option<&Value> {
        self.columns.get(key)
    }

    /// Raw values for every category of the given set, in category order.
    pub fn category_values(&self, subject_type: SubjectType) -> [Option<&Value>; 5] {
        let categories = subject_type.categories();
        std::array::from_fn(|index| self.column(categories[index].key))
    }

    pub fn is_published(&self) -> bool {
        self.status == ReviewStatus::Published
    }

    pub fn subject_type(&self) -> Result<SubjectType, super::schema::UnknownSubjectType> {
        SubjectType::parse(&self.subject_type)
    }
}

/// Edit submitted by a review's author; replaces the editable fields wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEdit {
    pub subject_type: SubjectType,
    #[serde(default)]
    pub homeowner_first_name: Option<String>,
    #[serde(default)]
    pub homeowner_last_name: Option<String>,
    #[serde(default)]
    pub social_name: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub project_date: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub ratings: BTreeMap<String, u8>,
    #[serde(default)]
    pub removed_files: Vec<String>,
    #[serde(default)]
    pub added_files: Vec<String>,
}

/// Contractor identity as looked up for review attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorIdentity {
    pub id: ContractorId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default, alias = "profile_image_url")]
    pub avatar_uri: Option<String>,
}

impl ContractorIdentity {
    /// Preferred display name: explicit display name, then full name, then business name.
    pub fn resolved_name(&self) -> Option<String> {
        if let Some(name) = non_blank(self.display_name.as_deref()) {
            return Some(name.to_string());
        }

        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .filter_map(non_blank)
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.is_empty() {
            return Some(full_name);
        }

        non_blank(self.business_name.as_deref()).map(str::to_string)
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
