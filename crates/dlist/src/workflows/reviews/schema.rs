use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Which category set a review is collected and scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    /// Project reviews of a homeowner by a contractor.
    #[serde(alias = "project")]
    Standard,
    /// Social interaction reviews of an individual.
    #[serde(alias = "Social Interaction", alias = "social interaction")]
    Social,
}

impl SubjectType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Standard, Self::Social]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Project",
            Self::Social => "Social Interaction",
        }
    }

    /// Parse a stored subject-type tag without guessing.
    pub fn parse(tag: &str) -> Result<Self, UnknownSubjectType> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "project" | "standard" => Ok(Self::Standard),
            "social" | "social interaction" => Ok(Self::Social),
            _ => Err(UnknownSubjectType(tag.to_string())),
        }
    }

    pub const fn categories(self) -> &'static [RatingCategory; 5] {
        match self {
            Self::Standard => &STANDARD_CATEGORIES,
            Self::Social => &SOCIAL_CATEGORIES,
        }
    }

    pub fn field_keys(self) -> impl Iterator<Item = &'static str> {
        self.categories().iter().map(|category| category.key)
    }

    pub fn owns_field(self, key: &str) -> bool {
        self.field_keys().any(|candidate| candidate == key)
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subject type '{0}'")]
pub struct UnknownSubjectType(pub String);

/// One rating dimension: the stored column key and the label shown when collecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingCategory {
    pub key: &'static str,
    pub label: &'static str,
}

pub const STANDARD_CATEGORIES: [RatingCategory; 5] = [
    RatingCategory {
        key: "rating_payment",
        label: "Payment Timeliness",
    },
    RatingCategory {
        key: "rating_communication",
        label: "Communication",
    },
    RatingCategory {
        key: "rating_scope",
        label: "Scope Clarity",
    },
    RatingCategory {
        key: "rating_change_orders",
        label: "Change Order Fairness",
    },
    RatingCategory {
        key: "rating_overall",
        label: "Overall Experience",
    },
];

pub const SOCIAL_CATEGORIES: [RatingCategory; 5] = [
    RatingCategory {
        key: "rating_approach",
        label: "Approachability",
    },
    RatingCategory {
        key: "rating_respect",
        label: "Respect & Courtesy",
    },
    RatingCategory {
        key: "rating_communication_style",
        label: "Communication Style",
    },
    RatingCategory {
        key: "rating_composure",
        label: "Emotional Composure",
    },
    RatingCategory {
        key: "rating_trust",
        label: "Trustworthiness",
    },
];

/// What to do with a review whose subject-type tag is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSubjectPolicy {
    /// Score the review against the standard category set.
    #[default]
    Standard,
    /// Treat the review as carrying no usable ratings.
    Reject,
}

impl UnknownSubjectPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Resolve a review's tag; unknown tags are always logged as a data-integrity warning.
    pub fn resolve(self, review_id: &str, tag: &str) -> Option<SubjectType> {
        match SubjectType::parse(tag) {
            Ok(subject_type) => Some(subject_type),
            Err(err) => {
                warn!(
                    review_id,
                    %err,
                    policy = ?self,
                    "review carries an unrecognized subject type"
                );
                match self {
                    Self::Standard => Some(SubjectType::Standard),
                    Self::Reject => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!(SubjectType::parse("project"), Ok(SubjectType::Standard));
        assert_eq!(SubjectType::parse(" Standard "), Ok(SubjectType::Standard));
        assert_eq!(SubjectType::parse("Social"), Ok(SubjectType::Social));
        assert_eq!(
            SubjectType::parse("Social Interaction"),
            Ok(SubjectType::Social)
        );
        assert_eq!(
            SubjectType::parse("Roofing"),
            Err(UnknownSubjectType("Roofing".to_string()))
        );
    }

    #[test]
    fn stored_tags_deserialize_as_subject_types() {
        let decode = |tag: &str| serde_json::from_value::<SubjectType>(serde_json::json!(tag));
        assert_eq!(decode("project").ok(), Some(SubjectType::Standard));
        assert_eq!(decode("standard").ok(), Some(SubjectType::Standard));
        assert_eq!(decode("Social Interaction").ok(), Some(SubjectType::Social));
        assert!(decode("Roofing").is_err());
        assert_eq!(
            serde_json::to_value(SubjectType::Standard).ok(),
            Some(serde_json::json!("standard"))
        );
    }

    #[test]
    fn category_sets_are_disjoint_and_five_wide() {
        let standard: HashSet<_> = SubjectType::Standard.field_keys().collect();
        let social: HashSet<_> = SubjectType::Social.field_keys().collect();
        assert_eq!(standard.len(), 5);
        assert_eq!(social.len(), 5);
        assert!(standard.is_disjoint(&social));
        assert!(SubjectType::Social.owns_field("rating_trust"));
        assert!(!SubjectType::Standard.owns_field("rating_trust"));
    }

    #[test]
    fn policy_decides_unknown_tags() {
        assert_eq!(
            UnknownSubjectPolicy::Standard.resolve("r-1", ""),
            Some(SubjectType::Standard)
        );
        assert_eq!(UnknownSubjectPolicy::Reject.resolve("r-1", "Roofing"), None);
        assert_eq!(
            UnknownSubjectPolicy::Reject.resolve("r-1", "social"),
            Some(SubjectType::Social)
        );
        assert_eq!(UnknownSubjectPolicy::parse("REJECT"), Some(UnknownSubjectPolicy::Reject));
        assert_eq!(UnknownSubjectPolicy::parse("maybe"), None);
    }
}
