use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::ContractorIdentity;

pub const ANONYMOUS_NAME: &str = "Anonymous User";
pub const ANONYMOUS_AVATAR: &str = "assets/anon.png";

/// Stored privacy and notification preferences for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub user_id: String,
    pub hide_name: bool,
    pub allow_push: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Preferences {
    /// Single default used both when provisioning a new user and when no row exists.
    pub fn default_for(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            hide_name: true,
            allow_push: false,
            updated_at: None,
        }
    }

    /// Resolve an optional stored row to effective preferences.
    pub fn effective(user_id: &str, stored: Option<Preferences>) -> Self {
        stored.unwrap_or_else(|| {
            debug!(user_id, "no stored preferences; applying privacy defaults");
            Self::default_for(user_id)
        })
    }

    pub fn apply(&mut self, patch: &PreferencesPatch, now: DateTime<Utc>) {
        if let Some(hide_name) = patch.hide_name {
            self.hide_name = hide_name;
        }
        if let Some(allow_push) = patch.allow_push {
            self.allow_push = allow_push;
        }
        self.updated_at = Some(now);
    }
}

/// Partial preference update; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesPatch {
    #[serde(default)]
    pub hide_name: Option<bool>,
    #[serde(default)]
    pub allow_push: Option<bool>,
}

/// Name and avatar as shown next to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayIdentity {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<String>,
    pub anonymized: bool,
}

/// Subject identity fields the mask operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub display_name: Option<String>,
    pub avatar_uri: Option<String>,
}

impl From<&ContractorIdentity> for Identity {
    fn from(contractor: &ContractorIdentity) -> Self {
        Self {
            display_name: contractor.resolved_name(),
            avatar_uri: contractor.avatar_uri.clone(),
        }
    }
}

/// Apply the hide-name preference; `None` is treated as "not hidden".
pub fn mask(identity: &Identity, hide_name: Option<bool>) -> DisplayIdentity {
    if hide_name.unwrap_or(false) {
        return DisplayIdentity {
            display_name: ANONYMOUS_NAME.to_string(),
            avatar_uri: Some(ANONYMOUS_AVATAR.to_string()),
            anonymized: true,
        };
    }

    DisplayIdentity {
        display_name: identity.display_name.clone().unwrap_or_default(),
        avatar_uri: identity.avatar_uri.clone(),
        anonymized: false,
    }
}
