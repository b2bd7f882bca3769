use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Video,
    Pdf,
    Document,
}

/// Formats the review screens can preview inline.
const PREVIEW_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const PREVIEW_VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

impl AttachmentKind {
    pub fn from_uri(uri: &str) -> Self {
        let path = strip_query(uri);
        let extension = extension(path);
        let listed = |allowed: &[&str]| allowed.contains(&extension.as_str());

        match mime_guess::from_path(path).first() {
            Some(mime) if mime.type_() == mime::IMAGE && listed(&PREVIEW_IMAGE_EXTENSIONS) => {
                Self::Image
            }
            Some(mime) if mime.type_() == mime::VIDEO && listed(&PREVIEW_VIDEO_EXTENSIONS) => {
                Self::Video
            }
            Some(mime) if mime.type_() == mime::APPLICATION && mime.subtype() == mime::PDF => {
                Self::Pdf
            }
            _ => Self::Document,
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Image => "image-outline",
            Self::Video => "videocam-outline",
            Self::Pdf => "document-text-outline",
            Self::Document => "document-outline",
        }
    }

    pub const fn previewable(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// Presentation of one stored attachment reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentView {
    pub uri: String,
    pub file_name: String,
    pub kind: AttachmentKind,
    pub icon: &'static str,
    pub previewable: bool,
}

impl AttachmentView {
    pub fn from_uri(uri: &str) -> Self {
        let kind = AttachmentKind::from_uri(uri);
        Self {
            uri: uri.to_string(),
            file_name: file_name(uri).to_string(),
            kind,
            icon: kind.icon(),
            previewable: kind.previewable(),
        }
    }
}

/// Last path segment of an attachment URI, or the URI itself when there is none.
pub fn file_name(uri: &str) -> &str {
    let path = strip_query(uri);
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => uri,
    }
}

fn extension(path: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn strip_query(uri: &str) -> &str {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    &uri[..end]
}

/// Attachment lists arrive as a JSON array, a JSON-encoded array string, a bare URI or nothing.
pub(crate) fn deserialize_uris<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(uris_from_value).unwrap_or_default())
}

pub(crate) fn uris_from_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(uri) if !uri.trim().is_empty() => Some(uri.trim().to_string()),
                _ => None,
            })
            .collect(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else if trimmed.starts_with('[') {
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(parsed @ Value::Array(_)) => uris_from_value(parsed),
                    _ => {
                        warn!(files = trimmed, "discarding undecodable attachment list");
                        Vec::new()
                    }
                }
            } else {
                vec![trimmed.to_string()]
            }
        }
        Value::Null => Vec::new(),
        other => {
            warn!(files = %other, "discarding undecodable attachment list");
            Vec::new()
        }
    }
}
