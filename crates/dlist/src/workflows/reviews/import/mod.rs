mod csv_rows;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{ContractorIdentity, ReviewRecord};
use super::identity::Preferences;

#[derive(Debug, thiserror::Error)]
pub enum ReviewImportError {
    #[error("failed to read review export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid review CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid review JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported export format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ReviewImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ReviewImportError::UnsupportedFormat(extension)),
        }
    }
}

/// Snapshot of backend tables used to seed a repository or drive offline reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewExport {
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
    #[serde(default)]
    pub contractors: Vec<ContractorIdentity>,
    #[serde(default)]
    pub preferences: Vec<Preferences>,
}

/// JSON exports are either a bare array of review rows or a full table snapshot.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonExport {
    Rows(Vec<ReviewRecord>),
    Tables(ReviewExport),
}

pub struct ReviewExportImporter;

impl ReviewExportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ReviewExport, ReviewImportError> {
        let path = path.as_ref();
        let format = ExportFormat::from_path(path)?;
        let file = std::fs::File::open(path)?;
        let export = Self::from_reader(file, format)?;

        info!(
            path = %path.display(),
            reviews = export.reviews.len(),
            contractors = export.contractors.len(),
            preferences = export.preferences.len(),
            "review export loaded"
        );
        Ok(export)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: ExportFormat,
    ) -> Result<ReviewExport, ReviewImportError> {
        match format {
            ExportFormat::Csv => Ok(ReviewExport {
                reviews: csv_rows::parse_reviews(reader)?,
                ..ReviewExport::default()
            }),
            ExportFormat::Json => match serde_json::from_reader(reader)? {
                JsonExport::Rows(reviews) => Ok(ReviewExport {
                    reviews,
                    ..ReviewExport::default()
                }),
                JsonExport::Tables(export) => Ok(export),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::reviews::schema::SubjectType;
    use serde_json::json;
    use std::io::Cursor;

    const CSV: &str = "id,subject_id,subject_type,contractor_id,created_at,rating_payment,rating_communication,rating_scope,rating_change_orders,rating_overall,files\n\
r-1,h-1,project,c-1,2025-09-24T10:00:00Z,4,5,3,,,\"[\"\"https://cdn.example/a.png\"\"]\"\n\
r-2,h-1,social,c-2,2025-09-25T10:00:00Z,,,,,,\n";

    #[test]
    fn csv_rows_become_review_records() {
        let export =
            ReviewExportImporter::from_reader(Cursor::new(CSV), ExportFormat::Csv).expect("import");

        assert_eq!(export.reviews.len(), 2);
        let first = &export.reviews[0];
        assert_eq!(first.id.0, "r-1");
        assert_eq!(first.column("rating_payment"), Some(&json!("4")));
        assert_eq!(first.column("rating_change_orders"), None);
        assert_eq!(first.files, vec!["https://cdn.example/a.png".to_string()]);
        assert_eq!(export.reviews[1].subject_type(), Ok(SubjectType::Social));
        assert!(export.contractors.is_empty());
    }

    #[test]
    fn json_accepts_rows_or_tables() {
        let rows = json!([{
            "id": "r-1",
            "subject_id": "h-1",
            "subject_type": "project",
            "contractor_id": "c-1",
            "created_at": "2025-09-24T10:00:00Z",
            "rating_overall": 5
        }])
        .to_string();
        let export = ReviewExportImporter::from_reader(Cursor::new(rows), ExportFormat::Json)
            .expect("rows import");
        assert_eq!(export.reviews.len(), 1);

        let tables = json!({
            "contractors": [{"id": "c-1", "display_name": "Dana", "profile_image_url": "a.jpg"}],
            "preferences": [{"user_id": "c-1", "hide_name": false, "allow_push": true}]
        })
        .to_string();
        let export = ReviewExportImporter::from_reader(Cursor::new(tables), ExportFormat::Json)
            .expect("tables import");
        assert!(export.reviews.is_empty());
        assert_eq!(export.contractors[0].avatar_uri.as_deref(), Some("a.jpg"));
        assert!(!export.preferences[0].hide_name);
    }

    #[test]
    fn rejects_unknown_extensions_and_missing_files() {
        match ExportFormat::from_path(Path::new("reviews.xlsx")) {
            Err(ReviewImportError::UnsupportedFormat(ext)) => assert_eq!(ext, "xlsx"),
            other => panic!("expected unsupported format, got {other:?}"),
        }

        match ReviewExportImporter::from_path("./does-not-exist.json") {
            Err(ReviewImportError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
