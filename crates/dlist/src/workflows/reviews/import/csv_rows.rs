use std::io::Read;

use serde_json::{Map, Value};

use super::ReviewImportError;
use crate::workflows::reviews::domain::ReviewRecord;

/// Decode CSV rows into review records. Cells stay strings and blank cells are dropped,
/// so rating columns reach the normalizer exactly as exported.
pub(crate) fn parse_reviews<R: Read>(reader: R) -> Result<Vec<ReviewRecord>, ReviewImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut reviews = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let columns: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();

        reviews.push(serde_json::from_value(Value::Object(columns))?);
    }

    Ok(reviews)
}
