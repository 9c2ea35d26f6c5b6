// src/db/import.rs
use crate::db::assessments::save_assessments;
use crate::db::connection::{init_db, Database};
use crate::db::properties::save_properties;
use crate::domain::property::{AssessmentRecord, PropertyRecord};
use crate::errors::ServerError;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub properties: usize,
    pub assessments: usize,
}

/// Reads a JSON array of records.
pub fn read_json_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ServerError> {
    let file = File::open(path).map_err(|e| {
        ServerError::ConfigError(format!("cannot open '{}': {e}", path.display()))
    })?;
    let reader = BufReader::new(file);
    let records = serde_json::from_reader(reader)?;
    Ok(records)
}

/// Applies the schema and loads property and (optionally) assessment records.
pub fn import_dataset(
    db: &Database,
    schema_path: &str,
    properties_path: &Path,
    assessments_path: Option<&Path>,
) -> Result<ImportSummary, ServerError> {
    init_db(db, schema_path)?;

    let properties: Vec<PropertyRecord> = read_json_records(properties_path)?;
    let mut summary = ImportSummary {
        properties: save_properties(db, &properties)?,
        ..Default::default()
    };

    if let Some(path) = assessments_path {
        let assessments: Vec<AssessmentRecord> = read_json_records(path)?;
        summary.assessments = save_assessments(db, &assessments)?;
    }

    info!(
        properties = summary.properties,
        assessments = summary.assessments,
        db = db.path(),
        "import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::PropertyStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn imports_json_files_into_a_readable_store() {
        let dir = TempDir::new().unwrap();
        let props = dir.path().join("properties.json");
        let assess = dir.path().join("assessments.json");
        fs::write(
            &props,
            r#"[
                {"parcel_number": "2", "location": "10 ELM ST", "census_tract": "001",
                 "year_built": 1950},
                {"parcel_number": "1", "location": "10 ELM ST", "census_tract": "001"}
            ]"#,
        )
        .unwrap();
        fs::write(
            &assess,
            r#"[{"parcel_number": "1", "year": 2024, "market_value": 150000}]"#,
        )
        .unwrap();

        let db_path = dir.path().join("comps.sqlite3").to_string_lossy().to_string();
        let summary = import_dataset(
            &Database::writable(db_path.clone()),
            "sql/schema.sql",
            &props,
            Some(&assess),
        )
        .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                properties: 2,
                assessments: 1
            }
        );

        let store = Database::new(db_path);
        let at = store.properties_at_location("10 ELM ST").unwrap();
        assert_eq!(at.len(), 2);
        assert_eq!(at[0].parcel_number, "1");
        assert_eq!(store.assessments_for_parcel("1").unwrap().len(), 1);
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let props = dir.path().join("bad.json");
        fs::write(&props, "{ not json").unwrap();

        let err = read_json_records::<PropertyRecord>(&props).unwrap_err();
        assert!(matches!(err, ServerError::JsonError(_)));
    }
}
