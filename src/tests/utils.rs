use crate::db::connection::{init_db, Database};
use crate::db::properties::save_properties;
use crate::db::store::PropertyStore;
use crate::domain::property::{AssessmentRecord, ComparisonFeatures, PropertyRecord};
use crate::errors::ServerError;
use std::cell::Cell;
use std::collections::BTreeSet;
use tempfile::TempDir;

/// Property with every comparison feature missing.
pub fn property(parcel: &str, location: &str, tract: Option<&str>) -> PropertyRecord {
    PropertyRecord {
        parcel_number: parcel.to_string(),
        location: location.to_string(),
        census_tract: tract.map(str::to_string),
        latitude: Some(39.95),
        longitude: Some(-75.16),
        market_value: Some(150_000.0),
        features: ComparisonFeatures::default(),
    }
}

/// Property with all comparison features set. Different `seed`s give
/// different feature vectors.
pub fn complete_property(parcel: &str, location: &str, tract: &str, seed: usize) -> PropertyRecord {
    let f = seed as f64;
    PropertyRecord {
        latitude: Some(39.95 + 0.001 * f),
        longitude: Some(-75.16 - 0.001 * f),
        market_value: Some(100_000.0 + 5_000.0 * f),
        features: ComparisonFeatures {
            exterior_condition: Some(1.0 + (seed % 5) as f64),
            interior_condition: Some(1.0 + (seed % 4) as f64),
            number_of_bedrooms: Some(1.0 + (seed % 6) as f64),
            number_stories: Some(1.0 + (seed % 3) as f64),
            quality_grade: Some(1.0 + (seed % 7) as f64),
            total_area: Some(800.0 + 37.0 * f),
            total_livable_area: Some(700.0 + 29.0 * f),
            view_type: Some((seed % 2) as f64),
            year_built: Some(1890.0 + 3.0 * f),
        },
        ..property(parcel, location, Some(tract))
    }
}

/// Fresh on-disk database with the production schema and `properties` loaded.
/// Returns a read-only handle; keep the `TempDir` alive for the test's duration.
pub fn init_test_db(properties: &[PropertyRecord]) -> (TempDir, Database) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let path = dir.path().join("test.sqlite3").to_string_lossy().to_string();

    let writer = Database::writable(path.clone());
    init_db(&writer, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    save_properties(&writer, properties).unwrap_or_else(|e| panic!("seeding failed: {e}"));

    (dir, Database::new(path))
}

/// In-memory store that counts the queries it receives.
pub struct MemoryStore {
    rows: Vec<PropertyRecord>,
    assessments: Vec<AssessmentRecord>,
    calls: Cell<usize>,
    tract_queries: Cell<usize>,
}

impl MemoryStore {
    pub fn new(rows: Vec<PropertyRecord>) -> Self {
        Self {
            rows,
            assessments: Vec::new(),
            calls: Cell::new(0),
            tract_queries: Cell::new(0),
        }
    }

    pub fn with_assessments(mut self, assessments: Vec<AssessmentRecord>) -> Self {
        self.assessments = assessments;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn tract_queries(&self) -> usize {
        self.tract_queries.get()
    }

    fn touch(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl PropertyStore for MemoryStore {
    fn location_names_containing(&self, needle_lower: &str) -> Result<Vec<String>, ServerError> {
        self.touch();
        let names: BTreeSet<String> = self
            .rows
            .iter()
            .filter(|p| p.location.to_lowercase().contains(needle_lower))
            .map(|p| p.location.clone())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn properties_at_location(&self, location: &str) -> Result<Vec<PropertyRecord>, ServerError> {
        self.touch();
        let mut out: Vec<PropertyRecord> = self
            .rows
            .iter()
            .filter(|p| p.location == location)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.parcel_number.cmp(&b.parcel_number));
        Ok(out)
    }

    fn properties_in_tracts(
        &self,
        tracts: &BTreeSet<String>,
        excluding_parcel: &str,
    ) -> Result<Vec<PropertyRecord>, ServerError> {
        self.touch();
        self.tract_queries.set(self.tract_queries.get() + 1);
        let mut out: Vec<PropertyRecord> = self
            .rows
            .iter()
            .filter(|p| p.parcel_number != excluding_parcel)
            .filter(|p| p.census_tract.as_ref().is_some_and(|t| tracts.contains(t)))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            (&a.location, &a.parcel_number).cmp(&(&b.location, &b.parcel_number))
        });
        Ok(out)
    }

    fn property_by_parcel(
        &self,
        parcel_number: &str,
    ) -> Result<Option<PropertyRecord>, ServerError> {
        self.touch();
        Ok(self
            .rows
            .iter()
            .find(|p| p.parcel_number == parcel_number)
            .cloned())
    }

    fn assessments_for_parcel(
        &self,
        parcel_number: &str,
    ) -> Result<Vec<AssessmentRecord>, ServerError> {
        self.touch();
        let mut out: Vec<AssessmentRecord> = self
            .assessments
            .iter()
            .filter(|a| a.parcel_number == parcel_number)
            .cloned()
            .collect();
        out.sort_by_key(|a| a.year);
        Ok(out)
    }
}
