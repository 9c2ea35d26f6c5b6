// src/db/store.rs
use crate::db::assessments::get_assessments_for_parcel;
use crate::db::connection::Database;
use crate::db::properties::{
    get_locations_containing, get_properties_at_location, get_properties_in_tracts,
    get_property_by_parcel,
};
use crate::domain::property::{AssessmentRecord, PropertyRecord};
use crate::errors::ServerError;
use std::collections::BTreeSet;

/// Read-only access to property and assessment records.
///
/// "No rows" is always an empty result, never an error. An `Err` means the
/// data source itself is broken.
pub trait PropertyStore {
    /// Distinct locations whose lowercase form contains `needle_lower`, ascending.
    fn location_names_containing(&self, needle_lower: &str) -> Result<Vec<String>, ServerError>;

    /// All parcels at exactly `location`, ascending by parcel number.
    fn properties_at_location(&self, location: &str) -> Result<Vec<PropertyRecord>, ServerError>;

    /// All properties in `tracts` other than `excluding_parcel`,
    /// ordered by location then parcel number.
    fn properties_in_tracts(
        &self,
        tracts: &BTreeSet<String>,
        excluding_parcel: &str,
    ) -> Result<Vec<PropertyRecord>, ServerError>;

    fn property_by_parcel(&self, parcel_number: &str)
        -> Result<Option<PropertyRecord>, ServerError>;

    /// Assessment history, oldest year first.
    fn assessments_for_parcel(
        &self,
        parcel_number: &str,
    ) -> Result<Vec<AssessmentRecord>, ServerError>;
}

impl PropertyStore for Database {
    fn location_names_containing(&self, needle_lower: &str) -> Result<Vec<String>, ServerError> {
        get_locations_containing(self, needle_lower)
    }

    fn properties_at_location(&self, location: &str) -> Result<Vec<PropertyRecord>, ServerError> {
        get_properties_at_location(self, location)
    }

    fn properties_in_tracts(
        &self,
        tracts: &BTreeSet<String>,
        excluding_parcel: &str,
    ) -> Result<Vec<PropertyRecord>, ServerError> {
        let tracts: Vec<&str> = tracts.iter().map(String::as_str).collect();
        get_properties_in_tracts(self, &tracts, excluding_parcel)
    }

    fn property_by_parcel(
        &self,
        parcel_number: &str,
    ) -> Result<Option<PropertyRecord>, ServerError> {
        get_property_by_parcel(self, parcel_number)
    }

    fn assessments_for_parcel(
        &self,
        parcel_number: &str,
    ) -> Result<Vec<AssessmentRecord>, ServerError> {
        get_assessments_for_parcel(self, parcel_number)
    }
}
