// src/domain/property.rs

use serde::{Deserialize, Serialize};

/// Number of comparison features the similarity model is trained on.
pub const FEATURE_COUNT: usize = 9;

/// Column names of the comparison features, in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "exterior_condition",
    "interior_condition",
    "number_of_bedrooms",
    "number_stories",
    "quality_grade",
    "total_area",
    "total_livable_area",
    "view_type",
    "year_built",
];

/// The physical attributes two properties are compared on.
/// Any of them may be missing in the source data.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonFeatures {
    pub exterior_condition: Option<f64>,
    pub interior_condition: Option<f64>,
    pub number_of_bedrooms: Option<f64>,
    pub number_stories: Option<f64>,
    pub quality_grade: Option<f64>,
    pub total_area: Option<f64>,
    pub total_livable_area: Option<f64>,
    pub view_type: Option<f64>,
    pub year_built: Option<f64>,
}

impl ComparisonFeatures {
    /// Returns the features in `FEATURE_NAMES` order, or `None` if any is missing.
    pub fn to_vector(&self) -> Option<[f64; FEATURE_COUNT]> {
        Some([
            self.exterior_condition?,
            self.interior_condition?,
            self.number_of_bedrooms?,
            self.number_stories?,
            self.quality_grade?,
            self.total_area?,
            self.total_livable_area?,
            self.view_type?,
            self.year_built?,
        ])
    }

    pub fn is_complete(&self) -> bool {
        self.to_vector().is_some()
    }
}

/// One physical property as stored in the `properties` table.
///
/// `parcel_number` is unique. `location` is not: sub-units share an address,
/// and the smallest parcel number at a location is its canonical record.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub parcel_number: String,
    pub location: String,
    pub census_tract: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub market_value: Option<f64>,
    #[serde(flatten)]
    pub features: ComparisonFeatures,
}

/// A yearly assessment of one parcel.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub parcel_number: String,
    pub year: i64,
    pub market_value: Option<f64>,
}
