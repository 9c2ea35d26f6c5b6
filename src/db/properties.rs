use crate::db::connection::Database;
use crate::domain::property::{ComparisonFeatures, PropertyRecord};
use crate::errors::ServerError;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const PROPERTY_COLUMNS: &str = r#"
    parcel_number, location, census_tract, latitude, longitude, market_value,
    exterior_condition, interior_condition, number_of_bedrooms, number_stories,
    quality_grade, total_area, total_livable_area, view_type, year_built
"#;

fn property_from_row(row: &Row<'_>) -> rusqlite::Result<PropertyRecord> {
    Ok(PropertyRecord {
        parcel_number: row.get("parcel_number")?,
        location: row.get("location")?,
        census_tract: row.get("census_tract")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        market_value: row.get("market_value")?,
        features: ComparisonFeatures {
            exterior_condition: row.get("exterior_condition")?,
            interior_condition: row.get("interior_condition")?,
            number_of_bedrooms: row.get("number_of_bedrooms")?,
            number_stories: row.get("number_stories")?,
            quality_grade: row.get("quality_grade")?,
            total_area: row.get("total_area")?,
            total_livable_area: row.get("total_livable_area")?,
            view_type: row.get("view_type")?,
            year_built: row.get("year_built")?,
        },
    })
}

/// Distinct locations containing `needle`, ascending.
/// `needle` must already be lowercase (`str::to_lowercase`); the column is
/// folded the same way through `fold_case`.
pub fn get_locations_containing(db: &Database, needle: &str) -> Result<Vec<String>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT location
            FROM properties
            WHERE instr(fold_case(location), ?1) > 0
            ORDER BY location ASC
            "#,
        )?;

        let rows = stmt.query_map(params![needle], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    })
}

/// Every parcel at exactly `location`, smallest parcel number first.
pub fn get_properties_at_location(
    db: &Database,
    location: &str,
) -> Result<Vec<PropertyRecord>, ServerError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties \
             WHERE location = ?1 ORDER BY parcel_number ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![location], property_from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    })
}

/// All properties in any of `tracts`, except `excluding_parcel`,
/// ordered by location and then parcel number.
pub fn get_properties_in_tracts(
    db: &Database,
    tracts: &[&str],
    excluding_parcel: &str,
) -> Result<Vec<PropertyRecord>, ServerError> {
    if tracts.is_empty() {
        return Ok(Vec::new());
    }

    // One bound placeholder per tract, then the excluded parcel.
    let placeholders = (1..=tracts.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let exclude_idx = tracts.len() + 1;
    let sql = format!(
        r#"
        SELECT {PROPERTY_COLUMNS}
        FROM properties
        WHERE census_tract IN ({placeholders})
          AND parcel_number <> ?{exclude_idx}
        ORDER BY location ASC, parcel_number ASC
        "#
    );

    let mut bound: Vec<&str> = tracts.to_vec();
    bound.push(excluding_parcel);

    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bound.iter()), property_from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    })
}

pub fn get_property_by_parcel(
    db: &Database,
    parcel_number: &str,
) -> Result<Option<PropertyRecord>, ServerError> {
    db.with_conn(|conn| {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE parcel_number = ?1");
        let found = conn
            .query_row(&sql, params![parcel_number], property_from_row)
            .optional()?;
        Ok(found)
    })
}

/// Inserts or replaces a batch of properties in one transaction.
pub fn save_properties(db: &Database, properties: &[PropertyRecord]) -> Result<usize, ServerError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR REPLACE INTO properties (
                    parcel_number, location, census_tract, latitude, longitude, market_value,
                    exterior_condition, interior_condition, number_of_bedrooms, number_stories,
                    quality_grade, total_area, total_livable_area, view_type, year_built
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
            )?;

            for prop in properties {
                let f = &prop.features;
                stmt.execute(params![
                    &prop.parcel_number,
                    &prop.location,
                    &prop.census_tract,
                    prop.latitude,
                    prop.longitude,
                    prop.market_value,
                    f.exterior_condition,
                    f.interior_condition,
                    f.number_of_bedrooms,
                    f.number_stories,
                    f.quality_grade,
                    f.total_area,
                    f.total_livable_area,
                    f.view_type,
                    f.year_built,
                ])?;
            }
        }
        tx.commit()?;
        Ok(properties.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::{init_test_db, property};

    #[test]
    fn tract_query_binds_values_instead_of_splicing_them() {
        let (_dir, db) = init_test_db(&[
            property("1", "1 MAIN ST", Some("001")),
            property("2", "2 MAIN ST", Some("001')) OR 1=1 --")),
            property("3", "3 MAIN ST", Some("002")),
        ]);

        let rows = get_properties_in_tracts(&db, &["001')) OR 1=1 --"], "none").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parcel_number, "2");
    }

    #[test]
    fn tract_query_excludes_parcel_and_orders_by_location() {
        let (_dir, db) = init_test_db(&[
            property("9", "B ST", Some("001")),
            property("5", "A ST", Some("002")),
            property("4", "B ST", Some("001")),
            property("1", "C ST", Some("001")),
            property("7", "D ST", Some("003")),
        ]);

        let rows = get_properties_in_tracts(&db, &["001", "002"], "1").unwrap();
        let parcels: Vec<&str> = rows.iter().map(|r| r.parcel_number.as_str()).collect();
        assert_eq!(parcels, vec!["5", "4", "9"]);
    }

    #[test]
    fn locations_containing_is_case_insensitive_and_distinct() {
        let (_dir, db) = init_test_db(&[
            property("1", "123 MARKET ST", Some("001")),
            property("2", "123 MARKET ST", Some("001")),
            property("3", "99 Market Ave", Some("001")),
            property("4", "5 CHESTNUT ST", Some("001")),
        ]);

        let names = get_locations_containing(&db, "market").unwrap();
        assert_eq!(names, vec!["123 MARKET ST", "99 Market Ave"]);
    }

    #[test]
    fn locations_containing_folds_non_ascii_letters() {
        let (_dir, db) = init_test_db(&[
            property("1", "12 CAFÉ ST", Some("001")),
            property("2", "4 ÅNGSTRÖM WAY", Some("001")),
            property("3", "7 CAFE ST", Some("001")),
        ]);

        assert_eq!(get_locations_containing(&db, "12 café st").unwrap(), vec!["12 CAFÉ ST"]);
        assert_eq!(get_locations_containing(&db, "ångström").unwrap(), vec!["4 ÅNGSTRÖM WAY"]);
    }

    #[test]
    fn like_wildcards_in_fragment_are_literal() {
        let (_dir, db) = init_test_db(&[property("1", "1 MAIN ST", Some("001"))]);
        assert!(get_locations_containing(&db, "%").unwrap().is_empty());
        assert!(get_locations_containing(&db, "_").unwrap().is_empty());
    }

    #[test]
    fn parcel_lookup_returns_none_when_absent() {
        let (_dir, db) = init_test_db(&[property("1", "1 MAIN ST", Some("001"))]);
        assert!(get_property_by_parcel(&db, "2").unwrap().is_none());
        assert_eq!(
            get_property_by_parcel(&db, "1").unwrap().unwrap().location,
            "1 MAIN ST"
        );
    }

    #[test]
    fn null_features_round_trip_as_missing() {
        let mut p = property("1", "1 MAIN ST", Some("001"));
        p.features.year_built = None;
        let (_dir, db) = init_test_db(&[p]);

        let back = get_property_by_parcel(&db, "1").unwrap().unwrap();
        assert_eq!(back.features.year_built, None);
        assert!(back.features.total_area.is_some());
    }
}
