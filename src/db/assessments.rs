use crate::db::connection::Database;
use crate::domain::property::AssessmentRecord;
use crate::errors::ServerError;
use rusqlite::params;

/// Assessment history for one parcel, oldest year first.
pub fn get_assessments_for_parcel(
    db: &Database,
    parcel_number: &str,
) -> Result<Vec<AssessmentRecord>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT parcel_number, year, market_value
            FROM assessments
            WHERE parcel_number = ?1
            ORDER BY year ASC
            "#,
        )?;

        let rows = stmt.query_map(params![parcel_number], |row| {
            Ok(AssessmentRecord {
                parcel_number: row.get(0)?,
                year: row.get(1)?,
                market_value: row.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    })
}

pub fn save_assessments(db: &Database, records: &[AssessmentRecord]) -> Result<usize, ServerError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO assessments (parcel_number, year, market_value)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(parcel_number, year) DO UPDATE SET
                    market_value = excluded.market_value
                "#,
            )?;
            for rec in records {
                stmt.execute(params![&rec.parcel_number, rec.year, rec.market_value])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::init_test_db;

    #[test]
    fn history_is_filtered_by_parcel_and_sorted_by_year() {
        let (_dir, db) = init_test_db(&[]);
        let path = db.path().to_string();

        let rec = |parcel: &str, year: i64, value: f64| AssessmentRecord {
            parcel_number: parcel.to_string(),
            year,
            market_value: Some(value),
        };
        save_assessments(
            &Database::writable(path.clone()),
            &[
                rec("1", 2023, 210_000.0),
                rec("2", 2022, 99_000.0),
                rec("1", 2021, 180_000.0),
                rec("1", 2022, 195_000.0),
            ],
        )
        .unwrap();

        let history = get_assessments_for_parcel(&Database::new(path), "1").unwrap();
        let years: Vec<i64> = history.iter().map(|a| a.year).collect();
        assert_eq!(years, vec![2021, 2022, 2023]);
        assert_eq!(history[2].market_value, Some(210_000.0));
    }

    #[test]
    fn unknown_parcel_has_empty_history() {
        let (_dir, db) = init_test_db(&[]);
        assert!(get_assessments_for_parcel(&db, "missing").unwrap().is_empty());
    }
}
