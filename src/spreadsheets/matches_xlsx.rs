use crate::domain::matches::MatchSet;
use crate::domain::property::FEATURE_NAMES;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::{Workbook, Worksheet};

const LEADING_HEADERS: [&str; 9] = [
    "match_num",
    "type",
    "distance",
    "parcel_number",
    "location",
    "census_tract",
    "latitude",
    "longitude",
    "market_value",
];

fn write_opt(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), ServerError> {
    if let Some(v) = value {
        ws.write_number(row, col, v)
            .map_err(|e| ServerError::XlsxError(format!("row {row}, col {col}: {e}")))?;
    }
    Ok(())
}

fn write_str(ws: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), ServerError> {
    ws.write_string(row, col, value)
        .map_err(|e| ServerError::XlsxError(format!("row {row}, col {col}: {e}")))?;
    Ok(())
}

/// One sheet, one row per ranked property, columns named as in the data model.
pub fn build_matches_workbook(set: &MatchSet) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Matches")
        .map_err(|e| ServerError::XlsxError(format!("Failed to name sheet: {e}")))?;

    let headers = LEADING_HEADERS.iter().chain(FEATURE_NAMES.iter());
    for (col, header) in headers.enumerate() {
        write_str(worksheet, 0, col as u16, header)?;
    }

    for (i, m) in set.results.iter().enumerate() {
        let r = (i + 1) as u32;
        let p = &m.property;

        write_opt(worksheet, r, 0, Some(m.match_num as f64))?;
        write_str(worksheet, r, 1, m.match_type.as_str())?;
        write_opt(worksheet, r, 2, Some(m.distance))?;
        write_str(worksheet, r, 3, &p.parcel_number)?;
        write_str(worksheet, r, 4, &p.location)?;
        write_str(worksheet, r, 5, p.census_tract.as_deref().unwrap_or(""))?;
        write_opt(worksheet, r, 6, p.latitude)?;
        write_opt(worksheet, r, 7, p.longitude)?;
        write_opt(worksheet, r, 8, p.market_value)?;

        if let Some(values) = p.features.to_vector() {
            for (j, v) in values.iter().enumerate() {
                write_opt(worksheet, r, (LEADING_HEADERS.len() + j) as u16, Some(*v))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_matches_xlsx(set: &MatchSet) -> ResultResp {
    let buffer = build_matches_workbook(set)?;
    xlsx_response(buffer, &format!("matches_{}", set.index.location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::matches::{MatchResult, MatchType};
    use crate::tests::utils::complete_property;

    #[test]
    fn workbook_is_a_zip_container() {
        let index = complete_property("1", "1 MAIN ST", "001", 0);
        let set = MatchSet {
            results: vec![MatchResult {
                property: index.clone(),
                match_ind: 1,
                distance: 0.7,
                match_type: MatchType::Input,
                match_num: 0,
            }],
            index,
        };

        let bytes = build_matches_workbook(&set).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }
}
