use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Makes a user-derived name safe to put in a Content-Disposition header.
pub fn attachment_name(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "matches.xlsx".to_string()
    } else {
        format!("{trimmed}.xlsx")
    }
}

/// Spreadsheet download. `stem` is sanitized before use.
pub fn xlsx_response(buffer: Vec<u8>, stem: &str) -> ResultResp {
    let filename = attachment_name(stem);
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", XLSX_MIME)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(buffer))
        .map_err(|_| ServerError::InternalError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_name_strips_header_breaking_characters() {
        assert_eq!(attachment_name("matches_123 MARKET ST"), "matches_123_MARKET_ST.xlsx");
        assert_eq!(attachment_name("a\"b\r\nc"), "a_b__c.xlsx");
        assert_eq!(attachment_name("\"\""), "matches.xlsx");
    }
}
