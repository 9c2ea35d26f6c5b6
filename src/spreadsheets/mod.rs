pub mod matches_xlsx;

pub use matches_xlsx::{build_matches_workbook, export_matches_xlsx};
