pub mod assessments;
pub mod home;
pub mod matches;

pub use assessments::assessments_page;
pub use home::home_page;
pub use matches::matches_page;
