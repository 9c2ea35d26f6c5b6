pub mod matches;
pub mod property;
