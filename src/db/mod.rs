pub mod assessments;
pub mod connection;
pub mod import;
pub mod properties;
pub mod store;

pub use connection::{init_db, Database};
pub use store::PropertyStore;
