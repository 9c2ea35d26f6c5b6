pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{card, lookup_form, notice};
pub use layouts::desktop::desktop_layout;
