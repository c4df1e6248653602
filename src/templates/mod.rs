pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{card, error_page, listings_table, stat};
pub use layouts::desktop::desktop_layout;
