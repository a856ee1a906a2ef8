//! Display helpers.

pub mod format;

pub use format::{format_date, greeting, greeting_now, truncate};
