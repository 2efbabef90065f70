//! Shared helpers: dates, MIME types, pluralization.

pub mod date;
pub mod mime;
mod plural;

pub use plural::plural_count;
