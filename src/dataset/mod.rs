//! Interval datasets and the domain record types they hold.

/// Generic interval container and queries.
pub mod interval;
/// Railway lines and nested geometry dispatch.
pub mod railway;
/// Record traits, categories and jurisdictions.
pub mod record;
/// Concrete record types and the loaded-dataset bundle.
pub mod sources;
