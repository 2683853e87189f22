//! Coordinate and date normalization.
//!
//! Every function here is pure and total: it returns a value or a typed parse failure,
//! never panics on malformed input. The loading collaborator runs raw strings through
//! this module before any record reaches the interval datasets.

mod date;
mod geo;

pub use date::{UNKNOWN_YEAR, parse_population, parse_year};
pub use geo::parse_dms;
