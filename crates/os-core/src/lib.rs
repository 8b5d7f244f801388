//! os-core: stable foundation for the OpenStudio HVAC core.
//!
//! Contains:
//! - ids (object handles and compact arena slots)
//! - numeric (Real and fraction checks)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

pub use error::{OsError, OsResult};
pub use ids::*;
pub use numeric::*;
