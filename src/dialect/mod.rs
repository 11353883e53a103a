//! Spanner dialect translation.
//!
//! Pure functions from the neutral schema model to Spanner DDL fragments:
//! column type tokens (`types`) and constraint statements (`constraints`).

pub mod constraints;
pub mod types;

pub use constraints::{translate, ConstraintDdl};
pub use types::{column_definition, column_type, spanner_type};
