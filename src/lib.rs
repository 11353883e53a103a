//! spanner_ddl library - Cloud Spanner schema generation
//!
//! Turns a declarative schema description into the ordered, batch-framed DDL
//! script a Spanner PostgreSQL-interface endpoint expects, and executes it over
//! a pluggable transport.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod output;
pub mod schema;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod fixtures;

#[cfg(test)]
pub mod test_utils;
