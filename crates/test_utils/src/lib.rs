//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! pricing engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Standard rate tables, fees and premiums
//! - `builders`: Builder patterns for quote requests and policy records
//! - `assertions`: Custom assertion helpers for pricing results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
