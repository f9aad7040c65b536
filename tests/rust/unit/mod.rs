//! Public-API tests for cypher-builder.
//!
//! Exercise builds end to end without reaching into crate internals.

mod build_tests;
mod clause_tests;
mod naming_tests;
mod pattern_tests;
