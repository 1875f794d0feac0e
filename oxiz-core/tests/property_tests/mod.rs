//! Property-based tests for oxiz-core
//!
//! This module contains property-based tests using proptest to verify the
//! term builders, traversal helpers and linear arithmetic values.

mod affine_properties;
mod ast_properties;
