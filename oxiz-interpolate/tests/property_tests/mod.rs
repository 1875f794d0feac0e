//! Property-based tests for oxiz-interpolate
//!
//! Random partition trees and random refutations, checked against the
//! tree structure laws and the tree interpolation laws.

mod partition_properties;
mod resolution_properties;
