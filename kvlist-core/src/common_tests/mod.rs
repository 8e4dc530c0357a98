//! Test suites shared by every `KeyValueList` implementation.
//!
//! Integration tests in each crate instantiate these generically.
