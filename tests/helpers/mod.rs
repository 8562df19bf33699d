// Test helpers shared by the unit, integration and contract test targets
//
// The service layer talks to its collaborators through traits, so most tests
// run against the in-memory implementations in `fakes`. The MySQL
// repositories are covered by #[ignore]d tests built on `test_database`.
//
// Usage (from a test file one directory below tests/):
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]

pub mod fakes;

pub use fakes::*;
pub use test_data::*;
