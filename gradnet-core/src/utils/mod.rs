//! Helpers shared by the unit tests of the crate and by downstream test suites.

pub mod testing;
