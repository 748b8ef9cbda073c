//! Integration tests for dirmap-lib.

mod common;
mod persistence_tests;
mod scenario_tests;
