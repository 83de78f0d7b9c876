//! CLI integration tests for pbxdeps.

mod add_tests;
mod common;
mod inspect_tests;
