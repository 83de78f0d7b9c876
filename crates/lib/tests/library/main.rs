//! Integration tests for pbxdeps-lib.

mod common;
mod pipeline_tests;
mod project_tests;
