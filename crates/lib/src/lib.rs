//! pbxdeps-lib: Core types and logic for pbxdeps
//!
//! This crate adds Swift package dependencies to an Xcode project without a
//! full `project.pbxproj` parser:
//! - `dependency`: descriptors of the packages to add, and their validation
//! - `pbxproj`: the anchor-based patching engine for the project manifest
//! - `lock`: the `Package.resolved` document and its pin merge rules
//! - `apply`: the all-or-nothing orchestrator tying the two together
//!
//! Everything under `apply`, `pbxproj`, `dependency` and `lock::merge` is
//! pure in-memory transformation. File access, backups and remote revision
//! lookups live in `project`, `lock` (load/save) and `revision`.

pub mod apply;
pub mod consts;
pub mod dependency;
pub mod ident;
pub mod lock;
pub mod pbxproj;
pub mod project;
pub mod revision;
pub mod util;
