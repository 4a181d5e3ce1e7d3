//! dit: a local, content-addressed version control engine.
//!
//! The crate is split into three layers:
//! - `areas`: the on-disk areas of a repository (object database, index,
//!   refs, working tree) plus the `Repository` facade tying them together.
//! - `artifacts`: domain types and algorithms (objects, branches, status
//!   classification, merge machinery, checkout restore, ignore rules).
//! - `commands`: the porcelain operations exposed to the CLI, implemented
//!   as `impl Repository` blocks.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
