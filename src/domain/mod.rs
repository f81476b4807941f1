//! Domain logic - pure release rules independent of git operations

pub mod version;

pub use version::{Version, VersionBump};
