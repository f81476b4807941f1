//! Files a release rewrites: the generated version header and the build file

pub mod build_file;
pub mod header;

pub use build_file::{prepare_patch, version_rules, PatchReport, PatchRule, PendingPatch};
pub use header::{render_header, write_header};
