//! User interface module.
//!
//! The release tool never prompts; everything the user sees is printed
//! through [formatter].

pub mod formatter;

pub use formatter::{
    display_dry_run, display_error, display_last_version, display_release_instructions,
    display_repository, display_status, display_success, display_version_change,
    last_version_text, release_instructions_text,
};
