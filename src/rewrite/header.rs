//! Generated version header.
//!
//! The header is rewritten from scratch on every release; downstream builds
//! read it, so the layout (including trailing spaces) must stay stable.

use std::fs;
use std::path::Path;

use crate::domain::Version;
use crate::error::{ReleaseError, Result};

/// Render the header announcing `version`.
///
/// `relative_path` is the header's location inside the repository and is only
/// used in the do-not-edit notice. `prefix` names the project, e.g. `ROARING`.
pub fn render_header(relative_path: &str, prefix: &str, version: &Version) -> String {
    let notice_path = format!("/{}", relative_path.trim_start_matches('/'));
    let guard = format!("{prefix}_INCLUDE_{prefix}_VERSION");

    let mut out = String::new();
    out.push_str(&format!(
        "// {notice_path} automatically generated by release, do not change by hand \n"
    ));
    out.push_str(&format!("#ifndef {guard} \n"));
    out.push_str(&format!("#define {guard} \n"));
    out.push_str(&format!("#define {prefix}_VERSION = {version},  \n"));
    out.push_str("enum { \n");
    out.push_str(&format!("    {prefix}_VERSION_MAJOR = {},  \n", version.major));
    out.push_str(&format!("    {prefix}_VERSION_MINOR = {},  \n", version.minor));
    out.push_str(&format!("    {prefix}_VERSION_REVISION = {}  \n", version.revision));
    out.push_str("}; \n");
    out.push_str(&format!("#endif // {guard} \n"));
    out
}

/// Overwrite the header at `path` with `contents`.
pub fn write_header(path: &Path, contents: &str) -> Result<()> {
    tracing::debug!(path = %path.display(), "writing version header");
    fs::write(path, contents).map_err(|e| ReleaseError::file(path, e))
}
