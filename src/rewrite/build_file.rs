//! In-place version patching of the CMake build file.
//!
//! Each line runs through an ordered list of [PatchRule]s. Lines no rule
//! matches come out byte-for-byte identical, line endings included.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use tempfile::NamedTempFile;

use crate::domain::Version;
use crate::error::{ReleaseError, Result};

/// A single search-and-replace applied to every line
#[derive(Debug, Clone)]
pub struct PatchRule {
    pattern: Regex,
    replacement: String,
}

impl PatchRule {
    /// Build a rule from a regex and a literal replacement
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ReleaseError::config(format!("invalid pattern '{}': {}", pattern, e)))?;
        Ok(PatchRule {
            pattern,
            replacement: replacement.into(),
        })
    }

    /// Replace every match in `line`
    pub fn apply(&self, line: &str) -> String {
        self.pattern
            .replace_all(line, NoExpand(&self.replacement))
            .into_owned()
    }
}

/// The five rules that carry a release version into `CMakeLists.txt`:
/// library version, so-version (major only), and the three
/// `PROJECT_VERSION_*` components.
pub fn version_rules(prefix: &str, version: &Version) -> Result<Vec<PatchRule>> {
    let escaped = regex::escape(prefix);

    Ok(vec![
        PatchRule::new(
            &format!(r#"{escaped}_LIB_VERSION "\d+\.\d+\.\d+"#),
            format!(r#"{prefix}_LIB_VERSION "{version}"#),
        )?,
        PatchRule::new(
            &format!(r#"{escaped}_LIB_SOVERSION "\d+"#),
            format!(r#"{prefix}_LIB_SOVERSION "{}"#, version.major),
        )?,
        PatchRule::new(
            r"set\(PROJECT_VERSION_MAJOR \d+",
            format!("set(PROJECT_VERSION_MAJOR {}", version.major),
        )?,
        PatchRule::new(
            r"set\(PROJECT_VERSION_MINOR \d+",
            format!("set(PROJECT_VERSION_MINOR {}", version.minor),
        )?,
        PatchRule::new(
            r"set\(PROJECT_VERSION_PATCH \d+",
            format!("set(PROJECT_VERSION_PATCH {}", version.revision),
        )?,
    ])
}

/// Apply `rules` in order to one line
pub fn patch_line(line: &str, rules: &[PatchRule]) -> String {
    rules
        .iter()
        .fold(line.to_string(), |line, rule| rule.apply(&line))
}

/// Patched text plus the number of lines that changed
#[derive(Debug, Clone, PartialEq)]
pub struct PatchedContent {
    pub text: String,
    pub changed_lines: usize,
}

/// Apply `rules` to every line of `content`, keeping line terminators as-is
pub fn patch_content(content: &str, rules: &[PatchRule]) -> PatchedContent {
    let mut text = String::with_capacity(content.len());
    let mut changed_lines = 0;

    for line in content.split_inclusive('\n') {
        let patched = patch_line(line, rules);
        if patched != line {
            changed_lines += 1;
        }
        text.push_str(&patched);
    }

    PatchedContent {
        text,
        changed_lines,
    }
}

/// Outcome of patching a file on disk
#[derive(Debug, Clone, PartialEq)]
pub struct PatchReport {
    pub path: PathBuf,
    pub backup: PathBuf,
    pub changed_lines: usize,
}

/// `CMakeLists.txt` + `.bak` -> `CMakeLists.txt.bak`
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// A build file read from disk and patched in memory, not yet written back
#[derive(Debug, Clone)]
pub struct PendingPatch {
    path: PathBuf,
    original: String,
    patched: PatchedContent,
}

/// Read the file at `path` and apply `rules` to it without touching the disk.
pub fn prepare_patch(path: &Path, rules: &[PatchRule]) -> Result<PendingPatch> {
    let original = fs::read_to_string(path).map_err(|e| ReleaseError::file(path, e))?;
    let patched = patch_content(&original, rules);

    Ok(PendingPatch {
        path: path.to_path_buf(),
        original,
        patched,
    })
}

impl PendingPatch {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn changed_lines(&self) -> usize {
        self.patched.changed_lines
    }

    /// Write the patched content over the original file.
    ///
    /// The original content is saved next to it with `backup_suffix` appended.
    /// The new content is written to a temporary file in the same directory and
    /// renamed over the original once fully written.
    pub fn commit(self, backup_suffix: &str) -> Result<PatchReport> {
        let path = self.path.as_path();

        let backup = backup_path(path, backup_suffix);
        fs::write(&backup, &self.original).map_err(|e| ReleaseError::file(&backup, e))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ReleaseError::file(dir, e))?;
        tmp.write_all(self.patched.text.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| ReleaseError::file(tmp.path(), e))?;

        // Keep the original permissions on the replacement
        let metadata = fs::metadata(path).map_err(|e| ReleaseError::file(path, e))?;
        fs::set_permissions(tmp.path(), metadata.permissions())
            .map_err(|e| ReleaseError::file(tmp.path(), e))?;

        tmp.persist(path)
            .map_err(|e| ReleaseError::file(path, e.error))?;

        tracing::debug!(
            path = %path.display(),
            changed = self.patched.changed_lines,
            "patched build file"
        );

        Ok(PatchReport {
            path: self.path,
            backup,
            changed_lines: self.patched.changed_lines,
        })
    }
}
