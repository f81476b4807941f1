//! Main release workflow
//!
//! Runs the release steps against any [Repository], so the same code drives
//! real repositories from `main.rs` and mocks in tests. Every precondition is
//! checked before the first file is touched.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::{Version, VersionBump};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::rewrite::{build_file, header};
use crate::ui;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Requested version, `major.minor.revision`
    pub version: Option<String>,

    /// Validate and preview without writing files
    pub dry_run: bool,
}

/// Result of a successful release preparation
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Version read from the latest tag
    pub previous: Version,

    /// Version written to the header and build file
    pub version: Version,

    /// Component that was incremented
    pub bump: VersionBump,

    /// Generated header location
    pub header: PathBuf,

    /// Patched build file location
    pub build_file: PathBuf,

    /// Backup of the build file, `None` on a dry run
    pub backup: Option<PathBuf>,

    /// Build file lines that changed (or would change)
    pub changed_lines: usize,

    /// Whether files were written
    pub written: bool,
}

/// Refuse to release from anywhere but the configured branch
pub fn check_branch<R: Repository + ?Sized>(repo: &R, expected: &str) -> Result<()> {
    let actual = repo.current_branch()?;
    tracing::debug!(branch = %actual, "current branch");

    if actual != expected {
        return Err(ReleaseError::WrongBranch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Refuse to release while upstream has commits the local branch lacks
pub fn check_up_to_date<R: Repository + ?Sized>(repo: &R) -> Result<()> {
    let commits = repo.unmerged_upstream_commits()?;
    if !commits.trim().is_empty() {
        return Err(ReleaseError::OutOfSync { commits });
    }
    Ok(())
}

/// Pick the release version and check it is a single step after `current`.
///
/// Without an explicit request this only suggests the next revision and
/// fails, so a release always needs the version typed out.
pub fn resolve_target(current: &Version, requested: Option<&str>) -> Result<(Version, VersionBump)> {
    let requested = requested.ok_or(ReleaseError::MissingVersion {
        suggested: current.suggested_next(),
    })?;

    let next = Version::from_argument(requested)?;
    let bump = current.validate_successor(&next)?;
    Ok((next, bump))
}

fn in_repo(root: &Path, relative: &str) -> PathBuf {
    root.join(relative.trim_start_matches('/'))
}

/// Main release workflow
///
/// 1. Check the current branch
/// 2. Update remotes
/// 3. Check nothing upstream is missing locally
/// 4. Resolve the repository root
/// 5. Read the current version from the latest tag
/// 6. Resolve and validate the requested version
/// 7. Read and patch the build file in memory
/// 8. Regenerate the version header
/// 9. Write the patched build file, keeping a backup
/// 10. Print the manual commit/tag/push steps
pub fn run_release_workflow<R: Repository + ?Sized>(
    repo: &R,
    args: &ReleaseWorkflowArgs,
    config: &Config,
) -> Result<ReleaseOutcome> {
    check_branch(repo, &config.release.branch)?;

    ui::display_status("Updating remotes...");
    repo.update_remotes()?;

    check_up_to_date(repo)?;

    let root = repo.repo_root()?;
    ui::display_repository(&root);

    let tag = repo.latest_tag()?;
    let current = Version::from_tag(&tag)?;
    ui::display_last_version(&tag);
    tracing::debug!(%tag, version = %current, "parsed current version");

    ui::display_status("checking that new version is valid");
    let (version, bump) = resolve_target(&current, args.version.as_deref())?;
    ui::display_version_change(&current, &version, bump);

    let prefix = &config.release.project_prefix;
    let header_path = in_repo(&root, &config.files.header);
    let build_file_path = in_repo(&root, &config.files.build_file);
    let header_text = header::render_header(&config.files.header, prefix, &version);
    let rules = build_file::version_rules(prefix, &version)?;

    // Read and patch in memory first, so a bad build file stops the release
    // before the header is rewritten
    let pending = build_file::prepare_patch(&build_file_path, &rules)?;

    if args.dry_run {
        ui::display_dry_run(
            &header_path,
            &header_text,
            pending.path(),
            pending.changed_lines(),
        );

        return Ok(ReleaseOutcome {
            previous: current,
            version,
            bump,
            header: header_path,
            changed_lines: pending.changed_lines(),
            build_file: build_file_path,
            backup: None,
            written: false,
        });
    }

    header::write_header(&header_path, &header_text)?;
    ui::display_success(&format!("{} modified", header_path.display()));

    let report = pending.commit(&config.files.backup_suffix)?;
    ui::display_success(&format!(
        "modified {}, a backup was made",
        report.path.display()
    ));

    let script = in_repo(&root, &config.release.prerelease_script);
    ui::display_release_instructions(&script, &version, &config.release.tag_prefix);

    tracing::info!(from = %current, to = %version, "release files updated");

    Ok(ReleaseOutcome {
        previous: current,
        version,
        bump,
        header: header_path,
        build_file: report.path,
        backup: Some(report.backup),
        changed_lines: report.changed_lines,
        written: true,
    })
}
