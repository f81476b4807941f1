//! Git operations abstraction layer
//!
//! A release only needs five questions answered by version control, so they
//! sit behind the [Repository] trait and the release workflow never talks to
//! git directly.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: answers through the `git2` crate
//! - [system::SystemGit]: shells out to the `git` executable
//! - [mock::MockRepository]: canned answers for tests
//!
//! ```rust
//! # use roaring_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> roaring_release::Result<()> {
//! let branch = repo.current_branch()?;
//! let tag = repo.latest_tag()?;
//! println!("{} is at {}", branch, tag);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;
pub mod system;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use system::SystemGit;

use std::path::{Path, PathBuf};

use crate::config::GitBackend;
use crate::error::Result;

/// Version-control queries needed to cut a release
///
/// ## Error Handling
///
/// Implementations map their underlying failures (`git2::Error`, a non-zero
/// exit from `git`) to [crate::error::ReleaseError] variants.
/// [Repository::update_remotes] must report failure as
/// [crate::error::ReleaseError::RemoteUpdate] so the caller can propagate
/// its status code.
pub trait Repository {
    /// Name of the checked out branch, or `HEAD` when detached
    fn current_branch(&self) -> Result<String>;

    /// Fetch every configured remote so upstream tracking refs are current
    fn update_remotes(&self) -> Result<()>;

    /// Commits on the upstream of the current branch that are not in `HEAD`,
    /// one `<short-hash> <summary>` per line. Empty means up to date.
    fn unmerged_upstream_commits(&self) -> Result<String>;

    /// Top-level directory of the working tree
    fn repo_root(&self) -> Result<PathBuf>;

    /// Most recent tag reachable from `HEAD`
    fn latest_tag(&self) -> Result<String>;
}

impl<R: Repository + ?Sized> Repository for Box<R> {
    fn current_branch(&self) -> Result<String> {
        (**self).current_branch()
    }

    fn update_remotes(&self) -> Result<()> {
        (**self).update_remotes()
    }

    fn unmerged_upstream_commits(&self) -> Result<String> {
        (**self).unmerged_upstream_commits()
    }

    fn repo_root(&self) -> Result<PathBuf> {
        (**self).repo_root()
    }

    fn latest_tag(&self) -> Result<String> {
        (**self).latest_tag()
    }
}

/// Open the repository containing `path` with the chosen backend
pub fn open(backend: GitBackend, path: &Path) -> Result<Box<dyn Repository>> {
    tracing::debug!(?backend, path = %path.display(), "opening repository");
    match backend {
        GitBackend::Git2 => Ok(Box::new(Git2Repository::open(path)?)),
        GitBackend::System => Ok(Box::new(SystemGit::open(path)?)),
    }
}
