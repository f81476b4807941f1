use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::Cell;
use std::path::PathBuf;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    branch: String,
    remote_update_code: Option<i32>,
    unmerged: String,
    root: PathBuf,
    tag: Option<String>,
    remote_updates: Cell<usize>,
}

impl MockRepository {
    /// Create a mock on `branch` rooted at `root`, up to date, without tags
    pub fn new(branch: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        MockRepository {
            branch: branch.into(),
            remote_update_code: None,
            unmerged: String::new(),
            root: root.into(),
            tag: None,
            remote_updates: Cell::new(0),
        }
    }

    /// Set the most recent tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Make `update_remotes` fail with the given status code
    pub fn with_remote_failure(mut self, code: i32) -> Self {
        self.remote_update_code = Some(code);
        self
    }

    /// Report these commits as present upstream but missing locally
    pub fn with_unmerged(mut self, commits: impl Into<String>) -> Self {
        self.unmerged = commits.into();
        self
    }

    /// Number of times `update_remotes` was called
    pub fn remote_updates(&self) -> usize {
        self.remote_updates.get()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn update_remotes(&self) -> Result<()> {
        self.remote_updates.set(self.remote_updates.get() + 1);
        match self.remote_update_code {
            Some(code) => Err(ReleaseError::RemoteUpdate {
                code,
                message: "mock remote update failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn unmerged_upstream_commits(&self) -> Result<String> {
        Ok(self.unmerged.clone())
    }

    fn repo_root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn latest_tag(&self) -> Result<String> {
        self.tag
            .clone()
            .ok_or_else(|| ReleaseError::tag("No names found, cannot describe anything."))
    }
}
