//! System git backend
//!
//! Runs the `git` executable and reads its text output. Useful where libgit2
//! cannot authenticate against a remote the user's git can reach.

use crate::error::{ReleaseError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using the system `git` binary
pub struct SystemGit {
    /// Directory every command runs in
    repo_path: PathBuf,
}

impl SystemGit {
    /// Open the repository containing `path`.
    ///
    /// Fails when `path` is not inside a git working tree.
    pub fn open(path: &Path) -> Result<Self> {
        let git = SystemGit {
            repo_path: path.to_path_buf(),
        };
        git.run(&["rev-parse", "--git-dir"])?;
        Ok(git)
    }

    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.repo_path);
        cmd
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(?args, "running git");
        self.git_cmd().args(args).output().map_err(|e| ReleaseError::GitCommand {
            command: format!("git {}", args.join(" ")),
            stderr: e.to_string(),
        })
    }

    /// Run a query and return its trimmed stdout
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;

        if !output.status.success() {
            return Err(ReleaseError::GitCommand {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl super::Repository for SystemGit {
    fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn update_remotes(&self) -> Result<()> {
        // Progress goes straight to the terminal
        let status = self
            .git_cmd()
            .args(["remote", "update"])
            .status()
            .map_err(|e| ReleaseError::GitCommand {
                command: "git remote update".to_string(),
                stderr: e.to_string(),
            })?;

        if status.success() {
            return Ok(());
        }

        Err(ReleaseError::RemoteUpdate {
            code: status.code().unwrap_or(crate::error::FAILURE_EXIT_CODE),
            message: "git remote update did not succeed".to_string(),
        })
    }

    fn unmerged_upstream_commits(&self) -> Result<String> {
        let args = ["log", "HEAD..@{upstream}", "--oneline"];
        let output = self.output(&args)?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("no upstream") || stderr.contains("HEAD does not point to a branch") {
            tracing::warn!("current branch has no upstream, assuming it is up to date");
            return Ok(String::new());
        }

        Err(ReleaseError::GitCommand {
            command: format!("git {}", args.join(" ")),
            stderr: stderr.trim().to_string(),
        })
    }

    fn repo_root(&self) -> Result<PathBuf> {
        self.run(&["rev-parse", "--show-toplevel"]).map(PathBuf::from)
    }

    fn latest_tag(&self) -> Result<String> {
        self.run(&["describe", "--abbrev=0", "--tags"])
            .map_err(|e| ReleaseError::tag(format!("cannot describe HEAD with tags: {}", e)))
    }
}
