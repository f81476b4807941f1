use crate::error::{ReleaseError, Result};
use git2::{
    Branch, Cred, CredentialType, DescribeFormatOptions, DescribeOptions, FetchOptions,
    RemoteCallbacks, Repository as Git2Repo, Sort,
};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

/// Credential lookup for fetches: SSH keys from ~/.ssh, then the SSH agent,
/// then the configured credential helper for HTTPS remotes.
fn remote_callbacks<'a>(config: Option<git2::Config>) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(config) = config.as_ref() {
                if let Ok(cred) = Cred::credential_helper(config, url, username_from_url) {
                    return Ok(cred);
                }
            }
        }

        Cred::default()
    });
    callbacks
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            return Ok("HEAD".to_string());
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| git2::Error::from_str("branch name is not valid UTF-8").into())
    }

    fn update_remotes(&self) -> Result<()> {
        let remote_names = self.repo.remotes()?;

        for name in remote_names.iter().flatten() {
            tracing::debug!(remote = name, "fetching");

            let mut remote = self.repo.find_remote(name)?;
            let mut fetch_options = FetchOptions::new();
            fetch_options.remote_callbacks(remote_callbacks(self.repo.config().ok()));

            // Empty refspecs fall back to the remote's configured ones
            remote
                .fetch::<&str>(&[], Some(&mut fetch_options), None)
                .map_err(|e| ReleaseError::RemoteUpdate {
                    code: e.raw_code(),
                    message: format!("fetching '{}': {}", name, e.message()),
                })?;
        }

        Ok(())
    }

    fn unmerged_upstream_commits(&self) -> Result<String> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            tracing::warn!("HEAD is detached, skipping upstream comparison");
            return Ok(String::new());
        }

        let head_oid = head
            .target()
            .ok_or_else(|| git2::Error::from_str("HEAD has no target"))?;

        let upstream = match Branch::wrap(head).upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                tracing::warn!("current branch has no upstream, assuming it is up to date");
                return Ok(String::new());
            }
            Err(e) => return Err(e.into()),
        };

        let upstream_oid = upstream
            .get()
            .target()
            .ok_or_else(|| git2::Error::from_str("upstream branch has no target"))?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(upstream_oid)?;
        revwalk.hide(head_oid)?;

        let mut lines = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            let hash = oid.to_string();
            lines.push(format!("{} {}", &hash[..7], commit.summary().unwrap_or("")));
        }

        tracing::debug!(count = lines.len(), "upstream commits missing locally");
        Ok(lines.join("\n"))
    }

    fn repo_root(&self) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("bare repository has no working tree"))?;

        // Normalise away the trailing separator libgit2 reports
        Ok(workdir.components().collect())
    }

    fn latest_tag(&self) -> Result<String> {
        let mut options = DescribeOptions::new();
        options.describe_tags();

        let describe = self.repo.describe(&options).map_err(|e| {
            ReleaseError::tag(format!("cannot describe HEAD with tags: {}", e.message()))
        })?;

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);

        let tag = describe.format(Some(&format))?;
        tracing::debug!(tag = %tag, "latest tag");
        Ok(tag)
    }
}
