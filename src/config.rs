use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE_NAME: &str = ".roaring-release.toml";

/// Represents the complete configuration for the release tool.
///
/// Every section falls back to the Roaring layout when omitted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_project_prefix() -> String {
    "ROARING".to_string()
}

fn default_prerelease_script() -> String {
    "tools/prereleasetests.sh".to_string()
}

/// Release policy: which branch may release and how names are formed.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// The only branch releases may be cut from
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Prefix of the annotated tag in the printed instructions
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Prefix of generated macros and CMake variables (e.g. `ROARING_VERSION_MAJOR`)
    #[serde(default = "default_project_prefix")]
    pub project_prefix: String,

    /// Test script to run before tagging, relative to the repository root
    #[serde(default = "default_prerelease_script")]
    pub prerelease_script: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            branch: default_branch(),
            tag_prefix: default_tag_prefix(),
            project_prefix: default_project_prefix(),
            prerelease_script: default_prerelease_script(),
        }
    }
}

fn default_header() -> String {
    "include/roaring/roaring_version.h".to_string()
}

fn default_build_file() -> String {
    "CMakeLists.txt".to_string()
}

fn default_backup_suffix() -> String {
    ".bak".to_string()
}

/// Locations of the files rewritten by a release, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_header")]
    pub header: String,

    #[serde(default = "default_build_file")]
    pub build_file: String,

    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            header: default_header(),
            build_file: default_build_file(),
            backup_suffix: default_backup_suffix(),
        }
    }
}

/// Which implementation answers version-control queries
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GitBackend {
    /// libgit2 through the `git2` crate
    #[default]
    Git2,
    /// The `git` executable on PATH
    System,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct GitConfig {
    #[serde(default)]
    pub backend: GitBackend,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.roaring-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        Path::new(path).to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(USER_CONFIG_FILE_NAME);
        if user_path.exists() {
            user_path
        } else {
            tracing::debug!("no configuration file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path).map_err(|e| ReleaseError::file(&path, e))?;
    toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))
}
