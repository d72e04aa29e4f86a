//! CLI configuration.
//!
//! Loaded from a RON file passed with `--config`; flags override it.
//!
//! ```ron
//! (
//!     base_dir: Some("/srv/unifs"),
//!     root: "/notes",
//!     options: (use_etag: true),
//! )
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use unifs::FsOptions;

/// Settings for the `unifs` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory the local driver is rooted at. Defaults to the user data dir.
    pub base_dir: Option<PathBuf>,
    /// Repository root inside the base directory.
    pub root: String,
    pub options: FsOptions,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            root: "/".to_string(),
            options: FsOptions::default(),
        }
    }
}

impl CliConfig {
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).context("invalid config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Base directory, falling back to `$XDG_DATA_HOME/unifs` (or platform equivalent).
    pub fn resolved_base_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.base_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("unifs"))
            .context("no data directory on this platform, pass --base-dir")
    }
}
