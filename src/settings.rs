//! Settings file loading.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use color_eyre::eyre::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use filetree_scan::ScanConfig;

const APP_DIR: &str = "filetree";
const SETTINGS_FILE: &str = "config.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Persistent defaults for the command line.
///
/// ```toml
/// timeout_secs = 30
/// output_dir = "~/trees"   # ~ expands to the home directory
///
/// [scan]
/// max_depth = -1
/// show_hidden = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scan policy.
    pub scan: ScanConfig,
    /// Scan budget in seconds; 0 disables the deadline.
    pub timeout_secs: u64,
    /// Directory for `--save` output (current directory when unset). A
    /// leading `~` stands for the home directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: None,
        }
    }
}

impl Settings {
    /// Location of the per-user settings file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from `explicit`, or from the per-user file when it
    /// exists. An explicitly named file must exist and parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = Self::parse(&content)
            .wrap_err_with(|| format!("Invalid settings file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let mut settings: Self = toml::from_str(content)?;
        settings.scan.validate().wrap_err("Invalid [scan] section")?;
        if Instant::now()
            .checked_add(Duration::from_secs(settings.timeout_secs))
            .is_none()
        {
            bail!("timeout_secs is too large: {}", settings.timeout_secs);
        }
        settings.output_dir = settings.output_dir.map(expand_home);
        Ok(settings)
    }
}

/// Replace a leading `~` with the home directory, when one is known.
fn expand_home(path: PathBuf) -> PathBuf {
    let rest = path.strip_prefix("~").ok().map(Path::to_path_buf);
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}
