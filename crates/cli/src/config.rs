//! Space definition loading.
//!
//! Declarations live in a `spaces.toml` file, probed from the following
//! locations (in order):
//! 1. the platform config directory (`~/Library/Application Support/yabactl`
//!    on macOS)
//! 2. `~/.config/yabactl/spaces.toml`
//! 3. `./spaces.toml` (current directory, for development)
//!
//! The file is an ordered array of `[[spaces]]` tables; the order defines
//! both the label assignment sequence and the on-display sort order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use yabactl_core::{validate_defs, SpaceDef};

/// File name probed in each config location.
pub const SPACES_FILE: &str = "spaces.toml";

/// On-disk shape of the declaration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpacesFile {
    #[serde(default)]
    pub spaces: Vec<SpaceEntry>,
}

/// One declared space.
///
/// # Example
///
/// ```toml
/// [[spaces]]
/// label = "1_files"
/// key = "1"
/// name = "files"
/// icon = "\u{1F4C1}"
/// color = "#8fbcbb"
/// display = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceEntry {
    /// Unique label applied to the space.
    pub label: String,

    /// Icon for notifications and status bars.
    #[serde(default)]
    pub icon: String,

    /// Preferred display (1-based arrangement index).
    pub display: u32,

    /// Shortcut key bound to the space.
    #[serde(default)]
    pub key: Option<String>,

    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,

    /// Accent color as "#rrggbb".
    #[serde(default)]
    pub color: Option<String>,
}

impl From<SpaceEntry> for SpaceDef {
    fn from(entry: SpaceEntry) -> Self {
        SpaceDef {
            label: entry.label,
            icon: entry.icon,
            display: entry.display,
            key: entry.key,
            name: entry.name,
            color: entry.color,
        }
    }
}

/// Load and validate the declared spaces.
///
/// With `explicit` set, only that path is considered; otherwise the
/// standard locations are probed in order.
pub fn load(explicit: Option<&Path>) -> Result<Vec<SpaceDef>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => path,
            None => bail!(
                "no {SPACES_FILE} found; create one in {}",
                config_paths()
                    .first()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "the config directory".to_string())
            ),
        },
    };

    tracing::debug!("loading space definitions from {}", path.display());
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid space definitions in {}", path.display()))
}

/// Parse and validate declaration file contents.
pub fn parse(content: &str) -> Result<Vec<SpaceDef>> {
    let file: SpacesFile = toml::from_str(content).context("failed to parse TOML")?;
    let defs: Vec<SpaceDef> = file.spaces.into_iter().map(Into::into).collect();
    validate_defs(&defs)?;
    Ok(defs)
}

/// All probed file paths, in priority order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(proj_dirs) = ProjectDirs::from("com", "yabactl", "yabactl") {
        paths.push(proj_dirs.config_dir().join(SPACES_FILE));
    }

    if let Some(base) = directories::BaseDirs::new() {
        paths.push(
            base.home_dir()
                .join(".config")
                .join("yabactl")
                .join(SPACES_FILE),
        );
    }

    paths.push(PathBuf::from(SPACES_FILE));

    paths
}
