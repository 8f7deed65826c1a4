//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/katas/katas.toml`
//! 3. Environment variables: `KATAS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::TraversalOrder;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid setting {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("config error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub pyramid_width: Option<u32>,
    pub sequence_limit: Option<usize>,
    pub default_order: Option<String>,
    pub color: Option<bool>,
}

/// Unified configuration for katas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Width used by `katas pyramid` when none is given
    pub pyramid_width: u32,
    /// Maximum number of BST sequences listed by `katas tree sequences`
    pub sequence_limit: usize,
    /// Traversal used by `katas tree traverse` when `--order` is omitted
    pub default_order: String,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pyramid_width: 4,
            sequence_limit: 20,
            default_order: TraversalOrder::default().to_string(),
            color: true,
        }
    }
}

/// Get the XDG config directory for katas.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "katas").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("katas.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            pyramid_width: overlay.pyramid_width.unwrap_or(self.pyramid_width),
            sequence_limit: overlay.sequence_limit.unwrap_or(self.sequence_limit),
            default_order: overlay
                .default_order
                .clone()
                .unwrap_or_else(|| self.default_order.clone()),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence: defaults, global file, `KATAS_*`.
    #[instrument(level = "debug")]
    pub fn load() -> Result<Self, SettingsError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref())
    }

    /// Same as [`Settings::load`] with an explicit file in place of the global one.
    #[instrument(level = "debug")]
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(path) = path {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
            debug!(path = %path.display(), "applied config file");
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply KATAS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("KATAS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        if let Ok(val) = config.get::<u32>("pyramid_width") {
            settings.pyramid_width = val;
        }
        if let Ok(val) = config.get::<usize>("sequence_limit") {
            settings.sequence_limit = val;
        }
        if let Ok(val) = config.get_string("default_order") {
            settings.default_order = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.traversal_order().map(|_| ())
    }

    /// `default_order` parsed into a traversal.
    pub fn traversal_order(&self) -> Result<TraversalOrder, SettingsError> {
        self.default_order
            .parse()
            .map_err(|message| SettingsError::Invalid {
                key: "default_order".to_string(),
                message,
            })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# katas configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/katas/katas.toml
#   Env:    KATAS_* environment variables (explicit overrides)

# Width used by `katas pyramid` when none is given
# pyramid_width = 4

# Maximum number of BST sequences listed by `katas tree sequences`
# sequence_limit = 20

# Traversal used by `katas tree traverse`: in, pre, post, reverse, level
# default_order = "in"

# Colored output (NO_COLOR and CLICOLOR are honoured as well)
# color = true
"#
        .to_string()
    }
}
