//! Vault and settings shared by the subcommands.

use anyhow::{Context as _, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing::debug;
use vnote::{DocumentHandle, OutputMode, Settings};
use vnote_vault::Vault;

/// Settings file looked up at the vault root.
pub const SETTINGS_FILE: &str = ".vnote.toml";

pub struct Context {
    pub vault: Vault,
    pub settings: Settings,
}

impl Context {
    pub fn load(root: &Path, config: Option<&Path>) -> Result<Self> {
        let vault =
            Vault::open(root).with_context(|| format!("Failed to open vault at {:?}", root))?;
        let settings = load_settings(root, config)?;
        debug!(root = ?vault.root(), ?settings, "vault opened");
        Ok(Self { vault, settings })
    }

    /// Resolve a note argument to a document in the vault.
    pub fn note(&self, arg: &str) -> Result<DocumentHandle> {
        self.vault
            .handle_for(arg)
            .ok_or_else(|| anyhow!("Note not found in vault: {}", arg))
    }

    /// The requested layout, or the configured default.
    pub fn mode(&self, requested: Option<OutputMode>) -> OutputMode {
        requested.unwrap_or(self.settings.default_mode)
    }
}

/// Load settings from `explicit`, or from the vault's settings file if it
/// exists. Missing keys take their defaults.
pub fn load_settings(root: &Path, explicit: Option<&Path>) -> Result<Settings> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = root.join(SETTINGS_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings {:?}", path))?;
    toml::from_str(&raw).with_context(|| format!("Invalid settings in {:?}", path))
}
