pub mod schema;

pub use schema::{ClassifierConfig, OverlayConfig, PaletteConfig, ReadbarConfig, ReplayConfig};

use readbar_core::{ReadbarError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "READBAR_CONFIG";

/// Read and validate `readbar.toml`.
///
/// A missing file is not an error: the overlay runs on built-in defaults.
/// Unreadable files, bad TOML and out-of-range values are.
pub fn load(path: impl AsRef<Path>) -> Result<ReadbarConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "no config file; using defaults");
        return Ok(ReadbarConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ReadbarError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config = parse(&raw)?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<ReadbarConfig> {
    let config: ReadbarConfig =
        toml::from_str(raw).map_err(|e| ReadbarError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Config file to use: `$READBAR_CONFIG` when set, else [`default_path`].
pub fn config_path() -> PathBuf {
    resolve_path(std::env::var_os(CONFIG_ENV))
}

/// An explicit, non-empty override wins over the XDG location.
pub fn resolve_path(explicit: Option<OsString>) -> PathBuf {
    explicit
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_path)
}

/// `$XDG_CONFIG_HOME/readbar/readbar.toml`, falling back to `~/.config`.
pub fn default_path() -> PathBuf {
    xdg_path(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
}

fn xdg_path(xdg_config_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let base = match xdg_config_home.filter(|p| !p.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(home.unwrap_or_else(|| ".".into())).join(".config"),
    };
    base.join("readbar").join("readbar.toml")
}
