//! Locating and loading `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use urlscope_core::AppConfig;
use xdg::BaseDirectories;

/// Subdirectory under every XDG base directory; also names the log file.
pub const APP_NAME: &str = "urlscope";

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "URLSCOPE_API_URL";

pub fn base_dirs() -> Result<BaseDirectories> {
    Ok(BaseDirectories::with_prefix(APP_NAME)?)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(base_dirs()?.place_config_file("config.toml")?)
}

/// `~/.local/state/urlscope/urlscope.log`
pub fn log_path() -> Result<PathBuf> {
    Ok(base_dirs()?.get_state_home().join(format!("{APP_NAME}.log")))
}

/// Load configuration from `path`, creating a default file if none exists.
pub fn load_or_init(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let default_cfg = AppConfig::default();
        let toml = default_cfg.to_toml_string()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), "wrote default config");
        return Ok(default_cfg);
    }

    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg =
        AppConfig::from_toml_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

/// Apply overrides in increasing precedence: environment, then flag.
pub fn apply_overrides(
    mut cfg: AppConfig,
    env_url: Option<String>,
    flag_url: Option<String>,
) -> AppConfig {
    if let Some(url) = flag_url.or(env_url).filter(|u| !u.trim().is_empty()) {
        cfg.api_base_url = url;
    }
    cfg
}
