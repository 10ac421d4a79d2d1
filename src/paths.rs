//! Path resolution for mcm
//!
//! # Environment Variables
//!
//! - `MCM_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/mcm`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `MCM_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/mcm` (if set)
//! 3. `~/.config/mcm`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "MCM_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the mcm config directory path
pub fn config_dir() -> Result<PathBuf> {
    resolve_config_dir(
        std::env::var(ENV_CONFIG_DIR).ok(),
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
    )
}

/// Get the path of the config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

fn resolve_config_dir(
    override_dir: Option<String>,
    xdg_config: Option<String>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    // 1. Explicit override
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        let path = expand(&dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }

    // 2. XDG_CONFIG_HOME
    if let Some(xdg) = xdg_config.filter(|d| !d.is_empty()) {
        let path = PathBuf::from(xdg).join("mcm");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    // 3. ~/.config/mcm
    let home = home.context("Could not determine home directory")?;
    let path = home.join(".config").join("mcm");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let result = resolve_config_dir(
            Some("/custom/config/path".into()),
            Some("/xdg".into()),
            Some(PathBuf::from("/home/op")),
        )
        .unwrap();
        assert_eq!(result, PathBuf::from("/custom/config/path"));
    }

    #[test]
    fn test_override_with_tilde() {
        let home = dirs::home_dir().unwrap();
        let result = resolve_config_dir(Some("~/dotfiles/mcm".into()), None, None).unwrap();
        assert_eq!(result, home.join("dotfiles").join("mcm"));
    }

    #[test]
    fn test_xdg_config_home() {
        let result =
            resolve_config_dir(None, Some("/tmp/xdg".into()), Some(PathBuf::from("/home/op")))
                .unwrap();
        assert_eq!(result, PathBuf::from("/tmp/xdg/mcm"));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let result = resolve_config_dir(
            Some(String::new()),
            Some(String::new()),
            Some(PathBuf::from("/home/op")),
        )
        .unwrap();
        assert_eq!(result, PathBuf::from("/home/op/.config/mcm"));
    }

    #[test]
    fn test_no_home() {
        assert!(resolve_config_dir(None, None, None).is_err());
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_MCM_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_MCM_VAR_12345/file"));
    }
}
