//! Default path resolution for configuration files
//!
//! Uses the XDG config directory when available, falling back to `/etc`.

use std::path::PathBuf;

/// Directory holding every fanpanel configuration file.
///
/// - Linux/macOS: `~/.config/fanpanel`
/// - Fallback: `/etc/fanpanel`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("fanpanel")
}

/// Default location of the persisted fan settings (`fan.toml`).
pub fn default_fan_config_path() -> PathBuf {
    default_config_dir().join("fan.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fan_config_path_is_toml() {
        let path = default_fan_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        assert!(path.ends_with("fanpanel/fan.toml"));
    }

    #[test]
    fn test_default_config_dir_ends_with_fanpanel() {
        assert!(default_config_dir().ends_with("fanpanel"));
    }
}
