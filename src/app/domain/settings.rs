use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app::infrastructure::error::AppError;
use crate::app::infrastructure::platform::detect_system_dark_mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeMode {
    Light,
    Dark,
    SystemDefault,
}

impl ThemeMode {
    /// Resolve to a concrete dark/light flag, probing the desktop for `SystemDefault`.
    pub fn is_dark(self) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::SystemDefault => detect_system_dark_mode(),
        }
    }
}

/// Typeface used for the poem text. Persisted as its integer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FontChoice {
    /// Jiangxi Zhuokai brush face
    #[default]
    Primary,
    /// LXGW WenKai
    Secondary,
}

impl FontChoice {
    pub fn index(self) -> i64 {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }

    /// Unknown indices map to `None` so callers can fall back to the default.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Primary),
            1 => Some(Self::Secondary),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Primary => "江西拙楷",
            Self::Secondary => "霞鹜文楷",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,

    /// Seconds between automatic refreshes in watch mode
    #[serde(default = "default_delay_secs")]
    pub default_delay_secs: u32,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Overrides the bundled palette asset
    #[serde(default)]
    pub palette_path: Option<PathBuf>,

    /// Overrides the preferences file location
    #[serde(default)]
    pub prefs_path: Option<PathBuf>,
}

fn default_theme_mode() -> ThemeMode {
    ThemeMode::SystemDefault
}

fn default_delay_secs() -> u32 {
    30
}

fn default_api_base_url() -> String {
    "https://v2.jinrishici.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme_mode: default_theme_mode(),
            default_delay_secs: default_delay_secs(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            palette_path: None,
            prefs_path: None,
        }
    }
}

impl AppConfig {
    /// Load config from `path` (or the default location), creating defaults if missing.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::get_config_path);

        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => config.sanitized(),
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                let default = Self::default();
                // Try to save defaults for next time
                if let Err(e) = default.save_to(&config_path) {
                    debug!(error = %e, "could not write default config");
                }
                default
            }
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), AppError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("wavepoem");
        path.push("config.json");
        path
    }

    /// Preferences file backing the key-value settings store.
    pub fn prefs_path(&self) -> PathBuf {
        self.prefs_path.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("wavepoem");
            path.push("prefs.json");
            path
        })
    }

    fn sanitized(mut self) -> Self {
        if self.default_delay_secs == 0 {
            warn!("default_delay_secs must be positive, using {}", default_delay_secs());
            self.default_delay_secs = default_delay_secs();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.theme_mode, ThemeMode::SystemDefault);
        assert_eq!(config.default_delay_secs, 30);
        assert_eq!(config.api_base_url, "https://v2.jinrishici.com");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.palette_path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"theme_mode": "Dark"}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.theme_mode, ThemeMode::Dark);
        assert_eq!(config.default_delay_secs, 30);
    }

    #[test]
    fn test_load_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig::load(Some(&path));

        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_round_trips_saved_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = AppConfig {
            theme_mode: ThemeMode::Light,
            default_delay_secs: 5,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load(Some(&path)), config);
    }

    #[test]
    fn test_zero_delay_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_delay_secs": 0}"#).unwrap();

        assert_eq!(AppConfig::load(Some(&path)).default_delay_secs, 30);
    }

    #[test]
    fn test_garbage_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(AppConfig::load(Some(&path)), AppConfig::default());
    }

    #[test]
    fn test_font_index_mapping() {
        assert_eq!(FontChoice::Primary.index(), 0);
        assert_eq!(FontChoice::Secondary.index(), 1);
        assert_eq!(FontChoice::from_index(1), Some(FontChoice::Secondary));
        assert_eq!(FontChoice::from_index(7), None);
        assert_eq!(FontChoice::default(), FontChoice::Primary);
    }

    #[test]
    fn test_explicit_theme_modes() {
        assert!(ThemeMode::Dark.is_dark());
        assert!(!ThemeMode::Light.is_dark());
    }
}
