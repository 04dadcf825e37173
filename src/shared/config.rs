//! Application configuration. API credentials, session path, defaults.

use serde::Deserialize;

/// Default guard against unbounded profile-photo enumeration. Arbitrary
/// bound, overridable via TG_LENS_PHOTO_SCAN_CAP.
pub const DEFAULT_PHOTO_SCAN_CAP: usize = 1_000_000;

/// Fallback zone when neither --tz nor TZ is set.
pub const DEFAULT_TZ: &str = "Europe/Paris";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub api_id: Option<i32>,
    pub api_hash: Option<String>,
    /// Phone used for the initial login (the operator's own account).
    pub phone: Option<String>,
    pub session_path: Option<String>,
    /// Default time zone for formatted timestamps. Read from TG_LENS_TZ.
    #[serde(default)]
    pub tz: Option<String>,
    /// Photo-enumeration safety cap. Read from TG_LENS_PHOTO_SCAN_CAP.
    #[serde(default)]
    pub photo_scan_cap: Option<usize>,
}

impl AppConfig {
    /// Load from TG_LENS_* environment variables plus the optional config
    /// file named by TG_LENS_CONFIG. A file that is named but unreadable or
    /// malformed is an error, not a silent fallback.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let file = std::env::var("TG_LENS_CONFIG").ok();
        Self::load_with(file.as_deref())
    }

    fn load_with(file: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TG_LENS"));
        if let Some(path) = file {
            c = c.add_source(config::File::with_name(path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // Bare TG_* variables are accepted as shorter aliases.
        if cfg.api_id.is_none() {
            if let Ok(s) = std::env::var("TG_API_ID") {
                cfg.api_id = s.parse().ok();
            }
        }
        if cfg.api_hash.is_none() {
            cfg.api_hash = std::env::var("TG_API_HASH").ok();
        }
        if cfg.phone.is_none() {
            cfg.phone = std::env::var("TG_PHONE").ok();
        }
        if cfg.session_path.is_none() {
            cfg.session_path = std::env::var("TG_SESSION").ok();
        }
        Ok(cfg)
    }

    /// Zone name to use when --tz is absent: TG_LENS_TZ, then TZ, then the
    /// fixed fallback.
    pub fn tz_or_default(&self) -> String {
        self.tz
            .clone()
            .or_else(|| std::env::var("TZ").ok())
            .unwrap_or_else(|| DEFAULT_TZ.to_string())
    }

    pub fn photo_scan_cap_or_default(&self) -> usize {
        self.photo_scan_cap.unwrap_or(DEFAULT_PHOTO_SCAN_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("tg-lens-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn named_config_file_is_parsed() {
        let path = temp_file("good.toml", "api_id = 12345\ntz = \"Asia/Almaty\"\n");
        let cfg = AppConfig::load_with(path.to_str()).unwrap();
        assert_eq!(cfg.api_id, Some(12345));
        assert_eq!(cfg.tz.as_deref(), Some("Asia/Almaty"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let path = temp_file("bad.toml", "api_id = [not toml\n");
        assert!(AppConfig::load_with(path.to_str()).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_named_config_file_is_an_error() {
        let path = std::env::temp_dir().join("tg-lens-definitely-absent.toml");
        assert!(AppConfig::load_with(path.to_str()).is_err());
    }
}
