#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::Mode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TarotError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PAYMENT_LINK: &str = "#";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration shared by the server and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub mode: Mode,
    pub log_to_disk: bool,
    pub data_dir: String,
    pub payment_link: String,
    pub production: bool,
    pub request_timeout_secs: u64,
    pub reversals: bool,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            mode: Mode::Auto,
            log_to_disk: true,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            payment_link: DEFAULT_PAYMENT_LINK.to_string(),
            production: false,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            reversals: false,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

fn is_true(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 從任意鍵值來源讀取設定 (環境變數或測試用的 map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mode = if lookup("DEMO_MODE").as_deref() == Some("true") {
            Mode::Demo
        } else {
            match lookup("TAROT_MODE") {
                Some(value) if !value.trim().is_empty() => value.parse()?,
                _ => defaults.mode,
            }
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => {
                value
                    .trim()
                    .parse()
                    .map_err(|_| TarotError::InvalidConfigValueError {
                        field: "REQUEST_TIMEOUT_SECS".to_string(),
                        value: value.clone(),
                        reason: "Expected a whole number of seconds".to_string(),
                    })?
            }
            None => defaults.request_timeout_secs,
        };

        Ok(Self {
            api_key: lookup("OPENAI_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            model: lookup("OPENAI_MODEL")
                .filter(|model| !model.trim().is_empty())
                .unwrap_or(defaults.model),
            api_base: lookup("OPENAI_BASE_URL").unwrap_or(defaults.api_base),
            mode,
            log_to_disk: lookup("LOG_TO_DISK").as_deref() != Some("false"),
            data_dir: lookup("TAROT_DATA_DIR").unwrap_or(defaults.data_dir),
            payment_link: lookup("PAYMENT_LINK_URL").unwrap_or(defaults.payment_link),
            production: lookup("APP_ENV").as_deref() == Some("production"),
            request_timeout_secs,
            reversals: lookup("TAROT_REVERSALS").is_some_and(|v| is_true(&v)),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }

    /// Overlay the keys a TOML file sets.
    pub fn merge_file(mut self, file: &TomlConfig) -> Result<Self> {
        if let Some(key) = file.api_key() {
            self.api_key = Some(key.to_string());
        }
        if let Some(mode) = &file.oracle.mode {
            self.mode = mode.parse()?;
        }
        if let Some(model) = &file.oracle.model {
            self.model = model.clone();
        }
        if let Some(api_base) = &file.oracle.api_base {
            self.api_base = api_base.clone();
        }
        if let Some(secs) = file.oracle.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(reversals) = file.oracle.reversals {
            self.reversals = reversals;
        }
        if let Some(log_to_disk) = file.journal.log_to_disk {
            self.log_to_disk = log_to_disk;
        }
        if let Some(data_dir) = &file.journal.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(bind_addr) = &file.server.bind_addr {
            self.bind_addr = bind_addr.clone();
        }
        if let Some(payment_link) = &file.server.payment_link {
            self.payment_link = payment_link.clone();
        }
        if let Some(production) = file.is_production() {
            self.production = production;
        }
        Ok(self)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl ConfigProvider for AppConfig {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn log_to_disk(&self) -> bool {
        self.log_to_disk
    }

    fn is_production(&self) -> bool {
        self.production
    }

    fn reversals(&self) -> bool {
        self.reversals
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_non_empty_string("model", &self.model)?;
        validate_path("data_dir", &self.data_dir)?;
        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 120)?;
        validate_non_empty_string("bind_addr", &self.bind_addr)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.mode, Mode::Auto);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_base, "https://api.openai.com/v1");
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.payment_link, "#");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.log_to_disk);
        assert!(!config.production);
        assert!(!config.reversals);
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_api_key_counts_as_absent() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key().is_none());

        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-1")])).unwrap();
        assert_eq!(config.api_key(), Some("sk-1"));
    }

    #[test]
    fn test_demo_mode_flag_wins() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DEMO_MODE", "true"),
            ("TAROT_MODE", "live"),
        ]))
        .unwrap();
        assert_eq!(config.mode, Mode::Demo);

        let config = AppConfig::from_lookup(lookup(&[("TAROT_MODE", "live")])).unwrap();
        assert_eq!(config.mode, Mode::Live);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("TAROT_MODE", "psychic")])).unwrap_err();
        assert!(matches!(err, TarotError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_log_to_disk_only_disabled_by_false() {
        let off = AppConfig::from_lookup(lookup(&[("LOG_TO_DISK", "false")])).unwrap();
        assert!(!off.log_to_disk);
        let on = AppConfig::from_lookup(lookup(&[("LOG_TO_DISK", "0")])).unwrap();
        assert!(on.log_to_disk);
    }

    #[test]
    fn test_timeout_validation() {
        let err = AppConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, TarotError::InvalidConfigValueError { .. }));

        let config = AppConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "0")])).unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_lookup(lookup(&[("REQUEST_TIMEOUT_SECS", "120")])).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_base_url_fails_validation() {
        let config =
            AppConfig::from_lookup(lookup(&[("OPENAI_BASE_URL", "ftp://example.com")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_and_reversals() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("TAROT_REVERSALS", "yes"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert!(config.reversals());
    }

    #[test]
    fn test_file_overrides_environment() {
        let env = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("TAROT_DATA_DIR", "env-data"),
        ]))
        .unwrap();
        let file = TomlConfig::from_toml_str(
            "[oracle]\nmode = \"demo\"\n[journal]\ndata_dir = \"file-data\"\n",
        )
        .unwrap();

        let merged = env.merge_file(&file).unwrap();
        assert_eq!(merged.mode, Mode::Demo);
        assert_eq!(merged.data_dir, "file-data");
        assert_eq!(merged.api_key(), Some("sk-env"));
    }
}
