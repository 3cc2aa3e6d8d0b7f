use crate::utils::error::{Result, TarotError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional file layer. Every key may be omitted; whatever is set here
/// overrides the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerSection,
    pub oracle: OracleSection,
    pub journal: JournalSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind_addr: Option<String>,
    pub payment_link: Option<String>,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    pub mode: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub reversals: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalSection {
    pub log_to_disk: Option<bool>,
    pub data_dir: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TarotError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// API key, ignoring empty values and unresolved `${VAR}` placeholders.
    pub fn api_key(&self) -> Option<&str> {
        self.oracle
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    pub fn is_production(&self) -> Option<bool> {
        self.server
            .environment
            .as_deref()
            .map(|env| env.trim().eq_ignore_ascii_case("production"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:8080"
payment_link = "https://buy.example.com/tarot"
environment = "production"

[oracle]
mode = "live"
api_key = "sk-file"
model = "gpt-4o"
api_base = "https://proxy.example.com/v1"
request_timeout_secs = 12
reversals = true

[journal]
log_to_disk = false
data_dir = "/var/lib/tarot"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.bind_addr.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(config.is_production(), Some(true));
        assert_eq!(config.oracle.mode.as_deref(), Some("live"));
        assert_eq!(config.api_key(), Some("sk-file"));
        assert_eq!(config.oracle.request_timeout_secs, Some(12));
        assert_eq!(config.oracle.reversals, Some(true));
        assert_eq!(config.journal.log_to_disk, Some(false));
    }

    #[test]
    fn test_every_section_is_optional() {
        let config = TomlConfig::from_toml_str("[oracle]\nmode = \"demo\"\n").unwrap();
        assert!(config.server.bind_addr.is_none());
        assert!(config.journal.data_dir.is_none());
        assert!(config.is_production().is_none());

        let empty = TomlConfig::from_toml_str("").unwrap();
        assert!(empty.oracle.mode.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TAROT_TEST_TOML_KEY", "sk-from-env");
        let config =
            TomlConfig::from_toml_str("[oracle]\napi_key = \"${TAROT_TEST_TOML_KEY}\"\n").unwrap();
        assert_eq!(config.api_key(), Some("sk-from-env"));
        std::env::remove_var("TAROT_TEST_TOML_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_key() {
        let config =
            TomlConfig::from_toml_str("[oracle]\napi_key = \"${TAROT_TEST_MISSING_VAR}\"\n")
                .unwrap();
        assert_eq!(
            config.oracle.api_key.as_deref(),
            Some("${TAROT_TEST_MISSING_VAR}")
        );
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[oracle\nmode = ").unwrap_err();
        assert!(matches!(err, TarotError::TomlError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[journal]\ndata_dir = \"journal\"").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.journal.data_dir.as_deref(), Some("journal"));
    }
}
