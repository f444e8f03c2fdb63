use crate::adapters::narrative::{
    NarratorConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::engine::{utc_offset, DEFAULT_MIN_BIRTH_YEAR, DEFAULT_UTC_OFFSET_HOURS};
use crate::core::{EngineSettingsProvider, LuckyStrategy};
use crate::utils::error::{LuckError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use chrono::FixedOffset;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub engine: Option<EngineConfig>,
    pub narrative: Option<NarrativeConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub min_year: Option<i32>,
    pub utc_offset_hours: Option<i32>,
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LuckError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LuckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 ${VAR_NAME}；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LuckError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn utc_offset_hours(&self) -> i32 {
        self.engine
            .as_ref()
            .and_then(|e| e.utc_offset_hours)
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS)
    }

    pub fn narrative_enabled(&self) -> bool {
        self.narrative
            .as_ref()
            .and_then(|n| n.enabled)
            .unwrap_or(false)
    }

    /// Connection settings from `[narrative]` (defaults when absent). A missing or
    /// unresolved `api_key` falls back to `fallback_api_key`.
    pub fn narrator_config(&self, fallback_api_key: Option<String>) -> Result<NarratorConfig> {
        let narrative = self.narrative.clone().unwrap_or_default();

        // 檔案金鑰優先；未替換的 ${VAR} 視為未設定
        let api_key = narrative
            .api_key
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
            .or(fallback_api_key.filter(|key| !key.trim().is_empty()));
        let api_key = validate_required_field("narrative.api_key or GROQ_API_KEY", &api_key)?;

        Ok(NarratorConfig {
            endpoint: narrative
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key: api_key.clone(),
            model: narrative.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: narrative.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: narrative.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: Duration::from_secs(
                narrative.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(engine) = &self.engine {
            if let Some(min_year) = engine.min_year {
                validate_range("engine.min_year", min_year, 1, 9999)?;
            }
            if let Some(offset) = engine.utc_offset_hours {
                validate_range("engine.utc_offset_hours", offset, -12, 14)?;
            }
            if let Some(strategy) = &engine.strategy {
                if LuckyStrategy::parse(strategy).is_none() {
                    return Err(LuckError::InvalidConfigValueError {
                        field: "engine.strategy".to_string(),
                        value: strategy.clone(),
                        reason: "Valid strategies: wide, narrow".to_string(),
                    });
                }
            }
        }

        if let Some(narrative) = &self.narrative {
            if let Some(endpoint) = &narrative.endpoint {
                validate_url("narrative.endpoint", endpoint)?;
            }
            if let Some(model) = &narrative.model {
                validate_non_empty_string("narrative.model", model)?;
            }
            if let Some(temperature) = narrative.temperature {
                validate_range("narrative.temperature", temperature, 0.0, 2.0)?;
            }
            if let Some(max_tokens) = narrative.max_tokens {
                validate_positive_number("narrative.max_tokens", max_tokens, 1)?;
            }
        }

        Ok(())
    }
}

impl EngineSettingsProvider for TomlConfig {
    fn min_birth_year(&self) -> i32 {
        self.engine
            .as_ref()
            .and_then(|e| e.min_year)
            .unwrap_or(DEFAULT_MIN_BIRTH_YEAR)
    }

    fn reference_offset(&self) -> FixedOffset {
        utc_offset(self.utc_offset_hours())
    }

    fn strategy(&self) -> LuckyStrategy {
        self.engine
            .as_ref()
            .and_then(|e| e.strategy.as_deref())
            .and_then(LuckyStrategy::parse)
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[engine]
min_year = 1920
utc_offset_hours = 9
strategy = "narrow"

[narrative]
enabled = true
endpoint = "http://localhost:9000/v1"
model = "tiny"
api_key = "secret"
max_tokens = 80
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_birth_year(), 1920);
        assert_eq!(config.reference_offset().local_minus_utc(), 9 * 3600);
        assert_eq!(config.strategy(), LuckyStrategy::NarrowOffsetsWithRepair);

        let narrator = config.narrator_config(None).unwrap();
        assert_eq!(narrator.endpoint, "http://localhost:9000/v1");
        assert_eq!(narrator.model, "tiny");
        assert_eq!(narrator.max_tokens, 80);
        assert_eq!(narrator.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_birth_year(), 1900);
        assert_eq!(config.reference_offset().local_minus_utc(), 8 * 3600);
        assert_eq!(config.strategy(), LuckyStrategy::WideOffsets);
        assert!(!config.narrative_enabled());

        let narrator = config.narrator_config(Some("env-key".to_string())).unwrap();
        assert_eq!(narrator.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(narrator.model, DEFAULT_MODEL);
        assert_eq!(narrator.api_key, "env-key");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LUCKY_TEST_NARRATIVE_KEY", "from-env");

        let toml_content = r#"
[narrative]
enabled = true
api_key = "${LUCKY_TEST_NARRATIVE_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let narrator = config.narrator_config(Some("fallback".to_string())).unwrap();
        assert_eq!(narrator.api_key, "from-env");

        std::env::remove_var("LUCKY_TEST_NARRATIVE_KEY");
    }

    #[test]
    fn test_config_validation() {
        let bad_strategy = TomlConfig::from_toml_str("[engine]\nstrategy = \"random\"\n").unwrap();
        assert!(bad_strategy.validate().is_err());

        let bad_offset = TomlConfig::from_toml_str("[engine]\nutc_offset_hours = 20\n").unwrap();
        assert!(bad_offset.validate().is_err());

        let bad_url =
            TomlConfig::from_toml_str("[narrative]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_disabled_section_still_supplies_connection_settings() {
        let toml_content = r#"
[narrative]
enabled = false
endpoint = "http://localhost:9000/v1"
model = "file-model"
api_key = "${LUCKY_TEST_SURELY_UNSET_VAR}"
timeout_seconds = 5
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.narrative_enabled());

        let narrator = config.narrator_config(Some("env-key".to_string())).unwrap();
        assert_eq!(narrator.endpoint, "http://localhost:9000/v1");
        assert_eq!(narrator.model, "file-model");
        assert_eq!(narrator.api_key, "env-key");
        assert_eq!(narrator.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_api_key_everywhere_is_an_error() {
        let config = TomlConfig::from_toml_str("[narrative]\nenabled = true\n").unwrap();
        assert!(matches!(
            config.narrator_config(None),
            Err(LuckError::MissingConfigError { .. })
        ));

        let blank = TomlConfig::from_toml_str("[narrative]\napi_key = \"\"\n").unwrap();
        assert!(blank.narrator_config(Some(" ".to_string())).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[engine]\nstrategy = \"wide\"\nmin_year = 1930\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.min_birth_year(), 1930);
    }
}
