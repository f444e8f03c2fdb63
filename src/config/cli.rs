use crate::config::toml_config::TomlConfig;
use crate::core::engine::{utc_offset, EngineSettings};
use crate::core::{EngineSettingsProvider, LuckyStrategy};
use crate::utils::error::{LuckError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "lucky-numerology")]
#[command(about = "Life-Path, Personal-Day and lucky numbers from a birth date")]
pub struct CliConfig {
    /// Birth date as YYYY-MM-DD or YYYY/MM/DD
    #[arg(long)]
    pub birth: String,

    /// Compute for this day instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Lucky-number strategy: wide or narrow
    #[arg(long)]
    pub strategy: Option<String>,

    /// Earliest accepted birth year
    #[arg(long)]
    pub min_year: Option<i32>,

    /// Hours east of UTC that define "today"
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,

    /// Ask the language model for a caption (also enabled by `[narrative] enabled`)
    #[arg(long)]
    pub narrative: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn load_toml(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => TomlConfig::from_file(path),
            None => Ok(TomlConfig::default()),
        }
    }

    /// Command line flags win over the file.
    pub fn engine_settings(&self, file: &TomlConfig) -> EngineSettings {
        EngineSettings {
            min_birth_year: self.min_year.unwrap_or_else(|| file.min_birth_year()),
            reference_offset: self
                .utc_offset
                .map(utc_offset)
                .unwrap_or_else(|| file.reference_offset()),
            strategy: self
                .strategy
                .as_deref()
                .and_then(LuckyStrategy::parse)
                .unwrap_or_else(|| file.strategy()),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("birth", &self.birth)?;

        if let Some(strategy) = &self.strategy {
            if LuckyStrategy::parse(strategy).is_none() {
                return Err(LuckError::InvalidConfigValueError {
                    field: "strategy".to_string(),
                    value: strategy.clone(),
                    reason: "Valid strategies: wide, narrow".to_string(),
                });
            }
        }
        if let Some(min_year) = self.min_year {
            validate_range("min_year", min_year, 1, 9999)?;
        }
        if let Some(offset) = self.utc_offset {
            validate_range("utc_offset", offset, -12, 14)?;
        }
        Ok(())
    }
}
