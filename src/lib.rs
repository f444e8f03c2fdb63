pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ChatCompletionNarrator, FixedClock, NarratorConfig, SystemClock};
pub use config::toml_config::TomlConfig;
pub use crate::core::{engine::NumerologyEngine, service::LuckService};
pub use domain::model::{BirthDate, LuckyStrategy, NumerologyResult, ReferenceDate, RootNumber};
pub use utils::error::{BirthDateError, LuckError, Result};
