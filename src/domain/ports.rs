use crate::domain::model::{LuckyStrategy, NumerologyResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};

/// Current-time source. Sampled once per request.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Produces the short caption that accompanies a result.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn explain(&self, result: &NumerologyResult) -> Result<String>;
}

pub trait EngineSettingsProvider: Send + Sync {
    fn min_birth_year(&self) -> i32;
    fn reference_offset(&self) -> FixedOffset;
    fn strategy(&self) -> LuckyStrategy;
}
