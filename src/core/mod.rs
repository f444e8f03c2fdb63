pub mod engine;
pub mod lucky;
pub mod reducer;
pub mod service;

pub use crate::domain::model::{BirthDate, LuckyStrategy, NumerologyResult, ReferenceDate, RootNumber};
pub use crate::domain::ports::{Clock, EngineSettingsProvider, NarrativeGenerator};
pub use crate::utils::error::Result;
