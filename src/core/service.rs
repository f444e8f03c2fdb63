use crate::core::engine::NumerologyEngine;
use crate::domain::model::{NumerologyResult, ReferenceDate};
use crate::domain::ports::{Clock, NarrativeGenerator};
use crate::utils::error::Result;
use std::sync::Arc;

pub const NARRATIVE_FALLBACK: &str = "系統忙碌，請稍後再試 (AI Error)";

/// Turns a chat message into a reply. Holds no per-request state.
pub struct LuckService<C: Clock> {
    engine: NumerologyEngine,
    clock: C,
    narrator: Option<Arc<dyn NarrativeGenerator>>,
}

impl<C: Clock> LuckService<C> {
    pub fn new(engine: NumerologyEngine, clock: C) -> Self {
        Self {
            engine,
            clock,
            narrator: None,
        }
    }

    /// The narrator is shared for the lifetime of the service.
    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn reference_date(&self) -> ReferenceDate {
        ReferenceDate::from_instant(
            self.clock.now_utc(),
            self.engine.settings().reference_offset,
        )
    }

    pub fn derive(&self, text: &str) -> Result<NumerologyResult> {
        let reference = self.reference_date();
        tracing::debug!("Deriving numerology for {:?} as of {}", text.trim(), reference);
        Ok(self.engine.derive(text, reference)?)
    }

    pub async fn reply(&self, text: &str) -> String {
        let result = match self.derive(text) {
            Ok(result) => result,
            Err(e) => {
                tracing::info!("Rejected birth date input: {}", e);
                return e.user_friendly_message();
            }
        };

        self.narrate(&result).await
    }

    /// Caption for an already derived result; plain summary when no narrator is set.
    pub async fn narrate(&self, result: &NumerologyResult) -> String {
        let Some(narrator) = &self.narrator else {
            return result.to_string();
        };

        match narrator.explain(result).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Narrative generation failed: {}", e);
                NARRATIVE_FALLBACK.to_string()
            }
        }
    }
}
