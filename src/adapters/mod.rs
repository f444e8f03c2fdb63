// Adapters layer: concrete implementations of the domain ports.

pub mod clock;
pub mod narrative;

pub use clock::{FixedClock, SystemClock};
pub use narrative::{build_prompt, ChatCompletionNarrator, NarratorConfig};
