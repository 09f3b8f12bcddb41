//! Pipeline infrastructure - request orchestration and coalescing

mod inflight;
mod orchestrator;

pub use inflight::{InFlightRegistry, JoinOutcome, LeaderToken};
pub use orchestrator::{OutcomeSource, TranslationOutcome, TranslationPipeline};
