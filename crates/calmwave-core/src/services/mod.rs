//! Core services.
//!
//! Services orchestrate the domain over the ports. They hold trait objects
//! only and are wired with concrete adapters at each composition root.

mod assembler;
mod meditation_history;
mod pipeline;
mod synthesizer;

#[cfg(test)]
pub(crate) mod fakes;

pub use assembler::{AssembledTrack, Assembler};
pub use meditation_history::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MeditationHistoryService,
};
pub use pipeline::{MeditationPipeline, MixedResult};
pub use synthesizer::SegmentSynthesizer;
