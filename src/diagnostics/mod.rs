//! Structured diagnostics exposed by the reconstruction pipeline.
//!
//! [`ReconstructionReport`] is the main entry point: the finished document
//! plus a [`PipelineTrace`] describing what every stage saw and how long it
//! took. Recoverable defects (missing overlap evidence, disagreeing ratios,
//! pick misses, imperfect tilings) surface here rather than as errors.

pub mod pipeline;
pub mod stages;
pub mod timing;

pub use pipeline::{InputDescriptor, PipelineTrace, ReconstructionReport};
pub use stages::{
    AssemblyStage, CandidateStage, ExtentStage, LevelStage, OverlapStage, RatioStage,
    ReductionStage, TransitionReport,
};
pub use timing::{StageTiming, TimingBreakdown};
