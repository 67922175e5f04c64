#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod backend;
pub mod catalog;
pub mod diagnostics;
pub mod document;
pub mod export;
pub mod reconstruct;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
// (You can tighten or feature-gate these later.)
pub mod assembly;
pub mod candidates;
pub mod config;
pub mod extents;
pub mod forest;
pub mod levels;
pub mod oracle;
pub mod ratios;

// --- High-level re-exports -------------------------------------------------

// Main entry points: reconstructor + results.
pub use crate::document::HierarchyDocument;
pub use crate::reconstruct::{HierarchyReconstructor, ReconstructOptions};

// High-level diagnostics returned by the reconstructor.
pub use crate::diagnostics::{PipelineTrace, ReconstructionReport};

// Backend seam implementations plug into.
pub use crate::backend::MeshQueryBackend;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use amr_stitcher::prelude::*;
///
/// # fn example(raw: Vec<RawDomain>, session: &mut dyn MeshQueryBackend) {
/// let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
/// match reconstructor.reconstruct("mesh", &raw, session) {
///     Ok(report) => println!(
///         "levels={} patches={}",
///         report.document.level_count, report.document.patch_count
///     ),
///     Err(err) => eprintln!("{err}"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::backend::MeshQueryBackend;
    pub use crate::catalog::RawDomain;
    pub use crate::types::{DomainId, MeshKind};
    pub use crate::{HierarchyDocument, HierarchyReconstructor, ReconstructOptions};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners.
    pub use crate::assembly::assemble_global_index;
    pub use crate::candidates::propose_candidates;
    pub use crate::extents::propagate_extents;
    pub use crate::forest::reduce_to_forest;
    pub use crate::levels::assign_levels;
    pub use crate::oracle::confirm_overlaps;
    pub use crate::ratios::infer_ratios;

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        AssemblyStage, CandidateStage, ExtentStage, InputDescriptor, LevelStage, OverlapStage,
        RatioStage, ReductionStage, StageTiming, TimingBreakdown, TransitionReport,
    };
}
