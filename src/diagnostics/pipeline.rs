use crate::diagnostics::{
    AssemblyStage, CandidateStage, ExtentStage, LevelStage, OverlapStage, RatioStage,
    ReductionStage, TimingBreakdown,
};
use crate::document::HierarchyDocument;
use serde::Serialize;

/// Result produced by
/// [`HierarchyReconstructor::reconstruct`](crate::HierarchyReconstructor).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionReport {
    pub document: HierarchyDocument,
    pub trace: PipelineTrace,
}

/// End-to-end trace describing the internal execution of one pass.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub candidates: CandidateStage,
    pub overlap: OverlapStage,
    pub reduction: ReductionStage,
    pub levels: LevelStage,
    pub ratios: RatioStage,
    /// Present only when several coarsest-level roots required assembly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly: Option<AssemblyStage>,
    pub extents: ExtentStage,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub mesh_name: String,
    pub domain_count: usize,
    pub dims: usize,
}
