//! Structured per-stage reports collected by the pipeline.

use crate::ratios::EdgeRatio;
use crate::types::DomainId;
use serde::Serialize;

/// Candidate edge generation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStage {
    pub domains: usize,
    pub edges_proposed: usize,
}

/// Overlap confirmation through the oracle.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapStage {
    pub edges_confirmed: usize,
    /// Candidates the oracle evaluated below the confirmation threshold.
    pub edges_rejected: usize,
    /// Candidates dropped because evidence never materialized (failed
    /// backend queries).
    pub edges_without_evidence: usize,
    pub oracle_calls: usize,
}

/// Transitive reduction to the forest.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReductionStage {
    pub edges_kept: usize,
    pub edges_dropped_transitive: usize,
    pub edges_dropped_extra_parent: usize,
}

/// Height and level assignment.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStage {
    pub level_count: usize,
    pub max_height: u32,
    pub root_count: usize,
}

/// One (parent level, child level) transition in the ratio report.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionReport {
    pub parent_level: u32,
    pub child_level: u32,
    pub ratio: Vec<u32>,
    pub consistent: bool,
    /// Every measured edge when the transition disagrees; empty otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disagreeing_edges: Vec<EdgeRatio>,
    pub skipped_edges: usize,
}

/// Refinement ratio inference.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioStage {
    pub transitions: Vec<TransitionReport>,
    pub probe_misses: usize,
}

/// Multi-root global index assembly.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyStage {
    pub root_count: usize,
    pub shared_faces: usize,
    pub origin_domain: DomainId,
    pub tiling_exact: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unplaced_domains: Vec<DomainId>,
}

/// Top-down extent propagation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtentStage {
    pub resolved: usize,
    pub unresolved: usize,
    pub corner_misses: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_domains: Vec<DomainId>,
}
