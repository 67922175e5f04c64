//! Reconstruction pipeline orchestrating the stage sequence end to end.
//!
//! The [`HierarchyReconstructor`] exposes a simple API: feed raw patch
//! descriptors plus a mesh query backend and get the finished hierarchy
//! document with detailed diagnostics. Internally it coordinates ingestion,
//! candidate generation, overlap confirmation, transitive reduction, level
//! assignment, ratio inference, multi-root index assembly and extent
//! propagation, in that order; each stage reads only the context built by
//! the previous ones.
//!
//! Typical usage:
//! ```no_run
//! use amr_stitcher::{HierarchyReconstructor, ReconstructOptions};
//! # use amr_stitcher::backend::MeshQueryBackend;
//! # use amr_stitcher::catalog::RawDomain;
//!
//! # fn example(raw: Vec<RawDomain>, backend: &mut dyn MeshQueryBackend) {
//! let reconstructor = HierarchyReconstructor::new(ReconstructOptions::default());
//! match reconstructor.reconstruct("mesh", &raw, backend) {
//!     Ok(report) => println!("levels: {}", report.document.level_count),
//!     Err(err) => eprintln!("structural failure: {err}"),
//! }
//! # }
//! ```

use crate::assembly::assemble_global_index;
use crate::backend::MeshQueryBackend;
use crate::candidates::propose_candidates;
use crate::catalog::{CatalogError, DomainCatalog, RawDomain};
use crate::diagnostics::{
    AssemblyStage, CandidateStage, ExtentStage, InputDescriptor, LevelStage, OverlapStage,
    PipelineTrace, RatioStage, ReconstructionReport, ReductionStage, TimingBreakdown,
    TransitionReport,
};
use crate::document::build_document;
use crate::extents::propagate_extents;
use crate::forest::reduce_to_forest;
use crate::levels::assign_levels;
use crate::oracle::confirm_overlaps;
use crate::ratios::infer_ratios;
use crate::reconstruct::context::ReconstructionContext;
use crate::reconstruct::options::ReconstructOptions;
use log::debug;
use std::time::Instant;

/// Hierarchy reconstructor orchestrating catalog ingestion, overlap
/// analysis, forest reduction and logical index reconstruction.
pub struct HierarchyReconstructor {
    options: ReconstructOptions,
}

impl HierarchyReconstructor {
    /// Create a reconstructor with the supplied parameters.
    pub fn new(options: ReconstructOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReconstructOptions {
        &self.options
    }

    /// Run the full pipeline over one mesh snapshot.
    ///
    /// The only error is a structural one: descriptors missing extents or
    /// logical sizes. Every other defect degrades locally and is reported
    /// through the trace.
    pub fn reconstruct(
        &self,
        mesh_name: &str,
        raw: &[RawDomain],
        backend: &mut dyn MeshQueryBackend,
    ) -> Result<ReconstructionReport, CatalogError> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        // 1) Catalog: ranks and the deterministic ordering.
        let stage_start = Instant::now();
        let catalog = DomainCatalog::ingest(raw)?;
        timings.push("catalog", elapsed_ms(stage_start));

        // 2) Candidate edges from bounding-box interiors.
        let stage_start = Instant::now();
        let candidates = propose_candidates(&catalog);
        timings.push("candidates", elapsed_ms(stage_start));
        let candidate_stage = CandidateStage {
            domains: catalog.len(),
            edges_proposed: candidates.iter().map(Vec::len).sum(),
        };

        // 3) Oracle confirmation for pairs the boxes cannot settle.
        let stage_start = Instant::now();
        let overlap = confirm_overlaps(
            &catalog,
            &candidates,
            backend,
            self.options.confirm_threshold,
        );
        timings.push("overlap", elapsed_ms(stage_start));
        let overlap_stage = OverlapStage {
            edges_confirmed: overlap.confirmed.iter().map(Vec::len).sum(),
            edges_rejected: overlap.rejected,
            edges_without_evidence: overlap.query_failures,
            oracle_calls: overlap.oracle_calls,
        };

        // 4) Transitive reduction down to immediate children.
        let stage_start = Instant::now();
        let forest = reduce_to_forest(&overlap.confirmed);
        timings.push("reduce", elapsed_ms(stage_start));
        let reduction_stage = ReductionStage {
            edges_kept: forest.children.iter().map(Vec::len).sum(),
            edges_dropped_transitive: forest.dropped_transitive,
            edges_dropped_extra_parent: forest.dropped_extra_parent,
        };

        // 5) Heights and levels.
        let stage_start = Instant::now();
        let assignment = assign_levels(&forest.children);
        timings.push("levels", elapsed_ms(stage_start));
        let level_stage = LevelStage {
            level_count: assignment.level_count(),
            max_height: assignment.max_height,
            root_count: assignment.roots.len(),
        };

        // 6) Refinement ratios per transition.
        let stage_start = Instant::now();
        let ratios = infer_ratios(&catalog, &forest.children, &assignment, backend);
        timings.push("ratios", elapsed_ms(stage_start));
        let ratio_stage = RatioStage {
            transitions: ratios
                .transitions
                .iter()
                .map(|t| TransitionReport {
                    parent_level: t.parent_level,
                    child_level: t.child_level,
                    ratio: t.level_ratio()[..catalog.dims()].to_vec(),
                    consistent: t.is_consistent(),
                    disagreeing_edges: if t.is_consistent() {
                        Vec::new()
                    } else {
                        t.edges.clone()
                    },
                    skipped_edges: t.skipped,
                })
                .collect(),
            probe_misses: ratios.probe_misses,
        };

        // 7) Shared coarse index space when several roots remain.
        let stage_start = Instant::now();
        let layout = if assignment.roots.len() > 1 {
            Some(assemble_global_index(
                &catalog,
                &assignment.roots,
                self.options.face_precision_decimals,
            ))
        } else {
            None
        };
        timings.push("assembly", elapsed_ms(stage_start));
        let assembly_stage = layout.as_ref().map(|layout| AssemblyStage {
            root_count: assignment.roots.len(),
            shared_faces: layout.adjacency_count,
            origin_domain: catalog.domain(layout.origin).id,
            tiling_exact: layout.tiling_ok,
            unplaced_domains: layout
                .unplaced
                .iter()
                .map(|&p| catalog.domain(p).id)
                .collect(),
        });

        // 8) Extents, coarsest to finest.
        let stage_start = Instant::now();
        let extents = propagate_extents(
            &catalog,
            &forest,
            &assignment,
            &ratios,
            layout.as_ref(),
            backend,
            self.options.interior_clamp,
        );
        timings.push("extents", elapsed_ms(stage_start));
        let extent_stage = ExtentStage {
            resolved: extents.resolved,
            unresolved: extents.unresolved.len(),
            corner_misses: extents.corner_misses,
            unresolved_domains: extents
                .unresolved
                .iter()
                .map(|&p| catalog.domain(p).id)
                .collect(),
        };

        let context = ReconstructionContext {
            catalog,
            candidates,
            confirmed: overlap.confirmed,
            forest,
            levels: assignment,
            ratios,
            layout,
            extents,
        };

        let document = build_document(
            mesh_name,
            &context.catalog,
            &context.forest,
            &context.levels,
            &context.ratios,
            &context.extents,
        );

        timings.total_ms = elapsed_ms(total_start);
        debug!(
            "reconstruct: mesh={} domains={} levels={} total_ms={:.3}",
            mesh_name,
            context.catalog.len(),
            document.level_count,
            timings.total_ms
        );

        Ok(ReconstructionReport {
            document,
            trace: PipelineTrace {
                input: InputDescriptor {
                    mesh_name: mesh_name.to_string(),
                    domain_count: context.catalog.len(),
                    dims: context.catalog.dims(),
                },
                timings,
                candidates: candidate_stage,
                overlap: overlap_stage,
                reduction: reduction_stage,
                levels: level_stage,
                ratios: ratio_stage,
                assembly: assembly_stage,
                extents: extent_stage,
            },
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
