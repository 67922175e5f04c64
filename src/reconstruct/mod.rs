//! Hierarchy reconstructor orchestrating the stage pipeline.
//!
//! Overview
//! - Ingests flat patch descriptors into a rank-ordered catalog.
//! - Proposes candidate parent/child edges from bounding-box interiors and
//!   confirms the ambiguous ones through the mesh query backend's
//!   cross-mesh indicator mapping.
//! - Reduces the confirmed graph to a forest of immediate edges, assigns
//!   heights and levels, and infers per-transition refinement ratios.
//! - Rebuilds a shared coarse index space from root face adjacency when the
//!   mesh has several coarsest-level roots, then propagates logical extents
//!   top-down through parent point location.
//!
//! Modules
//! - [`options`] – configuration knobs shared by the stages.
//! - `context` – the per-pass working set every stage reads and extends.
//! - `pipeline` – the [`HierarchyReconstructor`] implementation.
//!
//! Key Ideas
//! - Determinism: every ordering derives from the catalog (rank descending,
//!   ties by backend id), so identical inputs produce identical documents.
//! - Locality of failure: backend queries can miss or fail; each miss skips
//!   exactly one measurement and shows up in the trace, never as an error.
//! - Rectilinear fast paths: patches with analytic cell geometry are
//!   settled without touching the backend at all.

pub mod context;
pub mod options;
mod pipeline;

pub use context::ReconstructionContext;
pub use options::ReconstructOptions;
pub use pipeline::HierarchyReconstructor;
