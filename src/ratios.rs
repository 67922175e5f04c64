//! Per-level refinement ratio inference.
//!
//! Every retained parent/child edge yields one per-axis integer ratio.
//! Rectilinear edges are settled analytically by comparing the two patches'
//! zone densities on the parent's frame. Curvilinear edges cannot be: the
//! engine probes one physical point common to both patches (the centre of
//! their bounding-box intersection), zone-picks it in each, and compares the
//! physical edge lengths of the two picked zones. A pick miss skips that
//! edge's measurement and the transition aggregates whatever remains.
//!
//! Ratios are grouped per (parent level, child level) transition. Agreement
//! across a transition produces one canonical ratio; disagreement flags the
//! transition, surfaces every measured edge for the caller, and downstream
//! consumers fall back to the per-edge values.

use crate::backend::{MeshQueryBackend, QueryError};
use crate::catalog::{CellGeometry, DomainCatalog};
use crate::levels::LevelAssignment;
use crate::types::{DomainId, RefinementRatio, IDENTITY_RATIO, MAX_DIMS};
use log::{debug, warn};
use std::collections::BTreeMap;

/// One measured edge, reported through diagnostics on disagreement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRatio {
    pub parent: DomainId,
    pub child: DomainId,
    pub ratio: RefinementRatio,
}

/// Aggregated ratios for one level transition.
#[derive(Clone, Debug)]
pub struct Transition {
    pub parent_level: u32,
    pub child_level: u32,
    /// Present when every measured edge agrees.
    pub canonical: Option<RefinementRatio>,
    /// Every measured edge, catalog order.
    pub edges: Vec<EdgeRatio>,
    /// Edges whose measurement was skipped after a pick miss or query error.
    pub skipped: usize,
}

impl Transition {
    pub fn is_consistent(&self) -> bool {
        self.canonical.is_some()
    }

    /// Ratio recorded in the level table: the canonical value, else the
    /// first measured edge as best effort.
    pub fn level_ratio(&self) -> RefinementRatio {
        self.canonical
            .or_else(|| self.edges.first().map(|e| e.ratio))
            .unwrap_or(IDENTITY_RATIO)
    }
}

/// Outcome of the inference stage.
#[derive(Clone, Debug, Default)]
pub struct RatioTable {
    /// Transitions keyed by (parent level, child level), ascending.
    pub transitions: Vec<Transition>,
    /// Measured (or transition-fallback) ratio per catalog position; `None`
    /// for roots and for children whose transition has no measurement.
    pub child_ratio: Vec<Option<RefinementRatio>>,
    pub probe_misses: usize,
}

impl RatioTable {
    /// Ratio between `level` and the level above it; identity at the top.
    pub fn level_ratio(&self, level: u32) -> RefinementRatio {
        if level == 0 {
            return IDENTITY_RATIO;
        }
        self.transitions
            .iter()
            .find(|t| t.parent_level == level - 1 && t.child_level == level)
            .map(Transition::level_ratio)
            .unwrap_or(IDENTITY_RATIO)
    }
}

/// Infer ratios for every retained forest edge.
pub fn infer_ratios(
    catalog: &DomainCatalog,
    children: &[Vec<usize>],
    assignment: &LevelAssignment,
    backend: &mut dyn MeshQueryBackend,
) -> RatioTable {
    let dims = catalog.dims();
    let mut grouped: BTreeMap<(u32, u32), Transition> = BTreeMap::new();
    let mut measured: Vec<Option<RefinementRatio>> = vec![None; catalog.len()];
    let mut probe_misses = 0usize;

    for (parent, kids) in children.iter().enumerate() {
        for &child in kids {
            let key = (assignment.levels[parent], assignment.levels[child]);
            let entry = grouped.entry(key).or_insert_with(|| Transition {
                parent_level: key.0,
                child_level: key.1,
                canonical: None,
                edges: Vec::new(),
                skipped: 0,
            });
            match edge_ratio(catalog, parent, child, dims, backend) {
                Some(ratio) => {
                    measured[child] = Some(ratio);
                    entry.edges.push(EdgeRatio {
                        parent: catalog.domain(parent).id,
                        child: catalog.domain(child).id,
                        ratio,
                    });
                }
                None => {
                    entry.skipped += 1;
                    probe_misses += 1;
                }
            }
        }
    }

    let mut transitions: Vec<Transition> = grouped.into_values().collect();
    for transition in &mut transitions {
        let mut ratios = transition.edges.iter().map(|e| e.ratio);
        if let Some(first) = ratios.next() {
            if ratios.all(|r| r == first) {
                transition.canonical = Some(first);
            } else {
                warn!(
                    "ratios: transition {} -> {} disagrees across {} edges",
                    transition.parent_level,
                    transition.child_level,
                    transition.edges.len()
                );
            }
        }
    }

    // Children without a measurement inherit their transition's best effort.
    let mut child_ratio = measured;
    for (parent, kids) in children.iter().enumerate() {
        for &child in kids {
            if child_ratio[child].is_none() {
                let key = (assignment.levels[parent], assignment.levels[child]);
                child_ratio[child] = transitions
                    .iter()
                    .find(|t| (t.parent_level, t.child_level) == key)
                    .and_then(|t| t.canonical.or_else(|| t.edges.first().map(|e| e.ratio)));
            }
        }
    }

    debug!(
        "ratios: transitions={} probe_misses={}",
        transitions.len(),
        probe_misses
    );
    RatioTable {
        transitions,
        child_ratio,
        probe_misses,
    }
}

fn edge_ratio(
    catalog: &DomainCatalog,
    parent: usize,
    child: usize,
    dims: usize,
    backend: &mut dyn MeshQueryBackend,
) -> Option<RefinementRatio> {
    let p = catalog.domain(parent);
    let c = catalog.domain(child);

    if p.geometry.is_rectilinear() && c.geometry.is_rectilinear() {
        // Zone densities compared on the parent frame; the span cancels into
        // a quotient of zone counts.
        let mut ratio = IDENTITY_RATIO;
        for axis in 0..dims {
            let q = f64::from(c.zones[axis]) / f64::from(p.zones[axis]);
            ratio[axis] = (q.round() as u32).max(1);
        }
        return Some(ratio);
    }

    probe_ratio(catalog, parent, child, dims, backend)
}

/// Curvilinear path: compare the physical edge lengths of the zone each
/// patch places under a shared probe point.
fn probe_ratio(
    catalog: &DomainCatalog,
    parent: usize,
    child: usize,
    dims: usize,
    backend: &mut dyn MeshQueryBackend,
) -> Option<RefinementRatio> {
    let p = catalog.domain(parent);
    let c = catalog.domain(child);
    let probe = p.bounds.intersection(&c.bounds, dims)?.center();

    let parent_zone = match backend.pick_zone(p.id, &probe) {
        Ok(pick) => pick.zone,
        Err(miss) => {
            warn!("ratios: {miss}");
            return None;
        }
    };
    let child_zone = match backend.pick_zone(c.id, &probe) {
        Ok(pick) => pick.zone,
        Err(miss) => {
            warn!("ratios: {miss}");
            return None;
        }
    };

    let parent_edges = zone_edge_lengths(backend, p.id, parent_zone, dims).ok()?;
    let child_edges = zone_edge_lengths(backend, c.id, child_zone, dims).ok()?;

    let mut ratio = IDENTITY_RATIO;
    for axis in 0..dims {
        if child_edges[axis] <= 0.0 {
            return None;
        }
        ratio[axis] = ((parent_edges[axis] / child_edges[axis]).round() as u32).max(1);
    }
    Some(ratio)
}

/// Physical length of one zone's edges along each axis, from its corner
/// node coordinates.
fn zone_edge_lengths(
    backend: &mut dyn MeshQueryBackend,
    domain: DomainId,
    zone: [u32; 3],
    dims: usize,
) -> Result<[f64; MAX_DIMS], QueryError> {
    let origin = backend.node_position(domain, zone)?;
    let mut lengths = [0.0; MAX_DIMS];
    for axis in 0..dims {
        let mut node = zone;
        node[axis] += 1;
        let along = backend.node_position(domain, node)?;
        lengths[axis] = (along - origin).norm();
    }
    Ok(lengths)
}
