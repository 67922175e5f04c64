//! Top-down logical extent propagation.
//!
//! Levels are processed coarsest to finest: the coarsest level is already
//! placed (by the index assembler, or trivially for a single root), and each
//! finer patch maps its corners through an already-placed parent. A corner is
//! resolved by clamping its physical position into the parent's interior
//! (boundary-coincident corners would otherwise be ambiguous), locating the
//! nearest parent grid node, lifting that node into the shared coarse frame
//! via the parent's extent, and scaling by the refinement ratio. Parents are
//! tried in catalog order and the first successful resolution wins. A corner
//! the backend cannot resolve is skipped; a patch with no resolvable corner
//! keeps an undetermined extent and only the diagnostics notice.

use crate::backend::MeshQueryBackend;
use crate::catalog::{CellGeometry, DomainCatalog};
use crate::forest::Forest;
use crate::levels::LevelAssignment;
use crate::ratios::RatioTable;
use crate::types::{DomainId, LogicalExtent, RefinementRatio, IDENTITY_RATIO, MAX_DIMS};
use log::{debug, warn};
use nalgebra::Point3;

use crate::assembly::RootLayout;

/// Outcome of the propagation stage.
#[derive(Clone, Debug, Default)]
pub struct ExtentMap {
    /// Extent per catalog position; `None` when no corner resolved.
    pub extents: Vec<Option<LogicalExtent>>,
    pub resolved: usize,
    /// Positions left without an extent.
    pub unresolved: Vec<usize>,
    /// Individual corner resolutions that failed (pick misses and query
    /// errors); informational, a patch can still resolve via its other
    /// corner.
    pub corner_misses: usize,
}

/// Map every non-coarsest patch's extents from its parents' frames.
pub fn propagate_extents(
    catalog: &DomainCatalog,
    forest: &Forest,
    assignment: &LevelAssignment,
    ratios: &RatioTable,
    layout: Option<&RootLayout>,
    backend: &mut dyn MeshQueryBackend,
    interior_clamp: f64,
) -> ExtentMap {
    let n = catalog.len();
    let dims = catalog.dims();
    let mut map = ExtentMap {
        extents: vec![None; n],
        ..Default::default()
    };

    // Coarsest level first: assembled layout when several roots exist,
    // otherwise the single root owns the whole frame.
    for &root in &assignment.roots {
        let extent = match layout {
            Some(layout) => layout
                .extent_of(root)
                .copied()
                .unwrap_or_else(|| LogicalExtent::from_size(catalog.domain(root).zones)),
            None => LogicalExtent::from_size(catalog.domain(root).zones),
        };
        map.extents[root] = Some(extent);
        map.resolved += 1;
    }

    for level in 1..=assignment.max_height {
        for d in 0..n {
            if assignment.levels[d] != level || map.extents[d].is_some() {
                continue;
            }
            if forest.resolvers[d].is_empty() {
                warn!(
                    "extents: {} at level {level} has no parent to resolve against",
                    catalog.domain(d).id
                );
                map.unresolved.push(d);
                continue;
            }
            let ratio = match ratios.child_ratio[d] {
                Some(ratio) => ratio,
                None => {
                    warn!(
                        "extents: {} has no measured ratio, assuming identity",
                        catalog.domain(d).id
                    );
                    IDENTITY_RATIO
                }
            };
            match resolve_domain(catalog, forest, d, dims, ratio, &mut map, backend, interior_clamp)
            {
                Some(extent) => {
                    map.extents[d] = Some(extent);
                    map.resolved += 1;
                }
                None => map.unresolved.push(d),
            }
        }
    }

    debug!(
        "extents: resolved={} unresolved={} corner_misses={}",
        map.resolved,
        map.unresolved.len(),
        map.corner_misses
    );
    map
}

#[allow(clippy::too_many_arguments)]
fn resolve_domain(
    catalog: &DomainCatalog,
    forest: &Forest,
    d: usize,
    dims: usize,
    ratio: RefinementRatio,
    map: &mut ExtentMap,
    backend: &mut dyn MeshQueryBackend,
    interior_clamp: f64,
) -> Option<LogicalExtent> {
    let domain = catalog.domain(d);
    let zones = domain.zones;

    let (lo_corner, hi_corner) = corner_positions(catalog, d, backend, &mut map.corner_misses);

    let lo_node = match lo_corner {
        Some(p) => resolve_corner(catalog, forest, d, dims, &p, map, backend, interior_clamp),
        None => None,
    };
    if let Some(m) = lo_node {
        let mut extent = LogicalExtent::from_size(zones);
        for axis in 0..dims {
            extent.lo[axis] = m[axis] * i64::from(ratio[axis]);
            extent.hi[axis] = extent.lo[axis] + i64::from(zones[axis]) - 1;
        }
        return Some(extent);
    }

    // Fall back to the far corner; on well-formed meshes both derivations
    // agree, and partial information beats none.
    let hi_node = match hi_corner {
        Some(p) => resolve_corner(catalog, forest, d, dims, &p, map, backend, interior_clamp),
        None => None,
    };
    if let Some(m) = hi_node {
        let mut extent = LogicalExtent::from_size(zones);
        for axis in 0..dims {
            extent.hi[axis] = m[axis] * i64::from(ratio[axis]) - 1;
            extent.lo[axis] = extent.hi[axis] - i64::from(zones[axis]) + 1;
        }
        return Some(extent);
    }

    warn!("extents: both corners of {} left unresolved", domain.id);
    None
}

/// Physical coordinates of the patch's first and last grid nodes. Analytic
/// for rectilinear patches; queried for curvilinear ones.
fn corner_positions(
    catalog: &DomainCatalog,
    d: usize,
    backend: &mut dyn MeshQueryBackend,
    corner_misses: &mut usize,
) -> (Option<Point3<f64>>, Option<Point3<f64>>) {
    let domain = catalog.domain(d);
    match domain.geometry {
        CellGeometry::Rectilinear { .. } => (
            Some(domain.bounds.min_corner()),
            Some(domain.bounds.max_corner()),
        ),
        CellGeometry::Curvilinear => {
            let lo = match backend.node_position(domain.id, [0, 0, 0]) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!("extents: first node of {} unavailable: {err}", domain.id);
                    *corner_misses += 1;
                    None
                }
            };
            let hi = match backend.node_position(domain.id, domain.last_node()) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!("extents: last node of {} unavailable: {err}", domain.id);
                    *corner_misses += 1;
                    None
                }
            };
            (lo, hi)
        }
    }
}

/// Locate `point` as a node of the first parent able to answer, expressed in
/// the shared coarse node frame.
#[allow(clippy::too_many_arguments)]
fn resolve_corner(
    catalog: &DomainCatalog,
    forest: &Forest,
    d: usize,
    dims: usize,
    point: &Point3<f64>,
    map: &mut ExtentMap,
    backend: &mut dyn MeshQueryBackend,
    interior_clamp: f64,
) -> Option<[i64; MAX_DIMS]> {
    for &parent in &forest.resolvers[d] {
        let parent_extent = match map.extents[parent] {
            Some(extent) => extent,
            None => continue,
        };
        let clamped = clamp_interior(catalog, parent, dims, point, interior_clamp);
        let node = match parent_node_index(catalog, parent, dims, &clamped, backend) {
            Some(node) => node,
            None => {
                map.corner_misses += 1;
                continue;
            }
        };
        let mut shared = [0i64; MAX_DIMS];
        for axis in 0..dims {
            shared[axis] = parent_extent.lo[axis] + node[axis];
        }
        return Some(shared);
    }
    None
}

/// Pull the probe off the parent's boundary by a fraction of its nominal
/// cell size.
fn clamp_interior(
    catalog: &DomainCatalog,
    parent: usize,
    dims: usize,
    point: &Point3<f64>,
    interior_clamp: f64,
) -> Point3<f64> {
    let domain = catalog.domain(parent);
    let mut clamped = *point;
    for axis in 0..dims {
        let nominal = match domain.geometry {
            CellGeometry::Rectilinear { cell_size } => cell_size[axis],
            CellGeometry::Curvilinear => {
                domain.bounds.span(axis) / f64::from(domain.zones[axis])
            }
        };
        let margin = interior_clamp * nominal;
        let lo = domain.bounds.min[axis] + margin;
        let hi = domain.bounds.max[axis] - margin;
        clamped[axis] = if lo > hi {
            0.5 * (domain.bounds.min[axis] + domain.bounds.max[axis])
        } else {
            clamped[axis].clamp(lo, hi)
        };
    }
    clamped
}

/// Nearest node of the parent grid to an interior point. Rectilinear parents
/// answer analytically; curvilinear parents go through a zone pick followed
/// by a nearest-corner-node search.
fn parent_node_index(
    catalog: &DomainCatalog,
    parent: usize,
    dims: usize,
    point: &Point3<f64>,
    backend: &mut dyn MeshQueryBackend,
) -> Option<[i64; MAX_DIMS]> {
    let domain = catalog.domain(parent);
    match domain.geometry {
        CellGeometry::Rectilinear { cell_size } => {
            let mut node = [0i64; MAX_DIMS];
            for axis in 0..dims {
                let offset = (point[axis] - domain.bounds.min[axis]) / cell_size[axis];
                node[axis] = (offset.round() as i64)
                    .clamp(0, i64::from(domain.zones[axis]));
            }
            Some(node)
        }
        CellGeometry::Curvilinear => {
            let pick = match backend.pick_zone(domain.id, point) {
                Ok(pick) => pick,
                Err(miss) => {
                    warn!("extents: {miss}");
                    return None;
                }
            };
            nearest_zone_corner(domain.id, pick.zone, dims, point, backend)
        }
    }
}

/// Among the corner nodes of `zone`, pick the one closest to `point`.
fn nearest_zone_corner(
    domain: DomainId,
    zone: [u32; 3],
    dims: usize,
    point: &Point3<f64>,
    backend: &mut dyn MeshQueryBackend,
) -> Option<[i64; MAX_DIMS]> {
    let corner_count = 1usize << dims;
    let mut best: Option<([i64; MAX_DIMS], f64)> = None;
    for mask in 0..corner_count {
        let mut node = zone;
        for axis in 0..dims {
            if mask & (1 << axis) != 0 {
                node[axis] += 1;
            }
        }
        let position = match backend.node_position(domain, node) {
            Ok(p) => p,
            Err(err) => {
                warn!("extents: corner node of {domain} unavailable: {err}");
                return None;
            }
        };
        let distance = (position - point).norm_squared();
        let indices = [
            i64::from(node[0]),
            i64::from(node[1]),
            i64::from(node[2]),
        ];
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((indices, distance)),
        }
    }
    best.map(|(node, _)| node)
}
