//! Iterative walks over the root face-adjacency graph.

use super::faces::{face_point_set, Side};
use crate::catalog::DomainCatalog;
use crate::types::{LogicalExtent, MAX_DIMS};
use log::warn;
use std::collections::VecDeque;

/// Per-root neighbor table, indexed `axis * 2 + side` with side 0 = Lo.
pub(crate) type NeighborTable = Vec<[Option<usize>; MAX_DIMS * 2]>;

/// Detect shared faces between every pair of roots.
///
/// Returns the neighbor table (local root indices) and the number of shared
/// faces found. Exact quantized point-set equality decides adjacency, so a
/// face is shared only when both sides coincide corner for corner.
pub(crate) fn face_adjacency(
    catalog: &DomainCatalog,
    roots: &[usize],
    dims: usize,
    precision_decimals: u32,
) -> (NeighborTable, usize) {
    let mut neighbors: NeighborTable = vec![[None; MAX_DIMS * 2]; roots.len()];
    let mut shared = 0usize;

    for (a, &pa) in roots.iter().enumerate() {
        for (b, &pb) in roots.iter().enumerate().skip(a + 1) {
            let ba = &catalog.domain(pa).bounds;
            let bb = &catalog.domain(pb).bounds;
            for axis in 0..dims {
                // a's high side against b's low side, then the reverse.
                if face_point_set(ba, dims, axis, Side::Hi, precision_decimals)
                    == face_point_set(bb, dims, axis, Side::Lo, precision_decimals)
                {
                    link(&mut neighbors, a, b, axis, catalog, roots);
                    shared += 1;
                } else if face_point_set(bb, dims, axis, Side::Hi, precision_decimals)
                    == face_point_set(ba, dims, axis, Side::Lo, precision_decimals)
                {
                    link(&mut neighbors, b, a, axis, catalog, roots);
                    shared += 1;
                }
            }
        }
    }
    (neighbors, shared)
}

/// Record `lo -> hi` adjacency along `axis`, keeping the first match when a
/// malformed mesh offers several.
fn link(
    neighbors: &mut NeighborTable,
    lo: usize,
    hi: usize,
    axis: usize,
    catalog: &DomainCatalog,
    roots: &[usize],
) {
    let hi_slot = axis * 2 + 1;
    let lo_slot = axis * 2;
    if neighbors[lo][hi_slot].is_some() || neighbors[hi][lo_slot].is_some() {
        warn!(
            "assembly: duplicate face neighbor between {} and {} on axis {axis}",
            catalog.domain(roots[lo]).id,
            catalog.domain(roots[hi]).id
        );
        return;
    }
    neighbors[lo][hi_slot] = Some(hi);
    neighbors[hi][lo_slot] = Some(lo);
}

/// Walk west/south/back-most from the first root to the index-space origin.
///
/// Moving down one axis can expose further moves on another, so the sweep
/// repeats until a full cycle makes no progress; a step budget guards
/// against adjacency cycles from malformed input.
pub(crate) fn find_origin(neighbors: &NeighborTable, dims: usize) -> usize {
    let mut current = 0usize;
    let budget = neighbors.len() * dims + 1;
    for _ in 0..budget {
        let mut moved = false;
        for axis in 0..dims {
            while let Some(previous) = neighbors[current][axis * 2] {
                current = previous;
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
    current
}

/// Offsets assigned by the breadth-first sweep from the origin.
pub(crate) struct Placement {
    pub offsets: Vec<Option<[i64; MAX_DIMS]>>,
    /// A root was reached twice with different offsets.
    pub conflicted: bool,
}

/// Accumulate per-axis logical offsets outward from the origin root.
pub(crate) fn accumulate_offsets(
    catalog: &DomainCatalog,
    roots: &[usize],
    neighbors: &NeighborTable,
    origin: usize,
    dims: usize,
) -> Placement {
    let mut offsets: Vec<Option<[i64; MAX_DIMS]>> = vec![None; roots.len()];
    let mut conflicted = false;
    let mut queue = VecDeque::new();
    offsets[origin] = Some([0; MAX_DIMS]);
    queue.push_back(origin);

    while let Some(current) = queue.pop_front() {
        let base = offsets[current].expect("queued roots are placed");
        for axis in 0..dims {
            if let Some(next) = neighbors[current][axis * 2 + 1] {
                let mut offset = base;
                offset[axis] += i64::from(catalog.domain(roots[current]).zones[axis]);
                conflicted |= place(&mut offsets, &mut queue, next, offset);
            }
            if let Some(previous) = neighbors[current][axis * 2] {
                let mut offset = base;
                offset[axis] -= i64::from(catalog.domain(roots[previous]).zones[axis]);
                conflicted |= place(&mut offsets, &mut queue, previous, offset);
            }
        }
    }

    Placement {
        offsets,
        conflicted,
    }
}

fn place(
    offsets: &mut [Option<[i64; MAX_DIMS]>],
    queue: &mut VecDeque<usize>,
    root: usize,
    offset: [i64; MAX_DIMS],
) -> bool {
    match offsets[root] {
        None => {
            offsets[root] = Some(offset);
            queue.push_back(root);
            false
        }
        Some(existing) => existing != offset,
    }
}

/// Check that the placed extents tile one box exactly: total volume matches
/// the bounding volume and no two extents intersect.
pub(crate) fn tiles_exactly(extents: &[(usize, LogicalExtent)], dims: usize) -> bool {
    if extents.is_empty() {
        return false;
    }
    let mut lo = [i64::MAX; MAX_DIMS];
    let mut hi = [i64::MIN; MAX_DIMS];
    let mut covered = 0i64;
    for (_, extent) in extents {
        let mut volume = 1i64;
        for axis in 0..dims {
            lo[axis] = lo[axis].min(extent.lo[axis]);
            hi[axis] = hi[axis].max(extent.hi[axis]);
            volume *= extent.zones(axis);
        }
        covered += volume;
    }
    let mut bounding = 1i64;
    for axis in 0..dims {
        bounding *= hi[axis] - lo[axis] + 1;
    }
    if covered != bounding {
        return false;
    }

    for (i, (_, a)) in extents.iter().enumerate() {
        for (_, b) in extents.iter().skip(i + 1) {
            let disjoint =
                (0..dims).any(|axis| a.hi[axis] < b.lo[axis] || b.hi[axis] < a.lo[axis]);
            if !disjoint {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(lo: [i64; 2], hi: [i64; 2]) -> LogicalExtent {
        LogicalExtent {
            lo: [lo[0], lo[1], 0],
            hi: [hi[0], hi[1], 0],
        }
    }

    #[test]
    fn exact_tiling_is_accepted() {
        let extents = vec![
            (0, extent([0, 0], [9, 5])),
            (1, extent([10, 0], [19, 5])),
        ];
        assert!(tiles_exactly(&extents, 2));
    }

    #[test]
    fn gaps_are_rejected() {
        let extents = vec![
            (0, extent([0, 0], [9, 5])),
            (1, extent([12, 0], [19, 5])),
        ];
        assert!(!tiles_exactly(&extents, 2));
    }

    #[test]
    fn overlaps_are_rejected() {
        let extents = vec![
            (0, extent([0, 0], [9, 5])),
            (1, extent([8, 0], [17, 5])),
        ];
        assert!(!tiles_exactly(&extents, 2));
    }
}
