//! Transitive reduction of the confirmed-overlap graph.
//!
//! Confirmed overlaps relate a patch to all of its descendants, not just the
//! immediate ones: a grandchild overlaps its grandparent too. This stage
//! strips every edge whose target is already reachable through another
//! confirmed descendant, leaving each patch an explicit, duplicate-free
//! immediate-children list. Reachability is memoized per patch and built
//! iteratively in reverse catalog order (edges always point from a lower
//! position to a higher one), so deep hierarchies cost neither recursion
//! depth nor repeated traversal.
//!
//! A patch that still has several immediate parents afterwards (a fine patch
//! straddling two coarse ones) keeps only the edge from the first parent in
//! catalog order, preserving the forest invariant; the full immediate-parent
//! set survives as the patch's resolver list for extent propagation.

use log::debug;
use std::collections::HashSet;

/// Forest produced by the reduction.
#[derive(Clone, Debug, Default)]
pub struct Forest {
    /// Immediate children per catalog position, ascending, one parent each.
    pub children: Vec<Vec<usize>>,
    /// The retained parent per position, `None` for roots.
    pub parent: Vec<Option<usize>>,
    /// Every immediate parent per position in catalog order, including the
    /// edges dropped to keep the child relation a forest.
    pub resolvers: Vec<Vec<usize>>,
    pub dropped_transitive: usize,
    pub dropped_extra_parent: usize,
}

/// Reduce confirmed descendant lists to immediate parent/child edges.
pub fn reduce_to_forest(confirmed: &[Vec<usize>]) -> Forest {
    let n = confirmed.len();

    // Memoized reachability, filled from the back: every target of an edge
    // sits at a higher position than its source.
    let mut reach: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for d in (0..n).rev() {
        let mut set = HashSet::new();
        for &c in &confirmed[d] {
            set.insert(c);
            set.extend(reach[c].iter().copied());
        }
        reach[d] = set;
    }

    let mut forest = Forest {
        children: vec![Vec::new(); n],
        parent: vec![None; n],
        resolvers: vec![Vec::new(); n],
        ..Default::default()
    };

    for d in 0..n {
        for &c in &confirmed[d] {
            let covered = confirmed[d]
                .iter()
                .any(|&other| other != c && reach[other].contains(&c));
            if covered {
                forest.dropped_transitive += 1;
                continue;
            }
            forest.resolvers[c].push(d);
            if forest.parent[c].is_none() {
                forest.parent[c] = Some(d);
                forest.children[d].push(c);
            } else {
                forest.dropped_extra_parent += 1;
            }
        }
    }

    debug!(
        "reduce: domains={} dropped_transitive={} dropped_extra_parent={}",
        n, forest.dropped_transitive, forest.dropped_extra_parent
    );
    forest
}
