//! Height and refinement-level assignment over the reduced forest.

use log::debug;

/// Heights and levels per catalog position. Level zero is the coarsest.
#[derive(Clone, Debug, Default)]
pub struct LevelAssignment {
    pub heights: Vec<u32>,
    pub levels: Vec<u32>,
    pub max_height: u32,
    /// Positions attaining the maximum height, i.e. the coarsest-level roots.
    pub roots: Vec<usize>,
}

impl LevelAssignment {
    pub fn level_count(&self) -> usize {
        self.max_height as usize + 1
    }
}

/// Compute `height(d) = 0` for leaves, else one past the tallest child, then
/// derive `level(d) = max_height - height(d)`. Children always sit at higher
/// catalog positions than their parent, so one reverse sweep suffices.
pub fn assign_levels(children: &[Vec<usize>]) -> LevelAssignment {
    let n = children.len();
    let mut heights = vec![0u32; n];
    for d in (0..n).rev() {
        heights[d] = children[d]
            .iter()
            .map(|&c| heights[c] + 1)
            .max()
            .unwrap_or(0);
    }

    let max_height = heights.iter().copied().max().unwrap_or(0);
    let levels: Vec<u32> = heights.iter().map(|&h| max_height - h).collect();
    let roots: Vec<usize> = (0..n).filter(|&d| heights[d] == max_height).collect();

    debug!(
        "levels: domains={} max_height={} roots={}",
        n,
        max_height,
        roots.len()
    );
    LevelAssignment {
        heights,
        levels,
        max_height,
        roots,
    }
}
