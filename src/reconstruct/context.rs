//! Working set of one reconstruction pass.

use crate::assembly::RootLayout;
use crate::catalog::DomainCatalog;
use crate::extents::ExtentMap;
use crate::forest::Forest;
use crate::levels::LevelAssignment;
use crate::ratios::RatioTable;

/// Owns the patch collection and every structure derived from it during one
/// pass. Nothing here survives or mutates across passes: a pass is a pure
/// function of its input descriptors and the backend's answers, and later
/// stages read earlier results only through this context.
#[derive(Clone, Debug)]
pub struct ReconstructionContext {
    pub catalog: DomainCatalog,
    /// Candidate descendants per catalog position.
    pub candidates: Vec<Vec<usize>>,
    /// Confirmed descendants per catalog position.
    pub confirmed: Vec<Vec<usize>>,
    pub forest: Forest,
    pub levels: LevelAssignment,
    pub ratios: RatioTable,
    /// Present when several coarsest-level roots required assembly.
    pub layout: Option<RootLayout>,
    pub extents: ExtentMap,
}
