use rand::rngs::SmallRng;
use thiserror::Error;

use crate::graph::Graph;
use crate::solution::Solution;

mod builder;
mod fiduccia_mattheyses;
mod graph_booster;
mod merge_nodes;
mod multilevel_partitioner;
mod region_growing;
mod start_node_detector;

pub use builder::AlgorithmBuilder;
pub use fiduccia_mattheyses::FiducciaMattheyses;
pub use graph_booster::GraphBooster;
pub use merge_nodes::MergeNodes;
pub use multilevel_partitioner::{MultiLevelPartitioner, Refinement};
pub use region_growing::RegionGrowing;
pub use start_node_detector::StartNodeDetector;

/// Common errors thrown by algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The graph has no vertices but the algorithm needs at least one.
    #[error("graph has no vertices")]
    InvalidGraph,

    /// The requested number of sections is not positive.
    #[error("number of sections must be positive")]
    InvalidKSection,

    /// The requested coarsening depth is negative.
    #[error("number of levels must be non-negative (got {0})")]
    InvalidLevels(i32),

    /// The working set of an algorithm ran dry before the partition was complete.
    #[error("no feasible partition found")]
    Infeasible,

    /// Input sets don't have matching lengths.
    #[error("input sets don't have the same length (expected {expected} items, got {actual})")]
    InputLenMismatch { expected: usize, actual: usize },

    /// A neighbor index points outside of the graph.
    #[error("vertex {vertex} is out of range for a graph of {len} vertices")]
    VertexOutOfRange { vertex: usize, len: usize },

    /// Vertex weights must be at least one.
    #[error("vertex {vertex} has weight {weight}, expected at least 1")]
    NonPositiveWeight { vertex: usize, weight: i64 },

    /// A label cannot be projected through a coarser solution.
    #[error("label {label} has no counterpart in a solution of {len} vertices")]
    LabelOutOfRange { label: usize, len: usize },

    /// A quality fraction outside of `(0, 1]`.
    #[error("quality must lie in (0, 1] (got {0})")]
    InvalidQuality(f64),
}

/// Finds vertices far away from the center of a graph.
pub trait PeripheralDetector {
    /// Returns the pseudo-peripheral vertices of `graph`, never empty on success.
    fn detect(&self, graph: &Graph) -> Result<Vec<usize>, Error>;
}

/// Computes an initial partition of a graph from scratch.
///
/// On success every vertex carries a label in `1..=k_section`.
pub trait Decomposer {
    fn decompose<'g>(
        &self,
        graph: &'g Graph,
        k_section: usize,
        rng: &mut SmallRng,
    ) -> Result<Solution<'g>, Error>;
}

/// Groups the vertices of a graph into clusters of one or two adjacent vertices.
///
/// The returned solution labels clusters `0..k_section`, ready for
/// [`Graph::contract`].
pub trait Reducer {
    fn reduce<'g>(&self, graph: &'g Graph) -> Solution<'g>;
}

/// Improves an existing partition in place without changing its number of sections.
pub trait Optimizer {
    fn optimize(&self, solution: &mut Solution<'_>) -> Result<(), Error>;
}

/// Number of neighbors of `vertex` labeled `label`.
pub(crate) fn connections(solution: &Solution<'_>, vertex: usize, label: usize) -> i64 {
    solution
        .graph()
        .neighbors(vertex)
        .iter()
        .filter(|&&neighbor| solution[neighbor] == label)
        .count() as i64
}

/// Gain in local connectivity when `vertex` moves to section `to`.
pub(crate) fn profit(solution: &Solution<'_>, vertex: usize, to: usize) -> i64 {
    connections(solution, vertex, to) - connections(solution, vertex, solution[vertex])
}
