use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::algorithms::{
    Decomposer, Error, FiducciaMattheyses, GraphBooster, MergeNodes, Optimizer, Reducer, RegionGrowing,
};
use crate::graph::Graph;
use crate::solution::Solution;
use crate::Partition;

/// Local refinement run after the initial decomposition and after every uncoarsening step.
#[derive(Debug, Clone, Copy)]
pub enum Refinement {
    BoundarySwap(FiducciaMattheyses),
    Booster(GraphBooster),
}

impl Default for Refinement {
    fn default() -> Self {
        Refinement::BoundarySwap(FiducciaMattheyses)
    }
}

impl Optimizer for Refinement {
    fn optimize(&self, solution: &mut Solution<'_>) -> Result<(), Error> {
        match self {
            Refinement::BoundarySwap(optimizer) => optimizer.optimize(solution),
            Refinement::Booster(optimizer) => optimizer.optimize(solution),
        }
    }
}

/// Multilevel Partitioner
///
/// The graph is coarsened `levels` times by pairing light adjacent vertices.
/// The coarsest graph is decomposed into `k_section` sections by region growing,
/// and the decomposition is projected back level by level, refined after every
/// projection.
///
/// # Example
///
/// ```rust
/// use gpart::algorithms::MultiLevelPartitioner;
/// use gpart::graph::Graph;
/// # fn main() -> Result<(), gpart::Error> {
///
///     // Two triangles joined by the edge 2 - 3.
///     let graph = Graph::from_adjacency(&[vec![1, 2], vec![2], vec![3], vec![4, 5], vec![5], vec![]])?;
///
///     let partitioner = MultiLevelPartitioner { seed: Some(5), ..Default::default() };
///     let solution = partitioner.run(&graph, 2, 0)?;
///
///     assert!(solution.is_complete());
///     assert_eq!(solution.cross_power(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MultiLevelPartitioner {
    /// Number of sections used by [`Partition::partition`].
    pub num_of_partitions: usize,

    /// Coarsening depth used by [`Partition::partition`].
    pub levels: i32,

    /// Seed for the random choice of the region growing start vertex.
    pub seed: Option<u64>,

    pub decomposer: RegionGrowing,
    pub reducer: MergeNodes,
    pub optimizer: Refinement,
}

impl Default for MultiLevelPartitioner {
    fn default() -> Self {
        MultiLevelPartitioner {
            num_of_partitions: 2,
            levels: 2,
            seed: None,
            decomposer: RegionGrowing::default(),
            reducer: MergeNodes,
            optimizer: Refinement::default(),
        }
    }
}

impl MultiLevelPartitioner {
    /// Partition `graph` into `k_section` sections after `levels` coarsening steps.
    pub fn run<'g>(&self, graph: &'g Graph, k_section: usize, levels: i32) -> Result<Solution<'g>, Error> {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.run_with_rng(graph, k_section, levels, &mut rng)
    }

    /// Same as [`MultiLevelPartitioner::run`] with a caller-owned random source.
    pub fn run_with_rng<'g>(
        &self,
        graph: &'g Graph,
        k_section: usize,
        levels: i32,
        rng: &mut SmallRng,
    ) -> Result<Solution<'g>, Error> {
        if levels < 0 {
            return Err(Error::InvalidLevels(levels));
        }
        self.process(graph, k_section, levels, rng)
    }

    // Coarsen, solve the coarser graph, then project its solution back and refine.
    fn process<'g>(
        &self,
        graph: &'g Graph,
        k_section: usize,
        levels: i32,
        rng: &mut SmallRng,
    ) -> Result<Solution<'g>, Error> {
        if levels == 0 {
            let mut solution = self.decomposer.decompose(graph, k_section, rng)?;
            self.optimizer.optimize(&mut solution)?;
            debug!(
                "coarsest level: {} vertices, {} edges, cut {}",
                graph.len(),
                graph.total_edges(),
                solution.cross_power()
            );
            return Ok(solution);
        }

        let mut clusters = self.reducer.reduce(graph);
        let coarse_graph = Graph::contract(&clusters);
        debug!(
            "level {levels}: {} vertices reduced to {}",
            graph.len(),
            coarse_graph.len()
        );

        let coarse = self.process(&coarse_graph, k_section, levels - 1, rng)?;
        clusters.merge(&coarse)?;
        self.optimizer.optimize(&mut clusters)?;
        debug!(
            "level {levels}: {} vertices, {} edges, cut {}",
            graph.len(),
            graph.total_edges(),
            clusters.cross_power()
        );

        Ok(clusters)
    }
}

impl<'a> Partition<&'a Graph> for MultiLevelPartitioner {
    type Metadata = usize;
    type Error = Error;

    fn partition(&mut self, part_ids: &mut [usize], graph: &'a Graph) -> Result<Self::Metadata, Self::Error> {
        if part_ids.len() != graph.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: graph.len(),
            });
        }

        let solution = self.run(graph, self.num_of_partitions, self.levels)?;
        part_ids.copy_from_slice(solution.labels());

        Ok(solution.cross_power())
    }
}
