use log::debug;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::algorithms::{connections, Decomposer, Error, PeripheralDetector, StartNodeDetector};
use crate::graph::Graph;
use crate::solution::{Solution, UNASSIGNED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierVertex {
    vertex: usize,

    // Breadth-first distance from the seed of the region that reached it.
    radius: usize,
}

/// Unassigned vertices adjacent to the regions grown so far, in insertion order.
#[derive(Debug, Default)]
struct Frontier {
    entries: Vec<FrontierVertex>,
}

impl Frontier {
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains(&self, vertex: usize) -> bool {
        self.entries.iter().any(|entry| entry.vertex == vertex)
    }

    fn push(&mut self, vertex: usize, radius: usize) {
        self.entries.push(FrontierVertex { vertex, radius });
    }

    fn take(&mut self, position: usize) -> FrontierVertex {
        self.entries.remove(position)
    }

    /// Position of the vertex with the fewest assigned neighbors.
    fn least_connected(&self, solution: &Solution<'_>) -> Option<usize> {
        let graph = solution.graph();
        let assigned_neighbors =
            |entry: &FrontierVertex| graph.degree(entry.vertex) as i64 - connections(solution, entry.vertex, UNASSIGNED);

        let mut best: Option<(usize, i64)> = None;
        for (position, entry) in self.entries.iter().enumerate() {
            let power = assigned_neighbors(entry);
            if best.map_or(true, |(_, best_power)| power < best_power) {
                best = Some((position, power));
            }
        }
        best.map(|(position, _)| position)
    }

    /// Position of the vertex with the most neighbors in `section`.
    fn most_connected(&self, solution: &Solution<'_>, section: usize, radius_aware: bool) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (position, entry) in self.entries.iter().enumerate() {
            let power = connections(solution, entry.vertex, section);
            let better = match best {
                None => true,
                Some((best_position, best_power)) => {
                    power > best_power
                        || (radius_aware && power == best_power && entry.radius < self.entries[best_position].radius)
                }
            };
            if better {
                best = Some((position, power));
            }
        }
        best.map(|(position, _)| position)
    }
}

/// Region growing decomposition.
///
/// Regions are grown one after the other from a pseudo-peripheral vertex. Each
/// region starts from the frontier vertex least attached to the regions already
/// grown and absorbs the frontier vertex most attached to it until it holds its
/// share of the remaining weight.
///
/// With `radius_aware` set, frontier vertices equally attached to the region are
/// ranked by their distance to the region's seed, which keeps regions compact.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionGrowing {
    pub start_node_detector: StartNodeDetector,
    pub radius_aware: bool,
}

impl RegionGrowing {
    pub fn new(start_node_detector: StartNodeDetector, radius_aware: bool) -> Self {
        Self {
            start_node_detector,
            radius_aware,
        }
    }

    // Label the vertex and push its unassigned neighbors on the frontier.
    fn absorb(solution: &mut Solution<'_>, frontier: &mut Frontier, node: FrontierVertex, section: usize) {
        solution.assign(node.vertex, section);

        for &neighbor in solution.graph().neighbors(node.vertex) {
            if solution[neighbor] == UNASSIGNED && !frontier.contains(neighbor) {
                frontier.push(neighbor, node.radius + 1);
            }
        }
    }
}

impl Decomposer for RegionGrowing {
    fn decompose<'g>(&self, graph: &'g Graph, k_section: usize, rng: &mut SmallRng) -> Result<Solution<'g>, Error> {
        if graph.is_empty() {
            return Err(Error::InvalidGraph);
        }
        if k_section == 0 {
            return Err(Error::InvalidKSection);
        }

        let start_nodes = self.start_node_detector.detect(graph)?;
        if start_nodes.is_empty() {
            return Err(Error::Infeasible);
        }
        let run_node = start_nodes[rng.gen_range(0..start_nodes.len())];
        debug!("region growing from vertex {run_node} among {} candidates", start_nodes.len());

        let mut solution = Solution::new(graph, k_section);
        let mut frontier = Frontier::default();
        frontier.push(run_node, 0);

        let mut total = 0;
        for section in 1..=k_section {
            let position = frontier.least_connected(&solution).ok_or(Error::Infeasible)?;
            let mut node = frontier.take(position);
            node.radius = 0;
            Self::absorb(&mut solution, &mut frontier, node, section);

            let remaining_sections = (k_section - section + 1) as i64;
            let mut weight = graph.weight(node.vertex);
            while weight < (graph.total_weight() - total) / remaining_sections {
                let position = frontier
                    .most_connected(&solution, section, self.radius_aware)
                    .ok_or(Error::Infeasible)?;
                node = frontier.take(position);
                Self::absorb(&mut solution, &mut frontier, node, section);
                weight += graph.weight(node.vertex);
            }

            total += weight;
        }

        if !frontier.is_empty() || !solution.is_complete() {
            return Err(Error::Infeasible);
        }

        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::graph::tests::{cycle, grid, path};

    fn section_weights(solution: &Solution<'_>) -> Vec<i64> {
        let mut weights = vec![0; solution.k_section() + 1];
        for vertex in 0..solution.len() {
            weights[solution[vertex]] += solution.graph().weight(vertex);
        }
        weights
    }

    #[test]
    fn test_cycle_into_two_sections() {
        // Arrange
        let graph = cycle(4);
        let mut rng = SmallRng::seed_from_u64(5);

        // Act
        let solution = RegionGrowing::default().decompose(&graph, 2, &mut rng).unwrap();

        // Assert
        assert_eq!(solution.labels(), &[1, 1, 2, 2]);
        assert_eq!(solution.cross_power(), 2);
    }

    #[test]
    fn test_grid_sections_are_balanced() {
        // Arrange
        let graph = grid(6, 6);

        for radius_aware in [false, true] {
            let mut rng = SmallRng::seed_from_u64(7);

            // Act
            let solution = RegionGrowing::new(StartNodeDetector::default(), radius_aware)
                .decompose(&graph, 4, &mut rng)
                .unwrap();

            // Assert
            assert!(solution.is_complete());
            assert_eq!(section_weights(&solution), vec![0, 9, 9, 9, 9]);
        }
    }

    #[test]
    fn test_single_section_takes_everything() {
        let graph = grid(3, 3);
        let mut rng = SmallRng::seed_from_u64(1);

        let solution = RegionGrowing::default().decompose(&graph, 1, &mut rng).unwrap();

        assert_eq!(solution.labels(), &[1; 9]);
        assert_eq!(solution.cross_power(), 0);
    }

    #[test]
    fn test_weighted_vertices() {
        // Path 0 - 1 - 2 - 3 with one heavy end.
        let graph = Graph::with_weights(&[vec![1], vec![2], vec![3], vec![]], vec![1, 1, 1, 3]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        let solution = RegionGrowing::default().decompose(&graph, 2, &mut rng).unwrap();

        assert_eq!(solution.labels(), &[1, 1, 1, 2]);
    }

    #[test]
    fn test_radius_breaks_ties_toward_seed() {
        // Arrange: star centered on 0 with arms 1 - 2 and 3 - 4.
        let graph = Graph::from_adjacency(&[vec![1, 3], vec![2], vec![], vec![4], vec![]]).unwrap();
        let mut solution = Solution::new(&graph, 1);
        let mut frontier = Frontier::default();
        frontier.push(2, 5);
        frontier.push(4, 1);
        solution.assign(0, 1);
        solution.assign(1, 1);
        solution.assign(3, 1);

        // Act
        let plain = frontier.most_connected(&solution, 1, false);
        let compact = frontier.most_connected(&solution, 1, true);

        // Assert
        assert_eq!(plain, Some(0));
        assert_eq!(compact, Some(1));
    }

    #[test]
    fn test_more_sections_than_vertices() {
        let graph = path(3);
        let mut rng = SmallRng::seed_from_u64(5);

        let result = RegionGrowing::default().decompose(&graph, 4, &mut rng);

        assert_eq!(result.unwrap_err(), Error::Infeasible);
    }

    #[test]
    fn test_disconnected_graph_is_infeasible() {
        let graph = Graph::from_adjacency(&[vec![1], vec![], vec![3], vec![]]).unwrap();
        let mut rng = SmallRng::seed_from_u64(5);

        let result = RegionGrowing::default().decompose(&graph, 1, &mut rng);

        assert_eq!(result.unwrap_err(), Error::Infeasible);
    }

    #[test]
    fn test_invalid_input() {
        let mut rng = SmallRng::seed_from_u64(5);

        let empty = Graph::new();
        let graph = path(3);

        assert_eq!(
            RegionGrowing::default().decompose(&empty, 2, &mut rng).unwrap_err(),
            Error::InvalidGraph
        );
        assert_eq!(
            RegionGrowing::default().decompose(&graph, 0, &mut rng).unwrap_err(),
            Error::InvalidKSection
        );
    }
}
