// Pseudo-peripheral vertex search.
//
// A breadth-first search from a vertex reaches the vertices farthest from it in
// its last level. Searching again from those vertices moves the result toward
// the periphery of the graph. Each repetition is a quality round.

use rustc_hash::FxHashSet;

use crate::algorithms::{Error, PeripheralDetector};
use crate::graph::Graph;

const DEFAULT_QUALITY: usize = 2;

/// Three consecutive breadth-first levels, indexed modulo 3.
///
/// The neighbors of level `d` all lie in levels `d - 1`, `d` or `d + 1`, so
/// three levels are enough to tell visited vertices apart from new ones.
struct Levels {
    data: [FxHashSet<usize>; 3],
}

impl Levels {
    fn new() -> Self {
        Self {
            data: Default::default(),
        }
    }

    fn get(&self, depth: usize) -> &FxHashSet<usize> {
        &self.data[depth % 3]
    }

    fn get_mut(&mut self, depth: usize) -> &mut FxHashSet<usize> {
        &mut self.data[depth % 3]
    }

    fn clear_all(&mut self) {
        self.data.iter_mut().for_each(|level| level.clear());
    }

    fn contains(&self, vertex: usize) -> bool {
        self.data.iter().any(|level| level.contains(&vertex))
    }

    /// Build level `depth + 1` from level `depth` and return its size.
    fn expand(&mut self, graph: &Graph, depth: usize) -> usize {
        self.get_mut(depth + 1).clear();

        let mut next = FxHashSet::default();
        for &vertex in self.get(depth) {
            for &neighbor in graph.neighbors(vertex) {
                if !self.contains(neighbor) {
                    next.insert(neighbor);
                }
            }
        }

        let added = next.len();
        *self.get_mut(depth + 1) = next;
        added
    }
}

/// Pseudo-peripheral vertex detector.
///
/// # Example
///
/// ```rust
/// use gpart::algorithms::{PeripheralDetector, StartNodeDetector};
/// use gpart::graph::Graph;
///
/// # fn main() -> Result<(), gpart::Error> {
/// let path = Graph::from_adjacency(&[vec![1], vec![2], vec![3], vec![4], vec![]])?;
/// let peripheral = StartNodeDetector::default().detect(&path)?;
/// assert!(peripheral.contains(&0) || peripheral.contains(&4));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StartNodeDetector {
    /// Number of quality rounds. More rounds give vertices farther from the
    /// center at a higher cost; 2 or 3 is usually enough.
    pub quality: usize,
}

impl StartNodeDetector {
    pub fn new(quality: usize) -> Self {
        Self { quality }
    }

    /// Vertices of the last level of a breadth-first search from `seed`.
    fn farthest_from(graph: &Graph, seed: usize, levels: &mut Levels) -> Vec<usize> {
        levels.clear_all();
        levels.get_mut(0).insert(seed);

        let mut depth = 0;
        let mut visited = 1;

        // Two levels per iteration, the second one may come out empty.
        while visited < graph.len() && !levels.get(depth).is_empty() {
            visited += levels.expand(graph, depth);
            visited += levels.expand(graph, depth + 1);
            depth += 2;
        }

        // The level before an empty one is never empty, so one of the three
        // slots holds the last level of the component.
        let last = (0..3)
            .map(|back| depth + 3 - back)
            .find(|&slot| !levels.get(slot).is_empty())
            .unwrap_or(depth);

        levels.get(last).iter().copied().collect()
    }
}

impl Default for StartNodeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY)
    }
}

impl PeripheralDetector for StartNodeDetector {
    fn detect(&self, graph: &Graph) -> Result<Vec<usize>, Error> {
        if graph.is_empty() {
            return Err(Error::InvalidGraph);
        }

        let mut levels = Levels::new();
        let mut seeds = vec![0];

        for _ in 0..self.quality {
            let mut frontier = FxHashSet::default();
            for &seed in &seeds {
                frontier.extend(Self::farthest_from(graph, seed, &mut levels));
            }

            seeds = frontier.into_iter().collect();
            seeds.sort_unstable();
        }

        Ok(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{cycle, grid, path};

    #[test]
    fn test_detect_on_path() {
        // Arrange
        let graph = path(5);

        // Act
        let peripheral = StartNodeDetector::default().detect(&graph).unwrap();

        // Assert
        assert_eq!(peripheral, vec![0]);
    }

    #[test]
    fn test_first_round_reaches_far_end() {
        let graph = path(5);

        let peripheral = StartNodeDetector::new(1).detect(&graph).unwrap();

        assert_eq!(peripheral, vec![4]);
    }

    #[test]
    fn test_even_depth_uses_last_non_empty_level() {
        // Levels from 0 are {0}, {1}, {2}, {3}: the last expansion is empty.
        let graph = path(4);

        let peripheral = StartNodeDetector::new(1).detect(&graph).unwrap();

        assert_eq!(peripheral, vec![3]);
    }

    #[test]
    fn test_detect_on_cycle() {
        // Arrange
        let graph = cycle(4);

        // Act
        let first_round = StartNodeDetector::new(1).detect(&graph).unwrap();
        let second_round = StartNodeDetector::new(2).detect(&graph).unwrap();

        // Assert
        assert_eq!(first_round, vec![2]);
        assert_eq!(second_round, vec![0]);
    }

    #[test]
    fn test_detect_on_grid_returns_origin_corner() {
        let graph = grid(3, 4);

        let peripheral = StartNodeDetector::default().detect(&graph).unwrap();

        assert_eq!(peripheral, vec![0]);
    }

    #[test]
    fn test_zero_quality_keeps_first_vertex() {
        let graph = path(5);

        let peripheral = StartNodeDetector::new(0).detect(&graph).unwrap();

        assert_eq!(peripheral, vec![0]);
    }

    #[test]
    fn test_single_vertex() {
        let graph = Graph::from_adjacency(&[vec![]]).unwrap();

        let peripheral = StartNodeDetector::default().detect(&graph).unwrap();

        assert_eq!(peripheral, vec![0]);
    }

    #[test]
    fn test_disconnected_graph_stays_in_component() {
        // Path 0 - 1 - 2 plus isolated vertex 3.
        let graph = Graph::from_adjacency(&[vec![1], vec![2], vec![], vec![]]).unwrap();

        let peripheral = StartNodeDetector::new(1).detect(&graph).unwrap();

        assert_eq!(peripheral, vec![2]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();

        let result = StartNodeDetector::default().detect(&graph);

        assert_eq!(result.unwrap_err(), Error::InvalidGraph);
    }
}
