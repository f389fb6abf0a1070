use log::trace;
use num_traits::ToPrimitive;
use rustc_hash::FxHashSet;

use crate::algorithms::{profit, Error, Optimizer};
use crate::solution::Solution;

const DEFAULT_QUALITY: f64 = 0.1;

/// Boundary vertices of one section that may migrate to another one.
#[derive(Debug, Default)]
struct Boundary {
    vertices: Vec<usize>,
    members: FxHashSet<usize>,
}

impl Boundary {
    /// Vertices labeled `from` with at least one neighbor labeled `to`.
    fn between(solution: &Solution<'_>, from: usize, to: usize) -> Self {
        let mut boundary = Self::default();
        for vertex in 0..solution.len() {
            if solution[vertex] == from
                && solution
                    .graph()
                    .neighbors(vertex)
                    .iter()
                    .any(|&neighbor| solution[neighbor] == to)
            {
                boundary.insert(vertex);
            }
        }
        boundary
    }

    fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn insert(&mut self, vertex: usize) {
        if self.members.insert(vertex) {
            self.vertices.push(vertex);
        }
    }

    /// Remove and return the vertex with the highest profit toward `to`, the earliest one on ties.
    fn take_best(&mut self, solution: &Solution<'_>, to: usize) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (position, &vertex) in self.vertices.iter().enumerate() {
            let gain = profit(solution, vertex, to);
            if best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((position, gain));
            }
        }

        let (position, _) = best?;
        let vertex = self.vertices.remove(position);
        self.members.remove(&vertex);
        Some(vertex)
    }
}

/// Greedy two-way migration between every pair of sections.
///
/// For each ordered pair `(from, to)`, the most profitable boundary vertices of
/// `from` move to `to`, then as many of the most profitable boundary vertices of
/// `to` move back to `from`. The back and forth may make the cut temporarily
/// worse, which lets the partition leave local minima.
#[derive(Debug, Clone, Copy)]
pub struct GraphBooster {
    /// Fraction of the average section size that migrates in each direction,
    /// in `(0, 1]`. Large values slow the refinement down and rarely help.
    pub quality: f64,
}

impl GraphBooster {
    pub fn new(quality: f64) -> Result<Self, Error> {
        if !(quality > 0.0 && quality <= 1.0) {
            return Err(Error::InvalidQuality(quality));
        }
        Ok(Self { quality })
    }

    /// Number of vertices that migrate in each direction.
    fn migration_limit(&self, solution: &Solution<'_>) -> usize {
        let section_size = (solution.len() / solution.k_section()).to_f64().unwrap_or(0.0);
        (section_size * self.quality).floor().to_usize().unwrap_or(0)
    }

    // Move up to `limit` vertices of `boundary` from `from` to `to`, growing the
    // boundary with the `from` neighbors of every moved vertex.
    fn migrate(solution: &mut Solution<'_>, mut boundary: Boundary, from: usize, to: usize, limit: usize) -> usize {
        let mut moved = 0;
        while moved < limit {
            let Some(vertex) = boundary.take_best(solution, to) else {
                break;
            };
            solution.assign(vertex, to);
            moved += 1;

            for &neighbor in solution.graph().neighbors(vertex) {
                if solution[neighbor] == from {
                    boundary.insert(neighbor);
                }
            }
        }
        moved
    }
}

impl Default for GraphBooster {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Optimizer for GraphBooster {
    fn optimize(&self, solution: &mut Solution<'_>) -> Result<(), Error> {
        let k_section = solution.k_section();
        if k_section == 0 {
            return Ok(());
        }
        let limit = self.migration_limit(solution);

        for from in 1..=k_section {
            for to in 1..=k_section {
                if from == to {
                    continue;
                }

                let forward = Boundary::between(solution, from, to);
                if forward.is_empty() {
                    continue;
                }
                let moved_forward = Self::migrate(solution, forward, from, to, limit);

                let backward = Boundary::between(solution, to, from);
                if backward.is_empty() {
                    return Err(Error::Infeasible);
                }
                let moved_backward = Self::migrate(solution, backward, to, from, limit);

                trace!(
                    "booster {from} <-> {to}: {moved_forward} forward, {moved_backward} back, cut {}",
                    solution.cross_power()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{cycle, grid, path};
    use crate::graph::Graph;

    #[test]
    fn test_new_rejects_bad_quality() {
        assert_eq!(GraphBooster::new(0.0).unwrap_err(), Error::InvalidQuality(0.0));
        assert_eq!(GraphBooster::new(1.5).unwrap_err(), Error::InvalidQuality(1.5));
        assert!(GraphBooster::new(f64::NAN).is_err());
        assert!(GraphBooster::new(1.0).is_ok());
    }

    #[test]
    fn test_migration_limit() {
        // Arrange
        let graph = grid(10, 10);
        let solution = Solution::new(&graph, 4);

        // Act and Assert
        assert_eq!(GraphBooster::default().migration_limit(&solution), 2);
        assert_eq!(GraphBooster::new(0.5).unwrap().migration_limit(&solution), 12);
        assert_eq!(GraphBooster::new(0.01).unwrap().migration_limit(&solution), 0);
    }

    #[test]
    fn test_boundary_between() {
        // Arrange
        let graph = path(6);
        let solution = Solution::from_labels(&graph, 2, vec![1, 1, 1, 2, 2, 2]).unwrap();

        // Act
        let boundary = Boundary::between(&solution, 1, 2);

        // Assert
        assert_eq!(boundary.vertices, vec![2]);
    }

    #[test]
    fn test_take_best_prefers_highest_profit() {
        // Arrange: vertex 2 has two neighbors in section 2, vertex 0 only one.
        let graph = Graph::from_adjacency(&[vec![3], vec![2], vec![3, 4], vec![], vec![]]).unwrap();
        let solution = Solution::from_labels(&graph, 2, vec![1, 1, 1, 2, 2]).unwrap();
        let mut boundary = Boundary::default();
        boundary.insert(0);
        boundary.insert(2);

        // Act
        let best = boundary.take_best(&solution, 2);

        // Assert
        assert_eq!(best, Some(2));
        assert_eq!(boundary.vertices, vec![0]);
        assert!(!boundary.members.contains(&2));
    }

    #[test]
    fn test_keeps_labels_valid() {
        // Arrange
        let graph = grid(8, 8);
        let labels = (0..64).map(|v| if v % 8 < 4 { 1 } else { 2 }).collect();
        let mut solution = Solution::from_labels(&graph, 2, labels).unwrap();

        // Act
        GraphBooster::new(0.25).unwrap().optimize(&mut solution).unwrap();

        // Assert
        assert_eq!(solution.k_section(), 2);
        assert!(solution.is_complete());
    }

    #[test]
    fn test_small_sections_are_untouched_by_default() {
        let graph = cycle(4);
        let mut solution = Solution::from_labels(&graph, 2, vec![1, 1, 2, 2]).unwrap();

        GraphBooster::default().optimize(&mut solution).unwrap();

        assert_eq!(solution.labels(), &[1, 1, 2, 2]);
    }

    #[test]
    fn test_emptied_section_is_infeasible() {
        // Section 1 is a single vertex; moving it leaves nothing to come back to.
        let graph = path(3);
        let mut solution = Solution::from_labels(&graph, 2, vec![1, 2, 2]).unwrap();

        let result = GraphBooster::new(1.0).unwrap().optimize(&mut solution);

        assert_eq!(result.unwrap_err(), Error::Infeasible);
    }
}
