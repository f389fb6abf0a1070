// Boundary-swap refinement in the spirit of Fiduccia and Mattheyses.
//
// # Reference
//
// Fiduccia, C. M., and Mattheyses, R. M. "A linear-time heuristic for improving
// network partitions." 19th Design Automation Conference (1982): 175-181.

use log::trace;
use rustc_hash::FxHashMap;

use crate::algorithms::{profit, Error, Optimizer};
use crate::solution::Solution;

/// Vertices that gain by moving, grouped by ordered pair of sections.
///
/// Only pairs with `from != to` ever get an entry.
#[derive(Debug, Default)]
struct Candidates {
    moves: FxHashMap<(usize, usize), Vec<usize>>,
}

impl Candidates {
    fn push(&mut self, from: usize, to: usize, vertex: usize) {
        debug_assert_ne!(from, to);
        self.moves.entry((from, to)).or_default().push(vertex);
    }

    fn count(&self, from: usize, to: usize) -> usize {
        self.moves.get(&(from, to)).map_or(0, Vec::len)
    }

    fn pop(&mut self, from: usize, to: usize) -> Option<usize> {
        self.moves.get_mut(&(from, to)).and_then(Vec::pop)
    }
}

/// Boundary-swap refinement.
///
/// Each pass collects, for every ordered pair of sections `(from, to)`, the
/// vertices of `from` that have more neighbors in `to` than in `from`. Vertices
/// are then exchanged pairwise between `from` and `to`, as many as the smaller
/// of the two sides, so section sizes stay as they were. Passes repeat while the
/// cut keeps shrinking; a pass that makes the cut worse is undone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiducciaMattheyses;

impl FiducciaMattheyses {
    fn collect_candidates(solution: &Solution<'_>) -> Candidates {
        let mut candidates = Candidates::default();

        for vertex in 0..solution.len() {
            let from = solution[vertex];
            // Record the vertex once, toward the first improving section in adjacency order.
            let target = solution
                .graph()
                .neighbors(vertex)
                .iter()
                .map(|&neighbor| solution[neighbor])
                .find(|&to| to != from && profit(solution, vertex, to) > 0);

            if let Some(to) = target {
                candidates.push(from, to, vertex);
            }
        }

        candidates
    }

    fn swap_candidates(solution: &mut Solution<'_>, mut candidates: Candidates) {
        let k_section = solution.k_section();

        for from in 1..=k_section {
            for to in 1..=k_section {
                if from == to {
                    continue;
                }

                let count = candidates.count(from, to).min(candidates.count(to, from));
                for _ in 0..count {
                    if let (Some(forward), Some(backward)) = (candidates.pop(from, to), candidates.pop(to, from)) {
                        solution.assign(forward, to);
                        solution.assign(backward, from);
                    }
                }
            }
        }
    }
}

impl Optimizer for FiducciaMattheyses {
    fn optimize(&self, solution: &mut Solution<'_>) -> Result<(), Error> {
        let mut actual = solution.cross_power();
        let mut pass = 0;

        loop {
            let before = actual;
            let snapshot = solution.labels().to_vec();

            let candidates = Self::collect_candidates(solution);
            Self::swap_candidates(solution, candidates);

            actual = solution.cross_power();
            pass += 1;
            trace!("boundary swap pass {pass}: cut {before} -> {actual}");

            if actual > before {
                for (vertex, &label) in snapshot.iter().enumerate() {
                    solution.assign(vertex, label);
                }
                break;
            }
            if actual == before {
                break;
            }
        }

        Ok(())
    }
}
