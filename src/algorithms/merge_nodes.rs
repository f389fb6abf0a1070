use crate::algorithms::Reducer;
use crate::graph::Graph;
use crate::solution::Solution;

const UNMATCHED: usize = usize::MAX;

/// Coarsening by greedy pairing of light vertices.
///
/// Vertices are visited by increasing weight. An unmatched vertex opens a new
/// cluster and pulls in its lightest unmatched neighbor, if any, so that every
/// cluster holds one or two adjacent vertices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeNodes;

impl MergeNodes {
    // The lightest unmatched neighbor of `vertex`, the first one in adjacency order on ties.
    fn lightest_unmatched_neighbor(graph: &Graph, clusters: &[usize], vertex: usize) -> Option<usize> {
        graph
            .neighbors(vertex)
            .iter()
            .copied()
            .filter(|&neighbor| clusters[neighbor] == UNMATCHED)
            .fold(None, |lightest: Option<usize>, neighbor| match lightest {
                Some(current) if graph.weight(current) <= graph.weight(neighbor) => Some(current),
                _ => Some(neighbor),
            })
    }
}

impl Reducer for MergeNodes {
    fn reduce<'g>(&self, graph: &'g Graph) -> Solution<'g> {
        let mut vertices: Vec<usize> = (0..graph.len()).collect();
        vertices.sort_by_key(|&vertex| graph.weight(vertex));

        let mut clusters = vec![UNMATCHED; graph.len()];
        let mut num_of_clusters = 0;

        for vertex in vertices {
            // If already matched, then ignore
            if clusters[vertex] != UNMATCHED {
                continue;
            }

            clusters[vertex] = num_of_clusters;
            if let Some(neighbor) = Self::lightest_unmatched_neighbor(graph, &clusters, vertex) {
                clusters[neighbor] = num_of_clusters;
            }
            num_of_clusters += 1;
        }

        Solution::clustering(graph, num_of_clusters, clusters)
    }
}
