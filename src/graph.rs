use rustc_hash::FxHashSet;
use sprs::{CsMat, TriMat};

use crate::algorithms::Error;
use crate::solution::Solution;

/// Struct that represents an undirected graph with weighted vertices.
#[derive(Clone, Debug)]
pub struct Graph {
    /// The CsMat (from sprs) stores the symmetric adjacency pattern in CSR format.
    /// Every stored entry is 1 and the diagonal is always empty.
    graph_csr: CsMat<u32>,

    /// Weight of every vertex, each one at least 1.
    vertex_weights: Vec<i64>,

    /// Sum of `vertex_weights`.
    weight: i64,
}

impl Graph {
    /// Create a graph without any vertex.
    pub fn new() -> Self {
        Self {
            graph_csr: CsMat::empty(sprs::CSR, 0),
            vertex_weights: Vec::new(),
            weight: 0,
        }
    }

    /// Create a graph with unit vertex weights from per-vertex neighbor lists.
    ///
    /// Lists don't need to be symmetric; an edge listed on either side is
    /// present on both. Self-loops and repeated neighbors are dropped.
    pub fn from_adjacency(adjacency: &[Vec<usize>]) -> Result<Self, Error> {
        Self::with_weights(adjacency, vec![1; adjacency.len()])
    }

    /// Create a graph from per-vertex neighbor lists and vertex weights.
    pub fn with_weights(adjacency: &[Vec<usize>], vertex_weights: Vec<i64>) -> Result<Self, Error> {
        let num_of_vertices = adjacency.len();
        if vertex_weights.len() != num_of_vertices {
            return Err(Error::InputLenMismatch {
                expected: num_of_vertices,
                actual: vertex_weights.len(),
            });
        }
        if let Some((vertex, &weight)) = vertex_weights.iter().enumerate().find(|&(_, &w)| w < 1) {
            return Err(Error::NonPositiveWeight { vertex, weight });
        }

        let mut edges = FxHashSet::default();
        for (vertex, neighbors) in adjacency.iter().enumerate() {
            for &neighbor in neighbors {
                if neighbor >= num_of_vertices {
                    return Err(Error::VertexOutOfRange {
                        vertex: neighbor,
                        len: num_of_vertices,
                    });
                }
                if neighbor != vertex {
                    edges.insert((vertex, neighbor));
                    edges.insert((neighbor, vertex));
                }
            }
        }

        Ok(Self::from_edges(num_of_vertices, &edges, vertex_weights))
    }

    /// Build the coarse graph described by a clustering of this graph's vertices.
    ///
    /// `clusters` labels every vertex with a cluster id in `0..k_section`, as
    /// produced by a [`crate::algorithms::Reducer`]. A coarse vertex weighs as much
    /// as its members together and is adjacent to every other cluster one of its
    /// members is adjacent to. Edges inside a cluster disappear.
    pub fn contract(clusters: &Solution<'_>) -> Graph {
        let graph = clusters.graph();
        let num_of_clusters = clusters.k_section();

        let mut coarse_weights = vec![0; num_of_clusters];
        let mut coarse_edges = FxHashSet::with_capacity_and_hasher(graph.graph_csr.nnz(), Default::default());

        for vertex in 0..graph.len() {
            let cluster = clusters[vertex];
            coarse_weights[cluster] += graph.weight(vertex);

            for &neighbor in graph.neighbors(vertex) {
                if clusters[neighbor] != cluster {
                    coarse_edges.insert((cluster, clusters[neighbor]));
                }
            }
        }

        Self::from_edges(num_of_clusters, &coarse_edges, coarse_weights)
    }

    // Construction of the graph. First contruct a TriMat and then convert it to CSR format.
    fn from_edges(num_of_vertices: usize, edges: &FxHashSet<(usize, usize)>, vertex_weights: Vec<i64>) -> Self {
        let mut triplet_matrix = TriMat::with_capacity((num_of_vertices, num_of_vertices), edges.len());

        for &(vertex1, vertex2) in edges {
            triplet_matrix.add_triplet(vertex1, vertex2, 1u32);
        }

        let weight = vertex_weights.iter().sum();
        Self {
            graph_csr: triplet_matrix.to_csr(),
            vertex_weights,
            weight,
        }
    }

    /// The number of vertices in the graph.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.graph_csr.rows(), self.graph_csr.cols());
        self.graph_csr.rows()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of undirected edges, each counted once.
    pub fn total_edges(&self) -> usize {
        self.graph_csr.nnz() / 2
    }

    /// Sum of all vertex weights.
    pub fn total_weight(&self) -> i64 {
        self.weight
    }

    /// The weight of the given vertex.
    pub fn weight(&self, vertex: usize) -> i64 {
        self.vertex_weights[vertex]
    }

    /// The weights of all vertices, indexed by vertex.
    pub fn vertex_weights(&self) -> &[i64] {
        &self.vertex_weights
    }

    /// The neighbors of the given vertex, in ascending order.
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        match self.graph_csr.outer_view(vertex) {
            Some(row) => row.into_raw_storage().0,
            None => &[],
        }
    }

    /// The number of neighbors of the given vertex.
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbors(vertex).len()
    }

    /// Whether an edge links the two vertices.
    pub fn has_edge(&self, vertex1: usize, vertex2: usize) -> bool {
        self.graph_csr.get(vertex1, vertex2).is_some()
    }

    /// The edge cut of a labeling.
    ///
    /// Given one label per vertex, the edge cut is the number of edges that link
    /// vertices with different labels.
    ///
    /// # Example
    ///
    /// A partition with two parts (1 and 2)
    /// ```text,ignore
    ///          ┆
    ///    1*────┆───*2
    ///    │ ╲   ┆  ╱│       Dotted line passes through edges that contribute
    ///    │  ╲  ┆ ╱ │       to the edge cut: here it is 2.
    ///    1*──*1┆*2─*2
    ///          ┆
    /// ```
    pub fn edge_cut(&self, labels: &[usize]) -> usize {
        debug_assert_eq!(self.len(), labels.len());

        (0..self.len())
            .map(|vertex| {
                let vertex_label = labels[vertex];
                self.neighbors(vertex)
                    .iter()
                    .take_while(|&&neighbor| neighbor < vertex)
                    .filter(|&&neighbor| labels[neighbor] != vertex_label)
                    .count()
            })
            .sum()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
