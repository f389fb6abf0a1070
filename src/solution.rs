use std::ops::Index;

use crate::algorithms::Error;
use crate::graph::Graph;

/// Label of a vertex that has not been assigned to any section yet.
pub const UNASSIGNED: usize = 0;

/// A labeling of the vertices of a graph.
///
/// Partitions use the labels `1..=k_section` and reserve [`UNASSIGNED`] for
/// vertices a decomposer has not reached yet. Clusterings produced by a
/// [`crate::algorithms::Reducer`] use the labels `0..k_section` instead, so that
/// a label is directly the index of a vertex in the coarse graph.
#[derive(Clone, Debug)]
pub struct Solution<'g> {
    graph: &'g Graph,
    labels: Vec<usize>,
    k_section: usize,
}

impl<'g> Solution<'g> {
    /// Create a solution where every vertex is [`UNASSIGNED`].
    pub fn new(graph: &'g Graph, k_section: usize) -> Self {
        Self {
            graph,
            labels: vec![UNASSIGNED; graph.len()],
            k_section,
        }
    }

    /// Create a solution from one label per vertex.
    pub fn from_labels(graph: &'g Graph, k_section: usize, labels: Vec<usize>) -> Result<Self, Error> {
        if labels.len() != graph.len() {
            return Err(Error::InputLenMismatch {
                expected: graph.len(),
                actual: labels.len(),
            });
        }
        Ok(Self {
            graph,
            labels,
            k_section,
        })
    }

    // Every vertex of `graph` must have a cluster id in `0..num_of_clusters`.
    pub(crate) fn clustering(graph: &'g Graph, num_of_clusters: usize, clusters: Vec<usize>) -> Self {
        debug_assert_eq!(clusters.len(), graph.len());
        debug_assert!(clusters.iter().all(|&cluster| cluster < num_of_clusters));
        Self {
            graph,
            labels: clusters,
            k_section: num_of_clusters,
        }
    }

    /// The graph this solution labels.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Number of sections (or clusters).
    pub fn k_section(&self) -> usize {
        self.k_section
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// One label per vertex.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }

    /// Put `vertex` in section `label`.
    pub fn assign(&mut self, vertex: usize, label: usize) {
        self.labels[vertex] = label;
    }

    /// Whether every vertex carries a label in `1..=k_section`.
    pub fn is_complete(&self) -> bool {
        self.labels
            .iter()
            .all(|&label| label != UNASSIGNED && label <= self.k_section)
    }

    /// Number of edges whose endpoints carry different labels.
    pub fn cross_power(&self) -> usize {
        self.graph.edge_cut(&self.labels)
    }

    /// Project a solution over the coarse graph back onto this one.
    ///
    /// Every vertex labeled `l` takes the label `coarse[l]`, and the section count
    /// of `coarse` is adopted. `self` must be the clustering the coarse graph was
    /// contracted from. Nothing changes when a label has no counterpart in `coarse`.
    pub fn merge(&mut self, coarse: &Solution<'_>) -> Result<(), Error> {
        if let Some(&label) = self.labels.iter().find(|&&label| label >= coarse.len()) {
            return Err(Error::LabelOutOfRange {
                label,
                len: coarse.len(),
            });
        }

        for label in self.labels.iter_mut() {
            *label = coarse[*label];
        }
        self.k_section = coarse.k_section;

        Ok(())
    }
}

impl Index<usize> for Solution<'_> {
    type Output = usize;

    fn index(&self, vertex: usize) -> &usize {
        &self.labels[vertex]
    }
}
