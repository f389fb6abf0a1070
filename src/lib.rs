pub mod graph;
pub mod solution;
pub mod imbalance;
pub mod io;
pub mod algorithms;

pub use algorithms::Error;

// The `Partition` trait allows for partitioning data.
// Partitioning algorithms implement this trait.
// The generic argument `M` defines the input of the algorithms (e.g. a graph).
// The input partition must be of the correct size and its contents may or may
// not be used by the algorithms.
pub trait Partition<M> {
    // Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    // Error details, should the algorithm fail to run.
    type Error;

    // Partition the given data and output the section label of each element in
    // `part_ids`.
    //
    // Labels start from one, so a partition into `k` sections uses the labels
    // `1..=k`. If a label does not appear in the array, the section is empty.
    fn partition(&mut self, part_ids: &mut [usize], data: M)
                 -> Result<Self::Metadata, Self::Error>;
}
