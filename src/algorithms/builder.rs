use crate::algorithms::{Error, GraphBooster, MultiLevelPartitioner, Refinement, StartNodeDetector};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Setting {
    RadiusMod,
    GraphBooster,
    BoosterQuality(f64),
    StartNodeQuality(usize),
    Seed(u64),
    NumOfPartitions(usize),
    Levels(i32),
}

/// Fluent configuration of a [`MultiLevelPartitioner`].
///
/// Settings are applied in the order they were given when [`AlgorithmBuilder::build`]
/// runs, so the last one wins. Anything left unset keeps the value of
/// [`MultiLevelPartitioner::default`]: plain region growing, boundary-swap
/// refinement and two start vertex search rounds.
///
/// # Example
///
/// ```rust
/// use gpart::algorithms::AlgorithmBuilder;
///
/// # fn main() -> Result<(), gpart::Error> {
/// let partitioner = AlgorithmBuilder::create()
///     .use_radius_mod()
///     .use_graph_booster_with_quality(0.2)
///     .configure_start_node(3)
///     .build()?;
///
/// assert!(partitioner.decomposer.radius_aware);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AlgorithmBuilder {
    settings: Vec<Setting>,
}

impl AlgorithmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Self {
        Self::new()
    }

    /// Break ties between frontier vertices by their distance to the region seed.
    pub fn use_radius_mod(mut self) -> Self {
        self.settings.push(Setting::RadiusMod);
        self
    }

    /// Refine with [`GraphBooster`] instead of boundary swaps.
    pub fn use_graph_booster(mut self) -> Self {
        self.settings.push(Setting::GraphBooster);
        self
    }

    /// Refine with [`GraphBooster`] migrating the given fraction of a section per pass.
    pub fn use_graph_booster_with_quality(mut self, quality: f64) -> Self {
        self.settings.push(Setting::GraphBooster);
        self.settings.push(Setting::BoosterQuality(quality));
        self
    }

    /// Number of quality rounds of the start vertex search.
    pub fn configure_start_node(mut self, quality: usize) -> Self {
        self.settings.push(Setting::StartNodeQuality(quality));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.settings.push(Setting::Seed(seed));
        self
    }

    pub fn num_of_partitions(mut self, num_of_partitions: usize) -> Self {
        self.settings.push(Setting::NumOfPartitions(num_of_partitions));
        self
    }

    pub fn levels(mut self, levels: i32) -> Self {
        self.settings.push(Setting::Levels(levels));
        self
    }

    pub fn build(&self) -> Result<MultiLevelPartitioner, Error> {
        let mut partitioner = MultiLevelPartitioner::default();
        let mut use_booster = false;
        let mut booster_quality = None;
        let mut start_node_quality = None;

        for setting in &self.settings {
            match *setting {
                Setting::RadiusMod => partitioner.decomposer.radius_aware = true,
                Setting::GraphBooster => use_booster = true,
                Setting::BoosterQuality(quality) => booster_quality = Some(quality),
                Setting::StartNodeQuality(quality) => start_node_quality = Some(quality),
                Setting::Seed(seed) => partitioner.seed = Some(seed),
                Setting::NumOfPartitions(num_of_partitions) => partitioner.num_of_partitions = num_of_partitions,
                Setting::Levels(levels) => partitioner.levels = levels,
            }
        }

        if partitioner.num_of_partitions == 0 {
            return Err(Error::InvalidKSection);
        }
        if partitioner.levels < 0 {
            return Err(Error::InvalidLevels(partitioner.levels));
        }

        if let Some(quality) = start_node_quality {
            partitioner.decomposer.start_node_detector = StartNodeDetector::new(quality);
        }
        if use_booster {
            let booster = match booster_quality {
                Some(quality) => GraphBooster::new(quality)?,
                None => GraphBooster::default(),
            };
            partitioner.optimizer = Refinement::Booster(booster);
        }

        Ok(partitioner)
    }
}
