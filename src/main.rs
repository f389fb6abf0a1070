use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gpart::algorithms::AlgorithmBuilder;
use gpart::graph::Graph;
use gpart::imbalance::solution_imbalance;
use gpart::io::{read_adjacency_list_as_graph, read_matrix_market_as_graph, write_partition_data_to_file};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Vertex and edge counts, then the 1-based neighbors of each vertex
    Adjacency,
    /// Matrix Market coordinate file, only the sparsity pattern is used
    Mtx,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the graph file
    path: PathBuf,

    /// Number of sections
    #[arg(short, long, default_value_t = 2)]
    ksections: usize,

    /// Number of coarsening levels
    #[arg(short, long, default_value_t = 2)]
    levels: i32,

    /// Break region growing ties by distance to the region seed
    #[arg(long)]
    radius_mod: bool,

    /// Refine with greedy migration instead of boundary swaps
    #[arg(long)]
    booster: bool,

    /// Fraction of a section migrating per booster pass, implies --booster
    #[arg(long)]
    booster_quality: Option<f64>,

    /// Rounds of the start vertex search
    #[arg(long, default_value_t = 2)]
    start_node_quality: usize,

    /// Number of runs
    #[arg(short, long, default_value_t = 1)]
    runs: usize,

    /// Seed of the first run, the following runs use the next seeds
    #[arg(long)]
    seed: Option<u64>,

    /// Format of the graph file
    #[arg(long, value_enum, default_value_t = Format::Adjacency)]
    format: Format,

    /// Filename where the best partition mapping can be stored
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load_graph(path: &Path, format: Format) -> Result<Graph> {
    let graph = match format {
        Format::Adjacency => read_adjacency_list_as_graph(path),
        Format::Mtx => read_matrix_market_as_graph(path),
    };
    graph.with_context(|| format!("failed to load {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let graph = load_graph(&args.path, args.format)?;
    info!(
        "loaded {}: {} vertices, {} edges",
        args.path.display(),
        graph.len(),
        graph.total_edges()
    );

    let mut builder = AlgorithmBuilder::create()
        .configure_start_node(args.start_node_quality)
        .num_of_partitions(args.ksections)
        .levels(args.levels);
    if args.radius_mod {
        builder = builder.use_radius_mod();
    }
    builder = match args.booster_quality {
        Some(quality) => builder.use_graph_booster_with_quality(quality),
        None if args.booster => builder.use_graph_booster(),
        None => builder,
    };
    let mut partitioner = builder.build()?;

    let mut best: Option<(usize, Vec<usize>)> = None;
    for run in 0..args.runs {
        partitioner.seed = args.seed.map(|seed| seed.wrapping_add(run as u64));

        let start = Instant::now();
        let solution = partitioner.run(&graph, args.ksections, args.levels)?;
        let elapsed_time = start.elapsed();

        let edge_cut = solution.cross_power();
        let imbalance_of_partition = solution_imbalance(&solution);
        info!("run {} finished", run + 1);
        println!("Edge cut {:?}", edge_cut);
        println!("Imbalance {:?}", imbalance_of_partition);
        println!("Execution time {:?}", elapsed_time);

        if best.as_ref().map_or(true, |(best_cut, _)| edge_cut < *best_cut) {
            best = Some((edge_cut, solution.into_labels()));
        }
    }

    if let (Some(output), Some((edge_cut, partition))) = (&args.output, &best) {
        write_partition_data_to_file(partition, output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!("partition with edge cut {edge_cut} written to {}", output.display());
    }

    Ok(())
}
