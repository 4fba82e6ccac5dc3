//! QALGO Command-Line Interface
//!
//! ```text
//! qalgo grover   --qubits 4 --target 5
//! qalgo optimize --observable ZZII --layers 2
//! qalgo cluster  --points 100 --k 2
//! qalgo bench    --max-qubits 6 --seeds 5
//! ```

use clap::{Parser, Subcommand};
use qalgo_bench::ReportFormat;
use qalgo_variational::MinimizerMethod;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{bench, cluster, grover, optimize};

/// QALGO - statevector Grover search, variational optimization and clustering
#[derive(Parser, Debug)]
#[command(name = "qalgo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format (text, markdown, json)
    #[arg(short, long, default_value = "text", global = true)]
    format: ReportFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grover search for one marked basis state
    Grover {
        /// Register size
        #[arg(short, long, default_value = "4")]
        qubits: usize,

        /// Marked index (< 2^qubits)
        #[arg(short, long, default_value = "5")]
        target: u64,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u64,

        /// Sampling seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the optimal iteration count
        #[arg(long)]
        iterations: Option<usize>,
    },

    /// Variational search for the lowest eigenvalue of an observable
    Optimize {
        /// Pauli term, optionally weighted (ZZII, -0.5*XI); repeatable
        #[arg(short, long = "observable", default_value = "ZZII", allow_hyphen_values = true)]
        observables: Vec<String>,

        /// QAOA layers
        #[arg(short, long, default_value = "2")]
        layers: usize,

        /// Minimizer (coordinate-descent, nelder-mead, gradient-descent)
        #[arg(short, long)]
        method: Option<MinimizerMethod>,

        /// Optimizer configuration file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Seed for random initial parameters
        #[arg(long)]
        seed: Option<u64>,
    },

    /// k-means on random points with a register readout
    Cluster {
        /// Number of points in the unit square
        #[arg(short, long, default_value = "100")]
        points: usize,

        /// Number of clusters
        #[arg(short, long, default_value = "2")]
        k: usize,

        /// Seed for points, k-means and sampling
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Register shots
        #[arg(short, long, default_value = "1024")]
        shots: u64,
    },

    /// Grover success-rate sweep over register sizes
    Bench {
        /// Largest register size
        #[arg(long, default_value = "6")]
        max_qubits: usize,

        /// Searches per register size
        #[arg(long, default_value = "5")]
        seeds: usize,

        /// Base seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Shots per search
        #[arg(short, long, default_value = "1024")]
        shots: u64,
    },
}

fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => return EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format;
    let report = match cli.command {
        Commands::Grover {
            qubits,
            target,
            shots,
            seed,
            iterations,
        } => grover::execute(qubits, target, shots, seed, iterations, format),

        Commands::Optimize {
            observables,
            layers,
            method,
            config,
            seed,
        } => optimize::execute(&observables, layers, method, config.as_deref(), seed, format),

        Commands::Cluster {
            points,
            k,
            seed,
            shots,
        } => cluster::execute(points, k, seed, shots, format),

        Commands::Bench {
            max_qubits,
            seeds,
            seed,
            shots,
        } => bench::execute(max_qubits, seeds, seed, shots, format),
    }?;

    print!("{}", report);
    if !report.ends_with('\n') {
        println!();
    }
    Ok(())
}
