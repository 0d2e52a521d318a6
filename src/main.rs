use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gene_network_evo_rs::config::{SimConfig, SolverKind};
use gene_network_evo_rs::evolve::Experiment;

/// Evolve small gene reaction networks by random mutation and score
/// them by solving their kinetics.
#[derive(Parser, Debug)]
#[command(name = "gene-network-evo", version, about)]
struct Args {
    /// Print help (alias)
    #[arg(long)]
    usage: bool,

    /// Output graphviz png files displaying the cell configuration
    #[arg(long)]
    graphviz: bool,

    /// Output gnuplot png files displaying molecule concentrations over time
    #[arg(long)]
    gnuplot: bool,

    /// Output data about each cell every scoring generation, not only the best
    #[arg(long)]
    outputall: bool,

    /// Output csv data containing the cell configuration
    #[arg(long = "csvCell")]
    csv_cell: bool,

    /// Output csv data containing molecule concentrations
    #[arg(long = "csvData")]
    csv_data: bool,

    /// Use the deterministic Runge-Kutta solver for solving curves
    #[arg(long, conflicts_with = "stochastic")]
    deterministic: bool,

    /// Use the stochastic gillespie algorithm for solving curves
    #[arg(long)]
    stochastic: bool,

    /// Number of cells to simulate
    #[arg(long, default_value_t = 2)]
    cells: usize,

    /// Number of generations to run for
    #[arg(long, default_value_t = 10)]
    gens: u64,

    /// Number of generations between equation solving and scoring
    #[arg(long, default_value_t = 1)]
    interval: u64,

    /// Minimum value for random kinetic rates
    #[arg(long, default_value_t = 0.0)]
    minrate: f64,

    /// Maximum value for random kinetic rates
    #[arg(long, default_value_t = 1.0)]
    maxrate: f64,

    /// Maximum number of basic cassettes per cell
    #[arg(long, default_value_t = 1)]
    maxbasic: usize,

    /// Maximum number of post-translationally modified proteins
    #[arg(long, default_value_t = 1)]
    maxptm: usize,

    /// Maximum number of protein-protein complexes
    #[arg(long, default_value_t = 1)]
    maxcomp: usize,

    /// Maximum number of protein-promoter interactions
    #[arg(long, default_value_t = 1)]
    maxprom: usize,

    /// Initial concentration of molecules
    #[arg(long, default_value_t = 0.0)]
    initconc: f64,

    /// Upper limit on time for differential equation solving
    #[arg(long, default_value_t = 20.0)]
    rklim: f64,

    /// Step size between points for differential equation solving
    #[arg(long, default_value_t = 0.05)]
    rkstep: f64,

    /// Value of the Hill coefficient carried by DNA species
    #[arg(long, default_value_t = 1)]
    hill: u32,

    /// Base seed for the per-cell RNG streams (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Output tree prefix
    #[arg(long, default_value = "output")]
    outdir: PathBuf,

    /// Draw gillespie waiting times from Exp(A) instead of the
    /// compatibility uniform [0, 0.05)
    #[arg(long)]
    expwait: bool,
}

impl From<Args> for SimConfig {
    fn from(args: Args) -> Self {
        SimConfig {
            cells: args.cells,
            generations: args.gens,
            scoring_interval: args.interval,
            min_rate: args.minrate,
            max_rate: args.maxrate,
            max_basic: args.maxbasic,
            max_ptm: args.maxptm,
            max_complex: args.maxcomp,
            max_promoter: args.maxprom,
            initial_conc: args.initconc,
            t_limit: args.rklim,
            h_step: args.rkstep,
            hill: args.hill,
            solver: if args.stochastic {
                SolverKind::Stochastic
            } else {
                SolverKind::Deterministic
            },
            exponential_wait: args.expwait,
            seed: args.seed,
            outdir: args.outdir,
            graphviz: args.graphviz,
            gnuplot: args.gnuplot,
            output_all: args.outputall,
            csv_cell: args.csv_cell,
            csv_data: args.csv_data,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.usage {
        use clap::CommandFactory;
        Args::command().print_help().context("printing help")?;
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = SimConfig::from(args);
    let mut experiment = Experiment::new(cfg).context("building experiment")?;
    experiment.run();
    Ok(())
}
