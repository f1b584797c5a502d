//! Lifecycle Solver CLI
//!
//! Solves the life-cycle model by backward induction and prints per-age timing
//! and the first value-function entries.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use lifecycle_solver::output::{write_csv, SolveSummary};
use lifecycle_solver::{LifeCycleSolver, ModelParameters};

#[derive(Debug, Parser)]
#[command(name = "lifecycle_solver", version, about = "Life-cycle consumption-savings solver")]
struct Cli {
    /// JSON parameter file; missing keys use the reference calibration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of asset grid points
    #[arg(long)]
    nx: Option<usize>,

    /// Lowest asset level
    #[arg(long)]
    xmin: Option<f64>,

    /// Highest asset level
    #[arg(long)]
    xmax: Option<f64>,

    /// Number of income grid points
    #[arg(long)]
    ne: Option<usize>,

    /// Standard deviation of the income innovation
    #[arg(long = "ssigma-eps")]
    ssigma_eps: Option<f64>,

    /// Persistence of the log income shock
    #[arg(long = "llambda-eps", allow_hyphen_values = true)]
    llambda_eps: Option<f64>,

    /// Income grid span in unconditional standard deviations
    #[arg(long)]
    m: Option<f64>,

    /// Relative risk aversion
    #[arg(long)]
    ssigma: Option<f64>,

    /// Discount factor
    #[arg(long)]
    bbeta: Option<f64>,

    /// Number of life-cycle periods
    #[arg(short = 'T', long = "periods")]
    periods: Option<usize>,

    /// Interest rate
    #[arg(short, long, allow_hyphen_values = true)]
    r: Option<f64>,

    /// Wage
    #[arg(short, long)]
    w: Option<f64>,

    /// Worker threads (defaults to the number of cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Write every solved state to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print a JSON summary instead of the text report
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn parameters(&self) -> anyhow::Result<ModelParameters> {
        let mut params = match &self.config {
            Some(path) => ModelParameters::from_json_path(path)
                .map_err(|e| anyhow!("{}", e))
                .with_context(|| format!("failed to load parameters from {}", path.display()))?,
            None => ModelParameters::default(),
        };

        if let Some(v) = self.nx {
            params.assets.points = v;
        }
        if let Some(v) = self.xmin {
            params.assets.min = v;
        }
        if let Some(v) = self.xmax {
            params.assets.max = v;
        }
        if let Some(v) = self.ne {
            params.income.points = v;
        }
        if let Some(v) = self.ssigma_eps {
            params.income.innovation_std = v;
        }
        if let Some(v) = self.llambda_eps {
            params.income.persistence = v;
        }
        if let Some(v) = self.m {
            params.income.span = v;
        }
        if let Some(v) = self.ssigma {
            params.preferences.risk_aversion = v;
        }
        if let Some(v) = self.bbeta {
            params.preferences.discount_factor = v;
        }
        if let Some(v) = self.periods {
            params.periods = v;
        }
        if let Some(v) = self.r {
            params.prices.interest_rate = v;
        }
        if let Some(v) = self.w {
            params.prices.wage = v;
        }

        Ok(params)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let params = cli.parameters()?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    let solver = LifeCycleSolver::from_params(&params)?;

    if !cli.json {
        println!(" ");
        println!("Life cycle computation: ");
        println!(" ");
    }

    let solution = solver.solve()?;
    let summary = SolveSummary::new(&params, &solution);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for timing in &summary.timings {
            println!("Age: {}. Time: {:.4} seconds.", timing.age + 1, timing.cumulative_seconds);
        }
        println!("TOTAL ELAPSED TIME: {:.4} seconds. \n", summary.total_seconds);

        println!(" - - - - - - - - - - - - - - - - - - - - - \n");
        println!("The first entries of the value function: \n");
        for value in &summary.first_values {
            println!("{:.5}", value);
        }
        println!(" \n");
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        let rows = write_csv(&solution, BufWriter::new(file))?;
        log::info!("Wrote {} states to {}", rows, path.display());
        if !cli.json {
            println!("Full results written to: {}", path.display());
        }
    }

    Ok(())
}
