use std::path::PathBuf;

/// Election swing projection CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "swingmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Engine config file (JSON); falls back to $SWINGMAP_CONFIG, then built-in defaults
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Project a swing scenario and print national and regional aggregates
    Project(ProjectArgs),

    /// Solve for the local swings that reach a target margin
    Solve(SolveArgs),

    /// Print historical elasticities per unit
    Elasticity(ElasticityArgs),
}

#[derive(clap::Args, Debug)]
pub struct ProjectArgs {
    /// Baseline returns (CSV)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub baseline: PathBuf,

    /// Election cycle to project, defaults to the latest in the baseline
    #[arg(short, long)]
    pub cycle: Option<u16>,

    /// Scenario file (JSON); --gop/--dem/--turnout override its global values
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub scenario: Option<PathBuf>,

    /// Global GOP share change, in percentage points
    #[arg(long, allow_hyphen_values = true)]
    pub gop: Option<f64>,

    /// Global DEM share change, in percentage points
    #[arg(long, allow_hyphen_values = true)]
    pub dem: Option<f64>,

    /// Turnout change, in percent
    #[arg(long, allow_hyphen_values = true)]
    pub turnout: Option<f64>,

    /// Only report this region
    #[arg(short, long)]
    pub region: Option<String>,

    /// Print the full projection, with render encodings, as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
pub enum ModeArg {
    /// Every unit moves by the same amount
    #[default]
    Uniform,
    /// Units move in proportion to their historical elasticity
    Elastic,
}

#[derive(clap::Args, Debug)]
pub struct SolveArgs {
    /// Baseline returns (CSV)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub baseline: PathBuf,

    /// Election cycle to solve against, defaults to the latest in the baseline
    #[arg(short, long)]
    pub cycle: Option<u16>,

    /// Target aggregate margin (GOP minus DEM), in percentage points
    #[arg(short, long, allow_hyphen_values = true)]
    pub target: f64,

    /// How the required shift is distributed across units
    #[arg(short, long, value_enum, default_value_t = ModeArg::Uniform)]
    pub mode: ModeArg,

    /// Restrict the solve to one region
    #[arg(short, long, conflicts_with = "units")]
    pub region: Option<String>,

    /// Restrict the solve to these units (comma-separated codes)
    #[arg(short, long, value_delimiter = ',')]
    pub units: Vec<String>,

    /// Scenario to start from (JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub scenario: Option<PathBuf>,

    /// Write the resulting scenario here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ElasticityArgs {
    /// Baseline returns (CSV) covering one or more cycles
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub baseline: PathBuf,

    /// Only report this unit
    #[arg(long)]
    pub unit: Option<String>,
}
