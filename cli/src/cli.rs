use std::path::PathBuf;

use mixatlas::IncomeGroup;

/// Economic-mixing map data tools
#[derive(clap::Parser, Debug)]
#[command(name = "mixatlas", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Partition raw point tables into a city index and per-city shards
    Convert(ConvertArgs),

    /// Run the map query pipeline against a built pack (JSON on stdout)
    Query(QueryArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Directory holding the boundary file and the compressed point tables
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub input: Option<PathBuf>,

    /// Output pack directory, defaults to the input directory
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// JSON config file; command-line paths override its fields
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Boundary file name inside the input directory
    #[arg(long)]
    pub boundary: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Pack directory, or an http(s) base URL
    pub pack: String,

    /// City id to load
    #[arg(long, conflicts_with = "at")]
    pub city: Option<String>,

    /// Select the city containing this location, "lng,lat"
    #[arg(long, value_parser = parse_floats::<2>, allow_hyphen_values = true)]
    pub at: Option<[f64; 2]>,

    /// Viewport "west,south,east,north"; defaults to the whole world
    #[arg(long, value_parser = parse_floats::<4>, allow_hyphen_values = true)]
    pub bbox: Option<[f64; 4]>,

    /// Keep only this category
    #[arg(long)]
    pub category: Option<String>,

    /// Keep only this score bin (0 = lowest, 4 = highest)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..5))]
    pub bin: Option<u8>,

    /// Keep only places where this income group ($ to $$$$) is the majority
    #[arg(long)]
    pub income: Option<IncomeGroup>,

    /// Downsample the visible set to at most this many points
    #[arg(long)]
    pub max_points: Option<usize>,

    /// Print the visible points as well as the summary
    #[arg(long)]
    pub points: bool,
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got {:?}", s));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.parse().map_err(|_| format!("not a number: {part:?}"))?;
    }
    Ok(out)
}
