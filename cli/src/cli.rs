use std::path::PathBuf;

/// Polygon region-merging CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "polymerge", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Merge an over-segmented partition into coarser polygons
    Merge(MergeArgs),

    /// Print a summary of a partition file
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Input partition (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Threshold configuration (JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Output partition file, defaults to "./merged.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Run only the road-split and small-area absorption passes
    #[arg(long)]
    pub absorb_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Partition file (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,
}
