use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use parasect_formats::Format;

#[derive(Parser)]
#[command(
    name = "parasect",
    about = "Parasect: build and compare autopilot parameter sets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Write a debug log to parasect.log
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build meals into parameter files
    Build(BuildArgs),
    /// Compare two parameter files
    Compare(CompareArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Folder to write the parameter files to
    #[arg(short, long = "output_folder")]
    pub output_folder: Option<PathBuf>,
    /// Build a single meal
    #[arg(short = 'c', long = "configuration", visible_alias = "meal_ordered")]
    pub meal: Option<String>,
    /// Output format: csv, px4, px4afv1, px4afv2, apm or apj
    #[arg(short, long, default_value = "px4")]
    pub format: Format,
    /// Folder holding meals.yaml and the dishes
    #[arg(short, long = "input_folder")]
    pub input_folder: Option<PathBuf>,
    /// Default parameters file to apply to all meals
    #[arg(short, long = "default_parameters")]
    pub default_parameters: Option<PathBuf>,
    /// Build only SITL meals when building the whole menu
    #[arg(long)]
    pub sitl: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    pub file_1: PathBuf,
    pub file_2: PathBuf,
    /// Folder holding the staple dishes
    #[arg(short, long = "input_folder")]
    pub input_folder: Option<PathBuf>,
    /// Leave calibration parameters out
    #[arg(short = 's', long = "supress-calibration")]
    pub nocal: bool,
    /// Leave operator-defined parameters out
    #[arg(short = 'u', long = "supress-user-defined")]
    pub noop: bool,
    /// Compare a single component id
    #[arg(short, long)]
    pub component: Option<u8>,
    /// Print the differences as JSON
    #[arg(long)]
    pub json: bool,
}
