use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use parasect_build::{build_helper, BuildOptions, ConfigPaths};
use parasect_compare::{compare_files, CompareOptions};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Build(args) => cmd_build(args),
        Command::Compare(args) => cmd_compare(args),
    }
}

/// Paths from the environment, with the command line taking precedence.
fn config_paths(input_folder: Option<PathBuf>, default_parameters: Option<PathBuf>) -> ConfigPaths {
    let mut paths = ConfigPaths::from_env();
    if let Some(folder) = input_folder {
        paths = paths.with_custom_path(folder);
    }
    if let Some(file) = default_parameters {
        paths = paths.with_default_params(file);
    }
    paths
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let paths = config_paths(args.input_folder, args.default_parameters);
    let options = BuildOptions {
        meal: args.meal,
        format: args.format,
        output_folder: args.output_folder,
        sitl: args.sitl,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = build_helper(&paths, &options, &mut out).with_context(|| match &options.meal {
        Some(meal) => format!("failed to build meal {meal}"),
        None => "failed to build the meals menu".to_string(),
    })?;
    out.flush().context("failed to flush stdout")?;
    drop(out);

    for path in &written {
        println!("{} {}", "✓".green().bold(), path.display());
    }
    if options.meal.is_none() {
        println!("Built {} meals as {}", written.len().to_string().bold(), options.format.to_string().cyan());
    }
    Ok(())
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let paths = config_paths(args.input_folder, None);
    let options = CompareOptions {
        nocal: args.nocal,
        noop: args.noop,
        component: args.component,
    };

    let comparison = compare_files(&args.file_1, &args.file_2, &paths, &options).with_context(|| {
        format!(
            "failed to compare {} and {}",
            args.file_1.display(),
            args.file_2.display()
        )
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print!("{comparison}");
    }
    Ok(())
}
