extern crate log;
pub mod convert;
pub mod geofile;
pub mod graph;
pub mod naming;
pub mod poles;
use crate::convert::pipeline::{run_conversion, ConversionPaths};
use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

const DEFAULT_POLES_FILEPATH: &str = "core downtown pole export.csv";
const DEFAULT_GRAPH_FILEPATH: &str = "random-graphviz.txt";
const DEFAULT_OUTPUT_FILEPATH: &str = "feature-collection-export.json";

/// Convert a Graphviz description of pole connections into GeoJSON features.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Poles CSV file name.
    #[arg(short, long)]
    poles: Option<PathBuf>,
    /// Graphviz file name.
    #[arg(short, long)]
    graphviz: Option<PathBuf>,
    /// Output file name.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Optional YAML config file with `poles`, `graphviz` and `output` keys. Command line
    /// arguments take precedence.
    #[arg(short, long)]
    config_filepath: Option<String>,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
struct Config {
    poles: Option<PathBuf>,
    graphviz: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn read_config(config_filepath: &str) -> anyhow::Result<Config> {
    if !Path::new(config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", config_filepath));
    }
    let config_contents = read_to_string(config_filepath)?;
    Ok(serde_yaml::from_str(&config_contents)?)
}

/// Pick each path from the command line, then the config file, then the default.
fn resolve_paths(args: Args, config: Config) -> ConversionPaths {
    let pick = |arg: Option<PathBuf>, configured: Option<PathBuf>, default: &str| {
        arg.or(configured).unwrap_or_else(|| PathBuf::from(default))
    };
    ConversionPaths {
        poles_filepath: pick(args.poles, config.poles, DEFAULT_POLES_FILEPATH),
        graph_filepath: pick(args.graphviz, config.graphviz, DEFAULT_GRAPH_FILEPATH),
        output_filepath: pick(args.output, config.output, DEFAULT_OUTPUT_FILEPATH),
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let config = match &args.config_filepath {
        Some(config_filepath) => read_config(config_filepath)?,
        None => Config::default(),
    };
    let paths = resolve_paths(args, config);
    let summary = run_conversion(&paths)?;
    log::info!(
        "Wrote {} poles and {} cable runs to {:?}",
        summary.point_count,
        summary.line_count,
        &paths.output_filepath
    );
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
