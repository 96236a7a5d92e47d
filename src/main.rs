use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::Level;

use heredity::inference::{Engine, DEFAULT_MAX_POPULATION};
use heredity::logging::init_logging;
use heredity::model::Model;
use heredity::observable::CsvBuilder;
use heredity::report::{to_json, TextReport, DEFAULT_PRECISION};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Gene and trait probabilities for every member of a family.
#[derive(Debug, Parser)]
#[command(name = "heredity", author, version, about)]
struct Cli {
    /// CSV file with columns name, mother, father, trait.
    #[arg(value_name = "DATA")]
    data: PathBuf,

    /// YAML file overriding the default inheritance model.
    #[arg(short, long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Decimal places in text output.
    #[arg(long, value_name = "DIGITS", default_value_t = DEFAULT_PRECISION)]
    precision: usize,

    /// Refuse families larger than this.
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_MAX_POPULATION)]
    max_population: usize,

    /// Log level (overridden by RUST_LOG).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: Level,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let model = match &cli.model {
        Some(path) => Model::from_path(path)?,
        None => Model::default(),
    };

    let population = CsvBuilder::new()
        .from_path(&cli.data)
        .with_context(|| format!("loading family from {}", cli.data.display()))?;

    let posterior = Engine::new(&model)
        .max_population(cli.max_population)
        .run(&population)
        .with_context(|| format!("inferring probabilities for {}", cli.data.display()))?;

    match cli.format {
        Format::Text => print!("{}", TextReport::new(&posterior).precision(cli.precision)),
        Format::Json => println!("{}", to_json(&posterior)?),
    }

    Ok(())
}
