//! Command-line interface for reading initial communities.
//!
//! Loads a species table and a community input, builds the dataset and
//! prints a summary.

use crate::builder::DatasetBuilder;
use crate::config::{BuildConfig, LongevityPolicy};
use crate::diagnostics::TracingSink;
use crate::models::{Dataset, FieldValue};
use crate::rebin::bin_ages;
use crate::species::SpeciesRegistry;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Read initial forest communities and report what was found
#[derive(Parser, Debug, Clone)]
#[command(name = "initcomm")]
#[command(about = "Read and validate initial forest communities for a succession simulation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Input file naming the community table, the table itself, or a legacy text file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Species table (.csv) with SpeciesCode and Longevity columns
    #[arg(short, long, value_name = "PATH")]
    pub species: PathBuf,

    /// How to read INPUT (auto: .csv files are tables, anything else is an input file)
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub input_format: InputFormat,

    /// Build configuration (JSON); command-line options override it
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Succession timestep in years (0 disables rebinning)
    #[arg(short, long, allow_negative_numbers = true)]
    pub timestep: Option<i32>,

    /// Clamp cohorts older than their species' longevity instead of failing
    #[arg(long)]
    pub clamp_ages: bool,

    /// Auxiliary column to copy onto cohorts, with its default (NAME=DEFAULT)
    #[arg(short, long = "aux", value_name = "NAME=DEFAULT")]
    pub auxiliary: Vec<String>,

    /// Include per-map-unit age profiles rebinned to the timestep
    #[arg(long)]
    pub profiles: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Auto,
    InputFile,
    Csv,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Resolve `Auto` from the input's extension
    pub fn effective_input_format(&self) -> InputFormat {
        match self.input_format {
            InputFormat::Auto => {
                let is_csv = self
                    .input
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
                if is_csv {
                    InputFormat::Csv
                } else {
                    InputFormat::InputFile
                }
            }
            other => other,
        }
    }

    /// Build configuration from `--config` plus command-line overrides
    pub fn build_config(&self) -> Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => BuildConfig::default(),
        };

        if let Some(timestep) = self.timestep {
            config = config.with_timestep(timestep);
        }
        if self.clamp_ages {
            config = config.with_longevity_policy(LongevityPolicy::Clamp);
        }
        for entry in &self.auxiliary {
            let (name, default) = parse_auxiliary(entry)?;
            config = config.with_auxiliary(name, default);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse `NAME=DEFAULT`; the default is typed by [`FieldValue::parse_literal`]
pub fn parse_auxiliary(entry: &str) -> Result<(String, FieldValue)> {
    let (name, default) = entry
        .split_once('=')
        .with_context(|| format!("Auxiliary option \"{}\" must look like NAME=DEFAULT", entry))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Auxiliary option \"{}\" has no name", entry);
    }
    Ok((name.to_string(), FieldValue::parse_literal(default)))
}

/// Run the command described by `args`
pub fn run(args: &Args) -> Result<Dataset> {
    setup_logging(args)?;
    let start_time = Instant::now();

    let config = args.build_config()?;
    debug!("Build configuration: {:?}", config);

    let registry = SpeciesRegistry::load_csv(&args.species)
        .with_context(|| format!("Failed to load species from {}", args.species.display()))?;
    let builder = DatasetBuilder::new(registry, config)?;

    let dataset = read_dataset(&builder, args.effective_input_format(), &args.input)
        .with_context(|| format!("Failed to read initial communities from {}", args.input.display()))?;
    info!(
        "Read initial communities in {:.2?}",
        start_time.elapsed()
    );

    if !args.quiet {
        match args.output_format {
            OutputFormat::Human => print_human_report(&dataset, builder.config(), args.profiles),
            OutputFormat::Json => print_json_report(&dataset, builder.config(), args.profiles)?,
        }
    }
    Ok(dataset)
}

fn read_dataset(
    builder: &DatasetBuilder<SpeciesRegistry>,
    format: InputFormat,
    input: &Path,
) -> crate::Result<Dataset> {
    let mut sink = TracingSink;
    match format {
        InputFormat::Csv => builder.build_from_csv(input, &mut sink),
        InputFormat::Legacy => builder.build_from_legacy_file(input, &mut sink),
        InputFormat::InputFile | InputFormat::Auto => builder.build_from_input_file(input, &mut sink),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("initial_communities={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn print_human_report(dataset: &Dataset, config: &BuildConfig, profiles: bool) {
    println!("{}", "Initial Communities".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Map units: {}", dataset.len());
    println!("   • Empty map units: {}", dataset.empty_group_count());
    println!("   • Cohorts: {}", dataset.cohort_count());
    println!();

    for group in dataset {
        if group.is_empty() {
            println!("   MapCode {}: {}", group.map_code(), "no cohorts".dimmed());
            continue;
        }
        println!(
            "   MapCode {}: {} cohorts, {} g/m2",
            group.map_code().to_string().green(),
            group.len(),
            group.total_biomass()
        );
        if profiles {
            let binned = bin_ages(&group.age_biomass(), config.timestep);
            let profile: Vec<String> = binned
                .iter()
                .map(|(age, biomass)| format!("{}:{}", age, biomass))
                .collect();
            println!("      ages {}", profile.join(" "));
        }
    }
}

fn print_json_report(dataset: &Dataset, config: &BuildConfig, profiles: bool) -> Result<()> {
    let groups: Vec<serde_json::Value> = dataset
        .iter()
        .map(|group| {
            let cohorts: Vec<serde_json::Value> = group
                .cohorts()
                .iter()
                .map(|cohort| {
                    serde_json::json!({
                        "species": cohort.species_name(),
                        "age": cohort.age(),
                        "biomass": cohort.biomass(),
                        "attributes": cohort.attributes(),
                    })
                })
                .collect();
            let mut value = serde_json::json!({
                "map_code": group.map_code(),
                "cohorts": cohorts,
            });
            if profiles {
                value["age_profile"] = serde_json::json!(bin_ages(&group.age_biomass(), config.timestep));
            }
            value
        })
        .collect();

    let report = serde_json::json!({
        "map_units": dataset.len(),
        "empty_map_units": dataset.empty_group_count(),
        "cohorts": dataset.cohort_count(),
        "timestep": config.timestep,
        "groups": groups,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );
    Ok(())
}
