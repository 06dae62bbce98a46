//! Command-line front end: binds crisp inputs, runs one inference and prints
//! the defuzzified outputs.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use fuzzy_control::{presets, ControlSystem, Simulation, SystemDefinition};

#[derive(Parser)]
#[command(name = "fuzzy-control")]
#[command(version)]
#[command(about = "Mamdani fuzzy controller (defaults to the room heater system)", long_about = None)]
struct Cli {
    /// Input binding, e.g. `--input temperature=10`
    #[arg(short, long = "input", value_name = "NAME=VALUE", value_parser = parse_binding)]
    inputs: Vec<(String, f64)>,

    /// JSON system definition to load instead of the room heater
    #[arg(short, long, value_name = "FILE")]
    system: Option<PathBuf>,

    /// Print rule firing strengths and log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Print the full result (crisp values, firing strengths, activations) as JSON
    #[arg(long)]
    json: bool,
}

fn parse_binding(s: &str) -> Result<(String, f64)> {
    let (name, value) = s.split_once('=').ok_or_else(|| anyhow!("expected NAME=VALUE, got `{s}`"))?;
    let value = value
        .trim()
        .parse()
        .with_context(|| format!("`{value}` is not a number"))?;

    Ok((name.trim().to_owned(), value))
}

fn load_system(path: Option<&PathBuf>) -> Result<ControlSystem> {
    let Some(path) = path else {
        return presets::room_heater().context("building the room heater system");
    };

    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let definition = SystemDefinition::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;

    definition
        .build()
        .with_context(|| format!("building the system in {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let system = load_system(cli.system.as_ref())?;
    let mut sim = Simulation::new(&system);

    for (name, value) in &cli.inputs {
        sim.set_input(name, *value).with_context(|| format!("input `{name}`"))?;
    }

    let outputs = sim.run().context("running inference")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(outputs)?);
        return Ok(());
    }

    if cli.verbose {
        for (i, strength) in outputs.firing_strengths().iter().enumerate() {
            println!("rule {}: {strength:.3}", i + 1);
        }
    }

    for (name, value) in outputs.iter() {
        println!("{name}: {value:.2}");
    }

    Ok(())
}
