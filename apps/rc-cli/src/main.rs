mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::{CliError, CliResult};
use rc_cycle::{
    BatchResult, CycleEngine, EngineConfig, SUMMARY_METRICS, SensorRoleMapping, load_samples_json,
    record_metric,
};
use rc_fluids::{CoolPropProvider, PropertyProvider, SurrogateProvider};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rc-cli")]
#[command(about = "Refrigeration cycle reconstruction from rig sensor data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an engine configuration file
    Validate {
        /// Path to the configuration (YAML, or JSON by extension)
        config_path: PathBuf,
        /// Optional sensor role mapping to check alongside
        #[arg(short, long)]
        mapping: Option<PathBuf>,
    },
    /// Resolve a batch of samples and print the run summary
    Run {
        config_path: PathBuf,
        /// JSON array of sensor samples
        samples_path: PathBuf,
        #[arg(short, long)]
        mapping: Option<PathBuf>,
        /// Write the full batch result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Backend::Coolprop)]
        backend: Backend,
    },
    /// Export one metric over the on-time samples as CSV
    ExportSeries {
        config_path: PathBuf,
        samples_path: PathBuf,
        /// Metric name (e.g., capacity_btu_hr, superheat_f, pressure_ratio)
        metric: String,
        #[arg(short, long)]
        mapping: Option<PathBuf>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Backend::Coolprop)]
        backend: Backend,
    },
    /// Print the saturation dome for the configured refrigerant as CSV
    Dome {
        config_path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Backend::Coolprop)]
        backend: Backend,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Real-fluid properties through CoolProp
    Coolprop,
    /// Saturation-curve surrogate, no native library needed
    Surrogate,
}

impl Backend {
    fn provider(self) -> Box<dyn PropertyProvider> {
        match self {
            Backend::Coolprop => Box::new(CoolPropProvider::new()),
            Backend::Surrogate => Box::new(SurrogateProvider::new()),
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            config_path,
            mapping,
        } => cmd_validate(&config_path, mapping.as_deref()),
        Commands::Run {
            config_path,
            samples_path,
            mapping,
            output,
            backend,
        } => cmd_run(
            &config_path,
            &samples_path,
            mapping.as_deref(),
            output.as_deref(),
            backend,
        ),
        Commands::ExportSeries {
            config_path,
            samples_path,
            metric,
            mapping,
            output,
            backend,
        } => cmd_export_series(
            &config_path,
            &samples_path,
            &metric,
            mapping.as_deref(),
            output.as_deref(),
            backend,
        ),
        Commands::Dome {
            config_path,
            output,
            backend,
        } => cmd_dome(&config_path, output.as_deref(), backend),
    }
}

fn load_mapping(path: Option<&Path>) -> CliResult<SensorRoleMapping> {
    Ok(match path {
        Some(path) => SensorRoleMapping::load_json(path)?,
        None => SensorRoleMapping::empty(),
    })
}

fn build_engine(
    config_path: &Path,
    mapping_path: Option<&Path>,
    backend: Backend,
) -> CliResult<CycleEngine<Box<dyn PropertyProvider>>> {
    let config = EngineConfig::load(config_path)?;
    let mapping = load_mapping(mapping_path)?;
    Ok(CycleEngine::new(config, mapping, backend.provider())?)
}

fn run_batch(
    config_path: &Path,
    samples_path: &Path,
    mapping_path: Option<&Path>,
    backend: Backend,
) -> CliResult<BatchResult> {
    let engine = build_engine(config_path, mapping_path, backend)?;
    let samples = load_samples_json(samples_path)?;
    Ok(engine.run_batch(&samples))
}

fn cmd_validate(config_path: &Path, mapping_path: Option<&Path>) -> CliResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = EngineConfig::load(config_path)?;
    let rated = config.rated_inputs()?;
    println!("  Refrigerant: {}", config.refrigerant()?);
    println!(
        "  Rated point: {:.1} lb/hr at {:.1} Hz, {:.3} in³",
        rated.mass_flow_lb_hr, rated.compressor_hz, rated.displacement_in3
    );
    println!("  Circuits: {}", config.circuits.len());

    if mapping_path.is_some() {
        let mapping = load_mapping(mapping_path)?;
        println!("  Sensor roles: {}", mapping.len());
        for (channel, roles) in mapping.duplicate_channels() {
            println!("  ! {channel} is mapped by {}", roles.join(", "));
        }
    }
    println!("✓ Configuration is valid");
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    samples_path: &Path,
    mapping_path: Option<&Path>,
    output: Option<&Path>,
    backend: Backend,
) -> CliResult<()> {
    let started = Instant::now();
    let result = run_batch(config_path, samples_path, mapping_path, backend)?;
    let elapsed = started.elapsed().as_secs_f64();

    println!("{}", result.summary);
    println!("\nResolved {} records in {:.3}s", result.records.len(), elapsed);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json)?;
        println!("✓ Wrote batch result to {}", path.display());
    }
    Ok(())
}

fn cmd_export_series(
    config_path: &Path,
    samples_path: &Path,
    metric: &str,
    mapping_path: Option<&Path>,
    output: Option<&Path>,
    backend: Backend,
) -> CliResult<()> {
    if !SUMMARY_METRICS.contains(&metric) {
        return Err(CliError::UnknownMetric {
            name: metric.to_string(),
            known: SUMMARY_METRICS.join(", "),
        });
    }
    let result = run_batch(config_path, samples_path, mapping_path, backend)?;

    // Unavailable values are written as empty cells.
    let mut csv = String::from("timestamp,value\n");
    let mut available = 0;
    for record in &result.records {
        let value = record_metric(record, metric).and_then(|v| v.get());
        match value {
            Some(v) => {
                available += 1;
                csv.push_str(&format!("{},{}\n", record.timestamp, v));
            }
            None => csv.push_str(&format!("{},\n", record.timestamp)),
        }
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} rows ({} available) to {}",
            result.records.len(),
            available,
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_dome(config_path: &Path, output: Option<&Path>, backend: Backend) -> CliResult<()> {
    let engine = build_engine(config_path, None, backend)?;
    let dome = engine.saturation_dome();

    let mut csv = String::from("pressure_kpa,h_liquid_kj_kg,h_vapor_kj_kg\n");
    for point in &dome.points {
        csv.push_str(&format!(
            "{},{},{}\n",
            point.pressure_kpa, point.h_liquid, point.h_vapor
        ));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Wrote {} dome points for {} to {}",
            dome.len(),
            engine.refrigerant(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}
