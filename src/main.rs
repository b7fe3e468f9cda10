use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fabric_retrofit::config::{Config, DEFAULT_CONFIG_PATH};
use fabric_retrofit::{telemetry, BerBand, BuildingStock, RetrofitOrchestrator, RetrofitSelector};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fabric-retrofit")]
#[command(about = "Estimate the effect and cost of fabric retrofits across a housing stock", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the retrofit pipeline over a stock file
    Run {
        /// Stock file: JSON array of dwelling records
        #[arg(short, long)]
        stock: PathBuf,

        /// Only keep dwellings in this BER band (A-B, C-D, E-G)
        #[arg(short, long)]
        band: Option<BerBand>,

        /// Only keep dwellings in these small areas (repeatable)
        #[arg(long = "small-area")]
        small_areas: Vec<String>,

        /// Override the random state
        #[arg(long)]
        seed: Option<u64>,

        /// Override the % of eligible walls retrofitted
        #[arg(long)]
        wall_percentage: Option<f64>,

        /// Override the % of eligible roofs retrofitted
        #[arg(long)]
        roof_percentage: Option<f64>,

        /// Override the % of eligible windows retrofitted
        #[arg(long)]
        window_percentage: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Output file path
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    telemetry::init_tracing(cli.log_json);

    let mut cfg = Config::load_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Config => {
            print!("{}", cfg.to_toml()?);
        }
        Commands::Run {
            stock,
            band,
            small_areas,
            seed,
            wall_percentage,
            roof_percentage,
            window_percentage,
            format,
            output_file,
        } => {
            if let Some(seed) = seed {
                cfg.simulation.seed = seed;
            }
            if let Some(p) = wall_percentage {
                cfg.policies.wall.percentage_retrofitted = p;
            }
            if let Some(p) = roof_percentage {
                cfg.policies.roof.percentage_retrofitted = p;
            }
            if let Some(p) = window_percentage {
                cfg.policies.window.percentage_retrofitted = p;
            }

            let file = File::open(&stock)
                .with_context(|| format!("opening stock file {}", stock.display()))?;
            let raw_stock = BuildingStock::from_reader(BufReader::new(file))?;
            let filtered = raw_stock
                .filter_by_band(band)
                .filter_by_small_areas(&small_areas);
            info!(
                loaded = raw_stock.len(),
                selected = filtered.len(),
                "building stock ready"
            );
            if filtered.is_empty() {
                warn!("no dwellings left after filtering");
            }

            let orchestrator = RetrofitOrchestrator::new(
                cfg.heat_loss,
                RetrofitSelector::new(cfg.simulation.seed),
            );
            let report = orchestrator.run(&filtered, &cfg.policies)?;

            let output = match format {
                OutputFormat::Markdown => report.to_markdown(),
                OutputFormat::Json => report.to_json()?,
            };

            if let Some(path) = output_file {
                std::fs::write(&path, output)?;
                info!(path = %path.display(), "report saved");
            } else {
                println!("{}", output);
            }
        }
    }

    Ok(())
}
