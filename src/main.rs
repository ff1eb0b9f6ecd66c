//! PROTOSOUP - CLI entry point
//!
//! Headless host for the primordial soup simulator.

use clap::{Parser, Subcommand};
use protosoup::metrics::Summary;
use protosoup::{benchmark, Config, Simulation};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "protosoup")]
#[command(version)]
#[command(about = "Primordial soup simulator - vesicles, monomers and mechanical fission")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "10000")]
        ticks: u64,

        /// Simulated seconds per tick
        #[arg(long, default_value = "0.016666668")]
        dt: f32,

        /// Output directory for metric exports
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// Total entity count
        #[arg(short, long, default_value = "2000")]
        entities: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            dt,
            output,
            seed,
            quiet,
        } => run_simulation(config, ticks, dt, output, seed, quiet),

        Commands::Benchmark { ticks, entities } => run_benchmark(ticks, entities),

        Commands::Init { output } => generate_config(output),
    }
}

fn run_simulation(
    config_path: PathBuf,
    ticks: u64,
    dt: f32,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };

    // Initialize logging with the configured default level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.log_level.as_str()),
    )
    .init();

    if dt <= 0.0 {
        return Err("dt must be > 0".into());
    }

    // Create output directory
    std::fs::create_dir_all(&output)?;

    // Create the soup
    let mut sim = if let Some(s) = seed {
        println!("Using seed: {}", s);
        Simulation::with_seed(config.clone(), s)
    } else {
        Simulation::new(config.clone())
    };

    println!("Starting simulation");
    println!(
        "  Population: {} ({} vesicles, {} monomers)",
        sim.population(),
        sim.vesicle_count(),
        sim.monomer_count()
    );
    println!(
        "  Bounds: {}x{} ({}x{} partitions)",
        config.world.width, config.world.height, config.world.grid_width, config.world.grid_height
    );
    println!("  Ticks: {} at dt {:.4}s", ticks, dt);
    println!();

    let start = Instant::now();
    let summary_interval = config.logging.summary_interval.max(1);

    for i in 0..ticks {
        sim.step(dt);

        if !quiet && i % summary_interval == 0 {
            let summary = Summary::measure(sim.clock(), &sim.store.entities);
            println!("{}", summary.summary());
        }

        if sim.is_extinct() {
            println!("\nAll vesicles gone at tick {}", sim.ticks);
            break;
        }
    }

    let elapsed = start.elapsed();
    let ticks_per_sec = sim.ticks as f64 / elapsed.as_secs_f64();

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Ticks: {}", sim.ticks);
    println!("Speed: {:.1} ticks/s", ticks_per_sec);
    println!("Simulated: {:.1}s", sim.clock());
    println!(
        "Population: {} ({} vesicles, {} monomers)",
        sim.population(),
        sim.vesicle_count(),
        sim.monomer_count()
    );

    // Export per-vesicle metric series as delimited text
    let written = sim.recorder.export_series(&output)?;
    println!("Metric series exported: {} files in {:?}", written, output);

    // Final population summary
    let summary = Summary::measure(sim.clock(), &sim.store.entities);
    let summary_path = output.join("summary.json");
    summary.save_json(&summary_path)?;
    println!("Summary: {:?}", summary_path);

    Ok(())
}

fn run_benchmark(ticks: u64, entities: usize) -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("=== PROTOSOUP Benchmark ===");
    println!("Ticks: {}", ticks);
    println!("Entities: {}", entities);
    println!();

    let result = benchmark(ticks, entities);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
