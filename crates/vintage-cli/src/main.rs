use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vintage_cli::parse_intensity;
use vintage_core::config::{config_handle, log_config_usage};
use vintage_core::Backend;

mod commands;

use commands::{cmd_apply, cmd_benchmark, cmd_init, cmd_parity};

#[derive(Parser)]
#[command(name = "vintage")]
#[command(version, about = "Sepia and film grain effect with native/managed benchmark", long_about = None)]
struct Cli {
    /// Configuration file (overrides the search path)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the vintage effect to an image
    Apply {
        /// Input image (PNG or TIFF)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory or file
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Number of workers
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Effect strength (0.0-1.0)
        #[arg(long, value_name = "FLOAT", value_parser = parse_intensity)]
        intensity: Option<f32>,

        /// Backend: "native" or "managed"
        #[arg(long, value_name = "BACKEND")]
        backend: Option<Backend>,
    },

    /// Time both backends over a matrix of sizes and worker counts
    Benchmark {
        /// Source image; a synthetic gradient is used when omitted
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Write samples to a CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Effect strength (0.0-1.0)
        #[arg(long, value_name = "FLOAT", value_parser = parse_intensity)]
        intensity: Option<f32>,

        /// Image sizes, e.g. "800x600,1920x1080"
        #[arg(long, value_name = "WxH,...")]
        sizes: Option<String>,

        /// Worker counts, e.g. "1,2,4,8"
        #[arg(long, value_name = "N,...")]
        threads: Option<String>,
    },

    /// Check that both backends produce identical bytes
    Parity {
        /// Input image (PNG or TIFF)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Number of workers
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Effect strength (0.0-1.0)
        #[arg(long, value_name = "FLOAT", value_parser = parse_intensity)]
        intensity: Option<f32>,
    },

    /// Write the default configuration file
    Init {
        /// Destination (default: ~/vintage/vintage.yml)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let config = &config_handle(cli.config.as_deref()).config;
    log_config_usage();

    let result = match cli.command {
        Commands::Apply {
            input,
            out,
            threads,
            intensity,
            backend,
        } => cmd_apply(input, out, threads, intensity, backend, config),

        Commands::Benchmark {
            input,
            csv,
            intensity,
            sizes,
            threads,
        } => cmd_benchmark(input, csv, intensity, sizes, threads, config),

        Commands::Parity {
            input,
            threads,
            intensity,
        } => cmd_parity(input, threads, intensity, config),

        Commands::Init { path, force } => cmd_init(path, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
