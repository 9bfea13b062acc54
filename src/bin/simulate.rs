//! Dungeon balance simulator CLI.
//!
//! Run Monte Carlo playthroughs to analyze game balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 200 runs, 12 dungeons each
//!   cargo run --bin simulate -- -n 50 -d 6     # 50 runs, 6 dungeons each
//!   cargo run --bin simulate -- --seed 42      # Reproducible run

use delve::catalog::{default_catalog, StaticCatalog};
use delve::core::EngineConfig;
use delve::simulator::{run_simulation, SimConfig};
use std::env;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct Options {
    config: SimConfig,
    config_path: Option<String>,
    catalog_path: Option<String>,
    json: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut options = parse_args(&args);

    let default_level = match options.config.verbosity {
        0 => "error",
        1 => "warn",
        _ => "info",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &options.config_path {
        match read_file(path).and_then(|json| EngineConfig::from_json(&json).map_err(|e| e.to_string())) {
            Ok(engine) => options.config.engine = engine,
            Err(err) => fail(&format!("bad engine config {path}: {err}")),
        }
    }

    let catalog = match &options.catalog_path {
        Some(path) => {
            match read_file(path).and_then(|json| StaticCatalog::from_json(&json).map_err(|e| e.to_string())) {
                Ok(catalog) => catalog,
                Err(err) => fail(&format!("bad catalog {path}: {err}")),
            }
        }
        None => default_catalog(),
    };

    let config = &options.config;
    if !options.json {
        println!("╔═══════════════════════════════════════════════════════════════╗");
        println!("║              DELVE BALANCE SIMULATOR                          ║");
        println!("╚═══════════════════════════════════════════════════════════════╝");
        println!();
        println!("Configuration:");
        println!("  Runs:           {}", config.num_runs);
        println!("  Dungeons/Run:   {}", config.max_dungeons);
        println!("  Actions/Dungeon:{}", config.max_actions_per_dungeon);
        if let Some(seed) = config.seed {
            println!("  Seed:           {}", seed);
        }
        println!();
        println!("Running simulation...");
        println!();
    }

    let report = match run_simulation(config, &catalog) {
        Ok(report) => report,
        Err(err) => fail(&format!("simulation failed: {err}")),
    };

    if options.json {
        println!("{}", report.to_json());
    } else {
        println!("{}", report.to_text());
    }
}

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| e.to_string())
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        config: SimConfig::default(),
        config_path: None,
        catalog_path: None,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "-n" | "--runs" => {
                if let Some(v) = value {
                    options.config.num_runs = v.parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if let Some(v) = value {
                    options.config.seed = v.parse().ok();
                    i += 1;
                }
            }
            "-d" | "--dungeons" => {
                if let Some(v) = value {
                    options.config.max_dungeons = v.parse().unwrap_or(12);
                    i += 1;
                }
            }
            "-a" | "--actions" => {
                if let Some(v) = value {
                    options.config.max_actions_per_dungeon = v.parse().unwrap_or(2_000);
                    i += 1;
                }
            }
            "--config" => {
                if let Some(v) = value {
                    options.config_path = Some(v.clone());
                    i += 1;
                }
            }
            "--catalog" => {
                if let Some(v) = value {
                    options.catalog_path = Some(v.clone());
                    i += 1;
                }
            }
            "--json" => {
                options.json = true;
            }
            "-v" | "--verbose" => {
                options.config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                options.config.verbosity = 0;
            }
            "--quick" => {
                let seed = options.config.seed.unwrap_or(0);
                options.config = SimConfig::quick(seed);
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    options
}

fn print_help() {
    println!("Delve Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>        Number of simulated characters (default: 200)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    -d, --dungeons <D>    Dungeons per run (default: 12)");
    println!("    -a, --actions <A>     Actions per dungeon before a stall (default: 2000)");
    println!("    --config <FILE>       Engine rules as JSON (partial overrides allowed)");
    println!("    --catalog <FILE>      Item/enemy/tier catalog as JSON");
    println!("    --json                Print the report as JSON");
    println!("    --quick               Quick seeded test (10 runs, 4 dungeons)");
    println!("    -v, --verbose         Log every run (RUST_LOG overrides)");
    println!("    -q, --quiet           Errors only");
    println!("    -h, --help            Show this help");
}
