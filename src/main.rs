//! Command line front end for the Marina SAT client

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marina_sat::{
    config::{CliOverrides, OutputFormat, Settings, UnsatRule},
    grammar::{validate, CheckedFormula, Formula},
    interpret::{interpret, SubmissionTracker},
    proxy,
    utils::{ColorOutput, ResultFormatter},
    MarinaClient,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marina_sat")]
#[command(about = "Boolean formula satisfiability via the Marina solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a formula locally, send it to the solver and show the result
    Solve {
        /// Formula, e.g. "(a & b | ~c) -> d <-> e"
        formula: String,

        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Solver base URL (overrides config and MARINA_API_URL)
        #[arg(short, long)]
        url: Option<String>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// How UNSAT answers are recognised (overrides config)
        #[arg(long, value_enum)]
        unsat_rule: Option<UnsatRule>,

        /// Send the formula even if it fails the local grammar check
        #[arg(long)]
        skip_check: bool,

        /// Save a text report into the report directory
        #[arg(short, long)]
        save: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check a formula against the grammar without contacting the solver
    Check {
        /// Formula to check
        formula: String,
    },

    /// Run the proxy forwarder
    Proxy {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,

        /// Solver base URL (overrides config and MARINA_API_URL)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Read formulas from stdin, one per line, showing the latest result
    Interactive {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Solver base URL (overrides config and MARINA_API_URL)
        #[arg(short, long)]
        url: Option<String>,

        /// How UNSAT answers are recognised (overrides config)
        #[arg(long, value_enum)]
        unsat_rule: Option<UnsatRule>,
    },

    /// Create a default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            formula, config, url, format, unsat_rule,
            skip_check, save, verbose
        } => {
            init_logging(if verbose { "debug" } else { "warn" });
            let overrides = CliOverrides {
                base_url: url,
                format,
                unsat_rule,
                ..Default::default()
            };
            let settings = load_settings(&config, &overrides)?;
            solve_command(settings, formula, skip_check, save, verbose).await
        }
        Commands::Check { formula } => {
            init_logging("warn");
            check_command(&formula)
        }
        Commands::Proxy { config, bind, url } => {
            init_logging("info");
            let overrides = CliOverrides {
                base_url: url,
                bind_address: bind,
                ..Default::default()
            };
            let settings = load_settings(&config, &overrides)?;
            proxy_command(settings).await
        }
        Commands::Interactive { config, url, unsat_rule } => {
            init_logging("warn");
            let overrides = CliOverrides {
                base_url: url,
                unsat_rule,
                ..Default::default()
            };
            let settings = load_settings(&config, &overrides)?;
            interactive_command(settings).await
        }
        Commands::Setup { directory, force } => {
            init_logging("warn");
            setup_command(directory, force)
        }
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the config file, then the environment, then CLI flags
fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = Settings::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    settings.apply_env();
    settings.merge_with_cli(overrides);

    settings.validate()
        .context("Configuration validation failed")?;

    Ok(settings)
}

/// Run the local grammar check, or only warn about it when `skip_check` is set
fn guard(formula: &Formula, skip_check: bool) -> Result<Option<CheckedFormula>> {
    match formula.check() {
        Ok(checked) => Ok(Some(checked)),
        Err(e) if skip_check => {
            tracing::warn!("Formula does not match the grammar ({}), sending it anyway", e);
            Ok(None)
        }
        Err(e) => {
            eprintln!("{}", pointer(formula.as_str(), e.offset()));
            anyhow::bail!("Formula rejected locally: {} (use --skip-check to send it anyway)", e)
        }
    }
}

/// The formula with a caret under the offending position
fn pointer(text: &str, offset: Option<usize>) -> String {
    match offset {
        Some(offset) => {
            let column = text.get(..offset).map_or(0, |prefix| prefix.chars().count());
            format!("  {}\n  {}^", text, " ".repeat(column))
        }
        None => format!("  {}", text),
    }
}

async fn solve_command(settings: Settings, text: String, skip_check: bool, save: bool, verbose: bool) -> Result<()> {
    let formula = Formula::new(text)?;
    let checked = guard(&formula, skip_check)?;

    let client = MarinaClient::from_settings(&settings)
        .context("Failed to create solver client")?;

    let text_output = settings.output.format == OutputFormat::Text;
    if verbose {
        println!("Configuration:");
        println!("  Endpoint: {}", client.endpoint());
        println!("  UNSAT rule: {:?}", settings.interpretation.unsat_rule);
        println!("  Output format: {:?}", settings.output.format);
        println!();
    }
    if text_output {
        println!("{}", ColorOutput::info("🧮 Solving..."));
    }

    let start_time = Instant::now();
    let response = client.solve(&formula).await;
    let outcome = interpret(&response, settings.interpretation.unsat_rule);
    let elapsed = start_time.elapsed();

    match settings.output.format {
        OutputFormat::Text => {
            println!("{}", ResultFormatter::format_outcome(&formula, &outcome, checked.as_ref()));
        }
        OutputFormat::Json => {
            println!("{}", ResultFormatter::format_json(&formula, &outcome, checked.as_ref())?);
        }
    }

    if verbose {
        println!("Answered in {:.3}s", elapsed.as_secs_f64());
    }

    if save {
        let path = ResultFormatter::save_report(&settings.output.report_directory, &formula, &response)
            .context("Failed to save result")?;
        if text_output {
            println!("{}", ColorOutput::success(&format!("💾 Result saved to {}", path.display())));
        }
    }

    Ok(())
}

fn check_command(text: &str) -> Result<()> {
    match validate(text) {
        Ok(checked) => {
            println!("{}", ColorOutput::success("✅ Formula is well-formed"));
            if checked.atoms().is_empty() {
                println!("Variables: none");
            } else {
                println!("Variables: {}", checked.atoms().join(", "));
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", ColorOutput::error("❌ Formula is not well-formed"));
            println!("{}", pointer(text, e.offset()));
            anyhow::bail!("{}", e)
        }
    }
}

async fn proxy_command(settings: Settings) -> Result<()> {
    let client = MarinaClient::from_settings(&settings)
        .context("Failed to create solver client")?;

    let listener = TcpListener::bind(&settings.proxy.bind_address).await
        .with_context(|| format!("Failed to bind {}", settings.proxy.bind_address))?;

    println!("{}", ColorOutput::info(&format!(
        "🔀 Forwarding http://{}/api/solve to {}",
        settings.proxy.bind_address,
        client.endpoint()
    )));

    proxy::serve(listener, client, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn interactive_command(settings: Settings) -> Result<()> {
    let client = MarinaClient::from_settings(&settings)
        .context("Failed to create solver client")?;
    let rule = settings.interpretation.unsat_rule;
    let tracker = Arc::new(SubmissionTracker::new());
    let mut tasks = JoinSet::new();

    println!("{}", ColorOutput::info("Enter one formula per line, Ctrl-D to quit."));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        let formula = match Formula::new(line) {
            Ok(formula) => formula,
            Err(e) => {
                println!("{}", ColorOutput::warning(&e.to_string()));
                continue;
            }
        };
        let checked = match formula.check() {
            Ok(checked) => checked,
            Err(e) => {
                println!("{}", pointer(formula.as_str(), e.offset()));
                println!("{}", ColorOutput::error(&format!("Formula rejected: {}", e)));
                continue;
            }
        };

        let id = tracker.submit();
        println!("[{}] submitted: {}", id.value(), formula);

        let client = client.clone();
        let tracker = Arc::clone(&tracker);
        tasks.spawn(async move {
            let response = client.solve(&formula).await;
            let outcome = interpret(&response, rule);
            let rendered = ResultFormatter::format_outcome(&formula, &outcome, Some(&checked));
            if tracker.resolve(id, formula, outcome) {
                println!("[{}]\n{}", id.value(), rendered);
            } else {
                println!("{}", ColorOutput::warning(&format!(
                    "[{}] superseded by a newer submission, result dropped", id.value()
                )));
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Solve task failed: {}", e);
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let settings = Settings::default();
    let report_dir = directory.join(&settings.output.report_directory);

    for dir in [&config_dir, &report_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        settings.to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Point solver.base_url in {} at your Marina solver", config_path.display());
    println!("2. Run: cargo run -- solve \"a & ~b\"");

    Ok(())
}
