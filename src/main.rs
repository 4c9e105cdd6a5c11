use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use clap_mangen::Man;
use std::io;
use std::path::PathBuf;
use time::format_description::{self, OwnedFormatItem};
use tracing::{error, info};

mod capabilities;
mod cli;
mod config;
mod core;
mod models;
mod symbols;

use crate::cli::{Commands, Outcome};
use crate::config::{Config, DEFAULT_TIME_FORMAT};
use crate::core::config_schema::{ConfigSchema, ValidationHelpers};
use crate::symbols::*;

#[derive(Parser)]
#[command(name = "mixin-chain")]
#[command(about = "Compose classes from capability modules and walk their dispatch chains")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum)]
    completions: Option<Shell>,

    /// Generate man page
    #[arg(long)]
    man: bool,

    /// Show detailed information about the tool
    #[arg(long)]
    info: bool,

    /// Print the JSON schema of the config file
    #[arg(long)]
    schema: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

const CONFIG_EXAMPLE: &str = r#"[classes.Reversed]
include = ["SpecialGreetings", "BaseGreetings"]"#;

/// Parses a timestamp format, falling back to the default on invalid input
fn timestamp_format(time_format: &str) -> OwnedFormatItem {
    match format_description::parse_owned::<1>(time_format) {
        Ok(format) => format,
        Err(e) => {
            eprintln!(
                "{SYMBOL_INDICATOR_WARNING} Invalid time format '{time_format}' ({e}). Using default format."
            );
            format_description::parse_owned::<1>(DEFAULT_TIME_FORMAT)
                .unwrap_or_else(|_| OwnedFormatItem::Compound(Box::new([])))
        }
    }
}

fn create_subscriber(
    verbose: bool,
    time_format: &str,
) -> Box<dyn tracing::Subscriber + Send + Sync> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Logs go to stderr so stdout carries only command results
    Box::new(
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_timer(tracing_subscriber::fmt::time::LocalTime::new(
                timestamp_format(time_format),
            ))
            .with_writer(io::stderr)
            .finish(),
    )
}

fn print_info() {
    println!(
        "{SYMBOL_TOOL_CONFIG} mixin-chain v{}",
        env!("CARGO_PKG_VERSION")
    );
    println!("{SYMBOL_DOC_NOTE} {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("{SYMBOL_SCOPE_GLOBAL} Repository: {}", env!("CARGO_PKG_REPOSITORY"));
    println!("{SYMBOL_INDICATOR_INFO} License: {}", env!("CARGO_PKG_LICENSE"));
    println!();
    println!("{SYMBOL_ACTION_LAUNCH} Usage:");
    println!("   mixin-chain call MyClass greet     # Call a method");
    println!("   mixin-chain chain MyClass greet    # Show the dispatch chain");
    println!("   mixin-chain ancestors MyClass      # Show the linearization");
    println!("   mixin-chain list                   # List modules and classes");
    println!("   mixin-chain validate --password X  # Validate a user");
    println!("   Use --help for detailed options");
    println!();
    println!("{SYMBOL_DOC_BOOK} Man Page:");
    println!("   mixin-chain --man > /usr/local/share/man/man1/mixin-chain.1");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --completions flag early
    if let Some(shell) = args.completions {
        let mut app = Args::command();
        generate(shell, &mut app, "mixin-chain", &mut io::stdout());
        return Ok(());
    }

    // Handle --man flag early
    if args.man {
        let app = Args::command();
        let man = Man::new(app);
        man.render(&mut io::stdout())?;
        return Ok(());
    }

    if args.info {
        print_info();
        return Ok(());
    }

    if args.schema {
        let schema = serde_json::to_string_pretty(&Config::render_schema()?)
            .context("Failed to serialize config schema")?;
        println!("{schema}");
        return Ok(());
    }

    // Load configuration
    let loaded = if let Some(config_path) = &args.config {
        Config::load_from_file(config_path).await
    } else {
        Config::load().await
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            let location = args
                .config
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "mixin-chain.toml".to_string());
            eprintln!(
                "{}",
                ValidationHelpers::format_validation_error(&location, CONFIG_EXAMPLE, &e)
            );
            std::process::exit(1);
        }
    };

    // Initialize logging
    let verbose = args.verbose || config.is_verbose_default();
    let subscriber = create_subscriber(verbose, &config.get_time_format());
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")?;

    if let Some(config_path) = &args.config {
        info!(
            "{SYMBOL_INDICATOR_INFO} Using custom config file: {}",
            config_path.display()
        );
    }

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    match crate::cli::handle_command(command, &config) {
        Ok(Outcome::Success) => Ok(()),
        Ok(Outcome::Invalid) => std::process::exit(1),
        Err(e) => {
            error!("{SYMBOL_INDICATOR_ERROR} {e:#}");
            std::process::exit(1);
        }
    }
}
