//! Inset CLI
//!
//! Resolve keyboard policies and replay scripted keyboard sessions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inset_core::PolicyTable;
use inset_platform::Platform;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod session;

use session::Session;

/// Policy file picked up from the working directory when `--config` is absent
const DEFAULT_POLICY_FILE: &str = "inset.toml";

#[derive(Parser)]
#[command(name = "inset")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keyboard inset coordinator CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Policy table (defaults to ./inset.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved keyboard policy for a platform
    Policy {
        /// Platform name (android, ios, ...); defaults to the host platform
        platform: Option<String>,
    },

    /// Replay a session script and print every correction
    Simulate {
        /// Session script (TOML)
        session: PathBuf,

        /// Platform to resolve the policy for (overrides the script)
        #[arg(short, long)]
        platform: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let table = load_policy_table(cli.config.as_deref())?;

    match cli.command {
        Commands::Policy { platform } => cmd_policy(&table, platform.as_deref()),
        Commands::Simulate { session, platform } => {
            cmd_simulate(&table, &session, platform.as_deref())
        }
    }
}

/// Load the policy table from `--config`, `./inset.toml`, or use built-ins
fn load_policy_table(path: Option<&Path>) -> Result<PolicyTable> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_POLICY_FILE);
            if !default.exists() {
                return Ok(PolicyTable::default());
            }
            default
        }
    };

    info!("Loading policy table from {}", path.display());
    PolicyTable::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}

fn parse_platform(name: Option<&str>) -> Platform {
    name.map(Platform::from_name).unwrap_or_else(Platform::current)
}

fn cmd_policy(table: &PolicyTable, platform: Option<&str>) -> Result<()> {
    let platform = parse_platform(platform);
    let config = table.resolve_or_fallback(&platform);

    let text = toml::to_string_pretty(&config).context("Failed to serialize policy")?;
    if platform.is_known() {
        println!("# {}", platform);
    } else {
        println!("# {} (no built-in policy)", platform);
    }
    print!("{}", text);
    Ok(())
}

fn cmd_simulate(table: &PolicyTable, path: &Path, platform: Option<&str>) -> Result<()> {
    let session = Session::load(path)?;
    let platform = parse_platform(platform.or(session.platform.as_deref()));
    let config = table.resolve_or_fallback(&platform);

    info!(
        "Simulating {} events on {} ({:?})",
        session.events.len(),
        platform,
        config.mode
    );

    let report = session::simulate(&session, config)?;

    for step in &report.steps {
        let clamped = if step.offset != step.requested {
            format!(" (requested {})", step.requested)
        } else {
            String::new()
        };
        println!(
            "event#{} -> {:?} offset {}{} ({})",
            step.event,
            step.reason,
            step.offset,
            clamped,
            if step.animate { "animated" } else { "instant" }
        );
    }

    if report.steps.is_empty() {
        println!("no corrections");
    }
    println!("final offset {}", report.final_offset);
    println!("bottom padding {}", report.bottom_padding);

    Ok(())
}
