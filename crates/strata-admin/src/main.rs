//! `Strata` schema administration CLI.
//!
//! Runs the startup schema bootstrap from `STRATA_*` environment
//! configuration, and can print a keyspace's live schema.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use strata_bootstrap::BootstrapConfig;
use strata_cluster::{ClusterHandle, SchemaOps};
use strata_types::KeyspaceName;

/// `Strata` schema administration CLI.
#[derive(Parser)]
#[command(name = "strata-admin")]
#[command(about = "Strata schema administration CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure the configured keyspace and column family catalog exist.
    Bootstrap,

    /// Print a keyspace's live schema.
    Describe {
        /// Keyspace name; defaults to the configured keyspace.
        keyspace: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = BootstrapConfig::from_env().context("loading bootstrap configuration")?;

    match cli.command {
        Commands::Bootstrap => {
            let bootstrap = strata_bootstrap::run(&config).context("schema bootstrap failed")?;
            let report = bootstrap.report();
            println!(
                "keyspace `{}` ready: {} column families created, {} already present",
                bootstrap.keyspace().name(),
                report.created,
                report.existing
            );
            bootstrap.shutdown();
        }

        Commands::Describe { keyspace } => {
            let name = match keyspace {
                Some(raw) => KeyspaceName::new(raw)?,
                None => config.keyspace.clone(),
            };

            let handle = ClusterHandle::connect(config.cluster_config())
                .with_context(|| format!("failed to connect to {}", config.host))?;

            match handle.describe_keyspace(&name)? {
                None => println!("keyspace `{name}` does not exist"),
                Some(metadata) => {
                    println!(
                        "keyspace `{}` (replication factor {})",
                        metadata.name, metadata.replication_factor
                    );
                    for family in &metadata.families {
                        println!("  {family}");
                    }
                    println!("{} column families", metadata.families.len());
                }
            }

            handle.shutdown();
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}
