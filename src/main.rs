// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use pacdb::{Database, PackageRecord};

#[derive(Parser)]
#[command(name = "pacdb")]
#[command(author, version, about = "Query and round-trip pacman package databases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a package in the system databases and print its record
    Query {
        /// Package name to resolve
        name: String,
        /// Sync database archives to search instead of the system set
        #[arg(short, long)]
        db: Vec<String>,
    },
    /// Decode a desc file and re-encode it to stdout
    Parse {
        /// Path to a package description file
        path: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query { name, db } => {
            let database = if db.is_empty() {
                Database::system()
            } else {
                Database::new(db.into_iter().map(pacdb::Repository::sync).collect())
            };
            let pkg = database.query(&name)?;
            println!("Found package: {:#?}\n", pkg);
            print!("{}", String::from_utf8_lossy(&pkg.encode()));
            Ok(())
        }
        Commands::Parse { path } => {
            let bytes = std::fs::read(&path)?;
            let record = PackageRecord::decode(&bytes)?;
            print!("{}", String::from_utf8_lossy(&record.encode()));
            Ok(())
        }
    }
}
