use crate::config::Config;
use crate::db::listings::{load_listings, upsert_listings};
use crate::db::{init_db, Database};
use crate::domain::{compute_differences, DedupReport};
use crate::mock_data::{generate, SeedMode};
use crate::responses::error_to_response;
use crate::router::{handle, AppState};
use crate::spreadsheets::{diff_workbook, listings_workbook, write_diff_csvs};
use anyhow::{Context, Result};
use astra::Server;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod domain;
mod errors;
mod mock_data;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

/// Cross-site real-estate listing reconciliation.
///
/// Settings come from the environment (or a `.env` file): DATABASE_PATH,
/// SCHEMA_PATH, BIND_ADDR, MAX_WORKERS, SOURCE_A, SOURCE_B, EXPORT_DIR.
#[derive(Parser)]
#[command(name = "listing-recon", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard HTTP server.
    Serve,

    /// Create the listings table. Safe to run more than once.
    InitDb,

    /// Insert synthetic listings from both sources.
    Seed {
        /// Number of rows to generate.
        #[arg(long, default_value_t = 300)]
        count: usize,

        /// Share of base rows cloned onto the other source.
        #[arg(long, default_value_t = 0.3)]
        duplicate_ratio: f64,

        /// One or two drifting clones per duplicated row.
        #[arg(long)]
        enhanced: bool,

        /// `count / 2` listings found on both sites, each pair differing in
        /// one field.
        #[arg(long, conflicts_with = "enhanced")]
        curated: bool,
    },

    /// Fingerprint stored listings and report duplicate groups.
    Dedupe {
        /// Write the flagged listings to this XLSX file.
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Print groups and flagged listings as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compare the two sources and report what differs.
    Diff {
        /// Workbook path. Defaults to a timestamped file under EXPORT_DIR.
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Also write one CSV per collection into this directory.
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Print the result as JSON instead of writing a workbook.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listing_recon=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let db = Database::new(&config.database_path);

    match cli.command {
        Commands::Serve => serve(&config, db),
        Commands::InitDb => {
            init_db(&db, &config.schema_path).context("Database initialization failed")?;
            Ok(())
        }
        Commands::Seed {
            count,
            duplicate_ratio,
            enhanced,
            curated,
        } => {
            let mode = if curated {
                SeedMode::Curated
            } else if enhanced {
                SeedMode::Enhanced
            } else {
                SeedMode::Mock
            };
            seed(&config, &db, count, duplicate_ratio, mode)
        }
        Commands::Dedupe { xlsx, json } => dedupe(&db, xlsx.as_deref(), json),
        Commands::Diff {
            xlsx,
            csv_dir,
            json,
        } => diff(&config, &db, xlsx, csv_dir.as_deref(), json),
    }
}

fn serve(config: &Config, db: Database) -> Result<()> {
    init_db(&db, &config.schema_path).context("Database initialization failed")?;

    let state = AppState {
        db,
        sources: config.sources.clone(),
    };

    info!(
        "Starting server at http://{} ({} vs {})",
        config.bind_addr, state.sources.left, state.sources.right
    );

    Server::bind(&config.bind_addr)
        .max_workers(config.max_workers)
        .serve(move |req, _info| match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        })
        .context("Server ended with error")?;

    info!("Server shut down cleanly.");
    Ok(())
}

fn seed(config: &Config, db: &Database, count: usize, ratio: f64, mode: SeedMode) -> Result<()> {
    init_db(db, &config.schema_path).context("Database initialization failed")?;

    let mut rng = rand::thread_rng();
    let rows = generate(&mut rng, mode, count, ratio, &config.sources);

    let written = upsert_listings(db, &rows).context("Failed to store mock listings")?;
    info!(
        "Seeded {written} {} listings into {}",
        mode.as_str(),
        db.path().display()
    );
    Ok(())
}

fn dedupe(db: &Database, xlsx: Option<&Path>, json: bool) -> Result<()> {
    let listings = load_listings(db).context("Failed to load listings")?;
    let report = DedupReport::build(&listings);

    info!(
        total = report.total,
        unique = report.unique,
        groups = report.groups.len(),
        "dedupe complete"
    );
    for group in &report.groups {
        info!(
            fingerprint = group.fingerprint.short(),
            members = group.members.len(),
            "duplicate group"
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if let Some(path) = xlsx {
        write_file(path, &listings_workbook(&report.entries)?)?;
        info!("Listings workbook written to {}", path.display());
    }
    Ok(())
}

fn diff(
    config: &Config,
    db: &Database,
    xlsx: Option<PathBuf>,
    csv_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let listings = load_listings(db).context("Failed to load listings")?;
    let result = compute_differences(&listings, &config.sources)?;

    info!(
        only_a = result.only_in_a.len(),
        only_b = result.only_in_b.len(),
        mismatches = result.mismatches.len(),
        identical = result.identical_pairs,
        "{} vs {}",
        result.pair.left,
        result.pair.right
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let path = xlsx.unwrap_or_else(|| {
            let stamp = Local::now().format("%Y%m%d_%H%M%S");
            config.export_dir.join(format!("source_differences_{stamp}.xlsx"))
        });
        write_file(&path, &diff_workbook(&result)?)?;
        info!("Differences workbook written to {}", path.display());
    }

    if let Some(dir) = csv_dir {
        write_diff_csvs(dir, &result)?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
