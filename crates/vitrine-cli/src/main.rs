//! Vitrine maintenance CLI.
//!
//! Offline reconciliation between the `medias` table and the upload
//! directory. Both commands scan first and print a report; deletions only
//! happen after an interactive confirmation (or `--yes`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use vitrine_cli::{confirm, format_bytes, init_tracing};
use vitrine_core::Config;
use vitrine_db::{MediaRepository, MediaStore};
use vitrine_services::{FileStatusReport, OrphanReport, ReconciliationService};
use vitrine_storage::create_storage;

#[derive(Parser)]
#[command(name = "vitrine", about = "Vitrine media maintenance CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every media record's file exists on the disk
    CheckStatus {
        /// Only print records whose file is missing
        #[arg(long)]
        missing_only: bool,
        /// Delete records with missing files without prompting
        #[arg(long)]
        yes: bool,
    },
    /// Find and delete files no media record references
    CleanupOrphaned {
        /// Report orphans without deleting anything
        #[arg(long)]
        dry_run: bool,
        /// Delete without prompting
        #[arg(long)]
        yes: bool,
    },
}

async fn build_service(config: &Config) -> Result<ReconciliationService> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let storage = create_storage(config)
        .await
        .context("Failed to create storage backend")?;
    let store: Arc<dyn MediaStore> = Arc::new(MediaRepository::new(pool));

    Ok(ReconciliationService::new(
        store,
        storage,
        config.upload_root.clone(),
    ))
}

fn print_status_report(report: &FileStatusReport, missing_only: bool) {
    println!("\n=== File Status ===\n");
    println!("Total records:  {}", report.total());
    println!("Files present:  {}", report.existing.len());
    println!("Files missing:  {}", report.missing.len());

    if !missing_only && !report.existing.is_empty() {
        println!("\n--- Present ---");
        for media in &report.existing {
            println!("{:>6}  {:<40} {}", media.id, media.path, media.original_name);
        }
    }

    if !report.missing.is_empty() {
        println!("\n--- Missing ---");
        for media in &report.missing {
            println!("{:>6}  {:<40} {}", media.id, media.path, media.original_name);
        }
    }
    println!();
}

fn print_orphan_report(report: &OrphanReport) {
    println!("\n=== Orphaned Files ===\n");
    println!("Files scanned:  {}", report.scanned_files);
    println!("Orphans found:  {}", report.orphans.len());
    println!("Total size:     {}", format_bytes(report.total_bytes()));

    if !report.orphans.is_empty() {
        println!();
        for orphan in &report.orphans {
            println!("{:<50} {:>12}", orphan.path, format_bytes(orphan.size));
        }
    }
    println!();
}

async fn check_status(service: &ReconciliationService, missing_only: bool, yes: bool) -> Result<()> {
    println!("Scanning media records...");
    let report = service.scan_missing().await?;
    print_status_report(&report, missing_only);

    if report.missing.is_empty() {
        println!("All files accounted for.");
        return Ok(());
    }

    let proceed = yes
        || confirm(&format!(
            "Delete {} record(s) whose file is missing?",
            report.missing.len()
        ))?;
    if !proceed {
        println!("Aborted, no records deleted.");
        return Ok(());
    }

    let deleted = service.delete_missing(&report).await?;
    println!("Deleted {} record(s).", deleted);
    Ok(())
}

async fn cleanup_orphaned(service: &ReconciliationService, dry_run: bool, yes: bool) -> Result<()> {
    println!("Scanning upload directory...");
    let report = service.scan_orphans().await?;
    print_orphan_report(&report);

    if report.orphans.is_empty() {
        println!("No orphaned files found.");
        return Ok(());
    }

    if dry_run {
        println!("Dry run, nothing deleted.");
        return Ok(());
    }

    let proceed = yes
        || confirm(&format!(
            "Delete {} orphaned file(s) ({})?",
            report.orphans.len(),
            format_bytes(report.total_bytes())
        ))?;
    if !proceed {
        println!("Aborted, no files deleted.");
        return Ok(());
    }

    let (deleted, failed) = service.delete_orphans(&report).await?;
    println!(
        "Deleted {} file(s), freed {}.",
        deleted,
        format_bytes(report.total_bytes())
    );
    if failed > 0 {
        println!("Failed to delete {} file(s), see logs.", failed);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let service = build_service(&config).await?;

    match cli.command {
        Commands::CheckStatus { missing_only, yes } => {
            check_status(&service, missing_only, yes).await
        }
        Commands::CleanupOrphaned { dry_run, yes } => {
            cleanup_orphaned(&service, dry_run, yes).await
        }
    }
}
