//! CLI administration tool for membership-api.
//!
//! Provides commands for viewing statistics, restoring soft-deleted records,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Restore a soft-deleted user
//! cargo run --bin admin -- restore user 42
//!
//! # Restore a soft-deleted company without prompting
//! cargo run --bin admin -- restore company 7 --yes
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components: PostgreSQL connection
//!
//! # Features
//!
//! - **Statistics**: Live users, live companies, memberships, deleted records
//! - **Restore**: Clear the soft-delete marker of a user or company
//! - **Database Tools**: Connection checks and info queries
//! - **Interactive Prompts**: Confirmation dialogs via `dialoguer`
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use membership_api::application::services::{CompanyService, UserService};
use membership_api::config::Config;
use membership_api::infrastructure::persistence::{PgCompanyRepository, PgUserRepository};
use membership_api::server::connect_pool;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing membership-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show statistics
    Stats,

    /// Restore a soft-deleted record
    Restore {
        /// Kind of record to restore
        kind: RecordKind,

        /// Record ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Restorable record kinds.
#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    User,
    Company,
}

impl RecordKind {
    fn table(self) -> &'static str {
        match self {
            RecordKind::User => "users",
            RecordKind::Company => "companies",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RecordKind::User => "User",
            RecordKind::Company => "Company",
        }
    }
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Restore { kind, id, yes } => restore_record(&pool, kind, id, yes).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Live users and companies
/// - Soft-deleted users and companies
/// - Membership rows
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (users, deleted_users) = count_live_and_deleted(pool, "users").await?;
    let (companies, deleted_companies) = count_live_and_deleted(pool, "companies").await?;

    let memberships: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_company")
        .fetch_one(pool)
        .await?;

    println!(
        "  Users:       {} ({} deleted)",
        users.to_string().bright_green().bold(),
        deleted_users.to_string().bright_black()
    );
    println!(
        "  Companies:   {} ({} deleted)",
        companies.to_string().bright_green().bold(),
        deleted_companies.to_string().bright_black()
    );
    println!(
        "  Memberships: {}",
        memberships.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn count_live_and_deleted(pool: &PgPool, table: &str) -> Result<(i64, i64)> {
    let counts: (i64, i64) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FILTER (WHERE deleted_at IS NULL), \
                COUNT(*) FILTER (WHERE deleted_at IS NOT NULL) \
         FROM {table}"
    ))
    .fetch_one(pool)
    .await?;

    Ok(counts)
}

/// Restores a soft-deleted user or company after confirmation.
///
/// # Flow
///
/// 1. Look the record up, including deleted rows
/// 2. Show its name and deletion time
/// 3. Confirm (unless `--yes` flag)
/// 4. Clear `deleted_at` through the service layer
///
/// Memberships were never removed on delete, so they become visible again.
async fn restore_record(pool: &PgPool, kind: RecordKind, id: i64, skip_confirm: bool) -> Result<()> {
    println!(
        "{}",
        format!("♻️  Restore {}", kind.label()).bright_blue().bold()
    );
    println!();

    let row: Option<(String, Option<DateTime<Utc>>)> = sqlx::query_as(&format!(
        "SELECT name, deleted_at FROM {} WHERE id = $1",
        kind.table()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let (name, deleted_at) = row.with_context(|| format!("{} {} not found", kind.label(), id))?;

    let Some(deleted_at) = deleted_at else {
        println!(
            "{}",
            format!("⚠️  {} {} is not deleted", kind.label(), id).yellow()
        );
        return Ok(());
    };

    println!("  Name:    {}", name.cyan());
    println!("  ID:      {}", id.to_string().bright_black());
    println!(
        "  Deleted: {}",
        deleted_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Restore this {}?", kind.label().to_lowercase()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let pool = Arc::new(pool.clone());
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let companies = Arc::new(PgCompanyRepository::new(pool));

    match kind {
        RecordKind::User => {
            UserService::new(users, companies)
                .restore_user(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to restore user: {}", e))?;
        }
        RecordKind::Company => {
            CompanyService::new(companies, users)
                .restore_company(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to restore company: {}", e))?;
        }
    }

    println!();
    println!(
        "{}",
        format!("✅ {} restored successfully!", kind.label())
            .green()
            .bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
