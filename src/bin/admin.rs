//! CLI administration tool for shortly.
//!
//! Inspects the store and the cache without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # System totals
//! cargo run --bin admin -- stats
//!
//! # Newest short URLs
//! cargo run --bin admin -- urls list --page 1 --limit 20
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Drop a cached mapping so the next redirect reads the database
//! cargo run --bin admin -- cache evict promo
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`), and `REDIS_URL` (or `REDIS_*`)
//! for cache commands.

use shortly::application::services::{AnalyticsService, UrlService};
use shortly::config::{self, mask_connection_string};
use shortly::infrastructure::cache::{CacheService, NullCache, RedisCache};
use shortly::infrastructure::persistence::{PgClickRepository, PgUrlRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortly.
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
    /// Show system totals
    Stats,

    /// Inspect short URLs
    Urls {
        #[command(subcommand)]
        action: UrlsAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum UrlsAction {
    /// List short URLs, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove the cached mapping of a short code
    Evict {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(&config.database_url)
            )
        })?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Stats => handle_stats(pool).await?,
        Commands::Urls { action } => handle_urls_action(action, pool, &config).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Cache { action } => handle_cache_action(action, &config).await?,
    }

    Ok(())
}

/// Displays total URLs, total clicks and the average per URL.
async fn handle_stats(pool: Arc<PgPool>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let analytics = AnalyticsService::new(
        Arc::new(PgUrlRepository::new(pool.clone())),
        Arc::new(PgClickRepository::new(pool)),
    );

    let overview = analytics
        .overview()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  URLs:          {}",
        overview.total_urls.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        overview.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Avg per URL:   {}",
        format!("{:.2}", overview.avg_clicks_per_url)
            .bright_green()
            .bold()
    );
    println!();

    Ok(())
}

async fn handle_urls_action(
    action: UrlsAction,
    pool: Arc<PgPool>,
    config: &config::Config,
) -> Result<()> {
    let UrlsAction::List { page, limit } = action;

    if page == 0 || !(1..=100).contains(&limit) {
        anyhow::bail!("page must be >= 1 and limit between 1 and 100");
    }

    let service = UrlService::new(
        Arc::new(PgUrlRepository::new(pool)),
        Arc::new(NullCache::new()),
        config.base_url.clone(),
        config.cache_ttl_seconds,
    );

    let result = service
        .list(page, limit)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if result.records.is_empty() {
        println!("{}", "No short URLs found".yellow());
        return Ok(());
    }

    println!("{}", "Short URLs".bright_blue().bold());
    println!();
    println!(
        "  {:<22} {:<8} {:<17} {}",
        "CODE".bold(),
        "CLICKS".bold(),
        "CREATED".bold(),
        "DESTINATION".bold()
    );

    for record in &result.records {
        println!(
            "  {:<22} {:<8} {:<17} {}",
            record.short_code.cyan(),
            record.click_count.to_string().bright_white(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record.original_url
        );
    }

    println!();
    println!(
        "  Page {} of {}, {} total",
        page,
        (result.total + i64::from(limit) - 1) / i64::from(limit),
        result.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

/// Evicts a cache entry after confirmation.
///
/// The store is untouched; the next redirect of the code repopulates the cache.
async fn handle_cache_action(action: CacheAction, config: &config::Config) -> Result<()> {
    let CacheAction::Evict { code, yes } = action;

    let redis_url = config
        .redis_url
        .as_deref()
        .context("REDIS_URL or REDIS_HOST must be set for cache commands")?;

    let cache = RedisCache::connect(redis_url, config.cache_ttl_seconds)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    match cache.get_url(&code).await {
        Ok(Some(entry)) => {
            println!("  Code:        {}", code.cyan());
            println!("  Destination: {}", entry.original_url);
            println!(
                "  Clicks:      {} (cached snapshot)",
                entry.click_count.to_string().bright_black()
            );
            println!();
        }
        Ok(None) => {
            println!("{}", format!("'{}' is not cached", code).yellow());
            return Ok(());
        }
        Err(e) => anyhow::bail!("Cache error: {}", e),
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Evict this entry?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    cache
        .invalidate(&code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to evict: {}", e))?;

    println!("{}", "Cache entry evicted".green().bold());
    Ok(())
}
