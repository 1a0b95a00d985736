//! CLI administration tool for pharmacy-api.
//!
//! Provides commands for seeding accounts, load testing a running instance
//! and database diagnostics without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create the first pharmacy and its admin
//! cargo run --bin admin -- seed admin --email admin@pharmacy.test
//!
//! # Fire 500 order requests, 20 at a time
//! cargo run --bin admin -- bench --requests 500 --concurrency 20 --product-id 1
//!
//! # Log in and place one order
//! cargo run --bin admin -- smoke --product-id 1
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required for `seed` and `db`): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `seed`): must match the server's, since
//!   password hashes are keyed by it
//! - `ADMIN_EMAIL`, `ADMIN_PASSWORD`, `ADMIN_NAME`, `ADMIN_PHARMACY_NAME`:
//!   defaults for `seed admin` and the HTTP commands
//! - `API_BASE_URL`: server root for `bench` and `smoke` (default: `http://localhost:3000`)

use pharmacy_api::application::services::{GeoService, PharmacyService, StaffRegistration, StaffService};
use pharmacy_api::config::Config;
use pharmacy_api::domain::entities::{NewPharmacy, StaffRole};
use pharmacy_api::infrastructure::cache::CacheService;
use pharmacy_api::infrastructure::persistence::{PgPharmacyRepository, PgStaffRepository};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};
use futures::future::join_all;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// CLI tool for managing pharmacy-api.
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
    /// Seed initial data
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },

    /// Load test order creation against a running server
    Bench(BenchArgs),

    /// Log in and place a single order against a running server
    Smoke(SmokeArgs),

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Seeding subcommands.
#[derive(Subcommand)]
enum SeedAction {
    /// Create a pharmacy (if new) and an admin account
    Admin {
        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,

        /// Prompted for when not provided
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long, env = "ADMIN_NAME", default_value = "Administrator")]
        name: String,

        #[arg(long, env = "ADMIN_PHARMACY_NAME", default_value = "Main Pharmacy")]
        pharmacy_name: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Credentials and target shared by the HTTP commands.
#[derive(Args, Clone)]
struct ApiArgs {
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    #[arg(long, env = "ADMIN_EMAIL")]
    email: String,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
struct BenchArgs {
    #[command(flatten)]
    api: ApiArgs,

    /// Total number of order requests
    #[arg(short = 'n', long, default_value_t = 100)]
    requests: usize,

    /// Requests in flight at once
    #[arg(short, long, default_value_t = 10)]
    concurrency: usize,

    /// Product every order contains
    #[arg(long)]
    product_id: i64,

    #[arg(long, default_value_t = 1)]
    quantity: i32,
}

#[derive(Args)]
struct SmokeArgs {
    #[command(flatten)]
    api: ApiArgs,

    #[arg(long)]
    product_id: i64,

    #[arg(long, default_value_t = 1)]
    quantity: i32,

    #[arg(long)]
    customer_id: Option<i64>,
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
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { action } => handle_seed_action(action, &connect().await?).await?,
        Commands::Bench(args) => run_bench(args).await?,
        Commands::Smoke(args) => run_smoke(args).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches seeding commands.
async fn handle_seed_action(action: SeedAction, pool: &PgPool) -> Result<()> {
    match action {
        SeedAction::Admin {
            email,
            password,
            name,
            pharmacy_name,
            yes,
        } => seed_admin(pool, email, password, name, pharmacy_name, yes).await,
    }
}

/// Creates the pharmacy and its admin account.
///
/// Idempotent: an existing pharmacy is reused, and an email that is already
/// registered is reported instead of duplicated.
async fn seed_admin(
    pool: &PgPool,
    email: String,
    password: Option<String>,
    name: String,
    pharmacy_name: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🌱 Seed Admin Account".bright_blue().bold());
    println!();

    let signing_secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let pool = Arc::new(pool.clone());
    let pharmacy_service = PharmacyService::new(
        Arc::new(PgPharmacyRepository::new(pool.clone())),
        CacheService::disabled(),
        GeoService::disabled(),
    );
    let staff_service = StaffService::new(Arc::new(PgStaffRepository::new(pool)), signing_secret);

    let email = email.trim().to_lowercase();
    if let Some(existing) = staff_service.find_by_email(&email).await? {
        println!(
            "{}",
            format!(
                "⚠️  {} is already registered (staff #{}, pharmacy #{})",
                existing.email, existing.id, existing.pharmacy_id
            )
            .yellow()
        );
        return Ok(());
    }

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Admin password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let existing_pharmacy = pharmacy_service.find_by_name(&pharmacy_name).await?;

    println!("{}", "Account details:".bright_white().bold());
    println!("  Email:    {}", email.cyan());
    println!("  Name:     {}", name.cyan());
    match &existing_pharmacy {
        Some(pharmacy) => println!(
            "  Pharmacy: {} {}",
            pharmacy.name.cyan(),
            format!("(existing, #{})", pharmacy.id).bright_black()
        ),
        None => println!("  Pharmacy: {} {}", pharmacy_name.cyan(), "(new)".green()),
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let pharmacy = match existing_pharmacy {
        Some(pharmacy) => pharmacy,
        None => {
            pharmacy_service
                .create(NewPharmacy {
                    name: pharmacy_name,
                    ..Default::default()
                })
                .await?
        }
    };

    let staff = staff_service
        .register(
            pharmacy.id,
            StaffRegistration {
                email,
                name,
                role: StaffRole::Admin,
                password,
            },
        )
        .await?;

    println!();
    println!("{}", "✅ Admin created successfully!".green().bold());
    println!();
    println!("  Staff ID:    {}", staff.id.to_string().bright_white());
    println!("  Pharmacy ID: {}", pharmacy.id.to_string().bright_white());
    println!();
    println!("{}", "Log in with:".bright_white());
    println!(
        "  curl -X POST -H 'Content-Type: application/json' \\\n    -d '{{\"email\":\"{}\",\"password\":\"...\"}}' http://localhost:3000/api/auth/login",
        staff.email.bright_yellow()
    );
    println!();

    Ok(())
}

/// Logs in over HTTP and returns the bearer token.
async fn login(http: &reqwest::Client, api: &ApiArgs) -> Result<String> {
    let response = http
        .post(format!("{}/api/auth/login", api.base_url.trim_end_matches('/')))
        .json(&json!({ "email": api.email, "password": api.password }))
        .send()
        .await
        .context("Login request failed")?;

    let status = response.status();
    let body: Value = response.json().await.context("Login response is not JSON")?;
    if !status.is_success() {
        bail!("Login failed with {status}: {body}");
    }

    body["token"]
        .as_str()
        .map(str::to_string)
        .context("Login response has no token")
}

fn order_body(product_id: i64, quantity: i32, customer_id: Option<i64>) -> Value {
    json!({
        "customer_id": customer_id,
        "items": [{ "product_id": product_id, "quantity": quantity }],
    })
}

/// Latency summary of a benchmark run.
#[derive(Debug, PartialEq)]
struct LatencyStats {
    min: Duration,
    avg: Duration,
    p50: Duration,
    p95: Duration,
    max: Duration,
}

impl LatencyStats {
    /// Nearest-rank percentiles. Returns `None` for an empty sample.
    fn from_samples(mut samples: Vec<Duration>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        samples.sort_unstable();

        let percentile = |p: usize| {
            let rank = (p * samples.len()).div_ceil(100).max(1);
            samples[rank - 1]
        };
        let total: Duration = samples.iter().sum();

        Some(Self {
            min: samples[0],
            avg: total / samples.len() as u32,
            p50: percentile(50),
            p95: percentile(95),
            max: samples[samples.len() - 1],
        })
    }
}

/// Fires `requests` order creations with at most `concurrency` in flight.
async fn run_bench(args: BenchArgs) -> Result<()> {
    println!("{}", "⏱️  Order Benchmark".bright_blue().bold());
    println!();

    if args.requests == 0 || args.concurrency == 0 {
        bail!("--requests and --concurrency must be greater than 0");
    }

    let http = reqwest::Client::new();
    let token = login(&http, &args.api).await?;
    let url = format!("{}/api/orders", args.api.base_url.trim_end_matches('/'));
    let body = order_body(args.product_id, args.quantity, None);

    println!(
        "  Requests: {}  Concurrency: {}  Target: {}",
        args.requests.to_string().bright_white(),
        args.concurrency.to_string().bright_white(),
        url.cyan()
    );
    println!();

    let semaphore = Arc::new(Semaphore::new(args.concurrency));
    let started = Instant::now();
    let mut tasks = Vec::with_capacity(args.requests);

    for _ in 0..args.requests {
        let permit = semaphore.clone().acquire_owned().await?;
        let request = http.post(&url).bearer_auth(&token).json(&body);

        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            let sent = Instant::now();
            let ok = match request.send().await {
                Ok(response) => response.status().is_success(),
                Err(_) => false,
            };
            (ok, sent.elapsed())
        }));
    }

    let mut latencies = Vec::with_capacity(args.requests);
    let mut succeeded = 0usize;
    for result in join_all(tasks).await {
        let (ok, latency) = result?;
        if ok {
            succeeded += 1;
        }
        latencies.push(latency);
    }
    let elapsed = started.elapsed();
    let failed = args.requests - succeeded;

    println!("  Succeeded: {}", succeeded.to_string().green().bold());
    println!(
        "  Failed:    {}",
        if failed == 0 {
            failed.to_string().green().bold()
        } else {
            failed.to_string().red().bold()
        }
    );
    println!(
        "  Elapsed:   {:.2}s ({:.1} req/s)",
        elapsed.as_secs_f64(),
        args.requests as f64 / elapsed.as_secs_f64()
    );

    if let Some(stats) = LatencyStats::from_samples(latencies) {
        println!();
        println!("{}", "Latency:".bright_white().bold());
        println!("  min {:>8.1?}", stats.min);
        println!("  avg {:>8.1?}", stats.avg);
        println!("  p50 {:>8.1?}", stats.p50);
        println!("  p95 {:>8.1?}", stats.p95);
        println!("  max {:>8.1?}", stats.max);
    }
    println!();

    Ok(())
}

/// End-to-end check: log in, place one order, print the response.
async fn run_smoke(args: SmokeArgs) -> Result<()> {
    println!("{}", "🔥 Smoke Test".bright_blue().bold());
    println!();

    let http = reqwest::Client::new();
    let token = login(&http, &args.api).await?;
    println!("{}", "✅ Logged in".green());

    let response = http
        .post(format!("{}/api/orders", args.api.base_url.trim_end_matches('/')))
        .bearer_auth(&token)
        .json(&order_body(args.product_id, args.quantity, args.customer_id))
        .send()
        .await
        .context("Order request failed")?;

    let status = response.status();
    let body: Value = response.json().await.context("Order response is not JSON")?;

    println!("  Status: {}", status.to_string().bright_white());
    println!("{}", serde_json::to_string_pretty(&body)?);
    println!();

    if !status.is_success() {
        bail!("Order creation failed with {status}");
    }

    println!("{}", "✅ Order placed".green().bold());
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

            println!("  PostgreSQL: {}", version.bright_white());

            for (label, table) in [
                ("Pharmacies", "pharmacies"),
                ("Staff", "staff"),
                ("Products", "products"),
                ("Customers", "customers"),
                ("Orders", "orders"),
            ] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await?;
                println!("  {:<11} {}", format!("{label}:"), count.to_string().bright_green());
            }
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_millis).collect()
    }

    #[test]
    fn test_latency_stats() {
        let stats = LatencyStats::from_samples(ms(&[50, 10, 40, 20, 30])).unwrap();

        assert_eq!(stats.min, Duration::from_millis(10));
        assert_eq!(stats.max, Duration::from_millis(50));
        assert_eq!(stats.avg, Duration::from_millis(30));
        assert_eq!(stats.p50, Duration::from_millis(30));
        assert_eq!(stats.p95, Duration::from_millis(50));
    }

    #[test]
    fn test_latency_stats_single_and_empty() {
        let stats = LatencyStats::from_samples(ms(&[7])).unwrap();
        assert_eq!(stats.p50, Duration::from_millis(7));
        assert_eq!(stats.p95, Duration::from_millis(7));

        assert!(LatencyStats::from_samples(Vec::new()).is_none());
    }

    #[test]
    fn test_order_body() {
        let body = order_body(3, 2, None);
        assert_eq!(body["items"][0]["product_id"], 3);
        assert_eq!(body["items"][0]["quantity"], 2);
        assert!(body["customer_id"].is_null());
    }
}
