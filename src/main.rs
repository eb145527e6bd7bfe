// Stay Analytics - CLI
//
//   stay-analytics seed [--today YYYY-MM-DD]
//   stay-analytics report [--json]
//   stay-analytics available --from YYYY-MM-DD --to YYYY-MM-DD
//   stay-analytics validate

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use stay_analytics::analytics::load;
use stay_analytics::telemetry::init_tracing;
use stay_analytics::{seed_database, Analytics, AnalyticsReport, AppConfig, Listing, SqliteStore};

#[derive(Parser)]
#[command(name = "stay-analytics", version, about = "Short-term rental marketplace analytics")]
struct Cli {
    /// SQLite database (overrides STAY_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the demo marketplace into the database
    Seed {
        /// Reference day for stay dates (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print every marketplace-wide aggregation
    Report {
        #[arg(long)]
        json: bool,
    },
    /// Listings with no reservation in [from, to)
    Available {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Check foreign keys, stay dates and ratings
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }
    init_tracing(&config.log_filter)?;

    match cli.command {
        Command::Seed { today } => run_seed(&config, today)?,
        Command::Report { json } => run_report(&config, json)?,
        Command::Available { from, to } => run_available(&config, from, to)?,
        Command::Validate => run_validate(&config)?,
    }

    Ok(())
}

fn open_store(config: &AppConfig) -> Result<SqliteStore> {
    let store = if config.is_in_memory() {
        SqliteStore::open_in_memory()?
    } else {
        SqliteStore::open(Path::new(&config.database_path))
            .with_context(|| format!("Failed to open database {}", config.database_path))?
    };
    Ok(store)
}

fn run_seed(config: &AppConfig, today: Option<NaiveDate>) -> Result<()> {
    println!("🌱 Seeding demo marketplace");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let db_path = config.persistent_database_path()?;
    let mut store = SqliteStore::open(Path::new(db_path))
        .with_context(|| format!("Failed to open database {}", db_path))?;

    println!("\n💾 Writing rows relative to {}...", today);
    let written =
        seed_database(store.connection_mut(), today).context("Failed to seed database")?;
    println!("✓ Wrote {} rows to {}", written, db_path);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Seeding complete!");
    Ok(())
}

fn run_report(config: &AppConfig, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let snapshot = load(&store).context("Failed to load snapshot")?;
    let analytics = Analytics::new(&snapshot)?;
    let report = AnalyticsReport::build(&analytics)?;

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("📊 Marketplace Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let c = &report.counts;
    println!(
        "{} cities · {} neighborhoods · {} users · {} listings · {} reservations · {} reviews",
        c.cities, c.neighborhoods, c.users, c.listings, c.reservations, c.reviews
    );

    let name = |n: &Option<stay_analytics::report::Named>| {
        n.as_ref().map(|n| n.name.clone()).unwrap_or_else(|| "-".to_string())
    };

    println!("\n🏙️  Cities");
    println!("  Most reservations:  {}", name(&report.city_most_reservations));
    println!("  Highest rated:      {}", name(&report.city_highest_rated));
    println!("  Most listings:      {}", name(&report.city_most_listings));
    println!("  Biggest host:       {}", name(&report.city_biggest_host));

    println!("\n🏘️  Neighborhoods");
    println!("  Highest earner:     {}", name(&report.neighborhood_highest_earner));
    println!("  Most expensive:     {}", name(&report.neighborhood_most_expensive));

    println!("\n👤 Users");
    println!("  Top host:           {}", name(&report.top_host));
    println!("  Most traveled:      {}", name(&report.most_traveled));

    println!("\n💵 Top earners");
    for (rank, line) in report.top_earners.iter().enumerate() {
        println!("  {}. {} (${})", rank + 1, line.title, line.earnings);
    }
    println!("  Most expensive listing: {}", name(&report.most_expensive_listing));

    println!("\n⭐ Reviews (average {:.2})", report.average_rating);
    for (rating, count) in report.rating_histogram.iter().rev() {
        println!("  {} {:>3}", "★".repeat(usize::from(*rating)), count);
    }

    println!("\n🕒 Recent reservations: {:?}", report.most_recent_reservations);
    println!("🕒 Recent reviews:      {:?}", report.most_recent_reviews);
    Ok(())
}

fn run_available(config: &AppConfig, from: NaiveDate, to: NaiveDate) -> Result<()> {
    let store = open_store(config)?;
    let snapshot = load(&store).context("Failed to load snapshot")?;
    let analytics = Analytics::new(&snapshot)?;

    println!("🗓️  Listings free from {} to {}", from, to);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let available: Vec<&Listing> = analytics.available_between(from, to);
    for listing in &available {
        println!("  #{:<4} {:<36} ${}/night", listing.id, listing.title, listing.price);
    }
    println!("\n✓ {} of {} listings available", available.len(), snapshot.count::<Listing>());
    Ok(())
}

fn run_validate(config: &AppConfig) -> Result<()> {
    println!("🔍 Validating {}", config.database_path);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = open_store(config)?;
    let snapshot = load(&store).context("Failed to load snapshot")?;

    match snapshot.validate() {
        Ok(()) => {
            println!("✅ Snapshot is consistent");
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    }
}
