/// Version injected at compile time via ORGSTREAM_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("ORGSTREAM_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::Either;
use futures::TryStreamExt;
use orgstream::config::Config;
use orgstream::github::{HttpTransport, OrgClient};
use orgstream::stream::{self, BatchStreamer, SqliteStore};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Ages above this cutoff count as "older" in the report
const REPORT_AGE_CUTOFF: i64 = 40;

/// GitHub org inspector and batched user streamer
#[derive(Parser, Debug)]
#[command(name = "orgstream", version = VERSION, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show organization metadata as pretty JSON
    Org {
        /// Organization name (falls back to the configured default)
        org: Option<String>,

        /// GitHub API base URL override
        #[arg(long)]
        base_url: Option<String>,
    },
    /// List public repository names for an organization
    Repos {
        /// Organization name (falls back to the configured default)
        org: Option<String>,

        /// Only list repos under this license key (e.g. "apache-2.0")
        #[arg(long)]
        license: Option<String>,

        /// GitHub API base URL override
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Create the users table and seed it with sample rows
    Seed {
        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Stream users from the database in batches
    Stream {
        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Rows fetched per batch
        #[arg(long)]
        batch_size: Option<usize>,

        /// Only show users strictly older than this age
        #[arg(long)]
        min_age: Option<i64>,
    },
    /// Compute the average age across all users
    AverageAge {
        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Rows fetched per batch
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Fetch all users and users older than 40, concurrently
    Report {
        /// Database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Rows fetched per batch
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return None;
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("orgstream started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("orgstream").join("orgstream.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".orgstream").join("orgstream.log");
    }
    PathBuf::from("orgstream.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();

    match args.command {
        Command::Org { org, base_url } => {
            let client = build_client(org, base_url, &mut config)?;
            cmd_org(&client).await
        }
        Command::Repos {
            org,
            license,
            base_url,
        } => {
            let client = build_client(org, base_url, &mut config)?;
            cmd_repos(&client, license.as_deref()).await
        }
        Command::Seed { db } => {
            let path = db.unwrap_or_else(|| config.effective_database());
            let count = seed_database(&path)?;
            println!("Seeded {} users into {}", count, path.display());
            Ok(())
        }
        Command::Stream {
            db,
            batch_size,
            min_age,
        } => {
            let store = open_store(db, &config);
            let batch_size = batch_size.unwrap_or_else(|| config.effective_batch_size());
            cmd_stream(store, batch_size, min_age).await
        }
        Command::AverageAge { db, batch_size } => {
            let store = open_store(db, &config);
            let batch_size = batch_size.unwrap_or_else(|| config.effective_batch_size());
            cmd_average_age(store, batch_size).await
        }
        Command::Report { db, batch_size } => {
            let store = open_store(db, &config);
            let batch_size = batch_size.unwrap_or_else(|| config.effective_batch_size());
            cmd_report(store, batch_size).await
        }
    }
}

/// Resolve the org name and base URL (CLI > config > default) and build a client
fn build_client(
    org: Option<String>,
    base_url: Option<String>,
    config: &mut Config,
) -> Result<OrgClient> {
    let remember = org.is_some();
    let org = org.or_else(|| config.default_org.clone()).ok_or_else(|| {
        anyhow::anyhow!("No organization given. Pass one or set default_org in the config file")
    })?;

    if remember {
        if let Err(e) = config.set_default_org(&org) {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    let base_url = base_url.unwrap_or_else(|| config.effective_base_url());
    tracing::info!("Using org: {}, base URL: {}", org, base_url);

    Ok(OrgClient::with_base_url(&org, &base_url, HttpTransport::new()?))
}

fn open_store(db: Option<PathBuf>, config: &Config) -> SqliteStore {
    let path = db.unwrap_or_else(|| config.effective_database());
    SqliteStore::new(path)
}

async fn cmd_org(client: &OrgClient) -> Result<()> {
    let org = client.org().await?;
    println!("{}", serde_json::to_string_pretty(&org)?);
    Ok(())
}

async fn cmd_repos(client: &OrgClient, license: Option<&str>) -> Result<()> {
    let names = client.public_repos(license).await?;

    if names.is_empty() {
        println!("No repositories found");
        return Ok(());
    }

    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Create the users table and insert the sample rows, replacing existing data
fn seed_database(path: &Path) -> Result<usize> {
    let conn = rusqlite::Connection::open(path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            age INTEGER NOT NULL
        );
        DELETE FROM users;",
    )?;

    let users: [(&str, i64); 7] = [
        ("Alice", 30),
        ("Bob", 24),
        ("Charlie", 35),
        ("David", 42),
        ("Eve", 22),
        ("Frank", 50),
        ("Grace", 45),
    ];

    let mut stmt =
        conn.prepare("INSERT INTO users (id, name, email, age) VALUES (?1, ?2, ?3, ?4)")?;
    for (i, (name, age)) in users.iter().enumerate() {
        stmt.execute(rusqlite::params![
            i as i64 + 1,
            name,
            format!("{}@example.com", name.to_lowercase()),
            age,
        ])?;
    }

    tracing::info!("Seeded {} users into {:?}", users.len(), path);
    Ok(users.len())
}

async fn cmd_stream(store: SqliteStore, batch_size: usize, min_age: Option<i64>) -> Result<()> {
    let streamer = BatchStreamer::new(store, batch_size);

    let rows = match min_age {
        Some(age) => Either::Left(streamer.stream_filtered(move |row| row.age > age)),
        None => Either::Right(streamer.into_stream()),
    };
    futures::pin_mut!(rows);

    let mut shown = 0usize;
    while let Some(row) = rows.try_next().await? {
        println!("{}\t{}\t{}\t{}", row.id, row.name, row.email, row.age);
        shown += 1;
    }

    if shown == 0 {
        println!("No users found");
    }
    Ok(())
}

async fn cmd_average_age(store: SqliteStore, batch_size: usize) -> Result<()> {
    let streamer = BatchStreamer::new(store, batch_size);

    match streamer.running_average(|row| row.age as f64).await? {
        Some(average) => println!("Average age of users: {average:.2}"),
        None => println!("No user data available."),
    }
    Ok(())
}

async fn cmd_report(store: SqliteStore, batch_size: usize) -> Result<()> {
    let (all, older) =
        stream::fetch_all_and_matching(&store, batch_size, |row| row.age > REPORT_AGE_CUTOFF)
            .await?;

    println!("Users: {}", all.len());
    println!("Older than {}: {}", REPORT_AGE_CUTOFF, older.len());
    for row in &older {
        println!("  {} ({})", row.name, row.age);
    }
    Ok(())
}
