use std::fmt;

use chrono::{DateTime, Utc};
use realm_core::Clock;
use realm_core::model::{GameMode, ObstacleType, Role, UserId, WordDraft};
use storage::repository::{ContentStore, ProfileRepository};
use storage::sqlite::SqliteRepository;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    admin: Option<UserId>,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidAdmin { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAdmin { raw } => {
                write!(f, "invalid --admin value (expected a UUID): {raw}")
            }
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("REALM_DB_URL")
            .unwrap_or_else(|_| "sqlite:realm.sqlite3?mode=rwc".into());
        let mut admin = std::env::var("REALM_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--admin" => {
                    let value = require_value(&mut args, "--admin")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidAdmin { raw: value.clone() })?;
                    admin = Some(parsed);
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, admin, now })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:realm.sqlite3?mode=rwc)");
    eprintln!("  --admin <uuid>            Grant this user the admin role");
    eprintln!("  --now <rfc3339>           Fixed creation time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  REALM_DB_URL, REALM_USER_ID");
}

fn sample_drafts() -> Vec<(GameMode, WordDraft)> {
    vec![
        (
            GameMode::Wordsmith,
            WordDraft::new("unhelpful", "Not providing help").with_components("un, help, ful"),
        ),
        (
            GameMode::Wordsmith,
            WordDraft::new("replaying", "Playing again").with_components("re, play, ing"),
        ),
        (
            GameMode::Forest,
            WordDraft::new("thicket", "A dense group of bushes")
                .with_obstacle(ObstacleType::Tree),
        ),
        (
            GameMode::Forest,
            WordDraft::new("snare", "A trap for catching animals")
                .with_obstacle(ObstacleType::Trap),
        ),
        (
            GameMode::Forest,
            WordDraft::new("elixir", "A magical potion").with_obstacle(ObstacleType::Powerup),
        ),
        (
            GameMode::Tower,
            WordDraft::new("ephemeral", "Lasting for a very short time").with_tower(
                1,
                &["temporary", "eternal", "solid", "ancient"],
                "temporary",
            ),
        ),
        (
            GameMode::Tower,
            WordDraft::new("ubiquitous", "Present everywhere").with_tower(
                2,
                &["rare", "omnipresent", "hidden", "scarce"],
                "omnipresent",
            ),
        ),
        (
            GameMode::Tower,
            WordDraft::new("surreptitious", "Kept secret").with_tower(
                3,
                &["obvious", "loud", "stealthy", "honest"],
                "stealthy",
            ),
        ),
    ]
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;
    if let Some(now) = args.now {
        repo = repo.with_clock(Clock::fixed(now));
    }

    let drafts = sample_drafts();
    for (mode, draft) in &drafts {
        let record = draft.validate(*mode)?;
        repo.insert(record).await?;
    }

    if let Some(admin) = args.admin {
        repo.set_role(admin, Role::Admin).await?;
        println!("Granted admin role to {admin}");
    }

    println!("Seeded {} word records into {}", drafts.len(), args.db_url);

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
