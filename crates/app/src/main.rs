use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use realm_core::error::Error as ValueError;
use realm_core::model::{GameMode, ObstacleType, RecordId, Role, UserId, WordDraft};
use services::challenge::Land;
use services::{AppServices, BackendConfig};
use tracing_subscriber::EnvFilter;

mod admin;
mod play;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingCommand,
    UnknownCommand(String),
    MissingOperand { what: &'static str },
    InvalidDbUrl { raw: String },
    InvalidSeed { raw: String },
    InvalidFloor { raw: String },
    InvalidLand { raw: String },
    InvalidPlayMode { raw: String },
    Value(ValueError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingCommand => write!(f, "missing command"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingOperand { what } => write!(f, "missing {what}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidFloor { raw } => write!(f, "invalid --floor value: {raw}"),
            ArgsError::InvalidLand { raw } => {
                write!(f, "invalid --land value (science, literature, history): {raw}")
            }
            ArgsError::InvalidPlayMode { raw } => write!(f, "unknown game: {raw}"),
            ArgsError::Value(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn invalid(err: impl Into<ValueError>) -> ArgsError {
    ArgsError::Value(err.into())
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Games playable from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Wordsmith,
    Forest,
    Tower,
    Clash,
    Quest,
}

impl FromStr for PlayMode {
    type Err = ArgsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clash" => Ok(PlayMode::Clash),
            "quest" => Ok(PlayMode::Quest),
            other => match other.parse::<GameMode>() {
                Ok(GameMode::Wordsmith) => Ok(PlayMode::Wordsmith),
                Ok(GameMode::Forest) => Ok(PlayMode::Forest),
                Ok(GameMode::Tower) => Ok(PlayMode::Tower),
                Err(_) => Err(ArgsError::InvalidPlayMode { raw: s.to_string() }),
            },
        }
    }
}

fn parse_land(raw: &str) -> Result<Land, ArgsError> {
    match raw.to_ascii_lowercase().as_str() {
        "science" => Ok(Land::Science),
        "literature" => Ok(Land::Literature),
        "history" => Ok(Land::History),
        _ => Err(ArgsError::InvalidLand {
            raw: raw.to_string(),
        }),
    }
}

/// Options for a terminal game.
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub mode: PlayMode,
    pub seed: Option<u64>,
    pub words: Option<PathBuf>,
    pub land: Land,
}

#[derive(Debug, Clone)]
enum Command {
    Play(PlayOptions),
    AdminList { mode: GameMode, json: bool },
    AdminAdd { mode: GameMode, draft: WordDraft },
    AdminDelete { id: RecordId },
    AdminGrant { user: UserId, role: Role },
}

#[derive(Debug, Default)]
struct Args {
    positionals: Vec<String>,
    db_url: Option<String>,
    user: Option<UserId>,
    seed: Option<u64>,
    words: Option<PathBuf>,
    land: Option<Land>,
    json: bool,
    word: Option<String>,
    definition: Option<String>,
    components: Option<String>,
    obstacle: Option<ObstacleType>,
    floor: Option<u32>,
    options: Vec<String>,
    correct: Option<String>,
    role: Option<Role>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Args::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = Some(value);
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    parsed.user = Some(value.parse().map_err(invalid)?);
                }
                "--seed" => {
                    let value = require_value(&mut args, "--seed")?;
                    let seed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    parsed.seed = Some(seed);
                }
                "--words" => {
                    parsed.words = Some(require_value(&mut args, "--words")?.into());
                }
                "--land" => {
                    parsed.land = Some(parse_land(&require_value(&mut args, "--land")?)?);
                }
                "--json" => parsed.json = true,
                "--word" => parsed.word = Some(require_value(&mut args, "--word")?),
                "--definition" => {
                    parsed.definition = Some(require_value(&mut args, "--definition")?);
                }
                "--components" => {
                    parsed.components = Some(require_value(&mut args, "--components")?);
                }
                "--obstacle" => {
                    let value = require_value(&mut args, "--obstacle")?;
                    parsed.obstacle = Some(value.parse().map_err(invalid)?);
                }
                "--floor" => {
                    let value = require_value(&mut args, "--floor")?;
                    let floor = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidFloor { raw: value.clone() })?;
                    parsed.floor = Some(floor);
                }
                "--option" => parsed.options.push(require_value(&mut args, "--option")?),
                "--correct" => parsed.correct = Some(require_value(&mut args, "--correct")?),
                "--role" => {
                    let value = require_value(&mut args, "--role")?;
                    parsed.role = Some(value.parse().map_err(invalid)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => parsed.positionals.push(arg),
            }
        }

        Ok(parsed)
    }

    fn operand(&self, index: usize, what: &'static str) -> Result<&str, ArgsError> {
        self.positionals
            .get(index)
            .map(String::as_str)
            .ok_or(ArgsError::MissingOperand { what })
    }

    fn game_mode(&self, index: usize) -> Result<GameMode, ArgsError> {
        self.operand(index, "game mode")?
            .parse()
            .map_err(invalid)
    }

    fn command(&self) -> Result<Command, ArgsError> {
        match self.operand(0, "command").map_err(|_| ArgsError::MissingCommand)? {
            "play" => Ok(Command::Play(PlayOptions {
                mode: self.operand(1, "game")?.parse()?,
                seed: self.seed,
                words: self.words.clone(),
                land: self.land.unwrap_or(Land::Science),
            })),
            "admin" => match self.operand(1, "admin command")? {
                "list" => Ok(Command::AdminList {
                    mode: self.game_mode(2)?,
                    json: self.json,
                }),
                "add" => Ok(Command::AdminAdd {
                    mode: self.game_mode(2)?,
                    draft: self.draft(),
                }),
                "delete" => Ok(Command::AdminDelete {
                    id: self.operand(2, "record id")?.parse().map_err(invalid)?,
                }),
                "grant" => Ok(Command::AdminGrant {
                    user: self.operand(2, "user id")?.parse().map_err(invalid)?,
                    role: self.role.unwrap_or(Role::Admin),
                }),
                other => Err(ArgsError::UnknownCommand(format!("admin {other}"))),
            },
            other => Err(ArgsError::UnknownCommand(other.to_string())),
        }
    }

    /// Form input exactly as typed; validation happens in the admin service.
    fn draft(&self) -> WordDraft {
        let mut draft = WordDraft::new(
            self.word.clone().unwrap_or_default(),
            self.definition.clone().unwrap_or_default(),
        );
        if let Some(components) = &self.components {
            draft.set_components_from_input(components);
        }
        draft.obstacle_type = self.obstacle;
        draft.floor_number = self.floor;
        if !self.options.is_empty() {
            draft.options = self.options.clone();
        }
        draft.correct_answer = self.correct.clone();
        draft
    }

    fn backend(&self) -> Result<BackendConfig, Box<dyn std::error::Error>> {
        let mut config = BackendConfig::from_env()?;
        if let Some(url) = &self.db_url {
            config = config.with_db_url(url.clone());
        }
        if let Some(user) = self.user {
            config = config.with_user(user);
        }
        if let BackendConfig::Sqlite { db_url, user } = config {
            let db_url = normalize_sqlite_url(db_url);
            prepare_sqlite_file(&db_url)?;
            config = BackendConfig::Sqlite { db_url, user };
        }
        Ok(config)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play <wordsmith|forest|tower|clash|quest> [options]");
    eprintln!("  cargo run -p app -- admin list <mode> [--json]");
    eprintln!("  cargo run -p app -- admin add <mode> --word <w> --definition <d> [mode fields]");
    eprintln!("  cargo run -p app -- admin delete <record-id>");
    eprintln!("  cargo run -p app -- admin grant <user-id> [--role admin|user|admin_pending]");
    eprintln!();
    eprintln!("Play options:");
    eprintln!("  --seed <n>                Deterministic shuffles and spawns");
    eprintln!("  --words <file.json>       Extra records, as printed by `admin list --json`");
    eprintln!("  --land <name>             Quest land: science, literature, history");
    eprintln!();
    eprintln!("Admin fields:");
    eprintln!("  wordsmith: --components \"un, help, ful\"");
    eprintln!("  forest:    --obstacle <tree|trap|powerup|monster>");
    eprintln!("  tower:     --floor <1-100> --option <text> (repeat) --correct <text>");
    eprintln!();
    eprintln!("Backend options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:realm.sqlite3)");
    eprintln!("  --user <uuid>             Signed-in local user");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REALM_DB_URL, REALM_USER_ID, REALM_BACKEND_URL, REALM_BACKEND_KEY,");
    eprintln!("  REALM_ACCESS_TOKEN, RUST_LOG");
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1)).and_then(|args| {
        let command = args.command()?;
        Ok((args, command))
    });
    let (args, command) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            print_usage();
            return Err(e.into());
        }
    };

    if let Command::Play(options) = &command {
        return play::run(options);
    }

    let services = AppServices::from_config(args.backend()?).await?;
    let admin = services.admin();
    match command {
        Command::Play(_) => Ok(()),
        Command::AdminList { mode, json } => admin::list(&admin, mode, json).await,
        Command::AdminAdd { mode, draft } => admin::add(services.admin_panel(), mode, draft).await,
        Command::AdminDelete { id } => admin::delete(services.admin_panel(), id).await,
        Command::AdminGrant { user, role } => admin::grant(&admin, user, role).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, ArgsError> {
        Args::parse(args.iter().map(|a| (*a).to_string()))?.command()
    }

    #[test]
    fn play_takes_mode_and_seed() {
        let Command::Play(options) = parse(&["play", "Tower", "--seed", "7"]).unwrap() else {
            panic!("expected play");
        };
        assert_eq!(options.mode, PlayMode::Tower);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.land, Land::Science);

        assert!(matches!(
            parse(&["play", "chess"]),
            Err(ArgsError::InvalidPlayMode { .. })
        ));
    }

    #[test]
    fn admin_add_builds_a_raw_draft() {
        let command = parse(&[
            "admin",
            "add",
            "tower",
            "--word",
            "ephemeral",
            "--definition",
            "short-lived",
            "--floor",
            "3",
            "--option",
            "temporary",
            "--option",
            "eternal",
            "--correct",
            "temporary",
        ])
        .unwrap();
        let Command::AdminAdd { mode, draft } = command else {
            panic!("expected admin add");
        };
        assert_eq!(mode, GameMode::Tower);
        assert_eq!(draft.floor_number, Some(3));
        assert_eq!(draft.options, vec!["temporary", "eternal"]);
        assert!(draft.validate(mode).is_ok());
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(parse(&[]), Err(ArgsError::MissingCommand)));
        assert!(matches!(
            parse(&["admin", "list"]),
            Err(ArgsError::MissingOperand { what: "game mode" })
        ));
        assert!(matches!(
            parse(&["admin", "delete", "nope"]),
            Err(ArgsError::Value(ValueError::Id(_)))
        ));
        assert!(matches!(
            parse(&["play", "tower", "--turbo"]),
            Err(ArgsError::UnknownArg(_))
        ));
    }
}
