//! Admin command-line front end for the invitation guest list.
//!
//! # Responsibility
//! - Build one storage backend from configuration and pass it to services.
//! - Print results as JSON on stdout and failures on stderr.
//!
//! # Exit codes
//! - `0` success, `1` internal failure, `2` bad input, `3` not found.

use clap::{Parser, Subcommand, ValueEnum};
use invite_core::db::open_db;
use invite_core::model::now_epoch_ms;
use invite_core::{
    export_file_name, init_logging, logging_status, AdminLogin, AdminService, AppConfig, ConfigError,
    ErrorCategory, GuestRepository, GuestSearch, GuestbookService, InMemoryGuestRepository,
    NewAdmin, NewGuest, NewGuestbookMessage, PlusGuestInput, RecordId, RepoError, RsvpService,
    RsvpStatus, RsvpSubmission, ServiceError, SqliteGuestRepository, StorageBackend,
};
use log::info;
use serde::Serialize;
use serde_json::json;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Manage guests, RSVPs and the guestbook for the celebration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file (overrides INVITE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Use a throwaway in-memory store instead of SQLite
    #[arg(long, global = true, conflicts_with = "db")]
    memory: bool,

    /// Report the storage backend and file logging state on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the guest list
    #[command(subcommand)]
    Guest(GuestCommand),
    /// Look up an invitation by name
    Search { first_name: String, last_name: String },
    /// Record an RSVP answer for a guest
    Rsvp {
        guest_id: RecordId,
        #[arg(value_enum)]
        answer: Answer,
        /// Personal message for the hosts
        #[arg(short, long)]
        message: Option<String>,
        /// Plus-guest as `NAME` or `NAME:RELATIONSHIP`; repeatable
        #[arg(short, long = "plus", value_parser = parse_plus_guest)]
        plus: Vec<PlusGuestInput>,
    },
    /// Sign and moderate the guestbook
    #[command(subcommand)]
    Guestbook(GuestbookCommand),
    /// Admin credentials
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Show RSVP statistics
    Stats,
    /// Export the guest list as CSV
    Export {
        /// Output file or directory; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum GuestCommand {
    /// Invite a new guest
    Add {
        first_name: String,
        last_name: String,
        /// Free-text category, e.g. Family or Friend
        #[arg(short, long)]
        role: String,
        /// How many plus-guests this guest may bring
        #[arg(short, long, default_value_t = 0)]
        plus_guests: u32,
    },
    /// List every guest with plus-guests
    List,
    /// Remove a guest and their plus-guests
    Delete { id: RecordId },
}

#[derive(Subcommand, Debug)]
enum GuestbookCommand {
    /// Leave a message (hidden until approved)
    Sign {
        name: String,
        relationship: String,
        message: String,
    },
    /// List approved messages, or every message with --all
    List {
        #[arg(long)]
        all: bool,
    },
    Approve { id: RecordId },
    Delete { id: RecordId },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Create an admin credential
    Seed { username: String, password: String },
    /// Check a username/password pair
    Login { username: String, password: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Answer {
    Attending,
    #[value(name = "not_attending", alias = "not-attending")]
    NotAttending,
}

impl From<Answer> for RsvpStatus {
    fn from(value: Answer) -> Self {
        match value {
            Answer::Attending => RsvpStatus::Attending,
            Answer::NotAttending => RsvpStatus::NotAttending,
        }
    }
}

fn parse_plus_guest(value: &str) -> Result<PlusGuestInput, String> {
    let (name, relationship) = match value.split_once(':') {
        Some((name, relationship)) => (name, Some(relationship.to_string())),
        None => (value, None),
    };
    if name.trim().is_empty() {
        return Err("plus-guest name cannot be empty".to_string());
    }
    Ok(PlusGuestInput {
        name: name.to_string(),
        relationship,
    })
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(String),
    Repo(RepoError),
    Service(ServiceError),
    Io(io::Error),
    Json(serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Service(err) => match err.category() {
                ErrorCategory::BadRequest => ExitCode::from(2),
                ErrorCategory::NotFound => ExitCode::from(3),
                ErrorCategory::Internal => ExitCode::FAILURE,
            },
            Self::Config(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Logging(message) => write!(f, "logging: {message}"),
            Self::Repo(err) => write!(f, "storage: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<invite_core::db::DbError> for CliError {
    fn from(value: invite_core::db::DbError) -> Self {
        Self::Repo(value.into())
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AppConfig::from_env()?;
    if cli.memory {
        config.storage = StorageBackend::Memory;
    } else if let Some(path) = cli.db {
        config.storage = StorageBackend::Sqlite { path };
    }

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir).map_err(CliError::Logging)?;
    }
    if cli.verbose {
        report_startup(&config.storage);
    }

    match &config.storage {
        StorageBackend::Memory => {
            info!("event=cli_start module=cli backend=memory");
            let repo = InMemoryGuestRepository::new();
            execute(&repo, cli.command)
        }
        StorageBackend::Sqlite { path } => {
            info!("event=cli_start module=cli backend=sqlite");
            let conn = open_db(path)?;
            let repo = SqliteGuestRepository::try_new(&conn)?;
            execute(&repo, cli.command)
        }
    }
}

fn report_startup(storage: &StorageBackend) {
    match storage {
        StorageBackend::Memory => eprintln!("storage: memory (discarded on exit)"),
        StorageBackend::Sqlite { path } => eprintln!("storage: sqlite {}", path.display()),
    }
    match logging_status() {
        Some((level, dir)) => eprintln!("logging: {level} -> {}", dir.display()),
        None => eprintln!("logging: off (set INVITE_LOG_DIR to enable)"),
    }
}

fn execute(repo: &dyn GuestRepository, command: Command) -> Result<(), CliError> {
    match command {
        Command::Guest(command) => run_guest(repo, command),
        Command::Search {
            first_name,
            last_name,
        } => {
            let search = GuestSearch::new(first_name, last_name);
            print_json(&RsvpService::new(repo).search_guest(&search)?)
        }
        Command::Rsvp {
            guest_id,
            answer,
            message,
            plus,
        } => {
            let submission = RsvpSubmission {
                guest_id,
                rsvp_status: answer.into(),
                personal_message: message,
                plus_guests: plus,
            };
            let updated = RsvpService::new(repo).submit_rsvp(&submission)?;
            print_json(&updated)
        }
        Command::Guestbook(command) => run_guestbook(repo, command),
        Command::Admin(command) => run_admin(repo, command),
        Command::Stats => print_json(&AdminService::new(repo).statistics()?),
        Command::Export { out } => run_export(repo, out),
    }
}

fn run_guest(repo: &dyn GuestRepository, command: GuestCommand) -> Result<(), CliError> {
    let admin = AdminService::new(repo);
    match command {
        GuestCommand::Add {
            first_name,
            last_name,
            role,
            plus_guests,
        } => {
            let guest = NewGuest::new(first_name, last_name, role).with_plus_guests(plus_guests);
            print_json(&admin.create_guest(&guest)?)
        }
        GuestCommand::List => print_json(&admin.list_guests()?),
        GuestCommand::Delete { id } => {
            admin.delete_guest(id)?;
            print_json(&json!({ "message": "Guest deleted successfully" }))
        }
    }
}

fn run_guestbook(repo: &dyn GuestRepository, command: GuestbookCommand) -> Result<(), CliError> {
    let guestbook = GuestbookService::new(repo);
    match command {
        GuestbookCommand::Sign {
            name,
            relationship,
            message,
        } => {
            let created =
                guestbook.submit_message(&NewGuestbookMessage::new(name, relationship, message))?;
            print_json(&json!({ "message": "Message submitted for review", "id": created.id }))
        }
        GuestbookCommand::List { all } => {
            let messages = if all {
                guestbook.all_messages()?
            } else {
                guestbook.public_messages()?
            };
            print_json(&messages)
        }
        GuestbookCommand::Approve { id } => print_json(&guestbook.approve(id)?),
        GuestbookCommand::Delete { id } => {
            guestbook.delete(id)?;
            print_json(&json!({ "message": "Message deleted successfully" }))
        }
    }
}

fn run_admin(repo: &dyn GuestRepository, command: AdminCommand) -> Result<(), CliError> {
    let admin = AdminService::new(repo);
    match command {
        AdminCommand::Seed { username, password } => {
            print_json(&admin.seed_admin(&NewAdmin::new(username, password))?)
        }
        AdminCommand::Login { username, password } => {
            let authenticated = admin.verify_login(&AdminLogin::new(username, password))?;
            print_json(&json!({ "authenticated": authenticated }))
        }
    }
}

fn run_export(repo: &dyn GuestRepository, out: Option<PathBuf>) -> Result<(), CliError> {
    let admin = AdminService::new(repo);
    let Some(mut path) = out else {
        let stdout = io::stdout();
        admin.export_guests_csv(stdout.lock())?;
        return Ok(());
    };

    if path.is_dir() {
        path.push(export_file_name(now_epoch_ms()));
    }
    let mut writer = BufWriter::new(File::create(&path)?);
    let rows = admin.export_guests_csv(&mut writer)?;
    writer.flush()?;
    print_json(&json!({ "rows": rows, "path": path.display().to_string() }))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
