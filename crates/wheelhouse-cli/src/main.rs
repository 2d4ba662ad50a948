//! Wheelhouse - credential upgrade plans and qualifying ships for U.S.
//! merchant mariners.
//!
//! Fetches a mariner's records from the hosted backend (or an exported
//! snapshot), evaluates the path to their target credential and lists the
//! catalog ships that would build qualifying sea time.

mod render;

use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wheelhouse_core::api::{ApiError, BackendClient};
use wheelhouse_core::auth::CredentialStore;
use wheelhouse_core::config::Config;
use wheelhouse_core::models::{Ship, UserRecords};
use wheelhouse_core::snapshot::SnapshotStore;
use wheelhouse_core::{evaluate_career_path, CoreError, CredentialLevel, CredentialRules, ShipMatcher};

const USAGE: &str = "\
Usage: wheelhouse <command> [options]

Commands:
  evaluate   Progress toward your target credential
  ships      Ships that build qualifying sea time
  plan       Both reports
  export DIR Save your records and the ship catalog to DIR
  login      Store the backend API key in the system keychain
  logout     Remove the stored API key
  rules      Print the credential requirements in use

Options:
  --offline DIR   Read records from an exported snapshot
  --current CRED  Override the current credential (e.g. third_mate)
  --target CRED   Override the target credential (e.g. chief_mate)
  --limit N       Number of ships to list
";

/// Initialize logging to stderr and a daily log file in the cache directory.
/// The guard must live until exit so buffered lines are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    // RUST_LOG controls the level (e.g. RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file = Config::cache_dir()
        .ok()
        .map(|dir| dir.join("logs"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "wheelhouse.log")));

    let (file_layer, guard) = match file {
        Some((writer, guard)) => (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Evaluate,
    Ships,
    Plan,
    Export,
    Login,
    Logout,
    Rules,
    Help,
}

#[derive(Debug, Default)]
struct Options {
    offline: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    current: Option<CredentialLevel>,
    target: Option<CredentialLevel>,
    limit: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<(Command, Options)> {
    let mut iter = args.iter();
    let command = match iter.next().map(String::as_str) {
        None | Some("help") | Some("--help") | Some("-h") => Command::Help,
        Some("evaluate") => Command::Evaluate,
        Some("ships") => Command::Ships,
        Some("plan") => Command::Plan,
        Some("export") => Command::Export,
        Some("login") => Command::Login,
        Some("logout") => Command::Logout,
        Some("rules") => Command::Rules,
        Some(other) => bail!("Unknown command: {}", other),
    };

    let mut options = Options::default();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--offline" => options.offline = Some(PathBuf::from(value("--offline")?)),
            "--current" => options.current = Some(value("--current")?.parse()?),
            "--target" => options.target = Some(value("--target")?.parse()?),
            "--limit" => {
                let raw = value("--limit")?;
                options.limit = Some(
                    raw.parse()
                        .with_context(|| format!("--limit must be a whole number, got {}", raw))?,
                );
            }
            other if command == Command::Export && options.export_dir.is_none() && !other.starts_with("--") => {
                options.export_dir = Some(PathBuf::from(other));
            }
            other => bail!("Unexpected argument: {}", other),
        }
    }

    if command == Command::Export && options.export_dir.is_none() {
        bail!("export needs a target directory");
    }

    Ok((command, options))
}

fn connect(config: &Config) -> Result<BackendClient> {
    let url = config.backend_url()?;
    let mut client = BackendClient::new(url)?;
    match CredentialStore::resolve_api_key(url) {
        Some(key) => client.set_api_key(key),
        None => debug!("No API key available, sending anonymous requests"),
    }
    Ok(client)
}

fn snapshot_note(age: String, stale: bool) -> String {
    if stale {
        format!("snapshot exported {} (stale; run export again to refresh)", age)
    } else {
        format!("snapshot exported {}", age)
    }
}

/// The user's records plus a note on where they came from.
async fn load_records(config: &Config, options: &Options) -> Result<(UserRecords, Option<String>)> {
    match options.offline {
        Some(ref dir) => {
            let snapshot = SnapshotStore::open(dir)?
                .load_records()?
                .ok_or_else(|| anyhow!("No exported records in {}", dir.display()))?;
            let note = snapshot_note(snapshot.age_display(), snapshot.is_stale());
            Ok((snapshot.data, Some(note)))
        }
        None => {
            let client = connect(config)?;
            let records = client.fetch_user_records(config.user_id()?).await?;
            Ok((records, None))
        }
    }
}

async fn load_ships(config: &Config, options: &Options) -> Result<(Vec<Ship>, Option<String>)> {
    match options.offline {
        Some(ref dir) => {
            let snapshot = SnapshotStore::open(dir)?
                .load_ships()?
                .ok_or_else(|| anyhow!("No exported ship catalog in {}", dir.display()))?;
            let note = snapshot_note(snapshot.age_display(), snapshot.is_stale());
            Ok((snapshot.data, Some(note)))
        }
        None => Ok((connect(config)?.fetch_ships().await?, None)),
    }
}

/// Goal credentials with command-line overrides applied.
fn credentials(records: &UserRecords, options: &Options) -> Result<(CredentialLevel, CredentialLevel)> {
    let (current, target) = match (options.current, options.target) {
        (Some(current), Some(target)) => (current, target),
        _ => records.credentials()?,
    };
    Ok((options.current.unwrap_or(current), options.target.unwrap_or(target)))
}

fn run_evaluate(rules: &CredentialRules, records: &UserRecords, options: &Options, source: Option<&str>) -> Result<()> {
    let (current, target) = credentials(records, options)?;
    let evaluation = evaluate_career_path(
        rules,
        &records.user_id,
        current,
        target,
        &records.sea_service,
        &records.certificates,
        records.sea_days_per_year(),
    )?;
    print!("{}", render::career_report(&evaluation, source));
    println!();
    print!("{}", render::service_report(&records.sea_service));
    Ok(())
}

fn run_ships(config: &Config, target: CredentialLevel, ships: &[Ship], options: &Options, source: Option<&str>) {
    let matcher = ShipMatcher::default();
    let limit = options.limit.unwrap_or_else(|| config.ship_limit());
    let matches = matcher.rank(ships, target, limit);
    print!("{}", render::ship_report(&matches, &matcher, target, source));
}

async fn run(command: Command, options: Options) -> Result<()> {
    let config = Config::load()?;
    let rules = config.credential_rules()?;

    match command {
        Command::Help => print!("{}", USAGE),
        Command::Rules => print!("{}", render::rules_report(&rules)),
        Command::Evaluate => {
            let (records, source) = load_records(&config, &options).await?;
            run_evaluate(&rules, &records, &options, source.as_deref())?;
        }
        Command::Ships => {
            let target = match options.target {
                Some(target) => target,
                None => load_records(&config, &options).await?.0.credentials()?.1,
            };
            let (ships, source) = load_ships(&config, &options).await?;
            run_ships(&config, target, &ships, &options, source.as_deref());
        }
        Command::Plan => {
            let ((records, source), (ships, ship_source)) =
                tokio::try_join!(load_records(&config, &options), load_ships(&config, &options))?;
            run_evaluate(&rules, &records, &options, source.as_deref())?;
            println!();
            let (_, target) = credentials(&records, &options)?;
            run_ships(&config, target, &ships, &options, ship_source.as_deref());
        }
        Command::Export => {
            let dir = options
                .export_dir
                .clone()
                .ok_or_else(|| anyhow!("export needs a target directory"))?;
            let client = connect(&config)?;
            let user_id = config.user_id()?;
            let (records, ships) =
                tokio::try_join!(client.fetch_user_records(user_id), client.fetch_ships())?;
            let store = SnapshotStore::create(&dir)?;
            store.save_records(&records)?;
            store.save_ships(&ships)?;
            info!(dir = %dir.display(), periods = records.sea_service.len(), ships = ships.len(), "Exported snapshot");
            println!(
                "Exported {} sea-service periods, {} certificates and {} ships to {}",
                records.sea_service.len(),
                records.certificates.len(),
                ships.len(),
                dir.display()
            );
        }
        Command::Login => {
            let url = config.backend_url()?;
            let key = rpassword::prompt_password("API key: ").context("Failed to read API key")?;
            let key = key.trim();
            if key.is_empty() {
                bail!("No API key entered");
            }
            CredentialStore::store(url, key)?;
            println!("API key saved for {}", url);
        }
        Command::Logout => {
            let url = config.backend_url()?;
            if CredentialStore::has_api_key(url) {
                CredentialStore::delete(url)?;
                println!("API key removed for {}", url);
            } else {
                println!("No API key stored for {}", url);
            }
        }
    }

    Ok(())
}

/// Message for an error that escaped `run`.
fn error_message(e: &anyhow::Error) -> String {
    if let Some(core) = e.chain().find_map(|c| c.downcast_ref::<CoreError>()) {
        return core.user_message();
    }
    let mut message = format!("Error: {:#}", e);
    match e.chain().find_map(|c| c.downcast_ref::<ApiError>()) {
        Some(api) if api.is_transient() => {
            message.push_str("\nCould not load your records. Please try again.")
        }
        Some(_) => message.push_str(
            "\nCould not load your records. Check your API key (wheelhouse login) and try again.",
        ),
        None => {}
    }
    message
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let guard = init_tracing();
    info!("wheelhouse starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match parse_args(&args) {
        Ok((command, options)) => match run(command, options).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", error_message(&e));
                1
            }
        },
        Err(e) => {
            eprintln!("Error: {:#}\n\n{}", e, USAGE);
            2
        }
    };

    // process::exit skips destructors; flush the log file first
    drop(guard);
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_args(&[]).unwrap().0, Command::Help);
        assert_eq!(parse_args(&args("evaluate")).unwrap().0, Command::Evaluate);
        assert_eq!(parse_args(&args("plan")).unwrap().0, Command::Plan);
        assert!(parse_args(&args("launch")).is_err());
    }

    #[test]
    fn test_parse_options() {
        let (command, options) =
            parse_args(&args("ships --offline /tmp/snap --target chief-mate --limit 5")).unwrap();
        assert_eq!(command, Command::Ships);
        assert_eq!(options.offline, Some(PathBuf::from("/tmp/snap")));
        assert_eq!(options.target, Some(CredentialLevel::ChiefMate));
        assert_eq!(options.limit, Some(5));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(parse_args(&args("evaluate --current deckhand")).is_err());
        assert!(parse_args(&args("ships --limit many")).is_err());
        assert!(parse_args(&args("ships --limit")).is_err());
        assert!(parse_args(&args("evaluate stray")).is_err());
    }

    #[test]
    fn test_export_needs_directory() {
        assert!(parse_args(&args("export")).is_err());
        let (_, options) = parse_args(&args("export out")).unwrap();
        assert_eq!(options.export_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_overrides_apply_per_column() {
        let records = UserRecords::default();
        let options = Options {
            target: Some(CredentialLevel::ChiefMate),
            ..Default::default()
        };
        assert_eq!(
            credentials(&records, &options).unwrap(),
            (CredentialLevel::ThirdMate, CredentialLevel::ChiefMate)
        );
    }

    #[test]
    fn test_error_message_for_unreachable_goal() {
        let e = anyhow::Error::from(CoreError::UnreachableTarget {
            current: CredentialLevel::Master,
            target: CredentialLevel::ThirdMate,
        });
        assert!(error_message(&e).starts_with("Your goal is not a valid upgrade path"));
    }

    #[test]
    fn test_snapshot_note_flags_stale_exports() {
        assert_eq!(snapshot_note("2h ago".to_string(), false), "snapshot exported 2h ago");
        assert!(snapshot_note("9d ago".to_string(), true).contains("(stale; run export again"));
    }

    #[test]
    fn test_error_message_for_rejected_key() {
        let e = anyhow::Error::from(ApiError::Unauthorized);
        assert!(error_message(&e).contains("Check your API key"));
    }

    #[test]
    fn test_error_message_for_fetch_failure() {
        let e = anyhow::Error::from(ApiError::RateLimited).context("Failed to fetch sea service");
        let message = error_message(&e);
        assert!(message.contains("Failed to fetch sea service"));
        assert!(message.ends_with("Please try again."));
    }
}
