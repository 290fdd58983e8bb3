//! Command-line front end: index a music folder, then identify clips against it.

use std::path::PathBuf;

use remixid::catalog::CatalogDatabase;
use remixid::config::{self, AppSettings};
use remixid::ingest::{FilenameMetadata, IndexOptions, index_library};
use remixid::logging;
use remixid::matching::MatchReport;
use remixid::query::Identifier;

fn main() {
    let command = match parse_args(std::env::args().skip(1).collect()) {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run(command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Index {
        dir: Option<PathBuf>,
        clear: bool,
    },
    Match {
        file: PathBuf,
        threshold: Option<f32>,
        limit: Option<usize>,
        json: bool,
    },
    List,
    Clear,
}

fn run(command: Command) -> Result<(), String> {
    let settings = load_settings()?;
    let db_path = settings
        .library
        .resolved_database_path()
        .map_err(|err| err.to_string())?;
    let db = CatalogDatabase::open(&db_path).map_err(|err| err.to_string())?;

    match command {
        Command::Index { dir, clear } => {
            let root = dir.unwrap_or_else(|| settings.library.music_dir.clone());
            let report = index_library(
                &root,
                &db,
                &settings.fingerprint,
                &FilenameMetadata,
                IndexOptions { clear },
            )
            .map_err(|err| err.to_string())?;
            println!(
                "Indexed {} new tracks from {} files ({} duplicates, {} failed); catalog holds {}.",
                report.added,
                report.scanned,
                report.duplicates,
                report.failed,
                report.total_in_catalog
            );
        }
        Command::Match {
            file,
            threshold,
            limit,
            json,
        } => {
            let mut matching = settings.matching.clone();
            if let Some(threshold) = threshold {
                matching.threshold = threshold;
            }
            if let Some(limit) = limit {
                matching.max_results = limit;
            }
            let identifier =
                Identifier::new(settings.fingerprint.clone(), matching.normalized());
            let report = identifier
                .identify_path(&file, &db)
                .map_err(|err| err.to_string())?;
            if json {
                let text =
                    serde_json::to_string_pretty(&report.matches).map_err(|err| err.to_string())?;
                println!("{text}");
            } else {
                print_report(&report, identifier.match_settings().threshold);
            }
        }
        Command::List => {
            let tracks = db.list_tracks().map_err(|err| err.to_string())?;
            if tracks.is_empty() {
                println!("Catalog is empty.");
            }
            for track in tracks {
                println!("{}. {} - {}", track.id, track.title, track.artist);
            }
        }
        Command::Clear => {
            let removed = db.clear().map_err(|err| err.to_string())?;
            println!("Removed {removed} tracks.");
        }
    }
    Ok(())
}

/// Load `config.toml`, writing the defaults on first run so they can be edited.
fn load_settings() -> Result<AppSettings, String> {
    let path = config::config_path().map_err(|err| err.to_string())?;
    let first_run = !path.exists();
    let settings = config::load_or_default().map_err(|err| err.to_string())?;
    if first_run && let Err(err) = config::save_to(&AppSettings::default(), &path) {
        tracing::warn!("Could not write default settings: {err}");
    }
    Ok(settings)
}

fn print_report(report: &MatchReport, threshold: f32) {
    if report.degenerate_query {
        println!("Query is silent; nothing to match.");
        return;
    }
    if report.matches.is_empty() {
        println!(
            "No matches at or above {:.0}% among {} tracks.",
            threshold * 100.0,
            report.scanned
        );
        return;
    }
    for (rank, result) in report.matches.iter().enumerate() {
        println!(
            "{}. {} - {} ({:.1}%)",
            rank + 1,
            result.title,
            result.artist,
            result.score * 100.0
        );
    }
}

fn parse_args(args: Vec<String>) -> Result<Option<Command>, String> {
    let Some(name) = args.first() else {
        println!("{}", help_text());
        return Ok(None);
    };
    let rest = &args[1..];
    let command = match name.as_str() {
        "-h" | "--help" => {
            println!("{}", help_text());
            return Ok(None);
        }
        "index" => parse_index(rest)?,
        "match" => parse_match(rest)?,
        "list" => no_arguments(rest, Command::List)?,
        "clear" => no_arguments(rest, Command::Clear)?,
        unknown => return Err(format!("Unknown command: {unknown}\n\n{}", help_text())),
    };
    Ok(Some(command))
}

fn parse_index(args: &[String]) -> Result<Command, String> {
    let mut dir = None;
    let mut clear = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--dir" => {
                idx += 1;
                let value = args.get(idx).ok_or("--dir requires a value")?;
                dir = Some(PathBuf::from(value));
            }
            "--clear" => clear = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(Command::Index { dir, clear })
}

fn parse_match(args: &[String]) -> Result<Command, String> {
    let mut file = None;
    let mut threshold = None;
    let mut limit = None;
    let mut json = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--threshold" => {
                idx += 1;
                let value = args.get(idx).ok_or("--threshold requires a value")?;
                let parsed: f32 = value
                    .parse()
                    .map_err(|_| format!("Invalid threshold: {value}"))?;
                threshold = Some(parsed);
            }
            "--limit" => {
                idx += 1;
                let value = args.get(idx).ok_or("--limit requires a value")?;
                let parsed: usize = value
                    .parse()
                    .map_err(|_| format!("Invalid limit: {value}"))?;
                limit = Some(parsed);
            }
            "--json" => json = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            path if file.is_none() => file = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument: {extra}")),
        }
        idx += 1;
    }
    let file = file.ok_or("match requires an audio file")?;
    Ok(Command::Match {
        file,
        threshold,
        limit,
        json,
    })
}

fn no_arguments(args: &[String], command: Command) -> Result<Command, String> {
    match args.first() {
        Some(extra) => Err(format!("Unexpected argument: {extra}")),
        None => Ok(command),
    }
}

fn help_text() -> String {
    [
        "remixid",
        "",
        "Usage:",
        "  remixid index [--dir <music folder>] [--clear]",
        "  remixid match <audio file> [--threshold <0..1>] [--limit <n>] [--json]",
        "  remixid list",
        "  remixid clear",
        "",
        "Settings are read from config.toml in the app folder (REMIXID_CONFIG_HOME overrides it).",
    ]
    .join("\n")
}
