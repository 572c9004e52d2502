//! dispatch-triage: rank a JSON file of records and print the triage views.
//!
//! Usage: dispatch-triage <records.json> [--config <path>] [--now <rfc3339>] [--explain]

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};

use dispatch_triage::config::{load_config, load_config_or_default};
use dispatch_triage::types::{parse_timestamp, Record};
use dispatch_triage::{TriageEngine, TriageError};

struct Args {
    records: PathBuf,
    config: Option<PathBuf>,
    now: Option<DateTime<Utc>>,
    explain: bool,
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args, TriageError> {
    let mut records = None;
    let mut config = None;
    let mut now = None;
    let mut explain = false;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => {
                let value = argv
                    .next()
                    .ok_or_else(|| TriageError::Usage("--config needs a path".to_string()))?;
                config = Some(PathBuf::from(value));
            }
            "--now" => {
                let value = argv
                    .next()
                    .ok_or_else(|| TriageError::Usage("--now needs a timestamp".to_string()))?;
                let parsed = parse_timestamp(&value)
                    .ok_or_else(|| TriageError::Usage(format!("unrecognized timestamp: {}", value)))?;
                now = Some(parsed);
            }
            "--explain" => explain = true,
            flag if flag.starts_with("--") => {
                return Err(TriageError::Usage(format!("unknown flag: {}", flag)));
            }
            path => {
                if records.is_some() {
                    return Err(TriageError::Usage("only one records file is accepted".to_string()));
                }
                records = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Args {
        records: records.ok_or_else(|| TriageError::Usage("missing records file".to_string()))?,
        config,
        now,
        explain,
    })
}

fn run() -> Result<(), TriageError> {
    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_config_or_default()?,
    };

    let content = fs::read_to_string(&args.records)?;
    let records: Vec<Record> =
        serde_json::from_str(&content).map_err(|e| TriageError::parse("records", e))?;
    log::info!("Loaded {} records from {}", records.len(), args.records.display());

    let now = args.now.unwrap_or_else(Utc::now);
    let views = TriageEngine::new(config)
        .explain(args.explain)
        .triage_all(&records, now);

    let json = serde_json::to_string_pretty(&views).map_err(|e| TriageError::parse("output", e))?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dispatch-triage: {}", e);
            eprintln!("{}", e.recovery_suggestion());
            ExitCode::FAILURE
        }
    }
}
