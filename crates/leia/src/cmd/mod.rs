use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand};
use serde::de::DeserializeOwned;

use crate::exit::{io_error, json_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod multiplex;
pub mod validate;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a JSON payload against a schema record.
    Validate(ValidateArgs),
    /// Derive target messages from a source message request.
    Multiplex(MultiplexArgs),
    /// Poll a schema file and report every published snapshot.
    Watch(WatchArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Validate(args) => validate::run(args, format),
        Command::Multiplex(args) => multiplex::run(args, format),
        Command::Watch(args) => watch::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema record (JSON).
    pub schema: PathBuf,
    /// Inline JSON payload.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read payload from file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MultiplexArgs {
    /// Array of schema records (JSON).
    pub schemas: PathBuf,
    /// Message request (JSON) with schemaKey, message and includeSource.
    pub request: PathBuf,
    /// Skip structural validation of derived payloads.
    #[arg(long)]
    pub no_validate: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Array of schema records (JSON).
    pub schemas: PathBuf,
    /// Refresh interval (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub interval: String,
    /// Exit after N published snapshots.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let raw = std::fs::read(path).map_err(|err| io_error(path, err))?;
    serde_json::from_slice(&raw)
        .map_err(|err| json_error(&format!("parse {} failed", path.display()), err))
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
