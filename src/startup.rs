//! Session startup: configuration, command source, data file.
//!
//! Everything here happens before the first command is read. Any failure
//! is fatal and becomes the process exit code.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{RangerError, Result};
use crate::events::EventLog;
use crate::locks::LockHandle;
use crate::session::{Session, SessionEnd};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::Path;

/// Build and run a session from parsed arguments.
pub fn run(cli: Cli) -> Result<SessionEnd> {
    let config = resolve_config(&cli)?;

    // Open the command file before the data file so a bad command file
    // never leaves the data file open.
    let (input, interactive): (Box<dyn BufRead>, bool) = match &cli.commandfile {
        Some(path) => (Box::new(open_command_file(path)?), false),
        None => (Box::new(io::stdin().lock()), io::stdin().is_terminal()),
    };

    let handle = LockHandle::open(&cli.datafile)?;
    let event_log = config.event_log.as_ref().map(EventLog::open).transpose()?;

    let mut session =
        Session::new(handle, config, input, io::stdout(), io::stderr()).interactive(interactive);
    if let Some(log) = event_log {
        log::info!("appending events to '{}'", log.path().display());
        session = session.with_event_log(log);
    }

    session.run()
}

/// Load the config file, if any, and apply command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if cli.no_banner {
        config.banner = false;
    }
    if let Some(path) = &cli.event_log {
        config.event_log = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

fn open_command_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        RangerError::OpenError(format!(
            "Cannot open command file '{}' : {}",
            path.display(),
            e
        ))
    })?;
    Ok(BufReader::new(file))
}
