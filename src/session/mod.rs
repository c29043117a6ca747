//! The interactive/batch lock session.
//!
//! A [`Session`] owns the data file handle and everything the command loop
//! needs between iterations: the command stream, the line buffer, whether
//! to prompt, and the output writers. Nothing is shared outside it.
//!
//! Each command line goes through the [`CommandParser`]; accepted requests
//! are handed to the lock engine, bracketed by timestamped "requesting"
//! and "received" messages so the operator can see when a blocking request
//! finally returns. Rejected lines and recoverable lock failures are
//! reported on the error stream and the loop moves on. Only a fatal
//! platform failure or an I/O error ends the session early.

#[cfg(test)]
mod tests;

use crate::command::{Command, CommandParser};
use crate::config::Config;
use crate::error::{RangerError, Result};
use crate::events::{Event, EventLog};
use crate::locks::{self, LockHandle, LockRequest, LockResult, OperationKind, RegionLock};
use chrono::Local;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The operator entered `Q`.
    Quit,
    /// The command stream ran out.
    EndOfInput,
}

/// State of one lock session.
///
/// `L` is the primitive every request goes through; normally the
/// [`LockHandle`] of the data file.
pub struct Session<R, W, E, L = LockHandle> {
    lock: L,
    target: PathBuf,
    parser: CommandParser,
    config: Config,
    event_log: Option<EventLog>,
    input: R,
    out: W,
    err: E,
    interactive: bool,
    line: String,
    pid: u32,
}

impl<R: BufRead, W: Write, E: Write> Session<R, W, E, LockHandle> {
    /// Create a session on the open data file.
    pub fn new(handle: LockHandle, config: Config, input: R, out: W, err: E) -> Self {
        let target = handle.path().to_path_buf();
        Self::with_lock(handle, &target, config, input, out, err)
    }
}

impl<R: BufRead, W: Write, E: Write, L: RegionLock> Session<R, W, E, L> {
    /// Create a session that applies requests through `lock`. `target` is
    /// only used to name the file in the banner. The accepted operations
    /// are taken from the capabilities of `lock`.
    pub fn with_lock(
        lock: L,
        target: &Path,
        config: Config,
        input: R,
        out: W,
        err: E,
    ) -> Self {
        let supported = locks::supported_operations(&lock);
        Self {
            lock,
            target: target.to_path_buf(),
            parser: CommandParser::new(&supported),
            config,
            event_log: None,
            input,
            out,
            err,
            interactive: false,
            line: String::new(),
            pid: std::process::id(),
        }
    }

    /// Prompt before every read.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Append requesting/received records to `log`.
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.event_log = Some(log);
        self
    }

    /// Run the command loop until `Q`, end of input, or a fatal error.
    /// The data file is closed when the session is dropped.
    pub fn run(&mut self) -> Result<SessionEnd> {
        if self.config.banner {
            self.print_banner()?;
        }

        loop {
            if self.interactive {
                write!(self.out, "{}", self.config.prompt).map_err(output_error)?;
                self.out.flush().map_err(output_error)?;
            }

            self.line.clear();
            let read = self
                .input
                .read_line(&mut self.line)
                .map_err(|e| RangerError::IoError(format!("failed to read command: {}", e)))?;
            if read == 0 {
                log::info!("end of command input");
                return Ok(SessionEnd::EndOfInput);
            }

            match self.parser.parse(&self.line) {
                Ok(Command::Quit) => {
                    writeln!(self.out, "Exiting ...").map_err(output_error)?;
                    return Ok(SessionEnd::Quit);
                }
                Ok(Command::Lock(request)) => self.execute(&request)?,
                Err(e) => {
                    log::debug!("rejected command line {:?}: {}", self.line.trim_end(), e);
                    writeln!(self.err, "Invalid operation - need \"OPN OFF LEN\": {}", e)
                        .map_err(output_error)?;
                }
            }
        }
    }

    fn print_banner(&mut self) -> Result<()> {
        let mut banner = format!(
            "Processing locks on '{}'\nAvailable commands:\n",
            self.target.display()
        );
        for op in self.parser.supported() {
            banner.push_str(&format!(
                "    {} <start> <len>   : {} <len> bytes from <start>\n",
                op.symbol(),
                describe(*op)
            ));
        }
        banner.push_str("    Q                 : quit the program\n");

        self.out.write_all(banner.as_bytes()).map_err(output_error)
    }

    fn execute(&mut self, request: &LockRequest) -> Result<()> {
        let op = request.operation;
        let range = request.range;

        writeln!(self.out, "CMD {} {:2} {:2}", op, range.offset, range.length)
            .map_err(output_error)?;
        writeln!(
            self.out,
            "PID {:5} performing operation {}",
            self.pid,
            op.label()
        )
        .map_err(output_error)?;
        let requested_at = self.timestamp();
        writeln!(
            self.out,
            "PID {:5} : requesting '{}' lock at {} at {}",
            self.pid, op, range, requested_at
        )
        .map_err(output_error)?;
        self.log_event(|actor| Event::requested(actor, request))?;

        let result = locks::apply(&self.lock, request);

        if result.is_success() {
            match op {
                OperationKind::Test => self.report_test(&result)?,
                OperationKind::Unlock => {
                    writeln!(self.out, "attempt to unlock the part of the file")
                        .map_err(output_error)?
                }
                _ => {}
            }
        }

        let received_at = self.timestamp();
        writeln!(
            self.out,
            "PID {:5} : received   '{}' lock at {} at {}",
            self.pid, op, range, received_at
        )
        .map_err(output_error)?;
        self.log_event(|actor| Event::received(actor, request, &result))?;

        if let Some(reason) = result.failure_reason() {
            writeln!(self.err, "Error: {} failed : {}", op.label(), reason)
                .map_err(output_error)?;
            if reason.is_fatal() {
                return Err(RangerError::LockError(reason.to_string()));
            }
        }

        Ok(())
    }

    fn report_test(&mut self, result: &LockResult) -> Result<()> {
        let Some(holder) = &result.holder else {
            return writeln!(self.out, "No lock").map_err(output_error);
        };

        writeln!(
            self.out,
            "Process {} has a {} lock already!",
            holder.pid,
            holder.kind.as_str()
        )
        .map_err(output_error)?;
        writeln!(self.out, "lock owner:\t{}", holder.pid).map_err(output_error)?;
        writeln!(self.out, "lock offset:\t{}", holder.range.offset).map_err(output_error)?;
        writeln!(self.out, "lock length:\t{}", holder.range.length).map_err(output_error)?;
        writeln!(self.out, "whence:\t\tSEEK_SET").map_err(output_error)
    }

    fn log_event(&mut self, build: impl FnOnce(&str) -> Event) -> Result<()> {
        match self.event_log.as_mut() {
            Some(log) => {
                let event = build(log.actor());
                log.append(&event)
            }
            None => Ok(()),
        }
    }

    fn timestamp(&self) -> String {
        Local::now().format(&self.config.timestamp_format).to_string()
    }
}

fn describe(op: OperationKind) -> &'static str {
    match op {
        OperationKind::Exclusive => "exclusive lock of",
        OperationKind::Shared => "shared lock of",
        OperationKind::Test => "test of lock of",
        OperationKind::Unlock => "unlock",
    }
}

fn output_error(e: io::Error) -> RangerError {
    RangerError::IoError(format!("failed to write output: {}", e))
}
