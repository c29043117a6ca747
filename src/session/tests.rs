//! Tests for the session loop.

use super::*;
use crate::test_support::create_data_file;
use std::io::Cursor;
use tempfile::TempDir;

struct Transcript {
    end: Result<SessionEnd>,
    out: String,
    err: String,
}

fn run_with(config: Config, interactive: bool, input: &str) -> (TempDir, Transcript) {
    let (temp_dir, path) = create_data_file(256);
    let transcript = run_on(&path, config, interactive, None, input);
    (temp_dir, transcript)
}

fn run_on(
    path: &std::path::Path,
    config: Config,
    interactive: bool,
    event_log: Option<EventLog>,
    input: &str,
) -> Transcript {
    let handle = LockHandle::open(path).unwrap();
    let mut out = Vec::new();
    let mut err = Vec::new();

    let end = {
        let mut session = Session::new(
            handle,
            config,
            Cursor::new(input.as_bytes()),
            &mut out,
            &mut err,
        )
        .interactive(interactive);
        if let Some(log) = event_log {
            session = session.with_event_log(log);
        }
        session.run()
    };

    Transcript {
        end,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

fn quiet() -> Config {
    Config {
        banner: false,
        ..Config::default()
    }
}

#[test]
fn test_lock_unlock_quit_in_order() {
    let (_temp_dir, t) = run_with(quiet(), false, "X 0 50\nU 0 50\nQ\n");

    assert_eq!(t.end.unwrap(), SessionEnd::Quit);
    assert!(t.err.is_empty(), "unexpected stderr: {}", t.err);

    let lines: Vec<&str> = t.out.lines().collect();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("missing {:?} in:\n{}", needle, t.out))
    };

    let x_requested = position("requesting 'X' lock at 0 for 50 bytes");
    let x_received = position("received   'X' lock at 0 for 50 bytes");
    let u_requested = position("requesting 'U' lock at 0 for 50 bytes");
    let u_received = position("received   'U' lock at 0 for 50 bytes");
    let exiting = position("Exiting ...");

    assert!(x_requested < x_received);
    assert!(x_received < u_requested);
    assert!(u_requested < u_received);
    assert!(u_received < exiting);
    assert_eq!(exiting, lines.len() - 1);
}

#[test]
fn test_command_echo_and_pid() {
    let (_temp_dir, t) = run_with(quiet(), false, "s 3 4\n");

    let pid = std::process::id();
    assert!(t.out.contains("CMD S  3  4\n"));
    assert!(t.out.contains(&format!("PID {:5} performing operation Shared Lock", pid)));
    assert!(t.out.contains(&format!("PID {:5} : requesting 'S' lock at 3 for 4 bytes at ", pid)));
}

#[test]
fn test_invalid_operation_is_reported_and_loop_continues() {
    let (_temp_dir, t) = run_with(quiet(), false, "Z 0 10\nX 0 10\nQ\n");

    assert_eq!(t.end.unwrap(), SessionEnd::Quit);
    assert_eq!(t.err.lines().count(), 1);
    assert!(t.err.starts_with("Invalid operation - need \"OPN OFF LEN\""));
    assert!(t.err.contains("unknown operation 'Z'"));

    assert!(!t.out.contains("'Z'"));
    assert!(t.out.contains("requesting 'X' lock at 0 for 10 bytes"));
}

#[test]
fn test_malformed_lines_never_reach_the_engine() {
    let (_temp_dir, t) = run_with(quiet(), false, "X 0\n\nS -1 5\nU a b\n");

    assert_eq!(t.end.unwrap(), SessionEnd::EndOfInput);
    assert_eq!(t.err.lines().count(), 4);
    assert!(!t.out.contains("requesting"));
}

#[test]
fn test_end_of_input_without_quit() {
    let (_temp_dir, t) = run_with(quiet(), false, "U 0 10\n");

    assert_eq!(t.end.unwrap(), SessionEnd::EndOfInput);
    assert!(!t.out.contains("Exiting"));
}

#[test]
fn test_quit_stops_reading() {
    let (_temp_dir, t) = run_with(quiet(), false, "q\nX 0 10\n");

    assert_eq!(t.end.unwrap(), SessionEnd::Quit);
    assert!(!t.out.contains("requesting"));
}

#[test]
fn test_unlock_twice_reports_no_error() {
    let (_temp_dir, t) = run_with(quiet(), false, "U 10 10\nU 10 10\nQ\n");

    assert_eq!(t.end.unwrap(), SessionEnd::Quit);
    assert!(t.err.is_empty(), "unexpected stderr: {}", t.err);
    assert_eq!(t.out.matches("received   'U'").count(), 2);
}

#[test]
fn test_prompt_only_when_interactive() {
    let config = Config {
        prompt: "lock> ".to_string(),
        ..quiet()
    };

    let (_temp_dir, t) = run_with(config.clone(), true, "U 0 1\nQ\n");
    assert_eq!(t.out.matches("lock> ").count(), 2);
    assert!(t.out.starts_with("lock> "));

    let (_temp_dir, t) = run_with(config, false, "U 0 1\nQ\n");
    assert!(!t.out.contains("lock> "));
}

#[test]
fn test_banner_lists_available_commands() {
    let (_temp_dir, path) = create_data_file(16);
    let t = run_on(&path, Config::default(), false, None, "Q\n");

    assert!(t.out.starts_with(&format!("Processing locks on '{}'\n", path.display())));
    assert!(t.out.contains("Available commands:"));
    assert!(t.out.contains("    X <start> <len>   : exclusive lock of <len> bytes from <start>"));
    assert!(t.out.contains("    S <start> <len>   : shared lock of <len> bytes from <start>"));
    assert!(t.out.contains("    U <start> <len>   : unlock <len> bytes from <start>"));
    assert!(t.out.contains("    Q                 : quit the program"));
    assert_eq!(t.out.contains("    T <start> <len>"), cfg!(unix));
}

#[test]
fn test_custom_timestamp_format() {
    let config = Config {
        timestamp_format: "[%Y]".to_string(),
        ..quiet()
    };
    let (_temp_dir, t) = run_with(config, false, "U 0 1\n");

    let year = Local::now().format("[%Y]").to_string();
    assert!(t.out.contains(&format!("for 1 bytes at {}\n", year)));
}

#[test]
fn test_event_log_gets_two_records_per_command() {
    let (temp_dir, path) = create_data_file(64);
    let log_path = temp_dir.path().join("events.ndjson");
    let log = EventLog::open(&log_path).unwrap();
    let actor = log.actor().to_string();

    let t = run_on(&path, quiet(), false, Some(log), "X 0 8\nZ 1 1\nU 0 8\nQ\n");
    assert_eq!(t.end.unwrap(), SessionEnd::Quit);

    let content = std::fs::read_to_string(&log_path).unwrap();
    let events: Vec<Event> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(events.len(), 4);
    assert_eq!(events[0].operation, "X");
    assert_eq!(events[1].outcome.as_deref(), Some("success"));
    assert_eq!(events[2].operation, "U");
    assert_eq!(events[3].length, 8);
    assert!(events.iter().all(|e| e.actor == actor));
}

#[cfg(unix)]
#[test]
fn test_query_on_free_range_reports_no_lock() {
    let (_temp_dir, t) = run_with(quiet(), false, "T 50 10\nQ\n");

    assert!(t.err.is_empty(), "unexpected stderr: {}", t.err);
    let requested = t.out.find("requesting 'T'").unwrap();
    let no_lock = t.out.find("No lock\n").unwrap();
    let received = t.out.find("received   'T'").unwrap();
    assert!(requested < no_lock && no_lock < received);
}

#[cfg(windows)]
#[test]
fn test_query_is_rejected_on_windows() {
    let (_temp_dir, t) = run_with(quiet(), false, "T 50 10\nQ\n");

    assert!(t.err.contains("operation 'T' is not available on this platform"));
    assert!(!t.out.contains("requesting"));
}

#[cfg(unix)]
#[test]
fn test_out_of_range_request_is_recoverable() {
    let line = format!("X {} 1\nU 0 1\nQ\n", u64::MAX);
    let (_temp_dir, t) = run_with(quiet(), false, &line);

    assert_eq!(t.end.unwrap(), SessionEnd::Quit);
    assert!(t.err.contains("Error: Exclusive Lock failed : invalid range"));
    assert!(t.out.contains(&format!("received   'X' lock at {} for 1 bytes", u64::MAX)));
    assert!(t.out.contains("received   'U' lock at 0 for 1 bytes"));
}

/// A primitive whose every native call fails with one errno.
struct FailingLock(i32);

impl RegionLock for FailingLock {
    fn acquire_exclusive(&self, _range: locks::ByteRange) -> io::Result<()> {
        Err(io::Error::from_raw_os_error(self.0))
    }

    fn acquire_shared(&self, _range: locks::ByteRange) -> io::Result<()> {
        Err(io::Error::from_raw_os_error(self.0))
    }

    fn release(&self, _range: locks::ByteRange) -> io::Result<()> {
        Err(io::Error::from_raw_os_error(self.0))
    }
}

fn run_failing(errno: i32, input: &str) -> Transcript {
    let mut out = Vec::new();
    let mut err = Vec::new();

    let end = Session::with_lock(
        FailingLock(errno),
        std::path::Path::new("data.dat"),
        quiet(),
        Cursor::new(input.as_bytes()),
        &mut out,
        &mut err,
    )
    .run();

    Transcript {
        end,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

#[cfg(unix)]
#[test]
fn test_platform_failure_ends_session_after_received_line() {
    let t = run_failing(libc::EBADF, "X 0 10\nU 0 10\nQ\n");

    assert!(t.out.contains("received   'X' lock at 0 for 10 bytes"));
    assert!(!t.out.contains("requesting 'U'"));
    assert!(!t.out.contains("Exiting"));
    assert!(t.err.starts_with("Error: Exclusive Lock failed : "));

    let err = t.end.unwrap_err();
    assert!(matches!(err, RangerError::LockError(_)));
    assert_eq!(err.exit_code(), crate::exit_codes::LOCK_FAILURE);
}

#[cfg(unix)]
#[test]
fn test_interrupted_request_keeps_session_running() {
    let t = run_failing(libc::EINTR, "S 0 10\nQ\n");

    assert_eq!(t.end.unwrap(), SessionEnd::Quit);
    assert!(t.err.contains("Error: Shared Lock failed : lock request interrupted"));
    assert!(t.out.contains("received   'S' lock at 0 for 10 bytes"));
    assert!(t.out.ends_with("Exiting ...\n"));
}

#[test]
fn test_injected_lock_without_query_hides_test_command() {
    let t = run_failing(0, "T 0 1\n");

    assert_eq!(t.end.unwrap(), SessionEnd::EndOfInput);
    assert!(t.err.starts_with("Invalid operation"));
    assert!(!t.out.contains("requesting"));
}

#[test]
fn test_successful_unlock_is_acknowledged_before_received() {
    let (_temp_dir, t) = run_with(quiet(), false, "U 0 10\n");

    let acknowledged = t.out.find("attempt to unlock the part of the file\n").unwrap();
    let received = t.out.find("received   'U' lock at 0 for 10 bytes").unwrap();
    assert!(acknowledged < received);
}

#[cfg(unix)]
#[test]
fn test_failed_unlock_is_not_acknowledged() {
    let t = run_failing(libc::EINTR, "U 0 10\n");

    assert!(!t.out.contains("attempt to unlock"));
    assert!(t.out.contains("received   'U' lock at 0 for 10 bytes"));
}
