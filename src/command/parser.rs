//! Parsing of one command line into a lock request.

use crate::locks::{LockRequest, OperationKind};
use thiserror::Error;

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// End the session.
    Quit,
    /// Perform a lock operation.
    Lock(LockRequest),
}

/// Why a command line was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command line")]
    Empty,

    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("operation '{0}' is not available on this platform")]
    UnsupportedOperation(char),

    #[error("{field} '{value}' is not a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parser for the command grammar, restricted to the operations the
/// active lock primitive supports.
#[derive(Debug, Clone)]
pub struct CommandParser {
    supported: Vec<OperationKind>,
}

impl CommandParser {
    pub fn new(supported: &[OperationKind]) -> Self {
        Self {
            supported: supported.to_vec(),
        }
    }

    /// Operations this parser accepts, in presentation order.
    pub fn supported(&self) -> &[OperationKind] {
        &self.supported
    }

    /// Parse one line. Never has side effects; a rejected line leaves the
    /// caller free to carry on with the next one.
    pub fn parse(&self, line: &str) -> Result<Command, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        let Some(&op_field) = fields.first() else {
            return Err(ParseError::Empty);
        };

        if op_field.eq_ignore_ascii_case("q") {
            return Ok(Command::Quit);
        }

        if fields.len() != 3 {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let operation = self.parse_operation(op_field)?;
        let offset = parse_number("offset", fields[1])?;
        let length = parse_number("length", fields[2])?;

        Ok(Command::Lock(LockRequest::new(operation, offset, length)))
    }

    fn parse_operation(&self, field: &str) -> Result<OperationKind, ParseError> {
        let mut chars = field.chars();
        let (Some(symbol), None) = (chars.next(), chars.next()) else {
            return Err(ParseError::UnknownOperation(field.to_string()));
        };

        let operation = OperationKind::from_symbol(symbol)
            .ok_or_else(|| ParseError::UnknownOperation(field.to_string()))?;

        if !self.supported.contains(&operation) {
            return Err(ParseError::UnsupportedOperation(operation.symbol()));
        }

        Ok(operation)
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    };

    // u64::from_str would also take a leading '+'.
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}
