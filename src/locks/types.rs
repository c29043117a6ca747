//! Lock request and result types.

use std::fmt;

/// The operation requested by one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Blocking exclusive (write) lock.
    Exclusive,
    /// Blocking shared (read) lock.
    Shared,
    /// Non-blocking query for a conflicting lock.
    Test,
    /// Release of whatever this process holds on the range.
    Unlock,
}

impl OperationKind {
    /// All operations, in the order they are presented to the operator.
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Exclusive,
        OperationKind::Shared,
        OperationKind::Test,
        OperationKind::Unlock,
    ];

    /// Map a command symbol to an operation. Lowercase symbols are accepted.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'X' => Some(Self::Exclusive),
            'S' => Some(Self::Shared),
            'T' => Some(Self::Test),
            'U' => Some(Self::Unlock),
            _ => None,
        }
    }

    /// The command symbol for this operation.
    pub fn symbol(&self) -> char {
        match self {
            OperationKind::Exclusive => 'X',
            OperationKind::Shared => 'S',
            OperationKind::Test => 'T',
            OperationKind::Unlock => 'U',
        }
    }

    /// Human-readable name used in operator messages.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Exclusive => "Exclusive Lock",
            OperationKind::Shared => "Shared Lock",
            OperationKind::Test => "Test for lock",
            OperationKind::Unlock => "Unlock",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A byte range `[offset, offset + length)` within the data file.
///
/// A zero length is passed through to the platform unchanged: `fcntl`
/// treats it as "from offset to end of file, however far it grows",
/// `LockFileEx` treats it as an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: u64,
    pub length: u64,
}

impl ByteRange {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {} bytes", self.offset, self.length)
    }
}

/// One validated lock command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRequest {
    pub operation: OperationKind,
    pub range: ByteRange,
}

impl LockRequest {
    pub fn new(operation: OperationKind, offset: u64, length: u64) -> Self {
        Self {
            operation,
            range: ByteRange::new(offset, length),
        }
    }
}

/// Kind of lock reported by a test query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeldLockKind {
    Shared,
    Exclusive,
}

impl HeldLockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeldLockKind::Shared => "read",
            HeldLockKind::Exclusive => "write",
        }
    }
}

/// The process holding a lock that conflicts with a test query.
///
/// `range` is what the kernel reports, which can be wider or narrower than
/// the queried range when the held lock only partially overlaps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockHolder {
    pub pid: i32,
    pub kind: HeldLockKind,
    pub range: ByteRange,
}

/// Why a lock operation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The operation symbol is not one of X, S, T or U.
    UnknownOperation(char),
    /// The operation exists but this platform's primitive cannot perform it.
    Unsupported(OperationKind),
    /// A signal interrupted a blocking wait.
    Interrupted,
    /// The kernel refused a blocking request that would deadlock.
    Deadlock,
    /// The offset or length is out of range for the primitive.
    InvalidRange(String),
    /// Any other failure reported by the operating system.
    Platform { code: Option<i32>, message: String },
}

impl FailureReason {
    /// Whether the failure means the handle or primitive is unusable.
    ///
    /// Only unclassified platform failures are fatal; the rest are
    /// well-defined negative outcomes the session reports and moves past.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FailureReason::Platform { .. })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UnknownOperation(c) => write!(f, "Unknown operation '{}'", c),
            FailureReason::Unsupported(op) => {
                write!(f, "operation '{}' is not supported on this platform", op)
            }
            FailureReason::Interrupted => write!(f, "lock request interrupted"),
            FailureReason::Deadlock => write!(f, "lock request would deadlock"),
            FailureReason::InvalidRange(msg) => write!(f, "invalid range: {}", msg),
            FailureReason::Platform { message, .. } => write!(f, "{}", message),
        }
    }
}

/// Outcome of a single lock operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(FailureReason),
}

/// What the lock engine reports back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockResult {
    pub outcome: Outcome,

    /// The conflicting holder, set only by a test query that found one.
    pub holder: Option<LockHolder>,
}

impl LockResult {
    pub fn success() -> Self {
        Self {
            outcome: Outcome::Success,
            holder: None,
        }
    }

    pub fn held_by(holder: LockHolder) -> Self {
        Self {
            outcome: Outcome::Success,
            holder: Some(holder),
        }
    }

    pub fn failure(reason: FailureReason) -> Self {
        Self {
            outcome: Outcome::Failure(reason),
            holder: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure(reason) => Some(reason),
        }
    }
}
