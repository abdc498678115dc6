use std::fmt;

/// Error kinds a caller is expected to match on by kind (spec §7), as
/// opposed to the general `anyhow::Error` propagation used everywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Bad magic, bad sizes, truncated record: raised while loading a v3
    /// binary file. Recoverable at the session level.
    FileFormat(String),
    /// Invariant breach in game-thread code (e.g. `Adaptor::session()`
    /// called without the preconditions the caller promised).
    Assertion(String),
    /// The embedded scripting interpreter's error kind: bad arguments, a
    /// not-assignable property, or no game loaded for a command that needs
    /// one.
    Script(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::FileFormat(msg) => write!(f, "file format error: {msg}"),
            CoreError::Assertion(msg) => write!(f, "assertion failure: {msg}"),
            CoreError::Script(msg) => write!(f, "script error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}
