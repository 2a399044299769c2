use crate::scheme::Scheme;

/// The crate's single error type.
///
/// Every fallible operation in this crate returns `Result<_, Error>`; nothing
/// is recovered internally, matching a research core that surfaces every
/// algebraic or I/O failure to its caller.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] pub(crate) Reason);

#[derive(Debug, thiserror::Error)]
pub(crate) enum Reason {
    #[error("message is out of range: must satisfy 0 <= m < n")]
    MessageOutOfRange,
    #[error("message is {bits} bits wide, exceeds the {limit}-bit limit imposed by the precomputed tables")]
    MessageTooWideForTables { bits: u32, limit: u32 },
    #[error("ciphertext is out of range: must satisfy 0 <= c < n^2")]
    CiphertextOutOfRange,
    #[error("value is not invertible modulo the given modulus")]
    NotInvertible,
    #[error("p and q do not form a valid key pair")]
    InvalidPQ,
    #[error("algebraic invariant violated during key generation: {0}")]
    AssertionFailure(&'static str),
    #[error("persisted file for scheme {1:?} is missing required field/table `{0}`")]
    MissingTable(&'static str, Scheme),
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("parallel worker returned an unexpected result shape")]
    TypeMismatch,
    #[error("bug occurred")]
    Bug(#[source] Bug),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum Bug {
    #[error("pow mod undefined")]
    PowModUndef,
}

impl From<Bug> for Error {
    fn from(err: Bug) -> Self {
        Error(Reason::Bug(err))
    }
}
