//! Definition of errors.

/// A specialized Result type for Pecab.
pub type Result<T, E = PecabError> = std::result::Result<T, E>;

/// The error type for Pecab.
#[derive(Debug, thiserror::Error)]
pub enum PecabError {
    /// The error variant for [`InvalidArgumentError`].
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    #[error(transparent)]
    InvalidFormat(#[from] InvalidFormatError),

    /// The error variant for [`InvalidStateError`].
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),

    /// The error variant for [`TrieBuildError`].
    #[error(transparent)]
    TrieBuild(#[from] TrieBuildError),

    /// The error variant for [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The error variant for [`TryFromIntError`](std::num::TryFromIntError).
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// The error variant for [`ParseIntError`](std::num::ParseIntError).
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// The error variant for [`std::str::Utf8Error`].
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// The error variant for [`std::io::Error`].
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The error variant for [`rkyv::rancor::Error`].
    #[error(transparent)]
    Rkyv(#[from] rkyv::rancor::Error),
}

impl PecabError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }
}

/// Error used when the argument is invalid.
#[derive(Debug, thiserror::Error)]
#[error("InvalidArgumentError: {arg}: {msg}")]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

/// Error used when the input format is invalid.
#[derive(Debug, thiserror::Error)]
#[error("InvalidFormatError: {arg}: {msg}")]
pub struct InvalidFormatError {
    /// Name of the format.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

/// Error used when the state is invalid.
#[derive(Debug, thiserror::Error)]
#[error("InvalidStateError: {msg}: {cause}")]
pub struct InvalidStateError {
    /// Error message.
    pub(crate) msg: String,

    /// Underlying cause of the error.
    pub(crate) cause: String,
}

/// Errors aborting the construction of a double-array trie.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieBuildError {
    /// Keys were not given in ascending code-point order.
    #[error("TrieBuildError: keys must be sorted in ascending order, but key #{index} is out of order")]
    UnsortedInput {
        /// Index of the first key breaking the order.
        index: usize,
    },

    /// A value id cannot be encoded into a negative base.
    #[error("TrieBuildError: value {value} cannot be encoded into a terminal state")]
    NegativeValueIndex {
        /// The offending value id.
        value: u32,
    },
}

/// Errors rejecting an entry of a user dictionary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A user entry contains whitespace.
    #[error("ValidationError: user entry {entry:?} must not contain whitespace")]
    WhitespaceInUserEntry {
        /// The offending entry.
        entry: String,
    },
}
