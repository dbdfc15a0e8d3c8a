use thiserror::Error;

/// The result type for the `runelex` crate.
pub type Result<T> = std::result::Result<T, LexError>;

/// The error type for the `runelex` crate.
///
/// `EndOfInput` doubles as the stream-termination sentinel: it is stored in
/// the tokeniser's error slot when a state function signals that the input is
/// cleanly exhausted and is not treated as a failure by the token and phrase
/// drivers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// The input is exhausted. Stored by the Done states and used to make
    /// repeated driver calls keep returning the Done sentinel.
    #[error("end of input")]
    EndOfInput,

    /// The input ended while a token or phrase was still being constructed.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// The state machine was driven without a state function installed.
    #[error("no state")]
    NoState,

    /// A state function signalled an error without recording a cause.
    #[error("unknown error")]
    Unknown,

    /// An error supplied by an embedding grammar.
    #[error("{0}")]
    Custom(String),
}

impl LexError {
    /// Create a user-defined error from any displayable cause.
    pub fn custom(cause: impl std::fmt::Display) -> Self {
        LexError::Custom(cause.to_string())
    }
}
