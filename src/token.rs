use std::borrow::Cow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The type tag of a [`Token`].
///
/// Negative values are reserved for this crate; all non-negative values are
/// available to embedding grammars.
pub type TokenType = i32;

/// The token type signalling that there are no more tokens to read.
pub const TOKEN_DONE: TokenType = -1;

/// The token type signalling that an error occurred. The error detail is
/// carried as the token's data.
pub const TOKEN_ERROR: TokenType = -2;

/// A tagged unit of text produced by a [`crate::Tokeniser`].
///
/// * `'h` represents the lifetime of the haystack being scanned.
///
/// The data borrows from the haystack whenever the backing source permits it,
/// so tokens over in-memory text are zero-copy.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token<'h> {
    /// The type tag of the token.
    pub token_type: TokenType,
    /// The lexeme text of the token.
    pub data: Cow<'h, str>,
}

impl<'h> Token<'h> {
    /// Create a new token.
    pub fn new(token_type: TokenType, data: Cow<'h, str>) -> Self {
        Self { token_type, data }
    }

    /// Check whether this is the Done sentinel token.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.token_type == TOKEN_DONE
    }

    /// Check whether this is the Error sentinel token.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.token_type == TOKEN_ERROR
    }

    pub(crate) fn done() -> Self {
        Self {
            token_type: TOKEN_DONE,
            data: Cow::Borrowed(""),
        }
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.token_type, self.data)
    }
}
