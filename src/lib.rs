#![forbid(missing_docs)]
//! # `runelex`
//! The `runelex` crate is a toolkit for hand-written lexers. Instead of
//! compiling a grammar, it provides the primitives a recursive-descent or
//! state-machine tokeniser is built from: a character source with
//! single-step backtracking over four kinds of input (strings, byte slices,
//! `io::Read` streams and decoded char streams), run-based accept/except
//! scanning, checkpoint/restore backtracking, and nested sub-tokenisers that
//! share one cursor. A thin phrase layer folds the emitted token stream into
//! higher-level units with a second state machine.
//!
//! All four input backends share identical lexing semantics; the in-memory
//! backends additionally hand out zero-copy lexemes.
//!
//! # Example
//! ```rust
//! use runelex::Tokeniser;
//!
//! const ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
//!
//! let mut t = Tokeniser::from_text("Hello, World!");
//!
//! t.accept_run(ALPHA);
//! assert_eq!(t.flush(), "Hello");
//!
//! t.except_run(ALPHA);
//! t.flush();
//!
//! t.accept_run(ALPHA);
//! assert_eq!(t.flush(), "World");
//! ```
//!
//! # Driving the state machine
//! A lexer is written as a set of state functions. Each one scans the
//! characters of a single token, emits it and names the state that scans
//! whatever may follow:
//! ```rust
//! use runelex::{Token, TokenFn, Tokeniser, TOKEN_DONE};
//!
//! const NUMBER: i32 = 0;
//! const PLUS: i32 = 1;
//!
//! fn number<'h>(t: &mut Tokeniser<'h>) -> (Token<'h>, TokenFn<'h>) {
//!     t.accept_run("0123456789");
//!
//!     if t.is_empty() {
//!         return t.done();
//!     }
//!
//!     t.emit(NUMBER, Some(TokenFn::new(plus)))
//! }
//!
//! fn plus<'h>(t: &mut Tokeniser<'h>) -> (Token<'h>, TokenFn<'h>) {
//!     if t.accept("+") {
//!         t.emit(PLUS, Some(TokenFn::new(number)))
//!     } else {
//!         t.done()
//!     }
//! }
//!
//! let mut t = Tokeniser::from_text("1+2+33");
//! t.set_state(TokenFn::new(number));
//!
//! let types: Vec<i32> = t.iter().map(|token| token.token_type).collect();
//! assert_eq!(types, [NUMBER, PLUS, NUMBER, PLUS, NUMBER, TOKEN_DONE]);
//! ```
//!
//! # Crate features
//! - `serde`: derives `Serialize`/`Deserialize` for [`Token`] and
//!   [`Phrase`]. Disabled by default.

/// Module with the checkpoint type.
mod checkpoint;
pub use checkpoint::Checkpoint;

/// Module with error definitions.
mod errors;
pub use errors::{LexError, Result};

/// The module with internal implementation details.
mod internal;

/// Module with the phrase grouping layer.
mod phrase;
pub use phrase::{Phrase, PhraseFn, PhraseType, Phraser, PHRASE_DONE, PHRASE_ERROR};

/// Module with the token type.
mod token;
pub use token::{Token, TokenType, TOKEN_DONE, TOKEN_ERROR};

/// The module with the tokeniser.
mod tokeniser;
pub use tokeniser::{TokenFn, TokenIter, Tokeniser};
