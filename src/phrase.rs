use std::borrow::Cow;

use log::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{LexError, Result, Token, TokenType, Tokeniser, TOKEN_ERROR};

/// The type tag of a [`Phrase`].
///
/// Negative values are reserved for this crate; all non-negative values are
/// available to embedding grammars.
pub type PhraseType = i32;

/// The phrase type signalling that there are no more phrases to read.
pub const PHRASE_DONE: PhraseType = -1;

/// The phrase type signalling that an error occurred. The error detail is
/// carried as an Error token in the phrase's data.
pub const PHRASE_ERROR: PhraseType = -2;

/// A group of tokens that have meaning together.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Phrase<'h> {
    /// The type tag of the phrase.
    pub phrase_type: PhraseType,
    /// The tokens making up the phrase, in input order.
    pub data: Vec<Token<'h>>,
}

impl Phrase<'_> {
    /// Check whether this is the Done sentinel phrase.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.phrase_type == PHRASE_DONE
    }

    /// Check whether this is the Error sentinel phrase.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.phrase_type == PHRASE_ERROR
    }

    fn done() -> Self {
        Self {
            phrase_type: PHRASE_DONE,
            data: Vec::new(),
        }
    }
}

/// A state function of the token-level state machine, the one-layer-up
/// analogue of [`crate::TokenFn`].
pub struct PhraseFn<'h>(Box<dyn FnMut(&mut Phraser<'h>) -> (Phrase<'h>, PhraseFn<'h>) + 'h>);

impl<'h> PhraseFn<'h> {
    /// Wrap a state function.
    pub fn new(f: impl FnMut(&mut Phraser<'h>) -> (Phrase<'h>, PhraseFn<'h>) + 'h) -> Self {
        Self(Box::new(f))
    }

    fn done_state() -> Self {
        Self::new(Phraser::done)
    }

    fn error_state() -> Self {
        Self::new(Phraser::error)
    }
}

impl std::fmt::Debug for PhraseFn<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PhraseFn")
    }
}

/// A grouper that folds the token stream of a [`Tokeniser`] into
/// [`Phrase`]s.
///
/// It buffers the tokens read since the last flush, offers one-token
/// lookahead with pushback, and exposes the accept/except primitives of the
/// tokeniser one layer up, parameterized over token *types* instead of
/// characters.
#[derive(Debug)]
pub struct Phraser<'h> {
    tokeniser: Tokeniser<'h>,
    state: Option<PhraseFn<'h>>,
    tokens: Vec<Token<'h>>,
    pushed_back: bool,
}

impl<'h> Phraser<'h> {
    /// Create a phraser pulling tokens from the given tokeniser. The
    /// tokeniser's own state machine must be configured, before or after,
    /// via [`Tokeniser::set_state`].
    pub fn new(tokeniser: Tokeniser<'h>) -> Self {
        Self {
            tokeniser,
            state: None,
            tokens: Vec::new(),
            pushed_back: false,
        }
    }

    /// Access the underlying tokeniser.
    pub fn tokeniser(&self) -> &Tokeniser<'h> {
        &self.tokeniser
    }

    /// Mutably access the underlying tokeniser, e.g. to redirect its state
    /// machine.
    pub fn tokeniser_mut(&mut self) -> &mut Tokeniser<'h> {
        &mut self.tokeniser
    }

    fn read_token(&mut self) -> Token<'h> {
        if let Some(last) = self.tokens.last() {
            if self.pushed_back {
                self.pushed_back = false;

                return last.clone();
            }

            // Terminal tokens are sticky; the token layer is not driven past
            // them.
            if last.token_type < 0 {
                return last.clone();
            }
        }

        let token = self.tokeniser.run();

        self.tokens.push(token.clone());

        token
    }

    fn unread_token(&mut self) {
        self.pushed_back = true;
    }

    /// Return the upcoming token without consuming it.
    pub fn peek(&mut self) -> Token<'h> {
        let token = self.read_token();

        self.unread_token();

        token
    }

    /// Consume the next token if its type is one of `types`. Returns whether
    /// a token was consumed.
    pub fn accept(&mut self, types: &[TokenType]) -> bool {
        let token = self.read_token();

        if types.contains(&token.token_type) {
            return true;
        }

        self.unread_token();

        false
    }

    /// Consume the next token if its type is *not* one of `types`. Returns
    /// whether a token was consumed.
    pub fn except(&mut self, types: &[TokenType]) -> bool {
        let token = self.read_token();

        if types.contains(&token.token_type) {
            self.unread_token();

            return false;
        }

        true
    }

    /// Consume tokens as long as their types are contained in `types`.
    ///
    /// Returns the type of the token that stopped the run, unconsumed.
    pub fn accept_run(&mut self, types: &[TokenType]) -> TokenType {
        loop {
            let token = self.read_token();

            if !types.contains(&token.token_type) {
                self.unread_token();

                return token.token_type;
            }
        }
    }

    /// Consume tokens as long as their types are *not* contained in `types`.
    /// The Done and Error sentinels always stop the run.
    ///
    /// Returns the type of the token that stopped the run, unconsumed.
    pub fn except_run(&mut self, types: &[TokenType]) -> TokenType {
        loop {
            let token = self.read_token();

            if token.token_type < 0 || types.contains(&token.token_type) {
                self.unread_token();

                return token.token_type;
            }
        }
    }

    /// Return the tokens consumed since the last flush and reset the
    /// accumulation. A pushed-back token is not part of the returned slice
    /// and stays available.
    pub fn flush(&mut self) -> Vec<Token<'h>> {
        if self.pushed_back {
            if let Some(kept) = self.tokens.pop() {
                let out = std::mem::take(&mut self.tokens);

                self.tokens.push(kept);

                return out;
            }
        }

        std::mem::take(&mut self.tokens)
    }

    /// The number of tokens consumed since the last flush.
    pub fn len(&self) -> usize {
        self.tokens.len() - usize::from(self.pushed_back)
    }

    /// Check whether no tokens have been consumed since the last flush.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Install the state function the next [`Phraser::get_phrase`] call will
    /// invoke.
    pub fn set_state(&mut self, state: PhraseFn<'h>) {
        self.state = Some(state);
    }

    /// The error recorded by either state machine, if any.
    pub fn error_value(&self) -> Option<&LexError> {
        self.tokeniser.error_value()
    }

    /// Run the token-level state machine until it produces the next phrase.
    ///
    /// The Done/Error semantics mirror [`Tokeniser::get_token`]: once the
    /// input is exhausted cleanly every further call returns the Done
    /// phrase, and an Error phrase surfaces the stored error instead.
    pub fn get_phrase(&mut self) -> Result<Phrase<'h>> {
        let phrase = self.run();

        if phrase.phrase_type == PHRASE_ERROR {
            Err(self.tokeniser.err.clone().unwrap_or(LexError::Unknown))
        } else {
            Ok(phrase)
        }
    }

    fn run(&mut self) -> Phrase<'h> {
        if matches!(self.tokeniser.err, Some(LexError::EndOfInput)) {
            return Phrase::done();
        }

        let mut state = match self.state.take() {
            Some(state) => state,
            None => {
                self.tokeniser.err = Some(LexError::NoState);

                PhraseFn::error_state()
            }
        };

        let (phrase, next) = (state.0)(self);

        self.state = Some(next);

        if phrase.phrase_type == PHRASE_ERROR
            && matches!(self.tokeniser.err, Some(LexError::EndOfInput))
        {
            self.tokeniser.err = Some(LexError::UnexpectedEof);
        }

        trace!("phrase {} ({} tokens)", phrase.phrase_type, phrase.data.len());

        phrase
    }

    /// Produce a phrase of the given type carrying the buffered tokens, and
    /// transition to `next` (or to the Done state when `next` is `None`).
    pub fn emit(
        &mut self,
        phrase_type: PhraseType,
        next: Option<PhraseFn<'h>>,
    ) -> (Phrase<'h>, PhraseFn<'h>) {
        (
            Phrase {
                phrase_type,
                data: self.flush(),
            },
            next.unwrap_or_else(PhraseFn::done_state),
        )
    }

    /// Record `err` and transition to the Error state.
    pub fn return_error(&mut self, err: LexError) -> (Phrase<'h>, PhraseFn<'h>) {
        self.tokeniser.err = Some(err);

        self.error()
    }

    /// The terminal state function signalling that there are no more
    /// phrases.
    pub fn done(&mut self) -> (Phrase<'h>, PhraseFn<'h>) {
        self.tokeniser.err = Some(LexError::EndOfInput);

        (Phrase::done(), PhraseFn::done_state())
    }

    /// The terminal state function reporting the recorded error as an Error
    /// phrase wrapping an Error token.
    pub fn error(&mut self) -> (Phrase<'h>, PhraseFn<'h>) {
        let err = self.tokeniser.err.get_or_insert(LexError::Unknown);

        (
            Phrase {
                phrase_type: PHRASE_ERROR,
                data: vec![Token {
                    token_type: TOKEN_ERROR,
                    data: Cow::Owned(err.to_string()),
                }],
            },
            PhraseFn::error_state(),
        )
    }
}
