use std::{borrow::Cow, cell::RefCell, io, rc::Rc};

use log::trace;

use crate::{
    internal::{ByteSource, CharSource, ReadSource, SharedSource, TextSource},
    Checkpoint, LexError, Result, Token, TokenType, TOKEN_ERROR,
};

/// A state function of the character-level state machine.
///
/// Each invocation receives the live tokeniser, produces one token and names
/// the state function the machine transitions to. Terminal states (Done and
/// Error) return themselves, so driving the machine past the end of the
/// token stream keeps re-reporting the sentinel instead of panicking.
pub struct TokenFn<'h>(Box<dyn FnMut(&mut Tokeniser<'h>) -> (Token<'h>, TokenFn<'h>) + 'h>);

impl<'h> TokenFn<'h> {
    /// Wrap a state function.
    pub fn new(f: impl FnMut(&mut Tokeniser<'h>) -> (Token<'h>, TokenFn<'h>) + 'h) -> Self {
        Self(Box::new(f))
    }

    fn done_state() -> Self {
        Self::new(Tokeniser::done)
    }

    fn error_state() -> Self {
        Self::new(Tokeniser::error)
    }
}

impl std::fmt::Debug for TokenFn<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenFn")
    }
}

// The consumption boundary of a sub-tokeniser: the shared cursor's position
// and generation at creation time. A flush against a stale generation marks
// the boundary dead by pushing start past any reachable position.
#[derive(Clone, Copy, Debug)]
struct Boundary {
    generation: u64,
    start: usize,
}

/// A tokeniser over one of the four character sources.
///
/// * `'h` represents the lifetime of the haystack being scanned.
///
/// The tokeniser offers single-character lookahead, run-based acceptance and
/// rejection, checkpoint/restore backtracking and nested sub-tokenisers, and
/// drives a pluggable state machine that emits [`Token`]s.
pub struct Tokeniser<'h> {
    source: SharedSource<'h>,
    boundary: Option<Boundary>,
    pub(crate) err: Option<LexError>,
    state: Option<TokenFn<'h>>,
}

impl<'h> Tokeniser<'h> {
    /// Create a tokeniser over an in-memory string. Lexemes are zero-copy
    /// slices of the haystack.
    pub fn from_text(text: &'h str) -> Self {
        Self::with_source(Rc::new(RefCell::new(TextSource::new(text))))
    }

    /// Create a tokeniser over a raw byte slice. Invalid UTF-8 units are
    /// surfaced as characters whose scalar value equals the raw byte, so no
    /// input byte is silently dropped.
    pub fn from_bytes(data: &'h [u8]) -> Self {
        Self::with_source(Rc::new(RefCell::new(ByteSource::new(data))))
    }

    /// Create a tokeniser over an `io::Read` stream. Characters are decoded
    /// lazily and buffered so that backtracking never re-reads the stream;
    /// read errors degrade to end of input.
    pub fn from_reader<R: io::Read + 'h>(reader: R) -> Self {
        Self::with_source(Rc::new(RefCell::new(ReadSource::new(reader))))
    }

    /// Create a tokeniser over a stream of already-decoded characters.
    pub fn from_chars<I: Iterator<Item = char> + 'h>(chars: I) -> Self {
        Self::with_source(Rc::new(RefCell::new(CharSource::new(chars))))
    }

    fn with_source(source: SharedSource<'h>) -> Self {
        Self {
            source,
            boundary: None,
            err: None,
            state: None,
        }
    }

    /// Return the next character and advance the read position. Returns
    /// `None` at end of input, idempotently.
    pub fn next_char(&mut self) -> Option<char> {
        self.source.borrow_mut().next()
    }

    /// Return the next character without advancing the read position.
    pub fn peek(&mut self) -> Option<char> {
        let c = self.next_char();

        self.backup();

        c
    }

    fn backup(&mut self) {
        self.source.borrow_mut().backup();
    }

    /// Consume the next character if it is contained in `chars`. Returns
    /// whether a character was consumed.
    pub fn accept(&mut self, chars: &str) -> bool {
        match self.next_char() {
            Some(c) if chars.contains(c) => true,
            _ => {
                self.backup();

                false
            }
        }
    }

    /// Consume the next character if it exists and is *not* contained in
    /// `chars`. Returns whether a character was consumed.
    pub fn except(&mut self, chars: &str) -> bool {
        match self.next_char() {
            Some(c) if !chars.contains(c) => true,
            _ => {
                self.backup();

                false
            }
        }
    }

    /// Consume characters as long as they are contained in `chars`.
    ///
    /// Returns the character that stopped the run, unconsumed, or `None`
    /// when the run was stopped by the end of the input.
    pub fn accept_run(&mut self, chars: &str) -> Option<char> {
        loop {
            match self.next_char() {
                Some(c) if chars.contains(c) => {}
                stopper => {
                    self.backup();

                    return stopper;
                }
            }
        }
    }

    /// Consume characters as long as they are *not* contained in `chars`.
    ///
    /// Returns the character that stopped the run, unconsumed, or `None`
    /// when the run was stopped by the end of the input.
    pub fn except_run(&mut self, chars: &str) -> Option<char> {
        loop {
            match self.next_char() {
                Some(c) if !chars.contains(c) => {}
                stopper => {
                    self.backup();

                    return stopper;
                }
            }
        }
    }

    /// Attempt to consume `s` character by character, stopping at the first
    /// mismatch.
    ///
    /// Returns the number of characters successfully matched. A partial
    /// match stays consumed; there is no rollback for this operation.
    pub fn accept_string(&mut self, s: &str, case_insensitive: bool) -> usize {
        let mut read = 0;

        for want in s.chars() {
            match self.peek() {
                Some(c) if chars_eq(c, want, case_insensitive) => {
                    self.next_char();
                    read += 1;
                }
                _ => break,
            }
        }

        read
    }

    /// Attempt to consume one of the candidate words, preferring the longest
    /// full match among candidates that share a prefix.
    ///
    /// Returns the matched text. When no candidate matched completely, the
    /// read position is fully restored and an empty string is returned.
    pub fn accept_word(&mut self, words: &[&str], case_insensitive: bool) -> String {
        self.accept_word_inner(words.to_vec(), case_insensitive)
    }

    fn accept_word_inner<'w>(&mut self, mut words: Vec<&'w str>, case_insensitive: bool) -> String {
        let cp = self.checkpoint();
        let mut matched = String::new();

        while !words.is_empty() {
            let Some(c) = self.next_char() else {
                break;
            };

            matched.push(c);

            let mut found = false;
            let mut remaining = Vec::with_capacity(words.len());

            for word in std::mem::take(&mut words) {
                let mut cs = word.chars();

                if let Some(first) = cs.next() {
                    if chars_eq(c, first, case_insensitive) {
                        let rest = cs.as_str();

                        if rest.is_empty() {
                            found = true;
                        } else {
                            remaining.push(rest);
                        }
                    }
                }
            }

            words = remaining;

            if found {
                // A full candidate matched here; longer candidates may still
                // complete, so try to extend before settling.
                if !words.is_empty() {
                    matched.push_str(&self.accept_word_inner(words, case_insensitive));
                }

                return matched;
            }
        }

        trace!("accept_word: no full candidate match, rolling back");
        cp.restore();

        String::new()
    }

    /// Return the text consumed since the last flush and reset the
    /// accumulation boundary.
    ///
    /// For a sub-tokeniser this never moves the parent's flush point; a
    /// sub-tokeniser whose parent has flushed in the meantime yields an
    /// empty string.
    pub fn flush(&mut self) -> Cow<'h, str> {
        match &mut self.boundary {
            None => self.source.borrow_mut().flush(),
            Some(boundary) => {
                match self
                    .source
                    .borrow_mut()
                    .slice(boundary.generation, boundary.start)
                {
                    Some((text, end)) => {
                        boundary.start = end;

                        text
                    }
                    None => {
                        boundary.start = usize::MAX;

                        Cow::Borrowed("")
                    }
                }
            }
        }
    }

    /// The number of source units (bytes, for byte-oriented sources)
    /// consumed since the last flush.
    pub fn len(&self) -> usize {
        match self.boundary {
            None => self.source.borrow().len(),
            Some(boundary) => self
                .source
                .borrow()
                .span_len(boundary.generation, boundary.start),
        }
    }

    /// Check whether nothing has been consumed since the last flush.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything consumed since the last flush, rewinding the read
    /// position to the flush point. Unlike [`Tokeniser::flush`] this leaves
    /// the generation stamp untouched, so outstanding checkpoints of the
    /// flush-point state stay valid.
    pub fn reset(&mut self) {
        self.source.borrow_mut().reset();
    }

    /// Capture the current read position for later restoration.
    ///
    /// The checkpoint stays valid until the next flush of the underlying
    /// source; [`Checkpoint::restore`] reports failure afterwards.
    pub fn checkpoint(&self) -> Checkpoint<'h> {
        Checkpoint::capture(&self.source)
    }

    /// Create a tokeniser that shares this tokeniser's source but tracks its
    /// own consumption boundary.
    ///
    /// The sub-tokeniser's [`Tokeniser::flush`] does not advance this
    /// tokeniser's flush point: flushing the parent afterwards returns the
    /// entire span the sub-tokeniser traversed. Sub-tokenisers nest.
    pub fn sub_tokeniser(&self) -> Tokeniser<'h> {
        let (generation, start) = {
            let src = self.source.borrow();

            (src.generation(), src.pos())
        };

        Tokeniser {
            source: Rc::clone(&self.source),
            boundary: Some(Boundary { generation, start }),
            err: None,
            state: None,
        }
    }

    /// Install the state function the next [`Tokeniser::get_token`] call
    /// will invoke.
    pub fn set_state(&mut self, state: TokenFn<'h>) {
        self.state = Some(state);
    }

    /// The error recorded by the state machine, if any.
    pub fn error_value(&self) -> Option<&LexError> {
        self.err.as_ref()
    }

    /// Run the state machine until it produces the next token.
    ///
    /// Once the input is exhausted cleanly, every further call returns the
    /// Done token. When the produced token is the Error sentinel, the stored
    /// error is returned instead and subsequent calls keep re-reporting it.
    pub fn get_token(&mut self) -> Result<Token<'h>> {
        let token = self.run();

        if token.token_type == TOKEN_ERROR {
            Err(self.err.clone().unwrap_or(LexError::Unknown))
        } else {
            Ok(token)
        }
    }

    /// Iterate over the remaining tokens. The iterator yields the Done or
    /// Error sentinel token once and is fused afterwards.
    pub fn iter(&mut self) -> TokenIter<'_, 'h> {
        TokenIter {
            tokeniser: self,
            finished: false,
        }
    }

    pub(crate) fn run(&mut self) -> Token<'h> {
        if matches!(self.err, Some(LexError::EndOfInput)) {
            return Token::done();
        }

        let mut state = match self.state.take() {
            Some(state) => state,
            None => {
                self.err = Some(LexError::NoState);

                TokenFn::error_state()
            }
        };

        let (token, next) = (state.0)(self);

        self.state = Some(next);

        if token.token_type == TOKEN_ERROR && matches!(self.err, Some(LexError::EndOfInput)) {
            // End of input in the middle of a token is never silent
            // truncation.
            self.err = Some(LexError::UnexpectedEof);
        }

        trace!("token {}", token);

        token
    }

    /// Produce a token of the given type carrying the current lexeme, and
    /// transition to `next` (or to the Done state when `next` is `None`).
    ///
    /// A convenience for returning from state functions.
    pub fn emit(&mut self, token_type: TokenType, next: Option<TokenFn<'h>>) -> (Token<'h>, TokenFn<'h>) {
        (
            Token {
                token_type,
                data: self.flush(),
            },
            next.unwrap_or_else(TokenFn::done_state),
        )
    }

    /// Record `err` and transition to the Error state.
    pub fn return_error(&mut self, err: LexError) -> (Token<'h>, TokenFn<'h>) {
        self.err = Some(err);

        self.error()
    }

    /// The terminal state function signalling that there are no more tokens.
    pub fn done(&mut self) -> (Token<'h>, TokenFn<'h>) {
        self.err = Some(LexError::EndOfInput);

        (Token::done(), TokenFn::done_state())
    }

    /// The terminal state function reporting the recorded error. The error
    /// should be recorded first, usually via [`Tokeniser::return_error`];
    /// without one, `LexError::Unknown` is reported.
    pub fn error(&mut self) -> (Token<'h>, TokenFn<'h>) {
        let err = self.err.get_or_insert(LexError::Unknown);

        (
            Token {
                token_type: TOKEN_ERROR,
                data: Cow::Owned(err.to_string()),
            },
            TokenFn::error_state(),
        )
    }
}

impl std::fmt::Debug for Tokeniser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokeniser")
            .field("boundary", &self.boundary)
            .field("err", &self.err)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn chars_eq(a: char, b: char, case_insensitive: bool) -> bool {
    a == b || (case_insensitive && a.to_lowercase().eq(b.to_lowercase()))
}

/// An iterator over the tokens of a [`Tokeniser`].
///
/// Yields each token as the state machine produces it and stops after
/// yielding a Done or Error sentinel token.
///
/// This iterator can be created with the [`Tokeniser::iter`] method.
#[derive(Debug)]
pub struct TokenIter<'t, 'h> {
    tokeniser: &'t mut Tokeniser<'h>,
    finished: bool,
}

impl<'h> Iterator for TokenIter<'_, 'h> {
    type Item = Token<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.tokeniser.run();

        if token.token_type < 0 {
            self.finished = true;
        }

        Some(token)
    }
}
