use std::{borrow::Cow, cell::RefCell, rc::Rc};

/// Module with the character source over in-memory text.
mod text_source;
pub(crate) use text_source::TextSource;

/// Module with the character source over raw byte slices.
mod byte_source;
pub(crate) use byte_source::ByteSource;

/// Module with the character source over `io::Read` streams.
mod read_source;
pub(crate) use read_source::ReadSource;

/// Module with the character source over decoded char streams.
mod char_source;
pub(crate) use char_source::CharSource;

/// Module with the replay buffer shared by the stream-backed sources.
mod replay;
pub(crate) use replay::ReplayBuffer;

/// Module with incremental UTF-8 decoding helpers.
pub(crate) mod utf8;

/// The character-source abstraction behind a [`crate::Tokeniser`].
///
/// All four backends implement the same cursor discipline: `next` advances by
/// the width of the decoded character, `backup` rewinds exactly one step, and
/// `flush` hands out everything consumed since the previous flush while
/// bumping the generation stamp that guards checkpoints and sub-views.
pub(crate) trait Source<'h> {
    /// Decode and return the next character, advancing the cursor. Returns
    /// `None` at end of input, idempotently, with the last width cleared so
    /// that a trailing `backup` is a no-op.
    fn next(&mut self) -> Option<char>;

    /// Rewind the cursor by the width of the last successful `next`. Without
    /// an intervening `next`, repeated calls have no further effect.
    fn backup(&mut self);

    /// Return everything consumed since the last flush, discard it from the
    /// window and advance the generation stamp.
    fn flush(&mut self) -> Cow<'h, str>;

    /// The number of source units consumed since the last flush.
    fn len(&self) -> usize;

    /// Rewind the cursor to the last flush point without returning anything.
    /// The generation stamp is left untouched.
    fn reset(&mut self);

    /// The current generation stamp.
    fn generation(&self) -> u64;

    /// The current cursor position, in this source's own units.
    fn pos(&self) -> usize;

    /// The width of the most recently read character, in this source's own
    /// units. Zero when the last `next` returned `None` or after a `backup`.
    fn width(&self) -> usize;

    /// Restore a previously captured (generation, pos, width) triple. Fails
    /// with `false` when the generation stamp has advanced since capture.
    fn restore(&mut self, generation: u64, pos: usize, width: usize) -> bool;

    /// Return the characters between `start` and the current cursor as text,
    /// together with the current cursor position, provided `generation` still
    /// matches. Used by sub-views; never moves the flush boundary.
    fn slice(&mut self, generation: u64, start: usize) -> Option<(Cow<'h, str>, usize)>;

    /// The number of source units between `start` and the current cursor, or
    /// zero when `generation` no longer matches.
    fn span_len(&self, generation: u64, start: usize) -> usize;
}

/// The shared cursor handle. Parent tokenisers, sub-tokenisers and
/// checkpoints all hold clones of this handle, so there is exactly one
/// position and generation source of truth per scan target.
pub(crate) type SharedSource<'h> = Rc<RefCell<dyn Source<'h> + 'h>>;
