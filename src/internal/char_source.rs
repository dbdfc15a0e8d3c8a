use std::borrow::Cow;

use super::{ReplayBuffer, Source};

/// A character source over an upstream that already yields decoded
/// characters.
///
/// Works like [`super::ReadSource`] without the decoding step. No raw bytes
/// are visible at this layer, so an upstream decode failure can only present
/// itself as iterator exhaustion, which is treated as end of input.
#[derive(Debug)]
pub(crate) struct CharSource<I> {
    iter: I,
    exhausted: bool,
    chars: ReplayBuffer,
}

impl<I: Iterator<Item = char>> CharSource<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self {
            iter,
            exhausted: false,
            chars: ReplayBuffer::default(),
        }
    }
}

impl<'h, I: Iterator<Item = char>> Source<'h> for CharSource<I> {
    fn next(&mut self) -> Option<char> {
        if let Some(c) = self.chars.replay_next() {
            return Some(c);
        }

        if self.exhausted {
            self.chars.clear_width();

            return None;
        }

        match self.iter.next() {
            Some(c) => {
                self.chars.push(c);

                Some(c)
            }
            None => {
                self.exhausted = true;
                self.chars.clear_width();

                None
            }
        }
    }

    fn backup(&mut self) {
        self.chars.backup();
    }

    fn flush(&mut self) -> Cow<'h, str> {
        self.chars.flush()
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn reset(&mut self) {
        self.chars.reset();
    }

    fn generation(&self) -> u64 {
        self.chars.generation()
    }

    fn pos(&self) -> usize {
        self.chars.pos()
    }

    fn width(&self) -> usize {
        self.chars.width()
    }

    fn restore(&mut self, generation: u64, pos: usize, width: usize) -> bool {
        self.chars.restore(generation, pos, width)
    }

    fn slice(&mut self, generation: u64, start: usize) -> Option<(Cow<'h, str>, usize)> {
        self.chars.slice(generation, start)
    }

    fn span_len(&self, generation: u64, start: usize) -> usize {
        self.chars.span_len(generation, start)
    }
}
