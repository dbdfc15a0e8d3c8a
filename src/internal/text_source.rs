use std::borrow::Cow;

use super::Source;

/// A character source over an in-memory string slice.
///
/// `start` and `pos` are absolute byte offsets into the haystack, so a flush
/// is a zero-copy slice and an O(1) boundary slide.
#[derive(Debug)]
pub(crate) struct TextSource<'h> {
    text: &'h str,
    start: usize,
    pos: usize,
    width: usize,
    generation: u64,
}

impl<'h> TextSource<'h> {
    pub(crate) fn new(text: &'h str) -> Self {
        Self {
            text,
            start: 0,
            pos: 0,
            width: 0,
            generation: 0,
        }
    }
}

impl<'h> Source<'h> for TextSource<'h> {
    fn next(&mut self) -> Option<char> {
        match self.text[self.pos..].chars().next() {
            Some(c) => {
                self.width = c.len_utf8();
                self.pos += self.width;

                Some(c)
            }
            None => {
                self.width = 0;

                None
            }
        }
    }

    fn backup(&mut self) {
        if self.width > 0 {
            self.pos -= self.width;
            self.width = 0;
        }
    }

    fn flush(&mut self) -> Cow<'h, str> {
        let s = &self.text[self.start..self.pos];

        self.start = self.pos;
        self.width = 0;
        self.generation += 1;

        Cow::Borrowed(s)
    }

    fn len(&self) -> usize {
        self.pos - self.start
    }

    fn reset(&mut self) {
        self.pos = self.start;
        self.width = 0;
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn width(&self) -> usize {
        self.width
    }

    fn restore(&mut self, generation: u64, pos: usize, width: usize) -> bool {
        if generation != self.generation {
            return false;
        }

        self.pos = pos;
        self.width = width;

        true
    }

    fn slice(&mut self, generation: u64, start: usize) -> Option<(Cow<'h, str>, usize)> {
        if generation != self.generation || start > self.pos {
            return None;
        }

        Some((Cow::Borrowed(&self.text[start..self.pos]), self.pos))
    }

    fn span_len(&self, generation: u64, start: usize) -> usize {
        if generation != self.generation || start > self.pos {
            return 0;
        }

        self.pos - start
    }
}
