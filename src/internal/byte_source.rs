use std::borrow::Cow;

use super::{utf8, Source};

/// A character source over a raw byte slice.
///
/// Works like [`super::TextSource`] but decodes one UTF-8 character per
/// `next` itself, surfacing invalid units as raw-byte characters of width 1.
/// A flush borrows from the haystack when the consumed region is valid
/// UTF-8 and falls back to an owned string with the synthetic characters
/// substituted otherwise.
#[derive(Debug)]
pub(crate) struct ByteSource<'h> {
    data: &'h [u8],
    start: usize,
    pos: usize,
    width: usize,
    generation: u64,
}

impl<'h> ByteSource<'h> {
    pub(crate) fn new(data: &'h [u8]) -> Self {
        Self {
            data,
            start: 0,
            pos: 0,
            width: 0,
            generation: 0,
        }
    }

    fn text(&self, start: usize, end: usize) -> Cow<'h, str> {
        let region = &self.data[start..end];

        match std::str::from_utf8(region) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => Cow::Owned(utf8::decode_region(region)),
        }
    }
}

impl<'h> Source<'h> for ByteSource<'h> {
    fn next(&mut self) -> Option<char> {
        match utf8::decode_prefix(&self.data[self.pos..]) {
            Some((c, width)) => {
                self.width = width;
                self.pos += width;

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
        let s = self.text(self.start, self.pos);

        self.start = self.pos;
        self.width = 0;
        self.generation += 1;

        s
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

        Some((self.text(start, self.pos), self.pos))
    }

    fn span_len(&self, generation: u64, start: usize) -> usize {
        if generation != self.generation || start > self.pos {
            return 0;
        }

        self.pos - start
    }
}
