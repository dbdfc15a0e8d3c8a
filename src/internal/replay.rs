use std::borrow::Cow;

use log::trace;

/// The decoded-character buffer shared by the stream-backed sources.
///
/// Stream inputs cannot be re-read, so every decoded character is kept here
/// until the consumer flushes. The cursor (`pos`) is a char index into the
/// buffer; `backup`, checkpoint restoration and sub-view slicing all replay
/// from the buffer instead of touching the upstream reader.
#[derive(Debug, Default)]
pub(crate) struct ReplayBuffer {
    buf: Vec<char>,
    pos: usize,
    // 1 after a successful next, 0 after backup or a failed next.
    width: usize,
    generation: u64,
}

impl ReplayBuffer {
    /// Return the buffered character under the cursor, if the cursor has
    /// been rewound into already-decoded input.
    pub(crate) fn replay_next(&mut self) -> Option<char> {
        if self.pos < self.buf.len() {
            let c = self.buf[self.pos];
            self.pos += 1;
            self.width = 1;

            return Some(c);
        }

        None
    }

    /// Record a freshly decoded character and advance the cursor over it.
    pub(crate) fn push(&mut self, c: char) {
        self.buf.push(c);
        self.pos += 1;
        self.width = 1;
    }

    /// Clear the width so a trailing `backup` is a no-op. Called when the
    /// upstream is exhausted.
    pub(crate) fn clear_width(&mut self) {
        self.width = 0;
    }

    pub(crate) fn backup(&mut self) {
        if self.width > 0 {
            self.pos -= 1;
            self.width = 0;
        }
    }

    pub(crate) fn flush(&mut self) -> Cow<'static, str> {
        let s: String = self.buf[..self.pos].iter().collect();

        self.buf.drain(..self.pos);
        self.pos = 0;
        self.width = 0;
        self.generation += 1;

        Cow::Owned(s)
    }

    pub(crate) fn len(&self) -> usize {
        self.buf[..self.pos].iter().map(|c| c.len_utf8()).sum()
    }

    pub(crate) fn reset(&mut self) {
        self.pos = 0;
        self.width = 0;
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn restore(&mut self, generation: u64, pos: usize, width: usize) -> bool {
        if generation != self.generation || pos > self.buf.len() {
            trace!(
                "stale checkpoint: generation {} vs {}",
                generation,
                self.generation
            );

            return false;
        }

        self.pos = pos;
        self.width = width;

        true
    }

    pub(crate) fn slice(&self, generation: u64, start: usize) -> Option<(Cow<'static, str>, usize)> {
        if generation != self.generation || start > self.pos {
            trace!("stale sub-view slice rejected");

            return None;
        }

        Some((
            Cow::Owned(self.buf[start..self.pos].iter().collect()),
            self.pos,
        ))
    }

    pub(crate) fn span_len(&self, generation: u64, start: usize) -> usize {
        if generation != self.generation || start > self.pos {
            return 0;
        }

        self.buf[start..self.pos].iter().map(|c| c.len_utf8()).sum()
    }
}
