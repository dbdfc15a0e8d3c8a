use std::{borrow::Cow, io};

use super::{utf8, ReplayBuffer, Source};

/// A character source over an `io::Read` stream.
///
/// Characters are decoded lazily, one per `next`, through a small carry
/// buffer that holds the bytes of a sequence split across read calls. Every
/// decoded character is recorded in the replay buffer so that `backup`,
/// checkpoint restoration and sub-views work without re-reading the stream.
/// Read errors degrade to end of input.
#[derive(Debug)]
pub(crate) struct ReadSource<R> {
    reader: R,
    carry: [u8; 4],
    carry_len: usize,
    exhausted: bool,
    chars: ReplayBuffer,
}

impl<R: io::Read> ReadSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            carry: [0; 4],
            carry_len: 0,
            exhausted: false,
            chars: ReplayBuffer::default(),
        }
    }

    fn take_raw(&mut self) -> char {
        let b = self.carry[0];
        self.consume_carry(1);

        char::from(b)
    }

    fn consume_carry(&mut self, n: usize) {
        self.carry.copy_within(n..self.carry_len, 0);
        self.carry_len -= n;
    }

    /// Decode the next character from the carry buffer, topping it up from
    /// the reader as needed.
    fn read_char(&mut self) -> Option<char> {
        loop {
            if self.carry_len > 0 {
                let want = utf8::leading_len(self.carry[0]);

                if want == 0 {
                    return Some(self.take_raw());
                }

                if self.carry_len >= want {
                    if let Some(c) = std::str::from_utf8(&self.carry[..want])
                        .ok()
                        .and_then(|s| s.chars().next())
                    {
                        self.consume_carry(want);

                        return Some(c);
                    }

                    return Some(self.take_raw());
                }

                if self.exhausted {
                    // A sequence truncated by end of input.
                    return Some(self.take_raw());
                }
            } else if self.exhausted {
                return None;
            }

            match self.reader.read(&mut self.carry[self.carry_len..]) {
                Ok(0) => self.exhausted = true,
                Ok(n) => self.carry_len += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) => self.exhausted = true,
            }
        }
    }
}

impl<'h, R: io::Read> Source<'h> for ReadSource<R> {
    fn next(&mut self) -> Option<char> {
        if let Some(c) = self.chars.replay_next() {
            return Some(c);
        }

        match self.read_char() {
            Some(c) => {
                self.chars.push(c);

                Some(c)
            }
            None => {
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
