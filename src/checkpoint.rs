use std::rc::Rc;

use log::trace;

use crate::internal::SharedSource;

/// A restorable capture of a [`crate::Tokeniser`]'s cursor position.
///
/// The capture is guarded by the source's generation stamp: it stays valid
/// until the next flush of the underlying source and fails softly afterwards,
/// because the flush discards the buffer region the capture refers to.
pub struct Checkpoint<'h> {
    source: SharedSource<'h>,
    generation: u64,
    pos: usize,
    width: usize,
}

impl<'h> Checkpoint<'h> {
    pub(crate) fn capture(source: &SharedSource<'h>) -> Self {
        let (generation, pos, width) = {
            let src = source.borrow();

            (src.generation(), src.pos(), src.width())
        };

        Self {
            source: Rc::clone(source),
            generation,
            pos,
            width,
        }
    }

    /// Return the cursor to the position it was in when this checkpoint was
    /// captured.
    ///
    /// Returns `false` without repositioning anything when the source has
    /// been flushed since capture.
    pub fn restore(&self) -> bool {
        let restored = self
            .source
            .borrow_mut()
            .restore(self.generation, self.pos, self.width);

        if !restored {
            trace!("checkpoint restore rejected: source flushed since capture");
        }

        restored
    }
}

impl std::fmt::Debug for Checkpoint<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkpoint")
            .field("generation", &self.generation)
            .field("pos", &self.pos)
            .field("width", &self.width)
            .finish()
    }
}
