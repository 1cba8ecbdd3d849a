//! Receive ring buffer: single-producer/single-consumer byte queue.
//!
//! The producer is the receive-completion upcall, the consumer is the
//! main-loop parser. Safety rests on the single-writer-per-index
//! discipline: only `push` advances `head`, only `pop` advances `tail`,
//! and a written slot is never mutated before it is consumed. No lock
//! is used or needed.

/// Fixed-capacity circular byte queue.
///
/// `N` must be a power of two so the index wrap is a mask instead of a
/// division. One slot is sacrificed to distinguish full from empty, so
/// the usable capacity is `N - 1`.
///
/// A push into a full ring drops the byte silently: at this layer there
/// is no backpressure to apply and no error channel to surface it on.
#[derive(Debug)]
pub struct ByteRing<const N: usize> {
    buf: [u8; N],
    /// Producer cursor; next slot to write.
    head: usize,
    /// Consumer cursor; next slot to read.
    tail: usize,
}

impl<const N: usize> ByteRing<N> {
    /// Create an empty ring.
    #[must_use]
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "ring capacity must be a power of two");
        Self {
            buf: [0; N],
            head: 0,
            tail: 0,
        }
    }

    /// Usable capacity (one slot is sacrificed for the full check).
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Number of buffered bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail) & (N - 1)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        (self.head + 1) & (N - 1) == self.tail
    }

    /// Append one byte. Producer-side only.
    ///
    /// Returns `false` if the ring was full and the byte was dropped.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        let next = (self.head + 1) & (N - 1);
        if next == self.tail {
            return false;
        }
        self.buf[self.head] = byte;
        self.head = next;
        true
    }

    /// Remove and return the oldest byte. Consumer-side only.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        if self.tail == self.head {
            return None;
        }
        let byte = self.buf[self.tail];
        self.tail = (self.tail + 1) & (N - 1);
        Some(byte)
    }

    /// Reset to the freshly-initialized state.
    ///
    /// Part of link-error recovery; not a steady-state operation.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}

impl<const N: usize> Default for ByteRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
