//! Bounded outbound queue for the forward-peer link.
//!
//! The dispatcher produces frames faster than the peer link can drain
//! them, and the transmit primitive is fire-and-issue with completion
//! signaled asynchronously. This queue serializes transmissions so at
//! most one is ever outstanding, in strict FIFO order, without the main
//! loop ever blocking. A full queue drops new frames, the same overrun
//! policy as the receive ring.

use relay_proto::{ForwardFrame, FORWARD_FRAME_LEN};

/// Circular queue of encoded forward frames with a single-in-flight guard.
///
/// Same index convention as the receive ring: one slot sacrificed, so
/// usable capacity is `M - 1`. The `busy` flag is set when a transmit
/// is issued ([`start_next`](ForwardQueue::start_next)) and cleared
/// only by the matching completion ([`complete`](ForwardQueue::complete));
/// the tail does not advance until then, so an issued frame is never
/// lost or repeated.
#[derive(Debug)]
pub struct ForwardQueue<const M: usize> {
    frames: [[u8; FORWARD_FRAME_LEN]; M],
    head: usize,
    tail: usize,
    busy: bool,
}

impl<const M: usize> ForwardQueue<M> {
    /// Create an empty queue with no transmit outstanding.
    #[must_use]
    pub const fn new() -> Self {
        assert!(M.is_power_of_two(), "queue depth must be a power of two");
        Self {
            frames: [[0; FORWARD_FRAME_LEN]; M],
            head: 0,
            tail: 0,
            busy: false,
        }
    }

    /// Usable capacity (one slot is sacrificed for the full check).
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        M - 1
    }

    /// Number of queued frames, including one in flight.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail) & (M - 1)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Whether a transmit is currently outstanding.
    #[inline]
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.busy
    }

    /// Enqueue a frame for transmission.
    ///
    /// Returns `false` if the queue was full and the frame was dropped;
    /// already-queued frames are never disturbed.
    pub fn enqueue(&mut self, frame: ForwardFrame) -> bool {
        let next = (self.head + 1) & (M - 1);
        if next == self.tail {
            return false;
        }
        self.frames[self.head] = frame.encode();
        self.head = next;
        true
    }

    /// One drain step: claim the next frame for transmission.
    ///
    /// No-op while a transmit is outstanding or the queue is empty.
    /// On success the `busy` guard is set and the frame at the tail is
    /// returned; the tail itself is not advanced until
    /// [`complete`](ForwardQueue::complete) confirms the transmit.
    pub fn start_next(&mut self) -> Option<[u8; FORWARD_FRAME_LEN]> {
        if self.busy || self.is_empty() {
            return None;
        }
        self.busy = true;
        Some(self.frames[self.tail])
    }

    /// Transmit-complete upcall: retire the in-flight frame.
    ///
    /// A completion with nothing in flight is ignored; it can only be
    /// the echo of a transmission retired by a state reset.
    pub fn complete(&mut self) {
        if !self.busy {
            return;
        }
        self.tail = (self.tail + 1) & (M - 1);
        self.busy = false;
    }

    /// Reset to the freshly-initialized state.
    ///
    /// Part of link-error recovery; any in-flight frame is abandoned.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.busy = false;
    }
}

impl<const M: usize> Default for ForwardQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}
