//! RelayController: wires the receive ring, framer, dispatcher, and
//! outbound queue together behind the hardware seams.

use relay_proto::{ForwardFrame, Framer, Packet};

use crate::link::{ForwardLink, LinkError, RelayBank};
use crate::queue::ForwardQueue;
use crate::ring::ByteRing;

/// Receive ring size in bytes (power of two; usable capacity is one less).
pub const RX_RING_SIZE: usize = 256;

/// Forward queue depth in frames (power of two; usable capacity is one less).
pub const FORWARD_QUEUE_DEPTH: usize = 16;

/// The bridge core: byte stream in, relay updates and forward frames out.
///
/// The controller is single-threaded by construction. Its entry points
/// map onto the firmware's execution contexts:
///
/// - [`on_rx_byte`](Self::on_rx_byte) - receive-completion upcall
///   (producer side of the ring);
/// - [`poll`](Self::poll) - one cooperative main-loop iteration
///   (consumer side; never blocks);
/// - [`on_forward_tx_complete`](Self::on_forward_tx_complete) -
///   forward-link transmit-completion upcall;
/// - [`on_link_error`](Self::on_link_error) - host-link hardware fault
///   upcall; performs the full state reset.
///
/// All failure handling is local recovery: overruns drop, framing loss
/// resyncs, hardware faults reset. Nothing is surfaced to a caller -
/// the core is a best-effort, continuously self-healing stream
/// processor, not a transactional endpoint. Drop counters are kept for
/// diagnostics only.
#[derive(Debug)]
pub struct RelayController<B> {
    rx: ByteRing<RX_RING_SIZE>,
    framer: Framer,
    queue: ForwardQueue<FORWARD_QUEUE_DEPTH>,
    bank: B,
    relay_mask: u32,
    rx_dropped: u32,
    forward_dropped: u32,
}

impl<B: RelayBank> RelayController<B> {
    /// Create a controller around a relay bank, all state zeroed.
    #[must_use]
    pub fn new(bank: B) -> Self {
        Self {
            rx: ByteRing::new(),
            framer: Framer::new(),
            queue: ForwardQueue::new(),
            bank,
            relay_mask: 0,
            rx_dropped: 0,
            forward_dropped: 0,
        }
    }

    /// Receive-completion upcall: buffer one byte from the host link.
    ///
    /// Never blocks; a full ring drops the byte.
    #[inline]
    pub fn on_rx_byte(&mut self, byte: u8) {
        if !self.rx.push(byte) {
            self.rx_dropped = self.rx_dropped.saturating_add(1);
        }
    }

    /// One cooperative main-loop iteration.
    ///
    /// Drains every buffered byte through the framer in arrival order,
    /// dispatches each recognized packet, then runs a single forward
    /// queue drain step. Never waits.
    pub fn poll<F: ForwardLink>(&mut self, forward: &mut F) {
        while let Some(byte) = self.rx.pop() {
            if let Some(packet) = self.framer.push_byte(byte) {
                self.dispatch(packet);
            }
        }

        if let Some(frame) = self.queue.start_next() {
            forward.issue(&frame);
        }
    }

    /// Apply a decoded packet: relay update plus forward enqueues.
    fn dispatch(&mut self, packet: Packet) {
        // Both packet kinds command the whole bank; the mask is fully
        // computed before the collaborator sees it.
        let mask = packet.relay_mask();
        self.relay_mask = mask;
        self.bank.apply(mask);

        if let Packet::Data(data) = packet {
            for (i, pair) in data.channels.iter().enumerate() {
                let frame = ForwardFrame::new((i + 1) as u8, pair[0], pair[1]);
                if !self.queue.enqueue(frame) {
                    self.forward_dropped = self.forward_dropped.saturating_add(1);
                }
            }
        }
    }

    /// Forward-link transmit-completion upcall: retire the in-flight
    /// frame so the next [`poll`](Self::poll) can issue the next one.
    #[inline]
    pub fn on_forward_tx_complete(&mut self) {
        self.queue.complete();
    }

    /// Host-link hardware fault upcall: full state reset.
    ///
    /// Framing state accumulated before a fault cannot be trusted, so
    /// recovery is a reset of ring, window, and queue rather than
    /// anything incremental. The caller must have the receive path
    /// quiesced for the duration. The physical relay outputs are left
    /// as they are.
    pub fn on_link_error(&mut self, _error: LinkError) {
        self.rx.clear();
        self.framer.reset();
        self.queue.clear();
    }

    /// The last fully-applied relay mask.
    #[inline]
    #[must_use]
    pub const fn relay_mask(&self) -> u32 {
        self.relay_mask
    }

    /// Bytes dropped by the receive ring since startup.
    #[inline]
    #[must_use]
    pub const fn rx_dropped(&self) -> u32 {
        self.rx_dropped
    }

    /// Frames dropped by the forward queue since startup.
    #[inline]
    #[must_use]
    pub const fn forward_dropped(&self) -> u32 {
        self.forward_dropped
    }

    /// Frames waiting on the forward queue, including one in flight.
    #[inline]
    #[must_use]
    pub const fn forward_backlog(&self) -> usize {
        self.queue.len()
    }

    /// Get a reference to the relay bank.
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Get a mutable reference to the relay bank.
    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    /// Decompose the controller, returning the relay bank.
    pub fn into_bank(self) -> B {
        self.bank
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    const STATUS_FRAME: [u8; 3] = [0x99, 0xA5, 0x05];
    const DATA_FRAME: [u8; 15] = [
        0xA5, 0x99, 0x01, 0x02, 0x03, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13,
    ];

    /// Records every mask applied to the physical outputs.
    #[derive(Default)]
    struct MockBank {
        applied: Vec<u32>,
    }

    impl RelayBank for MockBank {
        fn apply(&mut self, mask: u32) {
            self.applied.push(mask);
        }
    }

    /// Records every frame issued on the forward link.
    #[derive(Default)]
    struct MockForward {
        issued: Vec<[u8; 4]>,
    }

    impl ForwardLink for MockForward {
        fn issue(&mut self, frame: &[u8; 4]) {
            self.issued.push(*frame);
        }
    }

    fn feed(controller: &mut RelayController<MockBank>, bytes: &[u8]) {
        for &b in bytes {
            controller.on_rx_byte(b);
        }
    }

    #[test]
    fn status_packet_updates_relays_only() {
        let mut controller = RelayController::new(MockBank::default());
        let mut forward = MockForward::default();

        feed(&mut controller, &STATUS_FRAME);
        controller.poll(&mut forward);

        assert_eq!(controller.bank().applied, [0x00_0005]);
        assert_eq!(controller.relay_mask(), 0x00_0005);
        assert!(forward.issued.is_empty());
        assert_eq!(controller.forward_backlog(), 0);
    }

    #[test]
    fn data_packet_updates_relays_and_queues_channels() {
        let mut controller = RelayController::new(MockBank::default());
        let mut forward = MockForward::default();

        feed(&mut controller, &DATA_FRAME);
        controller.poll(&mut forward);

        assert_eq!(controller.bank().applied, [0x03_0201]);
        // One drain step per poll: the first channel goes out, the
        // rest wait for their completions.
        assert_eq!(forward.issued, [[0xBB, 1, 0x0A, 0x0B]]);
        assert_eq!(controller.forward_backlog(), 5);

        // Walk the completions through; strict FIFO, one in flight.
        for _ in 0..5 {
            controller.on_forward_tx_complete();
            controller.poll(&mut forward);
        }
        assert_eq!(
            forward.issued,
            [
                [0xBB, 1, 0x0A, 0x0B],
                [0xBB, 2, 0x0C, 0x0D],
                [0xBB, 3, 0x0E, 0x0F],
                [0xBB, 4, 0x10, 0x11],
                [0xBB, 5, 0x12, 0x13],
            ]
        );
        assert_eq!(controller.forward_backlog(), 0);
    }

    #[test]
    fn polls_without_completion_do_not_reissue() {
        let mut controller = RelayController::new(MockBank::default());
        let mut forward = MockForward::default();

        feed(&mut controller, &DATA_FRAME);
        controller.poll(&mut forward);
        controller.poll(&mut forward);
        controller.poll(&mut forward);

        // Single-flight: the issued frame stays outstanding until the
        // completion upcall arrives.
        assert_eq!(forward.issued.len(), 1);
    }

    #[test]
    fn stalled_peer_fills_queue_and_drops_newest() {
        let mut controller = RelayController::new(MockBank::default());
        let mut forward = MockForward::default();

        // Never completing transmissions: each data packet adds 5
        // frames until the queue caps out, then frames drop.
        for _ in 0..4 {
            feed(&mut controller, &DATA_FRAME);
            controller.poll(&mut forward);
        }

        assert_eq!(controller.forward_backlog(), FORWARD_QUEUE_DEPTH - 1);
        assert_eq!(controller.forward_dropped(), 20 - (FORWARD_QUEUE_DEPTH as u32 - 1));
        // Relay updates were never held up by the stalled peer.
        assert_eq!(controller.bank().applied.len(), 4);
    }

    #[test]
    fn garbled_stream_recovers_between_packets() {
        let mut controller = RelayController::new(MockBank::default());
        let mut forward = MockForward::default();

        let mut stream = Vec::new();
        stream.extend_from_slice(&[0x10, 0x20, 0x30]); // line noise
        stream.extend_from_slice(&STATUS_FRAME);
        stream.extend_from_slice(&std::vec![0x44u8; 25]); // more noise than the window
        stream.extend_from_slice(&DATA_FRAME);

        feed(&mut controller, &stream);
        controller.poll(&mut forward);

        assert_eq!(controller.bank().applied, [0x00_0005, 0x03_0201]);
    }

    #[test]
    fn bytes_beyond_ring_capacity_are_dropped_not_corrupted() {
        let mut controller = RelayController::new(MockBank::default());
        let mut forward = MockForward::default();

        // Overfill the ring with noise without polling in between.
        for _ in 0..RX_RING_SIZE + 50 {
            controller.on_rx_byte(0x00);
        }
        assert_eq!(controller.rx_dropped(), 51);
        controller.poll(&mut forward);

        // Flush the noise residue still sitting in the framer window,
        // then a clean frame decodes normally.
        let residue = (RX_RING_SIZE - 1) % relay_proto::WINDOW_CAPACITY;
        for _ in 0..relay_proto::WINDOW_CAPACITY - residue {
            controller.on_rx_byte(0x00);
        }
        controller.poll(&mut forward);
        feed(&mut controller, &STATUS_FRAME);
        controller.poll(&mut forward);
        assert_eq!(controller.bank().applied, [0x00_0005]);
    }

    #[test]
    fn link_error_resets_all_core_state() {
        let mut controller = RelayController::new(MockBank::default());
        let mut forward = MockForward::default();

        // Reach a busy state: partial frame buffered, queue in flight.
        feed(&mut controller, &DATA_FRAME);
        controller.poll(&mut forward);
        feed(&mut controller, &DATA_FRAME[..7]);

        controller.on_link_error(LinkError::Overrun);

        assert_eq!(controller.forward_backlog(), 0);
        // A late completion for the abandoned transmit is ignored.
        controller.on_forward_tx_complete();
        assert_eq!(controller.forward_backlog(), 0);

        // The partial frame is gone: a fresh stream decodes cleanly.
        forward.issued.clear();
        feed(&mut controller, &STATUS_FRAME);
        controller.poll(&mut forward);
        assert_eq!(controller.relay_mask(), 0x00_0005);

        // Physical outputs were not touched by the reset itself.
        assert_eq!(controller.bank().applied, [0x03_0201, 0x00_0005]);
    }
}
