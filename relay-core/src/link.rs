//! Hardware seams: the traits the controller drives and the
//! fire-and-forget transmit helper for the host and sink links.

use relay_proto::FORWARD_FRAME_LEN;

/// Error classification for host-link hardware faults.
///
/// Delivered as an upcall from the receive path; the controller answers
/// every variant the same way (full state reset), the classification
/// exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Hardware receive overrun.
    Overrun,
    /// Noise detected on the line.
    Noise,
    /// UART framing fault (bad stop bit).
    Framing,
}

/// The physical relay-output collaborator.
///
/// `apply` sets all outputs to match the mask - atomically from the
/// controller's point of view - and is assumed synchronous and always
/// succeeding. The controller never issues partial or bitwise updates.
pub trait RelayBank {
    /// Drive the outputs to `mask`: bit n high = relay n energized.
    fn apply(&mut self, mask: u32);
}

/// Non-blocking transmit issue on the forward-peer link.
///
/// `issue` must start the transmission and return immediately; the
/// matching completion is reported back to the controller via
/// [`RelayController::on_forward_tx_complete`].
///
/// [`RelayController::on_forward_tx_complete`]: crate::RelayController::on_forward_tx_complete
pub trait ForwardLink {
    fn issue(&mut self, frame: &[u8; FORWARD_FRAME_LEN]);
}

/// Fire-and-forget transmit buffer for the host and sink links.
///
/// The transmit primitives on these links are asynchronous, so the
/// caller's bytes may not outlive the call; `load` copies them into
/// this link-owned buffer and returns the stable slice to hand to the
/// hardware.
///
/// There is no queue and no completion tracking: loading again before
/// the previous transmit finishes is a caller contract violation. That
/// is acceptable here because both links are driven at a fixed cadence
/// well below the transmit time; the forward-peer link has no such
/// guarantee, which is why it gets a real queue instead.
#[derive(Debug)]
pub struct OneShotTx<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> OneShotTx<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: [0; N] }
    }

    /// Copy `bytes` into the link-owned buffer and return it for the
    /// transmit issue.
    pub fn load(&mut self, bytes: [u8; N]) -> &[u8; N] {
        self.buf = bytes;
        &self.buf
    }
}

impl<const N: usize> Default for OneShotTx<N> {
    fn default() -> Self {
        Self::new()
    }
}
