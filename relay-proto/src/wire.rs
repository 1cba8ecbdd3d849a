//! Outbound frame encoders for the three transmit links.
//!
//! All outbound traffic is fixed-size: encoders return arrays, never
//! write through pointers, so the caller owns the transmit lifetime.

/// Marker byte prefixed to every forward-peer frame.
pub const FORWARD_MARKER: u8 = 0xBB;

/// Length of a forward-peer frame.
pub const FORWARD_FRAME_LEN: usize = 4;

/// Length of a host-link outbound frame.
pub const HOST_FRAME_LEN: usize = 3;

/// Length of a sink-link telemetry frame.
pub const SINK_FRAME_LEN: usize = 4;

/// A frame relayed to the downstream forward peer.
///
/// One is enqueued per channel pair of a decoded Data packet, tagged
/// with the channel's 1-based device id.
///
/// Wire format: `0xBB <device_id> <data1> <data2>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ForwardFrame {
    pub device_id: u8,
    pub data1: u8,
    pub data2: u8,
}

impl ForwardFrame {
    #[must_use]
    pub const fn new(device_id: u8, data1: u8, data2: u8) -> Self {
        Self {
            device_id,
            data1,
            data2,
        }
    }

    /// Encode to the on-wire byte layout.
    #[inline]
    #[must_use]
    pub const fn encode(self) -> [u8; FORWARD_FRAME_LEN] {
        [FORWARD_MARKER, self.device_id, self.data1, self.data2]
    }
}

/// A frame sent upstream on the host link.
///
/// Issued at a fixed cadence by the discrete-input sampler, not by the
/// framing core.
///
/// Wire format: `<device_id> <data1> <data2>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostFrame {
    pub device_id: u8,
    pub data1: u8,
    pub data2: u8,
}

impl HostFrame {
    #[must_use]
    pub const fn new(device_id: u8, data1: u8, data2: u8) -> Self {
        Self {
            device_id,
            data1,
            data2,
        }
    }

    /// The periodic discrete-input report: `0x99 0xA5 <value>`.
    ///
    /// Deliberately shaped like a Status frame so the host's own parser
    /// can reuse its framing.
    #[must_use]
    pub const fn discrete_report(value: u8) -> Self {
        Self::new(0x99, 0xA5, value)
    }

    /// Encode to the on-wire byte layout.
    #[inline]
    #[must_use]
    pub const fn encode(self) -> [u8; HOST_FRAME_LEN] {
        [self.device_id, self.data1, self.data2]
    }
}

/// A one-way telemetry frame for the sink link.
///
/// Wire format: `<header> <id> <data> <data1>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SinkFrame {
    pub header: u8,
    pub id: u8,
    pub data: u8,
    pub data1: u8,
}

impl SinkFrame {
    #[must_use]
    pub const fn new(header: u8, id: u8, data: u8, data1: u8) -> Self {
        Self {
            header,
            id,
            data,
            data1,
        }
    }

    /// The periodic sink heartbeat emitted every 300 ms.
    pub const HEARTBEAT: Self = Self::new(0xAA, 0x01, 0x04, 0xD2);

    /// Encode to the on-wire byte layout.
    #[inline]
    #[must_use]
    pub const fn encode(self) -> [u8; SINK_FRAME_LEN] {
        [self.header, self.id, self.data, self.data1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_frame_layout() {
        let frame = ForwardFrame::new(3, 0x0E, 0x0F);
        assert_eq!(frame.encode(), [0xBB, 0x03, 0x0E, 0x0F]);
    }

    #[test]
    fn host_discrete_report_layout() {
        assert_eq!(HostFrame::discrete_report(0x01).encode(), [0x99, 0xA5, 0x01]);
    }

    #[test]
    fn sink_heartbeat_layout() {
        assert_eq!(SinkFrame::HEARTBEAT.encode(), [0xAA, 0x01, 0x04, 0xD2]);
    }
}
