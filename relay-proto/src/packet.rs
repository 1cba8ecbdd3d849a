//! Inbound packet types: Status and Data frames from the host link.

/// Header signature of a Status frame.
pub const STATUS_HEADER: [u8; 2] = [0x99, 0xA5];

/// Header signature of a Data frame.
pub const DATA_HEADER: [u8; 2] = [0xA5, 0x99];

/// Total length of a Status frame (header + 1 payload byte).
pub const STATUS_FRAME_LEN: usize = 3;

/// Total length of a Data frame (header + 3 relay bytes + 5 channel pairs).
pub const DATA_FRAME_LEN: usize = 15;

/// Number of forward channels carried by a Data frame.
pub const CHANNEL_COUNT: usize = 5;

/// Number of physical relay outputs driven by the bridge.
pub const RELAY_COUNT: usize = 24;

/// Mask covering every relay bit.
pub const RELAY_MASK_ALL: u32 = (1 << RELAY_COUNT) - 1;

/// Status packet: commands the first relay group only.
///
/// Wire format: `0x99 0xA5 <relays>`, one bit per relay 0-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusPacket {
    /// Relay bits 0-7, 1 = energized.
    pub relays: u8,
}

impl StatusPacket {
    /// Decode from a complete Status frame.
    ///
    /// The caller (the framer) has already matched the header.
    #[must_use]
    pub fn decode(frame: &[u8; STATUS_FRAME_LEN]) -> Self {
        debug_assert_eq!(frame[..2], STATUS_HEADER);
        Self { relays: frame[2] }
    }

    /// Full 24-bit relay mask commanded by this packet.
    ///
    /// Relay bits 8-23 are unconditionally cleared: a Status packet
    /// always commands the whole bank, never a partial update.
    #[inline]
    #[must_use]
    pub const fn relay_mask(self) -> u32 {
        self.relays as u32
    }
}

/// Data packet: commands all 24 relays and carries 5 forward channels.
///
/// Wire format: `0xA5 0x99` followed by 3 relay-group bytes and 5
/// two-byte channel pairs destined for the forward peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataPacket {
    /// Relay group bytes, little-endian across bits 0-23.
    pub relays: [u8; 3],
    /// Channel payload pairs, relayed to the forward peer as-is.
    pub channels: [[u8; 2]; CHANNEL_COUNT],
}

impl DataPacket {
    /// Decode from a complete Data frame.
    ///
    /// The caller (the framer) has already matched the header.
    #[must_use]
    pub fn decode(frame: &[u8; DATA_FRAME_LEN]) -> Self {
        debug_assert_eq!(frame[..2], DATA_HEADER);
        let mut channels = [[0u8; 2]; CHANNEL_COUNT];
        for (i, pair) in channels.iter_mut().enumerate() {
            pair[0] = frame[5 + i * 2];
            pair[1] = frame[6 + i * 2];
        }
        Self {
            relays: [frame[2], frame[3], frame[4]],
            channels,
        }
    }

    /// Full 24-bit relay mask commanded by this packet.
    #[inline]
    #[must_use]
    pub const fn relay_mask(self) -> u32 {
        self.relays[0] as u32 | (self.relays[1] as u32) << 8 | (self.relays[2] as u32) << 16
    }
}

/// A decoded inbound packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Packet {
    /// Status frame (relays 0-7).
    Status(StatusPacket),
    /// Data frame (all relays + forward channels).
    Data(DataPacket),
}

impl Packet {
    /// Full 24-bit relay mask commanded by this packet.
    ///
    /// Both packet kinds command the complete bank; the physical output
    /// is always applied from a fully computed mask, never bitwise.
    #[inline]
    #[must_use]
    pub const fn relay_mask(self) -> u32 {
        match self {
            Packet::Status(status) => status.relay_mask(),
            Packet::Data(data) => data.relay_mask(),
        }
    }
}
