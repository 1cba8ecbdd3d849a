//! Serial relay-bridge protocol: packet types, framing, and frame encoding.
//!
//! This crate is the chip-agnostic wire layer of the relay bridge. It
//! knows nothing about UARTs or GPIO; it turns raw bytes into packets
//! and packets into outbound frames, and can be tested entirely on host.
//!
//! # Inbound protocol (host link)
//!
//! The host sends a raw byte stream with two fixed-length frame shapes,
//! distinguished by a two-byte header signature. There is no delimiter,
//! no checksum, and no acknowledgment.
//!
//! **Status frame** (3 bytes) - first relay group only:
//! ```text
//! 0x99 0xA5 <mask>
//! ```
//!
//! **Data frame** (15 bytes) - full relay bank plus forward channels:
//! ```text
//! 0xA5 0x99 <relays0> <relays1> <relays2> <ch1 hi> <ch1 lo> ... <ch5 hi> <ch5 lo>
//! ```
//!
//! Because the stream is unreliable and may be joined mid-frame, the
//! [`Framer`] reassembles packets from arbitrary byte boundaries and
//! resynchronizes on garbage by scanning for the next header signature
//! within a bounded window.
//!
//! # Outbound frames
//!
//! - [`ForwardFrame`] - 4 bytes relayed to the downstream peer, one per
//!   decoded data channel.
//! - [`HostFrame`] - 3 bytes sent upstream by the discrete-input sampler.
//! - [`SinkFrame`] - 4 bytes of one-way periodic telemetry.
//!
//! # Example
//!
//! ```
//! use relay_proto::{Framer, Packet};
//!
//! let mut framer = Framer::new();
//! let mut decoded = None;
//! for &byte in &[0x99, 0xA5, 0x05] {
//!     if let Some(packet) = framer.push_byte(byte) {
//!         decoded = Some(packet);
//!     }
//! }
//! match decoded {
//!     Some(Packet::Status(status)) => assert_eq!(status.relay_mask(), 0x00_0005),
//!     other => panic!("expected status packet, got {:?}", other),
//! }
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod framer;
pub mod packet;
pub mod wire;

pub use framer::{Framer, WINDOW_CAPACITY};
pub use packet::{
    DataPacket, Packet, StatusPacket, CHANNEL_COUNT, DATA_FRAME_LEN, DATA_HEADER, RELAY_COUNT,
    RELAY_MASK_ALL, STATUS_FRAME_LEN, STATUS_HEADER,
};
pub use wire::{
    ForwardFrame, HostFrame, SinkFrame, FORWARD_FRAME_LEN, FORWARD_MARKER, HOST_FRAME_LEN,
    SINK_FRAME_LEN,
};
