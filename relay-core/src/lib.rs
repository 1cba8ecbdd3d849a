//! Platform-agnostic relay-bridge core.
//!
//! This crate implements the concurrency-bearing heart of the serial
//! relay bridge without any chip-specific dependencies: it can run on
//! bare metal behind interrupt upcalls or on host under `cargo test`.
//!
//! # Overview
//!
//! The bridge arbitrates three serial links while driving a bank of 24
//! relay outputs: a host link delivering framed control packets, a
//! forward-peer link receiving relayed channel data, and a one-way
//! telemetry sink. The crate is organized into:
//!
//! - [`ring`]: receive ring buffer ([`ByteRing`]) fed by the receive
//!   upcall and drained by the main loop
//! - [`queue`]: bounded forward-peer transmit queue ([`ForwardQueue`])
//!   with a single-in-flight guard
//! - [`controller`]: the main-loop core ([`RelayController`]) tying
//!   ring, framing, dispatch, and queue together
//! - [`link`]: hardware seams ([`RelayBank`], [`ForwardLink`],
//!   [`OneShotTx`], [`LinkError`])
//! - [`discrete`]: discrete-input line map and report encoding
//! - [`relay`]: relay-mask helpers and the self-test sweep
//!
//! Packet framing itself lives in [`relay_proto`].
//!
//! # Execution model
//!
//! Single hardware thread with interrupt preemption, no OS. The
//! controller's entry points are partitioned by context - receive
//! upcall, transmit-complete upcall, cooperative main loop - and each
//! piece of shared state has exactly one writer per side, so no lock is
//! taken anywhere (taking one inside an interrupt context would be
//! unsafe anyway). Nothing in the core ever blocks: hardware I/O is
//! fire-and-issue, overruns drop, and a stalled peer fills the forward
//! queue without ever deadlocking the main loop.
//!
//! # Example
//!
//! ```
//! use relay_core::{ForwardLink, RelayBank, RelayController};
//!
//! struct Bank(u32);
//! impl RelayBank for Bank {
//!     fn apply(&mut self, mask: u32) {
//!         self.0 = mask;
//!     }
//! }
//!
//! struct Peer;
//! impl ForwardLink for Peer {
//!     fn issue(&mut self, _frame: &[u8; 4]) {
//!         // hand the bytes to the transmit hardware
//!     }
//! }
//!
//! let mut controller = RelayController::new(Bank(0));
//! let mut peer = Peer;
//! for &byte in &[0x99, 0xA5, 0x05] {
//!     controller.on_rx_byte(byte);
//! }
//! controller.poll(&mut peer);
//! assert_eq!(controller.relay_mask(), 0x00_0005);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod controller;
pub mod discrete;
pub mod link;
pub mod queue;
pub mod relay;
pub mod ring;

// Re-export main types at crate root
pub use controller::{RelayController, FORWARD_QUEUE_DEPTH, RX_RING_SIZE};
pub use discrete::{DiscreteConfig, DiscreteInputs, Polarity, DISCRETE_LINE_COUNT};
pub use link::{ForwardLink, LinkError, OneShotTx, RelayBank};
pub use queue::ForwardQueue;
pub use ring::ByteRing;

// Re-export the protocol layer so firmware crates only need one dependency.
pub use relay_proto::{
    DataPacket, ForwardFrame, Framer, HostFrame, Packet, SinkFrame, StatusPacket, RELAY_COUNT,
    RELAY_MASK_ALL,
};
