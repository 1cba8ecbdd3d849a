//! Serial relay bridge firmware for STM32F4.
//!
//! The board sits between three serial links and a bank of 24 relay
//! outputs:
//!
//! 1. Receives framed control packets from the host link (USART1)
//! 2. Applies relay-state updates to the GPIO bank
//! 3. Relays decoded channel data to the forward peer (USART2), one
//!    frame in flight at a time
//! 4. Emits periodic discrete-input reports upstream and a telemetry
//!    heartbeat on the sink link (USART3)
//!
//! # Hardware Configuration
//!
//! | Function        | Pins           | Description                     |
//! |-----------------|----------------|---------------------------------|
//! | USART1 (host)   | PA9/PA10       | Inbound control, outbound reports |
//! | USART2 (forward)| PA2/PA3        | Relayed channel frames          |
//! | USART3 (sink)   | PB10/PB11      | One-way telemetry heartbeat     |
//! | Relays 0-15     | PC0-PC15       | Relay bank, group A/B           |
//! | Relays 16-19    | PD0-PD3        | Relay bank, group C (low)       |
//! | Relays 20-23    | PA4-PA7        | Relay bank, group C (high)      |
//! | Discrete inputs | PB13-PB15      | Sampled lines                   |
//! | LED             | PB0            | Sampler heartbeat               |
//!
//! # Architecture
//!
//! Embassy async runtime with one task per concern:
//!
//! - **Host rx task**: reads USART1 one byte at a time, forwards bytes
//!   and hardware faults to the bridge task
//! - **Bridge task**: owns the [`RelayController`]; drains bytes,
//!   dispatches packets, runs the forward-queue drain
//! - **Forward tx task**: performs the actual USART2 writes and reports
//!   completions back, preserving the single-in-flight discipline
//! - **Sampler task**: fixed-cadence discrete-input report (5 ms) and
//!   sink heartbeat (300 ms)
//!
//! Inter-task traffic uses Embassy's [`Channel`](embassy_sync::channel::Channel)
//! for the byte stream and [`Signal`](embassy_sync::signal::Signal) for
//! the single-slot transmit handoff and fault notifications.
//!
//! # Features
//!
//! - **`dev-panic`** (default): `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: `panic-reset` for production (silent watchdog reset)
//! - **`startup-sweep`**: walk all 24 relays once at boot before bridging

#![no_std]

// Re-export core types for convenience
pub use relay_core::{
    DiscreteConfig, DiscreteInputs, ForwardLink, Framer, HostFrame, LinkError, OneShotTx, Packet,
    Polarity, RelayBank, RelayController, SinkFrame, RELAY_COUNT,
};

pub mod bank;
pub mod board;

pub use bank::GpioRelayBank;
