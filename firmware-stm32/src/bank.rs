//! GPIO relay bank: drives the 24 physical relay outputs.

use embassy_stm32::gpio::{Level, Output};
use embassy_time::{Duration, Timer};
use relay_core::{relay, RelayBank, RELAY_COUNT};

/// The physical relay bank.
///
/// Owns one push-pull output per relay, in relay-bit order (PC0-PC15,
/// PD0-PD3, PA4-PA7 on the reference board). `apply` drives every pin
/// from the mask on each call, so the outputs always reflect a single
/// fully-computed state, never an incremental edit.
pub struct GpioRelayBank {
    outputs: [Output<'static>; RELAY_COUNT],
}

impl GpioRelayBank {
    #[must_use]
    pub fn new(outputs: [Output<'static>; RELAY_COUNT]) -> Self {
        Self { outputs }
    }

    /// Walk the whole bank once: one more relay per step until all 24
    /// are energized, then everything off. Boot-time hardware check.
    pub async fn sweep(&mut self, step: Duration) {
        for mask in relay::sweep_masks() {
            self.apply(mask);
            Timer::after(step).await;
        }
    }
}

impl RelayBank for GpioRelayBank {
    fn apply(&mut self, mask: u32) {
        for (bit, output) in self.outputs.iter_mut().enumerate() {
            let level = if mask & (1 << bit) != 0 {
                Level::High
            } else {
                Level::Low
            };
            output.set_level(level);
        }
    }
}
