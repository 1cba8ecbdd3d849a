//! Relay-mask helpers.
//!
//! The controller always applies fully-computed masks; these helpers
//! exist for diagnostics and the startup self-test, which drive the
//! bank directly.

use relay_proto::{RELAY_COUNT, RELAY_MASK_ALL};

/// Set one relay bit in a mask.
#[inline]
#[must_use]
pub const fn set(mask: u32, relay: u8) -> u32 {
    mask | 1 << relay
}

/// Clear one relay bit in a mask.
#[inline]
#[must_use]
pub const fn clear(mask: u32, relay: u8) -> u32 {
    mask & !(1 << relay)
}

/// Whether one relay is energized in a mask.
#[inline]
#[must_use]
pub const fn is_energized(mask: u32, relay: u8) -> bool {
    mask & (1 << relay) != 0
}

/// Mask sequence for the startup sweep self-test: energize one more
/// relay per step until the whole bank is on, then everything off.
pub fn sweep_masks() -> impl Iterator<Item = u32> {
    (0..RELAY_COUNT as u32)
        .map(|i| (1u32 << (i + 1)) - 1)
        .chain(core::iter::once(0))
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    #[test]
    fn set_clear_roundtrip() {
        let mask = set(0, 23);
        assert!(is_energized(mask, 23));
        assert_eq!(clear(mask, 23), 0);
    }

    #[test]
    fn sweep_grows_by_one_relay_and_ends_dark() {
        let masks: Vec<u32> = sweep_masks().collect();
        assert_eq!(masks.len(), RELAY_COUNT + 1);
        assert_eq!(masks[0], 0b1);
        assert_eq!(masks[RELAY_COUNT - 1], RELAY_MASK_ALL);
        assert_eq!(*masks.last().unwrap(), 0);
        for pair in masks[..RELAY_COUNT].windows(2) {
            assert_eq!(pair[1], pair[0] << 1 | 1);
        }
    }
}
