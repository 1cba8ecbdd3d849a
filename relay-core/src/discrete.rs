//! Discrete-input sampling: line map, polarity, and report encoding.
//!
//! The sampler reads a handful of digital inputs at a fixed cadence and
//! reports one of them upstream as a 1-byte value in a
//! [`HostFrame::discrete_report`](relay_proto::HostFrame::discrete_report).
//! Electrical polarity differs between hardware revisions, so it is
//! configuration rather than code: one parameterization instead of two
//! divergent source variants.

/// Number of sampled discrete lines.
pub const DISCRETE_LINE_COUNT: usize = 3;

/// Electrical polarity of a discrete line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Line is asserted when the pin reads high.
    ActiveHigh,
    /// Line is asserted when the pin reads low.
    ActiveLow,
}

impl Polarity {
    /// Whether a line with this polarity is asserted at the given pin level.
    #[inline]
    #[must_use]
    pub const fn asserted(self, pin_high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => pin_high,
            Polarity::ActiveLow => !pin_high,
        }
    }
}

/// Discrete-input configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiscreteConfig {
    /// Per-line electrical polarity.
    pub polarity: [Polarity; DISCRETE_LINE_COUNT],
    /// Which line feeds the upstream report value.
    pub report_line: usize,
}

impl Default for DiscreteConfig {
    /// The wiring of the last shipped hardware revision: the reported
    /// line is active-low, the others active-high. Boards wired the
    /// other way flip the polarity here instead of editing code.
    fn default() -> Self {
        Self {
            polarity: [Polarity::ActiveHigh, Polarity::ActiveHigh, Polarity::ActiveLow],
            report_line: 2,
        }
    }
}

/// Maps raw pin samples to asserted-line bits and the upstream report.
///
/// Stateless between samples; the periodic cadence lives in the
/// firmware, not here.
#[derive(Debug, Clone, Copy)]
pub struct DiscreteInputs {
    config: DiscreteConfig,
}

impl DiscreteInputs {
    #[must_use]
    pub const fn new(config: DiscreteConfig) -> Self {
        Self { config }
    }

    /// Asserted-line bits for a raw sample (bit n = pin n reads high).
    #[must_use]
    pub fn asserted(&self, raw: u8) -> u8 {
        let mut bits = 0u8;
        for (line, polarity) in self.config.polarity.iter().enumerate() {
            let pin_high = raw & (1 << line) != 0;
            if polarity.asserted(pin_high) {
                bits |= 1 << line;
            }
        }
        bits
    }

    /// The 1-byte value reported upstream: `0x01` when the configured
    /// report line is asserted, `0x00` otherwise.
    #[must_use]
    pub fn report_value(&self, raw: u8) -> u8 {
        let bits = self.asserted(raw);
        u8::from(bits & (1 << self.config.report_line) != 0)
    }
}

impl Default for DiscreteInputs {
    fn default() -> Self {
        Self::new(DiscreteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_report_line_is_active_low() {
        let inputs = DiscreteInputs::default();
        // Pin high on line 2 -> not asserted -> report 0.
        assert_eq!(inputs.report_value(0b100), 0x00);
        // Pin low on line 2 -> asserted -> report 1.
        assert_eq!(inputs.report_value(0b000), 0x01);
    }

    #[test]
    fn active_high_report_line() {
        let inputs = DiscreteInputs::new(DiscreteConfig {
            polarity: [Polarity::ActiveHigh; DISCRETE_LINE_COUNT],
            report_line: 2,
        });
        assert_eq!(inputs.report_value(0b100), 0x01);
        assert_eq!(inputs.report_value(0b000), 0x00);
    }

    #[test]
    fn asserted_applies_polarity_per_line() {
        let inputs = DiscreteInputs::new(DiscreteConfig {
            polarity: [Polarity::ActiveHigh, Polarity::ActiveLow, Polarity::ActiveHigh],
            report_line: 0,
        });
        // Line 0 high, line 1 high (not asserted), line 2 low.
        assert_eq!(inputs.asserted(0b011), 0b001);
        // Line 1 low is asserted.
        assert_eq!(inputs.asserted(0b000), 0b010);
    }

    #[test]
    fn other_lines_do_not_leak_into_the_report() {
        let inputs = DiscreteInputs::default();
        assert_eq!(inputs.report_value(0b011), 0x01);
        assert_eq!(inputs.report_value(0b111), 0x00);
    }
}
