//! Pulse Edges to Symbols
//!
//! ## Overview
//!
//! AcuRite transmitters key the carrier with pulse-width modulation. Every
//! bit is a high pulse whose *width* carries the value, followed by a low gap;
//! frames are introduced by a train of long, symmetric sync periods:
//!
//! ```text
//!         sync        sync        sync     bit 1   bit 0
//!      ┌─────┐     ┌─────┐     ┌─────┐     ┌───┐   ┌─┐
//!  ────┘600us└─────┘     └─────┘     └─────┘400└───┘ └──── ...
//!              600us       600us       600us    200  400
//! ```
//!
//! The decoder classifies one edge at a time against three tolerance bands.
//! It keeps only the level of the previous edge, so it is cheap enough to run
//! from a pin-change interrupt.
//!
//! | Edge level | Sync band  | One band   | Zero band  |
//! |------------|------------|------------|------------|
//! | high       | `SyncMark` | `Bit(1)`   | `Bit(0)`   |
//! | low        | `Sync`     | `Gap`      | `Gap`      |
//!
//! A duration outside every band, or a repeated level, is a
//! [`DecodeError::Desync`].

use crate::constants::timing::{
    ONE_PULSE_US, PULSE_TOLERANCE_US, SYNC_PULSE_US, ZERO_PULSE_US,
};
use crate::errors::{ConfigError, ConfigResult, DecodeError, DecodeResult};

/// One level period reported by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseEdge {
    /// Carrier on (`true`) or off
    pub level: bool,
    /// How long the level was held, in microseconds
    pub duration_us: u32,
}

impl PulseEdge {
    /// Carrier-on period
    pub const fn high(duration_us: u32) -> Self {
        Self { level: true, duration_us }
    }

    /// Carrier-off period
    pub const fn low(duration_us: u32) -> Self {
        Self { level: false, duration_us }
    }

    /// From the signed convention used by raw-timing receivers
    ///
    /// Positive durations are high, negative durations are low.
    pub const fn from_signed(duration_us: i32) -> Self {
        Self {
            level: duration_us > 0,
            duration_us: duration_us.unsigned_abs(),
        }
    }
}

/// Tolerance bands used to classify pulse widths
///
/// A duration `d` falls in a band when `|d - nominal| < tolerance_us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SymbolTiming {
    /// Nominal sync half-period
    pub sync_us: u32,
    /// Nominal width of a `1` bit
    pub one_us: u32,
    /// Nominal width of a `0` bit
    pub zero_us: u32,
    /// Half-width of every band, exclusive
    pub tolerance_us: u32,
}

impl Default for SymbolTiming {
    fn default() -> Self {
        Self {
            sync_us: SYNC_PULSE_US,
            one_us: ONE_PULSE_US,
            zero_us: ZERO_PULSE_US,
            tolerance_us: PULSE_TOLERANCE_US,
        }
    }
}

impl SymbolTiming {
    /// Check that the bands are ordered and do not overlap
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tolerance_us == 0 {
            return Err(ConfigError::InvalidTiming { reason: "tolerance must be non-zero" });
        }
        if !(self.zero_us < self.one_us && self.one_us < self.sync_us) {
            return Err(ConfigError::InvalidTiming { reason: "expected zero < one < sync" });
        }
        let gap = 2 * self.tolerance_us;
        if self.one_us - self.zero_us < gap || self.sync_us - self.one_us < gap {
            return Err(ConfigError::InvalidTiming { reason: "tolerance bands overlap" });
        }
        Ok(())
    }

    /// Which band a duration falls in, if any
    pub fn classify(&self, duration_us: u32) -> Option<PulseClass> {
        let within = |nominal: u32| duration_us.abs_diff(nominal) < self.tolerance_us;
        if within(self.sync_us) {
            Some(PulseClass::Sync)
        } else if within(self.one_us) {
            Some(PulseClass::One)
        } else if within(self.zero_us) {
            Some(PulseClass::Zero)
        } else {
            None
        }
    }
}

/// Tolerance band a pulse landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseClass {
    /// Sync half-period
    Sync,
    /// Long pulse
    One,
    /// Short pulse
    Zero,
}

/// Classified edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Low half of a sync period; the preamble is counted on these
    Sync,
    /// High half of a sync period
    SyncMark,
    /// Data bit carried by a high pulse
    Bit(bool),
    /// Low gap between data bits
    Gap,
}

/// Edge-at-a-time symbol classifier
#[derive(Debug, Clone)]
pub struct SymbolDecoder {
    timing: SymbolTiming,
    last_level: Option<bool>,
}

impl SymbolDecoder {
    /// Create a decoder for the given bands
    pub const fn new(timing: SymbolTiming) -> Self {
        Self { timing, last_level: None }
    }

    /// Classify one edge
    ///
    /// At most one bit comes out per edge. The decoder stays usable after a
    /// desync; the next edge of the opposite level is classified normally.
    pub fn decode(&mut self, edge: PulseEdge) -> DecodeResult<Symbol> {
        let repeated = self.last_level == Some(edge.level);
        self.last_level = Some(edge.level);
        if repeated {
            return Err(DecodeError::Desync { duration_us: edge.duration_us });
        }

        let class = self
            .timing
            .classify(edge.duration_us)
            .ok_or(DecodeError::Desync { duration_us: edge.duration_us })?;

        Ok(match (edge.level, class) {
            (true, PulseClass::Sync) => Symbol::SyncMark,
            (false, PulseClass::Sync) => Symbol::Sync,
            (true, PulseClass::One) => Symbol::Bit(true),
            (true, PulseClass::Zero) => Symbol::Bit(false),
            (false, _) => Symbol::Gap,
        })
    }

    /// Forget the previous level
    pub fn reset(&mut self) {
        self.last_level = None;
    }

    /// Bands in use
    pub fn timing(&self) -> &SymbolTiming {
        &self.timing
    }
}

impl Default for SymbolDecoder {
    fn default() -> Self {
        Self::new(SymbolTiming::default())
    }
}
