//! Rain Accumulation
//!
//! ## Overview
//!
//! AcuRite rain sensors never transmit rainfall. They transmit a raw tip
//! counter that starts at zero when batteries go in and wraps at a
//! model-specific modulus (2^21 for the 899, 2^14 for the Iris, 2^9 for the
//! Atlas). Rainfall is the difference between consecutive counters.
//!
//! ```text
//! counter:  250 ───▶ 253 ───▶ 2        (modulus 255)
//! delta:    -        3        (2 - 253) mod 255 = 4
//! ```
//!
//! ## Baseline and Total
//!
//! - The **baseline** is the last raw counter seen. It is only ever replaced
//!   by a newer counter, never cleared, so deltas stay correct across a user
//!   reset of the totals.
//! - The **total** is rainfall since boot or the last
//!   [`reset`](RainAccumulator::reset), kept in whole tips so it does not
//!   drift from repeated float addition.
//!
//! ## Transmitter Resets
//!
//! A battery swap restarts the counter at zero. Read as a wrap, that is a
//! forward jump of almost the whole counter range. When the counter went
//! backwards and the wrapped delta is larger than half the modulus, it is
//! taken as a restart and the new counter value itself is the rain since the
//! restart. A counter that moved forward is always measured directly, however
//! far it moved.

use crate::buffer::RollingWindow;
use crate::constants::protocol::RAIN_TIP_MM;
use crate::constants::time::{
    DAY_WINDOW_BUCKETS, DAY_WINDOW_BUCKET_MS, HOUR_WINDOW_BUCKETS, HOUR_WINDOW_BUCKET_MS,
};
use crate::time::Timestamp;

/// Tips between two counter readings, modulo the counter range
///
/// ```rust
/// use acurite_core::rain::wrapping_delta;
///
/// assert_eq!(wrapping_delta(250, 253, 255), 3);
/// assert_eq!(wrapping_delta(253, 2, 255), 4);
/// ```
pub fn wrapping_delta(old: u32, new: u32, modulus: u32) -> u32 {
    if modulus == 0 {
        return new.wrapping_sub(old);
    }
    let (old, new) = (old % modulus, new % modulus);
    if new >= old {
        new - old
    } else {
        modulus - old + new
    }
}

/// Persistable part of a rain accumulator
///
/// Hosts that want totals to survive a reboot store this and hand it back
/// through [`RainAccumulator::restore`]. The rolling windows are not
/// persisted; they refill within an hour and a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RainfallState {
    /// Last raw counter seen
    pub baseline: Option<u32>,
    /// Tips since boot or the last reset
    pub total_tips: u32,
}

/// Result of feeding one counter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainUpdate {
    /// Rain since the previous counter, absent on the first sighting
    pub delta_mm: Option<f32>,
    /// Rain since boot or the last reset
    pub total_mm: f32,
    /// Rain over the trailing hour
    pub last_hour_mm: f32,
    /// Rain over the trailing 24 hours
    pub last_24h_mm: f32,
}

/// Converts a wrapping tip counter into rainfall
#[derive(Debug, Clone)]
pub struct RainAccumulator {
    baseline: Option<u32>,
    total_tips: u32,
    last_hour: RollingWindow<HOUR_WINDOW_BUCKETS>,
    last_day: RollingWindow<DAY_WINDOW_BUCKETS>,
}

impl Default for RainAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RainAccumulator {
    /// Accumulator with no baseline
    pub const fn new() -> Self {
        Self {
            baseline: None,
            total_tips: 0,
            last_hour: RollingWindow::new(HOUR_WINDOW_BUCKET_MS),
            last_day: RollingWindow::new(DAY_WINDOW_BUCKET_MS),
        }
    }

    /// Feed a raw counter received at `now`
    pub fn update(&mut self, count: u32, modulus: u32, now: Timestamp) -> RainUpdate {
        let delta_tips = self.baseline.map(|old| {
            let delta = wrapping_delta(old, count, modulus);
            if count < old && delta > modulus / 2 {
                log_warn!("Rain counter jumped {} -> {}, assuming transmitter reset", old, count);
                count
            } else {
                delta
            }
        });
        self.baseline = Some(count);

        if let Some(tips) = delta_tips {
            self.total_tips = self.total_tips.saturating_add(tips);
            let mm = tips_to_mm(tips);
            self.last_hour.add(now, mm);
            self.last_day.add(now, mm);
        }

        RainUpdate {
            delta_mm: delta_tips.map(tips_to_mm),
            total_mm: self.total_mm(),
            last_hour_mm: self.last_hour_mm(now),
            last_24h_mm: self.last_24h_mm(now),
        }
    }

    /// Zero the total and both windows, keeping the baseline
    pub fn reset(&mut self) {
        self.total_tips = 0;
        self.last_hour.clear();
        self.last_day.clear();
    }

    /// Last raw counter seen
    pub fn baseline(&self) -> Option<u32> {
        self.baseline
    }

    /// Rain since boot or the last reset, in mm
    pub fn total_mm(&self) -> f32 {
        tips_to_mm(self.total_tips)
    }

    /// Rain over the trailing hour, in mm
    pub fn last_hour_mm(&self, now: Timestamp) -> f32 {
        self.last_hour.total(now)
    }

    /// Rain over the trailing 24 hours, in mm
    pub fn last_24h_mm(&self, now: Timestamp) -> f32 {
        self.last_day.total(now)
    }

    /// Persistable state
    pub fn snapshot(&self) -> RainfallState {
        RainfallState {
            baseline: self.baseline,
            total_tips: self.total_tips,
        }
    }

    /// Resume from a persisted state; the windows start empty
    pub fn restore(&mut self, state: RainfallState) {
        self.baseline = state.baseline;
        self.total_tips = state.total_tips;
        self.last_hour.clear();
        self.last_day.clear();
    }
}

fn tips_to_mm(tips: u32) -> f32 {
    tips as f32 * RAIN_TIP_MM
}
