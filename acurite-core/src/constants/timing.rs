//! Pulse Timing of the AcuRite Air Protocol
//!
//! AcuRite transmitters key a 433.92 MHz carrier on and off. A transmission
//! opens with a train of square sync pulses, then sends each bit as a high
//! pulse whose width carries the value followed by a low gap:
//!
//! ```text
//!  sync ×4            bit 1       bit 0
//! ┌──┐  ┌──┐  ...   ┌────┐      ┌──┐
//! │  │  │  │        │    │      │  │
//! ┘  └──┘  └──      ┘    └──────┘  └────
//! 600   600         400   200   200  400   (µs)
//! ```
//!
//! Widths are nominal; receivers and slicers stretch them, so each class is
//! accepted within a tolerance band around its nominal value.

/// Nominal width of both halves of a sync period (µs).
pub const SYNC_PULSE_US: u32 = 600;

/// Nominal high width of a `1` bit (µs).
pub const ONE_PULSE_US: u32 = 400;

/// Nominal high width of a `0` bit (µs).
pub const ZERO_PULSE_US: u32 = 200;

/// Half-width of every tolerance band (µs), exclusive.
///
/// 100 µs keeps the three bands disjoint: 100..300, 300..500, 500..700.
pub const PULSE_TOLERANCE_US: u32 = 100;

/// Low sync pulses needed before the first bit is accepted.
///
/// Transmitters send four; requiring three tolerates one lost to AGC settling.
pub const MIN_SYNC_PULSES: u8 = 3;

/// Pulse time a single frame may take before assembly is abandoned (µs).
///
/// The longest frame is 10 bytes, 80 bits of at most 600 µs each: 48 ms.
/// Twice that leaves headroom for stretched pulses.
pub const FRAME_TIMEOUT_US: u32 = 100_000;
