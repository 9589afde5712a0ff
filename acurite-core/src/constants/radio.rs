//! Radio Front End Constants
//!
//! Values for the Semtech SX127x family the decoder is usually paired with.
//! The decoder never writes registers itself; it computes the values a radio
//! driver needs from [`RadioTuning`](crate::config::RadioTuning).
//!
//! Source: SX1276/77/78/79 datasheet rev. 7, sections 4.1.4 and 4.2.

/// Crystal oscillator frequency.
pub const FXOSC_HZ: u64 = 32_000_000;

/// Frequency synthesiser step exponent: `Fstep = FXOSC / 2^19`.
pub const FRF_SHIFT: u32 = 19;

/// Lowest carrier the synthesiser reaches (low band).
pub const MIN_FREQUENCY_HZ: u32 = 137_000_000;

/// Highest carrier the synthesiser reaches (high band).
pub const MAX_FREQUENCY_HZ: u32 = 1_020_000_000;

/// AcuRite carrier in the 433 MHz ISM band.
pub const DEFAULT_FREQUENCY_HZ: u32 = 433_920_000;

/// `RegOpMode` ModulationType bits for OOK.
pub const OP_MODE_OOK: u8 = 0x20;

/// `RegOpMode` ModulationType bits for FSK.
pub const OP_MODE_FSK: u8 = 0x00;
