//! Lookup Tables for Coded Fields
//!
//! ## Overview
//!
//! A few AcuRite fields are not linear codes but indices into tables that
//! live in the console firmware. Those tables are reproduced here as `static`
//! arrays so decoding is a single bounds-free index on the hot path.
//!
//! ### Channel letters
//! The two top bits of byte 0 select a channel switch position. Most
//! transmitters map them `C X B A`; the 899 rain gauge uses `A B C X`.
//!
//! ### Lightning distance
//! The 6045M and lightning-equipped Atlas units carry an AMS AS3935. Its
//! 5-bit distance estimate maps to kilometres per the datasheet's distance
//! estimation table (AS3935 datasheet v5, "Distance estimation").
//!
//! ### Compass rose
//! The Iris vane reports one of sixteen Gray-code-like positions. The
//! mapping was recovered by stepping every raw value against the console:
//!
//! ```text
//! raw:  0     1     2     3     4     5     6    7
//! deg:  315   247.5 292.5 270   337.5 225   0    202.5
//! raw:  8     9     10    11    12    13    14   15
//! deg:  67.5  135   90    112.5 45    157.5 22.5 180
//! ```

/// Channel letters for most transmitters, indexed by byte 0 bits 7:6
static CHANNEL_STANDARD: [char; 4] = ['C', 'X', 'B', 'A'];

/// Channel letters for the 899 rain gauge
static CHANNEL_RAIN_GAUGE: [char; 4] = ['A', 'B', 'C', 'X'];

/// AS3935 distance estimate in km, indexed by the 5-bit distance code
static AS3935_DISTANCE_KM: [u8; 32] = [
    2, 2, 2, 2, 5, 6, 6, 8, 10, 10, 12, 12,
    14, 14, 14, 17, 17, 20, 20, 20, 24, 24,
    27, 27, 31, 31, 31, 34, 37, 37, 40, 40,
];

/// Iris wind vane positions in degrees, indexed by the 4-bit vane code
static IRIS_DIRECTION_DEG: [f32; 16] = [
    315.0, 247.5, 292.5, 270.0, 337.5, 225.0, 0.0, 202.5,
    67.5, 135.0, 90.0, 112.5, 45.0, 157.5, 22.5, 180.0,
];

/// Channel letter for a transmitter's header byte
pub fn channel(byte0: u8) -> char {
    CHANNEL_STANDARD[(byte0 >> 6) as usize]
}

/// Channel letter for the 899 rain gauge's header byte
pub fn rain_gauge_channel(byte0: u8) -> char {
    CHANNEL_RAIN_GAUGE[(byte0 >> 6) as usize]
}

/// Lightning distance in km for an AS3935 distance code
///
/// Only the low five bits are used.
pub fn strike_distance_km(code: u8) -> f32 {
    AS3935_DISTANCE_KM[(code & 0x1F) as usize] as f32
}

/// Iris wind direction in degrees for a vane code
///
/// Only the low four bits are used.
pub fn iris_direction_deg(code: u8) -> f32 {
    IRIS_DIRECTION_DEG[(code & 0x0F) as usize]
}
