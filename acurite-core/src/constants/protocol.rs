//! Frame Geometry and Field Scaling
//!
//! Every AcuRite frame shares the same three-byte header:
//!
//! ```text
//! byte 0        byte 1        byte 2
//! ┌──┬───────┐ ┌──────────┐ ┌─┬─┬──────────┐
//! │ch│ id hi │ │  id lo   │ │P│B│ msg type │
//! └──┴───────┘ └──────────┘ └─┴─┴──────────┘
//!  7:6  5:0       7:0        7 6    5:0
//! ```
//!
//! `P` is an even-parity bit, `B` is set while the battery is healthy. The
//! last byte of every frame is the 8-bit sum of all preceding bytes.
//!
//! Source: AcuRite 592TXR / 899 / 6045M / Iris / Notos / Atlas captures

// ===== FRAME GEOMETRY =====

/// Header bytes needed before the message type is known.
pub const HEADER_LEN: usize = 3;

/// Shortest frame any transmitter sends (592TXR tower).
pub const MIN_FRAME_LEN: usize = 7;

/// Longest frame any transmitter sends (Atlas 7-in-1).
pub const MAX_FRAME_LEN: usize = 10;

/// Mask selecting the message type from byte 2.
pub const MESSAGE_TYPE_MASK: u8 = 0x3F;

/// Bit of byte 2 that is set while the battery is healthy.
pub const BATTERY_OK_BIT: u8 = 0x40;

/// Largest id that fits the 14-bit id field.
pub const MAX_DEVICE_ID: u16 = 0x3FFF;

// ===== MESSAGE TYPES =====

/// 592TXR temperature / humidity tower.
pub const MSG_TOWER: u8 = 0x04;

/// 899 rain gauge.
pub const MSG_RAIN_GAUGE: u8 = 0x30;

/// 6045M lightning detector.
pub const MSG_LIGHTNING: u8 = 0x2F;

/// Notos 3-in-1 (temperature, humidity, wind speed).
pub const MSG_NOTOS: u8 = 0x20;

/// Iris 5-in-1 wind speed, direction and rain.
pub const MSG_IRIS_WIND_RAIN: u8 = 0x31;

/// Iris 5-in-1 wind speed, temperature and humidity.
pub const MSG_IRIS_WIND_TEMP: u8 = 0x38;

/// Atlas wind speed, temperature and humidity.
pub const MSG_ATLAS_WIND_TEMP: u8 = 0x05;

/// Atlas wind speed, direction and rain.
pub const MSG_ATLAS_WIND_RAIN: u8 = 0x06;

/// Atlas wind speed, UV and lux.
pub const MSG_ATLAS_WIND_LIGHT: u8 = 0x07;

/// Set on Atlas message types from units fitted with a lightning sensor.
pub const ATLAS_LIGHTNING_FLAG: u8 = 0x20;

// ===== SCALING =====

/// Rain collected per bucket tip (mm), 0.01 in.
pub const RAIN_TIP_MM: f32 = 0.254;

/// Tower temperature offset in tenths of °C.
pub const TOWER_TEMP_OFFSET: i32 = 1000;

/// Offset of the 12-bit °F-tenths temperature code (6045M, Notos).
pub const F_TENTHS_OFFSET_1800: i32 = 1800;

/// Offset of the 11-bit °F-tenths temperature code (Iris, Atlas).
pub const F_TENTHS_OFFSET_720: i32 = 720;

/// Notos wind speed per count (km/h), measured against the console.
pub const NOTOS_SPEED_KMH: f32 = 2.5734;

/// Iris wind speed per count (km/h), measured against the console.
pub const IRIS_SPEED_KMH: f32 = 0.839_623;

/// Atlas wind speed per count, mph to km/h.
pub const ATLAS_SPEED_KMH: f32 = 1.60934;

/// Atlas lux per count.
pub const ATLAS_LUX_PER_COUNT: f32 = 10.0;

// ===== COUNTER MODULI =====

/// 899 rain gauge tip counter, 3 × 7 bits.
pub const RAIN_GAUGE_MODULUS: u32 = 1 << 21;

/// Iris tip counter, 2 × 7 bits.
pub const IRIS_RAIN_MODULUS: u32 = 1 << 14;

/// Atlas tip counter, 2 + 7 bits.
pub const ATLAS_RAIN_MODULUS: u32 = 1 << 9;

// ===== PLAUSIBILITY =====

/// Highest UV index the Atlas reports.
pub const UV_MAX: f32 = 15.0;

/// Highest illuminance the Atlas reports (lx).
pub const LUX_MAX: f32 = 120_000.0;

/// Full circle (°).
pub const DIRECTION_MAX_DEG: f32 = 360.0;

/// Fastest wind any anemometer reports (km/h).
pub const SPEED_MAX_KMH: f32 = 257.0;

/// Change below which a repeated temperature / humidity / distance decode
/// counts as confirming the previous one.
pub const CONFIRM_DELTA: f32 = 1.0;
