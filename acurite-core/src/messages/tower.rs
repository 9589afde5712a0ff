//! 592TXR temperature and humidity tower
//!
//! ```text
//! byte:  0    1    2    3         4          5         6
//!       hdr  hdr  0x04 P hum    P - - - t10:7  P t6:0   sum
//! ```
//!
//! Temperature is an 11-bit code in tenths of a degree Celsius offset by
//! 100.0: `(raw - 1000) / 10`.

use super::{fields_of, round_tenths, Field, Fields, Header};
use crate::constants::protocol::TOWER_TEMP_OFFSET;

/// Reading from a 592TXR tower
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempHumidity {
    /// Common header
    pub header: Header,
    /// Degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity, percent
    pub humidity: f32,
}

impl TempHumidity {
    pub(crate) fn decode(bytes: &[u8]) -> Self {
        let raw = ((bytes[4] & 0x0F) as u16) << 7 | (bytes[5] & 0x7F) as u16;
        Self {
            header: Header::decode(bytes, 0x3F),
            temperature_c: round_tenths((raw as i32 - TOWER_TEMP_OFFSET) as f32 / 10.0),
            humidity: (bytes[3] & 0x7F) as f32,
        }
    }

    pub(crate) fn fields(&self) -> Fields {
        fields_of(&[
            Field::Temperature(self.temperature_c),
            Field::Humidity(self.humidity),
        ])
    }
}
