//! Notos 3-in-1 (temperature, humidity, wind speed)

use super::{celsius_from_f_tenths, fields_of, Field, Fields, Header};
use crate::constants::protocol::{F_TENTHS_OFFSET_1800, NOTOS_SPEED_KMH};

/// Reading from a Notos 3-in-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreeInOne {
    /// Common header
    pub header: Header,
    /// Degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity, percent
    pub humidity: f32,
    /// km/h
    pub wind_speed_kmh: f32,
}

impl ThreeInOne {
    pub(crate) fn decode(bytes: &[u8]) -> Self {
        let raw_temp = ((bytes[4] & 0x1F) as u16) << 7 | (bytes[5] & 0x7F) as u16;
        Self {
            header: Header::decode(bytes, 0x3F),
            temperature_c: celsius_from_f_tenths(raw_temp, F_TENTHS_OFFSET_1800),
            humidity: (bytes[3] & 0x7F) as f32,
            wind_speed_kmh: (bytes[6] & 0x7F) as f32 * NOTOS_SPEED_KMH,
        }
    }

    pub(crate) fn fields(&self) -> Fields {
        fields_of(&[
            Field::Temperature(self.temperature_c),
            Field::Humidity(self.humidity),
            Field::WindSpeed(self.wind_speed_kmh),
        ])
    }
}
