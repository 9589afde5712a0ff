//! 6045M lightning detector
//!
//! Besides temperature and humidity the 6045M carries an AS3935 strike
//! sensor. The strike counter is 9 bits and increments for every detected
//! strike; the distance code goes through the AS3935 estimation table. The
//! `interference` flag is raised when the sensor heard man-made RF noise.

use super::{celsius_from_f_tenths, fields_of, Field, Fields, Header};
use crate::constants::protocol::F_TENTHS_OFFSET_1800;
use crate::lookup;

/// Reading from a 6045M lightning detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lightning {
    /// Common header
    pub header: Header,
    /// Degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity, percent
    pub humidity: f32,
    /// Strike counter
    pub strikes: u32,
    /// Estimated distance to the last strike in km
    pub distance_km: f32,
    /// RF interference detected
    pub interference: bool,
}

impl Lightning {
    pub(crate) fn decode(bytes: &[u8]) -> Self {
        let raw_temp = ((bytes[4] & 0x1F) as u16) << 7 | (bytes[5] & 0x7F) as u16;
        Self {
            header: Header::decode(bytes, 0x3F),
            temperature_c: celsius_from_f_tenths(raw_temp, F_TENTHS_OFFSET_1800),
            humidity: (bytes[3] & 0x7F) as f32,
            strikes: ((bytes[6] & 0x7F) as u32) << 1 | ((bytes[7] >> 6) & 0x01) as u32,
            distance_km: lookup::strike_distance_km(bytes[7]),
            interference: (bytes[7] >> 5) & 0x01 == 1,
        }
    }

    pub(crate) fn fields(&self) -> Fields {
        fields_of(&[
            Field::Temperature(self.temperature_c),
            Field::Humidity(self.humidity),
            Field::LightningStrikes(self.strikes),
            Field::LightningDistance(self.distance_km),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_strikes_and_distance() {
        // 72.0F above freezing, 12 strikes + 1, distance code 8, RFI
        let raw: u16 = 1800 + 720;
        let bytes = [
            0x40, 0x10, 0x6F, 0x37,
            (raw >> 7) as u8, (raw & 0x7F) as u8,
            0x06, 0x40 | 0x20 | 0x08, 0x00,
        ];
        let m = Lightning::decode(&bytes);
        assert_eq!(m.temperature_c, 40.0);
        assert_eq!(m.humidity, 55.0);
        assert_eq!(m.strikes, 13);
        assert_eq!(m.distance_km, 10.0);
        assert!(m.interference);
        assert_eq!(m.header.channel, 'X');
        assert_eq!(m.fields().len(), 4);
    }
}
