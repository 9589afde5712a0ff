//! Iris 5-in-1
//!
//! The Iris alternates between two messages, both carrying wind speed:
//!
//! | Type | Payload                        |
//! |------|--------------------------------|
//! | 0x31 | wind direction, rain counter   |
//! | 0x38 | temperature, humidity          |
//!
//! Only 12 id bits are transmitted. The wind vane reports one of sixteen
//! compass positions through [`lookup::iris_direction_deg`].

use super::{celsius_from_f_tenths, fields_of, Field, Fields, Header};
use crate::constants::protocol::{
    F_TENTHS_OFFSET_720, IRIS_RAIN_MODULUS, IRIS_SPEED_KMH, MSG_IRIS_WIND_RAIN,
};
use crate::lookup;

/// Payload that depends on the message type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FiveInOneData {
    /// Type 0x31
    WindRain {
        /// Degrees from north
        direction_deg: f32,
        /// Raw tip counter, 14 bits
        rain_count: u32,
    },
    /// Type 0x38
    Climate {
        /// Degrees Celsius
        temperature_c: f32,
        /// Relative humidity, percent
        humidity: f32,
    },
}

/// Reading from an Iris 5-in-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveInOne {
    /// Common header
    pub header: Header,
    /// km/h
    pub wind_speed_kmh: f32,
    /// Type-specific payload
    pub data: FiveInOneData,
}

impl FiveInOne {
    pub(crate) fn decode(bytes: &[u8]) -> Self {
        let header = Header::decode(bytes, 0x0F);
        let raw_speed = ((bytes[3] & 0x1F) as u16) << 3 | ((bytes[4] & 0x70) >> 4) as u16;

        let data = if header.message_type == MSG_IRIS_WIND_RAIN {
            FiveInOneData::WindRain {
                direction_deg: lookup::iris_direction_deg(bytes[4]),
                rain_count: ((bytes[5] & 0x7F) as u32) << 7 | (bytes[6] & 0x7F) as u32,
            }
        } else {
            let raw_temp = ((bytes[4] & 0x0F) as u16) << 7 | (bytes[5] & 0x7F) as u16;
            FiveInOneData::Climate {
                temperature_c: celsius_from_f_tenths(raw_temp, F_TENTHS_OFFSET_720),
                humidity: (bytes[6] & 0x7F) as f32,
            }
        };

        Self {
            header,
            wind_speed_kmh: raw_speed as f32 * IRIS_SPEED_KMH,
            data,
        }
    }

    pub(crate) fn fields(&self) -> Fields {
        let speed = Field::WindSpeed(self.wind_speed_kmh);
        match self.data {
            FiveInOneData::WindRain { direction_deg, rain_count } => fields_of(&[
                speed,
                Field::WindDirection(direction_deg),
                Field::RainCounter { count: rain_count, modulus: IRIS_RAIN_MODULUS },
            ]),
            FiveInOneData::Climate { temperature_c, humidity } => fields_of(&[
                speed,
                Field::Temperature(temperature_c),
                Field::Humidity(humidity),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_and_rain() {
        // speed raw 0b00010_101 = 21, vane code 6 (north), rain 300
        let bytes = [0xC3, 0x21, 0x71, 0x02, 0x56, 0x02, 0x2C, 0x00];
        let m = FiveInOne::decode(&bytes);
        assert_eq!(m.header.device_id, 0x0321);
        assert!((m.wind_speed_kmh - 21.0 * 0.839_623).abs() < 1e-4);
        assert_eq!(
            m.data,
            FiveInOneData::WindRain { direction_deg: 0.0, rain_count: 300 }
        );
        assert_eq!(m.fields().len(), 3);
    }

    #[test]
    fn climate() {
        // 720 + 450 tenths = 45.0F above freezing = 25.0C
        let raw: u16 = 1170;
        let bytes = [0xC3, 0x21, 0x78, 0x00, (raw >> 7) as u8, (raw & 0x7F) as u8, 0x3C, 0x00];
        let m = FiveInOne::decode(&bytes);
        assert_eq!(
            m.data,
            FiveInOneData::Climate { temperature_c: 25.0, humidity: 60.0 }
        );
    }
}
