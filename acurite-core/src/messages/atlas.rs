//! Atlas 7-in-1
//!
//! ## Message Rotation
//!
//! The Atlas cycles through three payloads, each with wind speed. Units
//! fitted with the lightning option set bit 5 of the type and append the
//! AS3935 strike counter and distance to every payload.
//!
//! | Type        | Payload                                 |
//! |-------------|-----------------------------------------|
//! | 0x05 / 0x25 | temperature, humidity                   |
//! | 0x06 / 0x26 | wind direction (raw degrees), rain      |
//! | 0x07 / 0x27 | UV index, illuminance                   |
//!
//! ## Bit Layout (lightning bytes)
//!
//! ```text
//!  byte 7          byte 8
//! ┌─┬─────────┐  ┌─┬──┬────────┐
//! │P│ n 8:2   │  │P│n │ dist   │
//! └─┴─────────┘  └─┴──┴────────┘
//!                  7 6:5  4:0
//! ```
//!
//! The id field is 10 bits wide. The rain counter is 9 bits and wraps
//! quickly in a heavy storm, so the registry's wrap handling matters here.

use super::{celsius_from_f_tenths, fields_of, Field, Fields, Header};
use crate::constants::protocol::{
    ATLAS_LIGHTNING_FLAG, ATLAS_LUX_PER_COUNT, ATLAS_RAIN_MODULUS, ATLAS_SPEED_KMH,
    F_TENTHS_OFFSET_720, MSG_ATLAS_WIND_RAIN, MSG_ATLAS_WIND_TEMP,
};
use crate::lookup;

/// Payload that depends on the message type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtlasData {
    /// Types 0x05 / 0x25
    Climate {
        /// Degrees Celsius
        temperature_c: f32,
        /// Relative humidity, percent
        humidity: f32,
    },
    /// Types 0x06 / 0x26
    WindRain {
        /// Degrees from north
        direction_deg: f32,
        /// Raw tip counter, 9 bits
        rain_count: u32,
    },
    /// Types 0x07 / 0x27
    Light {
        /// UV index
        uv: f32,
        /// Illuminance in lux
        lux: f32,
    },
}

/// Strike data from lightning-equipped units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLightning {
    /// Strike counter
    pub strikes: u32,
    /// Estimated distance to the last strike in km
    pub distance_km: f32,
}

/// Reading from an Atlas 7-in-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atlas {
    /// Common header
    pub header: Header,
    /// km/h
    pub wind_speed_kmh: f32,
    /// Type-specific payload
    pub data: AtlasData,
    /// Present when the lightning option is fitted
    pub lightning: Option<AtlasLightning>,
}

impl Atlas {
    pub(crate) fn decode(bytes: &[u8]) -> Self {
        let header = Header::decode(bytes, 0x03);
        let raw_speed = ((bytes[3] & 0x7F) as u16) << 1 | ((bytes[4] & 0x40) >> 6) as u16;

        let data = match header.message_type & !ATLAS_LIGHTNING_FLAG {
            MSG_ATLAS_WIND_TEMP => {
                let raw_temp = ((bytes[4] & 0x0F) as u16) << 7 | (bytes[5] & 0x7F) as u16;
                AtlasData::Climate {
                    temperature_c: celsius_from_f_tenths(raw_temp, F_TENTHS_OFFSET_720),
                    humidity: (bytes[6] & 0x7F) as f32,
                }
            }
            MSG_ATLAS_WIND_RAIN => AtlasData::WindRain {
                direction_deg: (((bytes[4] & 0x1F) as u16) << 5 | ((bytes[5] & 0x7C) >> 2) as u16)
                    as f32,
                rain_count: ((bytes[5] & 0x03) as u32) << 7 | (bytes[6] & 0x7F) as u32,
            },
            _ => AtlasData::Light {
                uv: (bytes[4] & 0x0F) as f32,
                lux: (((bytes[5] & 0x7F) as u32) << 7 | (bytes[6] & 0x7F) as u32) as f32
                    * ATLAS_LUX_PER_COUNT,
            },
        };

        let lightning = (header.message_type & ATLAS_LIGHTNING_FLAG != 0).then(|| AtlasLightning {
            strikes: ((bytes[7] & 0x7F) as u32) << 2 | ((bytes[8] & 0x60) >> 5) as u32,
            distance_km: lookup::strike_distance_km(bytes[8]),
        });

        Self {
            header,
            wind_speed_kmh: raw_speed as f32 * ATLAS_SPEED_KMH,
            data,
            lightning,
        }
    }

    pub(crate) fn fields(&self) -> Fields {
        let speed = Field::WindSpeed(self.wind_speed_kmh);
        let mut fields = match self.data {
            AtlasData::Climate { temperature_c, humidity } => fields_of(&[
                speed,
                Field::Temperature(temperature_c),
                Field::Humidity(humidity),
            ]),
            AtlasData::WindRain { direction_deg, rain_count } => fields_of(&[
                speed,
                Field::WindDirection(direction_deg),
                Field::RainCounter { count: rain_count, modulus: ATLAS_RAIN_MODULUS },
            ]),
            AtlasData::Light { uv, lux } => {
                fields_of(&[speed, Field::Uv(uv), Field::Lux(lux)])
            }
        };
        if let Some(strike) = self.lightning {
            // Capacity leaves room for both
            let _ = fields.push(Field::LightningStrikes(strike.strikes));
            let _ = fields.push(Field::LightningDistance(strike.distance_km));
        }
        fields
    }
}
