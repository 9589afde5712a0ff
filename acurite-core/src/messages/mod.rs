//! Message Interpretation
//!
//! ## Overview
//!
//! A [`ValidFrame`] is turned into a [`Message`]: a closed enum with one
//! variant per transmitter family. Every variant shares a [`Header`] decoded
//! from the first three bytes:
//!
//! ```text
//!  byte 0          byte 1        byte 2
//! ┌──┬──────────┐ ┌──────────┐ ┌─┬─┬──────────┐
//! │ch│ id 13:8  │ │ id 7:0   │ │P│B│ type 5:0 │
//! └──┴──────────┘ └──────────┘ └─┴─┴──────────┘
//!  7:6   5:0                    7 6   5:0
//! ```
//!
//! `ch` is the channel switch position, `B` is set while the battery is good
//! and `P` is the parity bit. Narrower id fields (Iris 12 bits, Atlas 10
//! bits) leave the upper id bits of byte 0 to the transmitter.
//!
//! ## Family Decoders
//!
//! | Module         | Variant        | Model           |
//! |----------------|----------------|-----------------|
//! | [`tower`]      | `TempHumidity` | 592TXR          |
//! | [`rain_gauge`] | `RainGauge`    | 899             |
//! | [`lightning`]  | `Lightning`    | 6045M           |
//! | [`notos`]      | `ThreeInOne`   | Notos 3-in-1    |
//! | [`iris`]       | `FiveInOne`    | Iris 5-in-1     |
//! | [`atlas`]      | `Atlas`        | Atlas 7-in-1    |
//!
//! Decoders are pure functions of the frame bytes. They return values in
//! metric units with the scaling the consoles use; limits and confirmation
//! are applied later by the registry.

pub mod atlas;
pub mod iris;
pub mod lightning;
pub mod notos;
pub mod rain_gauge;
pub mod tower;

use heapless::Vec;

use crate::constants::buffers::MAX_MESSAGE_FIELDS;
use crate::constants::protocol::{BATTERY_OK_BIT, MAX_DEVICE_ID, MESSAGE_TYPE_MASK};
use crate::errors::{DecodeError, DecodeResult};
use crate::frame::ValidFrame;
use crate::lookup;
use crate::reading::FieldKind;

pub use atlas::{Atlas, AtlasData, AtlasLightning};
pub use iris::{FiveInOne, FiveInOneData};
pub use lightning::Lightning;
pub use notos::ThreeInOne;
pub use rain_gauge::RainGauge;
pub use tower::TempHumidity;

/// Transmitter family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceModel {
    /// 592TXR temperature and humidity tower
    Tower,
    /// 899 rain gauge
    RainGauge,
    /// 6045M lightning detector
    Lightning,
    /// Notos 3-in-1
    Notos,
    /// Iris 5-in-1
    Iris,
    /// Atlas 7-in-1
    Atlas,
}

impl DeviceModel {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            DeviceModel::Tower => "592TXR",
            DeviceModel::RainGauge => "899",
            DeviceModel::Lightning => "6045M",
            DeviceModel::Notos => "Notos 3-in-1",
            DeviceModel::Iris => "Iris 5-in-1",
            DeviceModel::Atlas => "Atlas 7-in-1",
        }
    }

    /// Largest id the model can transmit
    pub const fn max_device_id(&self) -> u16 {
        match self {
            DeviceModel::Iris => 0x0FFF,
            DeviceModel::Atlas => 0x03FF,
            _ => MAX_DEVICE_ID,
        }
    }

    /// Whether any message of this model can produce `kind`
    pub fn reports(&self, kind: FieldKind) -> bool {
        use FieldKind::*;
        match self {
            DeviceModel::Tower => matches!(kind, Temperature | Humidity),
            DeviceModel::RainGauge => kind.is_rain(),
            DeviceModel::Lightning => {
                matches!(kind, Temperature | Humidity | LightningCount | LightningDistance)
            }
            DeviceModel::Notos => matches!(kind, Temperature | Humidity | WindSpeed),
            DeviceModel::Iris => {
                kind.is_rain() || matches!(kind, Temperature | Humidity | WindSpeed | WindDirection)
            }
            DeviceModel::Atlas => true,
        }
    }
}

/// Fields common to every message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    /// Channel switch position, `A`, `B`, `C` or `X`
    pub channel: char,
    /// Transmitter id
    pub device_id: u16,
    /// Battery low flag
    pub battery_low: bool,
    /// Message type, low six bits of byte 2
    pub message_type: u8,
}

impl Header {
    /// Decode the header with the standard channel map and `id_mask` applied
    /// to byte 0
    pub(crate) fn decode(bytes: &[u8], id_mask: u8) -> Self {
        Self {
            channel: lookup::channel(bytes[0]),
            device_id: ((bytes[0] & id_mask) as u16) << 8 | bytes[1] as u16,
            battery_low: bytes[2] & BATTERY_OK_BIT == 0,
            message_type: bytes[2] & MESSAGE_TYPE_MASK,
        }
    }
}

/// One decoded quantity, before routing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    /// Degrees Celsius
    Temperature(f32),
    /// Relative humidity, percent
    Humidity(f32),
    /// km/h
    WindSpeed(f32),
    /// Degrees from north
    WindDirection(f32),
    /// Raw tip counter and the value it wraps at
    RainCounter {
        /// Tips since the transmitter powered up, modulo `modulus`
        count: u32,
        /// Counter range
        modulus: u32,
    },
    /// Lifetime strike count
    LightningStrikes(u32),
    /// km to the last strike
    LightningDistance(f32),
    /// UV index
    Uv(f32),
    /// Illuminance
    Lux(f32),
}

impl Field {
    /// Kind a value of this field is published as
    ///
    /// The rain counter feeds all four rain kinds; it reports
    /// [`FieldKind::RainTotal`] here.
    pub const fn kind(&self) -> FieldKind {
        match self {
            Field::Temperature(_) => FieldKind::Temperature,
            Field::Humidity(_) => FieldKind::Humidity,
            Field::WindSpeed(_) => FieldKind::WindSpeed,
            Field::WindDirection(_) => FieldKind::WindDirection,
            Field::RainCounter { .. } => FieldKind::RainTotal,
            Field::LightningStrikes(_) => FieldKind::LightningCount,
            Field::LightningDistance(_) => FieldKind::LightningDistance,
            Field::Uv(_) => FieldKind::Uv,
            Field::Lux(_) => FieldKind::Lux,
        }
    }
}

/// Fields carried by one message
pub type Fields = Vec<Field, MAX_MESSAGE_FIELDS>;

pub(crate) fn fields_of(list: &[Field]) -> Fields {
    list.iter().copied().take(MAX_MESSAGE_FIELDS).collect()
}

/// Decoded message, one variant per transmitter family
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// 592TXR tower
    TempHumidity(TempHumidity),
    /// 899 rain gauge
    RainGauge(RainGauge),
    /// 6045M lightning detector
    Lightning(Lightning),
    /// Notos 3-in-1
    ThreeInOne(ThreeInOne),
    /// Iris 5-in-1
    FiveInOne(FiveInOne),
    /// Atlas 7-in-1
    Atlas(Atlas),
}

impl Message {
    /// Header shared by all variants
    pub fn header(&self) -> &Header {
        match self {
            Message::TempHumidity(m) => &m.header,
            Message::RainGauge(m) => &m.header,
            Message::Lightning(m) => &m.header,
            Message::ThreeInOne(m) => &m.header,
            Message::FiveInOne(m) => &m.header,
            Message::Atlas(m) => &m.header,
        }
    }

    /// Transmitter id
    pub fn device_id(&self) -> u16 {
        self.header().device_id
    }

    /// Transmitter family
    pub fn model(&self) -> DeviceModel {
        match self {
            Message::TempHumidity(_) => DeviceModel::Tower,
            Message::RainGauge(_) => DeviceModel::RainGauge,
            Message::Lightning(_) => DeviceModel::Lightning,
            Message::ThreeInOne(_) => DeviceModel::Notos,
            Message::FiveInOne(_) => DeviceModel::Iris,
            Message::Atlas(_) => DeviceModel::Atlas,
        }
    }

    /// Flatten into routable fields
    pub fn fields(&self) -> Fields {
        match self {
            Message::TempHumidity(m) => m.fields(),
            Message::RainGauge(m) => m.fields(),
            Message::Lightning(m) => m.fields(),
            Message::ThreeInOne(m) => m.fields(),
            Message::FiveInOne(m) => m.fields(),
            Message::Atlas(m) => m.fields(),
        }
    }

    /// Interpret a validated frame
    ///
    /// Fails only with [`DecodeError::UnknownVariant`].
    pub fn decode(frame: &ValidFrame) -> DecodeResult<Self> {
        let layout = frame.layout().ok_or(DecodeError::UnknownVariant {
            message_type: frame.message_type(),
        })?;
        let bytes = frame.as_bytes();

        let message = match layout.model {
            DeviceModel::Tower => Message::TempHumidity(TempHumidity::decode(bytes)),
            DeviceModel::RainGauge => Message::RainGauge(RainGauge::decode(bytes)),
            DeviceModel::Lightning => Message::Lightning(Lightning::decode(bytes)),
            DeviceModel::Notos => Message::ThreeInOne(ThreeInOne::decode(bytes)),
            DeviceModel::Iris => Message::FiveInOne(FiveInOne::decode(bytes)),
            DeviceModel::Atlas => Message::Atlas(Atlas::decode(bytes)),
        };
        Ok(message)
    }
}

/// Interpret a validated frame
pub fn interpret(frame: &ValidFrame) -> DecodeResult<Message> {
    Message::decode(frame)
}

/// Round to one decimal place, as the consoles display
pub(crate) fn round_tenths(value: f32) -> f32 {
    libm::roundf(value * 10.0) / 10.0
}

/// Celsius from a Fahrenheit tenths code with the given offset
pub(crate) fn celsius_from_f_tenths(raw: u16, offset: i32) -> f32 {
    let above_freezing_f = (raw as i32 - offset) as f32 * 0.1;
    round_tenths(above_freezing_f * 5.0 / 9.0)
}
