//! 899 rain gauge
//!
//! A 21-bit tip counter spread over three 7-bit groups. Each tip is
//! 0.254 mm. The counter starts at zero when batteries go in and wraps at
//! 2^21; turning it into rainfall is the registry's job.
//!
//! The rain gauge wires its channel switch differently from every other
//! transmitter (`A B C X` instead of `C X B A`).

use super::{fields_of, Field, Fields, Header};
use crate::constants::protocol::RAIN_GAUGE_MODULUS;
use crate::lookup;

/// Reading from an 899 rain gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainGauge {
    /// Common header
    pub header: Header,
    /// Raw tip counter
    pub rain_count: u32,
}

impl RainGauge {
    pub(crate) fn decode(bytes: &[u8]) -> Self {
        let mut header = Header::decode(bytes, 0x3F);
        header.channel = lookup::rain_gauge_channel(bytes[0]);
        Self {
            header,
            rain_count: ((bytes[4] & 0x7F) as u32) << 14
                | ((bytes[5] & 0x7F) as u32) << 7
                | (bytes[6] & 0x7F) as u32,
        }
    }

    pub(crate) fn fields(&self) -> Fields {
        fields_of(&[Field::RainCounter {
            count: self.rain_count,
            modulus: RAIN_GAUGE_MODULUS,
        }])
    }
}
