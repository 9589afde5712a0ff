//! Byte Frames and Known Layouts
//!
//! A [`Frame`] is the unit that crosses from the physical layer into the
//! protocol layer. It is produced either by the [frame assembler] from
//! demodulated bits, or handed over whole by a radio running in packet mode.
//! A [`ValidFrame`] is a frame that passed the [validator]; it can only be
//! obtained from there, so the interpreter never sees unchecked bytes.
//!
//! [frame assembler]: crate::framer::FrameAssembler
//! [validator]: crate::validator
//!
//! ## Layout Table
//!
//! The message type in byte 2 fixes the frame length. This is what lets the
//! assembler stop collecting bits at the right place even though nothing on
//! the air marks the end of a frame.
//!
//! | Type(s)                  | Model        | Bytes | Parity exempt |
//! |--------------------------|--------------|-------|---------------|
//! | 0x04                     | 592TXR tower | 7     | -             |
//! | 0x30                     | 899 rain     | 8     | -             |
//! | 0x20                     | Notos 3-in-1 | 8     | byte 6        |
//! | 0x31, 0x38               | Iris 5-in-1  | 8     | -             |
//! | 0x2F                     | 6045M        | 9     | -             |
//! | 0x05-0x07, 0x25-0x27     | Atlas 7-in-1 | 10    | -             |

use core::fmt;

use heapless::Vec;

use crate::constants::protocol::{
    ATLAS_LIGHTNING_FLAG, MAX_FRAME_LEN, MESSAGE_TYPE_MASK, MSG_ATLAS_WIND_LIGHT,
    MSG_ATLAS_WIND_RAIN, MSG_ATLAS_WIND_TEMP, MSG_IRIS_WIND_RAIN, MSG_IRIS_WIND_TEMP,
    MSG_LIGHTNING, MSG_NOTOS, MSG_RAIN_GAUGE, MSG_TOWER,
};
use crate::errors::{DecodeError, DecodeResult};
use crate::messages::DeviceModel;

/// Geometry of one message family on the air
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Transmitter family the layout belongs to
    pub model: DeviceModel,
    /// Total frame length including the checksum byte
    pub len: usize,
    /// Byte whose top bit is data rather than parity
    pub parity_exempt: Option<usize>,
}

const TOWER: Layout = Layout { model: DeviceModel::Tower, len: 7, parity_exempt: None };
const RAIN_GAUGE: Layout = Layout { model: DeviceModel::RainGauge, len: 8, parity_exempt: None };
const NOTOS: Layout = Layout { model: DeviceModel::Notos, len: 8, parity_exempt: Some(6) };
const IRIS: Layout = Layout { model: DeviceModel::Iris, len: 8, parity_exempt: None };
const LIGHTNING: Layout = Layout { model: DeviceModel::Lightning, len: 9, parity_exempt: None };
const ATLAS: Layout = Layout { model: DeviceModel::Atlas, len: 10, parity_exempt: None };

/// Look up the layout selected by a message type
///
/// `message_type` may be the raw byte 2; the parity and battery bits are
/// masked off here.
pub fn layout_for(message_type: u8) -> Option<&'static Layout> {
    let message_type = message_type & MESSAGE_TYPE_MASK;
    match message_type {
        MSG_TOWER => Some(&TOWER),
        MSG_RAIN_GAUGE => Some(&RAIN_GAUGE),
        MSG_NOTOS => Some(&NOTOS),
        MSG_IRIS_WIND_RAIN | MSG_IRIS_WIND_TEMP => Some(&IRIS),
        MSG_LIGHTNING => Some(&LIGHTNING),
        t if is_atlas(t) => Some(&ATLAS),
        _ => None,
    }
}

fn is_atlas(message_type: u8) -> bool {
    let base = message_type & !ATLAS_LIGHTNING_FLAG;
    matches!(base, MSG_ATLAS_WIND_TEMP | MSG_ATLAS_WIND_RAIN | MSG_ATLAS_WIND_LIGHT)
}

/// Candidate frame: bytes as received, not yet checked
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME_LEN>,
}

impl Frame {
    /// Copy a received buffer into a frame
    ///
    /// Buffers longer than the longest AcuRite frame are rejected here since
    /// they cannot be stored; shorter ones are left for the validator.
    pub fn from_slice(bytes: &[u8]) -> DecodeResult<Self> {
        let bytes = Vec::from_slice(bytes).map_err(|_| DecodeError::UnknownLength {
            len: bytes.len().min(u8::MAX as usize) as u8,
        })?;
        Ok(Self { bytes })
    }

    /// Raw bytes, checksum included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the frame holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Message type from byte 2, if the frame is long enough to have one
    pub fn message_type(&self) -> Option<u8> {
        self.bytes.get(2).map(|b| b & MESSAGE_TYPE_MASK)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[")?;
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        write!(f, "]")
    }
}

/// Frame that passed checksum, parity and length checks
///
/// Constructed only by [`crate::validator::validate_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFrame {
    frame: Frame,
}

impl ValidFrame {
    pub(crate) fn new(frame: Frame) -> Self {
        Self { frame }
    }

    /// Raw bytes, checksum included
    pub fn as_bytes(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    /// Message type from byte 2
    pub fn message_type(&self) -> u8 {
        self.frame.as_bytes()[2] & MESSAGE_TYPE_MASK
    }

    /// Layout selected by the message type, if it is a known one
    pub fn layout(&self) -> Option<&'static Layout> {
        layout_for(self.message_type())
    }
}
