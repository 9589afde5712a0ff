//! Error Types for Decoding and Configuration
//!
//! ## Design Philosophy
//!
//! The decoder runs from a pin-change interrupt or a radio packet callback, so
//! its error system follows the same rules as the rest of the crate:
//!
//! 1. **Small Size**: every variant carries at most a few integers. Errors are
//!    produced for each rejected frame and counted, never stored in bulk.
//!
//! 2. **No Heap Allocation**: no `String` payloads, nothing that allocates.
//!
//! 3. **Copy Semantics**: errors are `Copy` so they can be logged, counted and
//!    returned without moving state around.
//!
//! ## Two Families
//!
//! ### Decode faults (`DecodeError`)
//! Everything that can go wrong between a pulse edge and a sink call. All of
//! them are *recoverable*: the decoder drops whatever was in flight, returns to
//! searching for a preamble and bumps a diagnostics counter.
//!
//! | Stage            | Variants                                             |
//! |------------------|------------------------------------------------------|
//! | Symbol decoder   | `Desync`                                             |
//! | Frame assembler  | `FrameTimeout`, `UnknownVariant`                     |
//! | Validator        | `ChecksumMismatch`, `ParityMismatch`, `UnknownLength`|
//! | Interpreter      | `UnknownVariant`                                     |
//! | Registry         | `UnboundDevice`, `UnboundField`, `Implausible`, `Unconfirmed` |
//! | Front end        | `SourceFault`                                        |
//!
//! ### Configuration errors (`ConfigError`)
//! The only fatal condition. Raised by [`DecoderConfig::validate`] before the
//! first edge is accepted.
//!
//! [`DecoderConfig::validate`]: crate::config::DecoderConfig::validate
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use acurite_core::{validate_frame, DecodeError};
//!
//! let frame = [0xDA, 0x2B, 0x44, 0xAF, 0x09, 0x53, 0x55];
//! match validate_frame(&frame) {
//!     Ok(_) => {}
//!     Err(DecodeError::ChecksumMismatch { .. }) => {
//!         // Noise or a collision - wait for the next repeat
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

use crate::reading::FieldKind;

/// Result type for the decode path
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for start-up configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Non-fatal faults raised while turning pulses into readings
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Pulse duration outside every tolerance band, or two edges of the same level
    #[error("Symbol desync: {duration_us}us pulse matches no band")]
    Desync {
        /// Offending pulse length in microseconds
        duration_us: u32,
    },

    /// Frame assembly stalled past its deadline
    #[error("Frame timeout after {elapsed_us}us with {bits} bits collected")]
    FrameTimeout {
        /// Pulse time spent on the abandoned frame
        elapsed_us: u32,
        /// Bits collected before the deadline hit
        bits: u16,
    },

    /// Additive checksum does not match the trailing byte
    #[error("Checksum mismatch: computed {computed:#04x}, received {received:#04x}")]
    ChecksumMismatch {
        /// Sum of the payload bytes
        computed: u8,
        /// Checksum byte carried by the frame
        received: u8,
    },

    /// A parity-protected byte has odd parity
    #[error("Parity mismatch on byte {index}")]
    ParityMismatch {
        /// Index of the failing byte
        index: u8,
    },

    /// Frame length matches no known layout
    #[error("Unknown frame length {len}")]
    UnknownLength {
        /// Length of the rejected frame in bytes
        len: u8,
    },

    /// Message type byte selects no known decoder
    #[error("Unknown message variant {message_type:#04x}")]
    UnknownVariant {
        /// Low six bits of byte 2
        message_type: u8,
    },

    /// Valid message from a device id that is not configured
    #[error("Unbound device {device_id:#06x}")]
    UnboundDevice {
        /// Transmitter id
        device_id: u16,
    },

    /// Field carried by a message but not bound for its device
    #[error("Unbound field {kind:?} for device {device_id:#06x}")]
    UnboundField {
        /// Transmitter id
        device_id: u16,
        /// Field that has no sink
        kind: FieldKind,
    },

    /// Decoded value outside the physical range the transmitter can report
    #[error("Implausible {kind:?} for device {device_id:#06x}")]
    Implausible {
        /// Transmitter id
        device_id: u16,
        /// Field that was dropped
        kind: FieldKind,
    },

    /// Value held back until a repeat transmission confirms it
    #[error("Unconfirmed {kind:?} for device {device_id:#06x}")]
    Unconfirmed {
        /// Transmitter id
        device_id: u16,
        /// Field that was held back
        kind: FieldKind,
    },

    /// The front end reported a receive error
    #[error("Front end fault")]
    SourceFault,
}

impl DecodeError {
    /// Whether the fault happened before a frame passed validation
    pub const fn is_link_fault(&self) -> bool {
        matches!(
            self,
            Self::Desync { .. }
                | Self::FrameTimeout { .. }
                | Self::ChecksumMismatch { .. }
                | Self::ParityMismatch { .. }
                | Self::UnknownLength { .. }
                | Self::SourceFault
        )
    }
}

/// Start-up configuration errors - the only fatal condition
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Device id does not fit the id width of its model
    #[error("Device id {device_id:#06x} exceeds {max:#06x}")]
    DeviceIdOutOfRange {
        /// Configured id
        device_id: u16,
        /// Largest id the model can transmit
        max: u16,
    },

    /// The same device id is listed twice
    #[error("Device {device_id:#06x} configured twice")]
    DuplicateDevice {
        /// Repeated id
        device_id: u16,
    },

    /// A field kind is bound twice for one device
    #[error("Field {kind:?} bound twice for device {device_id:#06x}")]
    DuplicateBinding {
        /// Device carrying the duplicate
        device_id: u16,
        /// Repeated field
        kind: FieldKind,
    },

    /// The device model never reports this field
    #[error("Field {kind:?} is not reported by the model of device {device_id:#06x}")]
    IncompatibleField {
        /// Device carrying the binding
        device_id: u16,
        /// Field the model cannot produce
        kind: FieldKind,
    },

    /// More devices than the registry arena holds
    #[error("Too many devices: capacity is {capacity}")]
    TooManyDevices {
        /// Arena capacity
        capacity: usize,
    },

    /// More bindings than a device slot holds
    #[error("Too many bindings for device {device_id:#06x}")]
    TooManyBindings {
        /// Device whose binding table overflowed
        device_id: u16,
    },

    /// Symbol timing bands overlap or are degenerate
    #[error("Invalid symbol timing: {reason}")]
    InvalidTiming {
        /// What is wrong with the bands
        reason: &'static str,
    },

    /// Radio frequency outside the front end's synthesiser range
    #[error("Frequency {frequency_hz}Hz outside {min_hz}..={max_hz}Hz")]
    FrequencyOutOfRange {
        /// Requested carrier
        frequency_hz: u32,
        /// Lowest tunable carrier
        min_hz: u32,
        /// Highest tunable carrier
        max_hz: u32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodeError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Desync { duration_us } =>
                defmt::write!(fmt, "Desync at {}us", duration_us),
            Self::FrameTimeout { elapsed_us, bits } =>
                defmt::write!(fmt, "Frame timeout {}us, {} bits", elapsed_us, bits),
            Self::ChecksumMismatch { computed, received } =>
                defmt::write!(fmt, "Checksum {} != {}", computed, received),
            Self::ParityMismatch { index } =>
                defmt::write!(fmt, "Parity byte {}", index),
            Self::UnknownLength { len } =>
                defmt::write!(fmt, "Unknown length {}", len),
            Self::UnknownVariant { message_type } =>
                defmt::write!(fmt, "Unknown variant {}", message_type),
            Self::UnboundDevice { device_id } =>
                defmt::write!(fmt, "Unbound device {}", device_id),
            Self::UnboundField { device_id, kind } =>
                defmt::write!(fmt, "Unbound {} on {}", kind.name(), device_id),
            Self::Implausible { device_id, kind } =>
                defmt::write!(fmt, "Implausible {} on {}", kind.name(), device_id),
            Self::Unconfirmed { device_id, kind } =>
                defmt::write!(fmt, "Unconfirmed {} on {}", kind.name(), device_id),
            Self::SourceFault =>
                defmt::write!(fmt, "Front end fault"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::DeviceIdOutOfRange { device_id, max } =>
                defmt::write!(fmt, "Device id {} > {}", device_id, max),
            Self::DuplicateDevice { device_id } =>
                defmt::write!(fmt, "Duplicate device {}", device_id),
            Self::DuplicateBinding { device_id, kind } =>
                defmt::write!(fmt, "Duplicate {} on {}", kind.name(), device_id),
            Self::IncompatibleField { device_id, kind } =>
                defmt::write!(fmt, "Incompatible {} on {}", kind.name(), device_id),
            Self::TooManyDevices { capacity } =>
                defmt::write!(fmt, "Too many devices (cap {})", capacity),
            Self::TooManyBindings { device_id } =>
                defmt::write!(fmt, "Too many bindings on {}", device_id),
            Self::InvalidTiming { reason } =>
                defmt::write!(fmt, "Invalid timing: {}", reason),
            Self::FrequencyOutOfRange { frequency_hz, .. } =>
                defmt::write!(fmt, "Frequency {} out of range", frequency_hz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<DecodeError>() <= 8);
        assert!(core::mem::size_of::<ConfigError>() <= 24);
    }

    #[test]
    fn link_faults_are_classified() {
        assert!(DecodeError::Desync { duration_us: 5 }.is_link_fault());
        assert!(DecodeError::ChecksumMismatch { computed: 1, received: 2 }.is_link_fault());
        assert!(!DecodeError::UnknownVariant { message_type: 0x3F }.is_link_fault());
        assert!(!DecodeError::UnboundDevice { device_id: 1 }.is_link_fault());
    }
}
