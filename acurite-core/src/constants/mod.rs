//! Constants for the AcuRite Decoder
//!
//! This module provides centralized, documented constants used throughout
//! the decoder. Every numeric value used on the decode path is defined here
//! with its source.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Timing**: Pulse widths and tolerances of the AcuRite air protocol
//! - **Protocol**: Frame geometry, message type codes and scaling factors
//! - **Time**: Time unit conversions and rain window geometry
//! - **Buffers**: Fixed capacities of the registry arena and frame buffers
//! - **Radio**: Synthesiser limits and register bits of the SX127x front end
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Reference the transmitter family a constant belongs to
//! 3. Use descriptive names that include units

/// Pulse widths and tolerance bands.
pub mod timing;

/// Frame geometry, message types and field scaling.
pub mod protocol;

/// Time unit conversions and rain window geometry.
pub mod time;

/// Fixed capacities for the no-heap decode path.
pub mod buffers;

/// Sub-GHz front end tuning limits.
pub mod radio;

// Re-export commonly used constants for convenience
pub use timing::{
    FRAME_TIMEOUT_US, MIN_SYNC_PULSES, ONE_PULSE_US, PULSE_TOLERANCE_US, SYNC_PULSE_US,
    ZERO_PULSE_US,
};

pub use protocol::{HEADER_LEN, MAX_DEVICE_ID, MAX_FRAME_LEN, MIN_FRAME_LEN, RAIN_TIP_MM};

pub use time::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

pub use buffers::{
    MAX_BINDINGS_PER_DEVICE, MAX_DEVICES, MAX_MESSAGE_FIELDS, MAX_OBSERVED_DEVICES,
};
