//! AcuRite OOK weather sensor decoder
//!
//! Turns the 433.92 MHz on-off-keyed transmissions of AcuRite weather
//! sensors into typed, per-device readings routed to host sensor handles.
//! Designed for edge receivers with limited resources.
//!
//! Key constraints:
//! - Runs on 32KB RAM (ESP32) with a bit-banged receiver
//! - No heap allocation anywhere on the decode path
//! - Each edge is handled in constant time, suitable for an ISR-fed queue
//!
//! Pipeline:
//!
//! ```text
//! PulseEdge → SymbolDecoder → FrameAssembler → validate_frame → Message → DeviceRegistry → SensorSink
//! ```
//!
//! ```no_run
//! use acurite_core::{validate_frame, DecodeError, Message};
//!
//! let bytes = [0xDA, 0x2B, 0x44, 0xAF, 0x09, 0x53, 0x54];
//!
//! match validate_frame(&bytes).and_then(|f| Message::decode(&f)) {
//!     Ok(message) => {}, // Route to sensors
//!     Err(DecodeError::ChecksumMismatch { .. }) => {}, // Noise, count it
//!     Err(e) => {}, // Other link or routing fault
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod diagnostics;
pub mod errors;
pub mod frame;
pub mod framer;
pub mod lookup;
pub mod messages;
pub mod rain;
pub mod reading;
pub mod registry;
pub mod source;
pub mod symbol;
pub mod time;
pub mod traits;
pub mod validator;

// Public API
pub use config::{DecoderConfig, DeviceConfig, FieldBinding, Modulation, RadioTuning, RxBandwidth};
pub use decoder::Decoder;
pub use diagnostics::Diagnostics;
pub use errors::{ConfigError, ConfigResult, DecodeError, DecodeResult};
pub use frame::{Frame, ValidFrame};
pub use framer::{AssemblerState, FrameAssembler};
pub use messages::{interpret, DeviceModel, Field, Header, Message};
pub use rain::{RainAccumulator, RainfallState};
pub use reading::{FieldKind, Reading, SinkHandle};
pub use registry::{DeviceRegistry, DeviceStatus, Dispatch, ObservedDevice, RainTarget};
pub use source::{Demodulator, PulseFrames, PulseSlice};
pub use symbol::{PulseEdge, Symbol, SymbolDecoder, SymbolTiming};
pub use traits::{FrameSource, PulseSource, SensorSink};
pub use validator::{checksum, seal_frame, validate_frame};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
