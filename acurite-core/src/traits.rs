//! Capabilities at the edges of the decoder
//!
//! ## Design Philosophy
//!
//! The decoder core never touches hardware. Radios and pins sit behind two
//! pull traits, and the host's publishing API sits behind one push trait:
//!
//! ```text
//!  GPIO / remote receiver            sub-GHz radio in packet mode
//!          │                                     │
//!     PulseSource ──▶ PulseFrames ──▶ FrameSource ◀┘
//!                                        │
//!                                     Decoder ──▶ SensorSink
//! ```
//!
//! Both input paths end in [`FrameSource`], so the decoder does not care
//! whether it is fed by a bit-banged receiver or by a radio that does its own
//! framing.
//!
//! The pull traits use `nb::Result`: `WouldBlock` means "nothing right now",
//! which keeps them usable from a superloop without an async runtime.
//!
//! ```rust
//! use acurite_core::traits::FrameSource;
//! use acurite_core::{DecodeError, Frame};
//!
//! struct Fifo {
//!     pending: Option<[u8; 7]>,
//! }
//!
//! impl FrameSource for Fifo {
//!     fn next_frame(&mut self) -> nb::Result<Frame, DecodeError> {
//!         let bytes = self.pending.take().ok_or(nb::Error::WouldBlock)?;
//!         Frame::from_slice(&bytes).map_err(nb::Error::Other)
//!     }
//! }
//! ```

use crate::errors::DecodeError;
use crate::frame::Frame;
use crate::reading::{Reading, SinkHandle};
use crate::symbol::PulseEdge;

/// Time-ordered stream of pulse edges
///
/// Implementations return `WouldBlock` when no edge is pending and
/// [`DecodeError::SourceFault`] when the receiver reports an error
/// (FIFO overrun, lost interrupt).
pub trait PulseSource {
    /// Pull the next edge
    fn next_edge(&mut self) -> nb::Result<PulseEdge, DecodeError>;
}

/// Stream of candidate frames
pub trait FrameSource {
    /// Pull the next frame
    ///
    /// Errors are non-fatal; the source stays usable afterwards.
    fn next_frame(&mut self) -> nb::Result<Frame, DecodeError>;
}

/// Host-side consumer of readings
///
/// Called synchronously from the decode path, once per bound field.
/// Implementations should not block.
pub trait SensorSink {
    /// Deliver one reading to the sensor behind `handle`
    fn publish(&mut self, handle: SinkHandle, reading: &Reading);
}

impl<F> SensorSink for F
where
    F: FnMut(SinkHandle, &Reading),
{
    fn publish(&mut self, handle: SinkHandle, reading: &Reading) {
        self(handle, reading)
    }
}

impl<P: PulseSource + ?Sized> PulseSource for &mut P {
    fn next_edge(&mut self) -> nb::Result<PulseEdge, DecodeError> {
        (**self).next_edge()
    }
}

impl<F: FrameSource + ?Sized> FrameSource for &mut F {
    fn next_frame(&mut self) -> nb::Result<Frame, DecodeError> {
        (**self).next_frame()
    }
}
