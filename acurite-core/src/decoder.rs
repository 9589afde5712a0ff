//! Decoder Facade
//!
//! ## Overview
//!
//! [`Decoder`] owns every stage of the receive chain and is what firmware
//! holds on to:
//!
//! ```text
//!  PulseEdge ──▶ Demodulator ──▶ Frame ──▶ validate ──▶ Message::decode
//!                                  ▲                          │
//!  &[u8] (packet radio) ───────────┘                          ▼
//!                                            DeviceRegistry::ingest ──▶ SensorSink
//!                                                     │
//!                                               Diagnostics
//! ```
//!
//! Three entry points feed it, one per kind of receiver:
//!
//! - [`ingest_edge`](Decoder::ingest_edge) for bit-banged OOK receivers that
//!   time pulses in an interrupt or a capture peripheral
//! - [`ingest_frame`](Decoder::ingest_frame) for packet radios that hand
//!   over whole payloads
//! - [`poll`](Decoder::poll) for anything implementing [`FrameSource`]
//!
//! ## Error Handling
//!
//! Every fault is counted in [`Diagnostics`] before it is returned, so a
//! caller that only wants readings can discard errors without losing track
//! of link quality. Nothing here is fatal: the next edge or frame is always
//! accepted.
//!
//! ## Example
//!
//! ```rust
//! use acurite_core::time::FixedTime;
//! use acurite_core::{Decoder, DecoderConfig, DeviceConfig, FieldKind, Reading, SinkHandle};
//!
//! let config = DecoderConfig::new()
//!     .with_device(
//!         DeviceConfig::new(0x1A2B)
//!             .bind(FieldKind::Temperature, SinkHandle(0))?
//!             .bind(FieldKind::Humidity, SinkHandle(1))?,
//!     )?;
//! let mut decoder = Decoder::new(&config, FixedTime::new(0))?;
//!
//! let mut readings = Vec::new();
//! let mut sink = |_: SinkHandle, r: &Reading| readings.push(r.value);
//!
//! let dispatch = decoder
//!     .ingest_frame(&[0xDA, 0x2B, 0x44, 0xAF, 0x09, 0x53, 0x54], &mut sink)
//!     .unwrap();
//! assert_eq!(dispatch.published, 2);
//! assert_eq!(readings, vec![23.5, 47.0]);
//! # Ok::<(), acurite_core::ConfigError>(())
//! ```

use crate::config::DecoderConfig;
use crate::diagnostics::Diagnostics;
use crate::errors::{ConfigResult, DecodeError, DecodeResult};
use crate::frame::Frame;
use crate::framer::AssemblerState;
use crate::messages::Message;
use crate::registry::{DeviceRegistry, Dispatch, RainTarget};
use crate::source::Demodulator;
use crate::symbol::PulseEdge;
use crate::time::TimeSource;
use crate::traits::{FrameSource, SensorSink};

/// Complete receive chain for one radio
#[derive(Debug)]
pub struct Decoder<T: TimeSource> {
    demod: Demodulator,
    registry: DeviceRegistry,
    diagnostics: Diagnostics,
    clock: T,
}

impl<T: TimeSource> Decoder<T> {
    /// Validate `config` and build the chain
    pub fn new(config: &DecoderConfig, clock: T) -> ConfigResult<Self> {
        let registry = DeviceRegistry::new(config)?;
        config.log_summary();
        if !clock.is_wall_clock() {
            log_debug!("Rain windows follow a monotonic clock");
        }

        Ok(Self {
            demod: Demodulator::new(config.timing, config.frame_timeout_us),
            registry,
            diagnostics: Diagnostics::new(),
            clock,
        })
    }

    /// Feed one timed pulse
    ///
    /// Returns `Ok(Some(_))` when the edge completed a frame that was routed,
    /// `Ok(None)` while a frame is still being collected.
    pub fn ingest_edge<S: SensorSink + ?Sized>(
        &mut self,
        edge: PulseEdge,
        sink: &mut S,
    ) -> DecodeResult<Option<Dispatch>> {
        match self.demod.push(edge) {
            Ok(Some(frame)) => self.dispatch(frame, sink).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(self.fault(e)),
        }
    }

    /// Feed a whole payload from a packet radio
    pub fn ingest_frame<S: SensorSink + ?Sized>(
        &mut self,
        bytes: &[u8],
        sink: &mut S,
    ) -> DecodeResult<Dispatch> {
        let frame = Frame::from_slice(bytes).map_err(|e| self.fault(e))?;
        self.dispatch(frame, sink)
    }

    /// Pull one frame from `source` and route it
    pub fn poll<F, S>(&mut self, source: &mut F, sink: &mut S) -> nb::Result<Dispatch, DecodeError>
    where
        F: FrameSource + ?Sized,
        S: SensorSink + ?Sized,
    {
        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(nb::Error::WouldBlock) => return Err(nb::Error::WouldBlock),
            Err(nb::Error::Other(e)) => return Err(nb::Error::Other(self.fault(e))),
        };
        self.dispatch(frame, sink).map_err(nb::Error::Other)
    }

    /// Report `idle_us` without edges; drops a frame that stopped mid-way
    pub fn expire_stalled(&mut self, idle_us: u32) -> DecodeResult<()> {
        self.demod.expire(idle_us).map_err(|e| self.fault(e))
    }

    /// Zero rain totals; see [`DeviceRegistry::reset_rainfall`]
    pub fn reset_rainfall(&mut self, target: RainTarget) -> DecodeResult<usize> {
        self.registry.reset_rainfall(target)
    }

    /// Fault and throughput counters
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Zero the counters
    pub fn reset_diagnostics(&mut self) {
        self.diagnostics.reset();
    }

    /// Device state
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Device state, mutable for restoring persisted rain totals
    pub fn registry_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.registry
    }

    /// Demodulator state
    pub fn assembler_state(&self) -> AssemblerState {
        self.demod.state()
    }

    /// Clock handle, for hosts that drive time by hand
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    fn dispatch<S: SensorSink + ?Sized>(
        &mut self,
        frame: Frame,
        sink: &mut S,
    ) -> DecodeResult<Dispatch> {
        let valid = frame.validate().map_err(|e| self.fault(e))?;
        self.diagnostics.frames = self.diagnostics.frames.wrapping_add(1);

        let message = Message::decode(&valid).map_err(|e| self.fault(e))?;
        self.diagnostics.messages = self.diagnostics.messages.wrapping_add(1);
        log_message(&message);

        let now = self.clock.now();
        self.registry
            .ingest(&message, now, sink, &mut self.diagnostics)
            .map_err(|e| self.fault(e))
    }

    fn fault(&mut self, error: DecodeError) -> DecodeError {
        log_trace!("Rejected: {}", error);
        self.diagnostics.record(&error);
        error
    }
}

#[allow(unused_variables)]
fn log_message(message: &Message) {
    let header = message.header();
    log_debug!(
        "{} ch {} id {:#06x} battery {}: {:?}",
        message.model().name(),
        header.channel,
        header.device_id,
        if header.battery_low { "low" } else { "ok" },
        message.fields()
    );
}
