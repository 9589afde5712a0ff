//! Decode Diagnostics
//!
//! One counter per fault in the error taxonomy, plus throughput counters.
//! Faults are never fatal, so these counters are the only trace they leave;
//! a host typically exposes them as diagnostic sensors or logs them
//! periodically.
//!
//! Counters wrap at `u32::MAX`.

use crate::errors::DecodeError;

/// Counters for one decoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Frames that passed validation
    pub frames: u32,
    /// Frames interpreted into a message
    pub messages: u32,
    /// Readings handed to the sink
    pub readings: u32,

    /// [`DecodeError::Desync`]
    pub desync: u32,
    /// [`DecodeError::FrameTimeout`]
    pub frame_timeout: u32,
    /// [`DecodeError::ChecksumMismatch`]
    pub checksum_mismatch: u32,
    /// [`DecodeError::ParityMismatch`]
    pub parity_mismatch: u32,
    /// [`DecodeError::UnknownLength`]
    pub unknown_length: u32,
    /// [`DecodeError::UnknownVariant`]
    pub unknown_variant: u32,
    /// [`DecodeError::UnboundDevice`]
    pub unbound_device: u32,
    /// [`DecodeError::UnboundField`]
    pub unbound_field: u32,
    /// [`DecodeError::Implausible`]
    pub implausible: u32,
    /// [`DecodeError::Unconfirmed`]
    pub unconfirmed: u32,
    /// [`DecodeError::SourceFault`]
    pub source_fault: u32,
}

impl Diagnostics {
    /// Fresh counters
    pub const fn new() -> Self {
        Self {
            frames: 0,
            messages: 0,
            readings: 0,
            desync: 0,
            frame_timeout: 0,
            checksum_mismatch: 0,
            parity_mismatch: 0,
            unknown_length: 0,
            unknown_variant: 0,
            unbound_device: 0,
            unbound_field: 0,
            implausible: 0,
            unconfirmed: 0,
            source_fault: 0,
        }
    }

    /// Count one fault
    pub fn record(&mut self, error: &DecodeError) {
        let counter = self.counter_mut(error);
        *counter = counter.wrapping_add(1);
    }

    /// Current count for the kind of `error`; payloads are ignored
    pub fn count(&self, error: &DecodeError) -> u32 {
        match error {
            DecodeError::Desync { .. } => self.desync,
            DecodeError::FrameTimeout { .. } => self.frame_timeout,
            DecodeError::ChecksumMismatch { .. } => self.checksum_mismatch,
            DecodeError::ParityMismatch { .. } => self.parity_mismatch,
            DecodeError::UnknownLength { .. } => self.unknown_length,
            DecodeError::UnknownVariant { .. } => self.unknown_variant,
            DecodeError::UnboundDevice { .. } => self.unbound_device,
            DecodeError::UnboundField { .. } => self.unbound_field,
            DecodeError::Implausible { .. } => self.implausible,
            DecodeError::Unconfirmed { .. } => self.unconfirmed,
            DecodeError::SourceFault => self.source_fault,
        }
    }

    /// Frames lost before validation
    pub fn link_faults(&self) -> u32 {
        self.desync
            .wrapping_add(self.frame_timeout)
            .wrapping_add(self.checksum_mismatch)
            .wrapping_add(self.parity_mismatch)
            .wrapping_add(self.unknown_length)
            .wrapping_add(self.source_fault)
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn counter_mut(&mut self, error: &DecodeError) -> &mut u32 {
        match error {
            DecodeError::Desync { .. } => &mut self.desync,
            DecodeError::FrameTimeout { .. } => &mut self.frame_timeout,
            DecodeError::ChecksumMismatch { .. } => &mut self.checksum_mismatch,
            DecodeError::ParityMismatch { .. } => &mut self.parity_mismatch,
            DecodeError::UnknownLength { .. } => &mut self.unknown_length,
            DecodeError::UnknownVariant { .. } => &mut self.unknown_variant,
            DecodeError::UnboundDevice { .. } => &mut self.unbound_device,
            DecodeError::UnboundField { .. } => &mut self.unbound_field,
            DecodeError::Implausible { .. } => &mut self.implausible,
            DecodeError::Unconfirmed { .. } => &mut self.unconfirmed,
            DecodeError::SourceFault => &mut self.source_fault,
        }
    }
}
