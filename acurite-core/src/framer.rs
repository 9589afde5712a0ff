//! Preamble Detection and Byte Framing
//!
//! ## State Machine
//!
//! ```text
//!                 Sync (count < min)
//!                  ┌──────┐
//!                  ▼      │
//!            ┌─────────────┐  Bit, count ≥ min   ┌──────────────┐
//!   ────────▶│  Searching  │────────────────────▶│  Receiving   │◀─┐ Bit / Gap
//!            └─────────────┘                     └──────────────┘──┘
//!                  ▲  ▲                             │   │   │
//!                  │  └── expected length reached ──┘   │   │
//!                  │      (frame emitted)               │   │
//!                  ├──── deadline / unknown type ───────┘   │
//!                  └──── sync inside frame (counts as 1) ───┘
//! ```
//!
//! The frame length is not on the air. After the third byte the message type
//! selects a [`Layout`](crate::frame::Layout), and with it the number of bytes
//! still to come. Nothing shorter than a full frame ever leaves the assembler.
//!
//! ## Deadline
//!
//! Time is measured in pulse time: the sum of durations seen since the first
//! bit. The front end may also stop producing edges entirely (carrier lost in
//! the middle of a frame); the host reports that via [`FrameAssembler::expire`].

use crate::constants::protocol::{HEADER_LEN, MAX_FRAME_LEN, MESSAGE_TYPE_MASK};
use crate::constants::timing::{FRAME_TIMEOUT_US, MIN_SYNC_PULSES};
use crate::errors::{DecodeError, DecodeResult};
use crate::frame::{layout_for, Frame};
use crate::symbol::Symbol;

/// Assembler state, exposed for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblerState {
    /// Waiting for a preamble; holds the sync pulses counted so far
    Searching {
        /// Consecutive sync pulses
        syncs: u8,
    },
    /// Collecting bits of a frame
    Receiving {
        /// Bits collected
        bits: u16,
        /// Pulse time since the first bit
        elapsed_us: u32,
    },
}

/// Builds byte frames from classified symbols
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    state: AssemblerState,
    bytes: [u8; MAX_FRAME_LEN],
    expected_len: Option<usize>,
    min_syncs: u8,
    timeout_us: u32,
}

impl FrameAssembler {
    /// Create an assembler with the given frame deadline
    pub const fn new(timeout_us: u32) -> Self {
        Self {
            state: AssemblerState::Searching { syncs: 0 },
            bytes: [0; MAX_FRAME_LEN],
            expected_len: None,
            min_syncs: MIN_SYNC_PULSES,
            timeout_us,
        }
    }

    /// Current state
    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Whether the assembler is waiting for a preamble
    pub fn is_searching(&self) -> bool {
        matches!(self.state, AssemblerState::Searching { .. })
    }

    /// Drop any partial frame and start over
    pub fn reset(&mut self) {
        self.restart(0);
    }

    fn restart(&mut self, syncs: u8) {
        self.state = AssemblerState::Searching { syncs };
        self.expected_len = None;
    }

    /// Feed one symbol with the duration of the edge it came from
    ///
    /// Returns `Ok(Some(frame))` when a frame completes, `Ok(None)` while
    /// searching or collecting, and an error when a partial frame had to be
    /// dropped.
    pub fn push(&mut self, symbol: Symbol, duration_us: u32) -> DecodeResult<Option<Frame>> {
        match self.state {
            AssemblerState::Searching { syncs } => {
                match symbol {
                    Symbol::Sync => {
                        self.state = AssemblerState::Searching { syncs: syncs.saturating_add(1) };
                    }
                    Symbol::SyncMark => {}
                    Symbol::Bit(bit) if syncs >= self.min_syncs => {
                        self.bytes = [0; MAX_FRAME_LEN];
                        self.expected_len = None;
                        self.state = AssemblerState::Receiving { bits: 0, elapsed_us: duration_us };
                        return self.append(bit);
                    }
                    // Trailing gap after the last sync is harmless
                    Symbol::Gap if syncs >= self.min_syncs => {}
                    Symbol::Bit(_) | Symbol::Gap => self.restart(0),
                }
                Ok(None)
            }
            AssemblerState::Receiving { bits, elapsed_us } => {
                let elapsed_us = elapsed_us.saturating_add(duration_us);
                if elapsed_us > self.timeout_us {
                    self.reset();
                    return Err(DecodeError::FrameTimeout { elapsed_us, bits });
                }
                self.state = AssemblerState::Receiving { bits, elapsed_us };

                match symbol {
                    Symbol::Bit(bit) => self.append(bit),
                    Symbol::Gap => Ok(None),
                    // Truncated frame; this sync may open the next preamble
                    Symbol::Sync => {
                        self.restart(1);
                        Err(DecodeError::Desync { duration_us })
                    }
                    Symbol::SyncMark => {
                        self.restart(0);
                        Err(DecodeError::Desync { duration_us })
                    }
                }
            }
        }
    }

    /// Report idle time with no edges at all
    ///
    /// Abandons a partial frame whose deadline has passed. A preamble left
    /// idle for longer than the deadline is forgotten without an error; the
    /// next frame needs a fresh one.
    pub fn expire(&mut self, idle_us: u32) -> DecodeResult<()> {
        match self.state {
            AssemblerState::Receiving { bits, elapsed_us } => {
                let elapsed_us = elapsed_us.saturating_add(idle_us);
                if elapsed_us > self.timeout_us {
                    self.reset();
                    return Err(DecodeError::FrameTimeout { elapsed_us, bits });
                }
                self.state = AssemblerState::Receiving { bits, elapsed_us };
            }
            AssemblerState::Searching { syncs } if syncs > 0 && idle_us > self.timeout_us => {
                self.reset();
            }
            AssemblerState::Searching { .. } => {}
        }
        Ok(())
    }

    fn append(&mut self, bit: bool) -> DecodeResult<Option<Frame>> {
        let AssemblerState::Receiving { bits, elapsed_us } = self.state else {
            return Ok(None);
        };

        let index = (bits / 8) as usize;
        if index >= MAX_FRAME_LEN {
            self.reset();
            return Err(DecodeError::UnknownLength { len: MAX_FRAME_LEN as u8 });
        }
        self.bytes[index] = (self.bytes[index] << 1) | bit as u8;
        let bits = bits + 1;
        self.state = AssemblerState::Receiving { bits, elapsed_us };

        if bits % 8 != 0 {
            return Ok(None);
        }
        let complete = (bits / 8) as usize;

        if complete == HEADER_LEN {
            let message_type = self.bytes[2] & MESSAGE_TYPE_MASK;
            match layout_for(message_type) {
                Some(layout) => self.expected_len = Some(layout.len),
                None => {
                    self.reset();
                    return Err(DecodeError::UnknownVariant { message_type });
                }
            }
        }

        if self.expected_len == Some(complete) {
            let frame = Frame::from_slice(&self.bytes[..complete]);
            self.reset();
            return frame.map(Some);
        }
        Ok(None)
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(FRAME_TIMEOUT_US)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preamble(asm: &mut FrameAssembler) {
        for _ in 0..4 {
            assert_eq!(asm.push(Symbol::SyncMark, 600), Ok(None));
            assert_eq!(asm.push(Symbol::Sync, 600), Ok(None));
        }
    }

    fn push_byte(asm: &mut FrameAssembler, byte: u8) -> DecodeResult<Option<Frame>> {
        let mut out = Ok(None);
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1 == 1;
            out = asm.push(Symbol::Bit(bit), if bit { 400 } else { 200 });
            if !matches!(out, Ok(None)) {
                return out;
            }
            asm.push(Symbol::Gap, if bit { 200 } else { 400 })?;
        }
        out
    }

    #[test]
    fn assembles_tower_frame() {
        let tower = [0xDA, 0x2B, 0x44, 0xAF, 0x09, 0x53, 0x54];
        let mut asm = FrameAssembler::default();
        preamble(&mut asm);

        let mut emitted = None;
        for byte in tower {
            if let Some(frame) = push_byte(&mut asm, byte).unwrap() {
                emitted = Some(frame);
            }
        }
        assert_eq!(emitted.unwrap().as_bytes(), &tower);
        assert!(asm.is_searching());
    }

    #[test]
    fn bits_without_preamble_are_ignored() {
        let mut asm = FrameAssembler::default();
        asm.push(Symbol::Sync, 600).unwrap();
        asm.push(Symbol::Sync, 600).unwrap();
        assert_eq!(asm.push(Symbol::Bit(true), 400), Ok(None));
        assert_eq!(asm.state(), AssemblerState::Searching { syncs: 0 });
    }

    #[test]
    fn unknown_type_drops_frame() {
        let mut asm = FrameAssembler::default();
        preamble(&mut asm);
        push_byte(&mut asm, 0xDA).unwrap();
        push_byte(&mut asm, 0x2B).unwrap();
        assert_eq!(
            push_byte(&mut asm, 0x3F),
            Err(DecodeError::UnknownVariant { message_type: 0x3F })
        );
        assert!(asm.is_searching());
    }

    #[test]
    fn sync_mid_frame_restarts_preamble() {
        let mut asm = FrameAssembler::default();
        preamble(&mut asm);
        push_byte(&mut asm, 0xDA).unwrap();
        assert_eq!(asm.push(Symbol::Sync, 600), Err(DecodeError::Desync { duration_us: 600 }));
        assert_eq!(asm.state(), AssemblerState::Searching { syncs: 1 });
    }

    #[test]
    fn deadline_abandons_frame() {
        let mut asm = FrameAssembler::new(6_000);
        preamble(&mut asm);
        push_byte(&mut asm, 0xDA).unwrap();
        // 8 bit periods of 600us so far; the next byte overruns
        let err = push_byte(&mut asm, 0x2B).unwrap_err();
        assert!(matches!(err, DecodeError::FrameTimeout { .. }));
        assert!(asm.is_searching());
    }

    #[test]
    fn idle_expiry() {
        let mut asm = FrameAssembler::default();
        assert_eq!(asm.expire(1_000_000), Ok(()));

        preamble(&mut asm);
        push_byte(&mut asm, 0xDA).unwrap();
        assert_eq!(asm.expire(10), Ok(()));
        assert!(matches!(
            asm.expire(FRAME_TIMEOUT_US),
            Err(DecodeError::FrameTimeout { bits: 8, .. })
        ));
        assert!(asm.is_searching());
    }

    #[test]
    fn idle_preamble_is_forgotten() {
        let mut asm = FrameAssembler::default();
        preamble(&mut asm);
        let armed = asm.state();

        assert_eq!(asm.expire(FRAME_TIMEOUT_US), Ok(()));
        assert_eq!(asm.state(), armed);

        assert_eq!(asm.expire(FRAME_TIMEOUT_US + 1), Ok(()));
        assert_eq!(asm.state(), AssemblerState::Searching { syncs: 0 });
        assert_eq!(push_byte(&mut asm, 0xDA), Ok(None));
        assert_eq!(asm.state(), AssemblerState::Searching { syncs: 0 });
    }
}
