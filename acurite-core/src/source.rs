//! Pulse-to-frame adapters
//!
//! [`Demodulator`] is the push-side pairing of the symbol decoder and the
//! frame assembler. [`PulseFrames`] wraps it around any [`PulseSource`] so a
//! bit-banged receiver looks like a [`FrameSource`]. [`PulseSlice`] replays a
//! captured pulse train, which is how recordings and tests feed the decoder.

use crate::errors::{DecodeError, DecodeResult};
use crate::frame::Frame;
use crate::framer::{AssemblerState, FrameAssembler};
use crate::symbol::{PulseEdge, SymbolDecoder, SymbolTiming};
use crate::traits::{FrameSource, PulseSource};

/// Edges in, frames out
#[derive(Debug, Clone, Default)]
pub struct Demodulator {
    symbols: SymbolDecoder,
    framer: FrameAssembler,
}

impl Demodulator {
    /// Create a demodulator with the given bands and frame deadline
    pub const fn new(timing: SymbolTiming, frame_timeout_us: u32) -> Self {
        Self {
            symbols: SymbolDecoder::new(timing),
            framer: FrameAssembler::new(frame_timeout_us),
        }
    }

    /// Feed one edge
    ///
    /// A desync drops any partial frame; the assembler goes back to
    /// searching for a preamble.
    pub fn push(&mut self, edge: PulseEdge) -> DecodeResult<Option<Frame>> {
        let symbol = match self.symbols.decode(edge) {
            Ok(symbol) => symbol,
            Err(e) => {
                self.framer.reset();
                return Err(e);
            }
        };
        self.framer.push(symbol, edge.duration_us)
    }

    /// Report idle time with no edges
    pub fn expire(&mut self, idle_us: u32) -> DecodeResult<()> {
        let result = self.framer.expire(idle_us);
        if result.is_err() {
            self.symbols.reset();
        }
        result
    }

    /// Drop all in-flight state
    pub fn reset(&mut self) {
        self.symbols.reset();
        self.framer.reset();
    }

    /// Assembler state
    pub fn state(&self) -> AssemblerState {
        self.framer.state()
    }
}

/// [`FrameSource`] over a [`PulseSource`]
#[derive(Debug)]
pub struct PulseFrames<P> {
    source: P,
    demod: Demodulator,
}

impl<P: PulseSource> PulseFrames<P> {
    /// Wrap a pulse source
    pub fn new(source: P, demod: Demodulator) -> Self {
        Self { source, demod }
    }

    /// Underlying pulse source
    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }

    /// Demodulator state
    pub fn demodulator(&self) -> &Demodulator {
        &self.demod
    }

    /// Give back the pulse source
    pub fn into_inner(self) -> P {
        self.source
    }
}

impl<P: PulseSource> FrameSource for PulseFrames<P> {
    /// Drains edges until a frame completes, an edge is rejected, or the
    /// source runs dry
    fn next_frame(&mut self) -> nb::Result<Frame, DecodeError> {
        loop {
            let edge = self.source.next_edge()?;
            if let Some(frame) = self.demod.push(edge)? {
                return Ok(frame);
            }
        }
    }
}

/// Captured pulse train replayed from memory
#[derive(Debug, Clone)]
pub struct PulseSlice<'a> {
    edges: &'a [PulseEdge],
    position: usize,
}

impl<'a> PulseSlice<'a> {
    /// Replay `edges` from the start
    pub fn new(edges: &'a [PulseEdge]) -> Self {
        Self { edges, position: 0 }
    }

    /// Rewind to the first edge
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Edges consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every edge has been replayed
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.edges.len()
    }
}

impl PulseSource for PulseSlice<'_> {
    fn next_edge(&mut self) -> nb::Result<PulseEdge, DecodeError> {
        let edge = *self.edges.get(self.position).ok_or(nb::Error::WouldBlock)?;
        self.position += 1;
        Ok(edge)
    }
}
