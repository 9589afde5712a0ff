//! Common test utilities for integration tests
//!
//! This module provides:
//! - A pulse-train encoder producing the edges a receiver would time
//! - Sealed frame builders for every frame layout
//! - A sink that records every published reading

#![allow(dead_code)]

use acurite_core::{
    seal_frame, DecoderConfig, DeviceConfig, FieldKind, PulseEdge, Reading, SensorSink,
    SinkHandle,
};

/// 592TXR tower, id 0x1A2B, channel A, 23.5 °C, 47 %
pub const TOWER_FRAME: [u8; 7] = [0xDA, 0x2B, 0x44, 0xAF, 0x09, 0x53, 0x54];

/// Id carried by [`TOWER_FRAME`]
pub const TOWER_ID: u16 = 0x1A2B;

/// Preamble of four sync pairs, then each bit as a high/low pair
pub fn pulse_train(bytes: &[u8]) -> Vec<PulseEdge> {
    let mut edges = Vec::with_capacity(8 + bytes.len() * 16);
    for _ in 0..4 {
        edges.push(PulseEdge::high(600));
        edges.push(PulseEdge::low(600));
    }
    for byte in bytes {
        for i in (0..8).rev() {
            if (byte >> i) & 1 == 1 {
                edges.push(PulseEdge::high(400));
                edges.push(PulseEdge::low(200));
            } else {
                edges.push(PulseEdge::high(200));
                edges.push(PulseEdge::low(400));
            }
        }
    }
    edges
}

/// Same frame sent `repeats` times back to back, as transmitters do
pub fn repeated_train(bytes: &[u8], repeats: usize) -> Vec<PulseEdge> {
    let one = pulse_train(bytes);
    let mut edges = Vec::with_capacity(one.len() * repeats);
    for _ in 0..repeats {
        edges.extend_from_slice(&one);
    }
    edges
}

/// Tower frame on channel A with temperature in tenths of °C
pub fn tower_frame(device_id: u16, temp_tenths_c: i16, humidity: u8) -> [u8; 7] {
    let raw = (temp_tenths_c + 1000) as u16;
    let mut bytes = [
        0xC0 | ((device_id >> 8) as u8 & 0x3F),
        device_id as u8,
        0x44,
        humidity & 0x7F,
        ((raw >> 7) & 0x0F) as u8,
        (raw & 0x7F) as u8,
        0,
    ];
    seal_frame(&mut bytes);
    bytes
}

/// 899 rain gauge frame with a raw tip counter
pub fn rain_gauge_frame(device_id: u16, count: u32) -> [u8; 8] {
    let mut bytes = [
        0xC0 | ((device_id >> 8) as u8 & 0x3F),
        device_id as u8,
        0x70,
        0,
        ((count >> 14) & 0x7F) as u8,
        ((count >> 7) & 0x7F) as u8,
        (count & 0x7F) as u8,
        0,
    ];
    seal_frame(&mut bytes);
    bytes
}

/// Type byte and length of one frame of each layout
///
/// Tower, rain gauge, Notos, both Iris rotations, lightning tower, and the
/// Atlas with and without the lightning option.
pub const LAYOUTS: [(u8, usize); 8] = [
    (0x04, 7),
    (0x30, 8),
    (0x20, 8),
    (0x31, 8),
    (0x38, 8),
    (0x2F, 9),
    (0x05, 10),
    (0x27, 10),
];

/// Sealed frame of layout `LAYOUTS[layout]` with the payload taken from `fill`
///
/// `fill` is cycled if shorter than the payload.
pub fn sealed_frame(layout: usize, device_id: u16, fill: &[u8]) -> Vec<u8> {
    let (message_type, len) = LAYOUTS[layout % LAYOUTS.len()];
    let mut bytes = vec![0u8; len];
    bytes[0] = 0xC0 | ((device_id >> 8) as u8 & 0x3F);
    bytes[1] = device_id as u8;
    bytes[2] = 0x40 | message_type;
    for (i, byte) in bytes[3..len - 1].iter_mut().enumerate() {
        *byte = fill.get(i % fill.len().max(1)).copied().unwrap_or(0) & 0x7F;
    }
    seal_frame(&mut bytes);
    bytes
}

/// Atlas climate frame (type 0x05) on channel A
///
/// Wind speed is the raw 8-bit count, temperature is tenths of °F above
/// freezing.
pub fn atlas_climate_frame(
    device_id: u16,
    raw_speed: u8,
    f_tenths: u16,
    humidity: u8,
) -> [u8; 10] {
    let raw_temp = f_tenths + 720;
    let mut bytes = [
        0xC0 | ((device_id >> 8) as u8 & 0x03),
        device_id as u8,
        0x45,
        raw_speed >> 1,
        (raw_speed & 0x01) << 6 | ((raw_temp >> 7) & 0x0F) as u8,
        (raw_temp & 0x7F) as u8,
        humidity & 0x7F,
        0,
        0,
        0,
    ];
    seal_frame(&mut bytes);
    bytes
}

/// Config with one device bound as `(kind, handle)` pairs
pub fn config_with(device_id: u16, bindings: &[(FieldKind, u16)]) -> DecoderConfig {
    let mut device = DeviceConfig::new(device_id);
    for (kind, handle) in bindings {
        device = device.bind(*kind, SinkHandle(*handle)).unwrap();
    }
    DecoderConfig::new().with_device(device).unwrap()
}

/// Sink that keeps everything it is given
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub readings: Vec<(SinkHandle, Reading)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values published for `kind`, in order
    pub fn values(&self, kind: FieldKind) -> Vec<f32> {
        self.readings
            .iter()
            .filter(|(_, r)| r.kind == kind)
            .map(|(_, r)| r.value)
            .collect()
    }

    pub fn kinds(&self) -> Vec<FieldKind> {
        self.readings.iter().map(|(_, r)| r.kind).collect()
    }
}

impl SensorSink for RecordingSink {
    fn publish(&mut self, handle: SinkHandle, reading: &Reading) {
        self.readings.push((handle, *reading));
    }
}
