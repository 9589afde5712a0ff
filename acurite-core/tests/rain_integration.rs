//! Integration tests for rain accumulation
//!
//! Counter wrap, transmitter restarts, user resets and the rolling windows,
//! both on the accumulator alone and through a decoder fed gauge frames.

mod common;

use acurite_core::constants::protocol::RAIN_TIP_MM;
use acurite_core::rain::wrapping_delta;
use acurite_core::time::FixedTime;
use acurite_core::{Decoder, FieldKind, RainAccumulator, RainTarget, RainfallState};

use common::{config_with, rain_gauge_frame, RecordingSink};

const GAUGE_ID: u16 = 0x0123;
const MINUTE_MS: u64 = 60_000;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn wrapped_counter_sequence() {
    let mut rain = RainAccumulator::new();
    let deltas: Vec<Option<f32>> = [250u32, 253, 2]
        .iter()
        .enumerate()
        .map(|(i, count)| rain.update(*count, 255, i as u64 * MINUTE_MS).delta_mm)
        .collect();

    assert_eq!(deltas[0], None);
    assert!(close(deltas[1].unwrap(), 3.0 * RAIN_TIP_MM));
    assert!(close(deltas[2].unwrap(), 4.0 * RAIN_TIP_MM));
    assert!(close(rain.total_mm(), 7.0 * RAIN_TIP_MM));
}

#[test]
fn reset_keeps_baseline_for_next_delta() {
    let mut rain = RainAccumulator::new();
    rain.update(250, 255, 0);
    rain.update(253, 255, MINUTE_MS);
    rain.reset();

    let update = rain.update(2, 255, 2 * MINUTE_MS);
    assert!(close(update.delta_mm.unwrap(), 4.0 * RAIN_TIP_MM));
    assert!(close(update.total_mm, 4.0 * RAIN_TIP_MM));
}

#[test]
fn delta_helper_matches_accumulator() {
    assert_eq!(wrapping_delta(250, 253, 255), 3);
    assert_eq!(wrapping_delta(253, 2, 255), 4);
    assert_eq!(wrapping_delta(7, 7, 1 << 21), 0);
}

#[test]
fn gauge_frames_drive_every_rain_output() {
    let config = config_with(
        GAUGE_ID,
        &[
            (FieldKind::RainDelta, 0),
            (FieldKind::RainTotal, 1),
            (FieldKind::RainLastHour, 2),
            (FieldKind::RainLast24h, 3),
        ],
    );
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 1_000), &mut sink).unwrap();
    // First sighting: no delta, everything else zero
    assert!(sink.values(FieldKind::RainDelta).is_empty());
    assert_eq!(sink.values(FieldKind::RainTotal), vec![0.0]);

    decoder.clock_mut().advance(10 * MINUTE_MS);
    let dispatch = decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 1_005), &mut sink).unwrap();
    assert_eq!(dispatch.published, 4);
    assert!(close(sink.values(FieldKind::RainDelta)[0], 5.0 * RAIN_TIP_MM));
    assert!(close(sink.values(FieldKind::RainLastHour)[1], 5.0 * RAIN_TIP_MM));

    // Two hours on, the hour window has emptied but the day has not
    decoder.clock_mut().advance(120 * MINUTE_MS);
    decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 1_006), &mut sink).unwrap();
    assert!(close(sink.values(FieldKind::RainLastHour)[2], RAIN_TIP_MM));
    assert!(close(sink.values(FieldKind::RainLast24h)[2], 6.0 * RAIN_TIP_MM));
    assert!(close(sink.values(FieldKind::RainTotal)[2], 6.0 * RAIN_TIP_MM));
}

#[test]
fn user_reset_through_decoder() {
    let config = config_with(GAUGE_ID, &[(FieldKind::RainTotal, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 40), &mut sink).unwrap();
    decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 50), &mut sink).unwrap();
    assert_eq!(decoder.reset_rainfall(RainTarget::All), Ok(1));
    assert_eq!(
        decoder.registry().rainfall_state(GAUGE_ID),
        Some(RainfallState { baseline: Some(50), total_tips: 0 })
    );

    decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 52), &mut sink).unwrap();
    assert!(close(*sink.values(FieldKind::RainTotal).last().unwrap(), 2.0 * RAIN_TIP_MM));
}

#[test]
fn battery_swap_restarts_counter() {
    let config = config_with(GAUGE_ID, &[(FieldKind::RainDelta, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 90_000), &mut sink).unwrap();
    decoder.ingest_frame(&rain_gauge_frame(GAUGE_ID, 3), &mut sink).unwrap();
    assert!(close(sink.values(FieldKind::RainDelta)[0], 3.0 * RAIN_TIP_MM));
}

#[test]
fn forward_jump_after_restore_is_measured() {
    let mut rain = RainAccumulator::new();
    rain.restore(RainfallState { baseline: Some(100), total_tips: 20 });

    // Nine-bit counter moved more than half its range while the host was down
    let update = rain.update(400, 512, 0);
    assert!(close(update.delta_mm.unwrap(), 300.0 * RAIN_TIP_MM));
    assert_eq!(rain.snapshot().total_tips, 320);
}
