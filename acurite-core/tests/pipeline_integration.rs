//! Integration tests for the receive chain
//!
//! Drives the decoder the way firmware does: timed edges from a receiver,
//! whole payloads from a packet radio, or a polled frame source.

mod common;

use acurite_core::time::FixedTime;
use acurite_core::{
    AssemblerState, DecodeError, Decoder, Demodulator, DeviceConfig, DeviceStatus, Dispatch,
    FieldKind, PulseEdge, PulseFrames, PulseSlice, SinkHandle,
};

use common::{
    atlas_climate_frame, config_with, pulse_train, repeated_train, tower_frame, RecordingSink,
    TOWER_FRAME, TOWER_ID,
};

fn feed(
    decoder: &mut Decoder<FixedTime>,
    edges: &[PulseEdge],
    sink: &mut RecordingSink,
) -> Vec<Dispatch> {
    edges
        .iter()
        .filter_map(|edge| decoder.ingest_edge(*edge, sink).ok().flatten())
        .collect()
}

#[test]
fn tower_pulse_train_publishes_temperature_and_humidity() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 0), (FieldKind::Humidity, 1)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let dispatches = feed(&mut decoder, &pulse_train(&TOWER_FRAME), &mut sink);

    assert_eq!(dispatches.len(), 1);
    assert_eq!(dispatches[0], Dispatch { device_id: TOWER_ID, published: 2, skipped: 0 });
    assert_eq!(sink.readings.len(), 2);
    assert_eq!(sink.readings[0].0, SinkHandle(0));
    assert_eq!(sink.values(FieldKind::Temperature), vec![23.5]);
    assert_eq!(sink.readings[1].0, SinkHandle(1));
    assert_eq!(sink.values(FieldKind::Humidity), vec![47.0]);

    let device = decoder.registry().device(TOWER_ID).unwrap();
    assert_eq!(device.status(), DeviceStatus::Active);
    assert_eq!(device.channel(), Some('A'));
    assert!(!device.battery_low());
}

#[test]
fn atlas_pulse_train_publishes_wind_and_climate() {
    let atlas_id = 0x0155;
    let config = config_with(
        atlas_id,
        &[(FieldKind::WindSpeed, 0), (FieldKind::Temperature, 1), (FieldKind::Humidity, 2)],
    );
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    // 10 counts of wind, 68 °F, 55 %
    let frame = atlas_climate_frame(atlas_id, 10, 360, 55);
    let dispatches = feed(&mut decoder, &pulse_train(&frame), &mut sink);

    assert_eq!(dispatches, vec![Dispatch { device_id: atlas_id, published: 3, skipped: 0 }]);
    assert_eq!(
        sink.kinds(),
        vec![FieldKind::WindSpeed, FieldKind::Temperature, FieldKind::Humidity]
    );
    assert!((sink.values(FieldKind::WindSpeed)[0] - 16.0934).abs() < 1e-3);
    assert_eq!(sink.values(FieldKind::Temperature), vec![20.0]);
    assert_eq!(sink.values(FieldKind::Humidity), vec![55.0]);
    assert_eq!(decoder.registry().device(atlas_id).map(|d| d.channel()), Some(Some('A')));
}

#[test]
fn unbound_field_is_never_dispatched() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 3)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let dispatches = feed(&mut decoder, &repeated_train(&TOWER_FRAME, 3), &mut sink);

    assert_eq!(dispatches.len(), 3);
    assert_eq!(sink.kinds(), vec![FieldKind::Temperature; 3]);
    assert_eq!(decoder.diagnostics().unbound_field, 3);
}

#[test]
fn confirmation_uses_the_repeat_transmissions() {
    let device = DeviceConfig::new(TOWER_ID)
        .with_confirm(true)
        .bind(FieldKind::Temperature, SinkHandle(0))
        .unwrap();
    let config = acurite_core::DecoderConfig::new().with_device(device).unwrap();
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let dispatches = feed(&mut decoder, &repeated_train(&TOWER_FRAME, 3), &mut sink);

    assert_eq!(dispatches.len(), 3);
    assert_eq!(dispatches[0].published, 0);
    assert_eq!(sink.values(FieldKind::Temperature), vec![23.5, 23.5]);
    assert_eq!(decoder.diagnostics().unconfirmed, 1);
}

#[test]
fn stalled_preamble_returns_to_searching() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let train = pulse_train(&TOWER_FRAME);
    let (preamble, bits) = train.split_at(8);
    assert!(feed(&mut decoder, preamble, &mut sink).is_empty());
    assert!(decoder.expire_stalled(1_000_000).is_ok());

    assert_eq!(decoder.assembler_state(), AssemblerState::Searching { syncs: 0 });
    assert_eq!(decoder.diagnostics().frame_timeout, 0);

    // The bits alone, without a fresh preamble, are not a frame
    assert!(feed(&mut decoder, bits, &mut sink).is_empty());
    assert!(sink.readings.is_empty());
    assert_eq!(decoder.diagnostics().frames, 0);
}

#[test]
fn frame_cut_short_times_out() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let partial = &pulse_train(&TOWER_FRAME)[..20];
    assert!(feed(&mut decoder, partial, &mut sink).is_empty());
    assert!(matches!(decoder.assembler_state(), AssemblerState::Receiving { bits: 6, .. }));

    assert!(matches!(
        decoder.expire_stalled(200_000),
        Err(DecodeError::FrameTimeout { bits: 6, .. })
    ));
    assert_eq!(decoder.diagnostics().frame_timeout, 1);
    assert!(sink.readings.is_empty());
}

#[test]
fn noise_before_a_frame_is_counted_and_survived() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let mut edges = vec![PulseEdge::high(50), PulseEdge::low(3_000)];
    edges.extend(pulse_train(&TOWER_FRAME));

    let dispatches = feed(&mut decoder, &edges, &mut sink);
    assert_eq!(dispatches.len(), 1);
    assert_eq!(decoder.diagnostics().desync, 2);
    assert_eq!(sink.values(FieldKind::Temperature), vec![23.5]);
}

#[test]
fn polled_pulse_source() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let edges = pulse_train(&tower_frame(TOWER_ID, -52, 80));
    let mut frames = PulseFrames::new(PulseSlice::new(&edges), Demodulator::default());

    let dispatch = decoder.poll(&mut frames, &mut sink).unwrap();
    assert_eq!(dispatch.published, 1);
    assert_eq!(sink.values(FieldKind::Temperature), vec![-5.2]);
    assert!(matches!(decoder.poll(&mut frames, &mut sink), Err(nb::Error::WouldBlock)));
}

#[test]
fn unconfigured_transmitter_is_observed() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(5_000)).unwrap();
    let mut sink = RecordingSink::new();

    let neighbour = tower_frame(0x0777, 180, 55);
    assert_eq!(
        decoder.ingest_frame(&neighbour, &mut sink),
        Err(DecodeError::UnboundDevice { device_id: 0x0777 })
    );

    assert!(sink.readings.is_empty());
    let observed = decoder.registry().observed();
    assert_eq!(observed.len(), 1);
    assert_eq!((observed[0].device_id, observed[0].last_seen), (0x0777, 5_000));
    assert_eq!(decoder.diagnostics().unbound_device, 1);
}

#[test]
fn corrupted_bit_is_rejected() {
    let config = config_with(TOWER_ID, &[(FieldKind::Temperature, 0)]);
    let mut decoder = Decoder::new(&config, FixedTime::new(0)).unwrap();
    let mut sink = RecordingSink::new();

    let mut bad = TOWER_FRAME;
    bad[6] = 0x55;
    assert_eq!(
        decoder.ingest_frame(&bad, &mut sink),
        Err(DecodeError::ChecksumMismatch { computed: 0x54, received: 0x55 })
    );
    assert!(sink.readings.is_empty());
    assert_eq!(decoder.diagnostics().link_faults(), 1);
}
