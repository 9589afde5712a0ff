//! Device Registry and Dispatch
//!
//! ## Overview
//!
//! The registry is the only stateful stage after the demodulator. It owns a
//! fixed-capacity arena of configured devices keyed by transmitter id, and
//! routes every field of every message to the host sensors bound to it.
//!
//! ```text
//!   Message ──▶ lookup id ──┬── configured ──▶ per field:
//!                           │                    bound?      ──no──▶ UnboundField
//!                           │                    plausible?  ──no──▶ Implausible
//!                           │                    confirmed?  ──no──▶ Unconfirmed
//!                           │                    └──▶ SensorSink::publish
//!                           │
//!                           └── unknown ─────▶ observed table ──▶ UnboundDevice
//! ```
//!
//! ## Device Lifecycle
//!
//! A configured device starts `Unknown` and becomes `Active` with its first
//! valid message. There is no way back: AcuRite transmitters do not announce
//! leaving, and a silent device is simply one with an old `last_seen`.
//!
//! ## Unconfigured Transmitters
//!
//! Neighbours' sensors are common. They are kept in a small table (id, model,
//! last seen, message count) so a host can show what it hears when a user
//! sets up a new sensor. When the table is full the entry seen longest ago is
//! replaced. Nothing from an unconfigured transmitter is ever routed.
//!
//! ## Confirmation
//!
//! AcuRite transmitters send each message three times. With confirmation
//! enabled for a device, a value is only published once the next decode
//! agrees with it: within 1.0 for temperature, humidity and strike distance,
//! exactly for counters. This suppresses the occasional frame whose 8-bit
//! checksum passes by chance.

use heapless::{FnvIndexMap, Vec};

use crate::config::{DecoderConfig, DeviceConfig};
use crate::constants::buffers::{MAX_DEVICES, MAX_OBSERVED_DEVICES};
use crate::constants::protocol::{CONFIRM_DELTA, DIRECTION_MAX_DEG, LUX_MAX, SPEED_MAX_KMH, UV_MAX};
use crate::diagnostics::Diagnostics;
use crate::errors::{ConfigError, ConfigResult, DecodeError, DecodeResult};
use crate::messages::{DeviceModel, Field, Header, Message};
use crate::rain::{RainAccumulator, RainfallState};
use crate::reading::{FieldKind, Reading};
use crate::time::Timestamp;
use crate::traits::SensorSink;

/// Lifecycle of a configured device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceStatus {
    /// Configured, nothing received yet
    Unknown,
    /// At least one valid message received
    Active,
}

/// Which rain accumulators to reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RainTarget {
    /// One device
    Device(u16),
    /// Every configured device
    All,
}

/// Outcome of routing one message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Transmitter the message came from
    pub device_id: u16,
    /// Readings handed to the sink
    pub published: u8,
    /// Fields dropped as unbound, implausible or unconfirmed
    pub skipped: u8,
}

const FIELD_KINDS: usize = FieldKind::ALL.len();

/// Last decoded value per field kind
#[derive(Debug, Clone, Default)]
struct ConfirmMemory {
    last: [Option<f32>; FIELD_KINDS],
}

impl ConfirmMemory {
    /// Store `value` and report whether the previous decode agrees with it
    fn check(&mut self, kind: FieldKind, value: f32) -> bool {
        let previous = self.last[kind as usize].replace(value);
        match kind {
            FieldKind::Temperature | FieldKind::Humidity | FieldKind::LightningDistance => {
                previous.map_or(false, |p| libm::fabsf(p - value) < CONFIRM_DELTA)
            }
            FieldKind::LightningCount | FieldKind::RainTotal => previous == Some(value),
            _ => true,
        }
    }
}

/// Runtime state of a configured device
#[derive(Debug, Clone)]
pub struct DeviceState {
    status: DeviceStatus,
    last_seen: Option<Timestamp>,
    messages: u32,
    channel: Option<char>,
    battery_low: bool,
    rain: RainAccumulator,
    confirm: ConfirmMemory,
}

impl DeviceState {
    fn new() -> Self {
        Self {
            status: DeviceStatus::Unknown,
            last_seen: None,
            messages: 0,
            channel: None,
            battery_low: false,
            rain: RainAccumulator::new(),
            confirm: ConfirmMemory::default(),
        }
    }

    fn mark_seen(&mut self, header: &Header, now: Timestamp) {
        self.status = DeviceStatus::Active;
        self.last_seen = Some(now);
        self.messages = self.messages.wrapping_add(1);
        self.channel = Some(header.channel);
        self.battery_low = header.battery_low;
    }

    /// Lifecycle state
    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    /// Time of the last valid message
    pub fn last_seen(&self) -> Option<Timestamp> {
        self.last_seen
    }

    /// Valid messages received
    pub fn messages(&self) -> u32 {
        self.messages
    }

    /// Channel switch position from the last message
    pub fn channel(&self) -> Option<char> {
        self.channel
    }

    /// Battery flag from the last message
    pub fn battery_low(&self) -> bool {
        self.battery_low
    }

    /// Rain accumulator
    pub fn rain(&self) -> &RainAccumulator {
        &self.rain
    }
}

/// Unconfigured transmitter seen on the air
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservedDevice {
    /// Transmitter id
    pub device_id: u16,
    /// Family of the last message
    pub model: DeviceModel,
    /// Time of the last message
    pub last_seen: Timestamp,
    /// Messages received
    pub messages: u32,
}

#[derive(Debug, Clone)]
struct DeviceSlot {
    config: DeviceConfig,
    state: DeviceState,
}

/// Fixed-capacity arena of configured devices
#[derive(Debug)]
pub struct DeviceRegistry {
    slots: FnvIndexMap<u16, DeviceSlot, MAX_DEVICES>,
    observed: Vec<ObservedDevice, MAX_OBSERVED_DEVICES>,
}

impl DeviceRegistry {
    /// Build the arena from a configuration, validating it first
    pub fn new(config: &DecoderConfig) -> ConfigResult<Self> {
        config.validate()?;

        let mut slots = FnvIndexMap::new();
        for device in &config.devices {
            let slot = DeviceSlot { config: device.clone(), state: DeviceState::new() };
            slots
                .insert(device.device_id, slot)
                .map_err(|_| ConfigError::TooManyDevices { capacity: MAX_DEVICES })?;
        }

        Ok(Self { slots, observed: Vec::new() })
    }

    /// Route one message
    ///
    /// Per-field faults are counted in `diagnostics` and reflected in
    /// [`Dispatch::skipped`]; they never stop the remaining fields. A message
    /// from an unconfigured id fails as a whole with
    /// [`DecodeError::UnboundDevice`].
    pub fn ingest<S: SensorSink + ?Sized>(
        &mut self,
        message: &Message,
        now: Timestamp,
        sink: &mut S,
        diagnostics: &mut Diagnostics,
    ) -> DecodeResult<Dispatch> {
        let header = *message.header();
        let device_id = header.device_id;

        let Some(slot) = self.slots.get_mut(&device_id) else {
            Self::observe(&mut self.observed, message, now);
            return Err(DecodeError::UnboundDevice { device_id });
        };

        let DeviceSlot { config, state } = slot;
        if let Some(model) = config.model {
            if model != message.model() {
                log_warn!(
                    "Device {:#06x} configured as {} but sent a {} message",
                    device_id,
                    model.name(),
                    message.model().name()
                );
            }
        }
        state.mark_seen(&header, now);

        let mut router = Router {
            device_id,
            config,
            sink,
            diagnostics,
            dispatch: Dispatch { device_id, ..Dispatch::default() },
        };

        for field in message.fields() {
            match field {
                Field::RainCounter { count, modulus } => {
                    if router.config.confirm
                        && !state.confirm.check(FieldKind::RainTotal, count as f32)
                    {
                        router.reject(DecodeError::Unconfirmed {
                            device_id,
                            kind: FieldKind::RainTotal,
                        });
                        continue;
                    }

                    let update = state.rain.update(count, modulus, now);
                    if !router.binds_rain() {
                        router.reject(DecodeError::UnboundField {
                            device_id,
                            kind: FieldKind::RainTotal,
                        });
                        continue;
                    }
                    if let Some(delta) = update.delta_mm {
                        router.publish_if_bound(FieldKind::RainDelta, delta);
                    }
                    router.publish_if_bound(FieldKind::RainTotal, update.total_mm);
                    router.publish_if_bound(FieldKind::RainLastHour, update.last_hour_mm);
                    router.publish_if_bound(FieldKind::RainLast24h, update.last_24h_mm);
                }
                _ => {
                    let kind = field.kind();
                    let value = field_value(&field);

                    if router.config.handle_for(kind).is_none() {
                        router.reject(DecodeError::UnboundField { device_id, kind });
                    } else if !is_plausible(&field) {
                        router.reject(DecodeError::Implausible { device_id, kind });
                    } else if router.config.confirm && !state.confirm.check(kind, value) {
                        router.reject(DecodeError::Unconfirmed { device_id, kind });
                    } else {
                        router.publish_if_bound(kind, value);
                    }
                }
            }
        }

        Ok(router.dispatch)
    }

    /// Zero rain totals and windows; baselines are kept
    ///
    /// Returns the number of accumulators reset.
    pub fn reset_rainfall(&mut self, target: RainTarget) -> DecodeResult<usize> {
        match target {
            RainTarget::Device(device_id) => {
                let slot = self
                    .slots
                    .get_mut(&device_id)
                    .ok_or(DecodeError::UnboundDevice { device_id })?;
                slot.state.rain.reset();
                log_info!("Rainfall reset for device {:#06x}", device_id);
                Ok(1)
            }
            RainTarget::All => {
                for slot in self.slots.values_mut() {
                    slot.state.rain.reset();
                }
                log_info!("Rainfall reset for {} device(s)", self.slots.len());
                Ok(self.slots.len())
            }
        }
    }

    /// Persistable rain state of a device
    pub fn rainfall_state(&self, device_id: u16) -> Option<RainfallState> {
        self.slots.get(&device_id).map(|s| s.state.rain.snapshot())
    }

    /// Resume a device's rain state after a reboot
    pub fn restore_rainfall(&mut self, device_id: u16, state: RainfallState) -> DecodeResult<()> {
        let slot = self
            .slots
            .get_mut(&device_id)
            .ok_or(DecodeError::UnboundDevice { device_id })?;
        slot.state.rain.restore(state);
        Ok(())
    }

    /// State of a configured device
    pub fn device(&self, device_id: u16) -> Option<&DeviceState> {
        self.slots.get(&device_id).map(|s| &s.state)
    }

    /// Configured devices and their state
    pub fn devices(&self) -> impl Iterator<Item = (u16, &DeviceState)> {
        self.slots.iter().map(|(id, slot)| (*id, &slot.state))
    }

    /// Unconfigured transmitters heard recently
    pub fn observed(&self) -> &[ObservedDevice] {
        &self.observed
    }

    fn observe(
        observed: &mut Vec<ObservedDevice, MAX_OBSERVED_DEVICES>,
        message: &Message,
        now: Timestamp,
    ) {
        let device_id = message.device_id();
        if let Some(entry) = observed.iter_mut().find(|o| o.device_id == device_id) {
            entry.model = message.model();
            entry.last_seen = now;
            entry.messages = entry.messages.wrapping_add(1);
            return;
        }

        if observed.is_full() {
            let oldest = observed
                .iter()
                .enumerate()
                .min_by_key(|(_, o)| o.last_seen)
                .map(|(i, _)| i);
            if let Some(index) = oldest {
                observed.swap_remove(index);
            }
        }

        log_debug!(
            "Unconfigured {} {:#06x} on channel {}",
            message.model().name(),
            device_id,
            message.header().channel
        );
        // Room was made above
        let _ = observed.push(ObservedDevice {
            device_id,
            model: message.model(),
            last_seen: now,
            messages: 1,
        });
    }
}

/// Routing context for one message
struct Router<'a, S: ?Sized> {
    device_id: u16,
    config: &'a DeviceConfig,
    sink: &'a mut S,
    diagnostics: &'a mut Diagnostics,
    dispatch: Dispatch,
}

impl<S: SensorSink + ?Sized> Router<'_, S> {
    fn publish_if_bound(&mut self, kind: FieldKind, value: f32) {
        let Some(handle) = self.config.handle_for(kind) else {
            return;
        };
        let reading = Reading { device_id: self.device_id, kind, value };
        self.sink.publish(handle, &reading);
        self.diagnostics.readings = self.diagnostics.readings.wrapping_add(1);
        self.dispatch.published = self.dispatch.published.saturating_add(1);
    }

    fn reject(&mut self, error: DecodeError) {
        log_trace!("Dropped field: {}", error);
        self.diagnostics.record(&error);
        self.dispatch.skipped = self.dispatch.skipped.saturating_add(1);
    }

    fn binds_rain(&self) -> bool {
        self.config.bindings.iter().any(|b| b.kind.is_rain())
    }
}

fn field_value(field: &Field) -> f32 {
    match *field {
        Field::Temperature(v)
        | Field::Humidity(v)
        | Field::WindSpeed(v)
        | Field::WindDirection(v)
        | Field::LightningDistance(v)
        | Field::Uv(v)
        | Field::Lux(v) => v,
        Field::RainCounter { count, .. } => count as f32,
        Field::LightningStrikes(n) => n as f32,
    }
}

/// Range check for values a noisy frame tends to corrupt
fn is_plausible(field: &Field) -> bool {
    match *field {
        Field::Uv(v) => (0.0..=UV_MAX).contains(&v),
        Field::Lux(v) => (0.0..=LUX_MAX).contains(&v),
        Field::WindDirection(v) => (0.0..=DIRECTION_MAX_DEG).contains(&v),
        Field::WindSpeed(v) => (0.0..=SPEED_MAX_KMH).contains(&v),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Atlas, AtlasData, RainGauge, TempHumidity};
    use crate::reading::SinkHandle;

    fn header(device_id: u16, message_type: u8) -> Header {
        Header { channel: 'A', device_id, battery_low: false, message_type }
    }

    fn tower(device_id: u16, temperature_c: f32, humidity: f32) -> Message {
        Message::TempHumidity(TempHumidity {
            header: header(device_id, 0x04),
            temperature_c,
            humidity,
        })
    }

    fn rain(device_id: u16, rain_count: u32) -> Message {
        Message::RainGauge(RainGauge { header: header(device_id, 0x30), rain_count })
    }

    fn registry(devices: &[DeviceConfig]) -> DeviceRegistry {
        let mut config = DecoderConfig::new();
        for d in devices {
            config = config.with_device(d.clone()).unwrap();
        }
        DeviceRegistry::new(&config).unwrap()
    }

    #[derive(Default)]
    struct Collect(std::vec::Vec<(SinkHandle, Reading)>);

    impl SensorSink for Collect {
        fn publish(&mut self, handle: SinkHandle, reading: &Reading) {
            self.0.push((handle, *reading));
        }
    }

    #[test]
    fn first_message_activates_device() {
        let device = DeviceConfig::new(0x1A2B)
            .bind(FieldKind::Temperature, SinkHandle(7))
            .unwrap();
        let mut reg = registry(&[device]);
        assert_eq!(reg.device(0x1A2B).map(|d| d.status()), Some(DeviceStatus::Unknown));

        let mut sink = Collect::default();
        let mut diag = Diagnostics::new();
        let dispatch = reg.ingest(&tower(0x1A2B, 21.5, 40.0), 1_000, &mut sink, &mut diag).unwrap();

        assert_eq!(dispatch, Dispatch { device_id: 0x1A2B, published: 1, skipped: 1 });
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].0, SinkHandle(7));
        assert_eq!(sink.0[0].1.value, 21.5);
        assert_eq!(diag.unbound_field, 1);

        let state = reg.device(0x1A2B).unwrap();
        assert_eq!(state.status(), DeviceStatus::Active);
        assert_eq!(state.last_seen(), Some(1_000));
        assert_eq!(state.messages(), 1);
        assert_eq!(state.channel(), Some('A'));
    }

    #[test]
    fn unconfigured_devices_are_observed_not_routed() {
        let mut reg = registry(&[]);
        let mut sink = Collect::default();
        let mut diag = Diagnostics::new();

        for i in 0..(MAX_OBSERVED_DEVICES as u16 + 2) {
            let result = reg.ingest(&tower(100 + i, 20.0, 50.0), i as u64, &mut sink, &mut diag);
            assert_eq!(result, Err(DecodeError::UnboundDevice { device_id: 100 + i }));
        }
        reg.ingest(&tower(109, 20.0, 50.0), 50, &mut sink, &mut diag).ok();

        assert!(sink.0.is_empty());
        assert_eq!(reg.observed().len(), MAX_OBSERVED_DEVICES);
        // The two oldest were evicted
        assert!(reg.observed().iter().all(|o| o.device_id >= 102));
        let repeat = reg.observed().iter().find(|o| o.device_id == 109).unwrap();
        assert_eq!((repeat.messages, repeat.last_seen), (2, 50));
    }

    #[test]
    fn rain_outputs_and_reset() {
        let device = DeviceConfig::new(0x0042)
            .bind(FieldKind::RainDelta, SinkHandle(1))
            .unwrap()
            .bind(FieldKind::RainTotal, SinkHandle(2))
            .unwrap();
        let mut reg = registry(&[device]);
        let mut sink = Collect::default();
        let mut diag = Diagnostics::new();

        // Baseline only: total published, no delta
        reg.ingest(&rain(0x0042, 100), 0, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].1.kind, FieldKind::RainTotal);
        assert_eq!(sink.0[0].1.value, 0.0);

        reg.ingest(&rain(0x0042, 110), 1_000, &mut sink, &mut diag).unwrap();
        let delta = sink.0.iter().rev().find(|(h, _)| *h == SinkHandle(1)).unwrap();
        assert!((delta.1.value - 2.54).abs() < 1e-4);

        assert_eq!(reg.reset_rainfall(RainTarget::Device(0x0042)), Ok(1));
        assert_eq!(reg.rainfall_state(0x0042).map(|s| s.total_tips), Some(0));
        assert_eq!(reg.rainfall_state(0x0042).and_then(|s| s.baseline), Some(110));
        assert_eq!(
            reg.reset_rainfall(RainTarget::Device(0x0001)),
            Err(DecodeError::UnboundDevice { device_id: 0x0001 })
        );
        assert_eq!(reg.reset_rainfall(RainTarget::All), Ok(1));
    }

    #[test]
    fn confirmation_waits_for_agreeing_repeat() {
        let device = DeviceConfig::new(0x1A2B)
            .with_confirm(true)
            .bind(FieldKind::Temperature, SinkHandle(0))
            .unwrap();
        let mut reg = registry(&[device]);
        let mut sink = Collect::default();
        let mut diag = Diagnostics::new();

        reg.ingest(&tower(0x1A2B, 21.0, 40.0), 0, &mut sink, &mut diag).unwrap();
        assert!(sink.0.is_empty());
        assert_eq!(diag.unconfirmed, 1);

        // Corrupt repeat disagrees
        reg.ingest(&tower(0x1A2B, 85.0, 40.0), 1, &mut sink, &mut diag).unwrap();
        assert!(sink.0.is_empty());

        reg.ingest(&tower(0x1A2B, 85.2, 40.0), 2, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].1.value, 85.2);
    }

    #[test]
    fn implausible_values_are_dropped() {
        let device = DeviceConfig::new(0x0155)
            .bind(FieldKind::WindSpeed, SinkHandle(0))
            .unwrap()
            .bind(FieldKind::Lux, SinkHandle(1))
            .unwrap()
            .bind(FieldKind::Uv, SinkHandle(2))
            .unwrap();
        let mut reg = registry(&[device]);
        let mut sink = Collect::default();
        let mut diag = Diagnostics::new();

        let atlas = Message::Atlas(Atlas {
            header: header(0x0155, 0x07),
            wind_speed_kmh: 12.0,
            data: AtlasData::Light { uv: 3.0, lux: 163_830.0 },
            lightning: None,
        });
        let dispatch = reg.ingest(&atlas, 0, &mut sink, &mut diag).unwrap();
        assert_eq!((dispatch.published, dispatch.skipped), (2, 1));
        assert_eq!(diag.implausible, 1);
        assert!(sink.0.iter().all(|(_, r)| r.kind != FieldKind::Lux));
    }

    #[test]
    fn restore_resumes_totals() {
        let device = DeviceConfig::new(0x0042).bind(FieldKind::RainTotal, SinkHandle(0)).unwrap();
        let mut reg = registry(&[device]);
        reg.restore_rainfall(0x0042, RainfallState { baseline: Some(10), total_tips: 100 })
            .unwrap();

        let mut sink = Collect::default();
        let mut diag = Diagnostics::new();
        reg.ingest(&rain(0x0042, 11), 0, &mut sink, &mut diag).unwrap();
        assert_eq!(reg.rainfall_state(0x0042).map(|s| s.total_tips), Some(101));
    }
}
