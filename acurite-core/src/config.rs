//! Decoder Configuration
//!
//! Everything the decoder needs to know up front: which transmitters to
//! listen to, which of their fields go to which host sensor, the pulse timing
//! bands and, when a sub-GHz radio is used, how to tune it.
//!
//! Configuration is checked once by [`DecoderConfig::validate`]; a decoder is
//! never built from a configuration that fails it. With the `serde` feature
//! the whole tree (de)serialises, so hosts can keep it in a file or in NVS:
//!
//! ```json
//! {
//!   "devices": [
//!     { "device_id": 6699, "model": "tower",
//!       "bindings": [ { "kind": "temperature", "handle": 0 } ] }
//!   ],
//!   "radio": { "frequency_hz": 433920000, "modulation": "ook", "bandwidth": "khz50_0" }
//! }
//! ```

use heapless::Vec;

use crate::constants::buffers::{MAX_BINDINGS_PER_DEVICE, MAX_DEVICES};
use crate::constants::protocol::MAX_DEVICE_ID;
use crate::constants::radio::{
    DEFAULT_FREQUENCY_HZ, FRF_SHIFT, FXOSC_HZ, MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ, OP_MODE_FSK,
    OP_MODE_OOK,
};
use crate::constants::timing::FRAME_TIMEOUT_US;
use crate::errors::{ConfigError, ConfigResult};
use crate::messages::DeviceModel;
use crate::reading::{FieldKind, SinkHandle};
use crate::symbol::SymbolTiming;

/// Route from one field of a device to a host sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldBinding {
    /// Field to route
    pub kind: FieldKind,
    /// Host sensor that receives it
    pub handle: SinkHandle,
}

/// One configured transmitter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Transmitter id as printed on the sensor label
    pub device_id: u16,
    /// Expected family; enables id-width and field checks
    #[cfg_attr(feature = "serde", serde(default))]
    pub model: Option<DeviceModel>,
    /// Field routes
    #[cfg_attr(feature = "serde", serde(default))]
    pub bindings: Vec<FieldBinding, MAX_BINDINGS_PER_DEVICE>,
    /// Hold values back until a repeat transmission confirms them
    #[cfg_attr(feature = "serde", serde(default))]
    pub confirm: bool,
}

impl DeviceConfig {
    /// Device with no bindings
    pub fn new(device_id: u16) -> Self {
        Self {
            device_id,
            model: None,
            bindings: Vec::new(),
            confirm: false,
        }
    }

    /// Declare the transmitter family
    pub fn with_model(mut self, model: DeviceModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Enable the confirmation filter
    pub fn with_confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    /// Route `kind` to `handle`
    pub fn bind(mut self, kind: FieldKind, handle: SinkHandle) -> ConfigResult<Self> {
        self.bindings
            .push(FieldBinding { kind, handle })
            .map_err(|_| ConfigError::TooManyBindings { device_id: self.device_id })?;
        Ok(self)
    }

    /// Host sensor bound to `kind`
    pub fn handle_for(&self, kind: FieldKind) -> Option<SinkHandle> {
        self.bindings.iter().find(|b| b.kind == kind).map(|b| b.handle)
    }

    /// Check id width, duplicate bindings and field compatibility
    pub fn validate(&self) -> ConfigResult<()> {
        let max = self.model.map_or(MAX_DEVICE_ID, |m| m.max_device_id());
        if self.device_id > max {
            return Err(ConfigError::DeviceIdOutOfRange { device_id: self.device_id, max });
        }

        for (i, binding) in self.bindings.iter().enumerate() {
            if self.bindings[..i].iter().any(|b| b.kind == binding.kind) {
                return Err(ConfigError::DuplicateBinding {
                    device_id: self.device_id,
                    kind: binding.kind,
                });
            }
            if let Some(model) = self.model {
                if !model.reports(binding.kind) {
                    return Err(ConfigError::IncompatibleField {
                        device_id: self.device_id,
                        kind: binding.kind,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Modulation of the radio front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Modulation {
    /// Frequency shift keying
    Fsk,
    /// On-off keying, what AcuRite transmitters use
    Ook,
}

impl Modulation {
    /// ModulationType bits for `RegOpMode`
    pub const fn op_mode_bits(&self) -> u8 {
        match self {
            Modulation::Fsk => OP_MODE_FSK,
            Modulation::Ook => OP_MODE_OOK,
        }
    }
}

/// Receiver channel filter bandwidth
///
/// Variants are the values the SX127x `RegRxBw` register can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[allow(missing_docs)]
pub enum RxBandwidth {
    Khz2_6,
    Khz3_1,
    Khz3_9,
    Khz5_2,
    Khz6_3,
    Khz7_8,
    Khz10_4,
    Khz12_5,
    Khz15_6,
    Khz20_8,
    Khz25_0,
    Khz31_3,
    Khz41_7,
    Khz50_0,
    Khz62_5,
    Khz83_3,
    Khz100_0,
    Khz125_0,
    Khz166_7,
    Khz200_0,
    Khz250_0,
}

impl RxBandwidth {
    /// `RegRxBw` value: mantissa in bits 4:3, exponent in bits 2:0
    pub const fn register(&self) -> u8 {
        match self {
            RxBandwidth::Khz2_6 => 0x17,
            RxBandwidth::Khz3_1 => 0x0F,
            RxBandwidth::Khz3_9 => 0x07,
            RxBandwidth::Khz5_2 => 0x16,
            RxBandwidth::Khz6_3 => 0x0E,
            RxBandwidth::Khz7_8 => 0x06,
            RxBandwidth::Khz10_4 => 0x15,
            RxBandwidth::Khz12_5 => 0x0D,
            RxBandwidth::Khz15_6 => 0x05,
            RxBandwidth::Khz20_8 => 0x14,
            RxBandwidth::Khz25_0 => 0x0C,
            RxBandwidth::Khz31_3 => 0x04,
            RxBandwidth::Khz41_7 => 0x13,
            RxBandwidth::Khz50_0 => 0x0B,
            RxBandwidth::Khz62_5 => 0x03,
            RxBandwidth::Khz83_3 => 0x12,
            RxBandwidth::Khz100_0 => 0x0A,
            RxBandwidth::Khz125_0 => 0x02,
            RxBandwidth::Khz166_7 => 0x11,
            RxBandwidth::Khz200_0 => 0x09,
            RxBandwidth::Khz250_0 => 0x01,
        }
    }
}

/// Tuning handed to the radio driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadioTuning {
    /// Carrier in Hz
    pub frequency_hz: u32,
    /// Modulation
    pub modulation: Modulation,
    /// Channel filter bandwidth
    pub bandwidth: RxBandwidth,
}

impl Default for RadioTuning {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            modulation: Modulation::Ook,
            bandwidth: RxBandwidth::Khz50_0,
        }
    }
}

impl RadioTuning {
    /// 24-bit `RegFrf` word: `frequency * 2^19 / FXOSC`
    pub const fn frf(&self) -> u32 {
        (((self.frequency_hz as u64) << FRF_SHIFT) / FXOSC_HZ) as u32
    }

    /// `RegFrfMsb`, `RegFrfMid`, `RegFrfLsb` in write order
    pub const fn frf_bytes(&self) -> [u8; 3] {
        let frf = self.frf();
        [(frf >> 16) as u8, (frf >> 8) as u8, frf as u8]
    }

    /// Check the carrier is inside the synthesiser range
    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&self.frequency_hz) {
            return Err(ConfigError::FrequencyOutOfRange {
                frequency_hz: self.frequency_hz,
                min_hz: MIN_FREQUENCY_HZ,
                max_hz: MAX_FREQUENCY_HZ,
            });
        }
        Ok(())
    }
}

/// Complete decoder configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Transmitters to route
    pub devices: Vec<DeviceConfig, MAX_DEVICES>,
    /// Pulse classification bands
    pub timing: SymbolTiming,
    /// Pulse time a frame may take before it is abandoned
    pub frame_timeout_us: u32,
    /// Radio tuning when a register-level front end is used
    pub radio: Option<RadioTuning>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            timing: SymbolTiming::default(),
            frame_timeout_us: FRAME_TIMEOUT_US,
            radio: None,
        }
    }
}

impl DecoderConfig {
    /// Default timing, no devices
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transmitter
    pub fn with_device(mut self, device: DeviceConfig) -> ConfigResult<Self> {
        self.devices
            .push(device)
            .map_err(|_| ConfigError::TooManyDevices { capacity: MAX_DEVICES })?;
        Ok(self)
    }

    /// Override the pulse bands
    pub fn with_timing(mut self, timing: SymbolTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Override the frame deadline
    pub fn with_frame_timeout(mut self, timeout_us: u32) -> Self {
        self.frame_timeout_us = timeout_us;
        self
    }

    /// Attach radio tuning
    pub fn with_radio(mut self, radio: RadioTuning) -> Self {
        self.radio = Some(radio);
        self
    }

    /// Configured transmitter by id
    pub fn device(&self, device_id: u16) -> Option<&DeviceConfig> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    /// Check the whole configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.timing.validate()?;
        if self.frame_timeout_us == 0 {
            return Err(ConfigError::InvalidTiming { reason: "frame timeout must be non-zero" });
        }
        if let Some(radio) = &self.radio {
            radio.validate()?;
        }

        for (i, device) in self.devices.iter().enumerate() {
            if self.devices[..i].iter().any(|d| d.device_id == device.device_id) {
                return Err(ConfigError::DuplicateDevice { device_id: device.device_id });
            }
            device.validate()?;
        }
        Ok(())
    }

    /// Log the devices and their routes, one line each
    #[allow(unused_variables)]
    pub fn log_summary(&self) {
        log_info!(
            "AcuRite decoder: {} device(s), bands {}/{}/{}us ±{}us",
            self.devices.len(),
            self.timing.sync_us,
            self.timing.one_us,
            self.timing.zero_us,
            self.timing.tolerance_us
        );
        if let Some(radio) = &self.radio {
            log_info!(
                "  radio {}Hz {:?} {:?} (frf {:#08x})",
                radio.frequency_hz,
                radio.modulation,
                radio.bandwidth,
                radio.frf()
            );
        }
        for device in &self.devices {
            log_info!(
                "  device {:#06x} ({}){}",
                device.device_id,
                device.model.map_or("any model", |m| m.name()),
                if device.confirm { " confirm" } else { "" }
            );
            for binding in &device.bindings {
                log_info!("    {} -> sink {}", binding.kind.name(), binding.handle.0);
            }
        }
    }
}
