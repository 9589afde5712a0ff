//! Readings Delivered to Sensor Sinks
//!
//! A decoded message fans out into one [`Reading`] per bound field. The
//! reading is the whole contract with the host: which transmitter, which
//! quantity, the value, and the unit it is expressed in. How the host turns
//! that into a published state is its own business - the core only knows an
//! opaque [`SinkHandle`] per binding.
//!
//! ```text
//! Message::TempHumidity ──┬── Reading { 0x1a2b, Temperature, 23.5 } → handle 0
//!                         └── Reading { 0x1a2b, Humidity,    47.0 } → handle 1
//! ```

/// Kind of quantity a transmitter reports
///
/// Rain gets four kinds because the single raw tip counter feeds several
/// accumulators in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum FieldKind {
    /// Degrees Celsius
    Temperature = 0,
    /// Relative humidity, percent
    Humidity = 1,
    /// km/h
    WindSpeed = 2,
    /// Degrees from north
    WindDirection = 3,
    /// Rain since the previous message from the same device
    RainDelta = 4,
    /// Rain since boot or the last reset
    RainTotal = 5,
    /// Rain over the trailing hour
    RainLastHour = 6,
    /// Rain over the trailing 24 hours
    RainLast24h = 7,
    /// Lifetime strike count reported by the detector
    LightningCount = 8,
    /// Estimated distance to the last strike
    LightningDistance = 9,
    /// UV index
    Uv = 10,
    /// Illuminance, lx
    Lux = 11,
}

impl FieldKind {
    /// Every kind, in discriminant order
    pub const ALL: [FieldKind; 12] = [
        FieldKind::Temperature,
        FieldKind::Humidity,
        FieldKind::WindSpeed,
        FieldKind::WindDirection,
        FieldKind::RainDelta,
        FieldKind::RainTotal,
        FieldKind::RainLastHour,
        FieldKind::RainLast24h,
        FieldKind::LightningCount,
        FieldKind::LightningDistance,
        FieldKind::Uv,
        FieldKind::Lux,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            FieldKind::Temperature => "temperature",
            FieldKind::Humidity => "humidity",
            FieldKind::WindSpeed => "wind_speed",
            FieldKind::WindDirection => "wind_direction",
            FieldKind::RainDelta => "rain_delta",
            FieldKind::RainTotal => "rain_total",
            FieldKind::RainLastHour => "rain_last_hour",
            FieldKind::RainLast24h => "rain_last_24h",
            FieldKind::LightningCount => "lightning_count",
            FieldKind::LightningDistance => "lightning_distance",
            FieldKind::Uv => "uv",
            FieldKind::Lux => "lux",
        }
    }

    /// Get unit of measurement
    pub const fn unit(&self) -> &'static str {
        match self {
            FieldKind::Temperature => "°C",
            FieldKind::Humidity => "%",
            FieldKind::WindSpeed => "km/h",
            FieldKind::WindDirection => "°",
            FieldKind::RainDelta
            | FieldKind::RainTotal
            | FieldKind::RainLastHour
            | FieldKind::RainLast24h => "mm",
            FieldKind::LightningCount => "strikes",
            FieldKind::LightningDistance => "km",
            FieldKind::Uv => "index",
            FieldKind::Lux => "lx",
        }
    }

    /// Whether the value is derived from the rain tip counter
    pub const fn is_rain(&self) -> bool {
        matches!(
            self,
            FieldKind::RainDelta
                | FieldKind::RainTotal
                | FieldKind::RainLastHour
                | FieldKind::RainLast24h
        )
    }
}

/// Opaque handle to a host-side sensor
///
/// Assigned by the host when it builds the configuration; the core hands it
/// back on every publish and never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SinkHandle(pub u16);

/// One decoded value on its way to a sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Transmitter id the value came from
    pub device_id: u16,
    /// Quantity
    pub kind: FieldKind,
    /// Value in [`FieldKind::unit`] units
    pub value: f32,
}

impl Reading {
    /// Unit of [`Reading::value`]
    pub const fn unit(&self) -> &'static str {
        self.kind.unit()
    }
}
