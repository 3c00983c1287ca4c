//! Pure conversions between device-native and bridge-facing values.

use crate::{
    attribute::{Attribute, Codec},
    codes::CODE_TEMP_CURRENT_C,
    config::{HeaterConfig, TempRange},
    error::HeaterError,
    functions::{resolve_level_count, resolve_temp_range, set_point_unit},
    types::{BridgeValue, FunctionDescriptor, StatusEntry, StatusValue, TemperatureUnit},
};

/// Conversion parameters derived once from the capability list.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionContext {
    level_count: u32,
    speed_coefficient: f64,
    temp_set_range: Option<TempRange>,
    celsius_fallback: TempRange,
    fahrenheit_fallback: TempRange,
    bridge_threshold_range: TempRange,
}

impl ConversionContext {
    pub fn new(level_count: u32, temp_set_range: Option<TempRange>, config: &HeaterConfig) -> Self {
        let level_count = level_count.max(1);
        Self {
            level_count,
            speed_coefficient: 100.0 / f64::from(level_count),
            temp_set_range,
            celsius_fallback: config.celsius_set_range,
            fahrenheit_fallback: config.fahrenheit_set_range,
            bridge_threshold_range: config.bridge_threshold_range,
        }
    }

    pub fn from_functions(
        functions: &[FunctionDescriptor],
        config: &HeaterConfig,
    ) -> Result<Self, HeaterError> {
        let level_count = resolve_level_count(functions, config)?;
        let temp_set_range = resolve_temp_range(functions, config)?;
        Ok(Self::new(level_count, temp_set_range, config))
    }

    pub fn level_count(&self) -> u32 {
        self.level_count
    }

    pub fn speed_coefficient(&self) -> f64 {
        self.speed_coefficient
    }

    pub fn temp_set_range(&self) -> Option<TempRange> {
        self.temp_set_range
    }

    /// Device set-point domain for a set-point status code: the declared range
    /// if the capability list had one, otherwise the fallback for the code's unit.
    pub fn device_set_range(&self, code: &str) -> TempRange {
        self.temp_set_range.unwrap_or_else(|| match set_point_unit(code) {
            Some(TemperatureUnit::Fahrenheit) => self.fahrenheit_fallback,
            _ => self.celsius_fallback,
        })
    }

    /// Bridge value for `attribute` computed from the entry bound to it.
    /// `None` when the reading cannot be interpreted (non-numeric level or set-point).
    pub fn device_to_bridge(&self, attribute: Attribute, entry: &StatusEntry) -> Option<BridgeValue> {
        match attribute.codec() {
            Codec::Boolean => Some(bool_to_bridge(&entry.value)),
            Codec::DisplayUnits => Some(BridgeValue::Int(display_unit(&entry.code).as_value())),
            Codec::Speed => entry
                .value
                .as_f64()
                .map(|level| BridgeValue::Int(level_to_percent(level, self.speed_coefficient))),
            Codec::ThresholdTemperature => entry.value.as_f64().map(|value| {
                BridgeValue::Int(remap_to_bridge(
                    value,
                    self.device_set_range(&entry.code),
                    self.bridge_threshold_range,
                ))
            }),
            Codec::Fixed(value) => Some(BridgeValue::Int(value)),
            Codec::Passthrough => Some(entry.value.clone().into()),
        }
    }

    /// Device value for a bridge write aimed at `code`.
    pub fn bridge_to_device(
        &self,
        attribute: Attribute,
        code: &str,
        value: &BridgeValue,
    ) -> Result<StatusValue, HeaterError> {
        match attribute.codec() {
            Codec::Boolean => Ok(StatusValue::Bool(value.is_truthy())),
            Codec::Speed => {
                let percent = finite(attribute, value)?;
                let level = percent_to_level(percent, self.speed_coefficient, self.level_count);
                Ok(StatusValue::String(level.to_string()))
            }
            Codec::ThresholdTemperature => {
                let bridge = finite(attribute, value)?;
                Ok(StatusValue::Int(remap_to_device(
                    bridge,
                    self.bridge_threshold_range,
                    self.device_set_range(code),
                )))
            }
            Codec::DisplayUnits | Codec::Fixed(_) | Codec::Passthrough => Ok(value.clone().into()),
        }
    }
}

fn finite(attribute: Attribute, value: &BridgeValue) -> Result<f64, HeaterError> {
    value
        .as_f64()
        .filter(|number| number.is_finite())
        .ok_or_else(|| HeaterError::InvalidValue {
            attribute,
            value: format!("{value:?}"),
        })
}

pub fn bool_to_bridge(value: &StatusValue) -> BridgeValue {
    BridgeValue::Int(i64::from(value.is_truthy()))
}

pub fn display_unit(code: &str) -> TemperatureUnit {
    if code == CODE_TEMP_CURRENT_C {
        TemperatureUnit::Celsius
    } else {
        TemperatureUnit::Fahrenheit
    }
}

/// `floor(level * coefficient)`: level 1..=n onto 0..=100.
pub fn level_to_percent(level: f64, speed_coefficient: f64) -> i64 {
    (level * speed_coefficient).floor() as i64
}

/// Floor-bucketing with a +1 offset, clamped to `1..=level_count`.
pub fn percent_to_level(percent: f64, speed_coefficient: f64, level_count: u32) -> u32 {
    let level = (percent / speed_coefficient).floor() + 1.0;
    level.clamp(1.0, f64::from(level_count.max(1))) as u32
}

/// Bridge to device set-point. Rounds half away from zero.
pub fn remap_to_device(value: f64, bridge: TempRange, device: TempRange) -> i64 {
    linear(value, bridge, device).round() as i64
}

/// Device to bridge set-point. Exact halves resolve to even, which keeps a
/// device -> bridge -> device round trip within one device unit.
pub fn remap_to_bridge(value: f64, device: TempRange, bridge: TempRange) -> i64 {
    linear(value, device, bridge).round_ties_even() as i64
}

fn linear(value: f64, from: TempRange, to: TempRange) -> f64 {
    if from.span() == 0 {
        return to.min as f64;
    }
    ((value - from.min as f64) / from.span() as f64) * to.span() as f64 + to.min as f64
}
