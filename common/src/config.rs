use serde::{Deserialize, Serialize};

use crate::types::{FunctionDescriptor, StatusEntry, TemperatureUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempRange {
    pub min: i64,
    pub max: i64,
}

impl TempRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn span(self) -> i64 {
        self.max - self.min
    }

    fn sanitize(&mut self) {
        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaterConfig {
    pub default_level_count: u32,
    pub celsius_set_range: TempRange,
    pub fahrenheit_set_range: TempRange,
    pub bridge_threshold_range: TempRange,
    pub current_temp_range: TempRange,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            default_level_count: 3,
            celsius_set_range: TempRange::new(30, 70),
            fahrenheit_set_range: TempRange::new(86, 158),
            bridge_threshold_range: TempRange::new(7, 30),
            current_temp_range: TempRange::new(-20, 122),
        }
    }
}

impl HeaterConfig {
    pub fn sanitize(&mut self) {
        self.default_level_count = self.default_level_count.max(1);
        self.celsius_set_range.sanitize();
        self.fahrenheit_set_range.sanitize();
        self.current_temp_range.sanitize();

        self.bridge_threshold_range.sanitize();
        if self.bridge_threshold_range.span() == 0 {
            self.bridge_threshold_range.max += 1;
        }
    }

    pub fn set_range_fallback(&self, unit: TemperatureUnit) -> TempRange {
        match unit {
            TemperatureUnit::Celsius => self.celsius_set_range,
            TemperatureUnit::Fahrenheit => self.fahrenheit_set_range,
        }
    }
}

/// Device record handed over by the device integration: identity, the initial
/// status snapshot and the capability list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub id: String,
    pub name: String,
    pub status: Vec<StatusEntry>,
    #[serde(default)]
    pub functions: Vec<FunctionDescriptor>,
}
