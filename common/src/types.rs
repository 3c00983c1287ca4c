use serde::{Deserialize, Serialize};

/// Device-native reading as reported by the cloud status feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl StatusValue {
    /// Truthiness as the device integration reports it: non-zero numbers and
    /// non-empty strings count as set.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::Float(value) => *value != 0.0 && !value.is_nan(),
            Self::String(value) => !value.is_empty(),
        }
    }

    /// Numeric view, accepting numeric strings (enumerated levels arrive as `"1"`, `"2"`, ...).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::String(value) => value.trim().parse::<f64>().ok(),
        }
    }
}

impl From<bool> for StatusValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for StatusValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for StatusValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<BridgeValue> for StatusValue {
    fn from(value: BridgeValue) -> Self {
        match value {
            BridgeValue::Bool(value) => Self::Bool(value),
            BridgeValue::Int(value) => Self::Int(value),
            BridgeValue::Float(value) => Self::Float(value),
            BridgeValue::String(value) => Self::String(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub code: String,
    pub value: StatusValue,
}

impl StatusEntry {
    pub fn new(code: impl Into<String>, value: impl Into<StatusValue>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }
}

/// Capability metadata. `values` is the JSON-encoded range spec exactly as the
/// cloud delivers it, decoded lazily by [`crate::functions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub code: String,
    pub values: String,
}

impl FunctionDescriptor {
    pub fn new(code: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            values: values.into(),
        }
    }
}

/// Value as seen by the accessory bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BridgeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl BridgeValue {
    pub fn is_truthy(&self) -> bool {
        StatusValue::from(self.clone()).is_truthy()
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) | Self::String(_) => None,
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
        }
    }
}

impl From<StatusValue> for BridgeValue {
    fn from(value: StatusValue) -> Self {
        match value {
            StatusValue::Bool(value) => Self::Bool(value),
            StatusValue::Int(value) => Self::Int(value),
            StatusValue::Float(value) => Self::Float(value),
            StatusValue::String(value) => Self::String(value),
        }
    }
}

impl From<i64> for BridgeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for BridgeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for BridgeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCommand {
    pub code: String,
    pub value: StatusValue,
}

/// Wire shape sent to the device. Always carries exactly one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub commands: Vec<DeviceCommand>,
}

impl CommandPayload {
    pub fn single(code: impl Into<String>, value: StatusValue) -> Self {
        Self {
            commands: vec![DeviceCommand {
                code: code.into(),
                value,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_value(self) -> i64 {
        match self {
            Self::Celsius => 0,
            Self::Fahrenheit => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "CELSIUS",
            Self::Fahrenheit => "FAHRENHEIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrentHeaterCoolerState {
    Inactive,
    Idle,
    Heating,
    Cooling,
}

impl CurrentHeaterCoolerState {
    pub fn as_value(self) -> i64 {
        match self {
            Self::Inactive => 0,
            Self::Idle => 1,
            Self::Heating => 2,
            Self::Cooling => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetHeaterCoolerState {
    Auto,
    Heat,
    Cool,
}

impl TargetHeaterCoolerState {
    pub fn as_value(self) -> i64 {
        match self {
            Self::Auto => 0,
            Self::Heat => 1,
            Self::Cool => 2,
        }
    }
}
