//! Bridge-facing logical attributes and their lookup table.
//!
//! Every attribute carries its codec kind and write policy here, so the
//! orchestrator never branches on attribute identity itself.

use serde::{Deserialize, Serialize};

use crate::{
    binding::Binding,
    codes::{CODE_LOCK, CODE_SWING, CODE_SWITCH},
    config::HeaterConfig,
    types::{BridgeValue, CurrentHeaterCoolerState, TargetHeaterCoolerState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Active,
    CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
    CurrentTemperature,
    TemperatureDisplayUnits,
    LockPhysicalControls,
    RotationSpeed,
    SwingMode,
    HeatingThresholdTemperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Truthy device value to 1/0, bridge value to strict boolean.
    Boolean,
    /// Unit implied by the status code that carried the temperature.
    DisplayUnits,
    /// Discrete device level to a 0-100 percentage and back.
    Speed,
    /// Linear remap between the device set-point domain and the bridge domain.
    ThresholdTemperature,
    /// Constant bridge value, regardless of the device reading.
    Fixed(i64),
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Writes become a device command on the code bound to `binding`,
    /// or `default_code` while nothing is bound yet.
    Command {
        binding: Binding,
        default_code: Option<&'static str>,
    },
    /// Accepted and dropped without a command.
    Discard,
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub codec: Codec,
    pub write: WritePolicy,
}

/// Characteristic metadata handed to the bridge at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<i64>>,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::Active,
        Attribute::CurrentHeaterCoolerState,
        Attribute::TargetHeaterCoolerState,
        Attribute::CurrentTemperature,
        Attribute::TemperatureDisplayUnits,
        Attribute::LockPhysicalControls,
        Attribute::RotationSpeed,
        Attribute::SwingMode,
        Attribute::HeatingThresholdTemperature,
    ];

    pub fn spec(self) -> AttributeSpec {
        let (codec, write) = match self {
            Self::Active => (
                Codec::Boolean,
                WritePolicy::Command {
                    binding: Binding::Switch,
                    default_code: Some(CODE_SWITCH),
                },
            ),
            Self::CurrentHeaterCoolerState => (
                Codec::Fixed(CurrentHeaterCoolerState::Inactive.as_value()),
                WritePolicy::ReadOnly,
            ),
            Self::TargetHeaterCoolerState => (
                Codec::Fixed(TargetHeaterCoolerState::Heat.as_value()),
                WritePolicy::Discard,
            ),
            Self::CurrentTemperature => (Codec::Passthrough, WritePolicy::ReadOnly),
            Self::TemperatureDisplayUnits => (Codec::DisplayUnits, WritePolicy::Discard),
            Self::LockPhysicalControls => (
                Codec::Boolean,
                WritePolicy::Command {
                    binding: Binding::Lock,
                    default_code: Some(CODE_LOCK),
                },
            ),
            Self::RotationSpeed => (
                Codec::Speed,
                WritePolicy::Command {
                    binding: Binding::Speed,
                    default_code: None,
                },
            ),
            Self::SwingMode => (
                Codec::Boolean,
                WritePolicy::Command {
                    binding: Binding::Swing,
                    default_code: Some(CODE_SWING),
                },
            ),
            Self::HeatingThresholdTemperature => (
                Codec::ThresholdTemperature,
                WritePolicy::Command {
                    binding: Binding::SetPoint,
                    default_code: None,
                },
            ),
        };
        AttributeSpec { codec, write }
    }

    pub fn codec(self) -> Codec {
        self.spec().codec
    }

    /// Writes to exempt attributes are acknowledged without reaching the device.
    pub fn is_exempt(self) -> bool {
        self.spec().write == WritePolicy::Discard
    }

    pub fn props(self, config: &HeaterConfig, value: &BridgeValue) -> CharacteristicProps {
        match self {
            Self::CurrentTemperature => CharacteristicProps {
                min_value: Some(config.current_temp_range.min as f64),
                max_value: Some(config.current_temp_range.max as f64),
                min_step: Some(1.0),
                valid_values: None,
            },
            Self::HeatingThresholdTemperature => CharacteristicProps {
                min_value: Some(config.bridge_threshold_range.min as f64),
                max_value: Some(config.bridge_threshold_range.max as f64),
                min_step: Some(1.0),
                valid_values: None,
            },
            Self::TemperatureDisplayUnits => {
                let unit = value.as_f64().unwrap_or_default();
                CharacteristicProps {
                    min_value: Some(unit),
                    max_value: Some(unit),
                    min_step: None,
                    valid_values: Some(vec![unit as i64]),
                }
            }
            Self::TargetHeaterCoolerState => CharacteristicProps {
                valid_values: Some(vec![TargetHeaterCoolerState::Heat.as_value()]),
                ..CharacteristicProps::default()
            },
            _ => CharacteristicProps::default(),
        }
    }
}
