//! Which device status code currently backs each logical attribute group.

use crate::{
    attribute::Attribute,
    codes::{
        CODE_LEVEL, CODE_LOCK, CODE_SWING, CODE_SWITCH, CODE_TEMP_CURRENT_C, CODE_TEMP_CURRENT_F,
        CODE_TEMP_SET_C, CODE_TEMP_SET_F,
    },
    types::StatusEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Switch,
    Temperature,
    Lock,
    Speed,
    SetPoint,
    Swing,
}

impl Binding {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            CODE_SWITCH => Some(Self::Switch),
            CODE_TEMP_CURRENT_C | CODE_TEMP_CURRENT_F => Some(Self::Temperature),
            CODE_LOCK => Some(Self::Lock),
            CODE_LEVEL => Some(Self::Speed),
            CODE_TEMP_SET_C | CODE_TEMP_SET_F => Some(Self::SetPoint),
            CODE_SWING => Some(Self::Swing),
            _ => None,
        }
    }

    /// Attributes refreshed whenever an entry for this binding arrives.
    pub fn attributes(self) -> &'static [Attribute] {
        match self {
            // The heater has no independent mode, so power also pins both state attributes.
            Self::Switch => &[
                Attribute::Active,
                Attribute::CurrentHeaterCoolerState,
                Attribute::TargetHeaterCoolerState,
            ],
            Self::Temperature => &[
                Attribute::CurrentTemperature,
                Attribute::TemperatureDisplayUnits,
            ],
            Self::Lock => &[Attribute::LockPhysicalControls],
            Self::Speed => &[Attribute::RotationSpeed],
            Self::SetPoint => &[Attribute::HeatingThresholdTemperature],
            Self::Swing => &[Attribute::SwingMode],
        }
    }
}

/// Last entry seen for each binding. Codes are not known up front (a heater may
/// report Celsius or Fahrenheit codes), so every snapshot re-binds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusBindings {
    switch: Option<StatusEntry>,
    temperature: Option<StatusEntry>,
    lock: Option<StatusEntry>,
    speed: Option<StatusEntry>,
    set_point: Option<StatusEntry>,
    swing: Option<StatusEntry>,
}

impl StatusBindings {
    pub fn get(&self, binding: Binding) -> Option<&StatusEntry> {
        match binding {
            Binding::Switch => self.switch.as_ref(),
            Binding::Temperature => self.temperature.as_ref(),
            Binding::Lock => self.lock.as_ref(),
            Binding::Speed => self.speed.as_ref(),
            Binding::SetPoint => self.set_point.as_ref(),
            Binding::Swing => self.swing.as_ref(),
        }
    }

    pub fn code(&self, binding: Binding) -> Option<&str> {
        self.get(binding).map(|entry| entry.code.as_str())
    }

    /// Folds a snapshot into the record and returns the recognized entries in
    /// snapshot order. Later entries for the same binding overwrite earlier ones.
    pub fn merge(&mut self, snapshot: &[StatusEntry]) -> Vec<(Binding, StatusEntry)> {
        let routed: Vec<(Binding, StatusEntry)> = snapshot
            .iter()
            .filter_map(|entry| Binding::from_code(&entry.code).map(|binding| (binding, entry.clone())))
            .collect();

        for (binding, entry) in &routed {
            *self.slot_mut(*binding) = Some(entry.clone());
        }
        routed
    }

    fn slot_mut(&mut self, binding: Binding) -> &mut Option<StatusEntry> {
        match binding {
            Binding::Switch => &mut self.switch,
            Binding::Temperature => &mut self.temperature,
            Binding::Lock => &mut self.lock,
            Binding::Speed => &mut self.speed,
            Binding::SetPoint => &mut self.set_point,
            Binding::Swing => &mut self.swing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unrecognized_codes_are_ignored() {
        let mut bindings = StatusBindings::default();
        let routed = bindings.merge(&[
            StatusEntry::new("countdown", "1h"),
            StatusEntry::new("switch", true),
        ]);

        assert_eq!(routed, vec![(Binding::Switch, StatusEntry::new("switch", true))]);
        assert_eq!(bindings.code(Binding::Switch), Some("switch"));
        assert_eq!(bindings.get(Binding::Lock), None);
    }

    #[test]
    fn later_snapshot_rebinds_set_point_code() {
        let mut bindings = StatusBindings::default();
        bindings.merge(&[StatusEntry::new("set_water_temp", 50)]);
        bindings.merge(&[StatusEntry::new("temp_set_f", 120)]);

        assert_eq!(bindings.code(Binding::SetPoint), Some("temp_set_f"));
    }

    #[test]
    fn last_entry_in_snapshot_wins() {
        let mut bindings = StatusBindings::default();
        let routed = bindings.merge(&[
            StatusEntry::new("water_temp", 20),
            StatusEntry::new("temp_current_f", 70),
        ]);

        assert_eq!(routed.len(), 2);
        assert_eq!(
            bindings.get(Binding::Temperature),
            Some(&StatusEntry::new("temp_current_f", 70))
        );
    }

    #[test]
    fn bindings_untouched_by_snapshot_are_kept() {
        let mut bindings = StatusBindings::default();
        bindings.merge(&[StatusEntry::new("level", "2"), StatusEntry::new("lock", false)]);
        bindings.merge(&[StatusEntry::new("lock", true)]);

        assert_eq!(bindings.get(Binding::Speed), Some(&StatusEntry::new("level", "2")));
        assert_eq!(bindings.get(Binding::Lock), Some(&StatusEntry::new("lock", true)));
    }
}
