//! Last-known bridge values and their validity.

use std::collections::HashMap;

use crate::{attribute::Attribute, types::BridgeValue};

/// Store of last-known values. Reads never return a value the policy considers
/// stale; how much a failed command invalidates is up to the implementation.
pub trait AttributeCache {
    /// `None` when the attribute was never observed or is currently invalid.
    fn get(&self, attribute: Attribute) -> Option<&BridgeValue>;

    fn set(&mut self, attribute: Attribute, value: BridgeValue);

    /// Called after a command for `failed` was rejected.
    fn invalidate(&mut self, failed: Attribute);

    fn has_valid(&self) -> bool;

    /// Readable attributes in declaration order.
    fn valid_entries(&self) -> Vec<(Attribute, BridgeValue)> {
        Attribute::ALL
            .into_iter()
            .filter_map(|attribute| self.get(attribute).map(|value| (attribute, value.clone())))
            .collect()
    }
}

/// Whole-cache validity: one failed command hides every attribute until the
/// next write (from a snapshot or a confirmed command) makes the cache valid again.
#[derive(Debug, Clone, Default)]
pub struct CoarseCache {
    entries: HashMap<Attribute, BridgeValue>,
    valid: bool,
}

impl AttributeCache for CoarseCache {
    fn get(&self, attribute: Attribute) -> Option<&BridgeValue> {
        if !self.valid {
            return None;
        }
        self.entries.get(&attribute)
    }

    fn set(&mut self, attribute: Attribute, value: BridgeValue) {
        self.entries.insert(attribute, value);
        self.valid = true;
    }

    fn invalidate(&mut self, _failed: Attribute) {
        self.valid = false;
    }

    fn has_valid(&self) -> bool {
        self.valid
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedAttribute {
    pub value: BridgeValue,
    pub valid: bool,
}

/// Only the attribute whose command failed becomes unreadable.
#[derive(Debug, Clone, Default)]
pub struct PerAttributeCache {
    entries: HashMap<Attribute, CachedAttribute>,
}

impl AttributeCache for PerAttributeCache {
    fn get(&self, attribute: Attribute) -> Option<&BridgeValue> {
        self.entries
            .get(&attribute)
            .filter(|entry| entry.valid)
            .map(|entry| &entry.value)
    }

    fn set(&mut self, attribute: Attribute, value: BridgeValue) {
        self.entries
            .insert(attribute, CachedAttribute { value, valid: true });
    }

    fn invalidate(&mut self, failed: Attribute) {
        if let Some(entry) = self.entries.get_mut(&failed) {
            entry.valid = false;
        }
    }

    fn has_valid(&self) -> bool {
        self.entries.values().any(|entry| entry.valid)
    }
}
