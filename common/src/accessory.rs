//! Heater accessory: routes status snapshots into the bridge-facing attribute
//! set and turns bridge writes into device commands.
//!
//! The first snapshot (delivered with the device record) runs in
//! [`RefreshMode::Initializing`]: each computed value primes the cache and the
//! characteristic is registered with its props. Every later snapshot runs in
//! [`RefreshMode::Refreshing`]: values are cached and pushed live.
//!
//! Snapshot handling and command settlement share one cache without any
//! freshness token. Whichever runs last decides the cached value.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::{
    attribute::{Attribute, CharacteristicProps, WritePolicy},
    binding::StatusBindings,
    cache::{AttributeCache, CoarseCache},
    codec::ConversionContext,
    config::{DeviceConfig, HeaterConfig},
    dispatcher::{lock, CommandDispatcher, CommandSender},
    error::HeaterError,
    types::{BridgeValue, CommandPayload, StatusEntry},
};

/// Bridge side of the accessory: characteristic registration and live pushes.
pub trait AccessoryService {
    fn register(&self, attribute: Attribute, props: &CharacteristicProps);

    fn update_value(&self, attribute: Attribute, value: &BridgeValue);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    Initializing,
    Refreshing,
}

pub struct HeaterAccessory<S, B, C = CoarseCache> {
    name: String,
    config: HeaterConfig,
    context: ConversionContext,
    bindings: Mutex<StatusBindings>,
    cache: Arc<Mutex<C>>,
    dispatcher: CommandDispatcher<S, C>,
    service: B,
}

impl<S, B, C> HeaterAccessory<S, B, C>
where
    S: CommandSender,
    B: AccessoryService,
    C: AttributeCache + Default,
{
    /// Builds the accessory from the device record and runs the initial snapshot.
    ///
    /// Fails when a capability descriptor cannot be decoded.
    pub fn from_device(
        device: DeviceConfig,
        config: HeaterConfig,
        sender: S,
        service: B,
    ) -> Result<Self, HeaterError> {
        Self::with_cache(device, config, sender, service, C::default())
    }
}

impl<S, B, C> HeaterAccessory<S, B, C>
where
    S: CommandSender,
    B: AccessoryService,
    C: AttributeCache,
{
    pub fn with_cache(
        device: DeviceConfig,
        mut config: HeaterConfig,
        sender: S,
        service: B,
        cache: C,
    ) -> Result<Self, HeaterError> {
        config.sanitize();
        let context = ConversionContext::from_functions(&device.functions, &config)?;
        debug!(
            "[{}] {} speed levels, set-point range {:?}",
            device.name,
            context.level_count(),
            context.temp_set_range()
        );

        let cache = Arc::new(Mutex::new(cache));
        let dispatcher =
            CommandDispatcher::new(device.id, device.name.clone(), sender, Arc::clone(&cache));

        let accessory = Self {
            name: device.name,
            config,
            context,
            bindings: Mutex::new(StatusBindings::default()),
            cache,
            dispatcher,
            service,
        };
        accessory.refresh(&device.status, RefreshMode::Initializing);
        Ok(accessory)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_id(&self) -> &str {
        self.dispatcher.device_id()
    }

    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    pub fn service(&self) -> &B {
        &self.service
    }

    pub fn sender(&self) -> &S {
        self.dispatcher.sender()
    }

    /// Update event from the device integration.
    pub fn update_state(&self, status: &[StatusEntry]) {
        self.refresh(status, RefreshMode::Refreshing);
    }

    pub fn refresh(&self, status: &[StatusEntry], mode: RefreshMode) {
        let routed = lock(&self.bindings).merge(status);

        for (binding, entry) in routed {
            for &attribute in binding.attributes() {
                let Some(value) = self.context.device_to_bridge(attribute, &entry) else {
                    warn!(
                        "[{}] ignoring unreadable `{}` value {:?}",
                        self.name, entry.code, entry.value
                    );
                    continue;
                };
                self.publish(attribute, value, mode);
            }
        }
    }

    /// Get accessor. `None` means the accessor does not answer: the attribute
    /// was never observed or the cache is currently invalid.
    pub fn read(&self, attribute: Attribute) -> Option<BridgeValue> {
        let cache = lock(&self.cache);
        if !cache.has_valid() {
            return None;
        }
        cache.get(attribute).cloned()
    }

    /// Set accessor. Exempt attributes are acknowledged without a command;
    /// everything else settles exactly one command and one cache mutation.
    pub async fn write(&self, attribute: Attribute, value: BridgeValue) -> Result<(), HeaterError> {
        let code = match attribute.spec().write {
            WritePolicy::Discard => {
                debug!("[{}] discarding write to {attribute:?}", self.name);
                return Ok(());
            }
            WritePolicy::ReadOnly => return Err(HeaterError::ReadOnly(attribute)),
            WritePolicy::Command {
                binding,
                default_code,
            } => {
                let bound = lock(&self.bindings).code(binding).map(str::to_string);
                bound
                    .or_else(|| default_code.map(str::to_string))
                    .ok_or(HeaterError::Unbound(attribute))?
            }
        };

        let device_value = self.context.bridge_to_device(attribute, &code, &value)?;
        self.dispatcher
            .dispatch(attribute, value, CommandPayload::single(code, device_value))
            .await
    }

    /// Currently readable attributes and their values.
    pub fn snapshot(&self) -> Vec<(Attribute, BridgeValue)> {
        lock(&self.cache).valid_entries()
    }

    fn publish(&self, attribute: Attribute, value: BridgeValue, mode: RefreshMode) {
        lock(&self.cache).set(attribute, value.clone());

        match mode {
            RefreshMode::Initializing => {
                let props = attribute.props(&self.config, &value);
                self.service.register(attribute, &props);
            }
            RefreshMode::Refreshing => self.service.update_value(attribute, &value),
        }
    }
}
