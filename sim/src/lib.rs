//! In-memory heater that accepts commands like the cloud device would and
//! echoes the resulting status changes on a channel.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use heater_common::{
    AccessoryService, Attribute, BridgeValue, CharacteristicProps, CommandPayload, CommandSender,
    DeviceConfig, FunctionDescriptor, StatusEntry, TransportError,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct SimState {
    status: Vec<StatusEntry>,
    received: Vec<CommandPayload>,
    failures: VecDeque<String>,
    offline: bool,
}

/// Cloneable handle; every clone drives the same simulated device.
#[derive(Debug, Clone)]
pub struct SimulatedHeater {
    device: Arc<DeviceConfig>,
    state: Arc<Mutex<SimState>>,
    updates: mpsc::UnboundedSender<Vec<StatusEntry>>,
    latency: Duration,
}

impl SimulatedHeater {
    pub fn new(device: DeviceConfig) -> (Self, mpsc::UnboundedReceiver<Vec<StatusEntry>>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let state = SimState {
            status: device.status.clone(),
            ..SimState::default()
        };
        let heater = Self {
            device: Arc::new(device),
            state: Arc::new(Mutex::new(state)),
            updates,
            latency: Duration::ZERO,
        };
        (heater, rx)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Device record as the integration would hand it over, with the current status.
    pub fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            status: self.status(),
            ..(*self.device).clone()
        }
    }

    pub fn status(&self) -> Vec<StatusEntry> {
        self.lock().status.clone()
    }

    pub fn received(&self) -> Vec<CommandPayload> {
        self.lock().received.clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn fail_next(&self, message: &str) {
        self.lock().failures.push_back(message.to_string());
    }

    /// A change made on the device itself (front panel, another app).
    pub fn report(&self, entries: Vec<StatusEntry>) {
        {
            let mut state = self.lock();
            for entry in &entries {
                upsert(&mut state.status, entry.clone());
            }
        }
        self.emit(entries);
    }

    fn emit(&self, entries: Vec<StatusEntry>) {
        if self.updates.send(entries).is_err() {
            debug!("no listener for {} status updates", self.device.id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandSender for SimulatedHeater {
    async fn send_command(
        &self,
        device_id: &str,
        payload: &CommandPayload,
    ) -> Result<(), TransportError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let echoed = {
            let mut state = self.lock();
            if device_id != self.device.id {
                return Err(TransportError::new(format!("unknown device {device_id}")));
            }
            if state.offline {
                return Err(TransportError::new("device offline"));
            }
            if let Some(message) = state.failures.pop_front() {
                return Err(TransportError::new(message));
            }

            state.received.push(payload.clone());
            let echoed: Vec<StatusEntry> = payload
                .commands
                .iter()
                .map(|command| StatusEntry {
                    code: command.code.clone(),
                    value: command.value.clone(),
                })
                .collect();
            for entry in &echoed {
                upsert(&mut state.status, entry.clone());
            }
            echoed
        };

        info!("{} applied {:?}", self.device.name, payload.commands);
        self.emit(echoed);
        Ok(())
    }
}

fn upsert(status: &mut Vec<StatusEntry>, entry: StatusEntry) {
    match status.iter_mut().find(|current| current.code == entry.code) {
        Some(current) => current.value = entry.value,
        None => status.push(entry),
    }
}

/// Celsius water heater with declared capabilities, three speed levels.
pub fn celsius_heater() -> DeviceConfig {
    DeviceConfig {
        id: "bf2c5a1e0f7d3c9b1a".to_string(),
        name: "Bathroom heater".to_string(),
        status: vec![
            StatusEntry::new("switch", false),
            StatusEntry::new("water_temp", 24),
            StatusEntry::new("set_water_temp", 50),
            StatusEntry::new("lock", false),
            StatusEntry::new("level", "1"),
            StatusEntry::new("work_state", "standby"),
        ],
        functions: vec![
            FunctionDescriptor::new("switch", "{}"),
            FunctionDescriptor::new("lock", "{}"),
            FunctionDescriptor::new("level", r#"{"range":["1","2","3"]}"#),
            FunctionDescriptor::new(
                "temp_set",
                r#"{"unit":"℃","min":30,"max":70,"scale":0,"step":1}"#,
            ),
        ],
    }
}

/// Fahrenheit heater with no capability list at all.
pub fn fahrenheit_heater() -> DeviceConfig {
    DeviceConfig {
        id: "ebf1f0c2a9d84e2b77".to_string(),
        name: "Garage heater".to_string(),
        status: vec![
            StatusEntry::new("switch", true),
            StatusEntry::new("temp_current_f", 61),
            StatusEntry::new("temp_set_f", 122),
            StatusEntry::new("swing", true),
        ],
        functions: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    Registered(Attribute, CharacteristicProps),
    Pushed(Attribute, BridgeValue),
}

/// Bridge double that records registrations and live pushes.
#[derive(Debug, Clone, Default)]
pub struct BridgeRecorder {
    events: Arc<Mutex<Vec<BridgeEvent>>>,
}

impl BridgeRecorder {
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn pushed(&self) -> Vec<(Attribute, BridgeValue)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BridgeEvent::Pushed(attribute, value) => Some((attribute, value)),
                BridgeEvent::Registered(..) => None,
            })
            .collect()
    }

    fn record(&self, event: BridgeEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl AccessoryService for BridgeRecorder {
    fn register(&self, attribute: Attribute, props: &CharacteristicProps) {
        debug!("register {attribute:?} {props:?}");
        self.record(BridgeEvent::Registered(attribute, props.clone()));
    }

    fn update_value(&self, attribute: Attribute, value: &BridgeValue) {
        debug!("push {attribute:?} = {value:?}");
        self.record(BridgeEvent::Pushed(attribute, value.clone()));
    }
}
