//! Recording doubles for the command and bridge ports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::{
    accessory::AccessoryService,
    attribute::{Attribute, CharacteristicProps},
    dispatcher::{lock, CommandSender},
    error::TransportError,
    types::{BridgeValue, CommandPayload},
};

#[derive(Debug, Default)]
struct SenderState {
    sent: Vec<(String, CommandPayload)>,
    failures: VecDeque<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSender {
    state: Arc<Mutex<SenderState>>,
    gate: Option<Arc<Notify>>,
}

impl RecordingSender {
    /// Sender whose commands stay in flight until `gate` is notified.
    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub(crate) fn fail_next(&self, message: &str) {
        lock(&self.state).failures.push_back(message.to_string());
    }

    pub(crate) fn sent(&self) -> Vec<(String, CommandPayload)> {
        lock(&self.state).sent.clone()
    }
}

impl CommandSender for RecordingSender {
    async fn send_command(
        &self,
        device_id: &str,
        payload: &CommandPayload,
    ) -> Result<(), TransportError> {
        lock(&self.state)
            .sent
            .push((device_id.to_string(), payload.clone()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match lock(&self.state).failures.pop_front() {
            Some(message) => Err(TransportError::new(message)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ServiceEvent {
    Registered(Attribute, CharacteristicProps),
    Updated(Attribute, BridgeValue),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingService {
    events: Arc<Mutex<Vec<ServiceEvent>>>,
}

impl RecordingService {
    pub(crate) fn events(&self) -> Vec<ServiceEvent> {
        lock(&self.events).clone()
    }

    pub(crate) fn registered(&self) -> Vec<Attribute> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ServiceEvent::Registered(attribute, _) => Some(attribute),
                ServiceEvent::Updated(..) => None,
            })
            .collect()
    }

    pub(crate) fn updates(&self) -> Vec<(Attribute, BridgeValue)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ServiceEvent::Updated(attribute, value) => Some((attribute, value)),
                ServiceEvent::Registered(..) => None,
            })
            .collect()
    }
}

impl AccessoryService for RecordingService {
    fn register(&self, attribute: Attribute, props: &CharacteristicProps) {
        lock(&self.events).push(ServiceEvent::Registered(attribute, props.clone()));
    }

    fn update_value(&self, attribute: Attribute, value: &BridgeValue) {
        lock(&self.events).push(ServiceEvent::Updated(attribute, value.clone()));
    }
}
