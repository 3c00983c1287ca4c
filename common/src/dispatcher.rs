//! Outbound commands and the cache mutation each settlement drives.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::{
    attribute::Attribute,
    cache::AttributeCache,
    error::{HeaterError, TransportError},
    types::{BridgeValue, CommandPayload},
};

/// Command call supplied by the device integration. Only success or failure is inspected.
pub trait CommandSender {
    fn send_command(
        &self,
        device_id: &str,
        payload: &CommandPayload,
    ) -> impl Future<Output = Result<(), TransportError>>;
}

/// Sends one command per bridge write. No retry, no coalescing, no timeout:
/// success stores the requested bridge value, failure invalidates the cache.
#[derive(Debug)]
pub struct CommandDispatcher<S, C> {
    device_id: String,
    device_name: String,
    sender: S,
    cache: Arc<Mutex<C>>,
}

impl<S, C> CommandDispatcher<S, C>
where
    S: CommandSender,
    C: AttributeCache,
{
    pub fn new(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        sender: S,
        cache: Arc<Mutex<C>>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            sender,
            cache,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub async fn dispatch(
        &self,
        attribute: Attribute,
        requested: BridgeValue,
        payload: CommandPayload,
    ) -> Result<(), HeaterError> {
        info!(
            "[SET][{}] {attribute:?} -> {:?}",
            self.device_name, payload.commands
        );

        match self.sender.send_command(&self.device_id, &payload).await {
            Ok(()) => {
                lock(&self.cache).set(attribute, requested);
                Ok(())
            }
            Err(source) => {
                warn!("[SET][{}] {attribute:?} error: {source}", self.device_name);
                lock(&self.cache).invalidate(attribute);
                Err(HeaterError::Transport { attribute, source })
            }
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::CoarseCache,
        testing::RecordingSender,
        types::StatusValue,
    };
    use pretty_assertions::assert_eq;

    fn dispatcher(
        sender: RecordingSender,
    ) -> (CommandDispatcher<RecordingSender, CoarseCache>, Arc<Mutex<CoarseCache>>) {
        let cache = Arc::new(Mutex::new(CoarseCache::default()));
        let dispatcher = CommandDispatcher::new("dev-1", "Heater", sender, Arc::clone(&cache));
        (dispatcher, cache)
    }

    #[tokio::test]
    async fn success_stores_requested_bridge_value() {
        let (dispatcher, cache) = dispatcher(RecordingSender::default());
        let payload = CommandPayload::single("level", StatusValue::from("3"));

        dispatcher
            .dispatch(Attribute::RotationSpeed, BridgeValue::Int(67), payload.clone())
            .await
            .unwrap();

        assert_eq!(
            lock(&cache).get(Attribute::RotationSpeed),
            Some(&BridgeValue::Int(67))
        );
        assert_eq!(
            dispatcher.sender().sent(),
            vec![("dev-1".to_string(), payload)]
        );
    }

    #[tokio::test]
    async fn failure_invalidates_whole_cache_and_surfaces_error() {
        let sender = RecordingSender::default();
        sender.fail_next("cloud rejected command");
        let (dispatcher, cache) = dispatcher(sender);
        lock(&cache).set(Attribute::CurrentTemperature, BridgeValue::Int(21));

        let err = dispatcher
            .dispatch(
                Attribute::Active,
                BridgeValue::Int(1),
                CommandPayload::single("switch", StatusValue::Bool(true)),
            )
            .await
            .unwrap_err();

        match err {
            HeaterError::Transport { attribute, source } => {
                assert_eq!(attribute, Attribute::Active);
                assert_eq!(source.message(), "cloud rejected command");
            }
            other => panic!("unexpected error: {other}"),
        }
        let cache = lock(&cache);
        assert!(!cache.has_valid());
        assert_eq!(cache.get(Attribute::CurrentTemperature), None);
    }
}
