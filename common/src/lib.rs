pub mod accessory;
pub mod attribute;
pub mod binding;
pub mod cache;
pub mod codec;
pub mod codes;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod functions;
pub mod types;

#[cfg(test)]
mod testing;

pub use accessory::{AccessoryService, HeaterAccessory, RefreshMode};
pub use attribute::{Attribute, CharacteristicProps, Codec, WritePolicy};
pub use binding::{Binding, StatusBindings};
pub use cache::{AttributeCache, CachedAttribute, CoarseCache, PerAttributeCache};
pub use codec::ConversionContext;
pub use codes::*;
pub use config::{DeviceConfig, HeaterConfig, TempRange};
pub use dispatcher::{CommandDispatcher, CommandSender};
pub use error::{HeaterError, TransportError};
pub use types::{
    BridgeValue, CommandPayload, CurrentHeaterCoolerState, DeviceCommand, FunctionDescriptor,
    StatusEntry, StatusValue, TargetHeaterCoolerState, TemperatureUnit,
};
