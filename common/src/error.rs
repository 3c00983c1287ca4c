use thiserror::Error;

use crate::attribute::Attribute;

#[derive(Debug, Error)]
pub enum HeaterError {
    #[error("capability `{code}` has a malformed range spec")]
    MalformedDescriptor {
        code: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("capability `{code}` range spec is missing `{key}`")]
    MissingRangeKey { code: String, key: &'static str },
    #[error("{0:?} is read-only")]
    ReadOnly(Attribute),
    #[error("no status code is bound to {0:?} yet")]
    Unbound(Attribute),
    #[error("{attribute:?} cannot take value {value}")]
    InvalidValue { attribute: Attribute, value: String },
    #[error("command for {attribute:?} failed")]
    Transport {
        attribute: Attribute,
        #[source]
        source: TransportError,
    },
}

/// Opaque failure reported by the device integration's command call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
