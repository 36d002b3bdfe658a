use serde::{Deserialize, Serialize};

use crate::{
    api::proto::{self, ProstMessage},
    error::ProtoError,
    identifiers::ServiceAddress,
};

/// Messages the local user can have seen or not.
pub trait ReadTracking {
    fn was_read(&self) -> bool;

    fn mark_as_read(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub timestamp: u64,
    pub author: ServiceAddress,
    pub body: Option<String>,
    read: bool,
}

impl IncomingMessage {
    pub fn new(timestamp: u64, author: ServiceAddress, body: Option<String>) -> Self {
        Self {
            timestamp,
            author,
            body,
            read: false,
        }
    }
}

/// Local notices such as "Alice joined the group".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoMessage {
    pub timestamp: u64,
    pub body: Option<String>,
    read: bool,
}

impl InfoMessage {
    pub fn new(timestamp: u64, body: Option<String>) -> Self {
        Self {
            timestamp,
            body,
            read: false,
        }
    }
}

/// A message that could not be processed, e.g. after a key change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub timestamp: u64,
    pub sender: Option<ServiceAddress>,
    pub body: Option<String>,
    read: bool,
}

impl ErrorMessage {
    pub fn new(timestamp: u64, sender: Option<ServiceAddress>, body: Option<String>) -> Self {
        Self {
            timestamp,
            sender,
            body,
            read: false,
        }
    }
}

macro_rules! impl_read_tracking {
    ($($message:ty),*) => {
        $(
            impl ReadTracking for $message {
                fn was_read(&self) -> bool {
                    self.read
                }

                fn mark_as_read(&mut self) {
                    self.read = true;
                }
            }
        )*
    };
}

impl_read_tracking!(IncomingMessage, InfoMessage, ErrorMessage);

/// A stored conversation entry that carries a read flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    Incoming(IncomingMessage),
    Info(InfoMessage),
    Error(ErrorMessage),
}

impl Interaction {
    pub fn timestamp(&self) -> u64 {
        match self {
            Interaction::Incoming(message) => message.timestamp,
            Interaction::Info(message) => message.timestamp,
            Interaction::Error(message) => message.timestamp,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        proto::InteractionRecord::from(self).encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtoError> {
        proto::InteractionRecord::decode(bytes)
            .map_err(|_| ProtoError)?
            .try_into()
    }
}

impl ReadTracking for Interaction {
    fn was_read(&self) -> bool {
        match self {
            Interaction::Incoming(message) => message.was_read(),
            Interaction::Info(message) => message.was_read(),
            Interaction::Error(message) => message.was_read(),
        }
    }

    fn mark_as_read(&mut self) {
        match self {
            Interaction::Incoming(message) => message.mark_as_read(),
            Interaction::Info(message) => message.mark_as_read(),
            Interaction::Error(message) => message.mark_as_read(),
        }
    }
}

impl From<&Interaction> for proto::InteractionRecord {
    fn from(value: &Interaction) -> Self {
        let (kind, author) = match value {
            Interaction::Incoming(message) => {
                (proto::InteractionKind::Incoming, Some(&message.author))
            }
            Interaction::Info(_) => (proto::InteractionKind::Info, None),
            Interaction::Error(message) => (proto::InteractionKind::Error, message.sender.as_ref()),
        };
        let body = match value {
            Interaction::Incoming(IncomingMessage { body, .. })
            | Interaction::Info(InfoMessage { body, .. })
            | Interaction::Error(ErrorMessage { body, .. }) => body.clone(),
        };

        Self {
            kind: kind.into(),
            timestamp: value.timestamp(),
            body,
            author: author.map(Into::into),
            read: value.was_read(),
        }
    }
}

impl TryFrom<proto::InteractionRecord> for Interaction {
    type Error = ProtoError;

    fn try_from(value: proto::InteractionRecord) -> Result<Self, ProtoError> {
        let author = value.author.map(ServiceAddress::try_from).transpose()?;

        Ok(
            match proto::InteractionKind::try_from(value.kind).map_err(|_| ProtoError)? {
                proto::InteractionKind::Incoming => Interaction::Incoming(IncomingMessage {
                    timestamp: value.timestamp,
                    author: author.ok_or(ProtoError)?,
                    body: value.body,
                    read: value.read,
                }),
                proto::InteractionKind::Info => Interaction::Info(InfoMessage {
                    timestamp: value.timestamp,
                    body: value.body,
                    read: value.read,
                }),
                proto::InteractionKind::Error => Interaction::Error(ErrorMessage {
                    timestamp: value.timestamp,
                    sender: author,
                    body: value.body,
                    read: value.read,
                }),
                proto::InteractionKind::Unknown => return Err(ProtoError),
            },
        )
    }
}
