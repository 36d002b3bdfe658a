//! Outgoing messages and their per-recipient delivery state.
//!
//! Older records stored a single message-wide state plus a "was delivered"
//! flag. Those are upgraded to one state per recipient the first time the
//! state is read, and only the upgraded form is written afterwards.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    api::proto::{self, ProstMessage},
    error::ProtoError,
    identifiers::ServiceAddress,
};

/// Message-wide state written by older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyMessageState {
    Sending,
    Failed,
    SentObsolete,
    DeliveredObsolete,
    Sent,
    Pending,
}

impl LegacyMessageState {
    /// The per-recipient status this legacy state stands for.
    pub fn upgrade(self, was_delivered: bool) -> DeliveryStatus {
        match self {
            LegacyMessageState::Sending => DeliveryStatus::Sending,
            LegacyMessageState::Pending => DeliveryStatus::Pending,
            LegacyMessageState::Failed => DeliveryStatus::Failed,
            LegacyMessageState::DeliveredObsolete => DeliveryStatus::Delivered,
            LegacyMessageState::Sent | LegacyMessageState::SentObsolete if was_delivered => {
                DeliveryStatus::Delivered
            }
            LegacyMessageState::Sent | LegacyMessageState::SentObsolete => DeliveryStatus::Sent,
        }
    }
}

impl From<LegacyMessageState> for proto::LegacyMessageState {
    fn from(value: LegacyMessageState) -> Self {
        match value {
            LegacyMessageState::Sending => proto::LegacyMessageState::Sending,
            LegacyMessageState::Failed => proto::LegacyMessageState::Failed,
            LegacyMessageState::SentObsolete => proto::LegacyMessageState::SentObsolete,
            LegacyMessageState::DeliveredObsolete => proto::LegacyMessageState::DeliveredObsolete,
            LegacyMessageState::Sent => proto::LegacyMessageState::Sent,
            LegacyMessageState::Pending => proto::LegacyMessageState::Pending,
        }
    }
}

impl TryFrom<i32> for LegacyMessageState {
    type Error = ProtoError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(
            match proto::LegacyMessageState::try_from(value).map_err(|_| ProtoError)? {
                proto::LegacyMessageState::Sending => LegacyMessageState::Sending,
                proto::LegacyMessageState::Failed => LegacyMessageState::Failed,
                proto::LegacyMessageState::SentObsolete => LegacyMessageState::SentObsolete,
                proto::LegacyMessageState::DeliveredObsolete => {
                    LegacyMessageState::DeliveredObsolete
                }
                proto::LegacyMessageState::Sent => LegacyMessageState::Sent,
                proto::LegacyMessageState::Pending => LegacyMessageState::Pending,
            },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sending,
    Pending,
    Failed,
    Sent,
    Delivered,
    Read,
    Viewed,
    /// The recipient was dropped from the send (e.g. left the group).
    Skipped,
}

impl From<DeliveryStatus> for proto::DeliveryStatus {
    fn from(value: DeliveryStatus) -> Self {
        match value {
            DeliveryStatus::Sending => proto::DeliveryStatus::Sending,
            DeliveryStatus::Pending => proto::DeliveryStatus::Pending,
            DeliveryStatus::Failed => proto::DeliveryStatus::Failed,
            DeliveryStatus::Sent => proto::DeliveryStatus::Sent,
            DeliveryStatus::Delivered => proto::DeliveryStatus::Delivered,
            DeliveryStatus::Read => proto::DeliveryStatus::Read,
            DeliveryStatus::Viewed => proto::DeliveryStatus::Viewed,
            DeliveryStatus::Skipped => proto::DeliveryStatus::Skipped,
        }
    }
}

impl TryFrom<i32> for DeliveryStatus {
    type Error = ProtoError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match proto::DeliveryStatus::try_from(value).map_err(|_| ProtoError)? {
            proto::DeliveryStatus::Sending => Ok(DeliveryStatus::Sending),
            proto::DeliveryStatus::Pending => Ok(DeliveryStatus::Pending),
            proto::DeliveryStatus::Failed => Ok(DeliveryStatus::Failed),
            proto::DeliveryStatus::Sent => Ok(DeliveryStatus::Sent),
            proto::DeliveryStatus::Delivered => Ok(DeliveryStatus::Delivered),
            proto::DeliveryStatus::Read => Ok(DeliveryStatus::Read),
            proto::DeliveryStatus::Viewed => Ok(DeliveryStatus::Viewed),
            proto::DeliveryStatus::Skipped => Ok(DeliveryStatus::Skipped),
            proto::DeliveryStatus::Unknown => Err(ProtoError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientState {
    pub status: DeliveryStatus,
    /// Milliseconds since the epoch. Zero when unknown (e.g. migrated).
    pub updated_at: u64,
}

pub type RecipientStateMap = BTreeMap<ServiceAddress, RecipientState>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryState {
    Legacy {
        state: LegacyMessageState,
        was_delivered: bool,
    },
    Current(RecipientStateMap),
}

/// Message-wide summary of the recipient states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageState {
    Sending,
    Pending,
    Failed,
    Sent,
}

impl MessageState {
    /// Sending beats pending, which beats failed. Everything else counts as
    /// sent, including a message with no recipients.
    pub fn aggregate<'a>(states: impl IntoIterator<Item = &'a RecipientState>) -> Self {
        let mut summary = MessageState::Sent;

        for state in states {
            match state.status {
                DeliveryStatus::Sending => return MessageState::Sending,
                DeliveryStatus::Pending => summary = MessageState::Pending,
                DeliveryStatus::Failed if summary == MessageState::Sent => {
                    summary = MessageState::Failed;
                }
                _ => {}
            }
        }

        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    timestamp: u64,
    body: Option<String>,
    recipients: Vec<ServiceAddress>,
    delivery: DeliveryState,
}

impl OutgoingMessage {
    /// A new message, sending to every recipient.
    pub fn new(timestamp: u64, body: Option<String>, recipients: Vec<ServiceAddress>) -> Self {
        let states = recipients
            .iter()
            .map(|address| {
                (
                    address.clone(),
                    RecipientState {
                        status: DeliveryStatus::Sending,
                        updated_at: timestamp,
                    },
                )
            })
            .collect();

        Self {
            timestamp,
            body,
            recipients,
            delivery: DeliveryState::Current(states),
        }
    }

    /// A message as older clients stored it.
    pub fn with_legacy_state(
        timestamp: u64,
        body: Option<String>,
        recipients: Vec<ServiceAddress>,
        state: LegacyMessageState,
        was_delivered: bool,
    ) -> Self {
        Self {
            timestamp,
            body,
            recipients,
            delivery: DeliveryState::Legacy {
                state,
                was_delivered,
            },
        }
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn recipients(&self) -> &[ServiceAddress] {
        &self.recipients
    }

    /// The stored delivery state, as is. Prefer [`OutgoingMessage::message_state`].
    pub fn delivery_state(&self) -> &DeliveryState {
        &self.delivery
    }

    pub fn has_legacy_state(&self) -> bool {
        matches!(self.delivery, DeliveryState::Legacy { .. })
    }

    /// Replaces a legacy state with per-recipient states. Returns whether
    /// anything changed, i.e. whether the message should be written back.
    pub fn migrate_legacy_state(&mut self) -> bool {
        let migrated = self.has_legacy_state();
        self.current_states();
        migrated
    }

    fn current_states(&mut self) -> &mut RecipientStateMap {
        match self.delivery {
            DeliveryState::Current(ref mut states) => states,
            DeliveryState::Legacy {
                state,
                was_delivered,
            } => {
                let status = state.upgrade(was_delivered);
                self.delivery = DeliveryState::Current(
                    self.recipients
                        .iter()
                        .map(|address| {
                            (
                                address.clone(),
                                RecipientState {
                                    status,
                                    updated_at: 0,
                                },
                            )
                        })
                        .collect(),
                );

                self.current_states()
            }
        }
    }

    pub fn recipient_states(&mut self) -> &RecipientStateMap {
        self.current_states()
    }

    pub fn message_state(&mut self) -> MessageState {
        MessageState::aggregate(self.current_states().values())
    }

    /// Records a new status for one recipient. Unknown recipients are ignored.
    pub fn update_recipient(
        &mut self,
        address: &ServiceAddress,
        status: DeliveryStatus,
        updated_at: u64,
    ) -> bool {
        match self.current_states().get_mut(address) {
            Some(state) => {
                *state = RecipientState { status, updated_at };
                true
            }
            None => false,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        proto::OutgoingMessageRecord::from(self).encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtoError> {
        proto::OutgoingMessageRecord::decode(bytes)
            .map_err(|_| ProtoError)?
            .try_into()
    }
}

impl From<&OutgoingMessage> for proto::OutgoingMessageRecord {
    fn from(value: &OutgoingMessage) -> Self {
        let mut record = Self {
            timestamp: value.timestamp,
            body: value.body.clone(),
            recipients: value.recipients.iter().map(Into::into).collect(),
            ..Default::default()
        };

        match &value.delivery {
            DeliveryState::Legacy {
                state,
                was_delivered,
            } => {
                record.has_legacy_message_state = true;
                record.legacy_message_state = proto::LegacyMessageState::from(*state).into();
                record.legacy_was_delivered = *was_delivered;
            }
            DeliveryState::Current(states) => {
                record.recipient_states = states
                    .iter()
                    .map(|(address, state)| proto::RecipientStateRecord {
                        address: Some(address.into()),
                        status: proto::DeliveryStatus::from(state.status).into(),
                        updated_at: state.updated_at,
                    })
                    .collect();
            }
        }

        record
    }
}

impl TryFrom<proto::OutgoingMessageRecord> for OutgoingMessage {
    type Error = ProtoError;

    fn try_from(value: proto::OutgoingMessageRecord) -> Result<Self, Self::Error> {
        let recipients = value
            .recipients
            .into_iter()
            .map(ServiceAddress::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let delivery = if value.has_legacy_message_state {
            DeliveryState::Legacy {
                state: value.legacy_message_state.try_into()?,
                was_delivered: value.legacy_was_delivered,
            }
        } else {
            DeliveryState::Current(
                value
                    .recipient_states
                    .into_iter()
                    .map(recipient_state)
                    .collect::<Result<_, _>>()?,
            )
        };

        Ok(Self {
            timestamp: value.timestamp,
            body: value.body,
            recipients,
            delivery,
        })
    }
}

fn recipient_state(
    record: proto::RecipientStateRecord,
) -> Result<(ServiceAddress, RecipientState), ProtoError> {
    let address = ServiceAddress::try_from(record.address.ok_or(ProtoError)?)?;

    Ok((
        address,
        RecipientState {
            status: record.status.try_into()?,
            updated_at: record.updated_at,
        },
    ))
}
