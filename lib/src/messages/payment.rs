//! Messages that carry a payment.
//!
//! A payment message holds exactly one payload: the archived summary kept
//! for payments made with older protocol versions, or the live notification
//! with its receipt.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::proto::{self, payment_message_record, ProstMessage},
    error::ProtoError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedPaymentInfo {
    pub amount: Option<String>,
    pub fee: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub memo_message: Option<String>,
    pub mc_receipt_data: Vec<u8>,
    /// Set when the payment answers a payment request.
    pub request_uuid: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPayload {
    Archived(ArchivedPaymentInfo),
    Notification(PaymentNotification),
}

pub trait PaymentMessage {
    fn payment(&self) -> &PaymentPayload;

    fn archived_payment_info(&self) -> Option<&ArchivedPaymentInfo> {
        match self.payment() {
            PaymentPayload::Archived(info) => Some(info),
            PaymentPayload::Notification(_) => None,
        }
    }

    fn payment_notification(&self) -> Option<&PaymentNotification> {
        match self.payment() {
            PaymentPayload::Notification(notification) => Some(notification),
            PaymentPayload::Archived(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPaymentMessage {
    pub timestamp: u64,
    pub payload: PaymentPayload,
}

impl PaymentMessage for StoredPaymentMessage {
    fn payment(&self) -> &PaymentPayload {
        &self.payload
    }
}

impl StoredPaymentMessage {
    pub fn encode(&self) -> Vec<u8> {
        proto::PaymentMessageRecord::from(self.clone()).encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtoError> {
        proto::PaymentMessageRecord::decode(bytes)
            .map_err(|_| ProtoError)?
            .try_into()
    }
}

impl From<StoredPaymentMessage> for proto::PaymentMessageRecord {
    fn from(value: StoredPaymentMessage) -> Self {
        let payment = match value.payload {
            PaymentPayload::Archived(info) => {
                payment_message_record::Payment::Archived(proto::ArchivedPaymentInfoRecord {
                    amount: info.amount,
                    fee: info.fee,
                    note: info.note,
                })
            }
            PaymentPayload::Notification(notification) => {
                payment_message_record::Payment::Notification(proto::PaymentNotificationRecord {
                    memo_message: notification.memo_message,
                    mc_receipt_data: notification.mc_receipt_data,
                    request_uuid: notification
                        .request_uuid
                        .map(|uuid| uuid.as_bytes().to_vec()),
                })
            }
        };

        Self {
            timestamp: value.timestamp,
            payment: Some(payment),
        }
    }
}

impl TryFrom<proto::PaymentMessageRecord> for StoredPaymentMessage {
    type Error = ProtoError;

    fn try_from(value: proto::PaymentMessageRecord) -> Result<Self, Self::Error> {
        let payload = match value.payment.ok_or(ProtoError)? {
            payment_message_record::Payment::Archived(info) => {
                PaymentPayload::Archived(ArchivedPaymentInfo {
                    amount: info.amount,
                    fee: info.fee,
                    note: info.note,
                })
            }
            payment_message_record::Payment::Notification(notification) => {
                PaymentPayload::Notification(PaymentNotification {
                    memo_message: notification.memo_message,
                    mc_receipt_data: notification.mc_receipt_data,
                    request_uuid: notification
                        .request_uuid
                        .map(|bytes| Uuid::from_slice(&bytes))
                        .transpose()
                        .map_err(|_| ProtoError)?,
                })
            }
        };

        Ok(Self {
            timestamp: value.timestamp,
            payload,
        })
    }
}
