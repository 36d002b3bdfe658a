pub mod outgoing;
pub mod payment;
pub mod read_state;

pub use {
    outgoing::{DeliveryState, DeliveryStatus, LegacyMessageState, MessageState, OutgoingMessage},
    payment::{PaymentMessage, PaymentPayload, StoredPaymentMessage},
    read_state::{Interaction, ReadTracking},
};
