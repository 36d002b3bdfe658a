//! Identifiers for groups and for the members inside them.
pub use uuid::Uuid;

pub mod address;
pub mod group;

pub use {
    address::{ServiceAddress, E164},
    group::{GroupIdentifier, GroupsVersion},
};

use crate::constants::{GROUP_ID_LENGTH_V1, GROUP_ID_LENGTH_V2};

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum IdentifierError {
    #[error("A group identifier must be {GROUP_ID_LENGTH_V1} or {GROUP_ID_LENGTH_V2} bytes long, got {0}")]
    InvalidLength(usize),
    #[error("A {actual:?} group identifier was recorded as {recorded:?}")]
    VersionMismatch {
        recorded: GroupsVersion,
        actual: GroupsVersion,
    },
    #[error("The input cannot be converted to a UUID")]
    InvalidUuid,
    #[error("A phone number must be '+' followed by 7 to 15 digits")]
    InvalidPhoneNumber,
}
