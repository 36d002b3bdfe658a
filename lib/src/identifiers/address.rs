use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::proto::{self, address_record},
    error::ProtoError,
    util::uuid::generate_uuid,
};

use super::IdentifierError;

/// A phone number in E.164 form, e.g. `+14155550123`.
///
/// Only legacy V1 group members may be known by phone number alone.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Hash, PartialOrd, Ord)]
#[serde(try_from = "String")]
pub struct E164(String);

impl E164 {
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        let digits = value
            .strip_prefix('+')
            .ok_or(IdentifierError::InvalidPhoneNumber)?;

        if !(7..=15).contains(&digits.len())
            || digits.starts_with('0')
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(IdentifierError::InvalidPhoneNumber);
        }

        Ok(Self(value))
    }
}

impl TryFrom<String> for E164 {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for E164 {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for E164 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The address of a group member.
///
/// Two addresses are the same member only if they are the same variant
/// with the same value.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub enum ServiceAddress {
    /// Account service identifier.
    Service(Uuid),
    /// Phone-number-only address (legacy V1 groups).
    Phone(E164),
}

impl ServiceAddress {
    /// A fresh random service address.
    pub fn generate() -> Self {
        ServiceAddress::Service(generate_uuid())
    }

    pub fn service_id(&self) -> Option<Uuid> {
        match self {
            ServiceAddress::Service(uuid) => Some(*uuid),
            ServiceAddress::Phone(_) => None,
        }
    }

    pub fn phone_number(&self) -> Option<&E164> {
        match self {
            ServiceAddress::Service(_) => None,
            ServiceAddress::Phone(e164) => Some(e164),
        }
    }
}

impl From<Uuid> for ServiceAddress {
    fn from(value: Uuid) -> Self {
        ServiceAddress::Service(value)
    }
}

impl From<E164> for ServiceAddress {
    fn from(value: E164) -> Self {
        ServiceAddress::Phone(value)
    }
}

impl FromStr for ServiceAddress {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('+') {
            Ok(ServiceAddress::Phone(E164::new(s)?))
        } else {
            Uuid::from_str(s)
                .map(ServiceAddress::Service)
                .map_err(|_| IdentifierError::InvalidUuid)
        }
    }
}

impl Display for ServiceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceAddress::Service(uuid) => write!(f, "Service({uuid})"),
            ServiceAddress::Phone(e164) => write!(f, "Phone({e164})"),
        }
    }
}

impl From<&ServiceAddress> for proto::AddressRecord {
    fn from(value: &ServiceAddress) -> Self {
        let kind = match value {
            ServiceAddress::Service(uuid) => {
                address_record::Kind::ServiceId(uuid.as_bytes().to_vec())
            }
            ServiceAddress::Phone(e164) => address_record::Kind::E164(e164.0.clone()),
        };
        Self { kind: Some(kind) }
    }
}

impl TryFrom<proto::AddressRecord> for ServiceAddress {
    type Error = ProtoError;

    fn try_from(value: proto::AddressRecord) -> Result<Self, Self::Error> {
        Ok(match value.kind.ok_or(ProtoError)? {
            address_record::Kind::ServiceId(bytes) => {
                ServiceAddress::Service(Uuid::from_slice(&bytes).map_err(|_| ProtoError)?)
            }
            address_record::Kind::E164(e164) => {
                ServiceAddress::Phone(E164::new(e164).map_err(|_| ProtoError)?)
            }
        })
    }
}
