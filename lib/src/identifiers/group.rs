use serde::{Deserialize, Serialize};

use crate::{
    api::proto,
    constants::{GROUP_ID_LENGTH_V1, GROUP_ID_LENGTH_V2},
    crypto::rng::random_bytes,
    error::ProtoError,
    util::base64::Base64String,
};

use super::IdentifierError;

/// The two generations of the group protocol.
///
/// V1 groups have no roles and no invite provenance. V2 groups carry
/// administrators, pending invites and an access policy.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub enum GroupsVersion {
    V1,
    V2,
}

impl GroupsVersion {
    /// Byte length of identifiers for this version.
    pub const fn id_length(self) -> usize {
        match self {
            GroupsVersion::V1 => GROUP_ID_LENGTH_V1,
            GroupsVersion::V2 => GROUP_ID_LENGTH_V2,
        }
    }

    pub fn from_id_length(length: usize) -> Result<Self, IdentifierError> {
        match length {
            GROUP_ID_LENGTH_V1 => Ok(GroupsVersion::V1),
            GROUP_ID_LENGTH_V2 => Ok(GroupsVersion::V2),
            other => Err(IdentifierError::InvalidLength(other)),
        }
    }
}

impl From<GroupsVersion> for proto::GroupsVersion {
    fn from(value: GroupsVersion) -> Self {
        match value {
            GroupsVersion::V1 => proto::GroupsVersion::V1,
            GroupsVersion::V2 => proto::GroupsVersion::V2,
        }
    }
}

impl TryFrom<proto::GroupsVersion> for GroupsVersion {
    type Error = ProtoError;

    fn try_from(value: proto::GroupsVersion) -> Result<Self, Self::Error> {
        match value {
            proto::GroupsVersion::V1 => Ok(GroupsVersion::V1),
            proto::GroupsVersion::V2 => Ok(GroupsVersion::V2),
            proto::GroupsVersion::Unknown => Err(ProtoError),
        }
    }
}

/// `GroupIdentifier` is the unique identifier used to handle groups.
///
/// It is assigned when the group is created and never changes. Its length
/// decides which protocol generation the group belongs to, so the version
/// is part of the type rather than a separate field that could disagree.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub enum GroupIdentifier {
    V1([u8; GROUP_ID_LENGTH_V1]),
    V2([u8; GROUP_ID_LENGTH_V2]),
}

impl GroupIdentifier {
    /// Generates a random identifier of the given version.
    pub fn generate(version: GroupsVersion) -> Self {
        match version {
            GroupsVersion::V1 => GroupIdentifier::V1(random_bytes()),
            GroupsVersion::V2 => GroupIdentifier::V2(random_bytes()),
        }
    }

    pub fn groups_version(&self) -> GroupsVersion {
        match self {
            GroupIdentifier::V1(_) => GroupsVersion::V1,
            GroupIdentifier::V2(_) => GroupsVersion::V2,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            GroupIdentifier::V1(bytes) => bytes,
            GroupIdentifier::V2(bytes) => bytes,
        }
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Parses `bytes` and checks the result against a version that was
    /// recorded separately (for instance in a persisted record).
    pub fn from_bytes_with_version(
        bytes: &[u8],
        recorded: GroupsVersion,
    ) -> Result<Self, IdentifierError> {
        let id = Self::try_from(bytes)?;
        let actual = id.groups_version();

        if actual == recorded {
            Ok(id)
        } else {
            Err(IdentifierError::VersionMismatch { recorded, actual })
        }
    }
}

impl AsRef<[u8]> for GroupIdentifier {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for GroupIdentifier {
    type Error = IdentifierError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match GroupsVersion::from_id_length(value.len())? {
            GroupsVersion::V1 => Ok(GroupIdentifier::V1(
                value
                    .try_into()
                    .map_err(|_| IdentifierError::InvalidLength(value.len()))?,
            )),
            GroupsVersion::V2 => Ok(GroupIdentifier::V2(
                value
                    .try_into()
                    .map_err(|_| IdentifierError::InvalidLength(value.len()))?,
            )),
        }
    }
}

impl std::fmt::Display for GroupIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Group({})", Base64String::from_bytes(self))
    }
}
