//! Persisted form of [`GroupModel`].
//!
//! Decoding is deliberately relaxed: only the record's structure is checked.
//! Rules that apply when a group is first built (avatar limits, inviter
//! membership, V1 role restrictions) are not re-applied to stored data.
use crate::{
    api::proto::{self, ProstMessage},
    crypto::GroupMasterKey,
    error::{GroupModelError, ProtoError},
    identifiers::{GroupIdentifier, GroupsVersion, ServiceAddress},
};

use super::{
    access::GroupAccess,
    avatar::{AvatarHash, GroupAvatar},
    membership::GroupMembership,
    model::{GroupModel, GroupV2Properties, GroupVersionData},
};

impl GroupModel {
    pub fn to_record(&self) -> proto::GroupRecord {
        let membership = &self.membership;

        proto::GroupRecord {
            group_id: self.group_id.to_vec(),
            groups_version: proto::GroupsVersion::from(self.groups_version()).into(),
            group_name: self.group_name.clone(),
            members: membership
                .full_members()
                .iter()
                .map(|member| proto::MemberRecord {
                    address: Some((&member.address).into()),
                    role: proto::Role::from(member.role).into(),
                })
                .collect(),
            invited_members: membership
                .invited_members()
                .iter()
                .map(|member| proto::InvitedMemberRecord {
                    address: Some((&member.address).into()),
                    role: proto::Role::from(member.role).into(),
                    added_by: member.added_by.as_ref().map(Into::into),
                })
                .collect(),
            requesting_members: membership
                .requesting_members()
                .iter()
                .map(Into::into)
                .collect(),
            added_by: self.added_by.as_ref().map(Into::into),
            legacy_avatar_data: self.avatar.legacy_data().map(<[u8]>::to_vec),
            avatar_hash: self.avatar.hash().map(|hash| hash.as_str().to_owned()),
            v2: self.v2_properties().map(|properties| proto::GroupV2Record {
                revision: properties.revision,
                master_key: properties.master_key.as_bytes().to_vec(),
                access: Some(properties.access.into()),
                description: properties.description.clone(),
            }),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        self.to_record().encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, GroupModelError> {
        Self::from_record(proto::GroupRecord::decode(bytes)?)
    }

    pub fn from_record(record: proto::GroupRecord) -> Result<Self, GroupModelError> {
        let recorded_version = proto::GroupsVersion::try_from(record.groups_version)
            .map_err(|_| ProtoError)
            .and_then(GroupsVersion::try_from)?;
        let group_id = GroupIdentifier::from_bytes_with_version(&record.group_id, recorded_version)
            .map_err(|err| GroupModelError::DecodeError(err.to_string()))?;

        let mut membership = GroupMembership::builder();
        for member in record.members {
            membership = membership.add_full_member(address(member.address)?, member.role.try_into()?);
        }
        for member in record.invited_members {
            membership = membership.add_invited_member(
                address(member.address)?,
                member.role.try_into()?,
                member.added_by.map(ServiceAddress::try_from).transpose()?,
            );
        }
        for requesting in record.requesting_members {
            membership = membership.add_requesting_member(requesting.try_into()?);
        }

        // Records written during the avatar migration may carry both; the
        // hash is the newer of the two.
        let avatar = match (record.avatar_hash, record.legacy_avatar_data) {
            (Some(hash), _) => GroupAvatar::Hash(AvatarHash::parse(hash)?),
            (None, Some(bytes)) => GroupAvatar::Legacy(bytes),
            (None, None) => GroupAvatar::None,
        };

        let version_data = match (group_id.groups_version(), record.v2) {
            (GroupsVersion::V1, None) => GroupVersionData::V1,
            (GroupsVersion::V2, Some(v2)) => GroupVersionData::V2(GroupV2Properties {
                revision: v2.revision,
                master_key: GroupMasterKey::try_from(v2.master_key.as_slice())?,
                access: v2.access.map(GroupAccess::from).unwrap_or_default(),
                description: v2.description,
            }),
            (GroupsVersion::V1, Some(_)) => {
                return Err(GroupModelError::DecodeError(
                    "V1 group record carries V2 properties".to_string(),
                ))
            }
            (GroupsVersion::V2, None) => {
                return Err(GroupModelError::DecodeError(
                    "V2 group record has no V2 properties".to_string(),
                ))
            }
        };

        Ok(GroupModel {
            group_id,
            group_name: record.group_name,
            membership: membership.build_lenient(),
            added_by: record.added_by.map(ServiceAddress::try_from).transpose()?,
            avatar,
            version_data,
        })
    }
}

fn address(record: Option<proto::AddressRecord>) -> Result<ServiceAddress, ProtoError> {
    record.ok_or(ProtoError)?.try_into()
}
