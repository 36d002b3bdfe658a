//! Who is in a group, and in what capacity.
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    api::proto,
    error::{GroupModelError, ProtoError},
    identifiers::ServiceAddress,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Normal,
    Administrator,
}

impl From<Role> for proto::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::Normal => proto::Role::Normal,
            Role::Administrator => proto::Role::Administrator,
        }
    }
}

impl TryFrom<i32> for Role {
    type Error = ProtoError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match proto::Role::try_from(value).map_err(|_| ProtoError)? {
            proto::Role::Normal => Ok(Role::Normal),
            proto::Role::Administrator => Ok(Role::Administrator),
            proto::Role::Unknown => Err(ProtoError),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullMember {
    pub address: ServiceAddress,
    pub role: Role,
}

/// Someone added to a V2 group who has not accepted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitedMember {
    pub address: ServiceAddress,
    pub role: Role,
    pub added_by: Option<ServiceAddress>,
}

/// Membership of a group, split by role and state.
///
/// Every address appears at most once across full, invited and requesting
/// members. Full members keep insertion order; equality ignores order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "MembershipParts")]
pub struct GroupMembership {
    full: Vec<FullMember>,
    invited: Vec<InvitedMember>,
    requesting: Vec<ServiceAddress>,
}

/// Deserialized membership, before the duplicate check.
#[derive(Deserialize)]
struct MembershipParts {
    full: Vec<FullMember>,
    invited: Vec<InvitedMember>,
    requesting: Vec<ServiceAddress>,
}

impl TryFrom<MembershipParts> for GroupMembership {
    type Error = GroupModelError;

    fn try_from(parts: MembershipParts) -> Result<Self, Self::Error> {
        let builder = parts
            .full
            .into_iter()
            .fold(Self::builder(), |builder, member| {
                builder.add_full_member(member.address, member.role)
            });
        let builder = parts.invited.into_iter().fold(builder, |builder, member| {
            builder.add_invited_member(member.address, member.role, member.added_by)
        });

        parts
            .requesting
            .into_iter()
            .fold(builder, GroupMembershipBuilder::add_requesting_member)
            .build()
    }
}

impl GroupMembership {
    pub fn builder() -> GroupMembershipBuilder {
        GroupMembershipBuilder::default()
    }

    /// Membership where every address is a normal full member.
    pub fn from_members(
        members: impl IntoIterator<Item = ServiceAddress>,
    ) -> Result<Self, GroupModelError> {
        members
            .into_iter()
            .fold(Self::builder(), |builder, address| {
                builder.add_full_member(address, Role::Normal)
            })
            .build()
    }

    /// Full members (administrators and normal members) in insertion order.
    pub fn full_members(&self) -> &[FullMember] {
        &self.full
    }

    pub fn invited_members(&self) -> &[InvitedMember] {
        &self.invited
    }

    pub fn requesting_members(&self) -> &[ServiceAddress] {
        &self.requesting
    }

    pub fn administrators(&self) -> impl Iterator<Item = &ServiceAddress> {
        self.full
            .iter()
            .filter(|member| member.role == Role::Administrator)
            .map(|member| &member.address)
    }

    /// Role of a full member, `None` for anyone else.
    pub fn role_of(&self, address: &ServiceAddress) -> Option<Role> {
        self.full
            .iter()
            .find(|member| &member.address == address)
            .map(|member| member.role)
    }

    pub fn is_full_member(&self, address: &ServiceAddress) -> bool {
        self.role_of(address).is_some()
    }

    pub fn is_administrator(&self, address: &ServiceAddress) -> bool {
        self.role_of(address) == Some(Role::Administrator)
    }

    pub fn invited_member(&self, address: &ServiceAddress) -> Option<&InvitedMember> {
        self.invited.iter().find(|member| &member.address == address)
    }

    pub fn is_requesting(&self, address: &ServiceAddress) -> bool {
        self.requesting.contains(address)
    }

    /// Whether anything here needs V2 semantics: administrators, invites or
    /// join requests.
    pub fn uses_v2_features(&self) -> bool {
        self.administrators().next().is_some()
            || !self.invited.is_empty()
            || !self.requesting.is_empty()
    }
}

impl PartialEq for GroupMembership {
    fn eq(&self, other: &Self) -> bool {
        fn full_map(m: &GroupMembership) -> HashMap<&ServiceAddress, Role> {
            m.full.iter().map(|f| (&f.address, f.role)).collect()
        }
        fn invited_map(
            m: &GroupMembership,
        ) -> HashMap<&ServiceAddress, (Role, Option<&ServiceAddress>)> {
            m.invited
                .iter()
                .map(|i| (&i.address, (i.role, i.added_by.as_ref())))
                .collect()
        }

        full_map(self) == full_map(other)
            && invited_map(self) == invited_map(other)
            && self.requesting.iter().collect::<HashSet<_>>()
                == other.requesting.iter().collect::<HashSet<_>>()
    }
}

impl Eq for GroupMembership {}

/// Collects members and rejects any address seen twice.
#[derive(Debug, Default)]
pub struct GroupMembershipBuilder {
    membership: GroupMembership,
    seen: HashSet<ServiceAddress>,
    duplicates: Vec<ServiceAddress>,
}

impl GroupMembershipBuilder {
    fn claim(&mut self, address: &ServiceAddress) -> bool {
        if self.seen.insert(address.clone()) {
            true
        } else {
            self.duplicates.push(address.clone());
            false
        }
    }

    #[must_use]
    pub fn add_full_member(mut self, address: ServiceAddress, role: Role) -> Self {
        if self.claim(&address) {
            self.membership.full.push(FullMember { address, role });
        }
        self
    }

    #[must_use]
    pub fn add_invited_member(
        mut self,
        address: ServiceAddress,
        role: Role,
        added_by: Option<ServiceAddress>,
    ) -> Self {
        if self.claim(&address) {
            self.membership.invited.push(InvitedMember {
                address,
                role,
                added_by,
            });
        }
        self
    }

    #[must_use]
    pub fn add_requesting_member(mut self, address: ServiceAddress) -> Self {
        if self.claim(&address) {
            self.membership.requesting.push(address);
        }
        self
    }

    pub fn build(self) -> Result<GroupMembership, GroupModelError> {
        match self.duplicates.first() {
            Some(address) => Err(GroupModelError::InvalidMembership(format!(
                "{address} appears more than once"
            ))),
            None => Ok(self.membership),
        }
    }

    /// Keeps the first occurrence of repeated addresses. Only for records
    /// written before duplicates were rejected.
    pub(crate) fn build_lenient(self) -> GroupMembership {
        self.membership
    }
}
