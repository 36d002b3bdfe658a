use serde::{Deserialize, Serialize};

use crate::api::proto;

use super::membership::Role;

/// Who may perform an action in a V2 group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessRequired {
    /// Written by a newer client; nobody may act until we understand it.
    Unknown,
    Any,
    Member,
    Administrator,
    Unsatisfiable,
}

impl AccessRequired {
    /// Whether a full member with `role` satisfies this requirement.
    /// `None` is someone who is not a full member.
    pub fn allows(self, role: Option<Role>) -> bool {
        match self {
            AccessRequired::Any => true,
            AccessRequired::Member => role.is_some(),
            AccessRequired::Administrator => role == Some(Role::Administrator),
            AccessRequired::Unknown | AccessRequired::Unsatisfiable => false,
        }
    }
}

/// Access policy of a V2 group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupAccess {
    /// Adding members.
    pub members: AccessRequired,
    /// Changing the name, avatar, description or timer.
    pub attributes: AccessRequired,
    /// Joining through an invite link.
    pub add_from_invite_link: AccessRequired,
}

impl Default for GroupAccess {
    fn default() -> Self {
        Self {
            members: AccessRequired::Member,
            attributes: AccessRequired::Member,
            add_from_invite_link: AccessRequired::Unsatisfiable,
        }
    }
}

impl GroupAccess {
    /// Policy where only administrators can change anything.
    pub fn admin_only() -> Self {
        Self {
            members: AccessRequired::Administrator,
            attributes: AccessRequired::Administrator,
            add_from_invite_link: AccessRequired::Unsatisfiable,
        }
    }
}

impl From<AccessRequired> for proto::AccessRequired {
    fn from(value: AccessRequired) -> Self {
        match value {
            AccessRequired::Unknown => proto::AccessRequired::Unknown,
            AccessRequired::Any => proto::AccessRequired::Any,
            AccessRequired::Member => proto::AccessRequired::Member,
            AccessRequired::Administrator => proto::AccessRequired::Administrator,
            AccessRequired::Unsatisfiable => proto::AccessRequired::Unsatisfiable,
        }
    }
}

impl From<proto::AccessRequired> for AccessRequired {
    fn from(value: proto::AccessRequired) -> Self {
        match value {
            proto::AccessRequired::Unknown => AccessRequired::Unknown,
            proto::AccessRequired::Any => AccessRequired::Any,
            proto::AccessRequired::Member => AccessRequired::Member,
            proto::AccessRequired::Administrator => AccessRequired::Administrator,
            proto::AccessRequired::Unsatisfiable => AccessRequired::Unsatisfiable,
        }
    }
}

fn access_from_i32(value: i32) -> AccessRequired {
    // Values from the future decode as Unknown, which denies everything.
    proto::AccessRequired::try_from(value).map_or(AccessRequired::Unknown, AccessRequired::from)
}

impl From<GroupAccess> for proto::AccessRecord {
    fn from(value: GroupAccess) -> Self {
        Self {
            members: proto::AccessRequired::from(value.members).into(),
            attributes: proto::AccessRequired::from(value.attributes).into(),
            add_from_invite_link: proto::AccessRequired::from(value.add_from_invite_link).into(),
        }
    }
}

impl From<proto::AccessRecord> for GroupAccess {
    fn from(value: proto::AccessRecord) -> Self {
        Self {
            members: access_from_i32(value.members),
            attributes: access_from_i32(value.attributes),
            add_from_invite_link: access_from_i32(value.add_from_invite_link),
        }
    }
}
