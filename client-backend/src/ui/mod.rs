use std::hash::Hash;

use rosa_lib::{
    groups::GroupModel,
    identifiers::{GroupIdentifier, GroupsVersion},
};
use serde::Serialize;

/// A struct used for displaying group information
/// to the client interface.
#[derive(Debug, Clone, Serialize)]
pub struct GroupUi {
    pub group_identifier: GroupIdentifier,
    pub group_name: String,
    pub member_count: usize,
    pub avatar_hash: Option<String>,
    pub is_legacy_group: bool,
    pub unread_count: u64,
}

impl GroupUi {
    /// `placeholder` replaces a missing name, so callers can localize it.
    pub fn from_snapshot(group: &GroupModel, placeholder: &str, unread_count: u64) -> Self {
        Self {
            group_identifier: *group.group_id(),
            group_name: group.group_name_or(placeholder).to_string(),
            member_count: group.group_members().count(),
            avatar_hash: group.avatar_hash().map(ToString::to_string),
            is_legacy_group: group.groups_version() == GroupsVersion::V1,
            unread_count,
        }
    }

    pub fn formatted_id(&self) -> String {
        self.group_identifier.to_string()
    }

    pub fn name(&self) -> &str {
        &self.group_name
    }

    // RGB-encoded color value "#123abc"
    // generated using the GroupIdentifier
    pub fn color(&self) -> String {
        let bytes = self.group_identifier.as_bytes();

        format!("#{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2])
    }
}

impl Hash for GroupUi {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.group_identifier.hash(state);
    }
}

impl PartialEq for GroupUi {
    fn eq(&self, other: &Self) -> bool {
        // GroupIdentifier is unique to each group.
        self.group_identifier == other.group_identifier
    }
}

impl Eq for GroupUi {}
