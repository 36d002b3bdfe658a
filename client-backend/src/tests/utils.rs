use std::path::PathBuf;

use rosa_lib::{
    groups::{GroupMembership, GroupModel, GroupV2Properties, Role},
    identifiers::{GroupIdentifier, GroupsVersion, ServiceAddress},
    util::uuid::generate_uuid,
};

/// Smallest byte string that passes as a PNG, padded to `len`.
pub fn fake_png(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len.max(bytes.len()), 0x42);
    bytes
}

pub fn fake_members(count: usize) -> Vec<ServiceAddress> {
    (0..count).map(|_| ServiceAddress::generate()).collect()
}

/// A V2 group with one administrator, at the given revision. The name
/// encodes the revision so readers can check a snapshot is whole.
pub fn v2_group_at_revision(
    group_id: GroupIdentifier,
    admin: &ServiceAddress,
    revision: u32,
) -> GroupModel {
    let mut properties = GroupV2Properties::generate();
    properties.revision = revision;

    GroupModel::builder(group_id)
        .name(format!("revision {revision}"))
        .membership(
            GroupMembership::builder()
                .add_full_member(admin.clone(), Role::Administrator)
                .build()
                .expect("one member is a valid membership"),
        )
        .v2_properties(properties)
        .build()
        .expect("valid V2 group")
}

pub fn fresh_v2_id() -> GroupIdentifier {
    GroupIdentifier::generate(GroupsVersion::V2)
}

/// A folder under the system temporary directory that no other test uses.
pub fn scratch_folder() -> PathBuf {
    std::env::temp_dir().join(format!("rosa-test-{}", generate_uuid()))
}
