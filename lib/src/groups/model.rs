use serde::{Deserialize, Serialize};

use crate::{
    constants::DEFAULT_GROUP_NAME,
    crypto::{AvatarCipher, GroupMasterKey},
    error::{Error, GroupModelError},
    identifiers::{GroupIdentifier, GroupsVersion, IdentifierError, ServiceAddress},
};

use super::{
    access::GroupAccess,
    avatar::{validate_avatar_data, AvatarHash, GroupAvatar},
    membership::{GroupMembership, Role},
};

/// Properties only V2 groups have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupV2Properties {
    pub revision: u32,
    pub master_key: GroupMasterKey,
    pub access: GroupAccess,
    pub description: Option<String>,
}

impl GroupV2Properties {
    /// Properties of a freshly created group: revision 0, a new master key
    /// and the default access policy.
    pub fn generate() -> Self {
        Self {
            revision: 0,
            master_key: GroupMasterKey::generate(),
            access: GroupAccess::default(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupVersionData {
    V1,
    V2(GroupV2Properties),
}

/// A snapshot of a group: identity, membership and display metadata.
///
/// Every membership or metadata change produces a new `GroupModel` (see
/// [`GroupModel::to_builder`]). The avatar is the exception and can be
/// updated in place once a download or migration completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupModel {
    pub(super) group_id: GroupIdentifier,
    pub(super) group_name: Option<String>,
    pub(super) membership: GroupMembership,
    pub(super) added_by: Option<ServiceAddress>,
    pub(super) avatar: GroupAvatar,
    pub(super) version_data: GroupVersionData,
}

impl GroupModel {
    /// Creates a group from raw identifier bytes and a flat member list.
    /// Every member is a normal member.
    pub fn create(
        group_id: &[u8],
        name: Option<String>,
        avatar_data: Option<Vec<u8>>,
        members: Vec<ServiceAddress>,
        added_by: Option<ServiceAddress>,
    ) -> Result<Self, GroupModelError> {
        let mut builder = Self::builder(GroupIdentifier::try_from(group_id)?)
            .membership(GroupMembership::from_members(members)?);

        if let Some(name) = name {
            builder = builder.name(name);
        }
        if let Some(avatar_data) = avatar_data {
            builder = builder.avatar_data(avatar_data);
        }
        if let Some(added_by) = added_by {
            builder = builder.added_by(added_by);
        }

        builder.build()
    }

    pub fn builder(group_id: GroupIdentifier) -> GroupModelBuilder {
        GroupModelBuilder {
            group_id,
            group_name: None,
            membership: GroupMembership::default(),
            added_by: None,
            avatar: GroupAvatar::None,
            v2: None,
        }
    }

    /// A builder pre-filled with this snapshot, for deriving the next one.
    pub fn to_builder(&self) -> GroupModelBuilder {
        GroupModelBuilder {
            group_id: self.group_id,
            group_name: self.group_name.clone(),
            membership: self.membership.clone(),
            added_by: self.added_by.clone(),
            avatar: self.avatar.clone(),
            v2: self.v2_properties().cloned(),
        }
    }

    pub fn group_id(&self) -> &GroupIdentifier {
        &self.group_id
    }

    pub fn groups_version(&self) -> GroupsVersion {
        self.group_id.groups_version()
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }

    /// The group name, or [`DEFAULT_GROUP_NAME`] when there is none.
    pub fn group_name_or_default(&self) -> &str {
        self.group_name_or(DEFAULT_GROUP_NAME)
    }

    /// The group name, or `placeholder` (e.g. a localized default) when the
    /// name is missing or empty.
    pub fn group_name_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.group_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => placeholder,
        }
    }

    /// Full members, administrators included, in insertion order.
    pub fn group_members(&self) -> impl Iterator<Item = &ServiceAddress> {
        self.membership
            .full_members()
            .iter()
            .map(|member| &member.address)
    }

    pub fn group_membership(&self) -> &GroupMembership {
        &self.membership
    }

    pub fn added_by_address(&self) -> Option<&ServiceAddress> {
        self.added_by.as_ref()
    }

    pub fn avatar(&self) -> &GroupAvatar {
        &self.avatar
    }

    pub fn legacy_avatar_data(&self) -> Option<&[u8]> {
        self.avatar.legacy_data()
    }

    pub fn avatar_hash(&self) -> Option<&AvatarHash> {
        self.avatar.hash()
    }

    pub fn version_data(&self) -> &GroupVersionData {
        &self.version_data
    }

    pub fn v2_properties(&self) -> Option<&GroupV2Properties> {
        match &self.version_data {
            GroupVersionData::V1 => None,
            GroupVersionData::V2(properties) => Some(properties),
        }
    }

    pub fn role_of(&self, address: &ServiceAddress) -> Option<Role> {
        self.membership.role_of(address)
    }

    pub fn is_full_member(&self, address: &ServiceAddress) -> bool {
        self.membership.is_full_member(address)
    }

    pub fn is_administrator(&self, address: &ServiceAddress) -> bool {
        self.membership.is_administrator(address)
    }

    pub fn is_invited(&self, address: &ServiceAddress) -> bool {
        self.membership.invited_member(address).is_some()
    }

    pub fn is_requesting(&self, address: &ServiceAddress) -> bool {
        self.membership.is_requesting(address)
    }

    pub fn administrators(&self) -> impl Iterator<Item = &ServiceAddress> {
        self.membership.administrators()
    }

    /// Whether `address` may change the name, avatar or description.
    /// In V1 groups every full member may.
    pub fn can_edit_attributes(&self, address: &ServiceAddress) -> bool {
        match &self.version_data {
            GroupVersionData::V1 => self.is_full_member(address),
            GroupVersionData::V2(properties) => {
                properties.access.attributes.allows(self.role_of(address))
            }
        }
    }

    /// Whether `address` may add new members. In V1 groups every full
    /// member may.
    pub fn can_add_members(&self, address: &ServiceAddress) -> bool {
        match &self.version_data {
            GroupVersionData::V1 => self.is_full_member(address),
            GroupVersionData::V2(properties) => {
                self.is_full_member(address)
                    && properties.access.members.allows(self.role_of(address))
            }
        }
    }

    /// Replaces the avatar with raw image bytes.
    pub fn set_legacy_avatar_data(&mut self, avatar_data: Vec<u8>) -> Result<(), GroupModelError> {
        validate_avatar_data(&avatar_data)?;
        self.avatar = GroupAvatar::Legacy(avatar_data);

        Ok(())
    }

    /// Replaces the avatar with a reference to externally stored bytes.
    pub fn set_avatar_hash(&mut self, hash: AvatarHash) {
        self.avatar = GroupAvatar::Hash(hash);
    }

    pub fn clear_avatar(&mut self) {
        self.avatar = GroupAvatar::None;
    }

    /// Moves legacy inline avatar bytes out of the model, leaving their hash
    /// behind. Returns the hash and the bytes to store under it, or `None`
    /// if there was nothing to migrate.
    pub fn migrate_legacy_avatar(&mut self) -> Option<(AvatarHash, Vec<u8>)> {
        if !matches!(self.avatar, GroupAvatar::Legacy(_)) {
            return None;
        }

        match std::mem::take(&mut self.avatar) {
            GroupAvatar::Legacy(bytes) => {
                let hash = AvatarHash::of(&bytes);
                self.avatar = GroupAvatar::Hash(hash.clone());
                Some((hash, bytes))
            }
            other => {
                self.avatar = other;
                None
            }
        }
    }

    /// Avatar cipher for V2 groups, `None` for V1 groups.
    pub fn avatar_cipher(&self) -> Option<AvatarCipher> {
        self.v2_properties()
            .map(|properties| AvatarCipher::new(&properties.master_key))
    }

    /// Encrypts raw avatar bytes for upload to the group's storage.
    pub fn encrypt_avatar_for_upload(&self, avatar_data: &[u8]) -> Result<Vec<u8>, Error> {
        let cipher = self.avatar_cipher().ok_or(Error::NotAV2Group)?;

        Ok(cipher.encrypt(avatar_data)?)
    }

    /// Decrypts a downloaded avatar and points the model at it. Returns the
    /// plaintext, which the caller stores under [`GroupModel::avatar_hash`].
    pub fn apply_downloaded_avatar(&mut self, encrypted: &[u8]) -> Result<Vec<u8>, Error> {
        let cipher = self.avatar_cipher().ok_or(Error::NotAV2Group)?;
        let avatar_data = cipher.decrypt(encrypted)?;

        self.set_avatar_hash(AvatarHash::of(&avatar_data));

        Ok(avatar_data)
    }
}

/// Builds a [`GroupModel`]. Validation happens in [`GroupModelBuilder::build`],
/// which either returns a complete model or nothing.
#[derive(Debug, Clone)]
pub struct GroupModelBuilder {
    group_id: GroupIdentifier,
    group_name: Option<String>,
    membership: GroupMembership,
    added_by: Option<ServiceAddress>,
    avatar: GroupAvatar,
    v2: Option<GroupV2Properties>,
}

impl GroupModelBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn clear_name(mut self) -> Self {
        self.group_name = None;
        self
    }

    #[must_use]
    pub fn avatar_data(mut self, avatar_data: Vec<u8>) -> Self {
        self.avatar = GroupAvatar::Legacy(avatar_data);
        self
    }

    #[must_use]
    pub fn avatar_hash(mut self, hash: AvatarHash) -> Self {
        self.avatar = GroupAvatar::Hash(hash);
        self
    }

    #[must_use]
    pub fn membership(mut self, membership: GroupMembership) -> Self {
        self.membership = membership;
        self
    }

    #[must_use]
    pub fn added_by(mut self, added_by: ServiceAddress) -> Self {
        self.added_by = Some(added_by);
        self
    }

    #[must_use]
    pub fn v2_properties(mut self, properties: GroupV2Properties) -> Self {
        self.v2 = Some(properties);
        self
    }

    pub fn build(self) -> Result<GroupModel, GroupModelError> {
        let version = self.group_id.groups_version();

        let version_data = match (version, self.v2) {
            (GroupsVersion::V1, None) => GroupVersionData::V1,
            (GroupsVersion::V1, Some(_)) => {
                return Err(IdentifierError::VersionMismatch {
                    recorded: GroupsVersion::V2,
                    actual: GroupsVersion::V1,
                }
                .into())
            }
            (GroupsVersion::V2, properties) => {
                GroupVersionData::V2(properties.unwrap_or_else(GroupV2Properties::generate))
            }
        };

        if let GroupAvatar::Legacy(bytes) = &self.avatar {
            validate_avatar_data(bytes)?;
        }

        if version == GroupsVersion::V1 {
            if self.membership.uses_v2_features() {
                return Err(GroupModelError::InvalidMembership(
                    "V1 groups have no administrators, invites or join requests".to_string(),
                ));
            }
            if self.added_by.is_some() {
                return Err(GroupModelError::InvalidMembership(
                    "V1 groups do not track who added you".to_string(),
                ));
            }
        }

        if let Some(added_by) = &self.added_by {
            if !self.membership.is_full_member(added_by) {
                return Err(GroupModelError::InvalidMembership(format!(
                    "{added_by} added you but is not a member"
                )));
            }
        }

        Ok(GroupModel {
            group_id: self.group_id,
            group_name: self.group_name,
            membership: self.membership,
            added_by: self.added_by,
            avatar: self.avatar,
            version_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{GROUP_ID_LENGTH_V1, GROUP_ID_LENGTH_V2, MAX_AVATAR_SIZE},
        crypto::rng::random_bytes,
        groups::{access::AccessRequired, avatar::tests::png_of_size},
    };

    fn members(count: usize) -> Vec<ServiceAddress> {
        (0..count).map(|_| ServiceAddress::generate()).collect()
    }

    #[test]
    fn book_club_v1_group() {
        let group_id = random_bytes::<GROUP_ID_LENGTH_V1>();
        let model = GroupModel::create(
            &group_id,
            Some("Book Club".to_string()),
            None,
            members(3),
            None,
        )
        .expect("a valid V1 group");

        assert_eq!(model.group_name_or_default(), "Book Club", "explicit name is kept");
        assert_eq!(model.groups_version(), GroupsVersion::V1, "16-byte id is V1");
        assert_eq!(model.group_members().count(), 3, "all three members kept");
        assert!(model.avatar().is_none(), "no avatar given");
        assert_eq!(model.version_data(), &GroupVersionData::V1, "V1 groups carry no V2 data");
    }

    #[test]
    fn unnamed_group_uses_placeholder() {
        let model = GroupModel::create(
            &random_bytes::<GROUP_ID_LENGTH_V1>(),
            None,
            None,
            members(1),
            None,
        )
        .expect("a valid V1 group");

        assert_eq!(model.group_name(), None, "no name given");
        assert_eq!(model.group_name_or_default(), DEFAULT_GROUP_NAME, "default name stands in");
        assert_eq!(
            model.group_name_or("Nouveau groupe"),
            "Nouveau groupe",
            "callers can localize the placeholder"
        );
    }

    #[test]
    fn empty_name_uses_placeholder_but_blank_does_not() {
        let group_id = GroupIdentifier::generate(GroupsVersion::V1);

        let empty = GroupModel::builder(group_id)
            .name("")
            .build()
            .expect("valid");
        assert_eq!(
            empty.group_name_or_default(),
            DEFAULT_GROUP_NAME,
            "empty name falls back to the default"
        );

        let blank = GroupModel::builder(group_id)
            .name(" ")
            .build()
            .expect("valid");
        assert_eq!(
            blank.group_name_or_default(),
            " ",
            "only absent or empty names fall back"
        );
    }

    #[test]
    fn only_v1_and_v2_lengths_are_accepted() {
        for length in [0, 1, 15, 17, 31, 33, 64] {
            let result = GroupModel::create(&vec![1u8; length], None, None, members(2), None);

            assert_eq!(
                result,
                Err(GroupModelError::InvalidGroupIdentifier(
                    IdentifierError::InvalidLength(length)
                )),
                "{length} bytes is not a group identifier"
            );
        }

        for length in [GROUP_ID_LENGTH_V1, GROUP_ID_LENGTH_V2] {
            assert!(
                GroupModel::create(&vec![1u8; length], None, None, members(2), None).is_ok(),
                "{length} bytes is a group identifier"
            );
        }
    }

    #[test]
    fn duplicate_member_in_v2_group_is_rejected() {
        let alice = ServiceAddress::generate();
        let result = GroupModel::create(
            &random_bytes::<GROUP_ID_LENGTH_V2>(),
            Some("Team".to_string()),
            None,
            vec![alice.clone(), alice],
            None,
        );

        assert!(
            matches!(result, Err(GroupModelError::InvalidMembership(_))),
            "alice appears twice"
        );
    }

    #[test]
    fn v2_group_gets_default_properties() {
        let model = GroupModel::create(
            &random_bytes::<GROUP_ID_LENGTH_V2>(),
            None,
            None,
            members(2),
            None,
        )
        .expect("a valid V2 group");

        let properties = model.v2_properties().expect("V2 groups carry properties");
        assert_eq!(model.groups_version(), GroupsVersion::V2, "32-byte id is V2");
        assert_eq!(properties.revision, 0, "new V2 groups start at revision 0");
        assert_eq!(properties.access, GroupAccess::default(), "default access policy");
    }

    #[test]
    fn avatar_is_validated_at_construction() {
        let group_id = random_bytes::<GROUP_ID_LENGTH_V1>();

        assert!(
            GroupModel::create(&group_id, None, Some(png_of_size(MAX_AVATAR_SIZE)), members(1), None)
                .is_ok(),
            "an avatar at the ceiling is fine"
        );
        assert_eq!(
            GroupModel::create(
                &group_id,
                None,
                Some(png_of_size(MAX_AVATAR_SIZE + 1)),
                members(1),
                None
            ),
            Err(GroupModelError::AvatarTooLarge {
                size: MAX_AVATAR_SIZE + 1,
                max: MAX_AVATAR_SIZE
            }),
            "raw ceiling enforced at creation"
        );
        assert_eq!(
            GroupModel::create(&group_id, None, Some(b"not an image".to_vec()), members(1), None),
            Err(GroupModelError::InvalidAvatarFormat),
            "format checked at creation"
        );
    }

    #[test]
    fn inviter_must_be_a_member_at_creation() {
        let group_id = random_bytes::<GROUP_ID_LENGTH_V2>();
        let people = members(2);

        assert!(
            GroupModel::create(&group_id, None, None, people.clone(), Some(people[0].clone()))
                .is_ok(),
            "inviter is a member"
        );
        assert!(
            matches!(
                GroupModel::create(&group_id, None, None, people, Some(ServiceAddress::generate())),
                Err(GroupModelError::InvalidMembership(_))
            ),
            "inviter is a stranger"
        );
    }

    #[test]
    fn v1_groups_reject_v2_features() {
        let group_id = GroupIdentifier::generate(GroupsVersion::V1);
        let admin = ServiceAddress::generate();

        let with_admin = GroupModel::builder(group_id)
            .membership(
                GroupMembership::builder()
                    .add_full_member(admin.clone(), Role::Administrator)
                    .build()
                    .expect("valid membership"),
            )
            .build();
        assert!(
            matches!(with_admin, Err(GroupModelError::InvalidMembership(_))),
            "V1 has no roles"
        );

        let with_inviter = GroupModel::create(
            group_id.as_bytes(),
            None,
            None,
            vec![admin.clone()],
            Some(admin),
        );
        assert!(
            matches!(with_inviter, Err(GroupModelError::InvalidMembership(_))),
            "V1 has no invite provenance"
        );

        let with_v2_properties = GroupModel::builder(group_id)
            .v2_properties(GroupV2Properties::generate())
            .build();
        assert!(
            matches!(
                with_v2_properties,
                Err(GroupModelError::InvalidGroupIdentifier(
                    IdentifierError::VersionMismatch { .. }
                ))
            ),
            "V2 properties need a V2 identifier"
        );
    }

    #[test]
    fn avatar_representations_replace_each_other() {
        let mut model = GroupModel::builder(GroupIdentifier::generate(GroupsVersion::V1))
            .build()
            .expect("valid");

        model
            .set_legacy_avatar_data(png_of_size(100))
            .expect("valid avatar");
        assert!(model.legacy_avatar_data().is_some(), "legacy bytes set");

        let hash = AvatarHash::of(b"elsewhere");
        model.set_avatar_hash(hash.clone());
        assert_eq!(model.avatar_hash(), Some(&hash), "hash set");
        assert_eq!(model.legacy_avatar_data(), None, "the hash replaced the bytes");

        model.clear_avatar();
        assert!(model.avatar().is_none(), "cleared");
    }

    #[test]
    fn rejected_avatar_leaves_model_unchanged() {
        let mut model = GroupModel::builder(GroupIdentifier::generate(GroupsVersion::V1))
            .avatar_hash(AvatarHash::of(b"old"))
            .build()
            .expect("valid");
        let before = model.clone();

        assert!(
            model.set_legacy_avatar_data(b"nope".to_vec()).is_err(),
            "not an image"
        );
        assert_eq!(model, before, "failed update changes nothing");
    }

    #[test]
    fn legacy_avatar_migrates_once() {
        let avatar = png_of_size(256);
        let mut model = GroupModel::builder(GroupIdentifier::generate(GroupsVersion::V1))
            .avatar_data(avatar.clone())
            .build()
            .expect("valid");

        let (hash, bytes) = model
            .migrate_legacy_avatar()
            .expect("legacy bytes migrate");
        assert_eq!(bytes, avatar, "the bytes are handed back for storage");
        assert_eq!(hash, AvatarHash::of(&avatar), "hash of the legacy bytes");
        assert_eq!(model.avatar_hash(), Some(&hash), "model now points at the hash");
        assert_eq!(model.migrate_legacy_avatar(), None, "nothing left to migrate");
    }

    #[test]
    fn downloaded_avatar_is_decrypted_and_hashed() {
        let mut model = GroupModel::builder(GroupIdentifier::generate(GroupsVersion::V2))
            .build()
            .expect("valid");
        let avatar = png_of_size(512);

        let encrypted = model
            .encrypt_avatar_for_upload(&avatar)
            .expect("V2 groups encrypt avatars");
        let decrypted = model
            .apply_downloaded_avatar(&encrypted)
            .expect("same group key decrypts");

        assert_eq!(decrypted, avatar, "decrypts to the uploaded bytes");
        assert_eq!(
            model.avatar_hash(),
            Some(&AvatarHash::of(&avatar)),
            "hash of the decrypted avatar"
        );
    }

    #[test]
    fn v1_groups_have_no_avatar_cipher() {
        let mut model = GroupModel::builder(GroupIdentifier::generate(GroupsVersion::V1))
            .build()
            .expect("valid");

        assert!(model.avatar_cipher().is_none(), "no master key in V1");
        assert!(
            matches!(
                model.apply_downloaded_avatar(&[0u8; 64]),
                Err(Error::NotAV2Group)
            ),
            "V1 avatars are not encrypted with a group key"
        );
    }

    #[test]
    fn access_policy_decides_permissions() {
        let admin = ServiceAddress::generate();
        let member = ServiceAddress::generate();
        let stranger = ServiceAddress::generate();

        let mut properties = GroupV2Properties::generate();
        properties.access = GroupAccess {
            members: AccessRequired::Administrator,
            attributes: AccessRequired::Member,
            add_from_invite_link: AccessRequired::Unsatisfiable,
        };

        let model = GroupModel::builder(GroupIdentifier::generate(GroupsVersion::V2))
            .membership(
                GroupMembership::builder()
                    .add_full_member(admin.clone(), Role::Administrator)
                    .add_full_member(member.clone(), Role::Normal)
                    .build()
                    .expect("valid membership"),
            )
            .v2_properties(properties)
            .build()
            .expect("valid");

        assert!(model.can_add_members(&admin), "admins add members");
        assert!(!model.can_add_members(&member), "members may not");
        assert!(model.can_edit_attributes(&member), "members edit attributes");
        assert!(!model.can_edit_attributes(&stranger), "strangers may not");
    }

    #[test]
    fn next_snapshot_is_derived_from_the_previous() {
        let original = GroupModel::create(
            &random_bytes::<GROUP_ID_LENGTH_V2>(),
            Some("Old".to_string()),
            None,
            members(2),
            None,
        )
        .expect("valid");

        let renamed = original
            .to_builder()
            .name("New")
            .build()
            .expect("still valid");

        assert_eq!(renamed.group_name(), Some("New"), "builder applies the new name");
        assert_eq!(renamed.group_id(), original.group_id(), "identity never changes");
        assert_eq!(
            renamed.group_membership(),
            original.group_membership(),
            "membership carried over"
        );
        assert_eq!(original.group_name(), Some("Old"), "old snapshot untouched");
    }
}
