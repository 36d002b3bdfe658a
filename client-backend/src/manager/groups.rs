//! In-memory group snapshots, kept in step with the database.
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use rosa_lib::{
    groups::{AvatarHash, GroupModel},
    identifiers::{GroupIdentifier, GroupsVersion, ServiceAddress},
};
use scc::hash_map::Entry;

use crate::database::Database;

use super::queue::SerialQueue;

/// The latest snapshot of every known group.
///
/// Snapshots are shared as `Arc<GroupModel>` and never modified: a change
/// swaps in a new `Arc` under the entry lock, so a reader holds either the
/// old snapshot or the new one.
#[derive(Debug, Default, Clone)]
pub struct GroupRegistry {
    groups: Arc<scc::HashMap<GroupIdentifier, Arc<GroupModel>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self, group_id: &GroupIdentifier) -> Option<Arc<GroupModel>> {
        self.groups
            .get_async(group_id)
            .await
            .map(|entry| entry.get().clone())
    }

    /// Swaps in `group`, returning the snapshot it replaced.
    pub async fn replace_snapshot(&self, group: GroupModel) -> Option<Arc<GroupModel>> {
        let group = Arc::new(group);

        match self.groups.entry_async(*group.group_id()).await {
            Entry::Occupied(mut entry) => Some(entry.insert(group)),
            Entry::Vacant(entry) => {
                entry.insert_entry(group);
                None
            }
        }
    }

    pub async fn all(&self) -> Vec<Arc<GroupModel>> {
        let mut groups = Vec::with_capacity(self.groups.len());
        self.groups
            .scan_async(|_, group| groups.push(group.clone()))
            .await;

        groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group storage: the registry in front, the database behind it.
///
/// Every change is written to the database before the new snapshot becomes
/// visible, and both happen while the group's entry is locked.
#[derive(Debug)]
pub struct GroupManager {
    registry: GroupRegistry,
    database: Database,
    queue: Arc<SerialQueue>,
}

impl GroupManager {
    /// Loads every stored group into memory.
    pub async fn init(database: Database, queue: Arc<SerialQueue>) -> Result<Self> {
        let db = database.clone();
        let groups = queue.dispatch_async(move || db.get_all_groups()).await??;

        let registry = GroupRegistry::new();
        for group in groups {
            registry.replace_snapshot(group).await;
        }
        log::info!("Loaded {} groups", registry.len());

        Ok(Self {
            registry,
            database,
            queue,
        })
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Creates a new group with a fresh identifier. Every member is a
    /// normal member; we created the group so nobody added us.
    pub async fn create_group(
        &self,
        version: GroupsVersion,
        name: Option<String>,
        avatar_data: Option<Vec<u8>>,
        members: Vec<ServiceAddress>,
    ) -> Result<Arc<GroupModel>> {
        let group_id = GroupIdentifier::generate(version);
        let group = GroupModel::create(group_id.as_bytes(), name, avatar_data, members, None)?;

        let Entry::Vacant(entry) = self.registry.groups.entry_async(group_id).await else {
            bail!("{group_id} already exists");
        };

        let group = Arc::new(group);
        let db = self.database.clone();
        let stored = group.clone();
        self.queue
            .dispatch_async(move || db.add_group(&stored))
            .await??;
        entry.insert_entry(group.clone());

        log::info!("Created {group_id} ({})", group.group_name_or_default());

        Ok(group)
    }

    pub async fn snapshot(&self, group_id: &GroupIdentifier) -> Option<Arc<GroupModel>> {
        self.registry.snapshot(group_id).await
    }

    /// Stores `group` as the new snapshot of its group and returns the one
    /// it replaced. Snapshots older than the current one (by V2 revision)
    /// are rejected.
    pub async fn replace_snapshot(&self, group: GroupModel) -> Result<Option<Arc<GroupModel>>> {
        let group_id = *group.group_id();
        let entry = self.registry.groups.entry_async(group_id).await;

        if let Entry::Occupied(occupied) = &entry {
            let current_revision = occupied.get().v2_properties().map(|v2| v2.revision);
            let new_revision = group.v2_properties().map(|v2| v2.revision);

            if let (Some(current), Some(new)) = (current_revision, new_revision) {
                if new < current {
                    bail!("Refusing to replace revision {current} of {group_id} with {new}");
                }
            }
        }

        let group = self.persist(group).await?;
        log::debug!("New snapshot of {group_id}");

        Ok(match entry {
            Entry::Occupied(mut occupied) => Some(occupied.insert(group)),
            Entry::Vacant(vacant) => {
                vacant.insert_entry(group);
                None
            }
        })
    }

    /// Replaces the avatar with raw image bytes. The bytes go to the avatar
    /// table and the group keeps their hash.
    pub async fn set_avatar(
        &self,
        group_id: &GroupIdentifier,
        avatar_data: Vec<u8>,
    ) -> Result<AvatarHash> {
        self.update_avatar(group_id, move |group| {
            group.set_legacy_avatar_data(avatar_data)?;
            group
                .migrate_legacy_avatar()
                .context("a legacy avatar was just set")
        })
        .await
    }

    /// Decrypts an avatar downloaded for a V2 group and makes it current.
    pub async fn apply_downloaded_avatar(
        &self,
        group_id: &GroupIdentifier,
        encrypted: Vec<u8>,
    ) -> Result<AvatarHash> {
        self.update_avatar(group_id, move |group| {
            let avatar_data = group.apply_downloaded_avatar(&encrypted)?;
            let hash = group
                .avatar_hash()
                .cloned()
                .context("a downloaded avatar sets the hash")?;

            Ok((hash, avatar_data))
        })
        .await
    }

    /// Clone-modify-swap of one group's avatar, persisted before the swap.
    async fn update_avatar<F>(&self, group_id: &GroupIdentifier, update: F) -> Result<AvatarHash>
    where
        F: FnOnce(&mut GroupModel) -> Result<(AvatarHash, Vec<u8>)>,
    {
        let Some(mut entry) = self.registry.groups.get_async(group_id).await else {
            bail!("Unknown group {group_id}");
        };

        let mut group = GroupModel::clone(entry.get());
        let (hash, avatar_data) = update(&mut group)?;

        let db = self.database.clone();
        let stored = group.clone();
        let stored_hash = hash.clone();
        self.queue
            .dispatch_async(move || db.save_group_with_avatar(&stored, &stored_hash, &avatar_data))
            .await??;

        *entry.get_mut() = Arc::new(group);
        log::debug!("New avatar for {group_id}: {hash}");

        Ok(hash)
    }

    pub async fn clear_avatar(&self, group_id: &GroupIdentifier) -> Result<()> {
        let Some(mut entry) = self.registry.groups.get_async(group_id).await else {
            bail!("Unknown group {group_id}");
        };

        let mut group = GroupModel::clone(entry.get());
        group.clear_avatar();

        *entry.get_mut() = self.persist(group).await?;

        Ok(())
    }

    /// Avatar bytes of a group, if it has an avatar.
    pub async fn avatar(&self, group_id: &GroupIdentifier) -> Result<Option<Vec<u8>>> {
        let Some(hash) = self
            .snapshot(group_id)
            .await
            .and_then(|group| group.avatar_hash().cloned())
        else {
            return Ok(None);
        };

        let db = self.database.clone();
        Ok(self
            .queue
            .dispatch_async(move || db.get_avatar(&hash))
            .await??)
    }

    /// Deletes a group. The entry stays locked until the row is gone, so a
    /// concurrent update cannot write it back.
    pub async fn remove_group(&self, group_id: &GroupIdentifier) -> Result<()> {
        let Entry::Occupied(entry) = self.registry.groups.entry_async(*group_id).await else {
            bail!("Unknown group {group_id}");
        };

        let db = self.database.clone();
        let id = *group_id;
        self.queue
            .dispatch_async(move || db.delete_group(&id))
            .await??;

        entry.remove_entry();
        log::info!("Removed {group_id}");

        Ok(())
    }

    async fn persist(&self, group: GroupModel) -> Result<Arc<GroupModel>> {
        let group = Arc::new(group);
        let db = self.database.clone();
        let stored = group.clone();

        self.queue
            .dispatch_async(move || db.save_group(&stored))
            .await??;

        Ok(group)
    }
}
