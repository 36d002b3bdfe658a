mod tests {
    use std::{sync::Arc, time::Duration};

    use futures_util::future::join_all;
    use rosa_lib::{groups::GroupAvatar, identifiers::GroupsVersion};
    use tokio::{sync::oneshot, time::sleep};

    use crate::{
        manager::ClientManager,
        tests::utils::{fake_members, fake_png, fresh_v2_id, v2_group_at_revision},
    };

    #[tokio::test]
    pub async fn create_group_is_visible_and_stored() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");

        let group = client
            .group_manager
            .create_group(
                GroupsVersion::V1,
                Some("Climbing".to_string()),
                None,
                fake_members(3),
            )
            .await
            .expect("Failed to create the group");

        let snapshot = client
            .group_manager
            .snapshot(group.group_id())
            .await
            .expect("Created group is not in the registry");
        assert!(Arc::ptr_eq(&group, &snapshot), "Registry holds another snapshot");

        let stored = client
            .sqlite_database
            .get_group(group.group_id())
            .expect("Created group is not in the database");
        assert_eq!(stored, *group, "Stored group differs from the snapshot");
    }

    #[tokio::test]
    pub async fn stale_revision_is_rejected() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let admin = fake_members(1).remove(0);
        let group_id = fresh_v2_id();

        client
            .group_manager
            .replace_snapshot(v2_group_at_revision(group_id, &admin, 5))
            .await
            .expect("First snapshot rejected");

        let result = client
            .group_manager
            .replace_snapshot(v2_group_at_revision(group_id, &admin, 4))
            .await;
        assert!(result.is_err(), "Older revision replaced a newer one");

        let current = client
            .group_manager
            .snapshot(&group_id)
            .await
            .expect("Group vanished");
        assert_eq!(current.group_name(), Some("revision 5"), "Newer revision kept");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    pub async fn readers_never_see_a_torn_snapshot() {
        const REVISIONS: u32 = 50;

        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let admin = fake_members(1).remove(0);
        let group_id = fresh_v2_id();

        client
            .group_manager
            .replace_snapshot(v2_group_at_revision(group_id, &admin, 0))
            .await
            .expect("First snapshot rejected");

        let writer = {
            let client = client.clone();
            tokio::spawn(async move {
                for revision in 1..=REVISIONS {
                    client
                        .group_manager
                        .replace_snapshot(v2_group_at_revision(group_id, &admin, revision))
                        .await
                        .expect("Newer revision rejected");
                }
            })
        };

        let readers = (0..4).map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                let mut last_seen = 0;

                for _ in 0..200 {
                    let group = client
                        .group_manager
                        .snapshot(&group_id)
                        .await
                        .expect("Group vanished");
                    let revision = group.v2_properties().expect("V2 group").revision;

                    assert_eq!(
                        group.group_name(),
                        Some(format!("revision {revision}").as_str()),
                        "Name and revision come from different snapshots"
                    );
                    assert!(revision >= last_seen, "Revision went backwards");
                    last_seen = revision;

                    tokio::task::yield_now().await;
                }
            })
        });

        for reader in join_all(readers).await {
            reader.expect("Reader panicked");
        }
        writer.await.expect("Writer panicked");

        let last = client
            .group_manager
            .snapshot(&group_id)
            .await
            .expect("Group vanished");
        assert_eq!(
            last.v2_properties().map(|v2| v2.revision),
            Some(REVISIONS),
            "Last revision wins"
        );
    }

    #[tokio::test]
    pub async fn downloaded_avatar_is_decrypted_and_stored() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let group = client
            .group_manager
            .create_group(GroupsVersion::V2, None, None, fake_members(2))
            .await
            .expect("Failed to create the group");

        let avatar = fake_png(4096);
        let encrypted = group
            .encrypt_avatar_for_upload(&avatar)
            .expect("Failed to encrypt the avatar");

        let hash = client
            .group_manager
            .apply_downloaded_avatar(group.group_id(), encrypted)
            .await
            .expect("Failed to apply the avatar");

        let snapshot = client
            .group_manager
            .snapshot(group.group_id())
            .await
            .expect("Group vanished");
        assert_eq!(snapshot.avatar(), &GroupAvatar::Hash(hash), "Avatar replaced by its hash");

        let stored = client
            .group_manager
            .avatar(group.group_id())
            .await
            .expect("Failed to load the avatar");
        assert_eq!(stored, Some(avatar), "Stored avatar differs from the upload");
    }

    #[tokio::test]
    pub async fn v1_groups_reject_downloaded_avatars() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let group = client
            .group_manager
            .create_group(GroupsVersion::V1, None, None, fake_members(2))
            .await
            .expect("Failed to create the group");

        let result = client
            .group_manager
            .apply_downloaded_avatar(group.group_id(), vec![0; 128])
            .await;
        assert!(result.is_err(), "V1 group accepted an encrypted avatar");
    }

    #[tokio::test]
    pub async fn invalid_avatar_leaves_the_snapshot_alone() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let group = client
            .group_manager
            .create_group(GroupsVersion::V1, Some("Choir".to_string()), None, fake_members(2))
            .await
            .expect("Failed to create the group");

        let result = client
            .group_manager
            .set_avatar(group.group_id(), b"not an image".to_vec())
            .await;
        assert!(result.is_err(), "Unrecognised bytes accepted as an avatar");

        let snapshot = client
            .group_manager
            .snapshot(group.group_id())
            .await
            .expect("Group vanished");
        assert!(Arc::ptr_eq(&group, &snapshot), "Failed update swapped the snapshot");
    }

    #[tokio::test]
    pub async fn set_and_clear_avatar() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let group = client
            .group_manager
            .create_group(GroupsVersion::V1, None, None, fake_members(1))
            .await
            .expect("Failed to create the group");

        client
            .group_manager
            .set_avatar(group.group_id(), fake_png(64))
            .await
            .expect("Failed to set the avatar");
        assert_eq!(
            client
                .group_manager
                .avatar(group.group_id())
                .await
                .expect("Failed to load the avatar"),
            Some(fake_png(64)),
            "Avatar bytes stored"
        );

        client
            .group_manager
            .clear_avatar(group.group_id())
            .await
            .expect("Failed to clear the avatar");
        assert_eq!(
            client
                .group_manager
                .avatar(group.group_id())
                .await
                .expect("Failed to load the avatar"),
            None,
            "Cleared avatar still reachable"
        );
    }

    #[tokio::test]
    pub async fn removed_group_is_gone_everywhere() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let group = client
            .group_manager
            .create_group(GroupsVersion::V2, None, None, fake_members(2))
            .await
            .expect("Failed to create the group");

        client
            .group_manager
            .remove_group(group.group_id())
            .await
            .expect("Failed to remove the group");

        assert!(
            client.group_manager.snapshot(group.group_id()).await.is_none(),
            "Removed group still in the registry"
        );
        assert!(
            client.sqlite_database.get_group(group.group_id()).is_err(),
            "Removed group still stored"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    pub async fn removal_and_update_race_leaves_memory_and_disk_agreeing() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        let admin = fake_members(1).remove(0);
        let group_id = fresh_v2_id();

        client
            .group_manager
            .replace_snapshot(v2_group_at_revision(group_id, &admin, 1))
            .await
            .expect("First snapshot rejected");

        // Hold the database queue so both operations are in flight at once.
        let (release, parked) = oneshot::channel::<()>();
        let blocker = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .database_queue
                    .dispatch_async(move || {
                        let _ = parked.blocking_recv();
                    })
                    .await
                    .expect("Queue stopped");
            })
        };
        sleep(Duration::from_millis(50)).await;

        let removal = {
            let client = client.clone();
            tokio::spawn(async move { client.group_manager.remove_group(&group_id).await })
        };
        sleep(Duration::from_millis(50)).await;

        let update = {
            let client = client.clone();
            let admin = admin.clone();
            tokio::spawn(async move {
                client
                    .group_manager
                    .replace_snapshot(v2_group_at_revision(group_id, &admin, 2))
                    .await
            })
        };
        sleep(Duration::from_millis(50)).await;

        release.send(()).expect("Blocking job is waiting");
        blocker.await.expect("Blocking task panicked");
        removal
            .await
            .expect("Removal task panicked")
            .expect("Failed to remove the group");
        let _ = update.await.expect("Update task panicked");

        let in_registry = client.group_manager.snapshot(&group_id).await.is_some();
        let in_database = client.sqlite_database.get_group(&group_id).is_ok();
        assert_eq!(
            in_registry, in_database,
            "Registry and database disagree about the group"
        );
    }

    #[tokio::test]
    pub async fn removing_an_unknown_group_fails() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");

        let result = client.group_manager.remove_group(&fresh_v2_id()).await;
        assert!(result.is_err(), "Removed a group that never existed");
    }

    #[tokio::test]
    pub async fn summaries_use_the_placeholder() {
        let client = ClientManager::initialise_in_memory()
            .await
            .expect("Failed to initialise the client");
        client
            .group_manager
            .create_group(GroupsVersion::V1, None, None, fake_members(2))
            .await
            .expect("Failed to create the group");

        let summaries = client
            .group_summaries("Unnamed")
            .await
            .expect("Failed to build summaries");

        assert_eq!(summaries.len(), 1, "One group created");
        assert_eq!(summaries[0].name(), "Unnamed", "Placeholder used for an unnamed group");
        assert_eq!(summaries[0].member_count, 2, "Member count");
        assert_eq!(summaries[0].unread_count, 0, "Nothing received yet");
    }

    #[cfg(feature = "on-disk-testing")]
    #[tokio::test]
    pub async fn groups_survive_a_restart() {
        use crate::tests::utils::scratch_folder;

        let folder = scratch_folder();

        let group = {
            let client = ClientManager::initialise_params(Some(folder.clone()))
                .await
                .expect("Failed to initialise the client");
            client
                .group_manager
                .create_group(
                    GroupsVersion::V2,
                    Some("Allotment".to_string()),
                    Some(fake_png(256)),
                    fake_members(4),
                )
                .await
                .expect("Failed to create the group")
        };

        let client = ClientManager::initialise_params(Some(folder.clone()))
            .await
            .expect("Failed to reopen the client");
        let reloaded = client
            .group_manager
            .snapshot(group.group_id())
            .await
            .expect("Group not reloaded");

        assert_eq!(reloaded.group_name(), Some("Allotment"), "Name reloaded");
        assert_eq!(reloaded.v2_properties(), group.v2_properties(), "V2 properties reloaded");
        assert!(
            reloaded.legacy_avatar_data().is_none(),
            "Legacy avatar not migrated on load"
        );
        assert_eq!(
            client
                .group_manager
                .avatar(group.group_id())
                .await
                .expect("Failed to load the avatar"),
            Some(fake_png(256)),
            "Avatar bytes reloaded"
        );

        drop(client);
        std::fs::remove_dir_all(&folder).expect("Failed to clean up");
    }
}
