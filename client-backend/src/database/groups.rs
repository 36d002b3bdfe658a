use rosa_lib::{
    groups::{AvatarHash, GroupModel},
    identifiers::GroupIdentifier,
};
use rusqlite::{params, ErrorCode, OptionalExtension, Transaction};

use super::{not_found, Database, DatabaseError};

impl Database {
    /// Stores a group that must not exist yet.
    pub fn add_group(&self, group: &GroupModel) -> Result<(), DatabaseError> {
        let result = self.get_connection().execute(
            "INSERT INTO groups (group_id, record) VALUES (?1, ?2)",
            params![group.group_id().as_bytes(), group.encode()],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(DatabaseError::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Stores a group, replacing the previous snapshot if there is one.
    pub fn save_group(&self, group: &GroupModel) -> Result<(), DatabaseError> {
        self.get_connection().execute(
            "INSERT INTO groups (group_id, record) VALUES (?1, ?2)
                ON CONFLICT(group_id) DO UPDATE SET record = excluded.record",
            params![group.group_id().as_bytes(), group.encode()],
        )?;

        Ok(())
    }

    /// Loads a group. Inline avatar bytes left by older versions are moved
    /// to the avatar table and the group is written back with their hash.
    pub fn get_group(&self, group_id: &GroupIdentifier) -> Result<GroupModel, DatabaseError> {
        let mut conn = self.get_connection();
        let transaction = conn.transaction()?;

        let record: Vec<u8> = transaction
            .query_row(
                "SELECT record FROM groups WHERE group_id = ?",
                params![group_id.as_bytes()],
                |row| row.get(0),
            )
            .map_err(not_found)?;

        let group = Self::decode_and_migrate(&transaction, &record)?;
        transaction.commit()?;

        Ok(group)
    }

    /// Loads every group, migrating inline avatars as [`Database::get_group`] does.
    pub fn get_all_groups(&self) -> Result<Vec<GroupModel>, DatabaseError> {
        let mut conn = self.get_connection();
        let transaction = conn.transaction()?;

        let records: Vec<Vec<u8>> = {
            let mut statement = transaction.prepare("SELECT record FROM groups")?;
            let rows = statement.query_map((), |row| row.get(0))?;
            rows.collect::<Result<_, _>>()?
        };

        let groups = records
            .iter()
            .map(|record| Self::decode_and_migrate(&transaction, record))
            .collect::<Result<Vec<_>, _>>()?;
        transaction.commit()?;

        Ok(groups)
    }

    pub fn delete_group(&self, group_id: &GroupIdentifier) -> Result<(), DatabaseError> {
        let deleted = self.get_connection().execute(
            "DELETE FROM groups WHERE group_id = ?",
            params![group_id.as_bytes()],
        )?;

        if deleted == 0 {
            Err(DatabaseError::NotFound)
        } else {
            Ok(())
        }
    }

    /// Stores avatar bytes under their hash. Storing the same bytes twice is
    /// a no-op.
    pub fn save_avatar(&self, hash: &AvatarHash, data: &[u8]) -> Result<(), DatabaseError> {
        Self::insert_avatar(&self.get_connection(), hash, data)
    }

    /// Stores avatar bytes and the group pointing at them in one transaction.
    pub fn save_group_with_avatar(
        &self,
        group: &GroupModel,
        hash: &AvatarHash,
        data: &[u8],
    ) -> Result<(), DatabaseError> {
        let mut conn = self.get_connection();
        let transaction = conn.transaction()?;

        Self::insert_avatar(&transaction, hash, data)?;
        transaction.execute(
            "INSERT INTO groups (group_id, record) VALUES (?1, ?2)
                ON CONFLICT(group_id) DO UPDATE SET record = excluded.record",
            params![group.group_id().as_bytes(), group.encode()],
        )?;
        transaction.commit()?;

        Ok(())
    }

    pub fn get_avatar(&self, hash: &AvatarHash) -> Result<Option<Vec<u8>>, DatabaseError> {
        Ok(self
            .get_connection()
            .query_row(
                "SELECT data FROM group_avatars WHERE avatar_hash = ?",
                params![hash.as_str()],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn insert_avatar(
        conn: &rusqlite::Connection,
        hash: &AvatarHash,
        data: &[u8],
    ) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT OR IGNORE INTO group_avatars (avatar_hash, data) VALUES (?1, ?2)",
            params![hash.as_str(), data],
        )?;

        Ok(())
    }

    fn decode_and_migrate(
        transaction: &Transaction<'_>,
        record: &[u8],
    ) -> Result<GroupModel, DatabaseError> {
        let mut group = GroupModel::decode(record)?;

        if let Some((hash, data)) = group.migrate_legacy_avatar() {
            log::debug!(
                "Moving the inline avatar of {} to the avatar table ({hash})",
                group.group_id()
            );

            Self::insert_avatar(transaction, &hash, &data)?;
            transaction.execute(
                "UPDATE groups SET record = ?1 WHERE group_id = ?2",
                params![group.encode(), group.group_id().as_bytes()],
            )?;
        }

        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use rosa_lib::{
        api::proto::{self, ProstMessage},
        identifiers::{GroupsVersion, ServiceAddress},
    };

    use super::*;

    fn png(len: usize) -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.resize(len, 0);
        bytes
    }

    fn group(version: GroupsVersion) -> GroupModel {
        let id = GroupIdentifier::generate(version);
        GroupModel::create(
            id.as_bytes(),
            Some("Book Club".to_string()),
            None,
            vec![ServiceAddress::generate(), ServiceAddress::generate()],
            None,
        )
        .expect("valid group")
    }

    #[test]
    pub fn roundtrip_group() {
        let db = Database::in_memory().expect("in-memory db starts");
        let group = group(GroupsVersion::V2);

        assert_eq!(
            db.get_group(group.group_id()),
            Err(DatabaseError::NotFound),
            "Getting a group that doesn't exist should return NotFound"
        );

        assert_eq!(db.add_group(&group), Ok(()), "Adding a group works");
        assert_eq!(
            db.add_group(&group),
            Err(DatabaseError::AlreadyExists),
            "Adding it twice does not"
        );

        assert_eq!(
            db.get_group(group.group_id()).expect("No database error"),
            group,
            "group round-trips through the database"
        );
    }

    #[test]
    pub fn save_replaces_previous_snapshot() {
        let db = Database::in_memory().expect("in-memory db starts");
        let group = group(GroupsVersion::V1);
        db.save_group(&group).expect("first save inserts");

        let renamed = group
            .to_builder()
            .name("Poetry Club")
            .build()
            .expect("valid");
        db.save_group(&renamed).expect("second save replaces");

        assert_eq!(
            db.get_all_groups().expect("No database error"),
            vec![renamed],
            "only the latest snapshot is kept"
        );
    }

    #[test]
    pub fn inline_avatar_is_migrated_on_read() {
        let db = Database::in_memory().expect("in-memory db starts");
        let avatar = png(128);
        let mut group = group(GroupsVersion::V1);
        group
            .set_legacy_avatar_data(avatar.clone())
            .expect("valid avatar");
        db.save_group(&group).expect("saved");

        let loaded = db.get_group(group.group_id()).expect("No database error");
        let hash = loaded.avatar_hash().expect("migrated to a hash").clone();

        assert_eq!(loaded.legacy_avatar_data(), None, "inline bytes are gone");
        assert_eq!(
            db.get_avatar(&hash).expect("No database error"),
            Some(avatar),
            "bytes moved to the avatar table"
        );

        let stored: Vec<u8> = db
            .get_connection()
            .query_row(
                "SELECT record FROM groups WHERE group_id = ?",
                params![group.group_id().as_bytes()],
                |row| row.get(0),
            )
            .expect("row exists");
        let stored = proto::GroupRecord::decode(stored.as_slice()).expect("valid record");
        assert_eq!(stored.legacy_avatar_data, None, "migration was written back");
        assert_eq!(
            stored.avatar_hash.as_deref(),
            Some(hash.as_str()),
            "record points at the stored avatar"
        );
    }

    #[test]
    pub fn corrupted_record_is_surfaced() {
        let db = Database::in_memory().expect("in-memory db starts");
        let group_id = GroupIdentifier::generate(GroupsVersion::V1);
        db.get_connection()
            .execute(
                "INSERT INTO groups (group_id, record) VALUES (?1, ?2)",
                params![group_id.as_bytes(), vec![0xFFu8, 0xFF]],
            )
            .expect("raw insert");

        assert!(
            matches!(
                db.get_group(&group_id),
                Err(DatabaseError::CorruptedData(_))
            ),
            "broken records are not replaced by defaults"
        );
    }

    #[test]
    pub fn deleting_a_group() {
        let db = Database::in_memory().expect("in-memory db starts");
        let group = group(GroupsVersion::V2);
        db.add_group(&group).expect("added");

        assert_eq!(db.delete_group(group.group_id()), Ok(()), "deleted");
        assert_eq!(
            db.delete_group(group.group_id()),
            Err(DatabaseError::NotFound),
            "already gone"
        );
    }
}
