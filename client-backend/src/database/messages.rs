use rosa_lib::{
    identifiers::GroupIdentifier,
    messages::{Interaction, OutgoingMessage, ReadTracking},
};
use rusqlite::params;

use super::{not_found, Database, DatabaseError};

impl Database {
    /// Stores a message we sent and returns its row id.
    pub fn add_outgoing_message(
        &self,
        group_id: &GroupIdentifier,
        message: &OutgoingMessage,
    ) -> Result<i64, DatabaseError> {
        let conn = self.get_connection();
        conn.execute(
            "INSERT INTO outgoing_messages (id, group_id, record) VALUES (NULL, ?1, ?2)",
            params![group_id.as_bytes(), message.encode()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Loads a message we sent. A message still carrying the message-wide
    /// state of older versions is migrated to per-recipient states and
    /// written back before it is returned.
    pub fn get_outgoing_message(&self, id: i64) -> Result<OutgoingMessage, DatabaseError> {
        let conn = self.get_connection();

        let record: Vec<u8> = conn
            .query_row(
                "SELECT record FROM outgoing_messages WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .map_err(not_found)?;

        let mut message = OutgoingMessage::decode(&record)?;

        if message.migrate_legacy_state() {
            log::debug!("Migrated the delivery state of outgoing message {id}");

            conn.execute(
                "UPDATE outgoing_messages SET record = ?1 WHERE id = ?2",
                params![message.encode(), id],
            )?;
        }

        Ok(message)
    }

    pub fn update_outgoing_message(
        &self,
        id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), DatabaseError> {
        let updated = self.get_connection().execute(
            "UPDATE outgoing_messages SET record = ?1 WHERE id = ?2",
            params![message.encode(), id],
        )?;

        if updated == 0 {
            Err(DatabaseError::NotFound)
        } else {
            Ok(())
        }
    }

    pub fn add_interaction(
        &self,
        group_id: &GroupIdentifier,
        interaction: &Interaction,
    ) -> Result<i64, DatabaseError> {
        let conn = self.get_connection();
        conn.execute(
            "INSERT INTO interactions (id, group_id, is_read, record) VALUES (NULL, ?1, ?2, ?3)",
            params![
                group_id.as_bytes(),
                interaction.was_read(),
                interaction.encode()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn get_interaction(&self, id: i64) -> Result<Interaction, DatabaseError> {
        let record: Vec<u8> = self
            .get_connection()
            .query_row(
                "SELECT record FROM interactions WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .map_err(not_found)?;

        Ok(Interaction::decode(&record)?)
    }

    pub fn mark_interaction_as_read(&self, id: i64) -> Result<(), DatabaseError> {
        let mut interaction = self.get_interaction(id)?;
        if interaction.was_read() {
            return Ok(());
        }
        interaction.mark_as_read();

        self.get_connection().execute(
            "UPDATE interactions SET is_read = 1, record = ?1 WHERE id = ?2",
            params![interaction.encode(), id],
        )?;

        Ok(())
    }

    pub fn unread_count(&self, group_id: &GroupIdentifier) -> Result<u64, DatabaseError> {
        Ok(self.get_connection().query_row(
            "SELECT COUNT(*) FROM interactions WHERE group_id = ? AND is_read = 0",
            params![group_id.as_bytes()],
            |row| row.get(0),
        )?)
    }
}
