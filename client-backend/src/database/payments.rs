use rosa_lib::{identifiers::GroupIdentifier, messages::StoredPaymentMessage};
use rusqlite::params;

use super::{not_found, Database, DatabaseError};

impl Database {
    pub fn add_payment_message(
        &self,
        group_id: &GroupIdentifier,
        message: &StoredPaymentMessage,
    ) -> Result<i64, DatabaseError> {
        let conn = self.get_connection();
        conn.execute(
            "INSERT INTO payments (id, group_id, record) VALUES (NULL, ?1, ?2)",
            params![group_id.as_bytes(), message.encode()],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn get_payment_message(&self, id: i64) -> Result<StoredPaymentMessage, DatabaseError> {
        let record: Vec<u8> = self
            .get_connection()
            .query_row(
                "SELECT record FROM payments WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .map_err(not_found)?;

        Ok(StoredPaymentMessage::decode(&record)?)
    }

    /// Payment messages of a group, oldest first.
    pub fn get_payment_messages(
        &self,
        group_id: &GroupIdentifier,
    ) -> Result<Vec<StoredPaymentMessage>, DatabaseError> {
        let conn = self.get_connection();
        let mut statement =
            conn.prepare("SELECT record FROM payments WHERE group_id = ? ORDER BY id")?;
        let records = statement
            .query_map(params![group_id.as_bytes()], |row| row.get::<_, Vec<u8>>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        records
            .iter()
            .map(|record| StoredPaymentMessage::decode(record).map_err(DatabaseError::from))
            .collect()
    }
}
