use anyhow::{bail, Result};
use rosa_lib::{
    identifiers::GroupIdentifier,
    messages::{Interaction, MessageState, OutgoingMessage, StoredPaymentMessage},
};

use super::ClientManager;

impl ClientManager {
    async fn ensure_known_group(&self, group_id: &GroupIdentifier) -> Result<()> {
        if self.group_manager.snapshot(group_id).await.is_none() {
            bail!("Unknown group {group_id}");
        }

        Ok(())
    }

    pub async fn store_outgoing_message(
        &self,
        group_id: &GroupIdentifier,
        message: OutgoingMessage,
    ) -> Result<i64> {
        self.ensure_known_group(group_id).await?;

        let db = self.sqlite_database.clone();
        let group_id = *group_id;
        Ok(self
            .database_queue
            .dispatch_async(move || db.add_outgoing_message(&group_id, &message))
            .await??)
    }

    /// Loads an outgoing message, upgrading (and re-storing) the delivery
    /// state of messages written by older versions.
    pub async fn outgoing_message(&self, id: i64) -> Result<OutgoingMessage> {
        let db = self.sqlite_database.clone();
        Ok(self
            .database_queue
            .dispatch_async(move || db.get_outgoing_message(id))
            .await??)
    }

    pub async fn outgoing_message_state(&self, id: i64) -> Result<MessageState> {
        Ok(self.outgoing_message(id).await?.message_state())
    }

    pub async fn update_outgoing_message(&self, id: i64, message: OutgoingMessage) -> Result<()> {
        let db = self.sqlite_database.clone();
        Ok(self
            .database_queue
            .dispatch_async(move || db.update_outgoing_message(id, &message))
            .await??)
    }

    pub async fn store_interaction(
        &self,
        group_id: &GroupIdentifier,
        interaction: Interaction,
    ) -> Result<i64> {
        self.ensure_known_group(group_id).await?;

        let db = self.sqlite_database.clone();
        let group_id = *group_id;
        Ok(self
            .database_queue
            .dispatch_async(move || db.add_interaction(&group_id, &interaction))
            .await??)
    }

    pub async fn mark_as_read(&self, id: i64) -> Result<()> {
        let db = self.sqlite_database.clone();
        Ok(self
            .database_queue
            .dispatch_async(move || db.mark_interaction_as_read(id))
            .await??)
    }

    pub async fn unread_count(&self, group_id: &GroupIdentifier) -> Result<u64> {
        let db = self.sqlite_database.clone();
        let group_id = *group_id;
        Ok(self
            .database_queue
            .dispatch_async(move || db.unread_count(&group_id))
            .await??)
    }

    pub async fn store_payment_message(
        &self,
        group_id: &GroupIdentifier,
        message: StoredPaymentMessage,
    ) -> Result<i64> {
        self.ensure_known_group(group_id).await?;

        let db = self.sqlite_database.clone();
        let group_id = *group_id;
        Ok(self
            .database_queue
            .dispatch_async(move || db.add_payment_message(&group_id, &message))
            .await??)
    }

    pub async fn payment_messages(
        &self,
        group_id: &GroupIdentifier,
    ) -> Result<Vec<StoredPaymentMessage>> {
        let db = self.sqlite_database.clone();
        let group_id = *group_id;
        Ok(self
            .database_queue
            .dispatch_async(move || db.get_payment_messages(&group_id))
            .await??)
    }
}
