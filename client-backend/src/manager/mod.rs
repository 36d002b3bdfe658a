pub mod groups;
pub mod messages;
pub mod queue;

use std::{fmt::Debug, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};

use crate::{database::Database, ui::GroupUi};

use self::{groups::GroupManager, queue::SerialQueue};

/// Folder created under the platform data directory.
pub const DATA_FOLDER_NAME: &str = "rosa";

pub struct ClientManager {
    /// Group snapshots, backed by `sqlite_database`
    pub group_manager: GroupManager,

    /// Serialises database writes
    pub database_queue: Arc<SerialQueue>,

    pub sqlite_database: Database,
}

impl Debug for ClientManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientManager")
            .field("groups", &self.group_manager.registry().len())
            .field("in_memory", &self.sqlite_database.is_in_memory())
            .finish()
    }
}

impl ClientManager {
    /// If `root_data_folder` is Some(path), then the client manager
    /// will create the necessary folders and database files at that location.
    /// Otherwise it will create an in-memory version.
    pub async fn initialise_params(root_data_folder: Option<PathBuf>) -> Result<Arc<Self>> {
        log::info!("Initialising: Loading database...");

        let sqlite_database = Database::new(root_data_folder)?;
        let database_queue = Arc::new(SerialQueue::new("rosa-database")?);

        let group_manager = GroupManager::init(sqlite_database.clone(), database_queue.clone())
            .await
            .context("Loading groups")?;

        log::info!("Initialising: done");

        Ok(Arc::new(Self {
            group_manager,
            database_queue,
            sqlite_database,
        }))
    }

    /// Opens the database in the platform data directory.
    pub async fn initialise() -> Result<Arc<Self>> {
        let folder = dirs::data_dir()
            .context("This platform has no data directory")?
            .join(DATA_FOLDER_NAME);

        Self::initialise_params(Some(folder)).await
    }

    pub async fn initialise_in_memory() -> Result<Arc<Self>> {
        Self::initialise_params(None).await
    }

    /// One summary per known group. `placeholder` names unnamed groups.
    pub async fn group_summaries(&self, placeholder: &str) -> Result<Vec<GroupUi>> {
        let mut summaries = Vec::with_capacity(self.group_manager.registry().len());

        for group in self.group_manager.registry().all().await {
            let unread_count = self.unread_count(group.group_id()).await?;
            summaries.push(GroupUi::from_snapshot(&group, placeholder, unread_count));
        }

        Ok(summaries)
    }
}
