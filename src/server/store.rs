//! Task persistence for the request handler

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::protocol::{error::A2AError, Task};

/// Storage for task snapshots
///
/// The handler saves every state change before answering, so `get` always returns
/// the last state a client could have observed.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    /// Saves or replaces a task snapshot
    async fn save(&self, task: &Task) -> Result<(), A2AError>;

    /// Retrieves a task snapshot by ID
    async fn get(&self, task_id: &str) -> Result<Option<Task>, A2AError>;
}

/// In-memory implementation of [`TaskStore`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks held
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, task: &Task) -> Result<(), A2AError> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn get(&self, task_id: &str) -> Result<Option<Task>, A2AError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(task_id).cloned())
    }
}
