use crate::db::models::Task;
use crate::db::operations::DbOperations;
use crate::error::{AppError, DatabaseError, SyncError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A todo as the external API ships it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTodo {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// One page of stored tasks.
#[derive(Debug, Serialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

/// Stored tasks grouped by completion status.
#[derive(Debug, Serialize)]
pub struct GroupedTasks {
    pub completed: Vec<Task>,
    pub pending: Vec<Task>,
}

/// Task store operations plus the external-API sync job.
#[derive(Clone)]
pub struct TaskService {
    db: DbOperations,
    client: reqwest::Client,
    todo_api_url: String,
}

impl TaskService {
    pub fn new(db: DbOperations, todo_api_url: String) -> Self {
        Self {
            db,
            client: reqwest::Client::new(),
            todo_api_url,
        }
    }

    /// Fetch todos from the external API without touching the store.
    pub async fn fetch_remote(&self) -> Result<Vec<RemoteTodo>, AppError> {
        let response = self.client.get(&self.todo_api_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("External todo API returned {}", status);
            return Err(SyncError::Upstream(status.to_string()).into());
        }

        let todos = response.json::<Vec<RemoteTodo>>().await?;
        info!("Fetched {} todos from external API", todos.len());
        Ok(todos)
    }

    /// Fetch todos and upsert them into the store. Returns the stored count.
    pub async fn fetch_and_store(&self) -> Result<u64, AppError> {
        let todos = self.fetch_remote().await?;

        let mut stored = 0u64;
        for todo in &todos {
            self.db
                .upsert_task(todo.id, todo.user_id, &todo.title, todo.completed)
                .await?;
            stored += 1;
        }

        info!("Stored {} tasks from external API", stored);
        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<Task>, AppError> {
        self.db.list_tasks().await
    }

    pub async fn get(&self, id: i64) -> Result<Task, AppError> {
        self.db
            .get_task(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound.into())
    }

    pub async fn update(&self, id: i64, title: &str, completed: bool) -> Result<Task, AppError> {
        self.db
            .update_task(id, title, completed)
            .await?
            .ok_or_else(|| DatabaseError::NotFound.into())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.db.task_exists(id).await? {
            return Err(DatabaseError::NotFound.into());
        }
        self.db.delete_task(id).await?;
        info!("Deleted task {}", id);
        Ok(())
    }

    pub async fn page(&self, page: i64, size: i64) -> Result<TaskPage, AppError> {
        let size = size.max(1);
        let page = page.max(0);

        let total_elements = self.db.count_tasks().await?;
        let items = self.db.page_tasks(size, page * size).await?;
        let total_pages = (total_elements + size - 1) / size;

        Ok(TaskPage {
            items,
            page,
            size,
            total_elements,
            total_pages,
        })
    }

    pub async fn grouped(&self) -> Result<GroupedTasks, AppError> {
        let (completed, pending) = self
            .db
            .list_tasks()
            .await?
            .into_iter()
            .partition(|task| task.completed);

        Ok(GroupedTasks { completed, pending })
    }
}
