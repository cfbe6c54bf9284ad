//! Serialized executor that owns the single database connection.
//!
//! One dedicated thread holds the [`TodoDb`] and the file lock and processes
//! requests sequentially from a bounded channel. [`StoreHandle`] is the
//! cloneable async front end; every clone talks to the same thread, so
//! concurrent callers observe one consistent table and read-modify-write
//! operations such as toggling cannot interleave.

use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use crate::error::{BridgeError, Result};
use crate::model::{TodoDraft, TodoId, TodoItem};
use crate::store::lock::StoreLock;
use crate::store::todo_db::{Inserted, TodoDb};

const QUEUE_DEPTH: usize = 64;

type Reply<T> = oneshot::Sender<Result<T>>;

enum StoreRequest {
    ListAll {
        reply: Reply<Vec<TodoItem>>,
    },
    Insert {
        draft: TodoDraft,
        reply: Reply<Inserted>,
    },
    DeleteById {
        id: TodoId,
        reply: Reply<usize>,
    },
    UpdateFields {
        item: TodoItem,
        reply: Reply<usize>,
    },
    ToggleCompleted {
        id: TodoId,
        reply: Reply<usize>,
    },
    DeleteWhereCompleted {
        reply: Reply<usize>,
    },
    DeleteAll {
        reply: Reply<usize>,
    },
}

/// Async handle to the store executor.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    sender: mpsc::Sender<StoreRequest>,
}

impl std::fmt::Debug for StoreRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ListAll { .. } => "ListAll",
            Self::Insert { .. } => "Insert",
            Self::DeleteById { .. } => "DeleteById",
            Self::UpdateFields { .. } => "UpdateFields",
            Self::ToggleCompleted { .. } => "ToggleCompleted",
            Self::DeleteWhereCompleted { .. } => "DeleteWhereCompleted",
            Self::DeleteAll { .. } => "DeleteAll",
        };
        f.write_str(name)
    }
}

impl StoreHandle {
    /// Lock and open the database file, then start the executor thread.
    ///
    /// # Errors
    ///
    /// * [`BridgeError::Locked`] if another handle or process owns the file.
    /// * [`BridgeError::Db`] if the file cannot be opened or the table created.
    pub fn open(path: &Path) -> Result<Self> {
        let lock = StoreLock::acquire(path)?;
        let db = TodoDb::open(path)?;
        tracing::info!(path = %path.display(), "todo store opened");
        Ok(Self::spawn(db, Some(lock)))
    }

    /// Start an executor over an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        Ok(Self::spawn(TodoDb::open_memory()?, None))
    }

    fn spawn(db: TodoDb, lock: Option<StoreLock>) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        std::thread::spawn(move || run_executor(db, lock, rx));
        Self { sender: tx }
    }

    pub async fn list_all(&self) -> Result<Vec<TodoItem>> {
        self.request(|reply| StoreRequest::ListAll { reply }).await
    }

    pub async fn insert(&self, draft: TodoDraft) -> Result<Inserted> {
        self.request(|reply| StoreRequest::Insert { draft, reply })
            .await
    }

    pub async fn delete_by_id(&self, id: TodoId) -> Result<usize> {
        self.request(|reply| StoreRequest::DeleteById { id, reply })
            .await
    }

    /// Overwrite title, description and completion of the record `item.id`.
    pub async fn update_fields(&self, item: TodoItem) -> Result<usize> {
        self.request(|reply| StoreRequest::UpdateFields { item, reply })
            .await
    }

    pub async fn toggle_completed(&self, id: TodoId) -> Result<usize> {
        self.request(|reply| StoreRequest::ToggleCompleted { id, reply })
            .await
    }

    pub async fn delete_where_completed(&self) -> Result<usize> {
        self.request(|reply| StoreRequest::DeleteWhereCompleted { reply })
            .await
    }

    pub async fn delete_all(&self) -> Result<usize> {
        self.request(|reply| StoreRequest::DeleteAll { reply }).await
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> StoreRequest) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(make(tx))
            .await
            .map_err(|_| BridgeError::StoreGone)?;
        rx.await.map_err(|_| BridgeError::StoreGone)?
    }
}

/// Executor loop. Exits when every handle has been dropped; the connection
/// and the file lock go with it.
fn run_executor(db: TodoDb, lock: Option<StoreLock>, mut rx: mpsc::Receiver<StoreRequest>) {
    while let Some(request) = rx.blocking_recv() {
        tracing::trace!(?request, "store request");
        // A dropped receiver means the caller stopped waiting; nothing to do.
        match request {
            StoreRequest::ListAll { reply } => {
                let _ = reply.send(db.list_all());
            }
            StoreRequest::Insert { draft, reply } => {
                let _ = reply.send(db.insert(&draft));
            }
            StoreRequest::DeleteById { id, reply } => {
                let _ = reply.send(db.delete_by_id(id));
            }
            StoreRequest::UpdateFields { item, reply } => {
                let result =
                    db.update_fields(item.id, &item.title, &item.description, item.is_completed);
                let _ = reply.send(result);
            }
            StoreRequest::ToggleCompleted { id, reply } => {
                let _ = reply.send(db.toggle_completed(id));
            }
            StoreRequest::DeleteWhereCompleted { reply } => {
                let _ = reply.send(db.delete_where_completed());
            }
            StoreRequest::DeleteAll { reply } => {
                let _ = reply.send(db.delete_all());
            }
        }
    }
    drop(db);
    drop(lock);
    tracing::debug!("todo store executor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn operations_run_through_executor() {
        let store = StoreHandle::open_memory().unwrap();

        let inserted = store.insert(TodoDraft::new("Buy milk")).await.unwrap();
        assert_eq!(inserted.rows, 1);

        assert_eq!(store.toggle_completed(inserted.id).await.unwrap(), 1);
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_completed);

        assert_eq!(store.delete_where_completed().await.unwrap(), 1);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_are_serialized() {
        let store = StoreHandle::open_memory().unwrap();
        let id = store.insert(TodoDraft::new("flip")).await.unwrap().id;

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            tasks.push(tokio::spawn(
                async move { store.toggle_completed(id).await },
            ));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 1);
        }

        // An even number of flips lands back where it started.
        let all = store.list_all().await.unwrap();
        assert!(!all[0].is_completed);
    }

    #[tokio::test]
    async fn second_open_of_same_file_is_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.db");

        let first = StoreHandle::open(&path).unwrap();
        let err = StoreHandle::open(&path).unwrap_err();
        assert_eq!(err.code(), "locked");
        assert!(first.list_all().await.unwrap().is_empty());
    }
}
