//! Routes UI commands to the store and pushes the refreshed list back.
//!
//! Every mutation is followed by a full re-read and a full push; the UI never
//! reconciles partial updates. UI calls are fire-and-forget, so failures stop
//! at this boundary: they are logged and the UI simply sees no change.

use tokio::task::JoinHandle;

use crate::bridge::channel::SyncChannel;
use crate::bridge::command::{Command, Invocation, Toggle};
use crate::bridge::readiness::{ReadyStrategy, Readiness};
use crate::bridge::ui_thread::UiThread;
use crate::error::Result;
use crate::store::StoreHandle;

pub const TASK_ADDED: &str = "Todo added successfully!";
pub const TASK_DELETED: &str = "Item deleted";
pub const COMPLETED_CLEARED: &str = "Completed todos cleared!";

#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: StoreHandle,
    channel: SyncChannel,
    strategy: ReadyStrategy,
}

impl Dispatcher {
    pub fn new(store: StoreHandle, ui: UiThread, strategy: ReadyStrategy) -> Self {
        Self {
            store,
            channel: SyncChannel::new(ui, Readiness::new()),
            strategy,
        }
    }

    pub fn readiness(&self) -> &Readiness {
        self.channel.readiness()
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Handle one raw UI call. Never fails; problems are logged.
    pub async fn invoke(&self, invocation: Invocation) {
        match Command::decode(&invocation) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                tracing::warn!(
                    method = %invocation.method,
                    error = %e,
                    code = e.code(),
                    "rejected UI call"
                );
            }
        }
    }

    /// Run a decoded command to completion, logging instead of returning errors.
    pub async fn dispatch(&self, command: Command) {
        let name = command.name();
        tracing::debug!(command = name, "dispatching");
        if let Err(e) = self.execute(command).await {
            tracing::warn!(command = name, error = %e, code = e.code(), "command failed");
        }
    }

    async fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::FetchAll => {
                // A pull is proof the UI's entry points exist.
                if self.readiness().mark_ready() {
                    tracing::info!("UI signalled ready");
                }
                self.refresh().await?;
            }
            Command::AddTask(draft) => {
                let inserted = self.store.insert(draft).await?;
                tracing::info!(id = inserted.id, "task added");
                self.refresh().await?;
                self.channel.notify(TASK_ADDED).await;
            }
            Command::RemoveById(id) => {
                let rows = self.store.delete_by_id(id).await?;
                tracing::info!(id, rows, "task removed");
                self.refresh().await?;
                self.channel.notify(TASK_DELETED).await;
            }
            Command::UpdateTask(item) => {
                let id = item.id;
                let rows = self.store.update_fields(item).await?;
                tracing::info!(id, rows, "task updated");
                self.refresh().await?;
            }
            Command::ToggleCompleted(Toggle::Flip(id)) => {
                let rows = self.store.toggle_completed(id).await?;
                tracing::info!(id, rows, "task completion toggled");
                self.refresh().await?;
            }
            Command::ToggleCompleted(Toggle::Overwrite(item)) => {
                let id = item.id;
                let rows = self.store.update_fields(item).await?;
                tracing::info!(id, rows, "task completion set");
                self.refresh().await?;
            }
            Command::ClearCompleted => {
                let rows = self.store.delete_where_completed().await?;
                tracing::info!(rows, "completed tasks cleared");
                self.refresh().await?;
                self.channel.notify(COMPLETED_CLEARED).await;
            }
            Command::ClearAll => {
                let rows = self.store.delete_all().await?;
                tracing::info!(rows, "all tasks cleared");
                self.refresh().await?;
            }
        }
        Ok(())
    }

    /// Re-read the whole table and push it. Only the read can fail; push
    /// problems are absorbed by the channel.
    async fn refresh(&self) -> Result<()> {
        let items = self.store.list_all().await?;
        self.channel.push(&items).await;
        Ok(())
    }

    /// The host-side surface finished loading.
    ///
    /// Under [`ReadyStrategy::Delay`] this starts the timer for the first
    /// push. If the UI has already pulled state by the time it fires, the
    /// timed push is skipped. Returns `None` under
    /// [`ReadyStrategy::Handshake`], where the UI drives the first fetch.
    pub fn surface_loaded(&self) -> Option<JoinHandle<()>> {
        let ReadyStrategy::Delay(delay) = self.strategy else {
            tracing::debug!("waiting for UI handshake");
            return None;
        };
        let this = self.clone();
        Some(tokio::spawn(async move {
            tracing::debug!(?delay, "waiting before first push");
            tokio::time::sleep(delay).await;
            if !this.readiness().mark_ready() {
                return;
            }
            tracing::info!("startup delay elapsed, sending initial data");
            if let Err(e) = this.refresh().await {
                tracing::warn!(error = %e, code = e.code(), "initial push failed");
            }
        }))
    }
}
