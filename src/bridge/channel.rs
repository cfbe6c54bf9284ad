use crate::bridge::readiness::Readiness;
use crate::bridge::ui_thread::UiThread;
use crate::model::TodoItem;

/// UI-side function that replaces the rendered list.
pub const GLOBAL_SET_DATA: &str = "globalSetData";

/// One-way host-to-UI channel carrying full list snapshots.
///
/// Never reports errors to the caller: failures are logged and dropped, and
/// there is no retry. Every push carries the entire list, so a lost or
/// reordered push is repaired by the next one.
#[derive(Debug, Clone)]
pub struct SyncChannel {
    ui: UiThread,
    readiness: Readiness,
}

impl SyncChannel {
    pub fn new(ui: UiThread, readiness: Readiness) -> Self {
        Self { ui, readiness }
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Send `items` to the UI's `globalSetData` entry point. Skipped until the
    /// UI is ready.
    pub async fn push(&self, items: &[TodoItem]) {
        if !self.readiness.is_ready() {
            tracing::debug!(count = items.len(), "UI not ready, push skipped");
            return;
        }
        let payload = match serde_json::to_value(items) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize task list");
                return;
            }
        };
        match self.ui.invoke(GLOBAL_SET_DATA, vec![payload]).await {
            Ok(()) => tracing::debug!(count = items.len(), "pushed task list to UI"),
            Err(e) => tracing::warn!(error = %e, code = e.code(), "push to UI failed"),
        }
    }

    /// Show a transient notification. Failures are logged only.
    pub async fn notify(&self, message: &str) {
        if let Err(e) = self.ui.show_toast(message).await {
            tracing::warn!(error = %e, toast = message, "notification failed");
        }
    }
}
