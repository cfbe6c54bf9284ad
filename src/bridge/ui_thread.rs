//! The designated UI thread and the surface it owns.
//!
//! Embedded UI runtimes only accept calls from the thread that created them,
//! so the [`UiSurface`] is constructed on a dedicated thread and never leaves
//! it. [`UiThread`] marshals calls onto that thread from any async context.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::error::{BridgeError, Result};

/// The UI layer as seen from the host: a script runtime that exposes named
/// entry points, plus native transient notifications.
pub trait UiSurface {
    /// Call a function defined by the UI runtime with JSON arguments.
    ///
    /// Fails with [`BridgeError::EntryPointMissing`] when the UI has not
    /// defined `function` yet, or [`BridgeError::Script`] when it throws.
    fn invoke(&mut self, function: &str, args: &[Value]) -> Result<()>;

    /// Show a short-lived notification.
    fn show_toast(&mut self, message: &str) -> Result<()>;
}

enum UiJob {
    Invoke {
        function: String,
        args: Vec<Value>,
        reply: oneshot::Sender<Result<()>>,
    },
    Toast {
        message: String,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Cloneable handle that runs calls on the UI thread.
#[derive(Debug, Clone)]
pub struct UiThread {
    sender: mpsc::UnboundedSender<UiJob>,
}

impl UiThread {
    /// Start the UI thread and build the surface on it.
    ///
    /// The thread runs until every handle is dropped.
    pub fn spawn<S, F>(factory: F) -> Self
    where
        F: FnOnce() -> S + Send + 'static,
        S: UiSurface + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<UiJob>();
        std::thread::spawn(move || {
            let mut surface = factory();
            while let Some(job) = rx.blocking_recv() {
                match job {
                    UiJob::Invoke {
                        function,
                        args,
                        reply,
                    } => {
                        let _ = reply.send(surface.invoke(&function, &args));
                    }
                    UiJob::Toast { message, reply } => {
                        let _ = reply.send(surface.show_toast(&message));
                    }
                }
            }
            tracing::debug!("UI thread stopped");
        });
        Self { sender: tx }
    }

    /// Invoke a UI entry point and wait until the UI thread has run it.
    pub async fn invoke(&self, function: &str, args: Vec<Value>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(UiJob::Invoke {
                function: function.to_string(),
                args,
                reply: tx,
            })
            .map_err(|_| BridgeError::UiGone)?;
        rx.await.map_err(|_| BridgeError::UiGone)?
    }

    pub async fn show_toast(&self, message: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(UiJob::Toast {
                message: message.to_string(),
                reply: tx,
            })
            .map_err(|_| BridgeError::UiGone)?;
        rx.await.map_err(|_| BridgeError::UiGone)?
    }
}

impl std::fmt::Debug for UiJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invoke { function, .. } => write!(f, "Invoke({function})"),
            Self::Toast { message, .. } => write!(f, "Toast({message})"),
        }
    }
}
