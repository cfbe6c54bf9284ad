//! Line-oriented host: the UI runtime talks to us over a pair of byte streams.
//!
//! Each input line is one JSON [`Invocation`]. Each UI call the host makes is
//! written as one JSON [`Frame`] line. Commands are dispatched as independent
//! tasks, in the order they arrive but without waiting for one another.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

use crate::bridge::{Dispatcher, Invocation, UiSurface};
use crate::error::{BridgeError, Result};

/// One host-to-UI call on the output stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Invoke { function: String, args: Vec<Value> },
    Toast { message: String },
}

/// [`UiSurface`] that serializes every call as a [`Frame`] line on `W`.
pub struct LineSurface<W: Write> {
    out: W,
}

impl<W: Write> LineSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> UiSurface for LineSurface<W> {
    fn invoke(&mut self, function: &str, args: &[Value]) -> Result<()> {
        self.write_frame(&Frame::Invoke {
            function: function.to_string(),
            args: args.to_vec(),
        })
        .map_err(|e| BridgeError::Script(e.to_string()))
    }

    fn show_toast(&mut self, message: &str) -> Result<()> {
        self.write_frame(&Frame::Toast {
            message: message.to_string(),
        })
    }
}

/// Read invocations until EOF, then wait for in-flight commands.
///
/// Lines that are not UTF-8 or not an [`Invocation`] are logged and skipped.
/// A read error ends the loop, but commands already dispatched still finish
/// before it is returned.
pub async fn serve<R>(dispatcher: Dispatcher, mut input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let startup = dispatcher.surface_loaded();
    let mut in_flight = JoinSet::new();
    let mut buf = Vec::new();
    let mut received = 0usize;

    let outcome = loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(BridgeError::from(e)),
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring UI message that is not UTF-8");
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Invocation>(line) {
            Ok(invocation) => {
                received += 1;
                tracing::debug!(method = %invocation.method, "UI call received");
                let dispatcher = dispatcher.clone();
                in_flight.spawn(async move { dispatcher.invoke(invocation).await });
            }
            Err(e) => tracing::warn!(error = %e, "ignoring undecodable UI message"),
        }
        while in_flight.try_join_next().is_some() {}
    };

    while in_flight.join_next().await.is_some() {}
    if let Some(startup) = startup {
        let _ = startup.await;
    }
    match &outcome {
        Ok(()) => tracing::info!(received, "UI input closed"),
        Err(e) => tracing::error!(received, error = %e, "reading UI input failed"),
    }
    outcome
}
