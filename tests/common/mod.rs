#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use todo_bridge::bridge::{Dispatcher, GLOBAL_SET_DATA, ReadyStrategy, UiSurface, UiThread};
use todo_bridge::error::{BridgeError, Result};
use todo_bridge::host::Frame;
use todo_bridge::model::TodoItem;
use todo_bridge::store::StoreHandle;

/// UI surface that records every call instead of rendering it.
struct RecordingSurface {
    frames: Arc<Mutex<Vec<Frame>>>,
    entry_defined: Arc<AtomicBool>,
}

impl UiSurface for RecordingSurface {
    fn invoke(&mut self, function: &str, args: &[Value]) -> Result<()> {
        if !self.entry_defined.load(Ordering::SeqCst) {
            return Err(BridgeError::EntryPointMissing(function.to_string()));
        }
        self.frames.lock().unwrap().push(Frame::Invoke {
            function: function.to_string(),
            args: args.to_vec(),
        });
        Ok(())
    }

    fn show_toast(&mut self, message: &str) -> Result<()> {
        self.frames.lock().unwrap().push(Frame::Toast {
            message: message.to_string(),
        });
        Ok(())
    }
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    frames: Arc<Mutex<Vec<Frame>>>,
    entry_defined: Arc<AtomicBool>,
}

impl Harness {
    pub fn new(strategy: ReadyStrategy) -> Self {
        Self::with_store(StoreHandle::open_memory().unwrap(), strategy)
    }

    pub fn with_store(store: StoreHandle, strategy: ReadyStrategy) -> Self {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let entry_defined = Arc::new(AtomicBool::new(true));
        let ui = {
            let frames = frames.clone();
            let entry_defined = entry_defined.clone();
            UiThread::spawn(move || RecordingSurface {
                frames,
                entry_defined,
            })
        };
        Self {
            dispatcher: Dispatcher::new(store, ui, strategy),
            frames,
            entry_defined,
        }
    }

    /// Harness whose UI has already completed the handshake, with the
    /// handshake push discarded.
    pub async fn ready() -> Self {
        let harness = Self::new(ReadyStrategy::Handshake);
        harness.call("GetTodoItems", vec![]).await;
        harness.clear();
        harness
    }

    pub async fn call(&self, method: &str, params: Vec<Value>) {
        self.dispatcher
            .invoke(todo_bridge::bridge::Invocation::new(method, params))
            .await;
    }

    pub fn set_entry_defined(&self, defined: bool) {
        self.entry_defined.store(defined, Ordering::SeqCst);
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap().clear();
    }

    /// Every `globalSetData` payload, oldest first.
    pub fn pushes(&self) -> Vec<Vec<TodoItem>> {
        self.frames()
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Invoke { function, args } if function == GLOBAL_SET_DATA => {
                    assert_eq!(args.len(), 1, "globalSetData takes exactly one argument");
                    Some(serde_json::from_value(args[0].clone()).unwrap())
                }
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<String> {
        self.frames()
            .into_iter()
            .filter_map(|frame| match frame {
                Frame::Toast { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// The single push the last command produced.
    pub fn only_push(&self) -> Vec<TodoItem> {
        let mut pushes = self.pushes();
        assert_eq!(pushes.len(), 1, "expected exactly one push, got {pushes:?}");
        pushes.remove(0)
    }
}
