//! Decoding of UI invocations into canonical [`Command`] values.
//!
//! The UI has shipped with two calling conventions for removal, update and
//! toggle: primitive arguments (`RemoveTodoById(5)`) and whole records
//! (`RemoveTodo({...})`). Both collapse into the same `Command` here, so the
//! dispatcher never looks at wire shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::model::{TodoDraft, TodoId, TodoItem};

pub const GET_TODO_ITEMS: &str = "GetTodoItems";
pub const ADD_TODO: &str = "AddTodo";
pub const REMOVE_TODO_BY_ID: &str = "RemoveTodoById";
pub const REMOVE_TODO: &str = "RemoveTodo";
pub const UPDATE_DESC: &str = "UpdateDesc";
pub const TOGGLE_COMPLETE: &str = "ToggleComplete";
pub const CLEAR_COMPLETED: &str = "ClearCompleted";
pub const CLEAR_ALL: &str = "ClearAll";

/// One UI-to-host call as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    #[serde(alias = "MethodName")]
    pub method: String,
    #[serde(default, alias = "ParamValues")]
    pub params: Vec<Value>,
}

impl Invocation {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// How a toggle request identifies its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// Invert the stored flag of this id.
    Flip(TodoId),
    /// The caller already computed the new state; write the record as given.
    Overwrite(TodoItem),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchAll,
    AddTask(TodoDraft),
    RemoveById(TodoId),
    UpdateTask(TodoItem),
    ToggleCompleted(Toggle),
    ClearCompleted,
    ClearAll,
}

impl Command {
    pub fn decode(invocation: &Invocation) -> Result<Self> {
        let method = invocation.method.as_str();
        let params = invocation.params.as_slice();
        match method {
            GET_TODO_ITEMS => Ok(Self::FetchAll),
            ADD_TODO => Ok(Self::AddTask(decode_record(method, arg(method, params, 0)?)?)),
            REMOVE_TODO_BY_ID | REMOVE_TODO => {
                let id = match decode_id_or_record(method, arg(method, params, 0)?)? {
                    IdOrRecord::Id(id) => id,
                    IdOrRecord::Record(item) => item.id,
                };
                Ok(Self::RemoveById(id))
            }
            UPDATE_DESC => decode_update(method, params).map(Self::UpdateTask),
            TOGGLE_COMPLETE => {
                let toggle = match decode_id_or_record(method, arg(method, params, 0)?)? {
                    IdOrRecord::Id(id) => Toggle::Flip(id),
                    IdOrRecord::Record(item) => Toggle::Overwrite(item),
                };
                Ok(Self::ToggleCompleted(toggle))
            }
            CLEAR_COMPLETED => Ok(Self::ClearCompleted),
            CLEAR_ALL => Ok(Self::ClearAll),
            other => Err(BridgeError::UnknownCommand(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchAll => "fetchAll",
            Self::AddTask(_) => "addTask",
            Self::RemoveById(_) => "removeById",
            Self::UpdateTask(_) => "updateTask",
            Self::ToggleCompleted(_) => "toggleCompleted",
            Self::ClearCompleted => "clearCompleted",
            Self::ClearAll => "clearAll",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::FetchAll)
    }
}

enum IdOrRecord {
    Id(TodoId),
    Record(TodoItem),
}

fn arg<'a>(method: &str, params: &'a [Value], index: usize) -> Result<&'a Value> {
    params
        .get(index)
        .ok_or_else(|| BridgeError::malformed(method, format!("missing argument {index}")))
}

fn decode_id_or_record(method: &str, value: &Value) -> Result<IdOrRecord> {
    match value {
        Value::Number(_) => decode_id(method, value).map(IdOrRecord::Id),
        Value::String(s) => match s.trim().parse::<TodoId>() {
            Ok(id) => Ok(IdOrRecord::Id(id)),
            // HybridWebView passes records as JSON text.
            Err(_) if s.trim_start().starts_with('{') => {
                decode_record(method, value).map(IdOrRecord::Record)
            }
            Err(_) => Err(BridgeError::malformed(
                method,
                format!("'{s}' is not a task id"),
            )),
        },
        Value::Object(_) => decode_record(method, value).map(IdOrRecord::Record),
        other => Err(BridgeError::malformed(
            method,
            format!("expected a task id or record, got {other}"),
        )),
    }
}

fn decode_id(method: &str, value: &Value) -> Result<TodoId> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| BridgeError::malformed(method, format!("{n} is not an integer id"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| BridgeError::malformed(method, format!("'{s}' is not a task id"))),
        other => Err(BridgeError::malformed(
            method,
            format!("expected a task id, got {other}"),
        )),
    }
}

fn decode_record<T: DeserializeOwned>(method: &str, value: &Value) -> Result<T> {
    let decoded = match value {
        Value::String(s) => serde_json::from_str(s),
        other => T::deserialize(other),
    };
    decoded.map_err(|e| BridgeError::malformed(method, e.to_string()))
}

/// `UpdateDesc(id, title, description, isCompleted)` or `UpdateDesc(record)`.
fn decode_update(method: &str, params: &[Value]) -> Result<TodoItem> {
    if params.len() == 1 {
        return match decode_id_or_record(method, &params[0])? {
            IdOrRecord::Record(item) => Ok(item),
            IdOrRecord::Id(_) => Err(BridgeError::malformed(
                method,
                "expected a record or four arguments",
            )),
        };
    }
    Ok(TodoItem {
        id: decode_id(method, arg(method, params, 0)?)?,
        title: decode_text(method, arg(method, params, 1)?)?,
        description: decode_text(method, arg(method, params, 2)?)?,
        is_completed: decode_flag(method, arg(method, params, 3)?)?,
    })
}

/// HybridWebView JSON-encodes every parameter, so text arrives quoted.
fn decode_text(method: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(serde_json::from_str::<String>(s).unwrap_or_else(|_| s.clone())),
        Value::Null => Ok(String::new()),
        other => Err(BridgeError::malformed(
            method,
            format!("expected text, got {other}"),
        )),
    }
}

fn decode_flag(method: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(BridgeError::malformed(
            method,
            format!("expected a boolean, got {other}"),
        )),
    }
}
