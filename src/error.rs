use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("todo store is locked by another process: {0}")]
    Locked(String),

    #[error("todo store executor has shut down")]
    StoreGone,

    #[error("malformed argument for {0}: {1}")]
    MalformedArgument(String, String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("UI entry point '{0}' is not defined")]
    EntryPointMissing(String),

    #[error("UI script failed: {0}")]
    Script(String),

    #[error("UI thread has shut down")]
    UiGone,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl BridgeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Locked(_) => "locked",
            Self::StoreGone => "store_gone",
            Self::MalformedArgument(_, _) => "malformed_argument",
            Self::UnknownCommand(_) => "unknown_command",
            Self::EntryPointMissing(_) => "entry_point_missing",
            Self::Script(_) => "script_error",
            Self::UiGone => "ui_gone",
            Self::Config(_) => "invalid_config",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Yaml(_) => "yaml_error",
            Self::Db(_) => "db_error",
        }
    }

    pub(crate) fn malformed(command: &str, detail: impl Into<String>) -> Self {
        Self::MalformedArgument(command.to_string(), detail.into())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
