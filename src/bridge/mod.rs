pub mod channel;
pub mod command;
pub mod dispatcher;
pub mod readiness;
pub mod ui_thread;

pub use channel::{GLOBAL_SET_DATA, SyncChannel};
pub use command::{Command, Invocation, Toggle};
pub use dispatcher::Dispatcher;
pub use readiness::{ReadyStrategy, Readiness};
pub use ui_thread::{UiSurface, UiThread};
