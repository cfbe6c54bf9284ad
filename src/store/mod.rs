pub mod handle;
pub mod lock;
pub mod todo_db;

pub use handle::StoreHandle;
pub use todo_db::{Inserted, TodoDb};
