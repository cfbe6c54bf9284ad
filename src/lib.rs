pub mod bridge;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod model;
pub mod output;
pub mod store;
