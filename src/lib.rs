pub mod client;
pub mod config;
pub mod dashboard;
pub mod derived;
pub mod error;
pub mod poller;
pub mod snapshot;

pub use config::Config;
pub use error::{AppError, Result};
