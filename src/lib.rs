pub mod app;
pub mod audio;
pub mod client;
pub mod commands;
pub mod error;
pub mod logging;
pub mod server;

pub use app::{ServerOptions, run_server};
pub use error::AppError;
