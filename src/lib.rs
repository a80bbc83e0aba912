pub mod config;
pub mod error;
pub mod formats;
pub mod handlers;
pub mod locations;
pub mod render;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
