//! PolicyScope Core — error taxonomy and engine configuration.

pub mod config;
pub mod error;

pub use config::EngineConfig;
pub use error::{Error, Result};
