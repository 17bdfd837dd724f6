//! Common utilities shared between the library and the CLI

pub mod config;
pub mod env;
pub mod error;
pub mod logging;

pub use config::TestingConfig;
pub use env::HarnessEnv;
pub use error::{Error, Result};
