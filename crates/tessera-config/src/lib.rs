//! Configuration for the Tessera tools.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line via clap. Every section defaults independently, so older files keep
//! loading as fields are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DataConfig, DebugConfig, IndexConfig, default_config_dir};
pub use error::ConfigError;
