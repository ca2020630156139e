//! Configuration loading for tripwire.
//!
//! The config file maps project names to their deployment properties and
//! carries the logging settings used by the binary.

mod parser;
mod paths;
mod schema;
mod store;

pub use parser::{ConfigFormat, parse_config_file, parse_config_str};
pub use paths::{CONFIG_ENV_VAR, default_config_path, resolve_config_path, resolve_config_path_with};
pub use schema::{LoggingConfig, ProjectProperties, TripwireConfig};
pub use store::ConfigStore;
