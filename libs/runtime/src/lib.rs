//! Process-level plumbing shared by the server binary: layered configuration,
//! logging initialization and shutdown signals.

pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{AppConfig, CliArgs, LoggingConfig, Section, ServerConfig};
pub use logging::init_logging_from_config;
pub use shutdown::wait_for_shutdown;
