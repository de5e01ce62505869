//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only speaks the `log`
//! facade; `env_logger` is wired in once by the host.

mod init;

pub use init::{init_logging, LoggingConfig};
