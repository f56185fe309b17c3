//! Logger setup for hosts.
//!
//! Engine code logs through the `log` facade only. Per-frame paths stay at
//! `trace`, state changes (logo swaps, resizes) at `debug` and `info`.

mod init;

pub use init::{init_logging, LoggingConfig};
