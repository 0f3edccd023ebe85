//! # Observability
//!
//! Structured logging for the FEC blocks. The codec itself only emits
//! `tracing` events and spans; installing a subscriber is left to the
//! application, through [`init_logging`] or its own setup.
//!
//! ```rust,ignore
//! use r4w_fec::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development());
//! tracing::info!(bits = 1024, "decoder ready");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
