//! Structured logging for page effects.
//!
//! Effects log through `tracing` macros. This module turns those events
//! into one JSON line each and hands them to a [`LogSink`]: the browser
//! console on the web, a [`MemorySink`] in tests.
//!
//! ## Usage
//!
//! ```ignore
//! use folio_core::logging::{LoggingBuilder, MemorySink};
//!
//! let sink = MemorySink::new();
//! LoggingBuilder::new().with_filter("folio_core=debug").init(sink.clone())?;
//!
//! tracing::info!(skill_bars = 4, "page effects wired");
//! assert_eq!(sink.entries()[0].level, "info");
//! ```

pub mod entry;
pub mod layer;
pub mod sink;

pub use entry::LogEntry;
pub use layer::{ConsoleLayer, LoggingBuilder};
pub use sink::{LogSink, MemorySink};
