//! Generation history log.
//!
//! Completed generations are appended to a single JSON document on disk by
//! one background [`HistoryWriter`]. Request handlers enqueue entries through
//! a cloneable [`HistoryRecorder`] and never wait on disk I/O.

pub mod entry;
pub mod store;
pub mod writer;

pub use entry::{HistoryDocument, HistoryEntry};
pub use store::{HistoryError, HistoryStore};
pub use writer::{HistoryRecorder, HistoryWriter};
