//! Durability Module
//!
//! Append-only command log: buffered appends, periodic flushing, replay at
//! startup and compaction.

mod codec;
mod log;
mod record;

pub use codec::{LogCodec, CODEC_VERSION};
pub use log::{AppendLog, ReplayReport};
pub use record::LogRecord;
