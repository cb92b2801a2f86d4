//! Log Record Module
//!
//! One line per durability event:
//!
//! ```text
//! VERSION <n>
//! PUT <key> <value>
//! PUT <key> <value> TTL <absolute_deadline_epoch_ms>
//! REMOVE <key>
//! ```

use crate::aof::codec::{LogCodec, CODEC_VERSION};
use crate::cache::Expiry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord<K, V> {
    /// File header naming the codec version
    Version(u32),
    Put { key: K, value: V, expiry: Expiry },
    Remove { key: K },
}

impl<K: LogCodec, V: LogCodec> LogRecord<K, V> {
    /// Header line for the current codec.
    pub fn header() -> Self {
        LogRecord::Version(CODEC_VERSION)
    }

    // == Format ==
    pub fn to_line(&self) -> String {
        match self {
            LogRecord::Version(version) => format!("VERSION {}", version),
            LogRecord::Put {
                key,
                value,
                expiry: Expiry::Never,
            } => format!("PUT {} {}", key.encode(), value.encode()),
            LogRecord::Put {
                key,
                value,
                expiry: Expiry::At(deadline),
            } => format!("PUT {} {} TTL {}", key.encode(), value.encode(), deadline),
            LogRecord::Remove { key } => format!("REMOVE {}", key.encode()),
        }
    }

    // == Parse ==
    /// Parses one line. The error names what is wrong with it.
    pub fn parse(line: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["VERSION", version] => version
                .parse()
                .map(LogRecord::Version)
                .map_err(|e| format!("invalid version '{}': {}", version, e)),
            ["PUT", key, value] => Ok(LogRecord::Put {
                key: K::decode(key)?,
                value: V::decode(value)?,
                expiry: Expiry::Never,
            }),
            ["PUT", key, value, "TTL", deadline] => Ok(LogRecord::Put {
                key: K::decode(key)?,
                value: V::decode(value)?,
                expiry: Expiry::At(
                    deadline
                        .parse()
                        .map_err(|e| format!("invalid deadline '{}': {}", deadline, e))?,
                ),
            }),
            ["REMOVE", key] => Ok(LogRecord::Remove {
                key: K::decode(key)?,
            }),
            ["PUT" | "REMOVE" | "VERSION", ..] => {
                Err(format!("wrong number of fields ({})", tokens.len()))
            }
            [command, ..] => Err(format!("unknown command '{}'", command)),
            [] => Err("empty line".to_string()),
        }
    }
}
