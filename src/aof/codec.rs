//! Log Codec Module
//!
//! Turns keys and values into whitespace-free tokens for the log file and back.
//! Strings are percent-escaped: `%` and every whitespace character are
//! written as the hex of their UTF-8 bytes.
//!
//! The token format is versioned by [`CODEC_VERSION`]; files written with
//! another version are refused at replay.

use std::fmt::Write;

/// Version written in the `VERSION` header of every log file.
pub const CODEC_VERSION: u32 = 1;

/// Token used for the empty string, which would otherwise vanish between separators.
const EMPTY_TOKEN: &str = "%e";

// == Log Codec ==
/// Encoding of a key or value as a single log token.
///
/// `encode` must never produce whitespace or an empty string, and
/// `decode(encode(x))` must yield `x`.
pub trait LogCodec: Sized {
    fn encode(&self) -> String;
    fn decode(token: &str) -> Result<Self, String>;
}

impl LogCodec for String {
    fn encode(&self) -> String {
        if self.is_empty() {
            return EMPTY_TOKEN.to_string();
        }
        let mut out = String::with_capacity(self.len());
        for c in self.chars() {
            if c == '%' || c.is_whitespace() {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    let _ = write!(out, "%{:02X}", byte);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    fn decode(token: &str) -> Result<Self, String> {
        if token == EMPTY_TOKEN {
            return Ok(String::new());
        }
        let bytes = token.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'%' {
                out.push(bytes[i]);
                i += 1;
                continue;
            }
            let hex = token
                .get(i + 1..i + 3)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(|| format!("invalid escape sequence at byte {}", i))?;
            out.push(u8::from_str_radix(hex, 16).map_err(|e| e.to_string())?);
            i += 3;
        }
        String::from_utf8(out).map_err(|e| format!("escaped bytes are not UTF-8: {}", e))
    }
}

macro_rules! impl_integer_codec {
    ($($ty:ty),*) => {
        $(
            impl LogCodec for $ty {
                fn encode(&self) -> String {
                    self.to_string()
                }

                fn decode(token: &str) -> Result<Self, String> {
                    token
                        .parse()
                        .map_err(|e| format!("invalid {} '{}': {}", stringify!($ty), token, e))
                }
            }
        )*
    };
}

impl_integer_codec!(i32, i64, u32, u64, usize);
