//! # Transcode - Streaming Character Encoding Conversion
//!
//! Converts byte buffers between character encodings by driving the system
//! `iconv(3)` primitive. The crate does not carry any conversion tables; it
//! manages the output buffer, the shift state of stateful encodings and the
//! classification of conversion failures.
//!
//! ## Features
//!
//! - **Exactly-sized output**: the buffer grows geometrically while
//!   converting and is trimmed to the bytes written
//! - **Stateful encodings**: trailing shift sequences (ISO-2022-JP, UTF-7, ...)
//!   are flushed at the end of every conversion
//! - **Classified errors**: incomplete and illegal input are reported with
//!   their position; no partial output is ever returned
//! - **Alias fixup** for names like `UTF8` or `UTF16LE`
//!
//! ## Quick Start
//!
//! ```no_run
//! use transcode::Converter;
//!
//! // (source, target)
//! let mut converter = Converter::new("UTF-8", "UTF-16LE").unwrap();
//! let output = converter.convert(b"Hi").unwrap();
//! assert_eq!(output, [0x48, 0x00, 0x69, 0x00]);
//! ```

#![deny(missing_docs)]

mod aliases;
mod config;
mod converter;
mod encoding;
mod engine;
mod error;
mod iconv;
mod primitive;

pub use crate::aliases::fix_encoding_name;
pub use crate::config::{ConverterConfig, DEFAULT_INITIAL_CAPACITY};
pub use crate::converter::Converter;
pub use crate::encoding::Encoding;
pub use crate::error::{Error, Result};
pub use crate::iconv::Iconv;
pub use crate::primitive::{Primitive, Progress, Signal};
