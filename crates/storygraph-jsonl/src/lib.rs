//! Async JSONL (JSON Lines) reading and writing.
//!
//! This library provides buffered line-oriented readers and writers for
//! JSONL formatted data, plus atomic whole-file replacement for crash-safe
//! persistence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{JsonlReader, read_jsonl};
pub use writer::JsonlWriter;
