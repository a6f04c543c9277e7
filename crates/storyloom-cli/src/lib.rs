//! Storyloom — terminal host.
//!
//! Plays a story over any line-based reader and writer: stdin and stdout in
//! the binary, in-memory buffers in tests.

pub mod config;
pub mod error;
pub mod terminal;
