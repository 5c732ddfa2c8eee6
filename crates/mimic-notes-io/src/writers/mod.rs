//! Streaming writers.

pub mod jsonl;

pub use jsonl::JsonlWriter;
