//! DAFSA Word List Compiler
//!
//! This crate compiles gperf-style word lists into the byte graphs read by
//! `dafsa-core`.

pub mod builder;
pub mod emit;
pub mod parser;

pub use builder::{build_dafsa, BuildError, DafsaBuilder};
pub use emit::emit_rust_source;
pub use parser::{parse_word_list, ParseError, WordEntry};
