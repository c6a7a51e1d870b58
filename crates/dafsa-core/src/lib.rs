//! Fixed-set DAFSA lookup engine
//!
//! This crate answers membership, longest-prefix and longest-suffix queries
//! against a fixed set of ASCII strings compiled ahead of time into a
//! DAFSA (Deterministic Acyclic Finite State Automaton) byte graph.
//!
//! # Architecture
//!
//! The graph is an immutable byte buffer in the `make_dafsa` encoding. It is
//! never materialized into nodes; the decoder interprets positions on demand
//! and the lookup cursor is a small `Copy` value, so queries allocate nothing
//! and cursors can be snapshotted and restored at any point.
//!
//! # Modules
//!
//! - `format`: byte encoding constants shared with the compiler
//! - `view`: bounds-checked read position over the graph bytes
//! - `node`: label-run and branch-node decoding
//! - `cursor`: incremental, copyable lookup cursor
//! - `graph`: validated graph handle and corruption errors
//! - `lookup`: whole-string, reversed-suffix and prefix queries
//! - `types`: result codes and match types
//!
//! # Example
//!
//! ```
//! use dafsa_core::{Dafsa, MatchResult, RuleFlags};
//!
//! // {"a" => 0, "aa" => 1, "bc" => 2}
//! let bytes = [0x02, 0x86, 0xE1, 0x02, 0x82, 0x61, 0x81, 0x80, 0x62, 0x63, 0x82];
//! let dafsa = Dafsa::new(&bytes).unwrap();
//!
//! assert_eq!(dafsa.lookup("aa"), MatchResult::Found(RuleFlags::EXCEPTION));
//! assert_eq!(dafsa.lookup("b"), MatchResult::NotFound);
//! ```

pub mod cursor;
pub mod format;
pub mod graph;
pub mod lookup;
pub mod node;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use cursor::IncrementalLookup;
pub use graph::{Dafsa, DafsaError, GraphStats};
pub use lookup::{longest_prefix, lookup, lookup_suffix, prefixes, PrefixMatches};
pub use types::{MatchResult, PrefixMatch, RuleFlags, SuffixMatch};
