//! Incremental lookup cursor
//!
//! The cursor consumes one input byte at a time and can report, after any
//! byte, whether the sequence consumed so far is in the set. It is a `Copy`
//! value, so callers can save it before a speculative probe (for example a
//! wildcard edge) and restore it afterwards without walking from the root.
//!
//! ```
//! use dafsa_core::{Dafsa, MatchResult};
//!
//! // {"a" => 0, "aa" => 1, "bc" => 2}
//! let bytes = [0x02, 0x86, 0xE1, 0x02, 0x82, 0x61, 0x81, 0x80, 0x62, 0x63, 0x82];
//! let dafsa = Dafsa::new(&bytes).unwrap();
//!
//! let mut longest = 0;
//! let mut cursor = dafsa.cursor();
//! for (i, &b) in b"aab".iter().enumerate() {
//!     if !cursor.advance(b) {
//!         break;
//!     }
//!     if cursor.result() != MatchResult::NotFound {
//!         longest = i + 1;
//!     }
//! }
//! assert_eq!(longest, 2);
//! ```

use crate::graph::{Dafsa, DafsaError};
use crate::node::{BranchNode, LabelByte, LabelNode, Node};
use crate::types::MatchResult;

/// Decoder state of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State<'a> {
    /// Positioned on a label byte (a character or a terminal code).
    InLabel(LabelNode<'a>),
    /// Positioned on the offset list of the current state.
    InBranch(BranchNode<'a>),
    /// The input left the graph.
    Exhausted,
}

/// Cursor over a [`Dafsa`] for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementalLookup<'a> {
    state: State<'a>,
}

impl<'a> IncrementalLookup<'a> {
    /// Cursor at the empty sequence (the root offset list).
    #[inline]
    pub fn new(dafsa: Dafsa<'a>) -> Self {
        Self {
            state: State::InBranch(BranchNode::root(dafsa.as_bytes())),
        }
    }

    /// Whether a previous advance failed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Append `input` to the sequence.
    ///
    /// Returns `true` if the new sequence is in the set or is a prefix of a
    /// longer member. Once this returns `false` it keeps doing so and
    /// [`result`](Self::result) reports `NotFound`.
    ///
    /// # Panics
    ///
    /// Panics if the graph is corrupt. Graphs accepted by [`Dafsa::new`]
    /// never are.
    #[inline]
    pub fn advance(&mut self, input: u8) -> bool {
        match self.try_advance(input) {
            Ok(advanced) => advanced,
            Err(err) => corrupt(err),
        }
    }

    /// [`advance`](Self::advance) reporting corruption as an error. On error
    /// the cursor is left exhausted.
    pub fn try_advance(&mut self, input: u8) -> Result<bool, DafsaError> {
        let next = match self.state {
            State::Exhausted => return Ok(false),
            State::InLabel(label) => match label.decode() {
                Ok(LabelByte::Char { ch, .. }) if ch == input => label.advance_within_label(),
                Ok(_) => Ok(None),
                Err(err) => Err(err),
            },
            // The child's first byte is the edge character, so step past it.
            State::InBranch(branch) => match branch.find_edge(input) {
                Ok(Some(child)) => child.advance_within_label(),
                Ok(None) => Ok(None),
                Err(err) => Err(err),
            },
        };

        self.state = match next {
            Ok(Some(Node::Label(label))) => State::InLabel(label),
            Ok(Some(Node::Branch(branch))) => State::InBranch(branch),
            Ok(None) => State::Exhausted,
            Err(err) => {
                self.state = State::Exhausted;
                return Err(err);
            }
        };
        Ok(!self.is_exhausted())
    }

    /// Result code for the sequence consumed so far.
    ///
    /// Does not move the cursor; it can be interleaved freely with
    /// [`advance`](Self::advance).
    ///
    /// # Panics
    ///
    /// Panics if the graph is corrupt.
    #[inline]
    pub fn result(&self) -> MatchResult {
        match self.try_result() {
            Ok(result) => result,
            Err(err) => corrupt(err),
        }
    }

    /// [`result`](Self::result) reporting corruption as an error.
    pub fn try_result(&self) -> Result<MatchResult, DafsaError> {
        let code = match self.state {
            State::Exhausted => None,
            State::InLabel(label) => label.terminal_code()?,
            State::InBranch(branch) => branch.terminal_code()?,
        };
        Ok(code.map_or(MatchResult::NotFound, MatchResult::from_terminal))
    }
}

#[cold]
#[inline(never)]
pub(crate) fn corrupt(err: DafsaError) -> ! {
    log::error!("corrupt DAFSA graph: {err}");
    panic!("corrupt DAFSA graph: {err}");
}
