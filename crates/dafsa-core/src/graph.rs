//! Validated graph handle

use crate::cursor::IncrementalLookup;
use crate::lookup::{self, PrefixMatches};
use crate::node::{BranchNode, LabelByte, LabelNode, Node};
use crate::types::{MatchResult, PrefixMatch, SuffixMatch};

/// Error type for malformed graphs.
///
/// These never describe the query: any input is legal and simply fails to
/// match. They mean the graph bytes and the decoder disagree on the format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DafsaError {
    #[error("offset at byte {at} points to {target}, outside the {len}-byte graph")]
    OffsetOutOfBounds { at: usize, target: usize, len: usize },
    #[error("unexpected end of graph at byte {at}")]
    UnexpectedEnd { at: usize },
    #[error("offset list ends without a final offset at byte {at}")]
    UnterminatedOffsetList { at: usize },
    #[error("branch node at byte {at} has no edges")]
    EmptyBranch { at: usize },
    #[error("invalid label byte {byte:#04x} at byte {at}")]
    InvalidLabelByte { at: usize, byte: u8 },
}

/// Node counts of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    /// Distinct label runs (edge targets).
    pub labels: usize,
    /// Distinct offset lists, including the root.
    pub branches: usize,
    /// Offsets across all lists.
    pub edges: usize,
    /// Terminal code bytes.
    pub terminals: usize,
}

/// A DAFSA graph over borrowed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dafsa<'a> {
    bytes: &'a [u8],
}

impl<'a> Dafsa<'a> {
    /// Wrap `bytes` after checking every reachable node.
    ///
    /// Lookups on a graph accepted here never hit a decoding error.
    pub fn new(bytes: &'a [u8]) -> Result<Self, DafsaError> {
        let stats = walk(bytes)?;
        log::debug!(
            "validated DAFSA graph: {} bytes, {} labels, {} branches, {} edges, {} terminals",
            bytes.len(),
            stats.labels,
            stats.branches,
            stats.edges,
            stats.terminals
        );
        Ok(Self { bytes })
    }

    /// Wrap `bytes` without validation, for generated static graphs.
    ///
    /// If the bytes turn out to be corrupt, infallible lookups panic and the
    /// `try_*` operations return the error.
    #[inline]
    pub const fn from_trusted(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the graph encodes the empty set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Walk the graph and count its nodes.
    pub fn stats(&self) -> Result<GraphStats, DafsaError> {
        walk(self.bytes)
    }

    /// A cursor positioned at the empty sequence.
    #[inline]
    pub fn cursor(&self) -> IncrementalLookup<'a> {
        IncrementalLookup::new(*self)
    }

    #[inline]
    pub fn lookup(&self, key: impl AsRef<[u8]>) -> MatchResult {
        lookup::lookup(*self, key)
    }

    #[inline]
    pub fn try_lookup(&self, key: impl AsRef<[u8]>) -> Result<MatchResult, DafsaError> {
        lookup::try_lookup(*self, key)
    }

    #[inline]
    pub fn lookup_suffix(&self, include_private: bool, host: impl AsRef<[u8]>) -> SuffixMatch {
        lookup::lookup_suffix(*self, include_private, host)
    }

    #[inline]
    pub fn try_lookup_suffix(
        &self,
        include_private: bool,
        host: impl AsRef<[u8]>,
    ) -> Result<SuffixMatch, DafsaError> {
        lookup::try_lookup_suffix(*self, include_private, host)
    }

    #[inline]
    pub fn prefixes<'k>(&self, key: &'k [u8]) -> PrefixMatches<'a, 'k> {
        lookup::prefixes(*self, key)
    }

    #[inline]
    pub fn longest_prefix(&self, key: impl AsRef<[u8]>) -> Option<PrefixMatch> {
        lookup::longest_prefix(*self, key)
    }
}

// =============================================================================
// Validation
// =============================================================================

enum Pending<'a> {
    Label(LabelNode<'a>),
    Branch(BranchNode<'a>),
}

/// Decode every reachable node once, with the same decoder lookups use.
///
/// Positions are tracked per node kind: a byte reached both as a label and
/// as an offset list is checked under both readings.
fn walk(bytes: &[u8]) -> Result<GraphStats, DafsaError> {
    let mut stats = GraphStats::default();
    let mut seen_labels = vec![false; bytes.len()];
    let mut seen_branches = vec![false; bytes.len() + 1];
    let mut stack = vec![Pending::Branch(BranchNode::root(bytes))];

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Branch(branch) => {
                if std::mem::replace(&mut seen_branches[branch.position()], true) {
                    continue;
                }
                stats.branches += 1;
                for edge in branch.edges() {
                    stats.edges += 1;
                    stack.push(Pending::Label(edge?));
                }
            }
            Pending::Label(mut label) => {
                if seen_labels[label.position()] {
                    continue;
                }
                stats.labels += 1;
                // Follow the run until it ends or joins one already checked.
                loop {
                    seen_labels[label.position()] = true;
                    match label.decode()? {
                        LabelByte::Terminal(_) => {
                            stats.terminals += 1;
                            break;
                        }
                        LabelByte::Char { is_last: true, .. } => {
                            if let Some(branch) = label.continuation()? {
                                stack.push(Pending::Branch(branch));
                            }
                            break;
                        }
                        LabelByte::Char { is_last: false, .. } => {
                            let next = match label.advance_within_label()? {
                                Some(Node::Label(next)) => next,
                                _ => break,
                            };
                            if seen_labels[next.position()] {
                                break;
                            }
                            label = next;
                        }
                    }
                }
            }
        }
    }

    Ok(stats)
}
