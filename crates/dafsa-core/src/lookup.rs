//! Whole-string, reversed-suffix and prefix queries.

use std::iter::FusedIterator;

use crate::cursor::{corrupt, IncrementalLookup};
use crate::graph::{Dafsa, DafsaError};
use crate::types::{MatchResult, PrefixMatch, RuleFlags, SuffixMatch};

/// Separator between host components.
pub const COMPONENT_SEPARATOR: u8 = b'.';

// =============================================================================
// Whole-String Lookup
// =============================================================================

/// Look up `key` in the set.
///
/// Returns `NotFound` or the result code stored for `key`. For public-suffix
/// graphs the code is a bitmask of exception, wildcard and private flags.
///
/// # Panics
///
/// Panics if the graph is corrupt (see [`Dafsa::from_trusted`]).
pub fn lookup(dafsa: Dafsa<'_>, key: impl AsRef<[u8]>) -> MatchResult {
    let mut cursor = dafsa.cursor();
    for &b in key.as_ref() {
        if !cursor.advance(b) {
            return MatchResult::NotFound;
        }
    }
    cursor.result()
}

/// [`lookup`] reporting corruption as an error.
pub fn try_lookup(dafsa: Dafsa<'_>, key: impl AsRef<[u8]>) -> Result<MatchResult, DafsaError> {
    let mut cursor = dafsa.cursor();
    for &b in key.as_ref() {
        if !cursor.try_advance(b)? {
            return Ok(MatchResult::NotFound);
        }
    }
    cursor.try_result()
}

// =============================================================================
// Reversed-Suffix Lookup
// =============================================================================

/// Find the longest suffix of `host` in a graph built over reversed strings.
///
/// Only suffixes starting at a component boundary count: the whole host, or
/// a part right after a `.`. With `include_private` unset, matches carrying
/// the private flag are passed over and the walk goes on.
///
/// # Panics
///
/// Panics if the graph is corrupt.
pub fn lookup_suffix(dafsa: Dafsa<'_>, include_private: bool, host: impl AsRef<[u8]>) -> SuffixMatch {
    try_lookup_suffix(dafsa, include_private, host).unwrap_or_else(|err| corrupt(err))
}

/// [`lookup_suffix`] reporting corruption as an error.
pub fn try_lookup_suffix(
    dafsa: Dafsa<'_>,
    include_private: bool,
    host: impl AsRef<[u8]>,
) -> Result<SuffixMatch, DafsaError> {
    let host = host.as_ref();
    let mut cursor = dafsa.cursor();
    let mut best = SuffixMatch::NONE;

    // Right to left: `start` is the index of the first byte of the suffix.
    for start in (0..host.len()).rev() {
        if !cursor.try_advance(host[start])? {
            break;
        }
        if start > 0 && host[start - 1] != COMPONENT_SEPARATOR {
            continue;
        }
        let candidate = cursor.try_result()?;
        let Some(flags) = candidate.flags() else {
            continue;
        };
        if flags.contains(RuleFlags::PRIVATE) && !include_private {
            continue;
        }
        // Later candidates are longer.
        best = SuffixMatch {
            result: candidate,
            length: host.len() - start,
        };
    }

    Ok(best)
}

// =============================================================================
// Prefix Queries
// =============================================================================

/// Iterate the prefixes of `key` that are in the set, shortest first.
pub fn prefixes<'a, 'k>(dafsa: Dafsa<'a>, key: &'k [u8]) -> PrefixMatches<'a, 'k> {
    PrefixMatches {
        cursor: dafsa.cursor(),
        key,
        consumed: 0,
        started: false,
    }
}

/// The longest prefix of `key` in the set.
pub fn longest_prefix(dafsa: Dafsa<'_>, key: impl AsRef<[u8]>) -> Option<PrefixMatch> {
    prefixes(dafsa, key.as_ref()).last()
}

/// Iterator returned by [`prefixes`].
///
/// # Panics
///
/// Panics while iterating if the graph is corrupt.
#[derive(Debug, Clone)]
pub struct PrefixMatches<'a, 'k> {
    cursor: IncrementalLookup<'a>,
    key: &'k [u8],
    consumed: usize,
    started: bool,
}

impl Iterator for PrefixMatches<'_, '_> {
    type Item = PrefixMatch;

    fn next(&mut self) -> Option<PrefixMatch> {
        if !self.started {
            self.started = true;
            if let found @ MatchResult::Found(_) = self.cursor.result() {
                return Some(PrefixMatch {
                    length: 0,
                    result: found,
                });
            }
        }

        while let Some(&b) = self.key.get(self.consumed) {
            if !self.cursor.advance(b) {
                self.consumed = self.key.len();
                return None;
            }
            self.consumed += 1;
            if let found @ MatchResult::Found(_) = self.cursor.result() {
                return Some(PrefixMatch {
                    length: self.consumed,
                    result: found,
                });
            }
        }
        None
    }
}

impl FusedIterator for PrefixMatches<'_, '_> {}
