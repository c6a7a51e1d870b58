//! Result types shared by every lookup.
//!
//! Terminal codes in the graph are small bitmasks. For public-suffix style
//! graphs the bits mean exception, wildcard and private; other graphs only
//! use code 0 for plain membership.

// =============================================================================
// Result Codes
// =============================================================================

/// Integer form of [`MatchResult::NotFound`].
pub const NOT_FOUND_CODE: i32 = -1;

/// Largest terminal code the encoding can carry.
pub const MAX_RESULT_CODE: u8 = 0x0F;

bitflags::bitflags! {
    /// Flags attached to a matched rule.
    ///
    /// An empty set is plain membership. Bits outside the named flags are
    /// kept as-is so graphs with custom codes round-trip through
    /// [`MatchResult::code`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RuleFlags: u8 {
        /// Key is excluded from the set via an exception rule (`!rule`)
        const EXCEPTION = 1 << 0;
        /// Key matched a wildcard rule (`*.rule`)
        const WILDCARD = 1 << 1;
        /// Key matched a rule from the private section
        const PRIVATE = 1 << 2;
    }
}

/// Outcome of a lookup for one input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchResult {
    /// The sequence is not in the set.
    #[default]
    NotFound,
    /// The sequence is in the set, with the flags stored for it.
    Found(RuleFlags),
}

impl MatchResult {
    /// Plain membership with no flags.
    pub const FOUND: Self = Self::Found(RuleFlags::empty());

    /// Build from a terminal code as stored in the graph.
    #[inline]
    pub const fn from_terminal(code: u8) -> Self {
        Self::Found(RuleFlags::from_bits_retain(code & MAX_RESULT_CODE))
    }

    /// Build from the integer form (`-1` or a non-negative code).
    pub fn from_code(code: i32) -> Self {
        match u8::try_from(code) {
            Ok(value) if value <= MAX_RESULT_CODE => Self::from_terminal(value),
            _ => Self::NotFound,
        }
    }

    /// Integer form: [`NOT_FOUND_CODE`] or the terminal code.
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Self::NotFound => NOT_FOUND_CODE,
            Self::Found(flags) => i32::from(flags.bits()),
        }
    }

    #[inline]
    pub fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Flags of a match, `None` when not found.
    #[inline]
    pub fn flags(self) -> Option<RuleFlags> {
        match self {
            Self::NotFound => None,
            Self::Found(flags) => Some(flags),
        }
    }

    /// Whether this is a match from a private rule.
    #[inline]
    pub fn is_private(self) -> bool {
        self.flags().is_some_and(|f| f.contains(RuleFlags::PRIVATE))
    }
}

// =============================================================================
// Match Spans
// =============================================================================

/// Longest matching suffix of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SuffixMatch {
    pub result: MatchResult,
    /// Number of trailing bytes of the host covered by the match (0 if none).
    pub length: usize,
}

impl SuffixMatch {
    pub const NONE: Self = Self {
        result: MatchResult::NotFound,
        length: 0,
    };

    /// The matched tail of `host`, if any.
    pub fn suffix_of<'h>(&self, host: &'h str) -> Option<&'h str> {
        if !self.result.is_found() {
            return None;
        }
        host.get(host.len().checked_sub(self.length)?..)
    }
}

/// A prefix of the key that is a member of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefixMatch {
    /// Number of leading bytes of the key.
    pub length: usize,
    pub result: MatchResult,
}
