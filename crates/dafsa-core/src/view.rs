//! Bounds-checked read position over graph bytes.

use crate::graph::DafsaError;

/// A position inside an immutable graph buffer.
///
/// Positions are absolute so that every decoded offset can be checked
/// against the whole buffer. `pos == bytes.len()` is allowed and denotes the
/// end of the buffer; reading there is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteView<'a> {
    /// View positioned at the start of `bytes`.
    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Absolute position within the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The whole underlying buffer.
    #[inline]
    pub const fn buffer(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Byte at the current position.
    #[inline]
    pub fn byte(&self) -> Result<u8, DafsaError> {
        self.byte_at(0)
    }

    /// Byte `ahead` positions past the current one.
    #[inline]
    pub fn byte_at(&self, ahead: usize) -> Result<u8, DafsaError> {
        self.pos
            .checked_add(ahead)
            .and_then(|at| self.bytes.get(at).copied())
            .ok_or(DafsaError::UnexpectedEnd { at: self.pos.saturating_add(ahead) })
    }

    /// View moved forward by `count` bytes. The result may sit at the end of
    /// the buffer but never beyond it.
    #[inline]
    pub fn advance(&self, count: usize) -> Result<Self, DafsaError> {
        match self.pos.checked_add(count) {
            Some(pos) if pos <= self.bytes.len() => Ok(Self { bytes: self.bytes, pos }),
            _ => Err(DafsaError::UnexpectedEnd { at: self.pos }),
        }
    }

    /// View at an absolute `target` decoded from an offset stored at the
    /// current position. The target must hold a byte.
    #[inline]
    pub fn seek(&self, target: usize) -> Result<Self, DafsaError> {
        if target < self.bytes.len() {
            Ok(Self { bytes: self.bytes, pos: target })
        } else {
            Err(DafsaError::OffsetOutOfBounds {
                at: self.pos,
                target,
                len: self.bytes.len(),
            })
        }
    }
}
