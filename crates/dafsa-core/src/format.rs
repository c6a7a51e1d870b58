//! DAFSA Byte Encoding Constants
//!
//! The layout matches the graphs emitted by `make_dafsa`:
//!
//! - The buffer starts with the root offset list.
//! - Offsets are cumulative. The first one is relative to the start of its
//!   list, every other one to the previous target.
//! - Label bytes are printable ASCII. The last byte of a label has the high
//!   bit set and is followed by an offset list, unless it is a terminal code
//!   (`0x80 | code`), which ends the node.

// =============================================================================
// Offset Lists
// =============================================================================

/// Set on the lead byte of the last offset in a list.
pub const LAST_OFFSET_FLAG: u8 = 0x80;

/// Lead-byte bits selecting the offset width.
pub const OFFSET_WIDTH_MASK: u8 = 0x60;

/// `0b?10xxxxx` lead: two-byte offset.
pub const OFFSET_TWO_BYTES: u8 = 0x40;

/// `0b?11xxxxx` lead: three-byte offset.
pub const OFFSET_THREE_BYTES: u8 = 0x60;

/// Value bits of a one-byte offset.
pub const ONE_BYTE_VALUE_MASK: u8 = 0x3F;

/// Value bits of the lead byte of a multi-byte offset.
pub const LEAD_VALUE_MASK: u8 = 0x1F;

/// Exclusive upper bounds per offset width.
pub const ONE_BYTE_LIMIT: usize = 1 << 6;
pub const TWO_BYTE_LIMIT: usize = 1 << 13;
pub const THREE_BYTE_LIMIT: usize = 1 << 21;

// =============================================================================
// Labels
// =============================================================================

/// Set on the last byte of a label.
pub const END_OF_LABEL_FLAG: u8 = 0x80;

/// Range of characters that can appear in the set.
pub const FIRST_LABEL_CHAR: u8 = 0x20;
pub const LAST_LABEL_CHAR: u8 = 0x7F;

/// Bits of a terminal byte holding the result code.
pub const TERMINAL_CODE_MASK: u8 = 0x0F;

/// Whether `byte` can be a character of a stored string.
#[inline]
pub const fn is_label_char(byte: u8) -> bool {
    byte >= FIRST_LABEL_CHAR && byte <= LAST_LABEL_CHAR
}

/// Encoded form of terminal `code`.
#[inline]
pub const fn terminal_byte(code: u8) -> u8 {
    END_OF_LABEL_FLAG | (code & TERMINAL_CODE_MASK)
}

// =============================================================================
// Helpers
// =============================================================================

/// Decoded offset: value and number of bytes it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOffset {
    pub value: usize,
    pub width: usize,
    pub is_last: bool,
}

/// Width of an offset given its lead byte.
#[inline]
pub const fn offset_width(lead: u8) -> usize {
    match lead & OFFSET_WIDTH_MASK {
        OFFSET_THREE_BYTES => 3,
        OFFSET_TWO_BYTES => 2,
        _ => 1,
    }
}

/// Decode an offset from its lead byte and the (up to two) bytes after it.
/// `rest` must hold at least `offset_width(lead) - 1` bytes.
#[inline]
pub fn decode_offset(lead: u8, rest: &[u8]) -> Option<RawOffset> {
    let width = offset_width(lead);
    let value = match width {
        3 => {
            let [b1, b2] = [*rest.first()?, *rest.get(1)?];
            (usize::from(lead & LEAD_VALUE_MASK) << 16) | (usize::from(b1) << 8) | usize::from(b2)
        }
        2 => (usize::from(lead & LEAD_VALUE_MASK) << 8) | usize::from(*rest.first()?),
        _ => usize::from(lead & ONE_BYTE_VALUE_MASK),
    };
    Some(RawOffset {
        value,
        width,
        is_last: lead & LAST_OFFSET_FLAG != 0,
    })
}

/// Append the encoding of `distance` to `out`, big-endian as stored.
/// Returns `false` if the distance does not fit in 21 bits.
pub fn encode_offset(distance: usize, out: &mut Vec<u8>) -> bool {
    if distance < ONE_BYTE_LIMIT {
        out.push(distance as u8);
    } else if distance < TWO_BYTE_LIMIT {
        out.push(OFFSET_TWO_BYTES | (distance >> 8) as u8);
        out.push(distance as u8);
    } else if distance < THREE_BYTE_LIMIT {
        out.push(OFFSET_THREE_BYTES | (distance >> 16) as u8);
        out.push((distance >> 8) as u8);
        out.push(distance as u8);
    } else {
        return false;
    }
    true
}
