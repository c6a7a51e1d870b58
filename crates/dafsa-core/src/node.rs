//! Node decoding
//!
//! A graph position is either inside a label run or at the start of an
//! offset list (a branch node). Nothing is materialized: both node kinds are
//! thin wrappers over a [`ByteView`] that decode bytes when asked.

use std::iter::FusedIterator;

use crate::format::*;
use crate::graph::DafsaError;
use crate::view::ByteView;

/// A decoded position in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Label(LabelNode<'a>),
    Branch(BranchNode<'a>),
}

impl<'a> Node<'a> {
    #[inline]
    pub fn is_label_node(&self) -> bool {
        matches!(self, Self::Label(_))
    }

    #[inline]
    pub fn position(&self) -> usize {
        match self {
            Self::Label(label) => label.position(),
            Self::Branch(branch) => branch.position(),
        }
    }

    /// Terminal code of the state this node represents, if it is accepting.
    pub fn terminal_code(&self) -> Result<Option<u8>, DafsaError> {
        match self {
            Self::Label(label) => label.terminal_code(),
            Self::Branch(branch) => branch.terminal_code(),
        }
    }
}

// =============================================================================
// Label Runs
// =============================================================================

/// Contents of one label position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelByte {
    /// A character. When `is_last` is set an offset list follows.
    Char { ch: u8, is_last: bool },
    /// A terminal code; the node ends here.
    Terminal(u8),
}

/// A position inside a label run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelNode<'a> {
    view: ByteView<'a>,
}

impl<'a> LabelNode<'a> {
    #[inline]
    pub(crate) fn at(view: ByteView<'a>) -> Self {
        Self { view }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.view.position()
    }

    /// Decode the byte at this position.
    #[inline]
    pub fn decode(&self) -> Result<LabelByte, DafsaError> {
        let byte = self.view.byte()?;
        match byte {
            FIRST_LABEL_CHAR..=LAST_LABEL_CHAR => Ok(LabelByte::Char {
                ch: byte,
                is_last: false,
            }),
            // Printable character with the end-of-label bit
            0xA0..=0xFF => Ok(LabelByte::Char {
                ch: byte & !END_OF_LABEL_FLAG,
                is_last: true,
            }),
            0x80..=0x8F => Ok(LabelByte::Terminal(byte & TERMINAL_CODE_MASK)),
            _ => Err(DafsaError::InvalidLabelByte {
                at: self.position(),
                byte,
            }),
        }
    }

    /// The character at this position, `None` if it holds a terminal code.
    pub fn label_character(&self) -> Result<Option<u8>, DafsaError> {
        Ok(match self.decode()? {
            LabelByte::Char { ch, .. } => Some(ch),
            LabelByte::Terminal(_) => None,
        })
    }

    /// Whether this is the last character of its run.
    pub fn is_last_character(&self) -> Result<bool, DafsaError> {
        Ok(matches!(self.decode()?, LabelByte::Char { is_last: true, .. }))
    }

    pub fn terminal_code(&self) -> Result<Option<u8>, DafsaError> {
        Ok(match self.decode()? {
            LabelByte::Terminal(code) => Some(code),
            LabelByte::Char { .. } => None,
        })
    }

    pub fn has_terminal_code(&self) -> Result<bool, DafsaError> {
        Ok(self.terminal_code()?.is_some())
    }

    /// Whether this position holds the character `input`.
    #[inline]
    pub fn matches(&self, input: u8) -> Result<bool, DafsaError> {
        Ok(matches!(self.decode()?, LabelByte::Char { ch, .. } if ch == input))
    }

    /// The branch node following the last character of the run.
    ///
    /// `None` when this position is not the end of the run, or holds a
    /// terminal code (the node has no continuation).
    pub fn continuation(&self) -> Result<Option<BranchNode<'a>>, DafsaError> {
        match self.decode()? {
            LabelByte::Char { is_last: true, .. } => Ok(Some(BranchNode::at(self.next_view()?))),
            _ => Ok(None),
        }
    }

    /// Step to whatever follows this position: the next character of the
    /// run or, after the last character, the branch node. `None` after a
    /// terminal code.
    pub fn advance_within_label(&self) -> Result<Option<Node<'a>>, DafsaError> {
        match self.decode()? {
            LabelByte::Terminal(_) => Ok(None),
            LabelByte::Char { is_last: false, .. } => {
                Ok(Some(Node::Label(LabelNode::at(self.next_view()?))))
            }
            LabelByte::Char { is_last: true, .. } => {
                Ok(Some(Node::Branch(BranchNode::at(self.next_view()?))))
            }
        }
    }

    /// View of the byte after this one, which must exist.
    fn next_view(&self) -> Result<ByteView<'a>, DafsaError> {
        let next = self.view.advance(1)?;
        if next.is_at_end() {
            return Err(DafsaError::UnexpectedEnd {
                at: next.position(),
            });
        }
        Ok(next)
    }
}

// =============================================================================
// Branch Nodes
// =============================================================================

/// An offset list: the outgoing edges of one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchNode<'a> {
    view: ByteView<'a>,
}

impl<'a> BranchNode<'a> {
    #[inline]
    pub(crate) fn at(view: ByteView<'a>) -> Self {
        Self { view }
    }

    /// The root offset list at the start of `bytes`.
    #[inline]
    pub fn root(bytes: &'a [u8]) -> Self {
        Self::at(ByteView::new(bytes))
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.view.position()
    }

    /// Child label nodes in storage order.
    #[inline]
    pub fn edges(&self) -> Edges<'a> {
        Edges {
            next: Some(self.view),
            target: self.view.position(),
            first: true,
        }
    }

    /// The child whose label starts with `input`.
    ///
    /// Offsets are cumulative, so the list is scanned in order.
    pub fn find_edge(&self, input: u8) -> Result<Option<LabelNode<'a>>, DafsaError> {
        if !is_label_char(input) {
            return Ok(None);
        }
        for edge in self.edges() {
            let child = edge?;
            if child.matches(input)? {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// Code of the terminal-only child, if the state is accepting.
    pub fn terminal_code(&self) -> Result<Option<u8>, DafsaError> {
        for edge in self.edges() {
            if let Some(code) = edge?.terminal_code()? {
                return Ok(Some(code));
            }
        }
        Ok(None)
    }

    pub fn is_accepting(&self) -> Result<bool, DafsaError> {
        Ok(self.terminal_code()?.is_some())
    }
}

/// Iterator over the children of a [`BranchNode`].
///
/// Yields an error and stops if the list is malformed.
#[derive(Debug, Clone)]
pub struct Edges<'a> {
    next: Option<ByteView<'a>>,
    target: usize,
    first: bool,
}

impl<'a> Edges<'a> {
    fn step(&mut self) -> Result<Option<LabelNode<'a>>, DafsaError> {
        let Some(view) = self.next.take() else {
            return Ok(None);
        };

        if view.is_at_end() {
            // Only the root list of an empty graph may be empty.
            return match (self.first, view.position()) {
                (true, 0) => Ok(None),
                (true, at) => Err(DafsaError::EmptyBranch { at }),
                (false, at) => Err(DafsaError::UnterminatedOffsetList { at }),
            };
        }
        self.first = false;

        let at = view.position();
        let lead = view.byte()?;
        let rest = view
            .buffer()
            .get(at + 1..at + offset_width(lead))
            .ok_or(DafsaError::UnexpectedEnd { at })?;
        let raw = decode_offset(lead, rest).ok_or(DafsaError::UnexpectedEnd { at })?;

        self.target = self
            .target
            .checked_add(raw.value)
            .ok_or(DafsaError::OffsetOutOfBounds {
                at,
                target: usize::MAX,
                len: view.buffer().len(),
            })?;
        let child = view.seek(self.target)?;

        if !raw.is_last {
            self.next = Some(view.advance(raw.width)?);
        }
        Ok(Some(LabelNode::at(child)))
    }
}

impl<'a> Iterator for Edges<'a> {
    type Item = Result<LabelNode<'a>, DafsaError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}

impl FusedIterator for Edges<'_> {}
