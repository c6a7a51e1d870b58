//! Word list parsing.
//!
//! Input is the gperf format used for fixed-set tables:
//!
//! ```text
//! %%
//! com, 0
//! co.uk, 1
//! %%
//! ```
//!
//! Only the lines between the first two `%%` markers are read. Without
//! markers every line is an entry. Blank lines and `#` or `//` comments are
//! skipped either way.

use dafsa_core::format::is_label_char;

/// Largest value a word list entry may carry.
pub const MAX_LIST_VALUE: u8 = 7;

const SECTION_MARKER: &str = "%%";

/// One `word, value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: expected \"word, <digit>\", found {text:?}")]
    MalformedLine { line: usize, text: String },
    #[error("line {line}: value {value:?} is outside 0-7")]
    ValueOutOfRange { line: usize, value: String },
    #[error("line {line}: illegal character {ch:?} in {word:?}")]
    IllegalCharacter { line: usize, word: String, ch: char },
    #[error("line {line}: empty word")]
    EmptyWord { line: usize },
    #[error("no closing %% marker after line {line}")]
    UnterminatedSection { line: usize },
}

pub fn parse_word_list(text: &str) -> Result<Vec<WordEntry>, ParseError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .collect();

    let body = match lines.iter().position(|(_, l)| *l == SECTION_MARKER) {
        Some(begin) => {
            let end = lines[begin + 1..]
                .iter()
                .position(|(_, l)| *l == SECTION_MARKER)
                .ok_or(ParseError::UnterminatedSection {
                    line: lines[begin].0,
                })?;
            &lines[begin + 1..begin + 1 + end]
        }
        None => &lines[..],
    };

    let mut entries = Vec::with_capacity(body.len());
    for &(line, text) in body {
        if text.is_empty() || is_comment_line(text) {
            continue;
        }
        entries.push(parse_entry(line, text)?);
    }
    Ok(entries)
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

fn parse_entry(line: usize, text: &str) -> Result<WordEntry, ParseError> {
    let (word, value) = text
        .rsplit_once(", ")
        .ok_or_else(|| ParseError::MalformedLine {
            line,
            text: text.to_string(),
        })?;

    let value = match value.trim().parse::<u8>() {
        Ok(v) if v <= MAX_LIST_VALUE => v,
        _ => {
            return Err(ParseError::ValueOutOfRange {
                line,
                value: value.to_string(),
            })
        }
    };

    if word.is_empty() {
        return Err(ParseError::EmptyWord { line });
    }
    if let Some(ch) = word
        .chars()
        .find(|&c| !u8::try_from(c).is_ok_and(is_label_char))
    {
        return Err(ParseError::IllegalCharacter {
            line,
            word: word.to_string(),
            ch,
        });
    }

    Ok(WordEntry {
        word: word.to_string(),
        value,
    })
}
