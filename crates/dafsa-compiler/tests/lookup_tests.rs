//! End-to-end tests: word lists compiled by the builder and queried through
//! `dafsa-core`.

use std::collections::BTreeSet;

use dafsa_compiler::{build_dafsa, parse_word_list, DafsaBuilder};
use dafsa_core::format::{decode_offset, offset_width};
use dafsa_core::{Dafsa, MatchResult, PrefixMatch, RuleFlags, SuffixMatch};

const SUFFIX_LIST: &str = "\
%%
com, 0
example.com, 0
uk, 0
co.uk, 0
ck, 0
*.ck, 2
www.ck, 1
blogspot.com, 4
appspot.com, 4
%%
";

fn compile(words: &[(&str, u8)], reversed: bool) -> Vec<u8> {
    let mut builder = DafsaBuilder::new().reversed(reversed);
    for &(word, value) in words {
        builder.insert(word, value).unwrap();
    }
    builder.build().unwrap()
}

fn suffix_graph() -> Vec<u8> {
    let entries = parse_word_list(SUFFIX_LIST).unwrap();
    build_dafsa(&entries, true).unwrap()
}

/// Deterministic pseudo-random lowercase words, all starting with `lead`.
fn random_words(lead: char, count: usize, seed: u64) -> BTreeSet<String> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    let mut words = BTreeSet::new();
    while words.len() < count {
        let len = 6 + next() % 7;
        let mut word = String::with_capacity(len + 1);
        word.push(lead);
        for _ in 0..len {
            word.push((b'a' + (next() % 26) as u8) as char);
        }
        words.insert(word);
    }
    words
}

/// Widths of the offsets in the root list.
fn root_offset_widths(bytes: &[u8]) -> Vec<usize> {
    let mut widths = Vec::new();
    let mut pos = 0;
    loop {
        let raw = decode_offset(bytes[pos], &bytes[pos + 1..]).unwrap();
        widths.push(raw.width);
        pos += offset_width(bytes[pos]);
        if raw.is_last {
            return widths;
        }
    }
}

#[test]
fn test_every_word_is_found() {
    let words = [
        ("com", 0),
        ("co", 1),
        ("co.uk", 2),
        ("org", 0),
        ("net", 4),
        ("ne", 3),
        ("a-b_c~", 15),
        (" ", 0),
    ];
    let bytes = compile(&words, false);
    let dafsa = Dafsa::new(&bytes).unwrap();

    for (word, value) in words {
        assert_eq!(dafsa.lookup(word), MatchResult::from_code(value.into()), "{word:?}");
    }
}

#[test]
fn test_non_words_are_not_found() {
    let bytes = compile(&[("com", 0), ("co.uk", 2), ("org", 0)], false);
    let dafsa = Dafsa::new(&bytes).unwrap();

    for key in ["", "c", "co", "co.", "comm", "or", "orgs", "COM", "uk", "co.uk.", "c\u{f6}m"] {
        assert_eq!(dafsa.lookup(key), MatchResult::NotFound, "{key:?}");
    }
}

#[test]
fn test_one_byte_offsets() {
    let bytes = compile(&[("a", 0), ("b", 1)], false);
    assert!(root_offset_widths(&bytes).iter().all(|&w| w == 1));
}

#[test]
fn test_two_byte_offsets() {
    let words = random_words('z', 100, 7);
    let mut builder = DafsaBuilder::new();
    builder.insert("a", 1).unwrap();
    for word in &words {
        builder.insert(word, 0).unwrap();
    }
    let bytes = builder.build().unwrap();
    let dafsa = Dafsa::new(&bytes).unwrap();

    assert_eq!(root_offset_widths(&bytes), vec![1, 2]);
    assert_eq!(dafsa.lookup("a"), MatchResult::from_code(1));
    for word in &words {
        assert_eq!(dafsa.lookup(word), MatchResult::FOUND, "{word}");
    }
}

#[test]
fn test_three_byte_offsets() {
    let words = random_words('z', 3000, 11);
    let mut builder = DafsaBuilder::new();
    builder.insert("a", 1).unwrap();
    for word in &words {
        builder.insert(word, 0).unwrap();
    }
    let bytes = builder.build().unwrap();
    let dafsa = Dafsa::new(&bytes).unwrap();

    assert!(bytes.len() > 1 << 13);
    assert_eq!(root_offset_widths(&bytes), vec![1, 3]);
    assert_eq!(dafsa.lookup("a"), MatchResult::from_code(1));
    for word in words.iter().step_by(7) {
        assert_eq!(dafsa.lookup(word), MatchResult::FOUND, "{word}");
        assert_eq!(dafsa.lookup(&word[..word.len() - 1]), MatchResult::NotFound);
    }
}

#[test]
fn test_suffix_respects_component_boundaries() {
    let bytes = suffix_graph();
    let dafsa = Dafsa::new(&bytes).unwrap();

    let m = dafsa.lookup_suffix(true, "myexample.com");
    assert_eq!(m.result, MatchResult::FOUND);
    assert_eq!(m.length, 3);
    assert_eq!(m.suffix_of("myexample.com"), Some("com"));

    let m = dafsa.lookup_suffix(true, "www.example.com");
    assert_eq!(m.length, 11);
    assert_eq!(m.suffix_of("www.example.com"), Some("example.com"));

    assert_eq!(dafsa.lookup_suffix(true, "example.com").length, 11);
    assert_eq!(dafsa.lookup_suffix(true, "xcom"), SuffixMatch::NONE);
}

#[test]
fn test_suffix_longest_match_wins() {
    let bytes = suffix_graph();
    let dafsa = Dafsa::new(&bytes).unwrap();

    let m = dafsa.lookup_suffix(false, "example.co.uk");
    assert_eq!(m.result, MatchResult::FOUND);
    assert_eq!(m.length, 5);

    let m = dafsa.lookup_suffix(false, "www.ck");
    assert_eq!(m.result, MatchResult::Found(RuleFlags::EXCEPTION));
    assert_eq!(m.length, 6);

    let m = dafsa.lookup_suffix(false, "foo.ck");
    assert_eq!(m.result, MatchResult::FOUND);
    assert_eq!(m.length, 2);
}

#[test]
fn test_suffix_private_filtering() {
    let bytes = suffix_graph();
    let dafsa = Dafsa::new(&bytes).unwrap();

    let m = dafsa.lookup_suffix(true, "foo.blogspot.com");
    assert_eq!(m.result, MatchResult::Found(RuleFlags::PRIVATE));
    assert!(m.result.is_private());
    assert_eq!(m.length, 12);

    let m = dafsa.lookup_suffix(false, "foo.blogspot.com");
    assert_eq!(m.result, MatchResult::FOUND);
    assert_eq!(m.length, 3);
}

#[test]
fn test_suffix_misses() {
    let bytes = suffix_graph();
    let dafsa = Dafsa::new(&bytes).unwrap();

    for host in ["", "localhost", "example.de", "EXAMPLE.COM", "co.u"] {
        assert_eq!(dafsa.lookup_suffix(true, host), SuffixMatch::NONE, "{host:?}");
    }
}

#[test]
fn test_cursor_copies_are_independent() {
    let bytes = compile(&[("com", 0), ("co.uk", 1)], false);
    let dafsa = Dafsa::new(&bytes).unwrap();

    let mut cursor = dafsa.cursor();
    assert!(cursor.advance(b'c'));
    assert!(cursor.advance(b'o'));
    assert_eq!(cursor.result(), MatchResult::NotFound);

    let mut dotted = cursor;
    assert!(cursor.advance(b'm'));
    assert_eq!(cursor.result(), MatchResult::FOUND);

    for &b in b".uk" {
        assert!(dotted.advance(b));
    }
    assert_eq!(dotted.result(), MatchResult::from_code(1));
    assert_eq!(cursor.result(), MatchResult::FOUND);

    assert!(!cursor.advance(b'.'));
    assert!(cursor.is_exhausted());
    assert!(!dotted.is_exhausted());
}

#[test]
fn test_prefix_queries() {
    let bytes = compile(&[("co", 0), ("co.uk", 1), ("com", 2)], false);
    let dafsa = Dafsa::new(&bytes).unwrap();

    let found: Vec<PrefixMatch> = dafsa.prefixes(b"co.uk.example").collect();
    assert_eq!(
        found,
        vec![
            PrefixMatch {
                length: 2,
                result: MatchResult::FOUND
            },
            PrefixMatch {
                length: 5,
                result: MatchResult::from_code(1)
            },
        ]
    );
    assert_eq!(dafsa.longest_prefix("commerce").map(|m| m.length), Some(3));
    assert_eq!(dafsa.longest_prefix("c"), None);
}

#[test]
fn test_suffix_sharing_beats_trie() {
    // Words with a long common tail and the same code
    let words: Vec<String> = (b'a'..=b'z')
        .map(|c| format!("{}.example-suffix", c as char))
        .collect();
    let mut builder = DafsaBuilder::new();
    for word in &words {
        builder.insert(word, 0).unwrap();
    }
    let bytes = builder.build().unwrap();
    let trie_bytes: usize = words.iter().map(|w| w.len() + 1).sum();

    assert!(bytes.len() * 4 < trie_bytes);

    let dafsa = Dafsa::new(&bytes).unwrap();
    let stats = dafsa.stats().unwrap();
    assert_eq!(stats.terminals, 1);
    for word in &words {
        assert_eq!(dafsa.lookup(word), MatchResult::FOUND);
    }
}
