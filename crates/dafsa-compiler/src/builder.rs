use std::collections::{BTreeMap, HashMap};

use dafsa_core::format::{
    encode_offset, is_label_char, END_OF_LABEL_FLAG, LAST_OFFSET_FLAG, TERMINAL_CODE_MASK,
};

use crate::parser::WordEntry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("illegal character {byte:#04x} in word {word:?}")]
    IllegalCharacter { word: String, byte: u8 },
    #[error("result code {value} for {word:?} does not fit in four bits")]
    ValueOutOfRange { word: String, value: u8 },
    #[error("word {word:?} given conflicting codes {first} and {second}")]
    ConflictingValue { word: String, first: u8, second: u8 },
    #[error("graph too large: offset {distance} does not fit in 21 bits")]
    GraphTooLarge { distance: usize },
}

/// Collects words and compiles them into a DAFSA graph.
///
/// With `reversed(true)` every word is stored back to front, which is the
/// form suffix lookups expect.
#[derive(Debug, Clone, Default)]
pub struct DafsaBuilder {
    words: BTreeMap<Vec<u8>, u8>,
    reversed: bool,
}

impl DafsaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add `word` with result code `value`. Re-adding a word with the same
    /// code is a no-op.
    pub fn insert(&mut self, word: impl AsRef<[u8]>, value: u8) -> Result<(), BuildError> {
        let word = word.as_ref();
        let display = || String::from_utf8_lossy(word).into_owned();

        if let Some(&byte) = word.iter().find(|&&b| !is_label_char(b)) {
            return Err(BuildError::IllegalCharacter {
                word: display(),
                byte,
            });
        }
        if value > TERMINAL_CODE_MASK {
            return Err(BuildError::ValueOutOfRange {
                word: display(),
                value,
            });
        }

        let mut key = word.to_vec();
        if self.reversed {
            key.reverse();
        }
        match self.words.get(&key) {
            Some(&first) if first != value => Err(BuildError::ConflictingValue {
                word: display(),
                first,
                second: value,
            }),
            Some(_) => Ok(()),
            None => {
                self.words.insert(key, value);
                Ok(())
            }
        }
    }

    pub fn extend_entries(&mut self, entries: &[WordEntry]) -> Result<(), BuildError> {
        for entry in entries {
            self.insert(&entry.word, entry.value)?;
        }
        Ok(())
    }

    /// Compile the collected words. An empty builder yields an empty graph.
    pub fn build(&self) -> Result<Vec<u8>, BuildError> {
        let trie = Trie::from_words(&self.words);
        let dag = Dag::minimize(&trie);
        let labels = LabelGraph::join(&dag);
        let bytes = labels.encode()?;

        log::debug!(
            "built DAFSA: {} words, {} trie nodes, {} dag nodes, {} labels, {} bytes",
            self.words.len(),
            trie.nodes.len(),
            dag.nodes.len(),
            labels.nodes.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Compile parsed entries into a graph.
pub fn build_dafsa(entries: &[WordEntry], reversed: bool) -> Result<Vec<u8>, BuildError> {
    let mut builder = DafsaBuilder::new().reversed(reversed);
    builder.extend_entries(entries)?;
    builder.build()
}

// =============================================================================
// Trie
// =============================================================================

struct TrieNode {
    byte: u8,
    children: BTreeMap<u8, usize>,
}

/// Trie over `word + [value]`. Node 0 is the root.
struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    fn from_words(words: &BTreeMap<Vec<u8>, u8>) -> Self {
        let mut nodes = vec![TrieNode {
            byte: 0,
            children: BTreeMap::new(),
        }];

        for (word, &value) in words {
            let mut current = 0;
            for &byte in word.iter().chain(std::iter::once(&value)) {
                current = match nodes[current].children.get(&byte) {
                    Some(&child) => child,
                    None => {
                        let child = nodes.len();
                        nodes.push(TrieNode {
                            byte,
                            children: BTreeMap::new(),
                        });
                        nodes[current].children.insert(byte, child);
                        child
                    }
                };
            }
        }

        Self { nodes }
    }
}

// =============================================================================
// Suffix Sharing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DagNode {
    byte: u8,
    children: Vec<usize>,
}

/// Trie with isomorphic subtrees merged.
struct Dag {
    nodes: Vec<DagNode>,
    roots: Vec<usize>,
}

impl Dag {
    fn minimize(trie: &Trie) -> Self {
        let mut nodes: Vec<DagNode> = Vec::new();
        let mut canonical: HashMap<DagNode, usize> = HashMap::new();
        let mut ids = vec![usize::MAX; trie.nodes.len()];

        // Children before parents, so child ids are known when hashing.
        let mut stack = vec![(0usize, false)];
        while let Some((index, expanded)) = stack.pop() {
            let node = &trie.nodes[index];
            if !expanded {
                stack.push((index, true));
                stack.extend(node.children.values().map(|&child| (child, false)));
                continue;
            }
            if index == 0 {
                continue;
            }
            let key = DagNode {
                byte: node.byte,
                children: node.children.values().map(|&child| ids[child]).collect(),
            };
            ids[index] = *canonical.entry(key).or_insert_with_key(|key| {
                nodes.push(key.clone());
                nodes.len() - 1
            });
        }

        let roots = trie.nodes[0]
            .children
            .values()
            .map(|&child| ids[child])
            .collect();
        Self { nodes, roots }
    }
}

// =============================================================================
// Label Joining
// =============================================================================

struct LabelNode {
    /// Characters of the run; a terminal code can only be last.
    label: Vec<u8>,
    children: Vec<usize>,
}

/// DAG with single-successor chains collapsed into label runs.
struct LabelGraph {
    nodes: Vec<LabelNode>,
    roots: Vec<usize>,
}

impl LabelGraph {
    fn join(dag: &Dag) -> Self {
        let count = dag.nodes.len();
        let mut parents = vec![0usize; count];
        for &child in dag.roots.iter().chain(dag.nodes.iter().flat_map(|n| &n.children)) {
            parents[child] += 1;
        }

        // A node folds into its parent when it is the parent's only child
        // and has no other parent.
        let mut absorbed = vec![false; count];
        for node in &dag.nodes {
            if let [only] = node.children[..] {
                if parents[only] == 1 {
                    absorbed[only] = true;
                }
            }
        }

        let mut heads = vec![usize::MAX; count];
        let mut order = Vec::new();
        for (index, &is_absorbed) in absorbed.iter().enumerate() {
            if !is_absorbed {
                heads[index] = order.len();
                order.push(index);
            }
        }

        let nodes = order
            .iter()
            .map(|&head| {
                let mut label = vec![dag.nodes[head].byte];
                let mut current = head;
                while let [only] = dag.nodes[current].children[..] {
                    if !absorbed[only] {
                        break;
                    }
                    current = only;
                    label.push(dag.nodes[current].byte);
                }
                LabelNode {
                    label,
                    children: dag.nodes[current]
                        .children
                        .iter()
                        .map(|&child| heads[child])
                        .collect(),
                }
            })
            .collect();

        Self {
            nodes,
            roots: dag.roots.iter().map(|&root| heads[root]).collect(),
        }
    }

    /// Children-first order of the reachable nodes.
    fn emission_order(&self) -> Vec<usize> {
        let mut done = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, bool)> = self.roots.iter().rev().map(|&r| (r, false)).collect();

        while let Some((index, expanded)) = stack.pop() {
            if done[index] {
                continue;
            }
            if expanded {
                done[index] = true;
                order.push(index);
                continue;
            }
            stack.push((index, true));
            for &child in self.nodes[index].children.iter().rev() {
                if !done[child] {
                    stack.push((child, false));
                }
            }
        }
        order
    }

    /// Lay nodes out so that parents precede children.
    ///
    /// The buffer is written back to front: when a node is emitted all of its
    /// children already have a known distance from the end of the buffer.
    fn encode(&self) -> Result<Vec<u8>, BuildError> {
        let mut reversed: Vec<u8> = Vec::new();
        let mut from_end = vec![0usize; self.nodes.len()];

        for index in self.emission_order() {
            let node = &self.nodes[index];
            if !node.children.is_empty() {
                let links = encode_links(&node.children, &from_end, reversed.len())?;
                reversed.extend(links.iter().rev());
            }
            if let Some((last, prefix)) = node.label.split_last() {
                reversed.push(last | END_OF_LABEL_FLAG);
                reversed.extend(prefix.iter().rev());
            }
            from_end[index] = reversed.len();
        }

        if !self.roots.is_empty() {
            let links = encode_links(&self.roots, &from_end, reversed.len())?;
            reversed.extend(links.iter().rev());
        }

        reversed.reverse();
        Ok(reversed)
    }
}

/// Encode the offset list for `children`, to be placed `current` bytes from
/// the end of the buffer.
///
/// Offset widths depend on the list's own size, so the size is guessed
/// high and shrunk until it matches the encoding.
fn encode_links(children: &[usize], from_end: &[usize], current: usize) -> Result<Vec<u8>, BuildError> {
    let mut targets: Vec<usize> = children.iter().map(|&child| from_end[child]).collect();
    // Nearest child first; offsets only move forward.
    targets.sort_unstable_by(|a, b| b.cmp(a));

    let mut guess = 3 * targets.len();
    loop {
        let mut buf = Vec::with_capacity(guess);
        let mut base = current + guess;
        let mut last_start = 0;
        for &target in &targets {
            let distance = base - target;
            last_start = buf.len();
            if !encode_offset(distance, &mut buf) {
                return Err(BuildError::GraphTooLarge { distance });
            }
            base = target;
        }

        if buf.len() == guess {
            buf[last_start] |= LAST_OFFSET_FLAG;
            return Ok(buf);
        }
        guess = buf.len();
    }
}
