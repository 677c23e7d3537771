use ahash::AHashMap;
use std::cmp::Reverse;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

pub type NodeId = u32;

const ROOT: NodeId = 0;

// Shared across every index so a cache can never confuse two vocabularies.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Default, Clone)]
struct TrieNode {
    children: AHashMap<char, NodeId>,
    terminal: bool,
    word: Option<String>,
    frequency: u32,
    popularity: u32,
    ordinal: u32,
}

/// Arena-backed trie over product names.
///
/// Node 0 is the root and stands for the empty prefix. Every other node is
/// reached through exactly one parent, so the arena is a plain tree and the
/// whole structure is released at once when the vocabulary is replaced.
pub struct PrefixIndex {
    nodes: Vec<TrieNode>,
    fold_case: bool,
    words: u32,
    generation: u64,
    traversals: AtomicU64,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PrefixIndex {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            fold_case: self.fold_case,
            words: self.words,
            generation: self.generation,
            traversals: AtomicU64::new(self.traversals.load(Ordering::Relaxed)),
        }
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::with_case_folding(true)
    }

    /// With folding disabled, words and queries are matched exactly as given.
    pub fn with_case_folding(fold_case: bool) -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            fold_case,
            words: 0,
            generation: next_generation(),
            traversals: AtomicU64::new(0),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        index.bulk_insert(words);
        index
    }

    pub fn normalize(&self, text: &str) -> String {
        if self.fold_case {
            text.trim().to_uppercase()
        } else {
            text.trim().to_string()
        }
    }

    pub fn insert(&mut self, word: &str) -> bool {
        let inserted = self.insert_word(word);
        if inserted {
            self.generation = next_generation();
        }
        inserted
    }

    /// Inserts every word in order. The generation moves once for the whole batch.
    pub fn bulk_insert<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0;
        for word in words {
            if self.insert_word(word.as_ref()) {
                count += 1;
            }
        }
        if count > 0 {
            self.generation = next_generation();
        }
        count
    }

    fn insert_word(&mut self, word: &str) -> bool {
        let normalized = self.normalize(word);
        if normalized.is_empty() {
            return false;
        }

        let mut curr = ROOT;
        for c in normalized.chars() {
            let next = match self.nodes[curr as usize].children.get(&c) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    self.nodes.push(TrieNode::default());
                    self.nodes[curr as usize].children.insert(c, child);
                    child
                }
            };
            curr = next;
            let node = &mut self.nodes[curr as usize];
            node.popularity = node.popularity.saturating_add(1);
        }

        let ordinal = self.words;
        let node = &mut self.nodes[curr as usize];
        if !node.terminal {
            node.terminal = true;
            node.word = Some(normalized);
            node.ordinal = ordinal;
            self.words += 1;
        }
        node.frequency = node.frequency.saturating_add(1);
        true
    }

    fn find(&self, prefix: &str) -> Option<NodeId> {
        let mut curr = ROOT;
        for c in prefix.chars() {
            curr = *self.nodes[curr as usize].children.get(&c)?;
        }
        Some(curr)
    }

    pub fn search(&self, word: &str) -> bool {
        let normalized = self.normalize(word);
        if normalized.is_empty() {
            return false;
        }
        self.find(&normalized)
            .map_or(false, |id| self.nodes[id as usize].terminal)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        let normalized = self.normalize(prefix);
        match self.find(&normalized) {
            // The root only counts when something has been inserted.
            Some(ROOT) => self.words > 0,
            Some(_) => true,
            None => false,
        }
    }

    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        self.suggest_within(prefix, limit, 0..=usize::MAX)
    }

    /// Ranked completions of `prefix` whose char length lies in `lengths`.
    ///
    /// Ordering: frequency descending, popularity descending, shorter words
    /// first, then first-insertion order.
    pub fn suggest_within(
        &self,
        prefix: &str,
        limit: usize,
        lengths: RangeInclusive<usize>,
    ) -> Vec<String> {
        if limit == 0 {
            return vec![];
        }
        let normalized = self.normalize(prefix);
        let Some(start) = self.find(&normalized) else {
            return vec![];
        };

        self.traversals.fetch_add(1, Ordering::Relaxed);

        let mut candidates: Vec<(&TrieNode, &str, usize)> = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            if let (true, Some(word)) = (node.terminal, node.word.as_deref()) {
                let len = word.chars().count();
                if lengths.contains(&len) {
                    candidates.push((node, word, len));
                }
            }
            stack.extend(node.children.values().copied());
        }

        candidates.sort_by_key(|(node, _, len)| {
            (
                Reverse(node.frequency),
                Reverse(node.popularity),
                *len,
                node.ordinal,
            )
        });
        candidates
            .into_iter()
            .take(limit)
            .map(|(_, word, _)| word.to_string())
            .collect()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(TrieNode::default());
        self.words = 0;
        self.generation = next_generation();
    }

    pub fn len(&self) -> usize {
        self.words as usize
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn fold_case(&self) -> bool {
        self.fold_case
    }

    /// Changes on every mutation; caches compare it to detect staleness.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of subtree traversals performed by `suggest` so far.
    pub fn traversal_count(&self) -> u64 {
        self.traversals.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    fn popularity_of(&self, prefix: &str) -> Option<u32> {
        let id = self.find(&self.normalize(prefix))?;
        Some(self.nodes[id as usize].popularity)
    }

    #[cfg(test)]
    fn frequency_of(&self, word: &str) -> Option<u32> {
        let id = self.find(&self.normalize(word))?;
        Some(self.nodes[id as usize].frequency)
    }
}
