//! Character trie for prefix enumeration.
//!
//! Children are kept in the order they were first created, so enumeration
//! follows insertion order rather than alphabetical order.
//!
//! # Examples
//!
//! ```
//! use sentilex::prefix::trie::Trie;
//!
//! let mut trie = Trie::new();
//! for word in ["be", "bear", "bell", "build"] {
//!     trie.insert(word);
//! }
//!
//! assert_eq!(trie.search_prefix("be"), vec!["be", "bear", "bell"]);
//! assert!(trie.search_prefix("x").is_empty());
//! ```

#[derive(Debug, Clone, Default)]
struct TrieNode {
    key: char,
    end_of_word: bool,
    children: Vec<TrieNode>,
}

impl TrieNode {
    fn new(key: char) -> Self {
        TrieNode {
            key,
            end_of_word: false,
            children: Vec::new(),
        }
    }

    fn child(&self, key: char) -> Option<&TrieNode> {
        self.children.iter().find(|child| child.key == key)
    }

    fn child_or_insert(&mut self, key: char) -> &mut TrieNode {
        let position = match self.children.iter().position(|child| child.key == key) {
            Some(position) => position,
            None => {
                self.children.push(TrieNode::new(key));
                self.children.len() - 1
            }
        };
        &mut self.children[position]
    }

    fn collect(&self, buffer: &mut String, out: &mut Vec<String>) {
        if self.end_of_word {
            out.push(buffer.clone());
        }
        for child in &self.children {
            buffer.push(child.key);
            child.collect(buffer, out);
            buffer.pop();
        }
    }
}

/// Insert-only trie over word characters.
#[derive(Debug, Clone, Default)]
pub struct Trie {
    root: TrieNode,
    len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `word`. Returns `false` if it was already present or empty.
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        for key in word.chars() {
            node = node.child_or_insert(key);
        }

        if node.end_of_word {
            return false;
        }
        node.end_of_word = true;
        self.len += 1;
        true
    }

    /// Whether any stored word starts with `prefix`.
    ///
    /// The empty prefix matches whenever the trie holds a word.
    pub fn search(&self, prefix: &str) -> bool {
        match self.find(prefix) {
            Some(node) => node.end_of_word || !node.children.is_empty(),
            None => false,
        }
    }

    /// Every stored word starting with `prefix`, in child-insertion order.
    ///
    /// The empty prefix enumerates the whole vocabulary.
    pub fn search_prefix(&self, prefix: &str) -> Vec<String> {
        let mut words = Vec::new();
        if let Some(node) = self.find(prefix) {
            let mut buffer = prefix.to_string();
            node.collect(&mut buffer, &mut words);
        }
        words
    }

    /// Whether `word` itself is stored.
    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty() && self.find(word).is_some_and(|node| node.end_of_word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        prefix
            .chars()
            .try_fold(&self.root, |node, key| node.child(key))
    }
}
