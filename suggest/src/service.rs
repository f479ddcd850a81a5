//! The shared dictionary behind the CLI and the HTTP endpoint.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use suggest_tree::AvlTree;
use tracing::{debug, info};

use crate::corpus;
use crate::error::Result;

/// A built dictionary that answers prefix queries.
///
/// The tree is published as an `Arc` and never mutated afterwards. Readers
/// take a snapshot (one `Arc` clone under a short read lock) and traverse it
/// without holding the lock. [`Suggester::reload`] builds a replacement off
/// to the side and swaps it in, so readers see either the old tree or the new
/// one, never a partially built one.
pub struct Suggester {
    tree: RwLock<Arc<AvlTree>>,
}

impl Suggester {
    /// Builds a dictionary from an already tokenized word sequence.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_tree(AvlTree::from_words(words))
    }

    /// Wraps a tree that was built elsewhere.
    pub fn from_tree(tree: AvlTree) -> Self {
        Self {
            tree: RwLock::new(Arc::new(tree)),
        }
    }

    /// Loads the corpus at `path` and builds a dictionary from it.
    pub fn from_corpus(path: impl AsRef<Path>) -> Result<Self> {
        let words = corpus::load(path)?;
        let suggester = Self::from_words(words);
        info!(
            keys = suggester.len(),
            height = suggester.snapshot().height(),
            "dictionary built"
        );
        Ok(suggester)
    }

    /// The tree currently being served.
    pub fn snapshot(&self) -> Arc<AvlTree> {
        Arc::clone(&self.tree.read())
    }

    /// Every stored word starting with `prefix`, in the tree's pre-order.
    ///
    /// `prefix` is used verbatim. Corpus words are lowercased, so a prefix
    /// containing uppercase letters never matches anything.
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        let tree = self.snapshot();
        let words: Vec<String> = tree
            .words_with_prefix(prefix)
            .into_iter()
            .map(str::to_owned)
            .collect();
        debug!(prefix, matches = words.len(), "prefix lookup");
        words
    }

    /// Whether `word` is in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.snapshot().contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// Whether the dictionary holds no words.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the dictionary with one built from `words`. Returns the new
    /// number of distinct words.
    pub fn reload<I, S>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tree = Arc::new(AvlTree::from_words(words));
        let len = tree.len();
        let previous = std::mem::replace(&mut *self.tree.write(), tree);
        info!(keys = len, previous_keys = previous.len(), "dictionary swapped");
        len
    }

    /// Re-reads the corpus at `path` and swaps the result in. On error the
    /// current dictionary stays in place.
    pub fn reload_corpus(&self, path: impl AsRef<Path>) -> Result<usize> {
        let words = corpus::load(path)?;
        Ok(self.reload(words))
    }
}
