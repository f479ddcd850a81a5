//! # suggest-tree
//!
//! A height-balanced (AVL) ordered map from string keys to payloads, with a
//! pruned prefix traversal for autocomplete lookups.
//!
//! Keys are ordered by plain `str` comparison, which for UTF-8 is codepoint
//! order. Comparison is case-sensitive.
//!
//! ## Example
//!
//! ```rust
//! use suggest_tree::AvlTree;
//!
//! let mut tree: AvlTree = AvlTree::new();
//! tree.insert("banana", 0);
//! tree.insert("band", 0);
//! tree.insert("apple", 0);
//!
//! let mut words = tree.words_with_prefix("ban");
//! words.sort_unstable();
//! assert_eq!(words, ["banana", "band"]);
//! assert_eq!(tree.get("apple"), Some(&0));
//! assert_eq!(tree.get("kiwi"), None);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

// =============================================================================
// Nodes
// =============================================================================

type Link<V> = Option<Box<Node<V>>>;

#[derive(Clone)]
struct Node<V> {
    key: String,
    value: V,
    /// Nodes on the longest path from here down to a leaf, this one included.
    height: u32,
    left: Link<V>,
    right: Link<V>,
}

impl<V> Node<V> {
    fn leaf(key: String, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    fn recalculate_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    #[inline]
    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

#[inline]
fn height<V>(link: &Link<V>) -> u32 {
    match link {
        Some(node) => node.height,
        None => 0,
    }
}

fn leftmost<V>(mut node: &Node<V>) -> &Node<V> {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node
}

// =============================================================================
// Rebalancing
// =============================================================================

/// `n.right` becomes the subtree root. Returns `n` untouched if it has no
/// right child.
fn rotate_left<V>(mut n: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut c) = n.right.take() else {
        return n;
    };
    n.right = c.left.take();
    n.recalculate_height();
    c.left = Some(n);
    c.recalculate_height();
    c
}

/// Mirror of [`rotate_left`].
fn rotate_right<V>(mut n: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut c) = n.left.take() else {
        return n;
    };
    n.left = c.right.take();
    n.recalculate_height();
    c.right = Some(n);
    c.recalculate_height();
    c
}

/// Recomputes the height of `n` and restores the balance invariant with at
/// most two rotations. A single insert or remove below `n` can only leave a
/// balance factor of +-2 here.
fn rebalance<V>(mut n: Box<Node<V>>) -> Box<Node<V>> {
    n.recalculate_height();

    match n.balance_factor() {
        -2 => {
            // Right-left: straighten the right child first.
            n.right = n.right.take().map(|right| {
                if height(&right.left) > height(&right.right) {
                    rotate_right(right)
                } else {
                    right
                }
            });
            rotate_left(n)
        }
        2 => {
            // Left-right: straighten the left child first.
            n.left = n.left.take().map(|left| {
                if height(&left.right) > height(&left.left) {
                    rotate_left(left)
                } else {
                    left
                }
            });
            rotate_right(n)
        }
        _ => n,
    }
}

// =============================================================================
// Recursive mutation
//
// Every call consumes the subtree it descends into and hands back the new
// subtree root, which the caller must store as its child (or as the root).
// =============================================================================

fn insert_node<V>(link: Link<V>, key: String, value: V) -> (Box<Node<V>>, Option<V>) {
    let Some(mut node) = link else {
        return (Node::leaf(key, value), None);
    };

    let old = match key.as_str().cmp(node.key.as_str()) {
        Ordering::Less => {
            let (left, old) = insert_node(node.left.take(), key, value);
            node.left = Some(left);
            old
        }
        Ordering::Greater => {
            let (right, old) = insert_node(node.right.take(), key, value);
            node.right = Some(right);
            old
        }
        Ordering::Equal => {
            // Heights are unchanged, nothing to rebalance.
            let old = std::mem::replace(&mut node.value, value);
            return (node, Some(old));
        }
    };

    (rebalance(node), old)
}

/// Returns the new subtree root and the removed entry, if `key` was present.
fn remove_node<V>(link: Link<V>, key: &str) -> (Link<V>, Option<(String, V)>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match key.cmp(node.key.as_str()) {
        Ordering::Less => {
            let (left, removed) = remove_node(node.left.take(), key);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove_node(node.right.take(), key);
            node.right = right;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (Some(left), Some(right)) => {
                // Take over the in-order successor's entry, then delete the
                // successor from the right subtree. It has no left child, so
                // that deletion is always a splice.
                let successor_key = leftmost(&right).key.clone();
                let (right, successor) = remove_node(Some(right), &successor_key);
                node.left = Some(left);
                node.right = right;
                successor.map(|(key, value)| {
                    (
                        std::mem::replace(&mut node.key, key),
                        std::mem::replace(&mut node.value, value),
                    )
                })
            }
            (left, right) => {
                let Node { key, value, .. } = *node;
                return (left.or(right).map(rebalance), Some((key, value)));
            }
        },
    };

    (Some(rebalance(node)), removed)
}

fn collect_prefix<'a, V>(link: &'a Link<V>, prefix: &str, out: &mut Vec<&'a str>) {
    let Some(node) = link else {
        return;
    };

    if node.key.starts_with(prefix) {
        // Matches may continue on both sides once the shared prefix is passed.
        out.push(&node.key);
        collect_prefix(&node.left, prefix, out);
        collect_prefix(&node.right, prefix, out);
    } else if prefix < node.key.as_str() {
        collect_prefix(&node.left, prefix, out);
    } else {
        collect_prefix(&node.right, prefix, out);
    }
}

// =============================================================================
// AvlTree
// =============================================================================

/// An AVL tree keyed by owned strings.
///
/// The payload defaults to `i64`, which is what the suggestion service stores
/// (always `0`). The tree is `Send + Sync` whenever `V` is, so a fully built
/// tree can be shared behind an `Arc` and queried from many threads at once.
/// Mutation needs `&mut self`, so it cannot race with readers.
#[derive(Clone)]
pub struct AvlTree<V = i64> {
    root: Link<V>,
    len: usize,
}

impl<V> AvlTree<V> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the root node, `0` for an empty tree.
    #[inline]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Inserts `key`, or overwrites its value in place if it is already
    /// stored. Returns the previous value on overwrite.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let (root, old) = insert_node(self.root.take(), key.into(), value);
        self.root = Some(root);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let (root, removed) = remove_node(self.root.take(), key);
        self.root = root;
        let (_, value) = removed?;
        self.len -= 1;
        Some(value)
    }

    /// Moves the entry at `old_key` to `new_key` with a fresh value.
    ///
    /// Equivalent to `remove(old_key)` followed by `insert(new_key, value)`;
    /// `new_key` is inserted even when `old_key` was missing. Returns the
    /// value removed from `old_key`.
    pub fn update(&mut self, old_key: &str, new_key: impl Into<String>, value: V) -> Option<V> {
        let removed = self.remove(old_key);
        self.insert(new_key, value);
        removed
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Every stored key that starts with `prefix`.
    ///
    /// Subtrees that cannot hold a match are skipped. Results come out in
    /// pre-order (a matching node before its children), not sorted; sort the
    /// result if order matters. The empty prefix matches every key.
    ///
    /// No normalization is applied to `prefix`, so case must match exactly.
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut out = Vec::new();
        collect_prefix(&self.root, prefix, &mut out);
        out
    }

    /// In-order (sorted) iteration over all entries.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height() as usize),
            remaining: self.len,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }
}

impl AvlTree<i64> {
    /// Builds a dictionary from a word sequence, inserting each word with
    /// payload `0` in sequence order. Repeated words collapse to one key.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        words.into_iter().map(|word| (word, 0)).collect()
    }
}

impl<V> Default for AvlTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for AvlTree<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for AvlTree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<V: fmt::Debug> fmt::Debug for AvlTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a AvlTree<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((node.key.as_str(), &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}


#[cfg(test)]
mod proptests;
