use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, HashSet};

/// Checks ordering, balance and height bookkeeping for the subtree rooted at
/// `link`, whose keys must lie strictly between `lower` and `upper`.
/// Returns the computed height and node count.
fn validate_node<'a, V>(
    link: &'a Link<V>,
    lower: Option<&'a str>,
    upper: Option<&'a str>,
) -> (u32, usize) {
    let Some(node) = link else {
        return (0, 0);
    };

    if let Some(lower) = lower {
        assert!(lower < node.key.as_str(), "{lower:?} must sort before {:?}", node.key);
    }
    if let Some(upper) = upper {
        assert!(node.key.as_str() < upper, "{:?} must sort before {upper:?}", node.key);
    }

    let (left_h, left_n) = validate_node(&node.left, lower, Some(node.key.as_str()));
    let (right_h, right_n) = validate_node(&node.right, Some(node.key.as_str()), upper);

    assert!(
        left_h.abs_diff(right_h) <= 1,
        "unbalanced at {:?}: {left_h} vs {right_h}",
        node.key
    );
    assert_eq!(
        node.height,
        1 + left_h.max(right_h),
        "stored height must match children at {:?}",
        node.key
    );

    (node.height, left_n + right_n + 1)
}

fn validate_tree<V>(t: &AvlTree<V>) {
    let (h, n) = validate_node(&t.root, None, None);
    assert_eq!(h, t.height());
    assert_eq!(n, t.len, "reachable node count must match AvlTree::len");
}

/// Pre-order `(key, value, height)` triples, i.e. the exact tree shape.
fn shape<V: Clone>(t: &AvlTree<V>) -> Vec<(String, V, u32)> {
    fn rec<V: Clone>(link: &Link<V>, out: &mut Vec<(String, V, u32)>) {
        if let Some(node) = link {
            out.push((node.key.clone(), node.value.clone(), node.height));
            rec(&node.left, out);
            rec(&node.right, out);
        }
    }
    let mut out = Vec::new();
    rec(&t.root, &mut out);
    out
}

fn key_strategy() -> impl Strategy<Value = String> {
    // A small alphabet keeps collisions and shared prefixes frequent.
    "[abcdé]{0,5}"
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    "[abcdéA]{0,3}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "key_strategy()")] String, i64),
    #[proptest(weight = 25)]
    Remove(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 15)]
    Get(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 10)]
    Prefix(#[proptest(strategy = "prefix_strategy()")] String),
}

fn model_prefix(m: &BTreeMap<String, i64>, prefix: &str) -> Vec<String> {
    m.keys().filter(|k| k.starts_with(prefix)).cloned().collect()
}

fn sorted_prefix(t: &AvlTree, prefix: &str) -> Vec<String> {
    let mut got: Vec<String> = t.words_with_prefix(prefix).into_iter().map(String::from).collect();
    got.sort_unstable();
    got
}

fn unique_words() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::hash_set("[a-z]{1,8}", 100)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_flat_map(|words| (Just(words.clone()), Just(words).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        let mut t: AvlTree = AvlTree::new();
        let mut m: BTreeMap<String, i64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.insert(key.clone(), value), m.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key).copied(), m.get(&key).copied());
                }
                Op::Prefix(prefix) => {
                    prop_assert_eq!(sorted_prefix(&t, &prefix), model_prefix(&m, &prefix));
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<(&str, i64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(&str, i64)> = m.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_invariants_hold_after_every_op(ops in prop::collection::vec(any::<Op>(), 0..=200)) {
        let mut t: AvlTree = AvlTree::new();
        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    t.insert(key, value);
                }
                Op::Remove(key) => {
                    t.remove(&key);
                }
                Op::Get(_) | Op::Prefix(_) => {}
            }
            validate_tree(&t);
        }
    }

    #[test]
    fn prop_empty_prefix_returns_every_key(keys in prop::collection::vec(key_strategy(), 0..200)) {
        let t = AvlTree::from_words(keys.iter().cloned());
        let got = t.words_with_prefix("");
        prop_assert_eq!(got.len(), t.len());

        let got: HashSet<&str> = got.into_iter().collect();
        let expected: HashSet<&str> = keys.iter().map(String::as_str).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_prefix_has_no_false_positives_or_omissions(
        keys in prop::collection::vec(key_strategy(), 0..200),
        prefix in prefix_strategy(),
    ) {
        let t = AvlTree::from_words(keys.iter().cloned());
        let m: BTreeMap<String, i64> = keys.into_iter().map(|k| (k, 0)).collect();
        prop_assert_eq!(sorted_prefix(&t, &prefix), model_prefix(&m, &prefix));
    }

    #[test]
    fn prop_reinsert_only_updates_value(
        keys in prop::collection::vec(key_strategy(), 1..100),
        value in any::<i64>(),
    ) {
        let mut t = AvlTree::from_words(keys.iter().cloned());
        let len = t.len();
        for key in &keys {
            prop_assert!(t.insert(key.clone(), value).is_some());
            prop_assert_eq!(t.len(), len);
            prop_assert_eq!(t.get(key), Some(&value));
        }
        validate_tree(&t);
    }

    #[test]
    fn prop_remove_missing_is_noop(
        keys in prop::collection::vec("[ace]{1,4}", 0..100),
        missing in "[bdf]{1,4}",
    ) {
        // Interleaved alphabets: a miss can turn left and right on its way down.
        let mut t = AvlTree::from_words(keys);
        let before = shape(&t);
        prop_assert_eq!(t.remove(&missing), None);
        prop_assert_eq!(shape(&t), before);
        validate_tree(&t);
    }

    #[test]
    fn prop_remove_missing_is_noop_shared_alphabet(
        keys in prop::collection::vec(key_strategy(), 0..100),
        missing in key_strategy(),
    ) {
        prop_assume!(!keys.contains(&missing));
        let mut t = AvlTree::from_words(keys);
        let before = shape(&t);
        let len = t.len();
        prop_assert_eq!(t.remove(&missing), None);
        prop_assert_eq!(t.len(), len);
        prop_assert_eq!(shape(&t), before);
    }

    #[test]
    fn prop_remove_all_leaves_empty_tree((words, order) in unique_words()) {
        let mut t = AvlTree::from_words(words.iter().cloned());
        prop_assert_eq!(t.len(), 100);
        for word in &order {
            prop_assert_eq!(t.remove(word), Some(0));
            validate_tree(&t);
        }
        prop_assert!(t.is_empty());
        prop_assert!(t.root.is_none());
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [&str; 7] = ["a", "b", "c", "aa", "ab", "ba", "abc"];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t: AvlTree = AvlTree::new();
        let mut m: BTreeMap<String, i64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as i64;
            assert_eq!(t.insert(k, v), m.insert(k.to_owned(), v));
            validate_tree(&t);
        }

        let got: Vec<(&str, i64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(&str, i64)> = m.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(got, expected);

        for prefix in ["", "a", "ab", "b", "c", "d"] {
            assert_eq!(sorted_prefix(&t, prefix), model_prefix(&m, prefix));
        }
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let base_tree = AvlTree::from_words(SMALL_SET);
    validate_tree(&base_tree);

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base_tree.clone();

        for k in perm {
            assert_eq!(t.remove(k), Some(0));
            assert_eq!(t.get(k), None);
            validate_tree(&t);
        }
        assert_eq!(t.len(), 0);
        assert!(t.root.is_none());
    });
}

#[test]
fn remove_interior_misses_keep_shape() {
    let base_tree = AvlTree::from_words(["b", "d", "f", "h", "j", "l", "n"]);
    let before = shape(&base_tree);

    for missing in ["a", "c", "e", "g", "i", "k", "m", "o", "bb", "fa", "hz"] {
        let mut t = base_tree.clone();
        assert_eq!(t.remove(missing), None);
        assert_eq!(shape(&t), before, "removing {missing:?} changed the tree");
    }
}
