//! AVL tree ranking records by a numeric key.
//!
//! Each node stores the key it was inserted with and the [`RecordId`] of the
//! record it ranks. The record itself stays in the
//! [`HashIndex`](crate::store::hash_index::HashIndex); the tree never copies
//! or frees it. Equal keys are allowed and ordered by insertion (ties descend
//! right), so a node is identified by its key *and* its record id.
//!
//! A record whose key field changes must be removed before the change and
//! reinserted after it, otherwise the node's key no longer matches the
//! record and the node cannot be found again.
//!
//! # Examples
//!
//! ```
//! use sentilex::ranking::key::RankBy;
//! use sentilex::ranking::tree::RankingTree;
//! use sentilex::store::hash_index::HashIndex;
//!
//! let mut index = HashIndex::new(31).unwrap();
//! let mut tree = RankingTree::new(RankBy::Score);
//!
//! for (word, score) in [("dull", 0.5), ("fine", 2.0), ("superb", 4.0)] {
//!     let (_, key) = index.insert(word, score).unwrap();
//!     let id = index.record_id(key).unwrap();
//!     assert!(tree.insert(id, index.record(id).unwrap()));
//! }
//!
//! let best: Vec<&str> = tree
//!     .rank_greatest(2)
//!     .iter()
//!     .map(|ranked| index.record(ranked.record).unwrap().word())
//!     .collect();
//! assert_eq!(best, vec!["superb", "fine"]);
//! ```

use std::cmp::max;

use serde::{Deserialize, Serialize};

use crate::ranking::key::RankBy;
use crate::store::record::{Record, RecordId};

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    key: f64,
    record: RecordId,
    left: Link,
    right: Link,
    height: i32,
    balance: i32,
}

impl Node {
    fn leaf(key: f64, record: RecordId) -> Box<Node> {
        Box::new(Node {
            key,
            record,
            left: None,
            right: None,
            height: 1,
            balance: 0,
        })
    }

    fn update(&mut self) {
        let left = height(&self.left);
        let right = height(&self.right);
        self.height = 1 + max(left, right);
        self.balance = left - right;
    }
}

fn height(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// A ranked entry: the record and the key it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ranked {
    pub record: RecordId,
    pub key: f64,
}

/// Height-balanced binary search tree over record keys.
#[derive(Debug)]
pub struct RankingTree {
    root: Link,
    rank_by: RankBy,
    len: usize,
}

impl RankingTree {
    /// Create an empty tree ordered by `rank_by`.
    pub fn new(rank_by: RankBy) -> Self {
        RankingTree {
            root: None,
            rank_by,
            len: 0,
        }
    }

    /// Rank `record` (stored under `id`).
    ///
    /// Returns `false` without touching the tree when the record's key is not
    /// valid for this tree's accessor.
    pub fn insert(&mut self, id: RecordId, record: &Record) -> bool {
        let key = self.rank_by.key(record);
        if !self.rank_by.is_valid_key(key) {
            return false;
        }

        self.root = Some(insert_node(self.root.take(), key, id));
        self.len += 1;
        true
    }

    /// Remove the node ranking `record` (stored under `id`).
    ///
    /// `record` must still carry the key it was inserted with. Returns
    /// `false` when no such node exists.
    pub fn remove(&mut self, id: RecordId, record: &Record) -> bool {
        if self.root.is_none() {
            return false;
        }

        let key = self.rank_by.key(record);
        let (root, removed) = remove_node(self.root.take(), key, id);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Check whether `record` (stored under `id`) is ranked.
    pub fn search(&self, id: RecordId, record: &Record) -> bool {
        search_node(self.root.as_deref(), self.rank_by.key(record), id)
    }

    /// The `n` entries with the greatest keys, greatest first.
    pub fn rank_greatest(&self, n: usize) -> Vec<Ranked> {
        self.iter_descending().take(n).collect()
    }

    /// The `n` entries with the lowest keys, lowest first.
    pub fn rank_lowest(&self, n: usize) -> Vec<Ranked> {
        self.iter_ascending().take(n).collect()
    }

    /// Walk entries from the lowest key up.
    pub fn iter_ascending(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), Direction::Ascending)
    }

    /// Walk entries from the greatest key down.
    pub fn iter_descending(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), Direction::Descending)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of ranked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    pub fn rank_by(&self) -> RankBy {
        self.rank_by
    }

    /// Drop every node. The accessor is kept.
    pub fn clear(&mut self) {
        // Unlink iteratively so deep trees do not recurse in Drop.
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.len = 0;
    }

    /// Verify stored heights and balance factors, and that every balance
    /// factor lies in `[-1, 1]`.
    pub fn is_balanced(&self) -> bool {
        checked_height(&self.root).is_some()
    }

    /// Verify that an in-order walk yields non-decreasing keys.
    pub fn is_ordered(&self) -> bool {
        let mut previous = f64::NEG_INFINITY;
        self.iter_ascending().all(|ranked| {
            let ordered = previous <= ranked.key;
            previous = ranked.key;
            ordered
        })
    }
}

impl Drop for RankingTree {
    fn drop(&mut self) {
        self.clear();
    }
}

fn insert_node(link: Link, key: f64, record: RecordId) -> Box<Node> {
    match link {
        None => Node::leaf(key, record),
        Some(mut node) => {
            if key < node.key {
                node.left = Some(insert_node(node.left.take(), key, record));
            } else {
                node.right = Some(insert_node(node.right.take(), key, record));
            }
            rebalance(node)
        }
    }
}

fn remove_node(link: Link, key: f64, record: RecordId) -> (Link, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };

    let removed = if key < node.key {
        let (left, removed) = remove_node(node.left.take(), key, record);
        node.left = left;
        removed
    } else if key > node.key {
        let (right, removed) = remove_node(node.right.take(), key, record);
        node.right = right;
        removed
    } else if node.record == record {
        return (remove_root(node), true);
    } else {
        // Equal key, other record: rotations may have put it on either side.
        let (left, mut removed) = remove_node(node.left.take(), key, record);
        node.left = left;
        if !removed {
            let (right, found) = remove_node(node.right.take(), key, record);
            node.right = right;
            removed = found;
        }
        removed
    };

    if !removed {
        return (Some(node), false);
    }
    (Some(rebalance(node)), true)
}

/// Unlink `node` from its subtree and return what replaces it.
fn remove_root(mut node: Box<Node>) -> Link {
    match (node.left.take(), node.right.take()) {
        (Some(left), Some(right)) => {
            let (left, predecessor) = take_greatest(left);
            node.key = predecessor.key;
            node.record = predecessor.record;
            node.left = left;
            node.right = Some(right);
            Some(rebalance(node))
        }
        (Some(child), None) | (None, Some(child)) => Some(child),
        (None, None) => None,
    }
}

/// Detach the greatest-keyed node of the subtree rooted at `node`.
fn take_greatest(mut node: Box<Node>) -> (Link, Box<Node>) {
    match node.right.take() {
        Some(right) => {
            let (rest, greatest) = take_greatest(right);
            node.right = rest;
            (Some(rebalance(node)), greatest)
        }
        None => {
            let left = node.left.take();
            (left, node)
        }
    }
}

fn search_node(mut link: Option<&Node>, key: f64, record: RecordId) -> bool {
    while let Some(node) = link {
        if key < node.key {
            link = node.left.as_deref();
        } else if key > node.key {
            link = node.right.as_deref();
        } else if node.record == record {
            return true;
        } else {
            return search_node(node.left.as_deref(), key, record)
                || search_node(node.right.as_deref(), key, record);
        }
    }
    false
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update();

    if node.balance < -1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance > 0 {
                rotate_right(right)
            } else {
                right
            });
        }
        rotate_left(node)
    } else if node.balance > 1 {
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance < 0 {
                rotate_left(left)
            } else {
                left
            });
        }
        rotate_right(node)
    } else {
        node
    }
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update();
    pivot.left = Some(node);
    pivot.update();
    pivot
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update();
    pivot.right = Some(node);
    pivot.update();
    pivot
}

fn checked_height(link: &Link) -> Option<i32> {
    let Some(node) = link else {
        return Some(0);
    };

    let left = checked_height(&node.left)?;
    let right = checked_height(&node.right)?;
    let balance = left - right;
    let consistent = node.height == 1 + max(left, right) && node.balance == balance;

    (consistent && balance.abs() <= 1).then_some(node.height)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

/// In-order walk driven by an explicit stack.
///
/// Each node is pushed once when its spine is descended and popped once when
/// emitted, so the walk costs `O(h + k)` for the first `k` entries.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    direction: Direction,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>, direction: Direction) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            direction,
        };
        iter.descend(root);
        iter
    }

    fn descend(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = match self.direction {
                Direction::Ascending => node.left.as_deref(),
                Direction::Descending => node.right.as_deref(),
            };
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = Ranked;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let next = match self.direction {
            Direction::Ascending => node.right.as_deref(),
            Direction::Descending => node.left.as_deref(),
        };
        self.descend(next);

        Some(Ranked {
            record: node.record,
            key: node.key,
        })
    }
}
