//! Module provide ordered-set implemented by [OSet] type.
//!
//! OSet is implemented using [left-leaning-red-black][wiki-llrb], with
//! the total order over keys injected as a comparator function.
//!
//! - Each entry in OSet instance correspond to a unique key.
//! - Parametrised over `key-type` and a comparator over keys.
//! - Mutation via insert(), remove() api.
//! - Membership via contains(), extrema via min(), max().
//! - Full table scan, to iterate over all keys in sort order.
//! - Level order scan, to iterate over all keys breadth first.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! [OSet] instance and its API uses Rust's ownership model and borrow
//! semantics to ensure safe operation.
//!
//! Constructing a new [OSet] instance and mutating it:
//! ```
//! use oset::OSet;
//!
//! let mut index = OSet::new(|a: &String, b: &String| a.cmp(b));
//!
//! index.insert("key1".to_string()).unwrap();
//! index.insert("key2".to_string()).unwrap();
//! assert!(index.insert("key1".to_string()).is_err());
//!
//! let n = index.len();
//! assert_eq!(n, 2);
//!
//! index.remove(&"key1".to_string()).unwrap();
//! assert_eq!(index.len(), 1);
//! ```
//!
//! Full table scan:
//! ```
//! use oset::OSet;
//!
//! let mut index = OSet::new(|a: &String, b: &String| a.cmp(b));
//! index.insert("key1".to_string()).unwrap();
//! index.insert("key2".to_string()).unwrap();
//!
//! for (i, key) in index.iter().enumerate() {
//!     let refkey = format!("key{}", i + 1);
//!     assert_eq!(&refkey, key);
//! }
//! ```
//!
//! Level order scan:
//! ```
//! use oset::OSet;
//!
//! let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
//! for key in vec![2, 1, 3] {
//!     index.insert(key).unwrap();
//! }
//!
//! let keys: Vec<i32> = index.level_order().copied().collect();
//! assert_eq!(keys, vec![2, 1, 3]);
//! ```
//!
//! [wiki-llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree

use std::{
    cmp::Ordering,
    collections::VecDeque,
    fmt,
    ops::{Deref, DerefMut},
};

use crate::{Error, Result};

/// OSet manage a single instance of in-memory ordered-set using
/// [left-leaning-red-black][llrb] tree.
///
/// Sort order is decided by the comparator supplied to [OSet::new],
/// not by the key type.
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
pub struct OSet<K, C> {
    root: Option<Box<Node<K>>>,
    n_count: usize, // number of entries in the tree.
    cmp: C,
}

impl<K, C> OSet<K, C> {
    /// Create an empty instance of OSet. The comparator `cmp` must be a
    /// total order over the key type and it stays with this instance for
    /// its lifetime.
    pub fn new(cmp: C) -> OSet<K, C>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        OSet {
            root: None,
            n_count: Default::default(),
            cmp,
        }
    }
}

/// Maintenance API.
impl<K, C> OSet<K, C> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    #[allow(dead_code)]
    #[cfg(test)]
    pub fn pretty_print(&self)
    where
        K: fmt::Debug,
    {
        if let Some(n) = self.root.as_ref() {
            n.as_ref().pretty_print("".to_string())
        }
    }
}

impl<K, C> OSet<K, C> {
    /// Insert key into this instance. If key is already present, as
    /// decided by the comparator, return [Error::DuplicateKey] and leave
    /// the tree untouched.
    pub fn insert(&mut self, key: K) -> Result<()>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        if self.contains(&key) {
            return err_at!(DuplicateKey, msg: "key already present");
        }

        let mut root = Self::do_insert(self.root.take(), key, &self.cmp);
        root.set_black();
        self.root = Some(root);
        self.n_count += 1;

        Ok(())
    }

    /// Remove key from this instance. If the tree is empty return
    /// [Error::EmptyTree], if key is not present return
    /// [Error::KeyNotFound]. Either way the tree is left untouched.
    pub fn remove(&mut self, key: &K) -> Result<()>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        if self.root.is_none() {
            return err_at!(EmptyTree, msg: "remove from empty tree");
        }
        if !self.contains(key) {
            return err_at!(KeyNotFound, msg: "missing key");
        }

        self.root = match Self::do_remove(self.root.take(), key, &self.cmp) {
            Some(mut root) => {
                root.set_black();
                Some(root)
            }
            None => None,
        };
        self.n_count -= 1;

        Ok(())
    }

    /// Validate LLRB tree with following rules:
    ///
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * A right child can be red only when the left child is also red.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sort order, as decided by the comparator.
    /// * Make sure number of entries in the tree match [OSet::len].
    pub fn validate(&self) -> Result<()>
    where
        K: fmt::Debug,
        C: Fn(&K, &K) -> Ordering,
    {
        let root = self.root.as_ref().map(Deref::deref);
        let (n_count, n_blacks, depth) = (0, 0, 1);
        let (n_count, _) =
            Self::validate_tree(root, &self.cmp, is_red(root), n_count, n_blacks, depth)?;
        if n_count != self.n_count {
            err_at!(Fatal, msg: "mismatch in count {} != {}", n_count, self.n_count)?;
        }
        Ok(())
    }
}

impl<K, C> OSet<K, C> {
    /// Check whether key is present in this instance.
    pub fn contains(&self, key: &K) -> bool
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let mut node = self.root.as_ref().map(Deref::deref);
        while let Some(nref) = node {
            node = match (self.cmp)(key, nref.as_key()) {
                Ordering::Less => nref.as_left_ref(),
                Ordering::Greater => nref.as_right_ref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Return the smallest key in this instance, as decided by the
    /// comparator. Return [Error::EmptyTree] if the tree is empty.
    ///
    /// ```
    /// use oset::OSet;
    ///
    /// let mut index = OSet::new(|a: &u64, b: &u64| a.cmp(b));
    /// assert!(index.min().is_err());
    ///
    /// index.insert(42).unwrap();
    /// index.insert(7).unwrap();
    /// assert_eq!(*index.min().unwrap(), 7);
    /// assert_eq!(*index.max().unwrap(), 42);
    /// ```
    pub fn min(&self) -> Result<&K> {
        let mut node = match self.root.as_ref().map(Deref::deref) {
            Some(node) => node,
            None => return err_at!(EmptyTree, msg: "min from empty tree"),
        };
        while let Some(left) = node.as_left_ref() {
            node = left;
        }
        Ok(node.as_key())
    }

    /// Return the largest key in this instance, as decided by the
    /// comparator. Return [Error::EmptyTree] if the tree is empty.
    pub fn max(&self) -> Result<&K> {
        let mut node = match self.root.as_ref().map(Deref::deref) {
            Some(node) => node,
            None => return err_at!(EmptyTree, msg: "max from empty tree"),
        };
        while let Some(right) = node.as_right_ref() {
            node = right;
        }
        Ok(node.as_key())
    }

    /// Return an iterator over all keys in this instance, in sort order.
    ///
    /// ```
    /// use oset::OSet;
    ///
    /// let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
    /// for key in vec![2, 1, 3] {
    ///     index.insert(key).unwrap();
    /// }
    ///
    /// let keys: Vec<i32> = index.iter().copied().collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<K> {
        let node = self.root.as_ref().map(Deref::deref);

        let mut paths = Vec::default();
        build_iter(IFlag::Left, node, &mut paths);

        Iter { paths }
    }

    /// Return an iterator over all keys in this instance, level by level
    /// starting from the root. Within a level keys show up left to right.
    ///
    /// ```
    /// use oset::OSet;
    ///
    /// let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
    /// for key in vec![2, 1, 3] {
    ///     index.insert(key).unwrap();
    /// }
    ///
    /// let keys: Vec<i32> = index.level_order().copied().collect();
    /// assert_eq!(keys, vec![2, 1, 3]);
    /// ```
    pub fn level_order(&self) -> LevelOrder<K> {
        let mut queue = VecDeque::new();
        if let Some(root) = self.root.as_ref() {
            queue.push_back(root.as_ref());
        }
        LevelOrder { queue }
    }

    /// Return a read-only reference to the root node, if the tree is
    /// non-empty. Tools that render the tree shape can walk the whole
    /// graph from here, via [Node::as_left_ref] and [Node::as_right_ref].
    ///
    /// ```
    /// use oset::{Color, OSet};
    ///
    /// let mut index = OSet::new(|a: &i32, b: &i32| a.cmp(b));
    /// index.insert(10).unwrap();
    /// index.insert(20).unwrap();
    ///
    /// let root = index.as_root().unwrap();
    /// assert_eq!(*root.as_key(), 20);
    /// assert_eq!(root.to_color(), Color::Black);
    ///
    /// let left = root.as_left_ref().unwrap();
    /// assert_eq!(*left.as_key(), 10);
    /// assert_eq!(left.to_color(), Color::Red);
    /// assert!(root.as_right_ref().is_none());
    /// ```
    pub fn as_root(&self) -> Option<&Node<K>> {
        self.root.as_ref().map(Deref::deref)
    }
}

type Remmin<K> = (Option<Box<Node<K>>>, Option<Node<K>>);

impl<K, C> OSet<K, C> {
    fn do_insert(node: Option<Box<Node<K>>>, key: K, cmp: &C) -> Box<Node<K>>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let mut node = match node {
            Some(node) => node,
            None => return Box::new(Node::new(key)),
        };

        node = walkdown_rot234(node);

        match cmp(&key, node.as_key()) {
            Ordering::Less => {
                let left = Self::do_insert(node.left.take(), key, cmp);
                node.left = Some(left);
            }
            Ordering::Greater => {
                let right = Self::do_insert(node.right.take(), key, cmp);
                node.right = Some(right);
            }
            Ordering::Equal => panic!("do_insert(): duplicate key, call the programmer"),
        }

        walkuprot_234(node)
    }

    fn do_remove(node: Option<Box<Node<K>>>, key: &K, cmp: &C) -> Option<Box<Node<K>>>
    where
        C: Fn(&K, &K) -> Ordering,
    {
        let mut node = match node {
            None => return None,
            Some(node) => node,
        };

        if cmp(key, node.as_key()) == Ordering::Less {
            if node.left.is_none() {
                Some(node)
            } else {
                let ok = !is_red(node.as_left_ref());
                if ok && !is_red(node.left.as_ref().unwrap().as_left_ref()) {
                    node = move_red_left(node);
                }
                let left = Self::do_remove(node.left.take(), key, cmp);
                node.left = left;
                Some(fixup(node))
            }
        } else {
            if is_red(node.as_left_ref()) {
                node = rotate_right(node);
            }

            if cmp(key, node.as_key()) == Ordering::Equal && node.right.is_none() {
                return None;
            }

            let ok = node.right.is_some() && !is_red(node.as_right_ref());
            if ok && !is_red(node.right.as_ref().unwrap().as_left_ref()) {
                node = move_red_right(node);
            }

            if cmp(key, node.as_key()) == Ordering::Equal {
                // node is the target, graft its successor in its place.
                let (right, sub_node) = Self::remove_min(node.right.take());
                node.right = right;
                let sub_node = match sub_node {
                    Some(sub_node) => sub_node,
                    None => panic!("do_remove(): fatal logic, call the programmer"),
                };
                let mut newnode = Box::new(Node::new(sub_node.key));
                newnode.left = node.left.take();
                newnode.right = node.right.take();
                newnode.color = node.color;
                Some(fixup(newnode))
            } else {
                let right = Self::do_remove(node.right.take(), key, cmp);
                node.right = right;
                Some(fixup(node))
            }
        }
    }

    fn remove_min(node: Option<Box<Node<K>>>) -> Remmin<K> {
        if node.is_none() {
            return (None, None);
        }
        let mut node = node.unwrap();
        if node.left.is_none() {
            return (None, Some(*node));
        }
        let left = node.as_left_ref();
        if !is_red(left) && !is_red(left.unwrap().as_left_ref()) {
            node = move_red_left(node);
        }
        let (left, sub_node) = Self::remove_min(node.left.take());
        node.left = left;
        (Some(fixup(node)), sub_node)
    }

    fn validate_tree(
        node: Option<&Node<K>>,
        cmp: &C,
        fromred: bool,
        mut n_count: usize,
        mut n_blacks: usize,
        depth: usize,
    ) -> Result<(usize, usize)>
    where
        K: fmt::Debug,
        C: Fn(&K, &K) -> Ordering,
    {
        let node = match node {
            Some(node) => node,
            None => return Ok((n_count, n_blacks)),
        };
        n_count += 1;

        let red = is_red(Some(node));
        if fromred && red {
            return err_at!(Fatal, msg: "consecutive reds")?;
        }

        if !red {
            n_blacks += 1;
        }

        let (left, rigt) = (node.as_left_ref(), node.as_right_ref());
        if is_red(rigt) && !is_red(left) {
            return err_at!(Fatal, msg: "right leaning red {:?}", node.as_key())?;
        }

        let (n_count, lb) = Self::validate_tree(left, cmp, red, n_count, n_blacks, depth + 1)?;
        let (n_count, rb) = Self::validate_tree(rigt, cmp, red, n_count, n_blacks, depth + 1)?;
        if lb != rb {
            err_at!(Fatal, msg: "unbalanced blacks {} {}", lb, rb)?;
        }

        if let Some(left) = left {
            if cmp(left.as_key(), node.as_key()) != Ordering::Less {
                err_at!(Fatal, msg: "sort lkey:{:?} parent:{:?}", left.as_key(), node.as_key())?;
            }
        }
        if let Some(rigt) = rigt {
            if cmp(rigt.as_key(), node.as_key()) != Ordering::Greater {
                err_at!(Fatal, msg: "sort rkey:{:?} parent:{:?}", rigt.as_key(), node.as_key())?;
            }
        }

        Ok((n_count, lb))
    }
}

fn is_red<K>(node: Option<&Node<K>>) -> bool {
    node.map_or(false, |node| !node.is_black())
}

fn is_black<K>(node: Option<&Node<K>>) -> bool {
    node.map_or(true, |node| node.is_black())
}

//--------- rotation routines for 2-3-4 algorithm ----------------

// Going down, split a 4-node by pushing a red link up, so that the
// node reached at the bottom always has room for one more red.
fn walkdown_rot234<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    if is_red(node.as_left_ref()) && is_red(node.as_right_ref()) {
        flip(node.deref_mut());
    }
    node
}

// Coming back up, straighten a right leaning red and then split a
// left chain of two reds. 4-nodes are left alone, the next walkdown
// through them splits.
fn walkuprot_234<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    if is_red(node.as_right_ref()) {
        node = rotate_left(node);
    }
    let left = node.as_left_ref();
    if is_red(left) && is_red(left.unwrap().as_left_ref()) {
        node = rotate_right(node);
    }
    node
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//             /    (r)                 (r)  \
//            /       \                 /     \
//          left       x             node      xr
//                    / \            /  \
//                  xl   xr       left   xl
//
fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    if is_black(node.as_right_ref()) {
        panic!("rotateleft(): rotating a black link ? Call the programmer");
    }
    let mut x = node.right.take().unwrap();
    node.right = x.left.take();
    x.color = node.color;
    node.set_red();
    x.left = Some(node);
    x
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//            (r)   \                   (r)  \
//           /       \                 /      \
//          x       right             xl      node
//         / \                                / \
//       xl   xr                             xr  right
//
fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    if is_black(node.as_left_ref()) {
        panic!("rotateright(): rotating a black link ? Call the programmer")
    }
    let mut x = node.left.take().unwrap();
    node.left = x.right.take();
    x.color = node.color;
    node.set_red();
    x.right = Some(node);
    x
}

//        (x)                   (!x)
//         |                     |
//        node                  node
//        / \                   / \
//      (y) (z)              (!y) (!z)
//     /      \              /      \
//   left    right         left    right
//
fn flip<K>(node: &mut Node<K>) {
    if let Some(left) = node.left.as_mut() {
        left.toggle_link();
    }
    if let Some(right) = node.right.as_mut() {
        right.toggle_link();
    }
    node.toggle_link();
}

fn fixup<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    if is_red(node.as_right_ref()) {
        node = rotate_left(node);
    }

    let left = node.as_left_ref();
    if is_red(left) && is_red(left.unwrap().as_left_ref()) {
        node = rotate_right(node);
    }

    if is_red(node.as_left_ref()) && is_red(node.as_right_ref()) {
        flip(node.deref_mut());
    }

    // straighten a right leaning red one level down.
    let ok = match node.as_left_ref() {
        Some(left) => is_red(left.as_right_ref()) && !is_red(left.as_left_ref()),
        None => false,
    };
    if ok {
        node.left = Some(rotate_left(node.left.take().unwrap()));
        if is_red(node.as_left_ref()) {
            node = rotate_right(node);
        }
    }

    node
}

fn move_red_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    flip(node.deref_mut());
    if is_red(node.right.as_ref().unwrap().as_left_ref()) {
        node.right = Some(rotate_right(node.right.take().unwrap()));
        node = rotate_left(node);
        flip(node.deref_mut());
        if is_red(node.right.as_ref().unwrap().as_right_ref()) {
            node.right = Some(rotate_left(node.right.take().unwrap()));
        }
    }
    node
}

fn move_red_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    flip(node.deref_mut());
    if is_red(node.left.as_ref().unwrap().as_left_ref()) {
        node = rotate_right(node);
        flip(node.deref_mut());
    }
    node
}

/// Iterator type, to do full table scan over [OSet] in sort order.
pub struct Iter<'a, K> {
    paths: Vec<Fragment<'a, K>>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = self.paths.last_mut()?;
            match path.flag {
                IFlag::Left => {
                    path.flag = IFlag::Center;
                    break Some(path.node.as_key());
                }
                IFlag::Center => {
                    path.flag = IFlag::Right;
                    let right = path.node.right.as_ref().map(AsRef::as_ref);
                    build_iter(IFlag::Left, right, &mut self.paths)
                }
                IFlag::Right => {
                    self.paths.pop();
                }
            }
        }
    }
}

/// Iterator type, to scan [OSet] keys level by level starting from the
/// root, left child before right child.
pub struct LevelOrder<'a, K> {
    queue: VecDeque<&'a Node<K>>,
}

impl<'a, K> Iterator for LevelOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        if let Some(left) = node.as_left_ref() {
            self.queue.push_back(left);
        }
        if let Some(right) = node.as_right_ref() {
            self.queue.push_back(right);
        }
        Some(node.as_key())
    }
}

/// Color of a node. A fresh node enter the tree red.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// Node corresponds to a single key within [OSet] instance.
///
/// Holds the key, the color and the two child links. Only the read-only
/// view is public, mutation stays within this module.
pub struct Node<K> {
    key: K,
    color: Color,                // store: red or black
    left: Option<Box<Node<K>>>,  // store: left child
    right: Option<Box<Node<K>>>, // store: right child
}

impl<K> Node<K> {
    fn new(key: K) -> Node<K> {
        Node {
            key,
            color: Color::Red,
            left: None,
            right: None,
        }
    }
}

/// Read-only view into the tree shape, for tools that render it.
impl<K> Node<K> {
    /// Return a reference to this node's key.
    #[inline]
    pub fn as_key(&self) -> &K {
        &self.key
    }

    /// Return a reference to the left child, if present.
    #[inline]
    pub fn as_left_ref(&self) -> Option<&Node<K>> {
        self.left.as_ref().map(AsRef::as_ref)
    }

    /// Return a reference to the right child, if present.
    #[inline]
    pub fn as_right_ref(&self) -> Option<&Node<K>> {
        self.right.as_ref().map(AsRef::as_ref)
    }

    /// Return this node's color.
    #[inline]
    pub fn to_color(&self) -> Color {
        self.color
    }

    /// Check whether this node is black.
    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }
}

impl<K> Node<K> {
    #[inline]
    fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    fn toggle_link(&mut self) {
        self.color = match self.color {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    #[allow(dead_code)]
    #[cfg(test)]
    fn pretty_print(&self, mut prefix: String)
    where
        K: fmt::Debug,
    {
        match self.color {
            Color::Black => println!("{}(b)<{:?}>", prefix, self.key),
            Color::Red => println!("{}(r)<{:?}>", prefix, self.key),
        }
        prefix.push_str("  ");
        if let Some(l) = self.left.as_ref() {
            l.pretty_print(prefix.clone())
        }
        if let Some(r) = self.right.as_ref() {
            r.pretty_print(prefix)
        }
    }
}

#[derive(Copy, Clone)]
enum IFlag {
    Left,
    Center,
    Right,
}

struct Fragment<'a, K> {
    flag: IFlag,
    node: &'a Node<K>,
}

fn build_iter<'a, K>(flag: IFlag, node: Option<&'a Node<K>>, paths: &mut Vec<Fragment<'a, K>>) {
    if let Some(node) = node {
        let item = Fragment { flag, node };
        let node = match flag {
            IFlag::Left => item.node.left.as_ref().map(AsRef::as_ref),
            IFlag::Right => item.node.right.as_ref().map(AsRef::as_ref),
            IFlag::Center => unreachable!(),
        };
        paths.push(item);
        build_iter(flag, node, paths)
    }
}

#[cfg(test)]
#[path = "oset_test.rs"]
mod oset_test;
