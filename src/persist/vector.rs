//! Persistent vector backed by a 32-way radix trie with a detached tail.
//!
//! Cloning is O(1). Every update copies only the nodes on the path from the
//! root to the touched leaf; all other nodes stay shared with prior versions.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

const BITS: u32 = 5;
const WIDTH: usize = 1 << BITS;
const MASK: usize = WIDTH - 1;

#[derive(Clone)]
enum Node<T> {
    Branch(Vec<Arc<Node<T>>>),
    Leaf(Vec<T>),
}

impl<T> Node<T> {
    fn empty_branch() -> Arc<Self> {
        Arc::new(Node::Branch(Vec::new()))
    }

    fn empty_leaf() -> Arc<Self> {
        Arc::new(Node::Leaf(Vec::new()))
    }

    fn values(&self) -> &[T] {
        match self {
            Node::Leaf(values) => values,
            Node::Branch(_) => &[],
        }
    }
}

/// An immutable, structurally shared sequence.
pub struct Vector<T> {
    len: usize,
    shift: u32,
    root: Arc<Node<T>>,
    tail: Arc<Node<T>>,
}

impl<T> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            shift: self.shift,
            root: Arc::clone(&self.root),
            tail: Arc::clone(&self.tail),
        }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self {
            len: 0,
            shift: BITS,
            root: Node::empty_branch(),
            tail: Node::empty_leaf(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when both vectors share the same root and tail storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.len == other.len
            && Arc::ptr_eq(&self.root, &other.root)
            && Arc::ptr_eq(&self.tail, &other.tail)
    }

    fn tail_offset(&self) -> usize {
        if self.len < WIDTH {
            0
        } else {
            ((self.len - 1) >> BITS) << BITS
        }
    }

    /// Returns the leaf holding `index`, plus the offset of its first element.
    fn leaf_for(&self, index: usize) -> (&[T], usize) {
        let offset = self.tail_offset();
        if index >= offset {
            return (self.tail.values(), offset);
        }
        let mut node = &*self.root;
        let mut level = self.shift;
        while level > 0 {
            match node {
                Node::Branch(children) => {
                    node = &*children[(index >> level) & MASK];
                }
                Node::Leaf(_) => break,
            }
            level -= BITS;
        }
        (node.values(), index & !MASK)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let (leaf, start) = self.leaf_for(index);
        leaf.get(index - start)
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            vector: self,
            index: 0,
            chunk: &[],
        }
    }
}

impl<T: Clone> Vector<T> {
    pub fn push_back(&mut self, value: T) {
        if self.len - self.tail_offset() < WIDTH {
            if let Node::Leaf(values) = Arc::make_mut(&mut self.tail) {
                values.push(value);
            }
            self.len += 1;
            return;
        }

        let full_tail = std::mem::replace(&mut self.tail, Arc::new(Node::Leaf(vec![value])));
        let count = self.len;
        if (count >> BITS) > (1 << self.shift) {
            let old_root = std::mem::replace(&mut self.root, Node::empty_branch());
            let path = new_path(self.shift, full_tail);
            self.root = Arc::new(Node::Branch(vec![old_root, path]));
            self.shift += BITS;
        } else {
            push_tail(&mut self.root, self.shift, count, full_tail);
        }
        self.len += 1;
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let last = self.last().cloned();
        if self.len == 1 {
            *self = Self::new();
            return last;
        }

        if self.len - self.tail_offset() > 1 {
            if let Node::Leaf(values) = Arc::make_mut(&mut self.tail) {
                values.pop();
            }
            self.len -= 1;
            return last;
        }

        let new_tail = self.leaf_node_for(self.len - 2);
        pop_tail(&mut self.root, self.shift, self.len);
        self.tail = new_tail;
        self.len -= 1;

        if self.shift > BITS {
            let collapsed = match &*self.root {
                Node::Branch(children) if children.len() == 1 => Some(Arc::clone(&children[0])),
                _ => None,
            };
            if let Some(child) = collapsed {
                self.root = child;
                self.shift -= BITS;
            }
        }
        last
    }

    /// Replaces the element at `index`. Returns false when out of range.
    pub fn set(&mut self, index: usize, value: T) -> bool {
        if index >= self.len {
            return false;
        }
        if index >= self.tail_offset() {
            let offset = self.tail_offset();
            if let Node::Leaf(values) = Arc::make_mut(&mut self.tail) {
                values[index - offset] = value;
            }
            return true;
        }
        set_in(&mut self.root, self.shift, index, value);
        true
    }

    /// Drops every element at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        while self.len > len {
            self.pop_back();
        }
    }

    /// Returns an updated copy with `value` appended.
    pub fn pushed(&self, value: T) -> Self {
        let mut next = self.clone();
        next.push_back(value);
        next
    }

    /// Returns an updated copy with `index` replaced, or `None` when out of range.
    pub fn updated(&self, index: usize, value: T) -> Option<Self> {
        let mut next = self.clone();
        next.set(index, value).then_some(next)
    }

    fn leaf_node_for(&self, index: usize) -> Arc<Node<T>> {
        let mut node = &self.root;
        let mut level = self.shift;
        while level > 0 {
            match &**node {
                Node::Branch(children) => node = &children[(index >> level) & MASK],
                Node::Leaf(_) => break,
            }
            level -= BITS;
        }
        Arc::clone(node)
    }
}

fn new_path<T>(level: u32, node: Arc<Node<T>>) -> Arc<Node<T>> {
    if level == 0 {
        node
    } else {
        Arc::new(Node::Branch(vec![new_path(level - BITS, node)]))
    }
}

fn push_tail<T: Clone>(parent: &mut Arc<Node<T>>, level: u32, count: usize, tail: Arc<Node<T>>) {
    let sub = ((count - 1) >> level) & MASK;
    if let Node::Branch(children) = Arc::make_mut(parent) {
        if level == BITS {
            children.push(tail);
        } else if sub < children.len() {
            push_tail(&mut children[sub], level - BITS, count, tail);
        } else {
            children.push(new_path(level - BITS, tail));
        }
    }
}

/// Removes the rightmost leaf. Returns true when `node` ends up empty.
fn pop_tail<T: Clone>(node: &mut Arc<Node<T>>, level: u32, count: usize) -> bool {
    let sub = ((count - 2) >> level) & MASK;
    match Arc::make_mut(node) {
        Node::Branch(children) => {
            if level > BITS {
                if pop_tail(&mut children[sub], level - BITS, count) {
                    children.truncate(sub);
                }
            } else {
                children.truncate(sub);
            }
            children.is_empty()
        }
        Node::Leaf(_) => false,
    }
}

fn set_in<T: Clone>(node: &mut Arc<Node<T>>, level: u32, index: usize, value: T) {
    match Arc::make_mut(node) {
        Node::Branch(children) => {
            set_in(&mut children[(index >> level) & MASK], level - BITS, index, value);
        }
        Node::Leaf(values) => values[index & MASK] = value,
    }
}

pub struct Iter<'a, T> {
    vector: &'a Vector<T>,
    index: usize,
    chunk: &'a [T],
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vector.len {
            return None;
        }
        if self.chunk.is_empty() {
            let (leaf, start) = self.vector.leaf_for(self.index);
            self.chunk = &leaf[self.index - start..];
        }
        let (item, rest) = self.chunk.split_first()?;
        self.chunk = rest;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of range for vector of length {}", self.len),
        }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Vector::new();
        for value in iter {
            vector.push_back(value);
        }
        vector
    }
}

impl<T: Clone> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len == other.len && self.iter().eq(other.iter()))
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Serialize> Serialize for Vector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de> + Clone> Deserialize<'de> for Vector<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VectorVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T: Deserialize<'de> + Clone> Visitor<'de> for VectorVisitor<T> {
            type Value = Vector<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a sequence")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut vector = Vector::new();
                while let Some(value) = seq.next_element()? {
                    vector.push_back(value);
                }
                Ok(vector)
            }
        }

        deserializer.deserialize_seq(VectorVisitor(std::marker::PhantomData))
    }
}
