use crate::arena::Handle;
use crate::red_black_tree::tree::{IntoValues, Tree, Violation};
use crate::red_black_tree::DEFAULT_CHUNK_SIZE;
use crate::Result;
use serde::de::{Deserialize, Deserializer, Error as DeError, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::result;

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black,
/// never lets a red node have a red child, and keeps the number of black nodes equal on every
/// path from a node down to an absent child. Together these bound the height by twice the
/// logarithm of the number of values, so insertion, removal and lookup are `O(log n)`.
///
/// # Examples
///
/// ```
/// use rbset::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// set.insert(2).unwrap();
/// set.insert(4).unwrap();
/// set.insert(3).unwrap();
///
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&4));
/// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&2, &3, &4]);
///
/// assert_eq!(set.remove(&3), Some(3));
/// assert_eq!(set.remove(&3), None);
/// ```
pub struct RedBlackSet<T> {
    tree: Tree<T>,
}

impl<T> RedBlackSet<T> {
    /// Constructs a new, empty `RedBlackSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `RedBlackSet<T>` whose nodes are allocated `chunk_size` at a time.
    /// A `chunk_size` of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::with_chunk_size(16);
    /// set.insert(1).unwrap();
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackSet {
            tree: Tree::new(chunk_size),
        }
    }

    /// Inserts a value into the set. Returns `Ok(true)` if the value was added and `Ok(false)` if
    /// an equal value was already present, in which case the set is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailure` if a node could not be allocated. The set is left
    /// exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert_eq!(set.insert(1).unwrap(), true);
    /// assert_eq!(set.insert(1).unwrap(), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool>
    where
        T: Ord,
    {
        self.tree.insert(value)
    }

    /// Removes a value from the set. Returns the removed value, or `None` if no equal value was
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, value: &V) -> Option<T>
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        self.tree.remove(value)
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, value: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(value).is_some()
    }

    /// Returns a reference to the value in the set equal to `value`, if any.
    pub fn get<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree
            .find(value)
            .map(|handle| &self.tree.node(handle).value)
    }

    /// Returns the number of values in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum value of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.first().map(|handle| &self.tree.node(handle).value)
    }

    /// Returns the maximum value of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.last().map(|handle| &self.tree.node(handle).value)
    }

    /// Calls `f` once for every value in the set, in ascending order.
    ///
    /// The values are copied out before the first call, and `f` receives the set itself, so it
    /// may insert or remove freely. Every value present when `for_each` starts is visited
    /// exactly once, even if `f` removes it before its turn. Values inserted by `f` are not
    /// visited.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// for value in 1..=10 {
    ///     set.insert(value).unwrap();
    /// }
    ///
    /// let mut calls = 0;
    /// set.for_each(|value, set| {
    ///     calls += 1;
    ///     set.remove(&(value + 1));
    /// });
    ///
    /// assert_eq!(calls, 10);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn for_each<F>(&mut self, mut f: F)
    where
        T: Clone,
        F: FnMut(T, &mut Self),
    {
        for value in self.tree.snapshot() {
            f(value, self);
        }
    }

    /// Checks the search tree and red black invariants. Returns the number of black nodes on
    /// every path from the root to an absent child, or the first violation found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// for value in 0..100 {
    ///     set.insert(value).unwrap();
    /// }
    /// assert!(set.validate().is_ok());
    /// ```
    pub fn validate(&self) -> result::Result<usize, Violation>
    where
        T: Ord,
    {
        self.tree.validate()
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackSetIter<'_, T> {
        RedBlackSetIter {
            tree: &self.tree,
            next: self.tree.first(),
            remaining: self.tree.len(),
        }
    }

    pub(super) fn tree(&self) -> &Tree<T> {
        &self.tree
    }
}

impl<T> IntoIterator for RedBlackSet<T> {
    type IntoIter = RedBlackSetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            values: self.tree.into_values(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackSet<T>
where
    T: 'a,
{
    type IntoIter = RedBlackSetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned values.
pub struct RedBlackSetIntoIter<T> {
    values: IntoValues<T>,
}

impl<T> Iterator for RedBlackSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

/// An iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
/// It follows parent links from node to node, so it needs no auxiliary stack.
pub struct RedBlackSetIter<'a, T> {
    tree: &'a Tree<T>,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for RedBlackSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        self.next = self.tree.successor(handle);
        self.remaining -= 1;
        Some(&self.tree.node(handle).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> Default for RedBlackSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RedBlackSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for RedBlackSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &RedBlackSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RedBlackSet<T> where T: Eq {}

impl<T> Extend<T> for RedBlackSet<T>
where
    T: Ord,
{
    /// Inserts every value from the iterator.
    ///
    /// # Panics
    ///
    /// Panics if a node cannot be allocated. Use `insert` to handle allocation failure.
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            if self.insert(value).is_err() {
                panic!("Error: failed to allocate red black tree node.");
            }
        }
    }
}

impl<T> FromIterator<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = RedBlackSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Serialize for RedBlackSet<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self.iter() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct RedBlackSetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for RedBlackSetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = RedBlackSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of values")
    }

    fn visit_seq<A>(self, mut seq: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = RedBlackSet::new();
        while let Some(value) = seq.next_element()? {
            set.insert(value).map_err(A::Error::custom)?;
        }
        Ok(set)
    }
}

impl<'de, T> Deserialize<'de> for RedBlackSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(RedBlackSetVisitor {
            marker: PhantomData,
        })
    }
}
