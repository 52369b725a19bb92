use crate::arena::{Handle, TypedArena};
use crate::red_black_tree::node::{Color, Node, Side};
use crate::{Error, Result};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::result;
use std::vec;

/// The slot a node occupies: the tree's root field, or one child field of its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Link {
    Root,
    Left(Handle),
    Right(Handle),
}

impl Link {
    fn parent(self) -> Option<Handle> {
        match self {
            Link::Root => None,
            Link::Left(parent) | Link::Right(parent) => Some(parent),
        }
    }
}

/// A broken red-black or search tree invariant, as reported by `Tree::validate`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    /// The root is red.
    RedRoot,
    /// A red node has a red child.
    RedChildOfRed,
    /// The two subtrees of some node contain different numbers of black nodes on their paths.
    BlackHeightMismatch,
    /// Values are not strictly increasing in order.
    OutOfOrder,
    /// A child's parent back-reference does not point at the node holding it.
    BrokenParentLink,
    /// The maintained length differs from the number of reachable nodes.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Violation::RedRoot => write!(f, "root is red"),
            Violation::RedChildOfRed => write!(f, "red node has a red child"),
            Violation::BlackHeightMismatch => write!(f, "subtrees have different black heights"),
            Violation::OutOfOrder => write!(f, "values are out of order"),
            Violation::BrokenParentLink => write!(f, "parent link does not match child link"),
            Violation::LengthMismatch { expected, actual } => write!(
                f,
                "length is {} but {} nodes are reachable",
                expected, actual,
            ),
        }
    }
}

pub struct Tree<T> {
    arena: TypedArena<Node<T>>,
    root: Option<Handle>,
    len: usize,
}

impl<T> Tree<T> {
    pub fn new(chunk_size: usize) -> Self {
        Tree {
            arena: TypedArena::new(chunk_size),
            root: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn node(&self, handle: Handle) -> &Node<T> {
        &self.arena[handle]
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    fn is_red(&self, handle: Option<Handle>) -> bool {
        match handle {
            None => false,
            Some(handle) => self.arena[handle].color == Color::Red,
        }
    }

    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.arena[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn link_of(&self, handle: Handle) -> Link {
        match self.arena[handle].parent {
            None => Link::Root,
            Some(parent) => match self.side_of(handle, parent) {
                Side::Left => Link::Left(parent),
                Side::Right => Link::Right(parent),
            },
        }
    }

    // Points `link` at `child` and fixes up the child's back-reference.
    fn replace(&mut self, link: Link, child: Option<Handle>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.arena[parent].left = child,
            Link::Right(parent) => self.arena[parent].right = child,
        }
        if let Some(child) = child {
            self.arena[child].parent = link.parent();
        }
    }

    // Rotates the subtree at `handle` towards `side`: the child on the opposite side takes its
    // place and `handle` becomes that child's `side` child.
    fn rotate(&mut self, handle: Handle, side: Side) {
        let opposite = side.opposite();
        let pivot = self.arena[handle]
            .child(opposite)
            .expect("Expected pivot child node to be `Some`.");
        let link = self.link_of(handle);
        trace!("rotating {:?} at {:?}", side, handle);

        let inner = self.arena[pivot].child(side);
        *self.arena[handle].child_mut(opposite) = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(handle);
        }

        *self.arena[pivot].child_mut(side) = Some(handle);
        self.arena[handle].parent = Some(pivot);
        self.replace(link, Some(pivot));
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.arena[handle].left {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.arena[handle].right {
            handle = right;
        }
        handle
    }

    pub fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    pub fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.rightmost(root))
    }

    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.arena[handle].right {
            return Some(self.leftmost(right));
        }

        let mut curr = handle;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].left == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    pub fn find<V>(&self, value: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match value.cmp(node.value.borrow()) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => curr = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    pub fn insert(&mut self, value: T) -> Result<bool>
    where
        T: Ord,
    {
        let mut link = Link::Root;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match value.cmp(&node.value) {
                Ordering::Less => {
                    link = Link::Left(handle);
                    curr = node.left;
                },
                Ordering::Greater => {
                    link = Link::Right(handle);
                    curr = node.right;
                },
                Ordering::Equal => {
                    debug!("insert: value already present, len = {}", self.len);
                    return Ok(false);
                },
            }
        }

        let handle = match self.arena.try_allocate(Node::new(value, link.parent())) {
            Ok(handle) => handle,
            Err(_) => {
                warn!("insert: failed to allocate node, tree left unchanged");
                return Err(Error::AllocationFailure);
            },
        };
        self.replace(link, Some(handle));
        self.len += 1;
        self.insert_fixup(handle);
        debug!("insert: value added, len = {}", self.len);

        #[cfg(debug_assertions)]
        self.assert_invariants();

        Ok(true)
    }

    // `handle` is red and may have a red parent.
    fn insert_fixup(&mut self, mut handle: Handle) {
        loop {
            let parent = match self.arena[handle].parent {
                None => break,
                Some(parent) => parent,
            };
            if self.arena[parent].color == Color::Black {
                break;
            }

            // a red parent is never the root, so the grandparent exists
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected red node to have a parent.");
            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.arena[grandparent].child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|uncle| self.arena[*uncle].color == Color::Red) {
                trace!("insert fix-up: red uncle, recoloring and moving up");
                self.arena[parent].color = Color::Black;
                self.arena[uncle].color = Color::Black;
                self.arena[grandparent].color = Color::Red;
                handle = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.side_of(handle, parent) != parent_side {
                trace!("insert fix-up: inner grandchild, rotating parent");
                self.rotate(parent, parent_side);
                parent = handle;
            }

            trace!("insert fix-up: outer grandchild, rotating grandparent");
            self.arena[parent].color = Color::Black;
            self.arena[grandparent].color = Color::Red;
            self.rotate(grandparent, parent_side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    pub fn remove<V>(&mut self, value: &V) -> Option<T>
    where
        T: Borrow<V> + Ord,
        V: Ord + ?Sized,
    {
        let target = match self.find(value) {
            Some(handle) => handle,
            None => {
                debug!("remove: value not present, len = {}", self.len);
                return None;
            },
        };

        // With two children, the rightmost node of the left subtree is unlinked instead and its
        // value moves into `target`.
        let spliced = match (self.arena[target].left, self.arena[target].right) {
            (Some(left), Some(_)) => self.rightmost(left),
            _ => target,
        };

        let (color, child) = {
            let node = &self.arena[spliced];
            (node.color, node.left.or(node.right))
        };
        let link = self.link_of(spliced);
        self.replace(link, child);
        let node = self.arena.free(&spliced);
        self.len -= 1;

        if color == Color::Black {
            match child {
                Some(child) if self.arena[child].color == Color::Red => {
                    self.arena[child].color = Color::Black;
                },
                _ => self.remove_fixup(link),
            }
        }

        let removed = if spliced == target {
            node.value
        } else {
            mem::replace(&mut self.arena[target].value, node.value)
        };
        debug!("remove: value removed, len = {}", self.len);

        #[cfg(debug_assertions)]
        self.assert_invariants();

        Some(removed)
    }

    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        self.arena[parent]
            .child(side.opposite())
            .expect("Expected black-deficient position to have a sibling.")
    }

    // The subtree hanging from `link` has one black node fewer on each path than its sibling.
    fn remove_fixup(&mut self, mut link: Link) {
        loop {
            let (parent, side) = match link {
                Link::Root => break,
                Link::Left(parent) => (parent, Side::Left),
                Link::Right(parent) => (parent, Side::Right),
            };

            let mut sibling = self.sibling(parent, side);
            if self.arena[sibling].color == Color::Red {
                trace!("remove fix-up: red sibling, rotating parent");
                self.arena[sibling].color = Color::Black;
                self.arena[parent].color = Color::Red;
                self.rotate(parent, side);
                sibling = self.sibling(parent, side);
            }

            let near = self.arena[sibling].child(side);
            let far = self.arena[sibling].child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                self.arena[sibling].color = Color::Red;
                if self.arena[parent].color == Color::Black {
                    trace!("remove fix-up: all black, moving up");
                    link = self.link_of(parent);
                    continue;
                }
                trace!("remove fix-up: red parent absorbs deficit");
                self.arena[parent].color = Color::Black;
                break;
            }

            if !self.is_red(far) {
                trace!("remove fix-up: red near child, rotating sibling");
                if let Some(near) = near {
                    self.arena[near].color = Color::Black;
                }
                self.arena[sibling].color = Color::Red;
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(parent, side);
            }

            trace!("remove fix-up: red far child, rotating parent");
            let parent_color = self.arena[parent].color;
            self.arena[sibling].color = parent_color;
            self.arena[parent].color = Color::Black;
            if let Some(far) = self.arena[sibling].child(side.opposite()) {
                self.arena[far].color = Color::Black;
            }
            self.rotate(parent, side);
            break;
        }
    }

    /// Handles of every node in ascending order of value. Walks with an explicit stack and
    /// allocates exactly `len` slots for the result.
    pub fn in_order(&self) -> Vec<Handle> {
        let mut handles = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut curr = self.root;
        loop {
            while let Some(handle) = curr {
                stack.push(handle);
                curr = self.arena[handle].left;
            }
            match stack.pop() {
                None => break,
                Some(handle) => {
                    handles.push(handle);
                    curr = self.arena[handle].right;
                },
            }
        }
        handles
    }

    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.in_order()
            .into_iter()
            .map(|handle| self.arena[handle].value.clone())
            .collect()
    }

    pub fn into_values(self) -> IntoValues<T> {
        let handles = self.in_order();
        IntoValues {
            arena: self.arena,
            handles: handles.into_iter(),
        }
    }

    /// Checks every invariant and returns the number of black nodes on each path from the root
    /// to an absent child.
    pub fn validate(&self) -> result::Result<usize, Violation>
    where
        T: Ord,
    {
        let mut count = 0;
        let black_height = match self.root {
            None => 0,
            Some(root) => {
                let node = &self.arena[root];
                if node.parent.is_some() {
                    return Err(Violation::BrokenParentLink);
                }
                if node.color == Color::Red {
                    return Err(Violation::RedRoot);
                }
                self.validate_subtree(root, None, None, &mut count)?
            },
        };

        if count != self.len {
            return Err(Violation::LengthMismatch {
                expected: self.len,
                actual: count,
            });
        }
        Ok(black_height)
    }

    fn validate_subtree(
        &self,
        handle: Handle,
        lower: Option<&T>,
        upper: Option<&T>,
        count: &mut usize,
    ) -> result::Result<usize, Violation>
    where
        T: Ord,
    {
        let node = &self.arena[handle];
        *count += 1;

        let above_lower = lower.map_or(true, |lower| node.value > *lower);
        let below_upper = upper.map_or(true, |upper| node.value < *upper);
        if !above_lower || !below_upper {
            return Err(Violation::OutOfOrder);
        }

        let mut heights = [0; 2];
        for (height, &side) in heights.iter_mut().zip(&[Side::Left, Side::Right]) {
            if let Some(child) = node.child(side) {
                let child_node = &self.arena[child];
                if child_node.parent != Some(handle) {
                    return Err(Violation::BrokenParentLink);
                }
                if node.color == Color::Red && child_node.color == Color::Red {
                    return Err(Violation::RedChildOfRed);
                }
                let (lower, upper) = match side {
                    Side::Left => (lower, Some(&node.value)),
                    Side::Right => (Some(&node.value), upper),
                };
                *height = self.validate_subtree(child, lower, upper, count)?;
            }
        }

        if heights[0] != heights[1] {
            return Err(Violation::BlackHeightMismatch);
        }
        match node.color {
            Color::Black => Ok(heights[0] + 1),
            Color::Red => Ok(heights[0]),
        }
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self)
    where
        T: Ord,
    {
        if let Err(violation) = self.validate() {
            panic!("red-black tree invariant violated: {}", violation);
        }
    }
}

/// Owning in-order iterator over the values of a `Tree<T>`.
pub struct IntoValues<T> {
    arena: TypedArena<Node<T>>,
    handles: vec::IntoIter<Handle>,
}

impl<T> Iterator for IntoValues<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next()?;
        Some(self.arena.free(&handle).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}
