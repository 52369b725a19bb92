//! Chunked node storage addressed by copyable handles.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
///
/// Handles are plain indices: copying one never copies or aliases the object it refers to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator for objects of a single type.
///
/// Objects live in fixed-capacity chunks, so allocating never moves an existing object and a
/// `Handle` stays valid until the object it refers to is freed. Freed blocks are threaded onto a
/// free list and reused before a new chunk is requested. Dropping the arena drops every object
/// still inside it.
///
/// # Examples
///
/// ```
/// use rbset::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert!(arena.is_empty());
/// ```
pub struct TypedArena<T> {
    head: Option<Handle>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn is_valid_handle(&self, handle: &Handle) -> bool {
        handle.chunk_index < self.chunks.len()
            && handle.block_index < self.chunks[handle.chunk_index].len()
    }

    /// Constructs a new, empty `TypedArena<T>` that holds `chunk_size` objects per chunk. No
    /// memory is allocated until the first object is stored. A `chunk_size` of zero is treated
    /// as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert_eq!(arena.len(), 0);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
            capacity: 0,
        }
    }

    /// Stores `value` in the arena and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if a new chunk is needed and cannot be allocated.
    pub fn allocate(&mut self, value: T) -> Handle {
        match self.try_allocate(value) {
            Ok(handle) => handle,
            Err(_) => panic!("Error: failed to allocate arena chunk."),
        }
    }

    /// Stores `value` in the arena and returns its handle. If storage cannot be obtained the
    /// arena is left untouched and `value` is handed back.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(2);
    /// let x = arena.try_allocate(7).ok().unwrap();
    /// assert_eq!(arena[x], 7);
    /// ```
    pub fn try_allocate(&mut self, value: T) -> Result<Handle, T> {
        #[cfg(any(test, feature = "fault-injection"))]
        {
            if crate::fault::allocation_should_fail() {
                return Err(value);
            }
        }

        if self.len == self.capacity {
            let mut chunk = Vec::new();
            if chunk.try_reserve_exact(self.chunk_size).is_err()
                || self.chunks.try_reserve(1).is_err()
            {
                return Err(value);
            }
            self.chunks.push(chunk);
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.head.take() {
            None => {
                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Block::Occupied(value));
                Ok(Handle {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                })
            },
            Some(handle) => {
                let vacant_block = mem::replace(
                    &mut self.chunks[handle.chunk_index][handle.block_index],
                    Block::Occupied(value),
                );

                match vacant_block {
                    Block::Vacant(next_handle) => {
                        self.head = next_handle;
                        Ok(handle)
                    },
                    Block::Occupied(_) => unreachable!("free list points at an occupied block"),
                }
            },
        }
    }

    /// Removes an object from the arena and returns it. Its block is reused by a later
    /// allocation.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an occupied block.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, handle: &Handle) -> T {
        if !self.is_valid_handle(handle) {
            panic!("Error: attempting to free invalid block.");
        }
        let block = &mut self.chunks[handle.chunk_index][handle.block_index];
        if let Block::Vacant(_) = block {
            panic!("Error: attempting to free vacant block.");
        }
        match mem::replace(block, Block::Vacant(self.head.take())) {
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(*handle);
                value
            },
            Block::Vacant(_) => unreachable!(),
        }
    }

    /// Drops every object in the arena and releases its chunks.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }

    /// Returns the number of objects currently stored in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena stores no objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an immutable reference to an object in the arena, or `None` if the handle does not
    /// refer to an occupied block.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbset::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Block::Occupied(ref value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if the handle does not
    /// refer to an occupied block.
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        if !self.is_valid_handle(handle) {
            return None;
        }
        match self.chunks[handle.chunk_index][handle.block_index] {
            Block::Occupied(ref mut value) => Some(value),
            Block::Vacant(_) => None,
        }
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;
    use super::TypedArena;
    use crate::fault;

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new(1024);
        arena.free(&Handle {
            chunk_index: 0,
            block_index: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(1024);
        let handle = arena.allocate(0);
        arena.free(&handle);
        arena.free(&handle);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = TypedArena::new(2);
        arena.allocate(0);
        arena.allocate(1);
        assert_eq!(
            arena.allocate(2),
            Handle {
                chunk_index: 1,
                block_index: 0,
            },
        );
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_list_reuse() {
        let mut arena = TypedArena::new(2);
        let a = arena.allocate(0);
        let b = arena.allocate(1);
        assert_eq!(arena.free(&a), 0);
        assert_eq!(arena.free(&b), 1);

        // Most recently freed block comes back first and no new chunk is opened.
        assert_eq!(arena.allocate(2), b);
        assert_eq!(arena.allocate(3), a);
        assert_eq!(arena[a], 3);
        assert_eq!(arena[b], 2);
    }

    #[test]
    fn test_reuse_when_full() {
        let mut arena = TypedArena::new(1);
        let a = arena.allocate(0);
        arena.free(&a);
        assert_eq!(arena.allocate(1), a);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut arena = TypedArena::new(0);
        let x = arena.allocate(5);
        assert_eq!(arena[x], 5);
    }

    #[test]
    fn test_get_vacant_block() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        arena.free(&x);
        assert_eq!(arena.get(&x), None);
        assert_eq!(arena.get_mut(&x), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        *arena.get_mut(&x).unwrap() = 1;
        assert_eq!(arena.get(&x), Some(&1));
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new(4);
        let x = arena.allocate(0);
        arena.allocate(1);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(&x), None);
    }

    #[test]
    fn test_try_allocate_failure_leaves_arena_untouched() {
        let mut arena = TypedArena::new(4);
        arena.allocate(0);
        {
            let _guard = fault::fail_allocations();
            assert_eq!(arena.try_allocate(9), Err(9));
        }
        assert_eq!(arena.len(), 1);
        assert_eq!(
            arena.allocate(1),
            Handle {
                chunk_index: 0,
                block_index: 1,
            },
        );
    }
}
