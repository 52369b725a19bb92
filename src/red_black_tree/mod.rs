//! Self-balancing binary search tree that uses a color bit on each node to keep every root to
//! leaf path within a factor of two of every other.

mod dot;
mod node;
mod set;
mod tree;

pub use self::set::{RedBlackSet, RedBlackSetIntoIter, RedBlackSetIter};
pub use self::tree::Violation;

/// Number of nodes per arena chunk used by `RedBlackSet::new`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
