//! An ordered, duplicate-free set of totally ordered values backed by a red-black tree.
//!
//! Nodes live in a `TypedArena` and refer to each other by `Handle`, with children as owning
//! links and parents as plain back-references. See `red_black_tree::RedBlackSet` for the public
//! interface.

#[macro_use]
extern crate log;
extern crate serde;

mod error;
pub mod arena;
#[cfg(any(test, feature = "fault-injection"))]
pub mod fault;
pub mod red_black_tree;

pub use self::error::{Error, Result};
