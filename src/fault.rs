//! Deterministic allocation failure for exercising the `AllocationFailure` path.
//!
//! The switch is per thread so that tests running in parallel do not interfere with each other.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static FAIL_ALLOCATIONS: Cell<bool> = Cell::new(false);
}

/// Guard returned by `fail_allocations`. Allocations succeed again once it is dropped.
pub struct FailAllocations {
    previous: bool,
    // The switch is thread local, so the guard must stay on the thread that created it.
    _not_send: PhantomData<*const ()>,
}

/// Makes every node allocation on the current thread fail until the returned guard is dropped.
///
/// # Examples
///
/// ```
/// use rbset::fault;
/// use rbset::red_black_tree::RedBlackSet;
/// use rbset::Error;
///
/// let mut set = RedBlackSet::new();
/// set.insert(1).unwrap();
/// {
///     let _guard = fault::fail_allocations();
///     match set.insert(2) {
///         Err(Error::AllocationFailure) => {},
///         _ => panic!("expected an allocation failure"),
///     }
/// }
/// assert_eq!(set.insert(2).unwrap(), true);
/// ```
pub fn fail_allocations() -> FailAllocations {
    let previous = FAIL_ALLOCATIONS.with(|flag| flag.replace(true));
    FailAllocations {
        previous,
        _not_send: PhantomData,
    }
}

impl Drop for FailAllocations {
    fn drop(&mut self) {
        let previous = self.previous;
        FAIL_ALLOCATIONS.with(|flag| flag.set(previous));
    }
}

pub(crate) fn allocation_should_fail() -> bool {
    FAIL_ALLOCATIONS.with(Cell::get)
}
