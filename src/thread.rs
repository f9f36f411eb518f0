//! Thread records and the stable identifiers that name them.
//!
//! A [`Thread`] owns everything that must outlive a single quantum: its
//! stack, its saved execution context, its name, and the `waiter`
//! back-reference used by `join`. It is never moved once created; the
//! scheduler's thread table stores it behind a [`ThreadId`] so that a
//! `waiter` slot or a returned handle can name a thread without holding a
//! pointer into a `HashMap` that might reallocate.

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;
use std::sync::Arc;

use crate::ports::{self, Context};

/// A thread's entry function and the single word of context passed to it.
/// A plain function pointer, not a closure: no `Box<dyn FnOnce()>` at the
/// entry boundary.
pub type EntryFn = fn(usize);

/// Stack size for every spawned thread. Fixed; nothing in this library
/// grows a thread's stack dynamically.
pub const STACK_SIZE: usize = 64 * 1024;

/// A stable key into the scheduler's thread table. Cheap to copy, carries no
/// lifetime, safe to stash in a `waiter` slot or hand back to user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ThreadId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ThreadState {
    Ready,
    Running,
    Waiting,
}

/// Owned stack allocation, freed on [`Drop`].
struct Stack {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Stack {
    fn new() -> Option<Stack> {
        let layout = Layout::from_size_align(STACK_SIZE, ports::STACK_ALIGN).ok()?;
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).map(|ptr| Stack { ptr, layout })
    }

    /// The high address: the first byte past the allocation, where a
    /// downward-growing stack begins.
    fn top(&self) -> *mut u8 {
        unsafe { self.ptr.as_ptr().add(self.layout.size()) }
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

pub(crate) struct Thread {
    pub(crate) id: ThreadId,
    pub(crate) name: Arc<str>,
    pub(crate) state: ThreadState,
    pub(crate) context: Context,
    /// Thread whose `wait` is blocked on this one terminating. At most one,
    /// per the data model's single-waiter invariant.
    pub(crate) waiter: Option<ThreadId>,
    /// `(entry, arg)` for a thread that has never been switched into yet.
    /// The scheduler loop takes this immediately before its first switch
    /// into this record and stashes it in the global pending-entry slot the
    /// trampoline reads. `None` after that first switch has happened.
    pub(crate) pending: Option<(EntryFn, usize)>,
    // Keeps the stack allocation alive. Not read directly once `context`
    // has been built from its top address.
    _stack: Stack,
}

impl Thread {
    /// Build a thread record whose first resume begins executing
    /// `trampoline`, which in turn reads and runs `entry(arg)` via the
    /// pending-entry slot the scheduler stashes immediately before that
    /// first switch (see [`crate::scheduler`]).
    pub(crate) fn new(
        id: ThreadId,
        name: Arc<str>,
        entry: EntryFn,
        arg: usize,
        trampoline: extern "C" fn() -> !,
    ) -> Option<Thread> {
        let stack = Stack::new()?;
        let context = ports::make(stack.top(), trampoline);
        Some(Thread {
            id,
            name,
            state: ThreadState::Ready,
            context,
            waiter: None,
            pending: Some((entry, arg)),
            _stack: stack,
        })
    }
}
