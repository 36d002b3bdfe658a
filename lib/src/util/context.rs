//! Best-effort execution context identity.
//!
//! Answers "is this code running inside context X?" so a caller can skip a
//! hop onto a queue it is already on. A thread only counts as inside a
//! context while it holds that context's [`ContextGuard`]; on any thread
//! that was never marked the answer is `false`. Nothing in the data model
//! depends on this answer.
use std::{
    cell::Cell,
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_CONTEXT: Cell<Option<u64>> = const { Cell::new(None) };
}

/// A named logical execution context, typically one per serial queue.
///
/// Clones refer to the same context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    id: u64,
    label: &'static str,
}

impl ExecutionContext {
    pub fn new(label: &'static str) -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            label,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Marks the calling thread as running inside this context until the
    /// guard is dropped. Entering nests: the previous context comes back on drop.
    pub fn enter(&self) -> ContextGuard {
        let previous = CURRENT_CONTEXT.with(|current| current.replace(Some(self.id)));

        ContextGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    /// `true` only if the calling thread is provably inside this context.
    pub fn is_current(&self) -> bool {
        CURRENT_CONTEXT.with(|current| current.get() == Some(self.id))
    }
}

/// Restores the previously current context when dropped.
///
/// Not `Send`: the mark belongs to the thread that created it.
#[derive(Debug)]
pub struct ContextGuard {
    previous: Option<u64>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|current| current.set(self.previous));
    }
}
