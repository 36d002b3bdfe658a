//! Diagnostic stack usage measurement.
//!
//! A thread registers itself with the stack size it was spawned with; the
//! module then reports how much of that stack lies between the registration
//! point and the caller. Anything it cannot measure is reported as
//! [`StackUsage::Unavailable`], never as a number.
use std::{cell::Cell, fmt::Display};

thread_local! {
    static STACK_BASE: Cell<Option<StackBase>> = const { Cell::new(None) };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StackUsage {
    Unavailable,
    /// Fraction of the registered stack in use, in `0.0..=1.0`.
    Ratio(f32),
}

impl Display for StackUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackUsage::Unavailable => f.write_str("unavailable"),
            StackUsage::Ratio(ratio) => write!(f, "{:.1}%", ratio * 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StackBase {
    base: usize,
    size: usize,
}

#[inline(never)]
fn frame_address() -> usize {
    let marker = 0u8;
    std::hint::black_box(std::ptr::addr_of!(marker)) as usize
}

/// Registers the calling thread. Call this first thing in the thread's
/// entry point with the size passed to [`std::thread::Builder::stack_size`].
pub fn register_current_thread(stack_size: usize) {
    let registered = StackBase {
        base: frame_address(),
        size: stack_size,
    };
    STACK_BASE.with(|slot| slot.set(Some(registered)));
}

/// Stack usage of the calling thread since it was registered.
#[allow(clippy::cast_precision_loss)]
pub fn current_stack_usage() -> StackUsage {
    let Some(registered) = STACK_BASE.with(Cell::get) else {
        return StackUsage::Unavailable;
    };

    // Stacks grow downwards on every target we ship; anything else is a
    // failed measurement.
    let Some(used) = registered.base.checked_sub(frame_address()) else {
        return StackUsage::Unavailable;
    };

    if registered.size == 0 || used > registered.size {
        return StackUsage::Unavailable;
    }

    StackUsage::Ratio(used as f32 / registered.size as f32)
}
