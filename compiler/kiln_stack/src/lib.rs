//! Stack growth for deeply nested types.
//!
//! Every level of a nested composite is one level of recursion in the type
//! builder, in layout and in formatting. A deep enough type overflows a
//! fixed-size thread stack, so those recursive paths run through
//! [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown on demand with `stacker`; on wasm32
//! the closure is simply called.

/// Remaining stack below which we grow (100KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated per growth (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if it is nearly exhausted.
///
/// Wrap the body of any function that recurses once per nesting level.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
