//! Stack growth for the recursive passes.
//!
//! Parsing, resolution and evaluation all recurse once per level of syntax or
//! per Lox call.  Each recursive entry point runs through
//! [`ensure_sufficient_stack`], which moves onto a freshly allocated segment
//! when the current one is nearly used up, so deep programs do not overflow
//! the host thread's stack.

/// Grow when less than this much stack remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// within [`RED_ZONE`] of its end.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
