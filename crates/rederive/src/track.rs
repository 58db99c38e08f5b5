//! The thread-local evaluation stack
//!
//! Dependency discovery works by keeping an explicit ordered sequence of
//! dependency frames, one per selector computation currently being built
//! on this thread. Observers register into every open frame, which is what
//! gives enclosing selectors their transitive dependency sets; a finishing
//! selector merges its computation's dependencies into the frames still
//! open below it.
//!
//! The stack is shared by every context on the thread: a selector from one
//! context that reads observers from another still records those
//! dependencies, while each recorded call stays bound to its own context's
//! state for replay.

use rederive_core::{DepSet, ObserverCall};
use std::cell::RefCell;
use std::rc::Rc;

type Frame = Rc<RefCell<DepSet>>;

thread_local! {
    static STACK: RefCell<Vec<Frame>> = RefCell::new(Vec::new());
}

/// Pops the frame pushed by [`with_frame`] on every exit path.
struct FrameGuard;

impl Drop for FrameGuard {
    fn drop(&mut self) {
        STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Run `body` with `seed` pushed as the innermost dependency frame.
///
/// The frame is popped when `body` returns or unwinds; on return the
/// collected dependencies come back alongside the result.
pub(crate) fn with_frame<R>(seed: DepSet, body: impl FnOnce() -> R) -> (DepSet, R) {
    let frame: Frame = Rc::new(RefCell::new(seed));
    STACK.with(|stack| stack.borrow_mut().push(Rc::clone(&frame)));

    let guard = FrameGuard;
    let result = body();
    drop(guard);

    let deps = Rc::try_unwrap(frame)
        .map(RefCell::into_inner)
        .unwrap_or_else(|shared| shared.borrow().clone());
    (deps, result)
}

/// Whether any selector computation is in progress on this thread.
pub(crate) fn any_open_frames() -> bool {
    STACK.with(|stack| !stack.borrow().is_empty())
}

/// Register one observer call into every open frame, outermost first.
pub(crate) fn record_in_open_frames(call: &ObserverCall) {
    STACK.with(|stack| {
        for frame in stack.borrow().iter() {
            frame.borrow_mut().record(call.clone());
        }
    });
}

/// Merge a finished computation's dependencies into every open frame.
///
/// Called after the finishing selector's own frame has been popped, so the
/// open frames are exactly the computations below it on the call chain.
pub(crate) fn merge_into_open_frames(deps: &DepSet) {
    if deps.is_empty() {
        return;
    }
    STACK.with(|stack| {
        for frame in stack.borrow().iter() {
            frame.borrow_mut().merge(deps);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(key: &str) -> ObserverCall {
        ObserverCall::new(key, || false)
    }

    #[test]
    fn test_frame_collects_recorded_calls() {
        let (deps, value) = with_frame(DepSet::new(), || {
            record_in_open_frames(&call("1"));
            record_in_open_frames(&call("2"));
            "done"
        });

        assert_eq!(value, "done");
        assert_eq!(deps.keys(), vec!["1", "2"]);
        assert!(!any_open_frames());
    }

    #[test]
    fn test_nested_frames_all_record() {
        let (outer, inner) = with_frame(DepSet::new(), || {
            record_in_open_frames(&call("outer-only"));
            let (inner, _) = with_frame(DepSet::new(), || {
                record_in_open_frames(&call("shared"));
            });
            inner
        });

        assert_eq!(inner.keys(), vec!["shared"]);
        assert_eq!(outer.keys(), vec!["outer-only", "shared"]);
    }

    #[test]
    fn test_frame_pops_on_unwind() {
        let outcome = std::panic::catch_unwind(|| {
            with_frame(DepSet::new(), || {
                panic!("compute failed");
            })
        });

        assert!(outcome.is_err());
        assert!(!any_open_frames());
    }

    #[test]
    fn test_merge_reaches_every_open_frame() {
        let mut merged = DepSet::new();
        merged.record(call("child"));

        let (outer, _) = with_frame(DepSet::new(), || {
            let (inner, _) = with_frame(DepSet::new(), || {
                merge_into_open_frames(&merged);
            });
            // The inner frame was open during the merge; the outer one too.
            assert_eq!(inner.keys(), vec!["child"]);
        });

        assert_eq!(outer.keys(), vec!["child"]);
    }
}
