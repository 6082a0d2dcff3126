use std::cell::RefCell;
use std::rc::Weak;

use triangle_core::{Cue, Timers};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::state::State;
use crate::utils::{log, warn};

/// Timeout handles of the current run, each kept together with whatever
/// must stay alive until the timeout fires or is cleared.
#[derive(Debug)]
pub struct Pending<T> {
    entries: Vec<(i32, T)>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Pending {
            entries: Vec::new(),
        }
    }
}

impl<T> Pending<T> {
    pub fn push(&mut self, handle: i32, keep: T) {
        self.entries.push((handle, keep));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hand every handle to `clear`, then drop what it kept alive.
    pub fn cancel_all(&mut self, mut clear: impl FnMut(i32)) {
        for (handle, keep) in self.entries.drain(..) {
            clear(handle);
            drop(keep);
        }
    }
}

/// `setTimeout` backed cue delivery. Fired cues re-enter the shared state
/// through a weak handle so a torn-down widget simply drops them.
///
/// Callbacks are owned here rather than leaked, and released on the next
/// `cancel_pending` (every `play` and every geometry change). That call
/// never runs from inside a cue callback, so no closure is dropped while
/// it executes.
pub struct WebTimers {
    window: Window,
    state: Weak<RefCell<State>>,
    pending: Pending<Closure<dyn FnMut()>>,
}

impl WebTimers {
    pub fn new(window: Window, state: Weak<RefCell<State>>) -> Self {
        WebTimers {
            window,
            state,
            pending: Pending::default(),
        }
    }
}

impl Timers for WebTimers {
    fn schedule(&mut self, delay_ms: u32, cue: Cue) {
        let weak = self.state.clone();
        let cb: Closure<dyn FnMut()> = Closure::once(move || {
            let Some(st) = weak.upgrade() else { return };
            let mut s = st.borrow_mut();
            let now = s.now();
            if !s.sequencer.fire(cue, now) {
                log(&format!("dropped stale cue {:?}", cue));
            }
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                delay_ms as i32,
            ) {
            Ok(handle) => self.pending.push(handle, cb),
            Err(e) => warn(&format!("setTimeout failed: {:?}", e)),
        }
    }

    fn cancel_pending(&mut self) {
        let window = &self.window;
        self.pending
            .cancel_all(|handle| window.clear_timeout_with_handle(handle));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn cancel_clears_every_handle_and_releases_callbacks() {
        let token = Rc::new(());
        let mut pending = Pending::default();
        for handle in [11, 12, 13, 14] {
            pending.push(handle, token.clone());
        }
        assert_eq!(pending.len(), 4);
        assert_eq!(Rc::strong_count(&token), 5);

        let mut cleared = Vec::new();
        pending.cancel_all(|h| cleared.push(h));
        assert_eq!(cleared, vec![11, 12, 13, 14]);
        assert!(pending.is_empty());
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn replay_only_clears_the_new_run_once() {
        let mut pending: Pending<()> = Pending::default();
        pending.push(1, ());
        pending.cancel_all(|_| {});
        pending.push(2, ());
        let mut cleared = Vec::new();
        pending.cancel_all(|h| cleared.push(h));
        assert_eq!(cleared, vec![2]);
    }
}
