use std::cell::RefCell;
use std::rc::Rc;

use triangle_core::{Geometry, Sequencer, ViewState, derive};
use web_sys::{Document, Element, Window};

use crate::timers::WebTimers;

/// Global widget state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub stage: Element,
    pub base: f64,
    pub height: f64,
    pub geometry: Geometry,
    pub sequencer: Sequencer,
    pub timers: WebTimers,
    /// Last view written to the DOM; frames only touch what changed.
    pub applied: ViewState,
}

impl State {
    /// Recompute geometry for new slider values and drop any running fold.
    pub fn set_params(&mut self, base: f64, height: f64) {
        self.base = base;
        self.height = height;
        self.geometry = derive(base, height);
        self.sequencer.invalidate(&mut self.timers);
    }

    pub fn play(&mut self) {
        self.sequencer.play(&mut self.timers);
    }

    pub fn now(&self) -> f64 {
        crate::utils::now(&self.window)
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
