use std::cell::RefCell;
use std::rc::{Rc, Weak};

use triangle_core::{BASE_SLIDER, HEIGHT_SLIDER, Sequencer, ViewState, derive};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

mod constants;
mod render;
mod state;
mod timers;
mod ui;
mod utils;

use crate::constants::{BASE_QUERY_KEY, HEIGHT_QUERY_KEY, STAGE_ID};
use crate::state::{STATE, State};
use crate::timers::WebTimers;
use crate::utils::{base_url, get_query_param, log};

/// Slider start values: query parameters when present and parseable,
/// otherwise the slider defaults.
fn initial_params(window: &Window) -> (f64, f64) {
    let search = window.location().search().unwrap_or_default();
    let base = get_query_param(&search, BASE_QUERY_KEY)
        .and_then(|v| BASE_SLIDER.parse(&v))
        .unwrap_or(BASE_SLIDER.default);
    let height = get_query_param(&search, HEIGHT_QUERY_KEY)
        .and_then(|v| HEIGHT_SLIDER.parse(&v))
        .unwrap_or(HEIGHT_SLIDER.default);
    (base, height)
}

fn start_frame_loop(state: Rc<RefCell<State>>) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let window = state.borrow().window.clone();
    let win = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        {
            let mut s = state.borrow_mut();
            let now = s.now();
            s.sequencer.tick(now);
            render::apply_view(&mut s);
        }
        if let Some(cb) = f.borrow().as_ref() {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(cb) = g.borrow().as_ref() {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    utils::install_error_logging(&window)?;
    log(&format!("boot {}", base_url(&window)));

    let Some(stage) = document.get_element_by_id(STAGE_ID) else {
        if let Some(body) = document.body() {
            body.set_inner_html(&format!(
                "<pre style=\"color:red\">#{} not found</pre>",
                STAGE_ID
            ));
        }
        return Ok(());
    };

    let (base, height) = initial_params(&window);
    let state = Rc::new_cyclic(|weak: &Weak<RefCell<State>>| {
        RefCell::new(State {
            timers: WebTimers::new(window.clone(), weak.clone()),
            window,
            document,
            stage,
            base,
            height,
            geometry: derive(base, height),
            sequencer: Sequencer::new(),
            applied: ViewState::hidden(),
        })
    });

    STATE.with(|st| st.replace(Some(state.clone())));
    ui::attach_ui(state.clone())?;
    render::rebuild(&mut state.borrow_mut());
    start_frame_loop(state);
    Ok(())
}

/// Geometry for the given slider values as JSON, for host-page scripts.
#[wasm_bindgen]
pub fn geometry_json(base: f64, height: f64) -> Result<String, JsValue> {
    let g = derive(BASE_SLIDER.snap(base), HEIGHT_SLIDER.snap(height));
    serde_json::to_string(&g).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Run the fold animation, same as pressing the play button.
#[wasm_bindgen]
pub fn play() {
    STATE.with(|st| {
        if let Some(st_rc) = st.borrow().as_ref() {
            st_rc.borrow_mut().play();
        }
    });
}
