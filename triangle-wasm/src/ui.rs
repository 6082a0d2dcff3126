use std::cell::RefCell;
use std::rc::Rc;

use scene_core::build_scene_svg;
use triangle_core::{BASE_SLIDER, HEIGHT_SLIDER, SliderConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, HtmlInputElement};

use crate::constants::{BASE_INPUT_ID, EXPORT_SVG_ID, HEIGHT_INPUT_ID, PLAY_ID};
use crate::render;
use crate::state::State;
use crate::utils::{log, save_text_as_file};

#[derive(Clone, Copy, Debug)]
enum Param {
    Base,
    Height,
}

impl Param {
    fn config(self) -> SliderConfig {
        match self {
            Param::Base => BASE_SLIDER,
            Param::Height => HEIGHT_SLIDER,
        }
    }
}

pub fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    attach_slider(&state, BASE_INPUT_ID, Param::Base)?;
    attach_slider(&state, HEIGHT_INPUT_ID, Param::Height)?;

    let doc = state.borrow().document.clone();
    if let Some(btn) = doc.get_element_by_id(PLAY_ID) {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            st.borrow_mut().play();
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    if let Some(btn) = doc.get_element_by_id(EXPORT_SVG_ID) {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let s = st.borrow();
            let (svg, _, _) = build_scene_svg(&s.geometry, s.sequencer.view());
            let name = format!("triangle_b{}_h{}.svg", s.base, s.height);
            if let Err(e) = save_text_as_file(&s.document, &name, "image/svg+xml", &svg) {
                log(&format!("Failed to export SVG: {:?}", e));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

// Range input -> State. The input enforces its own bounds; values are
// snapped again so typed or scripted values stay on the grid.
fn attach_slider(state: &Rc<RefCell<State>>, id: &str, param: Param) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(el) = doc.get_element_by_id(id) else {
        log(&format!("slider #{} not found; keeping {:?} fixed", id, param));
        return Ok(());
    };
    let input: HtmlInputElement = el.dyn_into()?;
    let cfg = param.config();
    for (name, value) in cfg.attrs() {
        if name != "value" {
            input.set_attribute(name, &value)?;
        }
    }
    let current = match param {
        Param::Base => state.borrow().base,
        Param::Height => state.borrow().height,
    };
    input.set_value(&current.to_string());

    let st = state.clone();
    let input_read = input.clone();
    let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let Some(v) = cfg.parse(&input_read.value()) else {
            return;
        };
        let mut s = st.borrow_mut();
        let (base, height) = match param {
            Param::Base => (v, s.height),
            Param::Height => (s.base, v),
        };
        s.set_params(base, height);
        render::rebuild(&mut s);
    }));
    input.set_oninput(Some(oninput.as_ref().unchecked_ref()));
    oninput.forget();
    Ok(())
}
