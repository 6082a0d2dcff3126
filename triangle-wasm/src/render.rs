use scene_core::{build_scene_svg, diff_view};
use triangle_core::controls::format_value;
use triangle_core::{Geometry, ViewState, format_area};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::constants::{AREA_ID, BASE_VALUE_ID, HEIGHT_VALUE_ID};
use crate::state::State;
use crate::utils::warn;

/// Re-render the whole scene for the current geometry and view.
pub fn rebuild(state: &mut State) {
    let view = state.sequencer.view().clone();
    let (svg, _w, _h) = build_scene_svg(&state.geometry, &view);
    state.stage.set_inner_html(&svg);
    state.applied = view;
    update_readouts(state);
}

/// Where per-frame attribute writes land. `Ok(false)` means the element
/// is not in the scene; that element is skipped and the rest still update.
pub trait SceneNodes {
    fn write(
        &mut self,
        id: &str,
        opacity: &str,
        transform: Option<&str>,
    ) -> Result<bool, JsValue>;
}

impl SceneNodes for Document {
    fn write(
        &mut self,
        id: &str,
        opacity: &str,
        transform: Option<&str>,
    ) -> Result<bool, JsValue> {
        let Some(node) = self.get_element_by_id(id) else {
            return Ok(false);
        };
        node.set_attribute("opacity", opacity)?;
        match transform {
            Some(t) => node.set_attribute("transform", t)?,
            None => node.remove_attribute("transform")?,
        }
        Ok(true)
    }
}

/// Push the changes between `applied` and `view` into `nodes`.
/// Returns how many elements were written.
pub fn write_view<N: SceneNodes>(
    nodes: &mut N,
    geometry: &Geometry,
    applied: &ViewState,
    view: &ViewState,
) -> usize {
    let mut written = 0;
    for w in diff_view(geometry, applied, view) {
        match nodes.write(w.element.dom_id(), &w.opacity, w.transform.as_deref()) {
            Ok(true) => written += 1,
            Ok(false) => {}
            Err(e) => warn(&format!("failed to update #{}: {:?}", w.element.dom_id(), e)),
        }
    }
    written
}

/// Write every element whose visual changed since the last frame.
pub fn apply_view(state: &mut State) {
    let view = state.sequencer.view();
    if *view == state.applied {
        return;
    }
    let mut document = state.document.clone();
    write_view(&mut document, &state.geometry, &state.applied, view);
    state.applied = view.clone();
}

fn set_text(state: &State, id: &str, text: &str) {
    if let Some(el) = state.document.get_element_by_id(id)
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(text);
    }
}

pub fn update_readouts(state: &State) {
    set_text(state, BASE_VALUE_ID, &format_value(state.base));
    set_text(state, HEIGHT_VALUE_ID, &format_value(state.height));
    set_text(
        state,
        AREA_ID,
        &format!(
            "{} × {} ÷ 2 = {}",
            format_value(state.base),
            format_value(state.height),
            format_area(state.geometry.area)
        ),
    );
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use triangle_core::{Element, ManualTimers, Sequencer, derive};

    use super::*;

    /// Scene stand-in: id -> (opacity, transform).
    #[derive(Default)]
    struct FakeScene {
        nodes: HashMap<&'static str, (String, Option<String>)>,
    }

    impl FakeScene {
        fn without(missing: &[Element]) -> Self {
            let mut scene = FakeScene::default();
            for el in Element::ALL {
                if !missing.contains(&el) {
                    scene.nodes.insert(el.dom_id(), ("0".to_string(), None));
                }
            }
            scene
        }

        fn opacity(&self, el: Element) -> Option<&str> {
            self.nodes.get(el.dom_id()).map(|n| n.0.as_str())
        }
    }

    impl SceneNodes for FakeScene {
        fn write(
            &mut self,
            id: &str,
            opacity: &str,
            transform: Option<&str>,
        ) -> Result<bool, JsValue> {
            let Some(node) = self.nodes.get_mut(id) else {
                return Ok(false);
            };
            *node = (opacity.to_string(), transform.map(str::to_string));
            Ok(true)
        }
    }

    // Drive a full run frame by frame the way the animation loop does.
    fn run(scene: &mut FakeScene) {
        let g = derive(7.0, 4.0);
        let mut seq = Sequencer::new();
        let mut timers = ManualTimers::new();
        let mut applied = ViewState::hidden();
        seq.play(&mut timers);
        let mut t = 0.0;
        while t <= 2000.0 {
            timers.advance_to(t, &mut seq);
            write_view(scene, &g, &applied, seq.view());
            applied = seq.view().clone();
            t += 16.0;
        }
    }

    #[test]
    fn missing_label_does_not_stop_the_rest() {
        let mut scene = FakeScene::without(&[Element::HeightLabel]);
        run(&mut scene);
        assert_eq!(scene.opacity(Element::HeightLabel), None);
        for el in Element::ALL {
            if el != Element::HeightLabel {
                assert_eq!(scene.opacity(el), Some("1"), "{el:?}");
            }
        }
        assert_eq!(scene.nodes[Element::TriangleB.dom_id()].1, None);
    }

    #[test]
    fn empty_scene_is_a_no_op() {
        let mut scene = FakeScene::without(&Element::ALL);
        let g = derive(7.0, 4.0);
        let written = write_view(
            &mut scene,
            &g,
            &ViewState::hidden(),
            &ViewState::at(1850.0),
        );
        assert_eq!(written, 0);
        assert!(scene.nodes.is_empty());
    }

    #[test]
    fn unchanged_view_writes_nothing() {
        let mut scene = FakeScene::without(&[]);
        let g = derive(7.0, 4.0);
        let v = ViewState::at(600.0);
        assert_eq!(write_view(&mut scene, &g, &v, &v), 0);
        assert_eq!(write_view(&mut scene, &g, &ViewState::hidden(), &v), 5);
    }
}
