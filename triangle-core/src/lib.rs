//! Geometry and animation timeline for the triangle-area fold demo.
//!
//! Nothing in here touches the DOM: the browser shell and the snapshot
//! renderer both drive these types and only differ in how they schedule
//! cues and paint the resulting [`ViewState`].

pub mod constants;
pub mod controls;
pub mod ease;
pub mod geometry;
pub mod timeline;
pub mod timers;

pub use controls::{BASE_SLIDER, HEIGHT_SLIDER, SliderConfig};
pub use ease::Ease;
pub use geometry::{Geometry, Point, RectOutline, Segment, Viewport, derive, format_area};
pub use timeline::{Cue, Element, Phase, PhaseId, Sequencer, TIMELINE, ViewState, Visual};
pub use timers::{ManualTimers, Timers};
