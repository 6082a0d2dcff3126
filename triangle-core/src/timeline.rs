//! The four-phase fold animation.
//!
//! The timeline is data ([`TIMELINE`]); the [`Sequencer`] owns the
//! [`ViewState`] and only ever advances it from cues of the current
//! generation. Every `play` and every geometry change bumps the generation,
//! so cues scheduled by an older run are dropped even when the host cannot
//! cancel its timers.

use serde::{Deserialize, Serialize};

use crate::constants::{
    FLIP_PARTNER_AT_MS, FLIP_PARTNER_MS, OUTLINE_AT_MS, OUTLINE_MS, REVEAL_GUIDES_AT_MS,
    REVEAL_GUIDES_MS, REVEAL_TRIANGLE_AT_MS, REVEAL_TRIANGLE_MS,
};
use crate::ease::Ease;
use crate::timers::Timers;

/// Drawable elements whose visual state the timeline animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    TriangleA,
    TriangleB,
    BaseArrow,
    HeightArrow,
    BaseLabel,
    HeightLabel,
    RectOutline,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Element::TriangleA,
        Element::TriangleB,
        Element::BaseArrow,
        Element::HeightArrow,
        Element::BaseLabel,
        Element::HeightLabel,
        Element::RectOutline,
    ];

    /// Stable DOM id of the element in the rendered scene.
    pub fn dom_id(self) -> &'static str {
        match self {
            Element::TriangleA => "triA",
            Element::TriangleB => "triB",
            Element::BaseArrow => "baseArrow",
            Element::HeightArrow => "heightArrow",
            Element::BaseLabel => "labelB",
            Element::HeightLabel => "labelH",
            Element::RectOutline => "rectOutline",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Opacity plus horizontal scale. `scale_x == 1.0` means untransformed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub opacity: f64,
    pub scale_x: f64,
}

impl Visual {
    pub const HIDDEN: Visual = Visual {
        opacity: 0.0,
        scale_x: 1.0,
    };
    pub const SHOWN: Visual = Visual {
        opacity: 1.0,
        scale_x: 1.0,
    };

    pub fn is_identity_transform(&self) -> bool {
        self.scale_x == 1.0
    }
}

/// Visual state of every animated element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    visuals: [Visual; 7],
}

impl Default for ViewState {
    fn default() -> Self {
        Self::hidden()
    }
}

impl ViewState {
    pub fn hidden() -> Self {
        ViewState {
            visuals: [Visual::HIDDEN; 7],
        }
    }

    pub fn get(&self, el: Element) -> Visual {
        self.visuals[el.index()]
    }

    pub fn set(&mut self, el: Element, v: Visual) {
        self.visuals[el.index()] = v;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, Visual)> + '_ {
        Element::ALL.iter().map(move |&e| (e, self.get(e)))
    }

    pub fn all_hidden(&self) -> bool {
        self.visuals.iter().all(|v| *v == Visual::HIDDEN)
    }

    pub fn all_shown(&self) -> bool {
        self.visuals.iter().all(|v| *v == Visual::SHOWN)
    }

    /// State of an uninterrupted run `elapsed_ms` after play.
    pub fn at(elapsed_ms: f64) -> Self {
        let mut v = ViewState::hidden();
        for phase in &TIMELINE {
            let local = elapsed_ms - phase.at_ms as f64;
            if local >= 0.0 {
                phase.apply(phase.progress(local), &mut v);
            }
        }
        v
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseId {
    RevealTriangle,
    RevealGuides,
    FlipPartner,
    OutlineRectangle,
}

/// One step of the reveal: which elements, when, how long, what curve.
#[derive(Clone, Copy, Debug)]
pub struct Phase {
    pub id: PhaseId,
    pub at_ms: u32,
    pub duration_ms: u32,
    pub ease: Ease,
    pub targets: &'static [Element],
    /// Also unfold from a mirrored pose (scale_x −1 → 1).
    pub flip: bool,
}

impl Phase {
    /// Eased progress `local_ms` after the phase started, in [0, 1].
    pub fn progress(&self, local_ms: f64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.ease.apply(local_ms / self.duration_ms as f64)
    }

    pub fn apply(&self, p: f64, view: &mut ViewState) {
        let v = Visual {
            opacity: p,
            scale_x: if self.flip { -1.0 + 2.0 * p } else { 1.0 },
        };
        for &el in self.targets {
            view.set(el, v);
        }
    }

    pub fn ends_at_ms(&self) -> u32 {
        self.at_ms + self.duration_ms
    }
}

pub const TIMELINE: [Phase; 4] = [
    Phase {
        id: PhaseId::RevealTriangle,
        at_ms: REVEAL_TRIANGLE_AT_MS,
        duration_ms: REVEAL_TRIANGLE_MS,
        ease: Ease::Linear,
        targets: &[Element::TriangleA],
        flip: false,
    },
    Phase {
        id: PhaseId::RevealGuides,
        at_ms: REVEAL_GUIDES_AT_MS,
        duration_ms: REVEAL_GUIDES_MS,
        ease: Ease::Linear,
        targets: &[
            Element::BaseArrow,
            Element::HeightArrow,
            Element::BaseLabel,
            Element::HeightLabel,
        ],
        flip: false,
    },
    Phase {
        id: PhaseId::FlipPartner,
        at_ms: FLIP_PARTNER_AT_MS,
        duration_ms: FLIP_PARTNER_MS,
        ease: Ease::InOut,
        targets: &[Element::TriangleB],
        flip: true,
    },
    Phase {
        id: PhaseId::OutlineRectangle,
        at_ms: OUTLINE_AT_MS,
        duration_ms: OUTLINE_MS,
        ease: Ease::Linear,
        targets: &[Element::RectOutline],
        flip: false,
    },
];

/// Total length of one run.
pub fn total_ms() -> u32 {
    TIMELINE.iter().map(Phase::ends_at_ms).max().unwrap_or(0)
}

/// A scheduled phase start, tagged with the run that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub generation: u64,
    pub phase: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Sequencer {
    generation: u64,
    started: [Option<f64>; 4],
    view: ViewState,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Start a new run: cancel what the host can, hide everything and
    /// schedule one cue per phase.
    pub fn play<T: Timers>(&mut self, timers: &mut T) {
        self.restart(timers);
        for (i, phase) in TIMELINE.iter().enumerate() {
            timers.schedule(
                phase.at_ms,
                Cue {
                    generation: self.generation,
                    phase: i,
                },
            );
        }
    }

    /// Geometry changed: drop the current run and hide everything.
    pub fn invalidate<T: Timers>(&mut self, timers: &mut T) {
        self.restart(timers);
    }

    fn restart<T: Timers>(&mut self, timers: &mut T) {
        timers.cancel_pending();
        self.generation += 1;
        self.started = [None; 4];
        self.view = ViewState::hidden();
    }

    /// Start the cued phase at `now`. Returns false for stale or unknown cues.
    pub fn fire(&mut self, cue: Cue, now: f64) -> bool {
        if cue.generation != self.generation || cue.phase >= TIMELINE.len() {
            return false;
        }
        if self.started[cue.phase].is_none() {
            self.started[cue.phase] = Some(now);
            TIMELINE[cue.phase].apply(0.0, &mut self.view);
        }
        true
    }

    /// Advance every started phase to `now`. Returns true while the run
    /// still has phases pending or in motion.
    pub fn tick(&mut self, now: f64) -> bool {
        let mut moving = false;
        for (phase, started) in TIMELINE.iter().zip(self.started) {
            match started {
                Some(t0) => {
                    let local = (now - t0).max(0.0);
                    phase.apply(phase.progress(local), &mut self.view);
                    if local < phase.duration_ms as f64 {
                        moving = true;
                    }
                }
                None => moving = true,
            }
        }
        // An idle sequencer has nothing pending either.
        moving && self.started.iter().any(Option::is_some)
    }

    pub fn phase_started(&self, id: PhaseId) -> bool {
        TIMELINE
            .iter()
            .position(|p| p.id == id)
            .and_then(|i| self.started[i])
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualTimers;

    #[test]
    fn timeline_offsets_are_fixed() {
        let at: Vec<u32> = TIMELINE.iter().map(|p| p.at_ms).collect();
        assert_eq!(at, vec![0, 350, 900, 1550]);
        let dur: Vec<u32> = TIMELINE.iter().map(|p| p.duration_ms).collect();
        assert_eq!(dur, vec![300, 250, 600, 300]);
        assert_eq!(total_ms(), 1850);
        for w in TIMELINE.windows(2) {
            assert!(w[0].at_ms < w[1].at_ms);
        }
    }

    #[test]
    fn idle_view_is_hidden() {
        let s = Sequencer::new();
        assert!(s.view().all_hidden());
        assert!(ViewState::at(-1.0).all_hidden());
    }

    #[test]
    fn pure_view_follows_table() {
        let v = ViewState::at(150.0);
        assert!((v.get(Element::TriangleA).opacity - 0.5).abs() < 1e-9);
        assert_eq!(v.get(Element::BaseLabel), Visual::HIDDEN);

        let v = ViewState::at(475.0);
        assert_eq!(v.get(Element::TriangleA), Visual::SHOWN);
        for el in [
            Element::BaseArrow,
            Element::HeightArrow,
            Element::BaseLabel,
            Element::HeightLabel,
        ] {
            assert!((v.get(el).opacity - 0.5).abs() < 1e-9);
        }

        let v = ViewState::at(900.0);
        assert_eq!(
            v.get(Element::TriangleB),
            Visual {
                opacity: 0.0,
                scale_x: -1.0
            }
        );
        let v = ViewState::at(1200.0);
        let b = v.get(Element::TriangleB);
        assert!(b.scale_x.abs() < 1e-4 && (b.opacity - 0.5).abs() < 1e-4);
        assert_eq!(v.get(Element::RectOutline), Visual::HIDDEN);

        assert!(ViewState::at(1850.0).all_shown());
        assert!(ViewState::at(10_000.0).all_shown());
    }

    #[test]
    fn sequencer_run_matches_pure_view() {
        let mut seq = Sequencer::new();
        let mut timers = ManualTimers::new();
        seq.play(&mut timers);
        for t in [0.0, 120.0, 360.0, 600.0, 1000.0, 1400.0, 1600.0, 1850.0] {
            timers.advance_to(t, &mut seq);
            assert_eq!(seq.view(), &ViewState::at(t), "t={t}");
        }
        assert!(seq.view().all_shown());
        assert!(!seq.tick(5000.0));
    }

    #[test]
    fn phases_start_in_order() {
        let mut seq = Sequencer::new();
        let mut timers = ManualTimers::new();
        seq.play(&mut timers);
        timers.advance_to(349.0, &mut seq);
        assert!(seq.phase_started(PhaseId::RevealTriangle));
        assert!(!seq.phase_started(PhaseId::RevealGuides));
        timers.advance_to(899.0, &mut seq);
        assert!(seq.phase_started(PhaseId::RevealGuides));
        assert!(!seq.phase_started(PhaseId::FlipPartner));
        assert_eq!(seq.view().get(Element::TriangleB), Visual::HIDDEN);
        timers.advance_to(1549.0, &mut seq);
        assert!(!seq.phase_started(PhaseId::OutlineRectangle));
        assert!(seq.tick(1549.0));
    }

    #[test]
    fn replay_mid_run_with_cancellation_ends_fully_shown() {
        let mut seq = Sequencer::new();
        let mut timers = ManualTimers::new();
        seq.play(&mut timers);
        timers.advance_to(1000.0, &mut seq);
        seq.play(&mut timers);
        assert!(seq.view().all_hidden());
        assert_eq!(timers.pending(), 4);
        timers.advance_to(1000.0 + 1850.0, &mut seq);
        assert!(seq.view().all_shown());
    }

    #[test]
    fn replay_mid_run_ignores_stale_cues_without_cancellation() {
        let mut seq = Sequencer::new();
        let mut timers = ManualTimers::without_cancellation();
        seq.play(&mut timers);
        timers.advance_to(400.0, &mut seq);
        seq.play(&mut timers);
        // Old cues for 900 and 1550 are still queued alongside the new run.
        assert_eq!(timers.pending(), 6);
        timers.advance_to(950.0, &mut seq);
        // The stale flip cue at 900 must not have started the partner.
        assert_eq!(seq.view().get(Element::TriangleB), Visual::HIDDEN);
        assert_eq!(timers.stale_fired(), 1);
        timers.advance_to(400.0 + 1850.0, &mut seq);
        assert!(seq.view().all_shown());
        assert_eq!(timers.stale_fired(), 2);
    }

    #[test]
    fn geometry_change_hides_everything_and_drops_run() {
        let mut seq = Sequencer::new();
        let mut timers = ManualTimers::without_cancellation();
        seq.play(&mut timers);
        timers.advance_to(1000.0, &mut seq);
        assert!(!seq.view().all_hidden());
        seq.invalidate(&mut timers);
        assert!(seq.view().all_hidden());
        timers.advance_to(3000.0, &mut seq);
        assert!(seq.view().all_hidden());
    }

    #[test]
    fn unknown_cue_is_rejected() {
        let mut seq = Sequencer::new();
        let mut timers = ManualTimers::new();
        seq.play(&mut timers);
        let cue = Cue {
            generation: seq.generation(),
            phase: 9,
        };
        assert!(!seq.fire(cue, 0.0));
    }
}
