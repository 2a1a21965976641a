//! Animated settle sequencer
//!
//! Drives one reel through `Idle -> Centering -> Resting <-> Animating`.
//! Centering snaps the reel so an item sits exactly on the center line and
//! offers the residual to the pick's shared baseline. Animating jumps to the
//! baseline position and performs one timed scroll onto a pre-selected
//! random landing.

use std::sync::Arc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::utils::errors::{LuckyDrawError, Result};
use crate::utils::logging::log_reel_settled;
use super::animation::{run_frames, AnimationSpec};
use super::baseline::SharedBaseline;
use super::reel::{LoopingReel, ReelKind, VisibleItem};
use super::selector::RandomIndexSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SettleState {
    Idle,
    Centering,
    Resting,
    Animating,
}

/// What a presentation layer needs to redraw a reel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReelSnapshot {
    pub kind: ReelKind,
    pub state: SettleState,
    pub scroll: f64,
    pub centered_index: usize,
    pub centered_text: String,
    /// Rows inside the viewport, top to bottom
    pub visible: Vec<VisibleItem>,
}

impl ReelSnapshot {
    /// Placeholder for a reel that has not been built yet
    pub fn empty(kind: ReelKind) -> Self {
        Self {
            kind,
            state: SettleState::Idle,
            scroll: 0.0,
            centered_index: 0,
            centered_text: String::new(),
            visible: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct ReelSequencer {
    reel: LoopingReel,
    spec: AnimationSpec,
    state: SettleState,
    animate_requested: bool,
    selector: RandomIndexSelector,
    snapshots: Arc<watch::Sender<ReelSnapshot>>,
}

impl ReelSequencer {
    /// Build a sequencer with its own snapshot channel
    pub fn new(reel: LoopingReel, spec: AnimationSpec, selector: RandomIndexSelector) -> Self {
        let (snapshots, _) = watch::channel(snapshot_of(&reel, SettleState::Idle));
        Self::with_frames(reel, spec, selector, Arc::new(snapshots))
    }

    /// Build a sequencer publishing into an existing channel
    ///
    /// Receivers already subscribed to `frames` see this reel from its first
    /// snapshot on.
    pub fn with_frames(
        reel: LoopingReel,
        spec: AnimationSpec,
        selector: RandomIndexSelector,
        frames: Arc<watch::Sender<ReelSnapshot>>,
    ) -> Self {
        frames.send_replace(snapshot_of(&reel, SettleState::Idle));
        Self {
            reel,
            spec,
            state: SettleState::Idle,
            animate_requested: false,
            selector,
            snapshots: frames,
        }
    }

    pub fn kind(&self) -> ReelKind {
        self.reel.kind()
    }

    /// The reel being driven
    pub fn reel(&self) -> &LoopingReel {
        &self.reel
    }

    /// Current settle state
    pub fn state(&self) -> SettleState {
        self.state
    }

    /// True from [`trigger`](Self::trigger) until the animation has settled
    pub fn is_animating(&self) -> bool {
        self.animate_requested
    }

    /// Follow every published frame
    pub fn subscribe(&self) -> watch::Receiver<ReelSnapshot> {
        self.snapshots.subscribe()
    }

    /// Swap in a new list, keeping subscribers; the reel must settle again
    pub fn replace_reel(&mut self, reel: LoopingReel) -> Result<()> {
        if self.animate_requested {
            return Err(LuckyDrawError::DrawInProgress);
        }
        self.reel = reel;
        self.state = SettleState::Idle;
        self.publish();
        Ok(())
    }

    /// Arm the reel for its next [`animate`](Self::animate)
    pub fn trigger(&mut self) -> Result<()> {
        if self.animate_requested {
            return Err(LuckyDrawError::DrawInProgress);
        }
        self.animate_requested = true;
        Ok(())
    }

    /// Drop an armed trigger after a failed pick
    pub(crate) fn disarm(&mut self) {
        self.animate_requested = false;
        if self.state == SettleState::Animating {
            self.state = SettleState::Resting;
        }
    }

    /// Snap the item at or just past the center line onto it
    ///
    /// The residual scroll is offered to `baseline`; the first reel to center
    /// sets it for the whole pick.
    pub fn settle_to_center(&mut self, baseline: &SharedBaseline) -> Result<usize> {
        self.state = SettleState::Centering;

        let Some(index) = self.reel.first_at_or_past_center() else {
            warn!(reel = %self.kind(), "Reel layout never reaches the center line");
            self.state = SettleState::Resting;
            return Err(LuckyDrawError::InvalidInput(
                format!("{} reel has no item at the center line", self.kind())
            ));
        };

        let residual = self.reel.center_distance(index);
        self.reel.scroll_by(residual);
        baseline.offer(residual);

        self.state = SettleState::Resting;
        self.publish();
        Ok(self.reel.centered_index())
    }

    /// Spin onto a random item and return its logical index
    ///
    /// `before` receives the landing index as soon as it is chosen, before any
    /// scrolling; `after` runs once the reel has come to rest on it.
    pub async fn animate<B, A>(&mut self, baseline: &SharedBaseline, before: B, after: A) -> Result<usize>
    where
        B: FnOnce(usize),
        A: FnOnce(),
    {
        if !self.animate_requested {
            return Err(LuckyDrawError::InvalidStateTransition {
                from: format!("{:?}", self.state),
                to: "Animating".to_string(),
            });
        }

        if self.state == SettleState::Idle {
            if let Err(e) = self.settle_to_center(baseline) {
                self.animate_requested = false;
                return Err(e);
            }
        }

        let offset = baseline.wait().await;
        self.state = SettleState::Animating;

        let target = match self.reel.random_target(&mut self.selector) {
            Ok(target) => target,
            Err(e) => {
                self.animate_requested = false;
                self.state = SettleState::Resting;
                return Err(e);
            }
        };
        let landing = self.reel.logical_index(target);
        debug!(reel = %self.kind(), target = target, landing = landing, "Reel animation started");
        before(landing);

        // Wind up instantly instead of scrolling back through the strip
        self.reel.scroll_to_item(0, offset);
        let start = self.reel.scroll();
        // With validated geometry the item centered at the baseline is item 1,
        // so this is `(target - 1) * item_size`.
        let distance = (target as f64 - self.reel.centered_rendered_index() as f64)
            * self.reel.geometry().item_size;

        let spec = self.spec;
        let state = self.state;
        let reel = &mut self.reel;
        let snapshots = &self.snapshots;
        run_frames(&spec, |progress| {
            reel.set_scroll(start + distance * progress);
            snapshots.send_replace(snapshot_of(reel, state));
        })
        .await;

        after();
        self.animate_requested = false;
        self.settle_to_center(baseline)?;

        let settled = self.reel.centered_index();
        if let Some(item) = self.reel.item(settled) {
            log_reel_settled(self.kind().as_str(), settled, item.display_text());
        }
        Ok(settled)
    }

    fn publish(&self) {
        self.snapshots.send_replace(snapshot_of(&self.reel, self.state));
    }
}

fn snapshot_of(reel: &LoopingReel, state: SettleState) -> ReelSnapshot {
    ReelSnapshot {
        kind: reel.kind(),
        state,
        scroll: reel.scroll(),
        centered_index: reel.centered_index(),
        centered_text: reel.centered_item().display_text().to_string(),
        visible: reel.visible_items(),
    }
}
