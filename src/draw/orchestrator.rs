//! Pick orchestrator
//!
//! Coordinates the group, pool, student and question reels of one draw.
//! A pick spins the group, question and pool reels together; once the pool
//! reel stops, a group with several members gets its own narrowed student
//! reel. Actions are staged with [`PickOrchestrator::trigger`] and played out
//! by [`PickOrchestrator::run`], so a second action can be rejected while
//! reels are still armed.

use std::cell::Cell;
use std::sync::Arc;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::config::Settings;
use crate::models::{Group, Question, Student};
use crate::utils::errors::{LuckyDrawError, Result};
use crate::utils::logging::{log_pick_event, log_rejected_action};
use super::animation::AnimationSpec;
use super::baseline::SharedBaseline;
use super::reel::{LoopingReel, ReelGeometry, ReelKind};
use super::selector::RandomIndexSelector;
use super::sequencer::{ReelSequencer, ReelSnapshot};
use super::session::{PickSession, PickStage};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickPhase {
    NotStarted,
    PickingGroupAndQuestion,
    PickingStudent,
    /// Reels at rest after `n` counted picks
    Settled(u32),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PickAction {
    Start,
    ReDraw,
    NextGroup,
    Finish,
    GoBack,
}

impl PickAction {
    /// Whether the action spins reels
    pub fn is_animated(&self) -> bool {
        matches!(self, PickAction::Start | PickAction::ReDraw | PickAction::NextGroup)
    }
}

impl std::fmt::Display for PickAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickEvent {
    PhaseChanged(PickPhase),
    GroupPreselected { index: usize, name: String },
    ReelSettled { reel: ReelKind, index: usize, text: String },
    PickCounted(u32),
    GroupRemoved { name: String, remaining: usize },
}

/// Result of one completed pick
#[derive(Debug, Clone, PartialEq)]
pub struct PickOutcome {
    pub group_index: usize,
    pub group: Group,
    pub student: Student,
    pub question: Question,
    pub picked_count: u32,
}

/// Animation tuning for each reel
#[derive(Debug, Clone, Copy)]
pub struct ReelSpecs {
    pub group: AnimationSpec,
    pub pool: AnimationSpec,
    pub student: AnimationSpec,
    pub question: AnimationSpec,
}

impl ReelSpecs {
    /// Per-reel easing and duration from the `animation` section
    pub fn from_settings(settings: &Settings) -> Self {
        let frame = settings.frame_interval();
        let animation = &settings.animation;
        Self {
            group: animation.group.to_spec(frame),
            pool: animation.pool.to_spec(frame),
            student: animation.student.to_spec(frame),
            question: animation.question.to_spec(frame),
        }
    }
}

#[derive(Debug)]
pub struct PickOrchestrator {
    session: PickSession,
    phase: PickPhase,
    geometry: ReelGeometry,
    specs: ReelSpecs,
    baseline: SharedBaseline,
    selector: RandomIndexSelector,
    group_reel: ReelSequencer,
    pool_reel: ReelSequencer,
    question_reel: ReelSequencer,
    student_reel: Option<ReelSequencer>,
    /// Outlives each pick's student reel so it can be watched up front
    student_frames: Arc<watch::Sender<ReelSnapshot>>,
    pending: Option<PickAction>,
    last_outcome: Option<PickOutcome>,
    events: broadcast::Sender<PickEvent>,
}

impl PickOrchestrator {
    /// Build the group, pool and question reels for `session`
    /// 
    /// The student reel is built per pick once the landed group is known.
    pub fn new(
        session: PickSession,
        geometry: ReelGeometry,
        specs: ReelSpecs,
        mut selector: RandomIndexSelector,
    ) -> Result<Self> {
        let group_reel = ReelSequencer::new(
            LoopingReel::from_groups(session.remaining_groups(), geometry)?,
            specs.group,
            selector.fork(),
        );
        let pool_reel = ReelSequencer::new(
            LoopingReel::from_students(ReelKind::Pool, &session.pool(), geometry)?,
            specs.pool,
            selector.fork(),
        );
        let question_reel = ReelSequencer::new(
            LoopingReel::from_questions(session.questions(), geometry)?,
            specs.question,
            selector.fork(),
        );
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (student_frames, _) = watch::channel(ReelSnapshot::empty(ReelKind::Student));

        info!(
            class = session.class_name(),
            question_set = session.question_set_name(),
            groups = session.original_group_count(),
            "Draw session created"
        );

        Ok(Self {
            session,
            phase: PickPhase::NotStarted,
            geometry,
            specs,
            baseline: SharedBaseline::new(),
            selector,
            group_reel,
            pool_reel,
            question_reel,
            student_reel: None,
            student_frames: Arc::new(student_frames),
            pending: None,
            last_outcome: None,
            events,
        })
    }

    /// Like [`new`](Self::new) with geometry and timing from `settings`
    pub fn from_settings(session: PickSession, settings: &Settings, selector: RandomIndexSelector) -> Result<Self> {
        Self::new(session, settings.reel_geometry(), ReelSpecs::from_settings(settings), selector)
    }

    pub fn session(&self) -> &PickSession {
        &self.session
    }

    /// Current phase
    pub fn phase(&self) -> PickPhase {
        self.phase
    }

    pub fn baseline(&self) -> &SharedBaseline {
        &self.baseline
    }

    /// The most recent completed pick
    pub fn last_outcome(&self) -> Option<&PickOutcome> {
        self.last_outcome.as_ref()
    }

    /// Pick events as they happen
    pub fn subscribe(&self) -> broadcast::Receiver<PickEvent> {
        self.events.subscribe()
    }

    /// Frames of one reel
    ///
    /// The student channel shows [`ReelSnapshot::empty`] until a pick lands
    /// on a group with several members.
    pub fn subscribe_reel(&self, kind: ReelKind) -> watch::Receiver<ReelSnapshot> {
        match kind {
            ReelKind::Group => self.group_reel.subscribe(),
            ReelKind::Pool => self.pool_reel.subscribe(),
            ReelKind::Question => self.question_reel.subscribe(),
            ReelKind::Student => self.student_frames.subscribe(),
        }
    }

    /// The narrowed reel of the last pick, if its group needed one
    pub fn student_reel(&self) -> Option<&ReelSequencer> {
        self.student_reel.as_ref()
    }

    /// Any reel armed or spinning
    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
            || self.group_reel.is_animating()
            || self.pool_reel.is_animating()
            || self.question_reel.is_animating()
            || self.student_reel.as_ref().is_some_and(ReelSequencer::is_animating)
    }

    /// Actions `trigger` accepts right now
    pub fn available_actions(&self) -> Vec<PickAction> {
        let mut actions = Vec::new();
        if self.phase == PickPhase::Done {
            return actions;
        }

        let picked = self.session.picked_count();
        let idle = !self.is_animating();
        if picked == 0 {
            if idle {
                actions.push(PickAction::Start);
            }
        } else if idle {
            actions.push(PickAction::ReDraw);
            if self.session.remaining_groups().len() > 1 {
                actions.push(PickAction::NextGroup);
            } else {
                actions.push(PickAction::Finish);
            }
        }

        if !self.session.is_exhausted() {
            actions.push(PickAction::GoBack);
        }
        actions
    }

    /// Validate and stage `action`
    ///
    /// Animated actions arm their reels and wait for [`run`](Self::run);
    /// `Finish` and `GoBack` end the session immediately.
    pub fn trigger(&mut self, action: PickAction) -> Result<()> {
        if action.is_animated() && self.is_animating() && self.phase != PickPhase::Done {
            log_rejected_action(&action.to_string(), "reels still animating");
            return Err(LuckyDrawError::DrawInProgress);
        }
        if !self.available_actions().contains(&action) {
            log_rejected_action(&action.to_string(), "not available");
            return Err(LuckyDrawError::InvalidStateTransition {
                from: format!("{:?}", self.phase),
                to: action.to_string(),
            });
        }

        match action {
            PickAction::Start => {
                self.session.reset_selection();
            }
            PickAction::ReDraw => {
                self.session.set_can_add_pick_count(false);
                self.session.reset_selection();
            }
            PickAction::NextGroup => {
                let removed = self.session.remove_selected_group()?;
                self.session.set_can_add_pick_count(true);
                self.rebuild_reels()?;
                self.session.reset_selection();
                let remaining = self.session.remaining_groups().len();
                log_pick_event("group_removed", self.session.picked_count(), Some(&removed.name));
                let _ = self.events.send(PickEvent::GroupRemoved { name: removed.name, remaining });
            }
            PickAction::Finish | PickAction::GoBack => {
                self.pending = None;
                self.disarm_reels();
                self.set_phase(PickPhase::Done);
                log_pick_event(&action.to_string(), self.session.picked_count(), None);
                return Ok(());
            }
        }

        self.group_reel.trigger()?;
        self.pool_reel.trigger()?;
        self.question_reel.trigger()?;
        self.student_reel = None;
        self.student_frames.send_replace(ReelSnapshot::empty(ReelKind::Student));
        self.pending = Some(action);
        debug!(action = %action, "Pick staged");
        Ok(())
    }

    /// Play out the staged action's reels concurrently
    pub async fn run(&mut self) -> Result<PickOutcome> {
        let action = self.pending.ok_or_else(|| LuckyDrawError::InvalidStateTransition {
            from: format!("{:?}", self.phase),
            to: "run".to_string(),
        })?;

        self.set_phase(PickPhase::PickingGroupAndQuestion);
        log_pick_event(&action.to_string(), self.session.picked_count(), None);

        let result = self.spin().await;
        self.pending = None;
        let (group_index, question_index, student, used_student_reel) = match result {
            Ok(spun) => spun,
            Err(e) => {
                self.disarm_reels();
                return Err(e);
            }
        };

        self.session.select_group(group_index)?;
        if used_student_reel {
            self.session.set_stage(PickStage::PickStudent);
        }

        let question = self.session.questions()[question_index].clone();
        let group = self.session.remaining_groups()[group_index].clone();
        let outcome = PickOutcome {
            group_index,
            group,
            student,
            question,
            picked_count: self.session.picked_count(),
        };

        self.set_phase(PickPhase::Settled(outcome.picked_count));
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Trigger `action` and, when it spins reels, run it
    pub async fn perform(&mut self, action: PickAction) -> Result<Option<PickOutcome>> {
        self.trigger(action)?;
        if action.is_animated() {
            return self.run().await.map(Some);
        }
        Ok(None)
    }

    /// Returns `(group index, question index, student, used the student reel)`
    async fn spin(&mut self) -> Result<(usize, usize, Student, bool)> {
        let Self {
            session,
            phase,
            geometry,
            specs,
            baseline,
            selector,
            group_reel,
            pool_reel,
            question_reel,
            student_reel,
            student_frames,
            events,
            ..
        } = self;
        let baseline: &SharedBaseline = baseline;
        let events: &broadcast::Sender<PickEvent> = events;

        let groups = session.remaining_groups();
        let (selected_tx, mut selected_rx) = watch::channel(None::<usize>);
        let question_settled = Cell::new(false);

        let group_fut = group_reel.animate(
            baseline,
            |index| {
                selected_tx.send_replace(Some(index));
                let name = groups[index].name.clone();
                debug!(index = index, name = %name, "Group preselected");
                let _ = events.send(PickEvent::GroupPreselected { index, name });
            },
            || {},
        );

        let question_fut = question_reel.animate(baseline, |_| {}, || question_settled.set(true));

        // Resolves to (member index within the chosen group, used the student reel)
        let student_fut = async {
            pool_reel.animate(baseline, |_| {}, || {}).await?;

            let group_index = match selected_rx.wait_for(Option::is_some).await {
                Ok(selected) => (*selected).unwrap_or_default(),
                Err(_) => {
                    return Err(LuckyDrawError::InvalidStateTransition {
                        from: "group reel stopped".to_string(),
                        to: "PickingStudent".to_string(),
                    })
                }
            };
            let members = &groups[group_index].members;

            match members.len() {
                0 => Err(LuckyDrawError::EmptyList { what: "group" }),
                1 => Ok((0, false)),
                _ => {
                    *phase = PickPhase::PickingStudent;
                    let _ = events.send(PickEvent::PhaseChanged(PickPhase::PickingStudent));

                    let reel = LoopingReel::from_students(ReelKind::Student, members, *geometry)?;
                    let sequencer = student_reel.insert(ReelSequencer::with_frames(
                        reel,
                        specs.student,
                        selector.fork(),
                        student_frames.clone(),
                    ));
                    sequencer.trigger()?;
                    let index = sequencer.animate(baseline, |_| {}, || {}).await?;
                    Ok((index, true))
                }
            }
        };

        let (group_index, question_index, (member_index, used_student_reel)) =
            tokio::try_join!(group_fut, question_fut, student_fut)?;

        let group = &groups[group_index];
        let student = group.members[member_index].clone();
        let _ = events.send(PickEvent::ReelSettled {
            reel: ReelKind::Group,
            index: group_index,
            text: group.name.clone(),
        });
        let _ = events.send(PickEvent::ReelSettled {
            reel: ReelKind::Question,
            index: question_index,
            text: session.questions()[question_index].text.clone(),
        });
        let _ = events.send(PickEvent::ReelSettled {
            reel: if used_student_reel { ReelKind::Student } else { ReelKind::Pool },
            index: member_index,
            text: student.name.clone(),
        });

        if question_settled.get() && session.record_pick() {
            let count = session.picked_count();
            log_pick_event("pick_counted", count, Some(&student.name));
            let _ = events.send(PickEvent::PickCounted(count));
        }

        Ok((group_index, question_index, student, used_student_reel))
    }

    fn disarm_reels(&mut self) {
        self.group_reel.disarm();
        self.pool_reel.disarm();
        self.question_reel.disarm();
        if let Some(reel) = self.student_reel.as_mut() {
            reel.disarm();
        }
    }

    fn rebuild_reels(&mut self) -> Result<()> {
        let groups = LoopingReel::from_groups(self.session.remaining_groups(), self.geometry)?;
        let pool = LoopingReel::from_students(ReelKind::Pool, &self.session.pool(), self.geometry)?;
        self.group_reel.replace_reel(groups)?;
        self.pool_reel.replace_reel(pool)?;
        Ok(())
    }

    fn set_phase(&mut self, phase: PickPhase) {
        if self.phase != phase {
            self.phase = phase;
            let _ = self.events.send(PickEvent::PhaseChanged(phase));
        }
    }
}
