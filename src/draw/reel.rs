//! Looping reel geometry
//!
//! A reel shows `n` items as a vertical strip repeated `repeat_count` times
//! end to end, so a long scroll never runs out of items before it settles.
//! Positions are in pixels; `scroll` is the distance from the top of the
//! rendered strip to the top of the viewport.

use std::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

use crate::models::{Group, Question, Student};
use crate::utils::errors::{LuckyDrawError, Result};
use super::selector::RandomIndexSelector;

/// Item budget a reel's repetitions are sized against
pub const REPEAT_BASE: usize = 100;

/// Tolerance for "reached the center line" comparisons
const CENTER_EPSILON: f64 = 1e-6;

/// Something a reel can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReelItem {
    Group(Group),
    Student(Student),
    Question(Question),
}

impl ReelItem {
    /// Text shown on the reel
    pub fn display_text(&self) -> &str {
        match self {
            ReelItem::Group(group) => &group.name,
            ReelItem::Student(student) => &student.name,
            ReelItem::Question(question) => &question.text,
        }
    }
}

/// Which reel of a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReelKind {
    Group,
    /// Every student of every remaining group
    Pool,
    /// Members of the chosen group only
    Student,
    Question,
}

impl ReelKind {
    /// Lowercase name used in logs and CLI frames
    pub fn as_str(&self) -> &'static str {
        match self {
            ReelKind::Group => "group",
            ReelKind::Pool => "pool",
            ReelKind::Student => "student",
            ReelKind::Question => "question",
        }
    }

    /// Second-stage reels use the longer repeat count
    pub fn is_second_stage(&self) -> bool {
        matches!(self, ReelKind::Student)
    }
}

impl std::fmt::Display for ReelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelGeometry {
    pub item_size: f64,
    pub viewport_height: f64,
}

/// How many times a list of `n` items is repeated on its reel
///
/// `floor(100 / n)`, halved for the nested second-stage reel, never below 2.
pub fn repeat_count(n: usize, is_second_stage: bool) -> usize {
    let mut count = REPEAT_BASE.checked_div(n).unwrap_or(0);
    if is_second_stage {
        count /= 2;
    }
    count.max(2)
}

/// Rendered indices a randomized landing may hit: the second-to-last repetition,
/// shifted back by one
pub fn target_range(n: usize, repeat: usize) -> RangeInclusive<usize> {
    let start = n * (repeat - 1) - 1;
    start..=start + (n - 1)
}

/// One rendered row currently inside the viewport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleItem {
    pub rendered_index: usize,
    pub logical_index: usize,
    /// Top edge relative to the viewport top
    pub offset: f64,
    /// Opacity and scale factor in `[0.5, 1]`
    pub emphasis: f64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct LoopingReel {
    kind: ReelKind,
    items: Vec<ReelItem>,
    repeat: usize,
    geometry: ReelGeometry,
    scroll: f64,
}

impl LoopingReel {
    /// Lay out `items` repeated [`repeat_count`] times
    ///
    /// Fails with `EmptyList` for no items.
    pub fn new(kind: ReelKind, items: Vec<ReelItem>, geometry: ReelGeometry) -> Result<Self> {
        if items.is_empty() {
            return Err(LuckyDrawError::EmptyList { what: "reel" });
        }

        let repeat = repeat_count(items.len(), kind.is_second_stage());
        Ok(Self {
            kind,
            items,
            repeat,
            geometry,
            scroll: 0.0,
        })
    }

    /// Group reel, one row per group name
    pub fn from_groups(groups: &[Group], geometry: ReelGeometry) -> Result<Self> {
        Self::new(ReelKind::Group, groups.iter().cloned().map(ReelItem::Group).collect(), geometry)
    }

    /// Pool or student reel over `students`
    pub fn from_students(kind: ReelKind, students: &[Student], geometry: ReelGeometry) -> Result<Self> {
        Self::new(kind, students.iter().cloned().map(ReelItem::Student).collect(), geometry)
    }

    /// Question reel, one row per question
    pub fn from_questions(questions: &[Question], geometry: ReelGeometry) -> Result<Self> {
        Self::new(ReelKind::Question, questions.iter().cloned().map(ReelItem::Question).collect(), geometry)
    }

    pub fn kind(&self) -> ReelKind {
        self.kind
    }

    /// Number of logical items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// How many times the items are laid out
    pub fn repeat(&self) -> usize {
        self.repeat
    }

    pub fn geometry(&self) -> ReelGeometry {
        self.geometry
    }

    /// `len() * repeat()`
    pub fn rendered_len(&self) -> usize {
        self.items.len() * self.repeat
    }

    /// Item by logical index
    pub fn item(&self, logical_index: usize) -> Option<&ReelItem> {
        self.items.get(logical_index)
    }

    /// Map a rendered position back to its item
    pub fn logical_index(&self, rendered_index: usize) -> usize {
        rendered_index % self.items.len()
    }

    /// Current offset of the strip from its top, in pixels
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Largest offset that still fills the viewport
    pub fn max_scroll(&self) -> f64 {
        (self.rendered_len() as f64 * self.geometry.item_size - self.geometry.viewport_height).max(0.0)
    }

    /// Move to an absolute position, clamped to the strip
    pub fn set_scroll(&mut self, position: f64) {
        self.scroll = position.clamp(0.0, self.max_scroll());
    }

    /// Scroll by `delta` pixels and return the distance actually moved
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        let before = self.scroll;
        self.set_scroll(before + delta);
        self.scroll - before
    }

    /// Put rendered item `index` at the top of the viewport, then scroll `offset` further
    pub fn scroll_to_item(&mut self, index: usize, offset: f64) {
        self.set_scroll(index as f64 * self.geometry.item_size + offset);
    }

    /// Top edge of a rendered item relative to the viewport top
    pub fn item_offset(&self, rendered_index: usize) -> f64 {
        rendered_index as f64 * self.geometry.item_size - self.scroll
    }

    /// Item midpoint minus viewport midpoint; positive means below the center line
    pub fn center_distance(&self, rendered_index: usize) -> f64 {
        self.item_offset(rendered_index) + self.geometry.item_size / 2.0
            - self.geometry.viewport_height / 2.0
    }

    fn visible_range(&self) -> RangeInclusive<usize> {
        let size = self.geometry.item_size;
        let last = self.rendered_len() - 1;
        let first = ((self.scroll / size).floor() as usize).min(last);
        let bottom = (((self.scroll + self.geometry.viewport_height) / size).ceil() as usize)
            .saturating_sub(1)
            .min(last);
        first..=bottom.max(first)
    }

    /// First visible item whose midpoint has reached or passed the center line
    pub fn first_at_or_past_center(&self) -> Option<usize> {
        self.visible_range()
            .find(|&index| self.center_distance(index) >= -CENTER_EPSILON)
    }

    /// Rendered item whose midpoint is nearest the viewport center
    pub fn centered_rendered_index(&self) -> usize {
        let size = self.geometry.item_size;
        let position = (self.scroll + self.geometry.viewport_height / 2.0 - size / 2.0) / size;
        (position.round().max(0.0) as usize).min(self.rendered_len() - 1)
    }

    /// Logical index of the centered item
    pub fn centered_index(&self) -> usize {
        self.logical_index(self.centered_rendered_index())
    }

    /// Item under the center line
    pub fn centered_item(&self) -> &ReelItem {
        &self.items[self.centered_index()]
    }

    /// `1 - 0.5 * min(1, |distance| / half item)`
    pub fn emphasis(&self, rendered_index: usize) -> f64 {
        let half = self.geometry.item_size / 2.0;
        let distance = self.center_distance(rendered_index).abs();
        1.0 - (distance / half).min(1.0) * 0.5
    }

    /// Rows intersecting the viewport, top first, with their emphasis
    pub fn visible_items(&self) -> Vec<VisibleItem> {
        self.visible_range()
            .map(|rendered_index| {
                let logical_index = self.logical_index(rendered_index);
                VisibleItem {
                    rendered_index,
                    logical_index,
                    offset: self.item_offset(rendered_index),
                    emphasis: self.emphasis(rendered_index),
                    text: self.items[logical_index].display_text().to_string(),
                }
            })
            .collect()
    }

    /// Randomized landing index inside [`target_range`]
    pub fn random_target(&self, selector: &mut RandomIndexSelector) -> Result<usize> {
        let start = *target_range(self.len(), self.repeat).start();
        Ok(start + selector.select(self.len())?)
    }
}
