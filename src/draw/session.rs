//! Working state of one draw

use serde::Serialize;

use crate::models::{all_students, Class, Group, Question, QuestionSet, Student};
use crate::utils::errors::{LuckyDrawError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickStage {
    PickGroup,
    PickStudent,
}

/// Ephemeral state of a draw; never persisted
///
/// `remaining_groups` is a copy of the class's groups taken at session start,
/// so removing used-up groups never touches the stored class.
#[derive(Debug, Clone)]
pub struct PickSession {
    class_index: usize,
    question_set_index: usize,
    class_name: String,
    question_set_name: String,
    original_group_count: usize,
    remaining_groups: Vec<Group>,
    questions: Vec<Question>,
    picked_count: u32,
    stage: PickStage,
    selected_group_index: Option<usize>,
    can_add_pick_count: bool,
}

impl PickSession {
    /// Start a draw over a copy of `class`'s groups
    ///
    /// Fails with `NotDrawable` when the class has no groups, an empty group,
    /// or the question set has no questions.
    pub fn new(
        class_index: usize,
        class: &Class,
        question_set_index: usize,
        question_set: &QuestionSet,
    ) -> Result<Self> {
        if !class.is_drawable() {
            return Err(LuckyDrawError::NotDrawable(format!(
                "class {:?} needs at least one group and no empty groups",
                class.name
            )));
        }
        if !question_set.is_drawable() {
            return Err(LuckyDrawError::NotDrawable(format!(
                "question set {:?} has no questions",
                question_set.name
            )));
        }

        Ok(Self {
            class_index,
            question_set_index,
            class_name: class.name.clone(),
            question_set_name: question_set.name.clone(),
            original_group_count: class.groups.len(),
            remaining_groups: class.groups.clone(),
            questions: question_set.questions.clone(),
            picked_count: 0,
            stage: PickStage::PickGroup,
            selected_group_index: None,
            can_add_pick_count: true,
        })
    }

    /// Library index of the class being drawn
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Library index of the question set
    pub fn question_set_index(&self) -> usize {
        self.question_set_index
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn question_set_name(&self) -> &str {
        &self.question_set_name
    }

    /// Group count when the session began
    pub fn original_group_count(&self) -> usize {
        self.original_group_count
    }

    /// Groups not yet removed by `NextGroup`
    pub fn remaining_groups(&self) -> &[Group] {
        &self.remaining_groups
    }

    /// Questions of the set, in file order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Every student of every remaining group
    pub fn pool(&self) -> Vec<Student> {
        all_students(&self.remaining_groups)
    }

    /// Counted picks so far; redraws are not counted
    pub fn picked_count(&self) -> u32 {
        self.picked_count
    }

    /// Whether the next reel to settle is the group or the student
    pub fn stage(&self) -> PickStage {
        self.stage
    }

    pub fn selected_group_index(&self) -> Option<usize> {
        self.selected_group_index
    }

    /// Group landed on by the current pick
    pub fn selected_group(&self) -> Option<&Group> {
        self.selected_group_index.and_then(|index| self.remaining_groups.get(index))
    }

    /// False after a redraw until the next group
    pub fn can_add_pick_count(&self) -> bool {
        self.can_add_pick_count
    }

    /// Every original group has been picked
    pub fn is_exhausted(&self) -> bool {
        self.picked_count as usize >= self.original_group_count
    }

    pub(crate) fn set_can_add_pick_count(&mut self, allowed: bool) {
        self.can_add_pick_count = allowed;
    }

    pub(crate) fn set_stage(&mut self, stage: PickStage) {
        self.stage = stage;
    }

    /// Remember the group a pick landed on
    pub(crate) fn select_group(&mut self, index: usize) -> Result<()> {
        if index >= self.remaining_groups.len() {
            return Err(LuckyDrawError::IndexOutOfRange {
                what: "group",
                index,
                len: self.remaining_groups.len(),
            });
        }
        self.selected_group_index = Some(index);
        Ok(())
    }

    /// Back to the group stage with nothing selected
    pub(crate) fn reset_selection(&mut self) {
        self.stage = PickStage::PickGroup;
        self.selected_group_index = None;
    }

    /// Count a finished pick if the session still accepts new ones
    pub(crate) fn record_pick(&mut self) -> bool {
        if !self.can_add_pick_count || self.is_exhausted() {
            return false;
        }
        self.picked_count += 1;
        true
    }

    /// Drop the last picked group from the working copy
    pub(crate) fn remove_selected_group(&mut self) -> Result<Group> {
        let index = self.selected_group_index.ok_or_else(|| LuckyDrawError::InvalidStateTransition {
            from: "no group selected".to_string(),
            to: "NextGroup".to_string(),
        })?;
        if self.remaining_groups.len() <= 1 {
            return Err(LuckyDrawError::InvalidStateTransition {
                from: "last group".to_string(),
                to: "NextGroup".to_string(),
            });
        }

        let removed = self.remaining_groups.remove(index);
        self.selected_group_index = None;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class() -> Class {
        Class::new(
            "Class 1",
            vec![
                Group::new("A1", vec![Student::new(1, "Alice"), Student::new(2, "Bob")]),
                Group::new("A2", vec![Student::new(3, "Carol")]),
            ],
        )
    }

    fn questions() -> QuestionSet {
        QuestionSet::new("Set", vec![Question::new("Q1")])
    }

    #[test]
    fn test_rejects_undrawable_input() {
        let empty_class = Class::new("Empty", vec![]);
        assert!(matches!(
            PickSession::new(0, &empty_class, 0, &questions()),
            Err(LuckyDrawError::NotDrawable(_))
        ));

        let empty_set = QuestionSet::new("None", vec![]);
        assert!(PickSession::new(0, &class(), 0, &empty_set).is_err());
    }

    #[test]
    fn test_remove_selected_group_leaves_class_untouched() {
        let class = class();
        let mut session = PickSession::new(0, &class, 0, &questions()).unwrap();
        session.select_group(0).unwrap();

        let removed = session.remove_selected_group().unwrap();
        assert_eq!(removed.name, "A1");
        assert_eq!(session.remaining_groups().len(), 1);
        assert_eq!(class.groups.len(), 2);
        assert_eq!(session.pool(), vec![Student::new(3, "Carol")]);
        assert!(session.remove_selected_group().is_err());
    }

    #[test]
    fn test_pick_count_is_bounded() {
        let mut session = PickSession::new(0, &class(), 0, &questions()).unwrap();
        assert!(session.record_pick());
        assert!(session.record_pick());
        assert!(!session.record_pick());
        assert_eq!(session.picked_count(), 2);
        assert!(session.is_exhausted());
    }

    #[test]
    fn test_pick_count_suppressed_after_redraw() {
        let mut session = PickSession::new(0, &class(), 0, &questions()).unwrap();
        session.set_can_add_pick_count(false);
        assert!(!session.record_pick());
        assert_eq!(session.picked_count(), 0);
    }
}
