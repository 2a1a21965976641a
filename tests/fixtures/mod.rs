//! Test fixtures for integration tests
//!
//! Roster and question texts in the formats users paste or save to files.

use lucky_draw::models::{Class, Group, Question, QuestionSet, Student};

/// Two groups, one with two members and one with a single member
pub const TWO_GROUP_ROSTER: &str = "[A1]\n1 Alice\n2\tBob\n\n[A2]\n3 Carol\n";

/// Roster for `add-groups`
pub const EXTRA_ROSTER: &str = "[B1]\n10 Dan\n11 Erin Smith\n";

pub const QUESTIONS: &str = "What is 2 + 2?\n\nName a prime number\nSpell 'reel'\n";

pub fn two_group_class() -> Class {
    Class::new(
        "Class 1",
        vec![
            Group::new("A1", vec![Student::new(1, "Alice"), Student::new(2, "Bob")]),
            Group::new("A2", vec![Student::new(3, "Carol")]),
        ],
    )
}

pub fn three_questions() -> QuestionSet {
    QuestionSet::new(
        "Warm-up",
        vec![
            Question::new("What is 2 + 2?"),
            Question::new("Name a prime number"),
            Question::new("Spell 'reel'"),
        ],
    )
}
