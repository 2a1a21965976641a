//! Question set model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub name: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
}

impl QuestionSet {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self { name: name.into(), questions }
    }

    pub fn is_drawable(&self) -> bool {
        !self.questions.is_empty()
    }
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One question per non-empty line
pub fn parse_questions(text: &str) -> Vec<Question> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(Question::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions_skips_empty_lines() {
        let questions = parse_questions("What is 2+2?\n\nName a prime\r\nWhy?\n");
        let texts: Vec<_> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["What is 2+2?", "Name a prime", "Why?"]);
    }

    #[test]
    fn test_drawable() {
        assert!(!QuestionSet::new("empty", vec![]).is_drawable());
        assert!(QuestionSet::new("one", vec![Question::new("Q")]).is_drawable());
    }
}
