//! Library command integration tests

mod fixtures;
mod helpers;

use assert_matches::assert_matches;
use lucky_draw::models::{Class, Group, Question, QuestionSet, Student};
use lucky_draw::LuckyDrawError;

use fixtures::*;
use helpers::TestContext;

#[tokio::test]
async fn test_add_class_from_roster_file() {
    let mut ctx = TestContext::new().await;
    let roster = ctx.write_file("roster.txt", TWO_GROUP_ROSTER).await;

    let (result, out) = ctx.run(&["add-class", "Class 1", roster.to_str().unwrap()], "").await;
    result.unwrap();
    assert_eq!(out, "Added class Class 1 with 2 groups\n");
    assert_eq!(ctx.library.classes(), &[two_group_class()]);

    let reopened = ctx.reopen().await;
    assert_eq!(reopened.classes(), &[two_group_class()]);
}

#[tokio::test]
async fn test_add_groups_then_show_group() {
    let mut ctx = TestContext::new().await;
    let roster = ctx.write_file("roster.txt", TWO_GROUP_ROSTER).await;
    let extra = ctx.write_file("extra.txt", EXTRA_ROSTER).await;

    ctx.run(&["add-class", "Class 1", roster.to_str().unwrap()], "").await.0.unwrap();
    ctx.run(&["add-groups", "Class 1", extra.to_str().unwrap()], "").await.0.unwrap();
    assert_eq!(ctx.library.classes()[0].groups.len(), 3);

    let (result, out) = ctx.run(&["show-group", "Class 1", "B1"], "").await;
    result.unwrap();
    assert_eq!(out, EXTRA_ROSTER);
}

#[tokio::test]
async fn test_remove_group_and_class() {
    let mut ctx = TestContext::new().await;
    ctx.library.add_class(two_group_class()).await.unwrap();

    ctx.run(&["remove-group", "Class 1", "A1"], "").await.0.unwrap();
    let names: Vec<_> = ctx.library.classes()[0].groups.iter().map(|g| g.name.clone()).collect();
    assert_eq!(names, vec!["A2".to_string()]);

    let (result, _) = ctx.run(&["remove-group", "Class 1", "A1"], "").await;
    assert_matches!(result, Err(LuckyDrawError::InvalidInput(_)));

    ctx.run(&["remove-class", "Class 1"], "").await.0.unwrap();
    assert!(ctx.reopen().await.classes().is_empty());
}

#[tokio::test]
async fn test_add_questions_skips_blank_lines() {
    let mut ctx = TestContext::new().await;
    let file = ctx.write_file("questions.txt", QUESTIONS).await;

    let (result, out) = ctx.run(&["add-questions", "Warm-up", file.to_str().unwrap()], "").await;
    result.unwrap();
    assert_eq!(out, "Added question set Warm-up with 3 questions\n");
    assert_eq!(ctx.reopen().await.question_sets(), &[three_questions()]);

    ctx.run(&["remove-questions", "Warm-up"], "").await.0.unwrap();
    assert!(ctx.library.question_sets().is_empty());
}

#[tokio::test]
async fn test_invalid_roster_changes_nothing() {
    let mut ctx = TestContext::new().await;
    let roster = ctx.write_file("bad.txt", "Class list\n[A1]\n1 Alice\n").await;

    let (result, _) = ctx.run(&["add-class", "Class 1", roster.to_str().unwrap()], "").await;
    assert_matches!(result, Err(LuckyDrawError::InvalidRoster(_)));
    assert!(ctx.library.classes().is_empty());
    assert!(!ctx.settings.class_store_path().exists());
}

#[tokio::test]
async fn test_list_shows_everything() {
    let mut ctx = TestContext::new().await;
    let (_, empty) = ctx.run(&["list"], "").await;
    assert_eq!(empty, "Classes:\n  (none)\nQuestion sets:\n  (none)\n");

    ctx.library.add_class(two_group_class()).await.unwrap();
    ctx.library.add_question_set(three_questions()).await.unwrap();

    let (result, out) = ctx.run(&["list"], "").await;
    result.unwrap();
    assert!(out.contains("Class 1 (2 groups, 3 students)"));
    assert!(out.contains("[A1] 2 members"));
    assert!(out.contains("Warm-up (3 questions)"));
}

#[tokio::test]
async fn test_unknown_names_are_rejected() {
    let mut ctx = TestContext::new().await;
    let (result, _) = ctx.run(&["remove-class", "Nope"], "").await;
    assert_matches!(result, Err(LuckyDrawError::InvalidInput(_)));

    let (result, _) = ctx.run(&["draw", "Nope", "Warm-up"], "").await;
    assert!(result.unwrap_err().is_recoverable());
}

#[tokio::test]
async fn test_edit_group_replaces_members_and_name() {
    let mut ctx = TestContext::new().await;
    ctx.library.add_class(two_group_class()).await.unwrap();
    let edited = ctx.write_file("a1.txt", "[A1b]\n1 Alice\n4\tDave\n[ignored]\n9 Zed\n").await;

    let (result, out) = ctx.run(&["edit-group", "Class 1", "A1", edited.to_str().unwrap()], "").await;
    result.unwrap();
    assert_eq!(out, "Updated group A1b in Class 1 (2 members)\n");

    let reopened = ctx.reopen().await;
    let groups = &reopened.classes()[0].groups;
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0], Group::new("A1b", vec![Student::new(1, "Alice"), Student::new(4, "Dave")]));
    assert_eq!(groups[1].name, "A2");
}

#[tokio::test]
async fn test_edit_group_rejects_text_without_header() {
    let mut ctx = TestContext::new().await;
    ctx.library.add_class(two_group_class()).await.unwrap();
    let edited = ctx.write_file("a1.txt", "1 Alice\n").await;

    let (result, _) = ctx.run(&["edit-group", "Class 1", "A1", edited.to_str().unwrap()], "").await;
    assert_matches!(result, Err(LuckyDrawError::InvalidRoster(_)));
    assert_eq!(ctx.reopen().await.classes(), &[two_group_class()]);
}

#[tokio::test]
async fn test_rename_class_and_show_class() {
    let mut ctx = TestContext::new().await;
    ctx.library.add_class(two_group_class()).await.unwrap();

    let (result, out) = ctx.run(&["rename-class", "Class 1", "Class 2"], "").await;
    result.unwrap();
    assert_eq!(out, "Renamed class Class 1 to Class 2\n");

    let reopened = ctx.reopen().await;
    assert_eq!(reopened.classes()[0].name, "Class 2");
    assert_eq!(reopened.classes()[0].groups, two_group_class().groups);

    let (result, out) = ctx.run(&["show-class", "Class 2"], "").await;
    result.unwrap();
    assert_eq!(out, "[A1]\n1 Alice\n2 Bob\n[A2]\n3 Carol\n");

    let (result, _) = ctx.run(&["show-class", "Class 1"], "").await;
    assert_matches!(result, Err(LuckyDrawError::InvalidInput(_)));
}

#[tokio::test]
async fn test_rename_class_keeps_names_unique() {
    let mut ctx = TestContext::new().await;
    ctx.library.add_class(two_group_class()).await.unwrap();
    ctx.library.add_class(Class::new("Class 2", Vec::new())).await.unwrap();

    let (result, _) = ctx.run(&["rename-class", "Class 2", "Class 1"], "").await;
    assert_matches!(result, Err(LuckyDrawError::InvalidInput(_)));
    assert_eq!(ctx.reopen().await.classes()[1].name, "Class 2");
}

#[tokio::test]
async fn test_edit_questions_replaces_the_set() {
    let mut ctx = TestContext::new().await;
    ctx.library.add_question_set(three_questions()).await.unwrap();
    let file = ctx.write_file("new.txt", "Name a colour\n\n").await;

    let (result, out) = ctx.run(&["edit-questions", "Warm-up", file.to_str().unwrap()], "").await;
    result.unwrap();
    assert_eq!(out, "Updated question set Warm-up with 1 questions\n");
    assert_eq!(
        ctx.reopen().await.question_sets(),
        &[QuestionSet::new("Warm-up", vec![Question::new("Name a colour")])]
    );

    let blank = ctx.write_file("blank.txt", "\n\n").await;
    let (result, _) = ctx.run(&["edit-questions", "Warm-up", blank.to_str().unwrap()], "").await;
    assert_matches!(result, Err(LuckyDrawError::EmptyList { .. }));
    assert_eq!(ctx.library.question_sets()[0].questions.len(), 1);
}

#[tokio::test]
async fn test_check_roster_reports_without_saving() {
    let mut ctx = TestContext::new().await;
    let good = ctx.write_file("good.txt", TWO_GROUP_ROSTER).await;
    let partial = ctx.write_file("partial.txt", "[A1]\n1 Alice\n[A2]\nCarol\n").await;
    let bad = ctx.write_file("bad.txt", "Alice\n").await;

    let (result, out) = ctx.run(&["check-roster", good.to_str().unwrap()], "").await;
    result.unwrap();
    assert_eq!(out, "Valid roster with 2 groups\n");

    let (result, out) = ctx.run(&["check-roster", partial.to_str().unwrap()], "").await;
    result.unwrap();
    assert_eq!(out, "Only the first group is valid, usable with edit-group\n");

    let (result, _) = ctx.run(&["check-roster", bad.to_str().unwrap()], "").await;
    assert_matches!(result, Err(LuckyDrawError::InvalidRoster(_)));
    assert!(!ctx.settings.class_store_path().exists());
}
