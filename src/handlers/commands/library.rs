//! Library command handlers

use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWrite;
use tracing::info;

use crate::models::{parse_questions, Class, Group, Question, QuestionSet};
use crate::roster::{format_group, format_groups, is_valid_group, normalize_tabs, parse_group, parse_groups};
use crate::storage::Library;
use crate::utils::errors::{LuckyDrawError, Result};
use super::write_text;

/// Handle `list`
pub async fn handle_list<W>(library: &Library, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut text = String::from("Classes:\n");
    if library.classes().is_empty() {
        text.push_str("  (none)\n");
    }
    for class in library.classes() {
        text.push_str(&format!(
            "  {} ({} groups, {} students){}\n",
            class.name,
            class.groups.len(),
            class.total_students(),
            if class.is_drawable() { "" } else { " [not drawable]" }
        ));
        for group in &class.groups {
            text.push_str(&format!("    [{}] {} members\n", group.name, group.members.len()));
        }
    }

    text.push_str("Question sets:\n");
    if library.question_sets().is_empty() {
        text.push_str("  (none)\n");
    }
    for set in library.question_sets() {
        text.push_str(&format!("  {} ({} questions)\n", set.name, set.questions.len()));
    }

    write_text(out, &text).await
}

/// Handle `add-class <name> <roster-file>`
pub async fn handle_add_class<W>(library: &mut Library, name: &str, roster: &Path, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let groups = read_roster(roster).await?;
    let count = groups.len();
    library.add_class(Class::new(name, groups)).await?;
    info!(class = name, groups = count, "Class created from roster");
    write_text(out, &format!("Added class {} with {} groups\n", name, count)).await
}

/// Handle `add-groups <class> <roster-file>`
pub async fn handle_add_groups<W>(library: &mut Library, class: &str, roster: &Path, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let class_index = find_class(library, class)?;
    let groups = read_roster(roster).await?;
    let count = groups.len();
    library.add_groups(class_index, groups).await?;
    write_text(out, &format!("Added {} groups to {}\n", count, class)).await
}

/// Handle `remove-class <class>`
pub async fn handle_remove_class<W>(library: &mut Library, class: &str, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let index = find_class(library, class)?;
    library.remove_class(index).await?;
    write_text(out, &format!("Removed class {}\n", class)).await
}

/// Handle `remove-group <class> <group>`
pub async fn handle_remove_group<W>(library: &mut Library, class: &str, group: &str, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let (class_index, group_index) = find_group(library, class, group)?;
    library.remove_group(class_index, group_index).await?;
    write_text(out, &format!("Removed group {} from {}\n", group, class)).await
}

/// Handle `show-group <class> <group>`, printing the group as roster text
pub async fn handle_show_group<W>(library: &Library, class: &str, group: &str, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let (class_index, group_index) = find_group(library, class, group)?;
    let group = &library.class(class_index)?.groups[group_index];
    write_text(out, &format_group(group)).await
}

/// Handle `show-class <class>`, printing every group as roster text
pub async fn handle_show_class<W>(library: &Library, class: &str, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let class = library.class(find_class(library, class)?)?;
    write_text(out, &format_groups(&class.groups)).await
}

/// Handle `rename-class <class> <new-name>`
pub async fn handle_rename_class<W>(library: &mut Library, class: &str, new_name: &str, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let index = find_class(library, class)?;
    let mut renamed = library.class(index)?.clone();
    renamed.name = new_name.to_string();
    library.update_class(index, renamed).await?;
    write_text(out, &format!("Renamed class {} to {}
", class, new_name)).await
}

/// Handle `edit-group <class> <group> <roster-file>`
///
/// The file holds one group; its header may rename the group.
pub async fn handle_edit_group<W>(
    library: &mut Library,
    class: &str,
    group: &str,
    roster: &Path,
    out: &mut W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let (class_index, group_index) = find_group(library, class, group)?;
    let text = fs::read_to_string(roster).await?;
    let edited = parse_group(&normalize_tabs(&text))?;
    let (name, members) = (edited.name.clone(), edited.members.len());
    library.update_group(class_index, group_index, edited).await?;
    info!(class = class, group = %name, members = members, "Group replaced from roster");
    write_text(out, &format!("Updated group {} in {} ({} members)
", name, class, members)).await
}

/// Handle `check-roster <file>` without touching the library
pub async fn handle_check_roster<W>(roster: &Path, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let text = normalize_tabs(&fs::read_to_string(roster).await?);
    let verdict = match parse_groups(&text) {
        Ok(groups) => format!("Valid roster with {} groups\n", groups.len()),
        Err(_) if is_valid_group(&text) => "Only the first group is valid, usable with edit-group\n".to_string(),
        Err(e) => return Err(e),
    };
    write_text(out, &verdict).await
}

/// Handle `add-questions <name> <file>`
pub async fn handle_add_questions<W>(library: &mut Library, name: &str, file: &Path, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let questions = read_questions(file).await?;
    let count = questions.len();
    library.add_question_set(QuestionSet::new(name, questions)).await?;
    write_text(out, &format!("Added question set {} with {} questions\n", name, count)).await
}

/// Handle `edit-questions <set> <file>`, replacing every question of the set
pub async fn handle_edit_questions<W>(library: &mut Library, set: &str, file: &Path, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let index = find_question_set(library, set)?;
    let questions = read_questions(file).await?;
    let count = questions.len();
    library.update_question_set(index, QuestionSet::new(set, questions)).await?;
    write_text(out, &format!("Updated question set {} with {} questions\n", set, count)).await
}

/// Handle `remove-questions <set>`
pub async fn handle_remove_questions<W>(library: &mut Library, set: &str, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let index = find_question_set(library, set)?;
    library.remove_question_set(index).await?;
    write_text(out, &format!("Removed question set {}\n", set)).await
}

async fn read_roster(path: &Path) -> Result<Vec<Group>> {
    let text = fs::read_to_string(path).await?;
    parse_groups(&normalize_tabs(&text))
}

async fn read_questions(path: &Path) -> Result<Vec<Question>> {
    let questions = parse_questions(&fs::read_to_string(path).await?);
    if questions.is_empty() {
        return Err(LuckyDrawError::EmptyList { what: "question file" });
    }
    Ok(questions)
}

pub(crate) fn find_class(library: &Library, name: &str) -> Result<usize> {
    library
        .find_class(name)
        .ok_or_else(|| LuckyDrawError::InvalidInput(format!("no class named {:?}", name)))
}

pub(crate) fn find_question_set(library: &Library, name: &str) -> Result<usize> {
    library
        .find_question_set(name)
        .ok_or_else(|| LuckyDrawError::InvalidInput(format!("no question set named {:?}", name)))
}

fn find_group(library: &Library, class: &str, group: &str) -> Result<(usize, usize)> {
    let class_index = find_class(library, class)?;
    let group_index = library
        .class(class_index)?
        .groups
        .iter()
        .position(|g| g.name == group)
        .ok_or_else(|| LuckyDrawError::InvalidInput(format!("no group named {:?} in {:?}", group, class)))?;
    Ok((class_index, group_index))
}
