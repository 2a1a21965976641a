//! Command handlers module
//!
//! This module contains the `lucky-draw` subcommands and their dispatcher.

pub mod draw;
pub mod library;

use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

use crate::config::Settings;
use crate::storage::Library;
use crate::utils::errors::{LuckyDrawError, Result};

pub const USAGE: &str = "\
Usage: lucky-draw <command> [args]

Commands:
  list                               List classes and question sets
  add-class <name> <roster-file>     Create a class from roster text
  add-groups <class> <roster-file>   Append groups to a class
  remove-class <class>               Delete a class
  remove-group <class> <group>       Delete one group of a class
  rename-class <class> <new-name>    Rename a class
  show-class <class>                 Print every group as roster text
  edit-group <class> <group> <file>  Replace one group from single-group roster text
  remove-group <class> <group>       Delete one group of a class
  show-group <class> <group>         Print a group as roster text
  check-roster <roster-file>         Validate roster text without saving it
  add-questions <name> <file>        Create a question set, one question per line
  edit-questions <set> <file>        Replace the questions of a set
  remove-questions <set>             Delete a question set
  draw <class> <set>                 Run an interactive draw
  help                               Show this message
";

/// All available subcommands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    AddClass { name: String, roster: PathBuf },
    AddGroups { class: String, roster: PathBuf },
    RemoveClass { class: String },
    RenameClass { class: String, new_name: String },
    ShowClass { class: String },
    EditGroup { class: String, group: String, roster: PathBuf },
    RemoveGroup { class: String, group: String },
    ShowGroup { class: String, group: String },
    CheckRoster { roster: PathBuf },
    AddQuestions { name: String, file: PathBuf },
    EditQuestions { set: String, file: PathBuf },
    RemoveQuestions { set: String },
    Draw { class: String, set: String },
    Help,
}

impl Command {
    /// Parse the arguments that follow the program name
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };

        let command = match (name.as_str(), rest) {
            ("list", []) => Command::List,
            ("add-class", [name, roster]) => Command::AddClass {
                name: name.clone(),
                roster: PathBuf::from(roster),
            },
            ("add-groups", [class, roster]) => Command::AddGroups {
                class: class.clone(),
                roster: PathBuf::from(roster),
            },
            ("remove-class", [class]) => Command::RemoveClass { class: class.clone() },
            ("rename-class", [class, new_name]) => Command::RenameClass {
                class: class.clone(),
                new_name: new_name.clone(),
            },
            ("show-class", [class]) => Command::ShowClass { class: class.clone() },
            ("edit-group", [class, group, roster]) => Command::EditGroup {
                class: class.clone(),
                group: group.clone(),
                roster: PathBuf::from(roster),
            },
            ("check-roster", [roster]) => Command::CheckRoster { roster: PathBuf::from(roster) },
            ("edit-questions", [set, file]) => Command::EditQuestions {
                set: set.clone(),
                file: PathBuf::from(file),
            },
            ("remove-group", [class, group]) => Command::RemoveGroup {
                class: class.clone(),
                group: group.clone(),
            },
            ("show-group", [class, group]) => Command::ShowGroup {
                class: class.clone(),
                group: group.clone(),
            },
            ("add-questions", [name, file]) => Command::AddQuestions {
                name: name.clone(),
                file: PathBuf::from(file),
            },
            ("remove-questions", [set]) => Command::RemoveQuestions { set: set.clone() },
            ("draw", [class, set]) => Command::Draw {
                class: class.clone(),
                set: set.clone(),
            },
            ("help" | "--help" | "-h", _) => Command::Help,
            (other, _) => {
                return Err(LuckyDrawError::InvalidInput(format!(
                    "unknown command or wrong arguments: {}",
                    other
                )))
            }
        };
        Ok(command)
    }
}

/// Main command dispatcher
pub async fn handle_command<R, W>(
    cmd: Command,
    library: &mut Library,
    settings: &Settings,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match cmd {
        Command::List => library::handle_list(library, out).await,
        Command::AddClass { name, roster } => library::handle_add_class(library, &name, &roster, out).await,
        Command::AddGroups { class, roster } => library::handle_add_groups(library, &class, &roster, out).await,
        Command::RemoveClass { class } => library::handle_remove_class(library, &class, out).await,
        Command::RenameClass { class, new_name } => {
            library::handle_rename_class(library, &class, &new_name, out).await
        }
        Command::ShowClass { class } => library::handle_show_class(library, &class, out).await,
        Command::EditGroup { class, group, roster } => {
            library::handle_edit_group(library, &class, &group, &roster, out).await
        }
        Command::CheckRoster { roster } => library::handle_check_roster(&roster, out).await,
        Command::EditQuestions { set, file } => library::handle_edit_questions(library, &set, &file, out).await,
        Command::RemoveGroup { class, group } => library::handle_remove_group(library, &class, &group, out).await,
        Command::ShowGroup { class, group } => library::handle_show_group(library, &class, &group, out).await,
        Command::AddQuestions { name, file } => library::handle_add_questions(library, &name, &file, out).await,
        Command::RemoveQuestions { set } => library::handle_remove_questions(library, &set, out).await,
        Command::Draw { class, set } => draw::handle_draw(library, settings, &class, &set, input, out).await,
        Command::Help => write_text(out, USAGE).await,
    }
}

pub(crate) async fn write_text<W>(out: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
