//! Roster text parsing
//!
//! A roster is a sequence of bracketed group headers, each followed by one
//! member per line:
//!
//! ```text
//! [A1]
//! 1 Alice
//! 2 Bob
//! [A2]
//! 3 Carol
//! ```
//!
//! Roll numbers and names are separated by any run of Unicode space
//! separators or tabs.

use std::sync::OnceLock;
use regex::Regex;

use crate::models::{Group, Student};
use crate::utils::errors::{LuckyDrawError, Result};

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[\p{Z}\t]+").expect("separator pattern is valid"))
}

/// Parse every group in `text`
pub fn parse_groups(text: &str) -> Result<Vec<Group>> {
    let mut chunks = text.split('[');
    let preamble = chunks.next().unwrap_or_default();
    if !preamble.trim().is_empty() {
        return Err(LuckyDrawError::InvalidRoster(format!(
            "unexpected text before the first group header: {:?}",
            preamble.trim()
        )));
    }

    chunks
        .filter(|chunk| !chunk.is_empty())
        .map(parse_group_chunk)
        .collect()
}

/// Parse the first group in `text`, ignoring anything after it
pub fn parse_group(text: &str) -> Result<Group> {
    let mut chunks = text.split('[');
    let preamble = chunks.next().unwrap_or_default();
    if !preamble.trim().is_empty() {
        return Err(LuckyDrawError::InvalidRoster(
            "expected a group header".to_string()
        ));
    }

    match chunks.next() {
        Some(chunk) => parse_group_chunk(chunk),
        None => Err(LuckyDrawError::InvalidRoster("no group header found".to_string())),
    }
}

/// Validity flag for multi-group roster text
pub fn is_valid_groups(text: &str) -> bool {
    parse_groups(text).is_ok()
}

/// Validity flag for single-group roster text
pub fn is_valid_group(text: &str) -> bool {
    parse_group(text).is_ok()
}

/// Render a group back into roster text
pub fn format_group(group: &Group) -> String {
    let mut text = format!("[{}]\n", group.name);
    for member in &group.members {
        text.push_str(&format!("{} {}\n", member.num, member.name));
    }
    text
}

pub fn format_groups(groups: &[Group]) -> String {
    groups.iter().map(format_group).collect()
}

/// Pasted spreadsheet columns arrive tab separated
pub fn normalize_tabs(text: &str) -> String {
    text.replace('\t', " ")
}

/// `chunk` is everything after a `[`: `Name]\n1 Alice\n...`
fn parse_group_chunk(chunk: &str) -> Result<Group> {
    let (name, body) = chunk.split_once(']').ok_or_else(|| {
        LuckyDrawError::InvalidRoster(format!("group header {:?} is missing ']'", chunk.lines().next().unwrap_or_default()))
    })?;

    if name.trim().is_empty() {
        return Err(LuckyDrawError::InvalidRoster("group name is blank".to_string()));
    }

    let members = body
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(parse_member_line)
        .collect::<Result<Vec<_>>>()?;

    Ok(Group::new(name, members))
}

fn parse_member_line(line: &str) -> Result<Student> {
    let mut parts = separator().splitn(line, 2);
    let num_text = parts.next().unwrap_or_default();
    let num = num_text.parse::<i64>().map_err(|_| {
        LuckyDrawError::InvalidRoster(format!("{:?} does not start with a roll number", line))
    })?;

    let name = parts
        .next()
        .map(|rest| rest.trim())
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| LuckyDrawError::InvalidRoster(format!("{:?} has no student name", line)))?;

    Ok(Student::new(num, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "[A1]\n1 Alice\n2 Bob\n[A2]\n3 Carol\n";

    #[test]
    fn test_parse_groups() {
        let groups = parse_groups(ROSTER).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "A1");
        assert_eq!(groups[0].members, vec![Student::new(1, "Alice"), Student::new(2, "Bob")]);
        assert_eq!(groups[1].members, vec![Student::new(3, "Carol")]);
    }

    #[test]
    fn test_separators_and_line_endings() {
        let groups = parse_groups("[G]\r\n10\tZhang San\r\n11\u{3000}Li\r\n").unwrap();
        assert_eq!(groups[0].members[0], Student::new(10, "Zhang San"));
        assert_eq!(groups[0].members[1], Student::new(11, "Li"));
    }

    #[test]
    fn test_leading_whitespace_is_ignored() {
        assert!(is_valid_groups("\n  [A]\n1 Alice\n"));
    }

    #[test]
    fn test_invalid_rosters() {
        assert!(!is_valid_groups("junk[A]\n1 Alice"));
        assert!(!is_valid_groups("[ ]\n1 Alice"));
        assert!(!is_valid_groups("[A\n1 Alice"));
        assert!(!is_valid_groups("[A]\nAlice 1"));
        assert!(!is_valid_groups("[A]\n1"));
        assert!(!is_valid_groups("[A]\n 1 Alice"));
    }

    #[test]
    fn test_empty_text_has_no_groups() {
        assert_eq!(parse_groups("").unwrap(), vec![]);
        assert!(!is_valid_group(""));
    }

    #[test]
    fn test_parse_group_takes_first() {
        let group = parse_group(ROSTER).unwrap();
        assert_eq!(group.name, "A1");
        assert_eq!(group.members.len(), 2);
    }

    #[test]
    fn test_format_reparses() {
        let groups = parse_groups(ROSTER).unwrap();
        assert_eq!(format_groups(&groups), ROSTER);
        assert_eq!(format_group(&groups[1]), "[A2]\n3 Carol\n");
    }

    #[test]
    fn test_normalize_tabs() {
        assert_eq!(normalize_tabs("1\tAlice"), "1 Alice");
    }
}
