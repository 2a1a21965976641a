//! Class, group and student models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub members: Vec<Student>,
}

/// A student, identified by roll number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    pub num: i64,
    pub name: String,
}

impl Class {
    pub fn new(name: impl Into<String>, groups: Vec<Group>) -> Self {
        Self { name: name.into(), groups }
    }

    /// Every member of every group, in group order
    pub fn all_students(&self) -> Vec<Student> {
        all_students(&self.groups)
    }

    pub fn total_students(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// A class can be drawn from when it has groups and none of them is empty
    pub fn is_drawable(&self) -> bool {
        !self.groups.is_empty() && self.groups.iter().all(|g| !g.members.is_empty())
    }
}

impl Group {
    pub fn new(name: impl Into<String>, members: Vec<Student>) -> Self {
        Self { name: name.into(), members }
    }
}

impl Student {
    pub fn new(num: i64, name: impl Into<String>) -> Self {
        Self { num, name: name.into() }
    }
}

/// Flatten the members of `groups` into one list
pub fn all_students(groups: &[Group]) -> Vec<Student> {
    groups.iter().flat_map(|g| g.members.iter().cloned()).collect()
}
