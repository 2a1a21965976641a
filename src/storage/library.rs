//! Class and question set library
//!
//! In-memory lists of classes and question sets backed by their stores.
//! Every mutation updates the list first and then rewrites the whole
//! collection file.

use tokio::sync::broadcast;
use tracing::info;

use crate::config::Settings;
use crate::draw::PickSession;
use crate::models::{Class, Group, QuestionSet};
use crate::utils::errors::{LuckyDrawError, Result};
use crate::utils::logging::log_library_change;
use super::json_store::JsonListStore;

const EVENT_CAPACITY: usize = 32;

/// Change notification for library subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryEvent {
    ClassAdded { index: usize, name: String },
    ClassRemoved { index: usize, name: String },
    ClassUpdated { index: usize },
    GroupsAdded { class_index: usize, count: usize },
    GroupRemoved { class_index: usize, group_index: usize, name: String },
    GroupUpdated { class_index: usize, group_index: usize },
    QuestionSetAdded { index: usize, name: String },
    QuestionSetRemoved { index: usize, name: String },
    QuestionSetUpdated { index: usize },
}

#[derive(Debug)]
pub struct Library {
    classes: Vec<Class>,
    question_sets: Vec<QuestionSet>,
    class_store: JsonListStore<Class>,
    question_store: JsonListStore<QuestionSet>,
    events: broadcast::Sender<LibraryEvent>,
}

impl Library {
    /// Load both collections, treating missing files as empty
    pub async fn open(
        class_store: JsonListStore<Class>,
        question_store: JsonListStore<QuestionSet>,
    ) -> Result<Self> {
        let classes = class_store.load_or_empty().await?;
        let question_sets = question_store.load_or_empty().await?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        info!(
            classes = classes.len(),
            question_sets = question_sets.len(),
            "Library loaded"
        );

        Ok(Self {
            classes,
            question_sets,
            class_store,
            question_store,
            events,
        })
    }

    /// Open the library at the store paths named in `settings`
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        Self::open(
            JsonListStore::new(settings.class_store_path()),
            JsonListStore::new(settings.question_store_path()),
        )
        .await
    }

    /// All classes in stored order
    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    /// All question sets in stored order
    pub fn question_sets(&self) -> &[QuestionSet] {
        &self.question_sets
    }

    /// Receive a [`LibraryEvent`] for every committed change
    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.events.subscribe()
    }

    /// Index of the class called `name`
    pub fn find_class(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|class| class.name == name)
    }

    /// Index of the question set called `name`
    pub fn find_question_set(&self, name: &str) -> Option<usize> {
        self.question_sets.iter().position(|set| set.name == name)
    }

    /// Class at `index`, or `IndexOutOfRange`
    pub fn class(&self, index: usize) -> Result<&Class> {
        self.classes.get(index).ok_or(LuckyDrawError::IndexOutOfRange {
            what: "class",
            index,
            len: self.classes.len(),
        })
    }

    /// Question set at `index`, or `IndexOutOfRange`
    pub fn question_set(&self, index: usize) -> Result<&QuestionSet> {
        self.question_sets.get(index).ok_or(LuckyDrawError::IndexOutOfRange {
            what: "question set",
            index,
            len: self.question_sets.len(),
        })
    }

    /// Append a class and return its index
    pub async fn add_class(&mut self, class: Class) -> Result<usize> {
        validate_name("class", &class.name)?;
        if self.find_class(&class.name).is_some() {
            return Err(LuckyDrawError::InvalidInput(format!("class {:?} already exists", class.name)));
        }

        let name = class.name.clone();
        let mut classes = self.classes.clone();
        classes.push(class);
        let index = classes.len() - 1;
        self.commit_classes(classes).await?;

        log_library_change("class", "add", Some(index), Some(&name));
        self.notify(LibraryEvent::ClassAdded { index, name });
        Ok(index)
    }

    /// Delete the class at `index` and return it
    pub async fn remove_class(&mut self, index: usize) -> Result<Class> {
        self.class(index)?;
        let mut classes = self.classes.clone();
        let removed = classes.remove(index);
        self.commit_classes(classes).await?;

        log_library_change("class", "remove", Some(index), Some(&removed.name));
        self.notify(LibraryEvent::ClassRemoved { index, name: removed.name.clone() });
        Ok(removed)
    }

    /// Replace the class at `index`, keeping names unique
    pub async fn update_class(&mut self, index: usize, class: Class) -> Result<()> {
        validate_name("class", &class.name)?;
        self.class(index)?;
        if self.find_class(&class.name).is_some_and(|existing| existing != index) {
            return Err(LuckyDrawError::InvalidInput(format!("class {:?} already exists", class.name)));
        }

        let name = class.name.clone();
        let mut classes = self.classes.clone();
        classes[index] = class;
        self.commit_classes(classes).await?;

        log_library_change("class", "update", Some(index), Some(&name));
        self.notify(LibraryEvent::ClassUpdated { index });
        Ok(())
    }

    /// Append parsed groups to an existing class
    pub async fn add_groups(&mut self, class_index: usize, groups: Vec<Group>) -> Result<()> {
        self.class(class_index)?;
        if groups.is_empty() {
            return Err(LuckyDrawError::EmptyList { what: "groups" });
        }

        let count = groups.len();
        let mut classes = self.classes.clone();
        classes[class_index].groups.extend(groups);
        self.commit_classes(classes).await?;

        log_library_change("group", "add", Some(class_index), Some(&self.classes[class_index].name));
        self.notify(LibraryEvent::GroupsAdded { class_index, count });
        Ok(())
    }

    /// Delete one group of a class and return it
    pub async fn remove_group(&mut self, class_index: usize, group_index: usize) -> Result<Group> {
        self.check_group(class_index, group_index)?;
        let mut classes = self.classes.clone();
        let removed = classes[class_index].groups.remove(group_index);
        self.commit_classes(classes).await?;

        log_library_change("group", "remove", Some(group_index), Some(&removed.name));
        self.notify(LibraryEvent::GroupRemoved {
            class_index,
            group_index,
            name: removed.name.clone(),
        });
        Ok(removed)
    }

    /// Replace one group of a class
    pub async fn update_group(&mut self, class_index: usize, group_index: usize, group: Group) -> Result<()> {
        validate_name("group", &group.name)?;
        self.check_group(class_index, group_index)?;

        let name = group.name.clone();
        let mut classes = self.classes.clone();
        classes[class_index].groups[group_index] = group;
        self.commit_classes(classes).await?;

        log_library_change("group", "update", Some(group_index), Some(&name));
        self.notify(LibraryEvent::GroupUpdated { class_index, group_index });
        Ok(())
    }

    /// Append a question set and return its index
    pub async fn add_question_set(&mut self, set: QuestionSet) -> Result<usize> {
        validate_name("question set", &set.name)?;
        if self.find_question_set(&set.name).is_some() {
            return Err(LuckyDrawError::InvalidInput(format!("question set {:?} already exists", set.name)));
        }

        let name = set.name.clone();
        let mut sets = self.question_sets.clone();
        sets.push(set);
        let index = sets.len() - 1;
        self.commit_question_sets(sets).await?;

        log_library_change("question_set", "add", Some(index), Some(&name));
        self.notify(LibraryEvent::QuestionSetAdded { index, name });
        Ok(index)
    }

    /// Delete the question set at `index` and return it
    pub async fn remove_question_set(&mut self, index: usize) -> Result<QuestionSet> {
        self.question_set(index)?;
        let mut sets = self.question_sets.clone();
        let removed = sets.remove(index);
        self.commit_question_sets(sets).await?;

        log_library_change("question_set", "remove", Some(index), Some(&removed.name));
        self.notify(LibraryEvent::QuestionSetRemoved { index, name: removed.name.clone() });
        Ok(removed)
    }

    /// Replace the question set at `index`, keeping names unique
    pub async fn update_question_set(&mut self, index: usize, set: QuestionSet) -> Result<()> {
        validate_name("question set", &set.name)?;
        self.question_set(index)?;
        if self.find_question_set(&set.name).is_some_and(|existing| existing != index) {
            return Err(LuckyDrawError::InvalidInput(format!("question set {:?} already exists", set.name)));
        }

        let name = set.name.clone();
        let mut sets = self.question_sets.clone();
        sets[index] = set;
        self.commit_question_sets(sets).await?;

        log_library_change("question_set", "update", Some(index), Some(&name));
        self.notify(LibraryEvent::QuestionSetUpdated { index });
        Ok(())
    }

    /// Start a draw over a snapshot of the chosen class and question set
    pub fn begin_draw(&self, class_index: usize, question_set_index: usize) -> Result<PickSession> {
        let class = self.class(class_index)?;
        let set = self.question_set(question_set_index)?;
        PickSession::new(class_index, class, question_set_index, set)
    }

    fn check_group(&self, class_index: usize, group_index: usize) -> Result<()> {
        let len = self.class(class_index)?.groups.len();
        if group_index >= len {
            return Err(LuckyDrawError::IndexOutOfRange { what: "group", index: group_index, len });
        }
        Ok(())
    }

    /// Memory only changes once the file holds `classes`
    async fn commit_classes(&mut self, classes: Vec<Class>) -> Result<()> {
        self.class_store.save(&classes).await?;
        self.classes = classes;
        Ok(())
    }

    async fn commit_question_sets(&mut self, sets: Vec<QuestionSet>) -> Result<()> {
        self.question_store.save(&sets).await?;
        self.question_sets = sets;
        Ok(())
    }

    fn notify(&self, event: LibraryEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LuckyDrawError::InvalidInput(format!("{} name cannot be blank", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, Student};
    use tempfile::TempDir;

    async fn library(dir: &TempDir) -> Library {
        Library::open(
            JsonListStore::new(dir.path().join("class.json")),
            JsonListStore::new(dir.path().join("question.json")),
        )
        .await
        .unwrap()
    }

    fn class(name: &str) -> Class {
        Class::new(
            name,
            vec![
                Group::new("A1", vec![Student::new(1, "Alice"), Student::new(2, "Bob")]),
                Group::new("A2", vec![Student::new(3, "Carol")]),
            ],
        )
    }

    #[tokio::test]
    async fn test_mutations_persist() {
        let dir = TempDir::new().unwrap();
        let mut lib = library(&dir).await;
        lib.add_class(class("Class 1")).await.unwrap();
        lib.add_groups(0, vec![Group::new("A3", vec![Student::new(4, "Dan")])]).await.unwrap();
        lib.remove_group(0, 0).await.unwrap();
        lib.add_question_set(QuestionSet::new("Set", vec![Question::new("Q1")])).await.unwrap();

        let reloaded = library(&dir).await;
        assert_eq!(reloaded.classes(), lib.classes());
        let names: Vec<_> = reloaded.classes()[0].groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A2", "A3"]);
        assert_eq!(reloaded.question_sets().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_blank_and_duplicate_names() {
        let dir = TempDir::new().unwrap();
        let mut lib = library(&dir).await;
        assert!(matches!(lib.add_class(class("  ")).await, Err(LuckyDrawError::InvalidInput(_))));

        lib.add_class(class("Class 1")).await.unwrap();
        assert!(lib.add_class(class("Class 1")).await.is_err());
        assert_eq!(lib.classes().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_indices() {
        let dir = TempDir::new().unwrap();
        let mut lib = library(&dir).await;
        assert!(matches!(
            lib.remove_class(0).await,
            Err(LuckyDrawError::IndexOutOfRange { what: "class", index: 0, len: 0 })
        ));

        lib.add_class(class("Class 1")).await.unwrap();
        assert!(matches!(
            lib.update_group(0, 5, Group::new("X", vec![])).await,
            Err(LuckyDrawError::IndexOutOfRange { what: "group", .. })
        ));
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let dir = TempDir::new().unwrap();
        let mut lib = library(&dir).await;
        let mut events = lib.subscribe();

        lib.add_class(class("Class 1")).await.unwrap();
        lib.remove_class(0).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            LibraryEvent::ClassAdded { index: 0, name: "Class 1".to_string() }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            LibraryEvent::ClassRemoved { index: 0, name: "Class 1".to_string() }
        );
    }

    #[tokio::test]
    async fn test_update_class_renames_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut lib = library(&dir).await;
        lib.add_class(class("Class 1")).await.unwrap();
        lib.add_class(class("Class 2")).await.unwrap();

        lib.update_class(0, class("Class 3")).await.unwrap();
        assert!(lib.update_class(0, class("Class 2")).await.is_err());

        let names: Vec<_> = library(&dir).await.classes().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Class 3".to_string(), "Class 2".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_untouched() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        let mut lib = Library::open(
            JsonListStore::new(blocker.join("class.json")),
            JsonListStore::new(blocker.join("question.json")),
        )
        .await
        .unwrap();
        let mut events = lib.subscribe();

        // The data directory path is taken by a plain file, so every save fails
        tokio::fs::write(&blocker, "not a directory").await.unwrap();

        assert!(lib.add_class(class("Class 1")).await.is_err());
        assert!(lib.add_question_set(QuestionSet::new("Set", vec![Question::new("Q1")])).await.is_err());
        assert!(lib.classes().is_empty());
        assert!(lib.question_sets().is_empty());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let mut lib = Library::open(
            JsonListStore::new(data.join("class.json")),
            JsonListStore::new(data.join("question.json")),
        )
        .await
        .unwrap();
        lib.add_class(class("Class 1")).await.unwrap();

        tokio::fs::remove_dir_all(&data).await.unwrap();
        tokio::fs::write(&data, "not a directory").await.unwrap();

        assert!(lib.remove_group(0, 0).await.is_err());
        assert_eq!(lib.classes()[0].groups.len(), 2);
        assert!(lib.remove_class(0).await.is_err());
        assert_eq!(lib.classes().len(), 1);
    }

    #[tokio::test]
    async fn test_begin_draw_checks_selection() {
        let dir = TempDir::new().unwrap();
        let mut lib = library(&dir).await;
        lib.add_class(class("Class 1")).await.unwrap();
        lib.add_question_set(QuestionSet::new("Empty", vec![])).await.unwrap();

        assert!(matches!(lib.begin_draw(0, 0), Err(LuckyDrawError::NotDrawable(_))));
        assert!(matches!(lib.begin_draw(0, 1), Err(LuckyDrawError::IndexOutOfRange { .. })));

        lib.update_question_set(0, QuestionSet::new("Set", vec![Question::new("Q1")])).await.unwrap();
        let session = lib.begin_draw(0, 0).unwrap();
        assert_eq!(session.remaining_groups().len(), 2);
    }
}
