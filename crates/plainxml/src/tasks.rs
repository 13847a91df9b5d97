//! Daily task persistence
//!
//! Task files look like this:
//!
//! ```text
//! <daily-tasks date="15-10-2026">
//! 	<task>
//! 		<name>Write report</name>
//! 		<description>Quarterly numbers</description>
//! 		<start_time>09:00</start_time>
//! 		<end_time>11:00</end_time>
//! 		<completed>false</completed>
//! 	</task>
//! </daily-tasks>
//! ```
//!
//! The five fields of a task are read back by position, not by element
//! name, so files from older writers keep loading as long as the order is
//! unchanged.

use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::{debug, instrument};

use crate::document::{read_document, write_document};
use crate::error::{Error, ErrorKind, Result, Span};
use crate::model::Document;
use crate::writer::WriteConfig;

pub const ROOT_NAME: &str = "daily-tasks";
pub const TASK_NAME: &str = "task";
pub const DATE_ATTRIBUTE: &str = "date";

const FIELD_NAMES: [&str; 5] = ["name", "description", "start_time", "end_time", "completed"];

/// One entry of a day's task list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub is_done: bool,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            is_done: false,
        }
    }
}

/// Ordered task list with lookups by title
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Remove the first task called `title`
    pub fn remove(&mut self, title: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.title == title)?;
        Some(self.tasks.remove(index))
    }

    /// Mark the first task called `title` as done. Returns false if there is none.
    pub fn complete(&mut self, title: &str) -> bool {
        match self.tasks.iter_mut().find(|task| task.title == title) {
            Some(task) => {
                task.is_done = true;
                true
            }
            None => false,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

/// Where task lists are saved and loaded by name
pub trait TaskStore {
    fn write(&self, name: &str, tasks: &[Task]) -> Result<()>;
    fn read(&self, name: &str) -> Result<Vec<Task>>;
}

/// Stores each task list as `<dir>/<name>.xml`
#[derive(Clone, Debug)]
pub struct XmlTaskStore {
    dir: PathBuf,
}

impl XmlTaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.xml"))
    }
}

impl TaskStore for XmlTaskStore {
    #[instrument(skip(self, tasks), fields(count = tasks.len()))]
    fn write(&self, name: &str, tasks: &[Task]) -> Result<()> {
        let document = tasks_to_document(&today(), tasks);
        write_document(self.path_for(name), &document, WriteConfig::default())
    }

    #[instrument(skip(self))]
    fn read(&self, name: &str) -> Result<Vec<Task>> {
        let document = read_document(self.path_for(name))?;
        let tasks = tasks_from_document(&document)?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }
}

/// Build a `daily-tasks` document stamped with `date`
pub fn tasks_to_document(date: &str, tasks: &[Task]) -> Document {
    let mut document = Document::new(ROOT_NAME);
    document.root_node_mut().add_attribute(DATE_ATTRIBUTE, date);
    let root = document.root();

    for task in tasks {
        let node = document.append_child(root, TASK_NAME);
        let completed = if task.is_done { "true" } else { "false" };
        let values = [
            task.title.as_str(),
            task.description.as_str(),
            task.start_time.as_str(),
            task.end_time.as_str(),
            completed,
        ];
        for (field, value) in FIELD_NAMES.iter().zip(values) {
            document.append_child_with_value(node, *field, value);
        }
    }
    document
}

/// Read tasks back from a `daily-tasks` document, by child position
pub fn tasks_from_document(document: &Document) -> Result<Vec<Task>> {
    document
        .root_node()
        .children()
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let node = document.node(id);
            let field = |position: usize| {
                node.get_child(position)
                    .map(|child| document.node(child).value().to_string())
                    .ok_or_else(|| Error::new(ErrorKind::MalformedTask { index }, Span::empty()))
            };
            Ok(Task {
                title: field(0)?,
                description: field(1)?,
                start_time: field(2)?,
                end_time: field(3)?,
                is_done: field(4)? == "true",
            })
        })
        .collect()
}

/// Today's local date as `DD-MM-YYYY`, falling back to UTC when the local
/// offset cannot be determined
pub fn today() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!(
        "{:02}-{:02}-{}",
        now.day(),
        u8::from(now.month()),
        now.year()
    )
}
