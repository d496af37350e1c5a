//! Task data model.
//!
//! Purpose: strongly typed task identity and attributes. Validation lives in
//! the newtype constructors so a constructed [`Task`] always satisfies its
//! invariants; the store assigns identifiers, callers never do.

use std::fmt;

use crate::domain::patch::TaskPatch;

/// Validation errors returned by the task newtype constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    DescriptionTooLong { max: usize },
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::TitleTooLong { max } => {
                write!(f, "title must be at most {max} characters")
            }
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for TaskValidationError {}

/// Store-assigned task identifier.
///
/// Identifiers are unique and strictly increasing within a store instance;
/// they are never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap a raw identifier produced by a store.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer form, for row mapping and URL building.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a task title.
pub const TITLE_MAX: usize = 50;
/// Maximum allowed length for a task description.
pub const DESCRIPTION_MAX: usize = 255;

/// Task title: required, non-blank, at most [`TITLE_MAX`] characters, and
/// unique across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Validate and construct a [`TaskTitle`].
    pub fn new(title: impl Into<String>) -> Result<Self, TaskValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(TaskValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TaskTitle> for String {
    fn from(value: TaskTitle) -> Self {
        value.0
    }
}

/// Optional free-text description, at most [`DESCRIPTION_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Validate and construct a [`TaskDescription`].
    pub fn new(description: impl Into<String>) -> Result<Self, TaskValidationError> {
        let description = description.into();
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(TaskValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self(description))
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TaskDescription> for String {
    fn from(value: TaskDescription) -> Self {
        value.0
    }
}

/// A task that has not been stored yet and therefore has no identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub completed: bool,
}

/// Stored task.
///
/// ## Invariants
/// - `id` is store-assigned and immutable after creation.
/// - `title` is non-blank, within length, and unique across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    completed: bool,
}

impl Task {
    /// Assemble a stored task from validated components.
    pub fn new(
        id: TaskId,
        title: TaskTitle,
        description: Option<TaskDescription>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            title,
            description,
            completed,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Current title.
    pub fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Current description, if any.
    pub fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Completion flag.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Fold a partial update into this task. The identity never changes.
    pub fn apply(&mut self, patch: TaskPatch) {
        patch.title.apply_to(&mut self.title);
        patch.description.apply_to(&mut self.description);
        patch.completed.apply_to(&mut self.completed);
    }
}
