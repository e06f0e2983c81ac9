//! Task aggregate, its Kanban status and priority, and the write models used
//! to create and update tasks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{Badge, TaskId, UserId, UserSummary, classify};

/// Error returned when parsing an unknown enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$variant_meta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable snake_case representation used on the wire and in
            /// storage.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Task priority.
    TaskPriority ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

string_enum! {
    /// Kanban column a task belongs to. Any status may move to any other.
    TaskStatus ("status") {
        Backlog => "backlog",
        InProgress => "in_progress",
        Review => "review",
        Done => "done",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Backlog
    }
}

/// Maximum allowed length for a task title.
pub const TITLE_MAX: usize = 255;

/// Validation errors raised by [`TaskTitle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskTitleError {
    /// Title is empty once trimmed.
    #[error("title must not be empty")]
    Empty,
    /// Title exceeds [`TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TooLong { max: usize },
}

impl TaskTitleError {
    /// Stable machine-readable code reported in itemised field errors.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "required",
            Self::TooLong { .. } => "too_long",
        }
    }
}

/// Trimmed, non-empty task title of at most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Validate and construct a title.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::TaskTitle;
    ///
    /// assert_eq!(TaskTitle::new("  Ship it ").unwrap().as_ref(), "Ship it");
    /// assert!(TaskTitle::new("   ").is_err());
    /// ```
    pub fn new(title: impl AsRef<str>) -> Result<Self, TaskTitleError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TaskTitleError::Empty);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(TaskTitleError::TooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored task as read back from the store, with its assignee resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignee: Option<UserSummary>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Identifier of the assigned user, if any.
    pub fn assignee_id(&self) -> Option<UserId> {
        self.assignee.as_ref().map(|assignee| assignee.id)
    }

    /// Decorate the task with its badge as of `now`.
    pub fn into_view(self, now: DateTime<Utc>) -> TaskView {
        let badge = classify(self.due_date, self.status, now);
        TaskView { task: self, badge }
    }
}

/// Task read model returned to clients: the stored task plus its badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub task: Task,
    pub badge: Badge,
}

/// Validated input for creating a task. Absent priority and status take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: TaskTitle,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Row written by the repository when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Partial update. `None` leaves a field unchanged; for nullable fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<TaskTitle>,
    pub description: Option<Option<String>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<Option<UserId>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    /// The assignee being set by this update, if any.
    pub fn new_assignee(&self) -> Option<UserId> {
        self.assignee_id.flatten()
    }
}

/// Listing filters. Filtering uses stored fields only; the badge cannot be
/// filtered on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<UserId>,
}

impl TaskFilter {
    /// Filter selecting tasks assigned to `user_id`.
    pub fn assigned_to(user_id: UserId) -> Self {
        Self {
            assignee_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Whether `task` passes every filter that is set.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
            && self
                .assignee_id
                .is_none_or(|assignee| task.assignee_id() == Some(assignee))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn statuses_round_trip_through_strings() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(*status));
        }
    }

    #[rstest]
    #[case("InProgress")]
    #[case("in progress")]
    #[case("")]
    fn rejects_unknown_status(#[case] raw: &str) {
        let err = raw.parse::<TaskStatus>().expect_err("unknown status");
        assert_eq!(err.to_string(), format!("unknown status '{raw}'"));
    }

    #[rstest]
    fn defaults_match_new_task_lifecycle() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!(TaskStatus::default(), TaskStatus::Backlog);
    }

    #[rstest]
    fn title_length_is_counted_in_characters() {
        let at_limit = "é".repeat(TITLE_MAX);
        assert!(TaskTitle::new(&at_limit).is_ok());
        let over = "é".repeat(TITLE_MAX + 1);
        assert_eq!(
            TaskTitle::new(over),
            Err(TaskTitleError::TooLong { max: TITLE_MAX })
        );
    }

    #[rstest]
    fn new_assignee_ignores_clearing() {
        let clearing = TaskChanges {
            assignee_id: Some(None),
            ..TaskChanges::default()
        };
        assert_eq!(clearing.new_assignee(), None);
    }
}
