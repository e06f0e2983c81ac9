//! Task discussion comments.

use chrono::{DateTime, Utc};

use super::{CommentId, TaskId, UserId, UserSummary};

/// Maximum allowed length for a comment body.
pub const BODY_MAX: usize = 1000;

/// Validation errors raised by [`CommentBody`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentBodyError {
    /// Body is empty once trimmed.
    #[error("comment body must not be empty")]
    Empty,
    /// Body exceeds [`BODY_MAX`] characters.
    #[error("comment body must be at most {max} characters")]
    TooLong { max: usize },
}

impl CommentBodyError {
    /// Stable machine-readable code reported in itemised field errors.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "required",
            Self::TooLong { .. } => "too_long",
        }
    }
}

/// Trimmed, non-empty comment text.
///
/// # Examples
/// ```
/// use taskboard::domain::CommentBody;
///
/// assert_eq!(CommentBody::new(" Looks good ").unwrap().as_ref(), "Looks good");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate and construct a comment body.
    pub fn new(body: impl AsRef<str>) -> Result<Self, CommentBodyError> {
        let trimmed = body.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CommentBodyError::Empty);
        }
        if trimmed.chars().count() > BODY_MAX {
            return Err(CommentBodyError::TooLong { max: BODY_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    pub body: String,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Whether `user_id` wrote this comment.
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author.id == user_id
    }
}

/// Row written by the repository when posting a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub id: CommentId,
    pub task_id: TaskId,
    pub author_id: UserId,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", CommentBodyError::Empty)]
    #[case(" \n\t ", CommentBodyError::Empty)]
    fn rejects_blank_bodies(#[case] raw: &str, #[case] expected: CommentBodyError) {
        assert_eq!(CommentBody::new(raw), Err(expected));
    }

    #[rstest]
    fn accepts_body_at_limit() {
        let raw = "b".repeat(BODY_MAX);
        assert!(CommentBody::new(&raw).is_ok());
        let over = "b".repeat(BODY_MAX + 1);
        assert_eq!(
            CommentBody::new(over),
            Err(CommentBodyError::TooLong { max: BODY_MAX })
        );
    }
}
