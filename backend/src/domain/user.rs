//! User data model.

use std::fmt;

use chrono::{DateTime, Utc};

use super::UserId;

/// Validation errors raised by [`Email`] and [`DisplayName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
}

impl UserValidationError {
    /// Stable machine-readable code reported in itemised field errors.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmptyDisplayName => "required",
            Self::EmailTooLong { .. } | Self::DisplayNameTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyDisplayName => write!(f, "name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 255;

/// Normalised email address: trimmed and lower-cased.
///
/// ## Invariants
/// - Exactly one `@`, with a non-empty local part and a domain that contains
///   a dot not at either end.
///
/// # Examples
/// ```
/// use taskboard::domain::Email;
///
/// let email = Email::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !is_plausible_address(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

fn is_plausible_address(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Human readable display name for the user, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = display_name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Application user. The password credential is held separately by the
/// repository and never travels with this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub display_name: DisplayName,
    pub created_at: DateTime<Utc>,
}

/// Compact user reference embedded in task and comment read models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name.to_string(),
            email: value.email.to_string(),
        }
    }
}
