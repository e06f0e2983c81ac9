//! Authentication primitives: login credentials, registrations and tokens.
//!
//! Constructors validate raw string inputs and report every failing field at
//! once so the HTTP adapter can return itemised validation errors.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{DisplayName, Email, FieldError, User, UserId, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length.
pub const PASSWORD_MAX: usize = 128;

/// Validation failure for one credential field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// The email address failed validation.
    Email(UserValidationError),
    /// The display name failed validation.
    Name(UserValidationError),
    /// Password was empty.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password longer than [`PASSWORD_MAX`].
    PasswordTooLong { max: usize },
}

impl CredentialValidationError {
    /// Request field the failure applies to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Name(_) => "name",
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => {
                "password"
            }
        }
    }

    /// Stable machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Email(inner) | Self::Name(inner) => inner.code(),
            Self::EmptyPassword => "required",
            Self::PasswordTooShort { .. } => "too_short",
            Self::PasswordTooLong { .. } => "too_long",
        }
    }
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(inner) | Self::Name(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<&CredentialValidationError> for FieldError {
    fn from(value: &CredentialValidationError) -> Self {
        Self::new(value.field(), value.code(), value.to_string())
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised by [`Email`].
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use taskboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, Vec<CredentialValidationError>> {
        let mut errors = Vec::new();
        let email = Email::new(email)
            .map_err(|err| errors.push(CredentialValidationError::Email(err)))
            .ok();
        if password.is_empty() {
            errors.push(CredentialValidationError::EmptyPassword);
        }
        match email {
            Some(email) if errors.is_empty() => Ok(Self {
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated account registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    display_name: DisplayName,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration, collecting every field failure.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::Registration;
    ///
    /// let errors = Registration::try_from_parts("nope", "123", "").unwrap_err();
    /// let fields: Vec<_> = errors.iter().map(|err| err.field()).collect();
    /// assert_eq!(fields, ["email", "name", "password"]);
    /// ```
    pub fn try_from_parts(
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, Vec<CredentialValidationError>> {
        let mut errors = Vec::new();
        let email = Email::new(email)
            .map_err(|err| errors.push(CredentialValidationError::Email(err)))
            .ok();
        let display_name = DisplayName::new(name)
            .map_err(|err| errors.push(CredentialValidationError::Name(err)))
            .ok();
        if let Err(err) = validate_new_password(password) {
            errors.push(err);
        }
        match (email, display_name) {
            (Some(email), Some(display_name)) if errors.is_empty() => Ok(Self {
                email,
                display_name,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    /// Normalised email for the new account.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name for the new account.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Plain-text password to be hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn validate_new_password(password: &str) -> Result<(), CredentialValidationError> {
    let length = password.chars().count();
    if length == 0 {
        return Err(CredentialValidationError::EmptyPassword);
    }
    if length < PASSWORD_MIN {
        return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if length > PASSWORD_MAX {
        return Err(CredentialValidationError::PasswordTooLong { max: PASSWORD_MAX });
    }
    Ok(())
}

/// Signed bearer token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Encoded token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Verified contents of an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// Account the token was issued to.
    pub user_id: UserId,
    /// Email of the account at issue time.
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: AccessToken,
    pub user: User,
}
