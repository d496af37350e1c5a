//! User data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::patch::UserPatch;

/// Validation errors returned by the user newtype constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be blank"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier with the same rules as task identifiers:
/// unique, strictly increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier produced by a store.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer form.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 25;

/// Unique account name, between [`USERNAME_MIN`] and [`USERNAME_MAX`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One local part, one domain with at least one dot, no whitespace.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique, syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Opaque credential.
///
/// The raw value is reachable only through [`Password::expose`]; `Debug`
/// output and response payloads never contain it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wrap an already-hashed or otherwise opaque credential.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw value for persistence.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// A user that has not been stored yet. Users are created out of band; the
/// HTTP boundary only reads, updates, and deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub password: Password,
    pub email: EmailAddress,
}

/// Stored user.
///
/// ## Invariants
/// - `id` is store-assigned and immutable after creation.
/// - `username` and `email` are each unique across users.
/// - `password` never appears in serialised output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    password: Password,
    email: EmailAddress,
}

impl User {
    /// Assemble a stored user from validated components.
    pub fn new(id: UserId, username: Username, password: Password, email: EmailAddress) -> Self {
        Self {
            id,
            username,
            password,
            email,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Current account name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Opaque credential.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Current email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Fold a partial update into this user. Identity and password never
    /// change through this path.
    pub fn apply(&mut self, patch: UserPatch) {
        patch.username.apply_to(&mut self.username);
        patch.email.apply_to(&mut self.email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patch::{Patch, UserPatch};
    use rstest::rstest;

    #[rstest]
    #[case("ab")]
    #[case("x")]
    fn short_usernames_are_rejected(#[case] raw: &str) {
        assert_eq!(
            Username::new(raw),
            Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN })
        );
    }

    #[test]
    fn username_length_upper_bound() {
        let too_long = "u".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(too_long),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
        assert!(Username::new("u".repeat(USERNAME_MAX)).is_ok());
    }

    #[rstest]
    #[case("mark@gmail.com", true)]
    #[case("a@b.co", true)]
    #[case("plainaddress", false)]
    #[case("two@@signs.com", false)]
    #[case("spaces in@side.com", false)]
    #[case("nodomain@", false)]
    fn email_format_is_checked(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), valid);
    }

    #[test]
    fn password_debug_is_redacted() {
        let rendered = format!("{:?}", Password::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(rendered, "Password(***)");
    }

    #[test]
    fn apply_replaces_staged_fields_only() {
        let mut user = User::new(
            UserId::new(1),
            Username::new("mark").expect("valid username"),
            Password::new("password123"),
            EmailAddress::new("mark@gmail.com").expect("valid email"),
        );

        user.apply(UserPatch {
            username: Patch::Set(Username::new("shimon").expect("valid username")),
            email: Patch::Keep,
        });

        assert_eq!(user.username().as_ref(), "shimon");
        assert_eq!(user.email().as_ref(), "mark@gmail.com");
        assert_eq!(user.password().expose(), "password123");
    }
}
