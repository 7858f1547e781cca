//! User data model.
//!
//! Value types validate on construction so a [`User`], [`NewUser`] or
//! [`UserChanges`] can only hold trimmed, well-formed values.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum length, in characters, of a user name. Matches the column width.
pub const NAME_MAX: usize = 100;
/// Maximum length, in characters, of an email address. Matches the column width.
pub const EMAIL_MAX: usize = 100;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier is not a positive 32-bit integer.
    InvalidId,
    /// The name is empty once trimmed.
    EmptyName,
    /// The name exceeds [`NAME_MAX`] characters.
    NameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The email address is not well formed.
    InvalidEmail,
    /// The email address exceeds [`EMAIL_MAX`] characters.
    EmailTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// A partial update supplied neither field.
    NoChanges,
}

impl UserValidationError {
    /// Name of the input field the violation refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::NoChanges => "body",
        }
    }

    /// Stable snake_case code describing the violation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::InvalidEmail => "invalid_email",
            Self::EmailTooLong { .. } => "email_too_long",
            Self::NoChanges => "no_changes",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "id must be a positive integer"),
            Self::EmptyName => write!(f, "name is required"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "a valid email address is required"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::NoChanges => write!(f, "at least one of name or email must be supplied"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier; always a positive 32-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use users_api::domain::UserId;
    ///
    /// assert!(UserId::new(7).is_ok());
    /// assert!(UserId::new(0).is_err());
    /// ```
    pub fn new(id: i32) -> Result<Self, UserValidationError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(UserValidationError::InvalidId)
        }
    }

    /// Coerce an untrusted textual identifier, such as a route segment.
    ///
    /// Surrounding whitespace is ignored. Any numeric literal whose value is
    /// a whole number is accepted, so `1.0` and `1e0` both name user 1.
    /// Non-numeric, fractional, non-finite, zero, negative and out-of-range
    /// values are rejected.
    ///
    /// # Examples
    /// ```
    /// use users_api::domain::UserId;
    ///
    /// assert_eq!(UserId::parse(" 42 ").map(|id| id.get()), Ok(42));
    /// assert_eq!(UserId::parse("1e0").map(|id| id.get()), Ok(1));
    /// assert!(UserId::parse("abc").is_err());
    /// assert!(UserId::parse("1.5").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| UserValidationError::InvalidId)?;
        if !value.is_finite() || value.fract() != 0.0 || value > f64::from(i32::MAX) {
            return Err(UserValidationError::InvalidId);
        }
        Self::new(whole_to_i32(value))
    }

    /// Access the raw integer.
    pub fn get(self) -> i32 {
        self.0
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "callers reject fractional and out-of-range values first"
)]
fn whole_to_i32(value: f64) -> i32 {
    value.max(f64::from(i32::MIN)) as i32
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trimmed, non-empty user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a user name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trimmed email address in a pragmatic RFC 5322 subset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Leading dots and doubled dots are rejected separately; the regex
        // crate has no look-around.
        let pattern = r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl EmailAddress {
    /// Trim and validate an email address.
    ///
    /// # Examples
    /// ```
    /// use users_api::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  ada@example.com ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// assert!(EmailAddress::new("invalid-email").is_err());
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if trimmed.starts_with('.') || trimmed.contains("..") || !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Persisted user as returned by the store.
///
/// Serialised with camelCase keys:
/// `{"id":1,"name":"Ada","email":"ada@example.com","createdAt":"…","updatedAt":"…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i32, example = 1)]
    id: UserId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    name: UserName,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from validated components.
    pub fn new(
        id: UserId,
        name: UserName,
        email: EmailAddress,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
            updated_at,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Unique email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the most recent update.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Validated input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: UserName,
    /// Unique email address.
    pub email: EmailAddress,
}

/// Validated partial update; at least one field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    name: Option<UserName>,
    email: Option<EmailAddress>,
}

impl UserChanges {
    /// Build a change set, rejecting one that would change nothing.
    ///
    /// # Examples
    /// ```
    /// use users_api::domain::{UserChanges, UserName, UserValidationError};
    ///
    /// let name = UserName::new("Grace").expect("valid name");
    /// assert!(UserChanges::new(Some(name), None).is_ok());
    /// assert_eq!(UserChanges::new(None, None), Err(UserValidationError::NoChanges));
    /// ```
    pub fn new(
        name: Option<UserName>,
        email: Option<EmailAddress>,
    ) -> Result<Self, UserValidationError> {
        if name.is_none() && email.is_none() {
            return Err(UserValidationError::NoChanges);
        }
        Ok(Self { name, email })
    }

    /// Replacement name, if supplied.
    pub fn name(&self) -> Option<&UserName> {
        self.name.as_ref()
    }

    /// Replacement email, if supplied.
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }
}
