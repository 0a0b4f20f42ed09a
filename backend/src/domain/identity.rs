//! Caller identity types.
//!
//! A resolved caller is a [`UserId`]; an unauthenticated caller is
//! [`Identity::Anonymous`]. The `"anonymous"` string exists only as the
//! storage key written for anonymous submissions — it is not a valid
//! [`UserId`], so a credential can never resolve to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage key written to the `user_id` column for anonymous submissions.
pub const ANONYMOUS_USER_KEY: &str = "anonymous";

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdValidationError {
    Empty,
    Untrimmed,
    ReservedAnonymous,
}

impl fmt::Display for UserIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "user id must not be empty"),
            Self::Untrimmed => write!(f, "user id must not have surrounding whitespace"),
            Self::ReservedAnonymous => {
                write!(f, "user id '{ANONYMOUS_USER_KEY}' is reserved")
            }
        }
    }
}

impl std::error::Error for UserIdValidationError {}

/// Opaque identifier of a resolved (authenticated) user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(UserIdValidationError::Untrimmed);
        }
        if id == ANONYMOUS_USER_KEY {
            return Err(UserIdValidationError::ReservedAnonymous);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity resolved for an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Credential verified; the caller is this user.
    Known(UserId),
    /// No credential, or an invalid one on an optional-auth route.
    Anonymous,
}

impl Identity {
    /// Key written to the `user_id` column for this identity.
    pub fn storage_key(&self) -> &str {
        match self {
            Self::Known(user) => user.as_str(),
            Self::Anonymous => ANONYMOUS_USER_KEY,
        }
    }

    /// The resolved user, when there is one.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Known(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}
