use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(String);

/// The viewer on whose behalf likes and comments are sent.
///
/// Passed explicitly to every widget; nothing in the crate holds a global
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
}

/// Opaque credential attached to every request as `Authorization: Bearer`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl UserId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl SessionUser {
    pub fn new<S: Into<String>>(id: UserId, name: S) -> Self {
        SessionUser {
            id,
            name: name.into(),
        }
    }
}

impl BearerToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        BearerToken(token.into())
    }

    pub(crate) fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BearerToken([REDACTED])")
    }
}
