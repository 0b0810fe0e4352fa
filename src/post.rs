use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::user::UserId;

use std::collections::HashMap;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostId(String);

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LikePost<'a> {
    pub user_id: &'a UserId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub user_id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture_path: Option<String>,
    #[serde(default)]
    pub user_picture_path: Option<String>,
    /// Like set. Only key membership matters; the flag is whatever the
    /// backend stores.
    #[serde(default)]
    pub likes: HashMap<UserId, bool>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl PostId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        PostId(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Post {
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains_key(user)
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.user_id == *user
    }

    pub fn author_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({} likes, {} comments)",
            self.id,
            self.author_name(),
            self.description,
            self.like_count(),
            self.comments.len()
        )
    }
}
