use serde::{Deserialize, Serialize};

use crate::user::UserId;

use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CommentId(String);

#[derive(Serialize, Debug)]
pub struct CreateComment<'a> {
    pub text: &'a str,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: CommentId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
}

/// Who wrote a comment. The backend embeds a summary when it populates the
/// reference and sends the bare user id otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Creator {
    Summary(CreatorSummary),
    Id(UserId),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub picture_path: Option<String>,
}

impl CommentId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        CommentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Comment {
    pub fn creator_id(&self) -> Option<&UserId> {
        self.creator.as_ref().map(Creator::id)
    }

    pub fn creator_summary(&self) -> Option<&CreatorSummary> {
        match self.creator {
            Some(Creator::Summary(ref summary)) => Some(summary),
            _ => None,
        }
    }

    pub fn is_written_by(&self, user: &UserId) -> bool {
        self.creator_id() == Some(user)
    }
}

impl Creator {
    pub fn id(&self) -> &UserId {
        match self {
            Creator::Summary(summary) => &summary.id,
            Creator::Id(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_creator_summary() {
        let comment: Comment = serde_json::from_str(
            r#"{"_id":"c1","text":"nice","creator":{"_id":"u1","firstName":"Ann","picturePath":"ann.png"}}"#,
        )
        .unwrap();

        let summary = comment.creator_summary().unwrap();
        assert_eq!(summary.first_name, "Ann");
        assert_eq!(summary.picture_path.as_deref(), Some("ann.png"));
        assert!(comment.is_written_by(&UserId::new("u1")));
    }

    #[test]
    fn bare_creator_id() {
        let comment: Comment =
            serde_json::from_str(r#"{"_id":"c1","text":"nice","creator":"u2"}"#).unwrap();

        assert!(comment.creator_summary().is_none());
        assert!(comment.is_written_by(&UserId::new("u2")));
        assert!(!comment.is_written_by(&UserId::new("u1")));
    }

    #[test]
    fn missing_creator_is_nobody() {
        let comment: Comment = serde_json::from_str(r#"{"_id":"c1","text":"nice"}"#).unwrap();

        assert_eq!(comment.creator_id(), None);
        assert!(!comment.is_written_by(&UserId::new("u1")));
    }
}
