//! Interaction controller for a single post in the feed.
//!
//! A `PostWidget` holds the local, eventually-stale copy of one post: its like
//! set, the comment list shown in the comment panel, the panel state and the
//! comment input buffer. Every mutation goes to the backend first and the
//! local copy only changes once the server confirms it. Operations take
//! `&self`, so several can be in flight at once; whichever resolves last
//! writes last.

use log::{error, info};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::{Client, Error};
use crate::comment::{Comment, CommentId};
use crate::guard::{InFlight, Mutation, Pending};
use crate::post::{Post, PostId};
use crate::user::SessionUser;

type OnDelete = Box<dyn Fn(&PostId) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPanel {
    Closed,
    Open,
}

#[derive(Debug)]
struct State {
    post: Post,
    comments: Vec<Comment>,
    panel: CommentPanel,
    comment_text: String,
}

pub struct PostWidget {
    client: Arc<Client>,
    viewer: SessionUser,
    post_id: PostId,
    state: Mutex<State>,
    in_flight: Option<InFlight>,
    on_delete: Option<OnDelete>,
}

impl State {
    fn new(post: Post) -> Self {
        let comments = post.comments.clone();
        State {
            post,
            comments,
            panel: CommentPanel::Closed,
            comment_text: String::new(),
        }
    }

    fn toggle_panel(&mut self) -> CommentPanel {
        self.panel = match self.panel {
            CommentPanel::Closed => CommentPanel::Open,
            CommentPanel::Open => CommentPanel::Closed,
        };
        self.panel
    }

    fn comment_created(&mut self, comment: Comment) {
        self.comments.push(comment);
        self.comment_text.clear();
    }

    fn comment_deleted(&mut self, id: &CommentId) {
        self.comments.retain(|comment| comment.id != *id);
    }
}

impl PostWidget {
    pub fn new(client: Arc<Client>, viewer: SessionUser, post: Post) -> Self {
        PostWidget {
            client,
            viewer,
            post_id: post.id.clone(),
            state: Mutex::new(State::new(post)),
            in_flight: None,
            on_delete: None,
        }
    }

    /// Called with the post id once the backend confirms the post is gone.
    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&PostId) + Send + Sync + 'static,
    {
        self.on_delete = Some(Box::new(f));
        self
    }

    /// Refuse a mutation while an identical one is still pending.
    pub fn with_guard(mut self, in_flight: InFlight) -> Self {
        self.in_flight = Some(in_flight);
        self
    }

    pub fn id(&self) -> &PostId {
        &self.post_id
    }

    pub fn viewer(&self) -> &SessionUser {
        &self.viewer
    }

    pub fn post(&self) -> Post {
        self.state().post.clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.state().comments.clone()
    }

    pub fn panel(&self) -> CommentPanel {
        self.state().panel
    }

    pub fn comment_text(&self) -> String {
        self.state().comment_text.clone()
    }

    pub fn set_comment_text<S: Into<String>>(&self, text: S) {
        self.state().comment_text = text.into();
    }

    pub fn is_liked(&self) -> bool {
        self.state().post.is_liked_by(&self.viewer.id)
    }

    pub fn like_count(&self) -> usize {
        self.state().post.like_count()
    }

    /// Comment badge count. Taken from the post itself, not the panel list.
    pub fn comment_count(&self) -> usize {
        self.state().post.comments.len()
    }

    pub fn can_delete_post(&self) -> bool {
        self.state().post.is_authored_by(&self.viewer.id)
    }

    pub fn can_delete_comment(&self, comment: &Comment) -> bool {
        comment.is_written_by(&self.viewer.id)
    }

    /// Send a like toggle for the viewer. On success the local post becomes
    /// exactly what the server returned.
    pub async fn toggle_like(&self) -> Result<(), Error> {
        let _pending = self.begin(Mutation::Like)?;

        match self.client.like_post(&self.post_id, &self.viewer.id).await {
            Ok(post) => {
                self.state().post = post;
                Ok(())
            }
            Err(err) => Err(self.failed("toggle like", err)),
        }
    }

    /// Open or close the comment panel. Opening always refetches.
    pub async fn toggle_comments(&self) -> Result<(), Error> {
        let panel = self.state().toggle_panel();

        match panel {
            CommentPanel::Open => self.load_comments().await,
            CommentPanel::Closed => Ok(()),
        }
    }

    /// Replace the local comment list with the server's. The result is
    /// applied even if the panel was closed while the request was pending.
    pub async fn load_comments(&self) -> Result<(), Error> {
        match self.client.post_comments(&self.post_id).await {
            Ok(comments) => {
                self.state().comments = comments;
                Ok(())
            }
            Err(err) => Err(self.failed("load comments", err)),
        }
    }

    /// Submit the input buffer as a new comment.
    pub async fn post_comment(&self) -> Result<(), Error> {
        let text = self.comment_text();
        let _pending = self.begin(Mutation::CreateComment)?;

        match self.client.create_comment(&self.post_id, &text).await {
            Ok(comment) => {
                info!("comment {} added to post {}", comment.id, self.post_id);
                self.state().comment_created(comment);
                Ok(())
            }
            Err(err) => Err(self.failed("post comment", err)),
        }
    }

    pub async fn delete_comment(&self, comment: &CommentId) -> Result<(), Error> {
        let _pending = self.begin(Mutation::DeleteComment(comment.clone()))?;

        match self.client.delete_comment(&self.post_id, comment).await {
            Ok(()) => {
                info!("comment {} deleted from post {}", comment, self.post_id);
                self.state().comment_deleted(comment);
                Ok(())
            }
            Err(err) => Err(self.failed("delete comment", err)),
        }
    }

    pub async fn delete_post(&self) -> Result<(), Error> {
        let _pending = self.begin(Mutation::DeletePost)?;

        match self.client.delete_post(&self.post_id).await {
            Ok(()) => {
                info!("post {} deleted", self.post_id);
                if let Some(on_delete) = self.on_delete.as_ref() {
                    on_delete(&self.post_id);
                }
                Ok(())
            }
            Err(err) => Err(self.failed("delete post", err)),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, mutation: Mutation) -> Result<Option<Pending>, Error> {
        match self.in_flight.as_ref() {
            None => Ok(None),
            Some(in_flight) => match in_flight.begin(&self.post_id, mutation.clone()) {
                Some(pending) => Ok(Some(pending)),
                None => {
                    error!("{:?} on post {} is already in flight", mutation, self.post_id);
                    Err(Error::InFlight)
                }
            },
        }
    }

    fn failed(&self, action: &str, err: Error) -> Error {
        error!("failed to {} on post {}: {}", action, self.post_id, err);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::user::UserId;

    fn comment(id: &str) -> Comment {
        Comment {
            id: CommentId::new(id),
            text: format!("text {}", id),
            creator: None,
        }
    }

    fn state() -> State {
        let post: Post = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "userId": "u1",
            "comments": [{ "_id": "c0", "text": "first" }],
        }))
        .unwrap();
        State::new(post)
    }

    #[test]
    fn starts_closed_with_the_posts_comments() {
        let state = state();

        assert_eq!(state.panel, CommentPanel::Closed);
        assert_eq!(state.comments.len(), 1);
        assert_eq!(state.comment_text, "");
    }

    #[test]
    fn panel_toggles() {
        let mut state = state();

        assert_eq!(state.toggle_panel(), CommentPanel::Open);
        assert_eq!(state.toggle_panel(), CommentPanel::Closed);
    }

    #[test]
    fn created_comment_goes_last_and_clears_input() {
        let mut state = state();
        state.comment_text = "hello".to_string();

        state.comment_created(comment("c1"));

        assert_eq!(state.comments.last().unwrap().id, CommentId::new("c1"));
        assert_eq!(state.comment_text, "");
    }

    #[test]
    fn deletion_keeps_order_of_the_rest() {
        let mut state = state();
        state.comments = vec![comment("a"), comment("b"), comment("c"), comment("b")];

        state.comment_deleted(&CommentId::new("b"));

        let ids: Vec<_> = state.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn deleting_unknown_comment_is_a_no_op() {
        let mut state = state();

        state.comment_deleted(&CommentId::new("zzz"));

        assert_eq!(state.comments.len(), 1);
        assert_eq!(state.post.user_id, UserId::new("u1"));
    }
}
