//! Per-post in-flight guard for mutating requests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::comment::CommentId;
use crate::post::PostId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mutation {
    Like,
    CreateComment,
    DeleteComment(CommentId),
    DeletePost,
}

/// Set of mutations currently pending, keyed by post id and mutation kind.
#[derive(Debug, Default, Clone)]
pub struct InFlight {
    pending: Arc<Mutex<HashSet<(PostId, Mutation)>>>,
}

/// Held for the lifetime of one request. Dropping it releases the slot.
#[derive(Debug)]
pub struct Pending {
    pending: Arc<Mutex<HashSet<(PostId, Mutation)>>>,
    key: (PostId, Mutation),
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `mutation` on `post`, or `None` if an identical
    /// request is still pending.
    pub fn begin(&self, post: &PostId, mutation: Mutation) -> Option<Pending> {
        let key = (post.clone(), mutation);
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if !pending.insert(key.clone()) {
            return None;
        }

        Some(Pending {
            pending: Arc::clone(&self.pending),
            key,
        })
    }

    pub fn is_pending(&self, post: &PostId, mutation: &Mutation) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.contains(&(post.clone(), mutation.clone()))
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_release() {
        let in_flight = InFlight::new();
        let post = PostId::new("p1");

        let first = in_flight.begin(&post, Mutation::Like);
        assert!(first.is_some());
        assert!(in_flight.begin(&post, Mutation::Like).is_none());
        assert!(in_flight.is_pending(&post, &Mutation::Like));

        drop(first);
        assert!(!in_flight.is_pending(&post, &Mutation::Like));
        assert!(in_flight.begin(&post, Mutation::Like).is_some());
    }

    #[test]
    fn keys_are_independent() {
        let in_flight = InFlight::new();
        let p1 = PostId::new("p1");
        let p2 = PostId::new("p2");

        let _like = in_flight.begin(&p1, Mutation::Like).unwrap();
        let _c1 = in_flight
            .begin(&p1, Mutation::DeleteComment(CommentId::new("c1")))
            .unwrap();

        assert!(in_flight.begin(&p2, Mutation::Like).is_some());
        assert!(in_flight
            .begin(&p1, Mutation::DeleteComment(CommentId::new("c2")))
            .is_some());
        assert!(in_flight
            .begin(&p1, Mutation::DeleteComment(CommentId::new("c1")))
            .is_none());
    }
}
