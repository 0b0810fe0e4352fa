use log::{debug, error};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::client::{Client, Error};
use crate::guard::InFlight;
use crate::post::{Post, PostId};
use crate::user::{SessionUser, UserId};
use crate::widget::PostWidget;

type Widgets = Mutex<Vec<Arc<PostWidget>>>;

/// The list of post widgets the viewer is looking at. A post disappears from
/// the feed once its widget reports a confirmed deletion.
pub struct Feed {
    client: Arc<Client>,
    viewer: SessionUser,
    in_flight: Option<InFlight>,
    widgets: Arc<Widgets>,
}

impl Feed {
    pub fn new(client: Arc<Client>, viewer: SessionUser) -> Self {
        Feed {
            client,
            viewer,
            in_flight: None,
            widgets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Share one in-flight guard between every widget of this feed.
    pub fn dedupe_mutations(mut self, enabled: bool) -> Self {
        self.in_flight = if enabled { Some(InFlight::new()) } else { None };
        self
    }

    /// Replace the feed with every post the backend has.
    pub async fn load(&self) -> Result<(), Error> {
        match self.client.feed_posts().await {
            Ok(posts) => {
                self.set_posts(posts);
                Ok(())
            }
            Err(err) => {
                error!("failed to load feed: {}", err);
                Err(err)
            }
        }
    }

    /// Replace the feed with the posts of a single user.
    pub async fn load_user(&self, user: &UserId) -> Result<(), Error> {
        match self.client.user_posts(user).await {
            Ok(posts) => {
                self.set_posts(posts);
                Ok(())
            }
            Err(err) => {
                error!("failed to load posts of {}: {}", user, err);
                Err(err)
            }
        }
    }

    pub fn set_posts(&self, posts: Vec<Post>) {
        debug!("feed now holds {} posts", posts.len());
        let widgets: Vec<_> = posts
            .into_iter()
            .map(|post| Arc::new(self.widget(post)))
            .collect();
        *lock(&self.widgets) = widgets;
    }

    pub fn posts(&self) -> Vec<Arc<PostWidget>> {
        lock(&self.widgets).clone()
    }

    pub fn find(&self, post: &PostId) -> Option<Arc<PostWidget>> {
        lock(&self.widgets)
            .iter()
            .find(|widget| widget.id() == post)
            .cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.widgets).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn widget(&self, post: Post) -> PostWidget {
        let feed: Weak<Widgets> = Arc::downgrade(&self.widgets);
        let widget = PostWidget::new(Arc::clone(&self.client), self.viewer.clone(), post)
            .on_delete(move |deleted| {
                if let Some(widgets) = feed.upgrade() {
                    lock(&widgets).retain(|widget| widget.id() != deleted);
                }
            });

        match self.in_flight.as_ref() {
            Some(in_flight) => widget.with_guard(in_flight.clone()),
            None => widget,
        }
    }
}

fn lock(widgets: &Widgets) -> MutexGuard<'_, Vec<Arc<PostWidget>>> {
    widgets.lock().unwrap_or_else(PoisonError::into_inner)
}
