pub mod client;
pub mod comment;
pub mod config;
pub mod feed;
pub mod guard;
pub mod post;
pub mod user;
pub mod widget;

pub use crate::client::Client;
pub use crate::client::Error;
pub use crate::client::UnauthenticatedClient;
pub use crate::config::Config;
pub use crate::feed::Feed;
pub use crate::widget::{CommentPanel, PostWidget};
