#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::MockServer;

use std::sync::Arc;

use feed_driver::post::Post;
use feed_driver::user::{BearerToken, SessionUser, UserId};
use feed_driver::{Client, Config, UnauthenticatedClient};

pub const TOKEN: &str = "Bearer tok";

pub async fn server_and_client() -> (MockServer, Arc<Client>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let server = MockServer::start().await;
    let mut config = Config::new(server.uri().parse().unwrap());
    config.require_https = false;
    let client = UnauthenticatedClient::new(&config)
        .unwrap()
        .with_token(BearerToken::new("tok"));

    (server, Arc::new(client))
}

pub fn viewer(id: &str) -> SessionUser {
    SessionUser::new(UserId::new(id), "Viewer")
}

pub fn post_json(id: &str, author: &str, likes: Value, comments: Value) -> Value {
    json!({
        "_id": id,
        "userId": author,
        "firstName": "Ann",
        "lastName": "Lee",
        "location": "Oslo",
        "description": format!("post {}", id),
        "picturePath": "p.jpeg",
        "userPicturePath": "ann.jpeg",
        "likes": likes,
        "comments": comments,
    })
}

pub fn comment_json(id: &str, creator: &str) -> Value {
    json!({
        "_id": id,
        "text": format!("comment {}", id),
        "creator": { "_id": creator, "firstName": "Someone", "picturePath": "s.png" },
    })
}

pub fn post(value: Value) -> Post {
    serde_json::from_value(value).unwrap()
}
