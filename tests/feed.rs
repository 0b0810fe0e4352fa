mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use std::time::Duration;

use feed_driver::post::PostId;
use feed_driver::user::UserId;
use feed_driver::{Error, Feed};

use common::{post, post_json, server_and_client, viewer, TOKEN};

#[tokio::test]
async fn load_builds_one_widget_per_post() {
    let (server, client) = server_and_client().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("authorization", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            post_json("p1", "u1", json!({ "u2": true }), json!([])),
            post_json("p2", "u2", json!({}), json!([])),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let feed = Feed::new(client, viewer("u2"));
    assert!(feed.is_empty());
    feed.load().await.unwrap();

    let ids: Vec<_> = feed.posts().iter().map(|w| w.id().clone()).collect();
    assert_eq!(ids, vec![PostId::new("p1"), PostId::new("p2")]);

    let p1 = feed.find(&PostId::new("p1")).unwrap();
    assert!(p1.is_liked());
    assert_eq!(p1.viewer().id, UserId::new("u2"));
    assert!(!p1.can_delete_post());
    assert!(feed.find(&PostId::new("p2")).unwrap().can_delete_post());
}

#[tokio::test]
async fn profile_feed_uses_user_posts() {
    let (server, client) = server_and_client().await;

    Mock::given(method("GET"))
        .and(path("/posts/u1/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([post_json("p1", "u1", json!({}), json!([]))])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let feed = Feed::new(client, viewer("u2"));
    feed.load_user(&UserId::new("u1")).await.unwrap();

    assert_eq!(feed.len(), 1);
}

#[tokio::test]
async fn failed_load_keeps_current_posts() {
    let (server, client) = server_and_client().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let feed = Feed::new(client, viewer("u2"));
    feed.set_posts(vec![post(post_json("p1", "u1", json!({}), json!([])))]);

    assert!(matches!(feed.load().await, Err(Error::Response { .. })));
    assert_eq!(feed.len(), 1);
}

#[tokio::test]
async fn deleted_post_leaves_the_feed() {
    let (server, client) = server_and_client().await;

    Mock::given(method("DELETE"))
        .and(path("/posts/p1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let feed = Feed::new(client, viewer("u2"));
    feed.set_posts(vec![
        post(post_json("p1", "u2", json!({}), json!([]))),
        post(post_json("p2", "u1", json!({}), json!([]))),
    ]);

    let widget = feed.find(&PostId::new("p1")).unwrap();
    widget.delete_post().await.unwrap();

    assert_eq!(feed.len(), 1);
    assert!(feed.find(&PostId::new("p1")).is_none());
    assert!(feed.find(&PostId::new("p2")).is_some());
}

#[tokio::test]
async fn feed_guard_dedupes_post_deletion() {
    let (server, client) = server_and_client().await;

    Mock::given(method("DELETE"))
        .and(path("/posts/p1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(50)))
        .expect(1)
        .mount(&server)
        .await;

    let feed = Feed::new(client, viewer("u2")).dedupe_mutations(true);
    feed.set_posts(vec![post(post_json("p1", "u2", json!({}), json!([])))]);

    let widget = feed.find(&PostId::new("p1")).unwrap();
    let (first, second) = futures::join!(widget.delete_post(), widget.delete_post());

    assert!(first.is_ok());
    assert!(matches!(second, Err(Error::InFlight)));
    assert!(feed.is_empty());
}
