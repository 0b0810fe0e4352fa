extern crate feed_driver as feed;

use log::info;

use std::env;
use std::process;
use std::sync::Arc;

use feed::comment::CommentId;
use feed::post::PostId;
use feed::user::UserId;
use feed::{Config, Error, Feed, PostWidget, UnauthenticatedClient};

const USAGE: &str = "usage: feed-driver <command>

commands:
    feed                                  list the feed
    user <userId>                         list one user's posts
    like <postId>                         toggle your like on a post
    comments <postId>                     show a post's comments
    comment <postId> <text...>            comment on a post
    delete-comment <postId> <commentId>   delete one of your comments
    delete-post <postId>                  delete one of your posts";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(2);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("unable to start runtime: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(run(&args)) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<(), Error> {
    let config = Config::from_env()?;
    let viewer = config.session_user()?;
    let client = UnauthenticatedClient::new(&config)?.with_token(config.bearer_token()?);
    let client = Arc::new(client);
    info!("using {:?} as {}", client, viewer.id);

    let feed = Feed::new(client, viewer).dedupe_mutations(config.dedupe_mutations);

    match (args[0].as_str(), &args[1..]) {
        ("feed", []) => {
            feed.load().await?;
            print_feed(&feed);
        }
        ("user", [user]) => {
            feed.load_user(&UserId::new(user.as_str())).await?;
            print_feed(&feed);
        }
        ("like", [post]) => {
            let widget = find(&feed, post).await?;
            widget.toggle_like().await?;
            print_widget(&widget);
        }
        ("comments", [post]) => {
            let widget = find(&feed, post).await?;
            widget.toggle_comments().await?;
            print_comments(&widget);
        }
        ("comment", [post, text @ ..]) if !text.is_empty() => {
            let widget = find(&feed, post).await?;
            widget.set_comment_text(text.join(" "));
            widget.post_comment().await?;
            print_comments(&widget);
        }
        ("delete-comment", [post, comment]) => {
            let widget = find(&feed, post).await?;
            widget.delete_comment(&CommentId::new(comment.as_str())).await?;
            print_comments(&widget);
        }
        ("delete-post", [post]) => {
            let widget = find(&feed, post).await?;
            widget.delete_post().await?;
            print_feed(&feed);
        }
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    }

    Ok(())
}

async fn find(feed: &Feed, post: &str) -> Result<Arc<PostWidget>, Error> {
    feed.load().await?;
    let id = PostId::new(post);
    feed.find(&id).ok_or(Error::UnknownPost(id))
}

fn print_feed(feed: &Feed) {
    for widget in feed.posts() {
        print_widget(&widget);
    }
}

fn print_widget(widget: &PostWidget) {
    let heart = if widget.is_liked() { "♥" } else { "♡" };
    println!("{} {}", heart, widget.post());
}

fn print_comments(widget: &PostWidget) {
    print_widget(widget);
    for comment in widget.comments() {
        let author = comment
            .creator_summary()
            .map(|creator| creator.first_name.clone())
            .or_else(|| comment.creator_id().map(|id| id.to_string()))
            .unwrap_or_default();
        let mine = if widget.can_delete_comment(&comment) { "*" } else { " " };
        println!("  {} [{}] {}: {}", mine, comment.id, author, comment.text);
    }
}
