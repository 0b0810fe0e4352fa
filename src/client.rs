use futures::TryFutureExt;
use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Client as HyperClient, Method, Request, StatusCode};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::{self, Url};

use std::fmt;

use crate::comment::{Comment, CommentId, CreateComment};
use crate::config::Config;
use crate::post::{LikePost, Post, PostId};
use crate::user::{BearerToken, UserId};

const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Error)]
pub enum Error {
    #[error("http transport error: {0}")]
    Hyper(#[from] hyper::Error),
    #[error("invalid request: {0}")]
    Http(#[from] hyper::http::Error),
    #[error("invalid header value: {0}")]
    Header(#[from] hyper::header::InvalidHeaderValue),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("server url must be https and hierarchical")]
    InvalidUrl,
    #[error("server responded {status}: {body}")]
    Response { status: StatusCode, body: String },
    #[error("post {0} is not in the feed")]
    UnknownPost(PostId),
    #[error("an identical request is already in flight")]
    InFlight,
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("{0} has invalid value {1:?}")]
    InvalidVar(&'static str, String),
}

pub struct UnauthenticatedClient {
    http: HttpClient,
}

struct HttpClient {
    base_url: Url,
    hyper: HyperClient<HttpsConnector<HttpConnector>, Body>,
}

/// Driver for the feed's REST backend. Every request carries the bearer
/// token the client was built with.
pub struct Client {
    http: HttpClient,
    token: BearerToken,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FeedClient({})", self.http.base_url)
    }
}

impl HttpClient {
    /// Append `segments` to the base url, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        token: &BearerToken,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, Error> {
        debug!("{} {}", method, url.as_str());

        let mut authorization = HeaderValue::from_str(&token.header_value())?;
        authorization.set_sensitive(true);

        let mut request = Request::builder()
            .method(method.clone())
            .uri(url.as_str())
            .header(AUTHORIZATION, authorization);
        let body = match body {
            Some(body) => {
                request = request.header(CONTENT_TYPE, APPLICATION_JSON);
                Body::from(body)
            }
            None => Body::empty(),
        };

        let response = self
            .hyper
            .request(request.body(body)?)
            .map_err(Error::from)
            .await?;
        let status = response.status();
        debug!("{} {} -> {}", method, url.as_str(), status);

        let bytes = hyper::body::to_bytes(response.into_body()).await?;
        if !status.is_success() {
            return Err(Error::Response {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes)
    }

    async fn json<T>(
        &self,
        method: Method,
        url: Url,
        token: &BearerToken,
        body: Option<Vec<u8>>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let bytes = self.send(method, url, token, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl UnauthenticatedClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let url = config.server_url.clone();
        if config.require_https && url.scheme() != "https" {
            return Err(Error::InvalidUrl);
        }
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl);
        }

        let builder = HttpsConnectorBuilder::new().with_webpki_roots();
        let builder = if config.require_https {
            builder.https_only()
        } else {
            builder.https_or_http()
        };
        let https = builder.enable_http1().build();
        let client: HyperClient<_, Body> = HyperClient::builder().build(https);

        Ok(UnauthenticatedClient {
            http: HttpClient {
                base_url: url,
                hyper: client,
            },
        })
    }

    /// Consume an UnauthenticatedClient and return a Client that sends
    /// `token` with every request.
    pub fn with_token(self, token: BearerToken) -> Client {
        Client {
            http: self.http,
            token,
        }
    }
}

impl Client {
    /// Where post and profile pictures are served from. Slashes in `path`
    /// separate directories below `assets/`.
    pub fn asset_url(&self, path: &str) -> Result<Url, Error> {
        let mut segments = vec!["assets"];
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        self.http.endpoint(&segments)
    }

    /// Toggle `user`'s like on a post. Returns the post as the server now
    /// has it.
    pub async fn like_post(&self, post: &PostId, user: &UserId) -> Result<Post, Error> {
        let url = self.http.endpoint(&["posts", post.as_str(), "like"])?;
        let body = serde_json::to_vec(&LikePost { user_id: user })?;
        self.http
            .json(Method::PATCH, url, &self.token, Some(body))
            .await
    }

    pub async fn post_comments(&self, post: &PostId) -> Result<Vec<Comment>, Error> {
        let url = self.http.endpoint(&["posts", post.as_str(), "comments"])?;
        self.http.json(Method::GET, url, &self.token, None).await
    }

    pub async fn create_comment(&self, post: &PostId, text: &str) -> Result<Comment, Error> {
        let url = self.http.endpoint(&["posts", post.as_str(), "comments"])?;
        let body = serde_json::to_vec(&CreateComment { text })?;
        self.http
            .json(Method::POST, url, &self.token, Some(body))
            .await
    }

    pub async fn delete_comment(&self, post: &PostId, comment: &CommentId) -> Result<(), Error> {
        let url = self
            .http
            .endpoint(&["posts", post.as_str(), "comments", comment.as_str()])?;
        self.http
            .send(Method::DELETE, url, &self.token, None)
            .await
            .map(|_| ())
    }

    pub async fn delete_post(&self, post: &PostId) -> Result<(), Error> {
        let url = self.http.endpoint(&["posts", post.as_str()])?;
        self.http
            .send(Method::DELETE, url, &self.token, None)
            .await
            .map(|_| ())
    }

    pub async fn feed_posts(&self) -> Result<Vec<Post>, Error> {
        let url = self.http.endpoint(&["posts"])?;
        self.http.json(Method::GET, url, &self.token, None).await
    }

    pub async fn user_posts(&self, user: &UserId) -> Result<Vec<Post>, Error> {
        let url = self.http.endpoint(&["posts", user.as_str(), "posts"])?;
        self.http.json(Method::GET, url, &self.token, None).await
    }
}
