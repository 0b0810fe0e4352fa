use url::Url;

use std::env;

use crate::client::Error;
use crate::user::{BearerToken, SessionUser, UserId};

const SERVER_URL: &str = "FEED_SERVER_URL";
const TOKEN: &str = "FEED_TOKEN";
const USER_ID: &str = "FEED_USER_ID";
const USER_NAME: &str = "FEED_USER_NAME";
const REQUIRE_HTTPS: &str = "FEED_REQUIRE_HTTPS";
const DEDUPE_MUTATIONS: &str = "FEED_DEDUPE_MUTATIONS";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: Url,
    pub token: Option<BearerToken>,
    pub user_id: Option<UserId>,
    pub user_name: String,
    pub require_https: bool,
    pub dedupe_mutations: bool,
}

impl Config {
    pub fn new(server_url: Url) -> Self {
        Config {
            server_url,
            token: None,
            user_id: None,
            user_name: String::new(),
            require_https: true,
            dedupe_mutations: false,
        }
    }

    /// Read the configuration from the process environment. A `.env` file is
    /// loaded first if one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = lookup(SERVER_URL).ok_or(Error::MissingVar(SERVER_URL))?;
        let mut config = Config::new(server_url.parse()?);

        config.token = lookup(TOKEN).map(BearerToken::new);
        config.user_id = lookup(USER_ID).map(UserId::new);
        config.user_name = lookup(USER_NAME).unwrap_or_default();
        if let Some(value) = lookup(REQUIRE_HTTPS) {
            config.require_https = parse_flag(REQUIRE_HTTPS, &value)?;
        }
        if let Some(value) = lookup(DEDUPE_MUTATIONS) {
            config.dedupe_mutations = parse_flag(DEDUPE_MUTATIONS, &value)?;
        }

        Ok(config)
    }

    pub fn session_user(&self) -> Result<SessionUser, Error> {
        let id = self.user_id.clone().ok_or(Error::MissingVar(USER_ID))?;
        Ok(SessionUser::new(id, self.user_name.clone()))
    }

    pub fn bearer_token(&self) -> Result<BearerToken, Error> {
        self.token.clone().ok_or(Error::MissingVar(TOKEN))
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(Error::InvalidVar(key, value.to_string())),
    }
}
