//! Environment driven configuration.
//!
//! | variable                 | default                      |
//! |--------------------------|------------------------------|
//! | `DATABASE_URL`           | required                     |
//! | `BLOG_MAX_CONNECTIONS`   | unset (driver default)       |
//! | `BLOG_SQLX_LOGGING`      | `false`                      |
//! | `BLOG_URL_PREFIX`        | `/`                          |
//! | `BLOG_POST_DETAIL_ROUTE` | `post/<slug:slug>/`          |
//!
//! A `.env` file in the working directory or any parent is loaded first.

use crate::{
    routes::{Routes, DEFAULT_POST_DETAIL_PATTERN, POST_DETAIL_ROUTE},
    Error, Result,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::{collections::HashMap, env};
use tracing::{debug, info};
use url::Url;

/// Connection and routing settings of the blog schema layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: Option<u32>,
    pub sqlx_logging: bool,
    pub url_prefix: String,
    pub post_detail_pattern: String,
}

impl Config {
    /// Settings for `database_url` with everything else at its default
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: None,
            sqlx_logging: false,
            url_prefix: "/".to_owned(),
            post_detail_pattern: DEFAULT_POST_DETAIL_PATTERN.to_owned(),
        }
    }

    /// Read settings from the process environment, after loading `.env` if present
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_vars(env::vars())
    }

    /// Read settings from an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let database_url = vars
            .get("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::Config("DATABASE_URL is not set".to_owned()))?;
        let mut config = Self::new(database_url.as_str());

        if let Some(max) = vars.get("BLOG_MAX_CONNECTIONS") {
            let max = max.parse::<u32>().map_err(|e| {
                Error::Config(format!("BLOG_MAX_CONNECTIONS = {max:?}: {e}"))
            })?;
            if max == 0 {
                return Err(Error::Config(
                    "BLOG_MAX_CONNECTIONS must be at least 1".to_owned(),
                ));
            }
            config.max_connections = Some(max);
        }
        if let Some(flag) = vars.get("BLOG_SQLX_LOGGING") {
            config.sqlx_logging = parse_flag(flag).ok_or_else(|| {
                Error::Config(format!("BLOG_SQLX_LOGGING = {flag:?} is not a boolean"))
            })?;
        }
        if let Some(prefix) = vars.get("BLOG_URL_PREFIX") {
            config.url_prefix = prefix.clone();
        }
        if let Some(pattern) = vars.get("BLOG_POST_DETAIL_ROUTE") {
            config.post_detail_pattern = pattern.clone();
        }

        Ok(config)
    }

    /// SeaORM connect options for this configuration
    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.database_url.clone());
        opt.sqlx_logging(self.sqlx_logging);
        if let Some(max) = self.max_connections {
            opt.max_connections(max);
        }
        opt
    }

    /// Open a connection pool to the configured database
    pub async fn connect(&self) -> Result<DatabaseConnection> {
        info!("Connecting to {}", redact(&self.database_url));
        Ok(Database::connect(self.connect_options()).await?)
    }

    /// Route table with the post detail view mounted at the configured pattern
    pub fn routes(&self) -> Result<Routes> {
        let mut routes = Routes::new(&self.url_prefix);
        routes.register(POST_DETAIL_ROUTE, &self.post_detail_pattern)?;
        Ok(routes)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Hide the password part of a connection url before logging it
fn redact(database_url: &str) -> String {
    let mut url = match Url::parse(database_url) {
        Ok(url) => url,
        Err(_) => return database_url.to_owned(),
    };
    if url.password().is_none() || url.set_password(Some("***")).is_err() {
        return database_url.to_owned();
    }
    url.to_string()
}
