#![deny(missing_debug_implementations)]

//! # blog-schema
//!
//! Data model of a blogging application, expressed as SeaORM entities:
//! posts, categories, threaded comments, user profile settings and like-based
//! notifications.
//!
//! Behavior is intentionally thin. A [`post`](entity::post) derives its slug
//! from its title on every save, estimates its read time, and reverses its
//! canonical URL through a [`Routes`] table. Every record type has a textual
//! representation for display and debugging.
//!
//! ```ignore
//! use blog_schema::{entity::prelude::*, schema, Config};
//! use sea_orm::{ActiveModelTrait, Set};
//!
//! let config = Config::from_env()?;
//! let db = config.connect().await?;
//! schema::bootstrap(&db).await?;
//!
//! let post = PostActiveModel {
//!     title: Set("Hello, World!".to_owned()),
//!     ..Default::default()
//! }
//! .insert(&db)
//! .await?;
//!
//! assert_eq!(post.slug, "hello-world");
//! assert_eq!(post.get_absolute_url(&config.routes()?)?, "/post/hello-world/");
//! ```

pub mod config;
pub mod entity;
mod error;
pub mod readtime;
pub mod routes;
pub mod schema;
pub mod slug;

pub use config::Config;
pub use error::*;
pub use routes::Routes;

/// Directory, relative to the media root, that uploaded post and profile images are stored under.
pub const IMAGE_UPLOAD_DIR: &str = "images/";
