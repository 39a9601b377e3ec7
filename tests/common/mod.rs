#![allow(dead_code)]

use blog_schema::{
    entity::{category, post, user},
    schema, Config,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

pub struct TestContext {
    pub db: DatabaseConnection,
}

impl TestContext {
    /// A fresh in-memory database with the blog schema bootstrapped
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let mut config = Config::new("sqlite::memory:");
        // every pooled connection to `:memory:` would see its own database
        config.max_connections = Some(1);
        let db = config.connect().await.expect("connect to sqlite");
        schema::bootstrap(&db).await.expect("bootstrap schema");

        Self { db }
    }
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        username: Set(username.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<category::Model, DbErr> {
    category::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_post(
    db: &DatabaseConnection,
    title: &str,
    author: Option<&user::Model>,
    category: Option<&category::Model>,
) -> Result<post::Model, DbErr> {
    let mut post = post::ActiveModel {
        title: Set(title.to_owned()),
        user_id: Set(author.map(|u| u.id)),
        ..Default::default()
    };
    if let Some(category) = category {
        post.category_id = Set(Some(category.id));
    }
    post.insert(db).await
}
