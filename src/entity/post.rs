use super::{category::DEFAULT_CATEGORY_ID, comment, loaded, notification, post_like, user};
use crate::{
    readtime::{self, ReadTime},
    routes::{Routes, POST_DETAIL_ROUTE},
    slug,
};
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set,
};
use std::fmt;
use tracing::{debug, instrument};

pub const VERBOSE_NAME: &str = "Post";
pub const VERBOSE_NAME_PLURAL: &str = "Posts";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub post_id: i32,
    /// Author; the post is deleted together with its author
    pub user_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(60))")]
    pub title: String,
    /// Rich text body, usually HTML
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub pub_date: DateTimeUtc,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub slug: String,
    /// Path of the uploaded image, under [`crate::IMAGE_UPLOAD_DIR`]
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub image: Option<String>,
    pub views: i32,
    pub category_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_like::Entity")]
    PostLike,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostLike.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

/// Users who liked the post
#[derive(Debug)]
pub struct LikersLink;

impl Linked for LikersLink {
    type FromEntity = Entity;

    type ToEntity = super::user::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![
            Relation::PostLike.def(),
            super::post_like::Relation::User.def(),
        ]
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Fill creation defaults and derive the slug from the title.
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if loaded(&self.pub_date).is_none() {
                self.pub_date = Set(chrono::Utc::now());
            }
            if loaded(&self.views).is_none() {
                self.views = Set(0);
            }
            if loaded(&self.category_id).is_none() {
                self.category_id = Set(Some(DEFAULT_CATEGORY_ID));
            }
        }

        if let Some(views) = loaded(&self.views) {
            if *views < 0 {
                return Err(DbErr::Custom(format!(
                    "[before_save] Invalid views counter: {views}"
                )));
            }
        }

        // a partial update may not carry the title, the slug still follows the stored one
        let stored = match (loaded(&self.title), loaded(&self.post_id)) {
            (None, Some(post_id)) if !insert => Entity::find_by_id(*post_id).one(db).await?,
            _ => None,
        };
        let title = loaded(&self.title)
            .cloned()
            .or_else(|| stored.as_ref().map(|m| m.title.clone()));
        if let Some(title) = title {
            let current = loaded(&self.slug)
                .cloned()
                .or_else(|| stored.map(|m| m.slug))
                .unwrap_or_default();
            let slug = slug::on_save(&current, &title);
            debug!(%title, %slug, "derived post slug");
            self.slug = Set(slug);
        }

        Ok(self)
    }
}

impl Entity {
    /// Bump the view counter of a post by one, in a single statement
    #[instrument(skip(db))]
    pub async fn increment_views<C>(db: &C, post_id: i32) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Self::update_many()
            .col_expr(Column::Views, Expr::col(Column::Views).add(1))
            .filter(Column::PostId.eq(post_id))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("post {post_id}")));
        }
        Ok(())
    }

    /// Posts, most recently published first
    pub fn find_latest() -> Select<Entity> {
        Self::find()
            .order_by_desc(Column::PubDate)
            .order_by_desc(Column::PostId)
    }

    /// Posts carrying `slug`; slugs are not unique so several may match
    pub fn find_by_slug(slug: &str) -> Select<Entity> {
        Self::find_latest().filter(Column::Slug.eq(slug))
    }
}

impl Model {
    /// Read time estimate of the content, e.g. `"3 min read"`.
    ///
    /// A post without content counts as zero words and reads in `"1 min read"`.
    pub fn get_readtime(&self) -> String {
        self.read_time().text()
    }

    /// Read time estimate of the content, counted as plain text
    pub fn read_time(&self) -> ReadTime {
        readtime::of_text(self.content.as_deref())
    }

    /// Canonical path of the post detail view
    pub fn get_absolute_url(&self, routes: &Routes) -> crate::Result<String> {
        routes.reverse(POST_DETAIL_ROUTE, &[("slug", &self.slug)])
    }

    /// Top level comments, oldest first
    pub async fn comments<C>(&self, db: &C) -> Result<Vec<comment::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        comment::Entity::find_in_order()
            .filter(comment::Column::PostId.eq(self.post_id))
            .filter(comment::Column::ParentId.is_null())
            .all(db)
            .await
    }

    /// Users who liked the post
    pub async fn likers<C>(&self, db: &C) -> Result<Vec<user::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.find_linked(LikersLink)
            .order_by_asc(user::Column::Id)
            .all(db)
            .await
    }

    pub async fn like_count<C>(&self, db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        post_like::Entity::find()
            .filter(post_like::Column::PostId.eq(self.post_id))
            .count(db)
            .await
    }

    pub async fn is_liked_by<C>(&self, db: &C, user_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(post_like::Entity::find_by_id((self.post_id, user_id))
            .one(db)
            .await?
            .is_some())
    }

    /// Add a like; returns `false` if the user already liked the post
    #[instrument(skip(self, db), fields(post_id = self.post_id))]
    pub async fn like<C>(&self, db: &C, user_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        if self.is_liked_by(db, user_id).await? {
            return Ok(false);
        }
        post_like::ActiveModel {
            post_id: Set(self.post_id),
            user_id: Set(user_id),
        }
        .insert(db)
        .await?;
        Ok(true)
    }

    /// Remove a like; returns `false` if there was none
    #[instrument(skip(self, db), fields(post_id = self.post_id))]
    pub async fn unlike<C>(&self, db: &C, user_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = post_like::Entity::delete_by_id((self.post_id, user_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Like the post, or take the like back if already given.
    ///
    /// A fresh like notifies the author. Returns whether the user likes the
    /// post afterwards.
    pub async fn toggle_like<C>(&self, db: &C, user_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        if self.unlike(db, user_id).await? {
            return Ok(false);
        }
        self.like(db, user_id).await?;
        notification::notify(db, notification::NotificationType::Like, self, user_id).await?;
        Ok(true)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
