use super::{display_or_none, loaded, user};
use sea_orm::{entity::prelude::*, ConnectionTrait, IntoActiveModel, QueryOrder, Set};
use std::fmt;

pub const VERBOSE_NAME: &str = "Comment";
pub const VERBOSE_NAME_PLURAL: &str = "Comments";

/// A comment on a post; replies point at their parent comment
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub post_id: i32,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_on: DateTimeUtc,
    /// Cleared, not cascaded, when the user is deleted
    pub user_id: Option<i32>,
    pub approve: bool,
    pub parent_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::PostId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Parent,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

/// The comment a reply answers
#[derive(Debug)]
pub struct ParentLink;

impl Linked for ParentLink {
    type FromEntity = Entity;

    type ToEntity = Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::Parent.def()]
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if loaded(&self.created_on).is_none() {
                self.created_on = Set(chrono::Utc::now());
            }
            if loaded(&self.approve).is_none() {
                self.approve = Set(false);
            }
        }
        Ok(self)
    }
}

impl Entity {
    /// Comments in their default order: oldest first
    pub fn find_in_order() -> Select<Entity> {
        Self::find()
            .order_by_asc(Column::CreatedOn)
            .order_by_asc(Column::Id)
    }
}

impl Model {
    /// Direct replies, oldest first
    pub async fn replies<C>(&self, db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_in_order()
            .filter(Column::ParentId.eq(self.id))
            .all(db)
            .await
    }

    /// The comment this one replies to, if any
    pub async fn parent<C>(&self, db: &C) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if self.parent_id.is_none() {
            return Ok(None);
        }
        self.find_linked(ParentLink).one(db).await
    }

    /// Set the moderation flag
    pub async fn set_approved<C>(self, db: &C, approved: bool) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut comment = self.into_active_model();
        comment.approve = Set(approved);
        comment.update(db).await
    }

    /// Textual representation, resolving the author
    pub async fn describe<C>(&self, db: &C) -> Result<String, DbErr>
    where
        C: ConnectionTrait,
    {
        let user = match self.user_id {
            Some(id) => user::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        Ok(self.display_with(user.as_ref()).to_string())
    }

    /// Textual representation with an already loaded author
    pub fn display_with<'a>(&'a self, user: Option<&'a user::Model>) -> CommentDisplay<'a> {
        CommentDisplay {
            comment: self,
            user,
        }
    }
}

/// `Comment: {body} by {user}`, see [`Model::display_with`]
#[derive(Debug)]
pub struct CommentDisplay<'a> {
    comment: &'a Model,
    user: Option<&'a user::Model>,
}

impl fmt::Display for CommentDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Comment: {} by {}",
            self.comment.body,
            display_or_none(self.user)
        )
    }
}
