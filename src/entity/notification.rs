use super::{display_or_none, loaded, post, user};
use sea_orm::{entity::prelude::*, ConnectionTrait, IntoActiveModel, Set};
use std::fmt;
use tracing::{debug, instrument};

pub const VERBOSE_NAME: &str = "Notification";
pub const VERBOSE_NAME_PLURAL: &str = "Notifications";

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum NotificationType {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "comment")]
    Comment,
}

impl NotificationType {
    /// Accepted values with their human readable labels
    pub const CHOICES: [(NotificationType, &'static str); 2] =
        [(Self::Like, "Like"), (Self::Comment, "Comment")];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Like => "Like",
            Self::Comment => "Comment",
        }
    }

    /// Parse a stored value, e.g. from a form field
    pub fn from_choice(value: &str) -> Option<Self> {
        match value {
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub notification_id: Uuid,
    pub receiver_user_id: Option<i32>,
    pub provider_user_id: i32,
    pub notification_type: NotificationType,
    pub is_seen: bool,
    /// The post the notification is about
    pub post_name_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReceiverUserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Receiver,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ProviderUserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Provider,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostNameId",
        to = "super::post::Column::PostId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PostName,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostName.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            notification_id: Set(Uuid::new_v4()),
            is_seen: Set(false),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if loaded(&self.notification_id).is_none() {
                self.notification_id = Set(Uuid::new_v4());
            }
            if loaded(&self.is_seen).is_none() {
                self.is_seen = Set(false);
            }
        }
        Ok(self)
    }
}

impl Entity {
    /// Unseen notifications addressed to `receiver_user_id`
    pub fn find_unseen_for(receiver_user_id: i32) -> Select<Entity> {
        Self::find()
            .filter(Column::ReceiverUserId.eq(receiver_user_id))
            .filter(Column::IsSeen.eq(false))
    }
}

impl Model {
    /// Flag the notification as seen
    pub async fn mark_seen<C>(self, db: &C) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut notification = self.into_active_model();
        notification.is_seen = Set(true);
        notification.update(db).await
    }

    /// Textual representation, resolving the post and both users
    pub async fn describe<C>(&self, db: &C) -> Result<String, DbErr>
    where
        C: ConnectionTrait,
    {
        let post = self.find_related(post::Entity).one(db).await?;
        let receiver = match self.receiver_user_id {
            Some(id) => user::Entity::find_by_id(id).one(db).await?,
            None => None,
        };
        let provider = user::Entity::find_by_id(self.provider_user_id)
            .one(db)
            .await?;
        Ok(format!(
            "Post name: {}, Post id: {}, Receiver: {}, Provider: {}",
            display_or_none(post.as_ref()),
            self.notification_id,
            display_or_none(receiver.as_ref()),
            display_or_none(provider.as_ref()),
        ))
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Notify the author of `post` that `provider_user_id` acted on it.
///
/// Nothing is recorded for posts without an author or when authors act on
/// their own posts.
#[instrument(skip(db, post), fields(post_id = post.post_id))]
pub async fn notify<C>(
    db: &C,
    kind: NotificationType,
    post: &post::Model,
    provider_user_id: i32,
) -> Result<Option<Model>, DbErr>
where
    C: ConnectionTrait,
{
    let receiver = match post.user_id {
        Some(author) if author != provider_user_id => author,
        _ => {
            debug!("no one to notify");
            return Ok(None);
        }
    };
    let notification = ActiveModel {
        receiver_user_id: Set(Some(receiver)),
        provider_user_id: Set(provider_user_id),
        notification_type: Set(kind),
        post_name_id: Set(post.post_id),
        ..ActiveModel::new()
    }
    .insert(db)
    .await?;
    Ok(Some(notification))
}
