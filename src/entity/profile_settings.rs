use super::display_or_none;
use sea_orm::{entity::prelude::*, ConnectionTrait};

pub const VERBOSE_NAME: &str = "Profile Setting";
pub const VERBOSE_NAME_PLURAL: &str = "Profile Settings";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_profilesettings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    #[sea_orm(column_type = "String(StringLen::N(60))", nullable)]
    pub location: Option<String>,
    /// Path of the uploaded image, under [`crate::IMAGE_UPLOAD_DIR`]
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub image: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
    pub twitter_url: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
    pub website_url: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
    pub linkedin_url: Option<String>,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Textual representation: the owning user, or `None` when unlinked
    pub async fn describe<C>(&self, db: &C) -> Result<String, DbErr>
    where
        C: ConnectionTrait,
    {
        let user = self.find_related(super::user::Entity).one(db).await?;
        Ok(display_or_none(user.as_ref()))
    }
}
