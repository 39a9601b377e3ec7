//! Table definitions and bootstrap of the blog schema.
//!
//! Foreign keys carry the cascade rules of the entities, so deleting a parent
//! row is enough for the store to clean up or detach its dependents.

use crate::entity::{
    category::{self, DEFAULT_CATEGORY_ID},
    comment, notification, post, post_like, profile_settings, user,
};
use sea_orm::{
    sea_query::{
        self, ColumnDef, ForeignKey, ForeignKeyAction, ForeignKeyCreateStatement, Index,
        IndexCreateStatement, TableCreateStatement, TableDropStatement,
    },
    ActiveModelTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, ExecResult, PaginatorTrait,
    Set,
};
use tracing::{debug, info, instrument};

/// Name of the default category seeded by [`bootstrap`]
pub const DEFAULT_CATEGORY_NAME: &str = "Uncategorized";

async fn create_table(db: &DbConn, stmt: &TableCreateStatement) -> Result<ExecResult, DbErr> {
    let builder = db.get_database_backend();
    db.execute(builder.build(stmt)).await
}

async fn create_index(db: &DbConn, stmt: &IndexCreateStatement) -> Result<ExecResult, DbErr> {
    let builder = db.get_database_backend();
    db.execute(builder.build(stmt)).await
}

async fn drop_table(db: &DbConn, stmt: &TableDropStatement) -> Result<ExecResult, DbErr> {
    let builder = db.get_database_backend();
    db.execute(builder.build(stmt)).await
}

fn cascade(fk: &mut ForeignKeyCreateStatement) -> &mut ForeignKeyCreateStatement {
    fk.on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
}

/// Create every table of the blog, parents first. Existing tables are left alone.
#[instrument(skip(db))]
pub async fn create_tables(db: &DbConn) -> Result<(), DbErr> {
    create_user_table(db).await?;
    create_category_table(db).await?;
    create_profile_settings_table(db).await?;
    create_post_table(db).await?;
    create_post_like_table(db).await?;
    create_comment_table(db).await?;
    create_notification_table(db).await?;
    debug!("blog tables created");

    Ok(())
}

/// Drop every table of the blog, children first
#[instrument(skip(db))]
pub async fn drop_tables(db: &DbConn) -> Result<(), DbErr> {
    let stmts = [
        sea_query::Table::drop().table(notification::Entity).if_exists().to_owned(),
        sea_query::Table::drop().table(comment::Entity).if_exists().to_owned(),
        sea_query::Table::drop().table(post_like::Entity).if_exists().to_owned(),
        sea_query::Table::drop().table(post::Entity).if_exists().to_owned(),
        sea_query::Table::drop().table(profile_settings::Entity).if_exists().to_owned(),
        sea_query::Table::drop().table(category::Entity).if_exists().to_owned(),
        sea_query::Table::drop().table(user::Entity).if_exists().to_owned(),
    ];
    for stmt in &stmts {
        drop_table(db, stmt).await?;
    }

    Ok(())
}

/// Make sure the category posts default to exists, and return it.
///
/// On an empty table the category is inserted normally so the backend's id
/// sequence hands out id 1 itself.
#[instrument(skip(db))]
pub async fn seed_default_category(db: &DbConn) -> Result<category::Model, DbErr> {
    if let Some(existing) = category::Entity::find_by_id(DEFAULT_CATEGORY_ID).one(db).await? {
        return Ok(existing);
    }

    let mut seed = category::ActiveModel {
        name: Set(DEFAULT_CATEGORY_NAME.to_owned()),
        ..Default::default()
    };
    if category::Entity::find().count(db).await? > 0 {
        seed.id = Set(DEFAULT_CATEGORY_ID);
    }
    let seeded = seed.insert(db).await?;
    if seeded.id != DEFAULT_CATEGORY_ID {
        return Err(DbErr::Custom(format!(
            "default category was seeded with id {} instead of {DEFAULT_CATEGORY_ID}",
            seeded.id
        )));
    }
    info!(name = %seeded.name, "seeded default category");

    Ok(seeded)
}

/// Create the tables and seed the default category; safe to run repeatedly
pub async fn bootstrap(db: &DbConn) -> Result<(), DbErr> {
    create_tables(db).await?;
    seed_default_category(db).await?;
    info!("blog schema ready");

    Ok(())
}

pub async fn create_user_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(user::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(user::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(user::Column::Username)
                .string_len(150)
                .not_null()
                .unique_key(),
        )
        .to_owned();

    create_table(db, &stmt).await
}

pub async fn create_category_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(category::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(category::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(category::Column::Name).string_len(50).not_null())
        .to_owned();

    create_table(db, &stmt).await
}

pub async fn create_profile_settings_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(profile_settings::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(profile_settings::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(profile_settings::Column::UserId)
                .integer()
                .null()
                .unique_key(),
        )
        .col(ColumnDef::new(profile_settings::Column::Bio).text().not_null())
        .col(ColumnDef::new(profile_settings::Column::Location).string_len(60).null())
        .col(ColumnDef::new(profile_settings::Column::Image).string_len(100).null())
        .col(ColumnDef::new(profile_settings::Column::TwitterUrl).string_len(255).null())
        .col(ColumnDef::new(profile_settings::Column::WebsiteUrl).string_len(255).null())
        .col(ColumnDef::new(profile_settings::Column::LinkedinUrl).string_len(255).null())
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_profilesettings_user")
                .from(profile_settings::Entity, profile_settings::Column::UserId)
                .to(user::Entity, user::Column::Id),
        ))
        .to_owned();

    create_table(db, &stmt).await
}

pub async fn create_post_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(post::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(post::Column::PostId)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(post::Column::UserId).integer().null())
        .col(ColumnDef::new(post::Column::Title).string_len(60).not_null())
        .col(ColumnDef::new(post::Column::Content).text().null())
        .col(
            ColumnDef::new(post::Column::PubDate)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(post::Column::Slug).string_len(255).not_null())
        .col(ColumnDef::new(post::Column::Image).string_len(100).null())
        .col(
            ColumnDef::new(post::Column::Views)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(post::Column::CategoryId)
                .integer()
                .null()
                .default(DEFAULT_CATEGORY_ID),
        )
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_post_user")
                .from(post::Entity, post::Column::UserId)
                .to(user::Entity, user::Column::Id),
        ))
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_post_category")
                .from(post::Entity, post::Column::CategoryId)
                .to(category::Entity, category::Column::Id),
        ))
        .to_owned();
    create_table(db, &stmt).await?;

    let index = Index::create()
        .name("idx-blog_post-pub_date")
        .table(post::Entity)
        .col(post::Column::PubDate)
        .if_not_exists()
        .to_owned();
    create_index(db, &index).await
}

pub async fn create_post_like_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(post_like::Entity)
        .if_not_exists()
        .col(ColumnDef::new(post_like::Column::PostId).integer().not_null())
        .col(ColumnDef::new(post_like::Column::UserId).integer().not_null())
        .primary_key(
            Index::create()
                .name("pk-blog_post_like")
                .col(post_like::Column::PostId)
                .col(post_like::Column::UserId),
        )
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_post_like_post")
                .from(post_like::Entity, post_like::Column::PostId)
                .to(post::Entity, post::Column::PostId),
        ))
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_post_like_user")
                .from(post_like::Entity, post_like::Column::UserId)
                .to(user::Entity, user::Column::Id),
        ))
        .to_owned();

    create_table(db, &stmt).await
}

pub async fn create_comment_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(comment::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(comment::Column::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(comment::Column::PostId).integer().not_null())
        .col(ColumnDef::new(comment::Column::Body).text().not_null())
        .col(
            ColumnDef::new(comment::Column::CreatedOn)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(comment::Column::UserId).integer().null())
        .col(
            ColumnDef::new(comment::Column::Approve)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(comment::Column::ParentId).integer().null())
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_comment_post")
                .from(comment::Entity, comment::Column::PostId)
                .to(post::Entity, post::Column::PostId),
        ))
        .foreign_key(
            ForeignKey::create()
                .name("FK_comment_user")
                .from(comment::Entity, comment::Column::UserId)
                .to(user::Entity, user::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_comment_parent")
                .from(comment::Entity, comment::Column::ParentId)
                .to(comment::Entity, comment::Column::Id),
        ))
        .to_owned();

    create_table(db, &stmt).await
}

pub async fn create_notification_table(db: &DbConn) -> Result<ExecResult, DbErr> {
    let stmt = sea_query::Table::create()
        .table(notification::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(notification::Column::NotificationId)
                .uuid()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(notification::Column::ReceiverUserId).integer().null())
        .col(
            ColumnDef::new(notification::Column::ProviderUserId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(notification::Column::NotificationType)
                .string_len(20)
                .not_null(),
        )
        .col(
            ColumnDef::new(notification::Column::IsSeen)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(notification::Column::PostNameId).integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("FK_notification_receiver")
                .from(notification::Entity, notification::Column::ReceiverUserId)
                .to(user::Entity, user::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_notification_provider")
                .from(notification::Entity, notification::Column::ProviderUserId)
                .to(user::Entity, user::Column::Id),
        ))
        .foreign_key(cascade(
            ForeignKey::create()
                .name("FK_notification_post")
                .from(notification::Entity, notification::Column::PostNameId)
                .to(post::Entity, post::Column::PostId),
        ))
        .to_owned();

    create_table(db, &stmt).await
}
