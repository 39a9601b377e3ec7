pub mod common;

use blog_schema::entity::{
    category, comment, notification::{self, NotificationType}, post, post_like,
    profile_settings, user,
};
use common::{create_category, create_post, create_user, TestContext};
use pretty_assertions::assert_eq;
use sea_orm::{entity::prelude::*, Set};

#[tokio::test]
async fn deleting_category_deletes_its_posts() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let db = &ctx.db;

    let doomed = create_category(db, "Doomed").await?;
    let kept = create_category(db, "Kept").await?;
    let a = create_post(db, "A", None, Some(&doomed)).await?;
    let b = create_post(db, "B", None, Some(&doomed)).await?;
    let c = create_post(db, "C", None, Some(&kept)).await?;

    comment::ActiveModel {
        post_id: Set(a.post_id),
        body: Set("gone with the post".to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let res = category::Entity::delete_by_id(doomed.id).exec(db).await?;
    assert_eq!(res.rows_affected, 1);

    assert_eq!(post::Entity::find_by_id(a.post_id).one(db).await?, None);
    assert_eq!(post::Entity::find_by_id(b.post_id).one(db).await?, None);
    assert_eq!(post::Entity::find_by_id(c.post_id).one(db).await?, Some(c));
    assert_eq!(comment::Entity::find().count(db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn deleting_user() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let db = &ctx.db;

    let gone = create_user(db, "gone").await?;
    let other = create_user(db, "other").await?;

    let profile = profile_settings::ActiveModel {
        user_id: Set(Some(gone.id)),
        bio: Set("leaving soon".to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let authored = create_post(db, "By gone", Some(&gone), None).await?;
    let others_post = create_post(db, "By other", Some(&other), None).await?;

    // comment by the deleted user on a surviving post
    let comment = comment::ActiveModel {
        post_id: Set(others_post.post_id),
        body: Set("still here".to_owned()),
        user_id: Set(Some(gone.id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    // provided by the deleted user
    let provided = notification::notify(db, NotificationType::Like, &others_post, gone.id)
        .await?
        .unwrap();
    // received by the deleted user, about a surviving post
    let received = notification::ActiveModel {
        receiver_user_id: Set(Some(gone.id)),
        provider_user_id: Set(other.id),
        notification_type: Set(NotificationType::Comment),
        post_name_id: Set(others_post.post_id),
        ..notification::ActiveModel::new()
    }
    .insert(db)
    .await?;

    others_post.like(db, gone.id).await?;

    user::Entity::delete_by_id(gone.id).exec(db).await?;

    assert_eq!(profile_settings::Entity::find_by_id(profile.id).one(db).await?, None);
    assert_eq!(post::Entity::find_by_id(authored.post_id).one(db).await?, None);
    assert!(post::Entity::find_by_id(others_post.post_id).one(db).await?.is_some());
    assert_eq!(
        notification::Entity::find_by_id(provided.notification_id).one(db).await?,
        None
    );

    let received = notification::Entity::find_by_id(received.notification_id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(received.receiver_user_id, None);
    assert_eq!(received.provider_user_id, other.id);

    let comment = comment::Entity::find_by_id(comment.id).one(db).await?.unwrap();
    assert_eq!(comment.user_id, None);
    assert_eq!(comment.body, "still here");

    assert_eq!(post_like::Entity::find().count(db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn deleting_post() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let db = &ctx.db;

    let author = create_user(db, "author").await?;
    let fan = create_user(db, "fan").await?;
    let post = create_post(db, "Short lived", Some(&author), None).await?;

    assert!(post.toggle_like(db, fan.id).await?);
    let root = comment::ActiveModel {
        post_id: Set(post.post_id),
        body: Set("root".to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    comment::ActiveModel {
        post_id: Set(post.post_id),
        body: Set("reply".to_owned()),
        parent_id: Set(Some(root.id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    assert_eq!(notification::Entity::find().count(db).await?, 1);

    post.delete(db).await?;

    assert_eq!(comment::Entity::find().count(db).await?, 0);
    assert_eq!(post_like::Entity::find().count(db).await?, 0);
    assert_eq!(notification::Entity::find().count(db).await?, 0);
    assert_eq!(user::Entity::find().count(db).await?, 2);

    Ok(())
}
