pub mod common;

use blog_schema::entity::comment;
use common::{create_post, create_user, TestContext};
use pretty_assertions::assert_eq;
use sea_orm::{entity::prelude::*, Set};

async fn reply(
    db: &DatabaseConnection,
    post_id: i32,
    parent: Option<&comment::Model>,
    body: &str,
) -> Result<comment::Model, DbErr> {
    comment::ActiveModel {
        post_id: Set(post_id),
        body: Set(body.to_owned()),
        parent_id: Set(parent.map(|c| c.id)),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[tokio::test]
async fn defaults_on_insert() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let db = &ctx.db;

    let post = create_post(db, "Commented", None, None).await?;
    let before = chrono::Utc::now();
    let comment = reply(db, post.post_id, None, "first!").await?;

    assert!(!comment.approve);
    assert!(comment.created_on >= before);
    assert_eq!(comment.user_id, None);
    assert_eq!(comment.parent_id, None);

    let approved = comment.clone().set_approved(db, true).await?;
    assert!(approved.approve);
    assert_eq!(approved.created_on, comment.created_on);

    Ok(())
}

#[tokio::test]
async fn replies_in_creation_order() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let db = &ctx.db;

    let post = create_post(db, "Threaded", None, None).await?;
    let root = reply(db, post.post_id, None, "root").await?;
    let other_root = reply(db, post.post_id, None, "other root").await?;
    let r1 = reply(db, post.post_id, Some(&root), "reply 1").await?;
    let r2 = reply(db, post.post_id, Some(&root), "reply 2").await?;
    let nested = reply(db, post.post_id, Some(&r1), "nested").await?;
    let r3 = reply(db, post.post_id, Some(&root), "reply 3").await?;

    assert_eq!(root.replies(db).await?, vec![r1.clone(), r2.clone(), r3.clone()]);
    assert_eq!(r1.replies(db).await?, vec![nested.clone()]);
    assert_eq!(other_root.replies(db).await?, vec![]);

    assert_eq!(post.comments(db).await?, vec![root.clone(), other_root.clone()]);

    assert_eq!(nested.parent(db).await?, Some(r1.clone()));
    assert_eq!(r1.parent(db).await?, Some(root.clone()));
    assert_eq!(root.parent(db).await?, None);

    let all: Vec<String> = comment::Entity::find_in_order()
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.body)
        .collect();
    assert_eq!(
        all,
        vec!["root", "other root", "reply 1", "reply 2", "nested", "reply 3"]
    );

    Ok(())
}

#[tokio::test]
async fn deleting_parent_deletes_subtree() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let db = &ctx.db;

    let post = create_post(db, "Pruned", None, None).await?;
    let root = reply(db, post.post_id, None, "root").await?;
    let r1 = reply(db, post.post_id, Some(&root), "reply").await?;
    reply(db, post.post_id, Some(&r1), "nested").await?;
    let survivor = reply(db, post.post_id, None, "survivor").await?;

    root.delete(db).await?;

    assert_eq!(comment::Entity::find().all(db).await?, vec![survivor]);

    Ok(())
}

#[tokio::test]
async fn describe() -> Result<(), DbErr> {
    let ctx = TestContext::new().await;
    let db = &ctx.db;

    let alice = create_user(db, "alice").await?;
    let post = create_post(db, "Described", None, None).await?;
    let anonymous = reply(db, post.post_id, None, "who am I").await?;
    let signed = comment::ActiveModel {
        post_id: Set(post.post_id),
        body: Set("nice post".to_owned()),
        user_id: Set(Some(alice.id)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    assert_eq!(signed.describe(db).await?, "Comment: nice post by alice");
    assert_eq!(anonymous.describe(db).await?, "Comment: who am I by None");
    assert_eq!(
        signed.display_with(Some(&alice)).to_string(),
        "Comment: nice post by alice"
    );

    Ok(())
}
