use super::support::*;

#[tokio::test]
async fn deleting_a_post_removes_its_engagement() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (_, bob_ctx, _) = register_user(&mut social, "bob").await;

    let post = social.create_post(&ana_ctx, "pic.jpg", "").await.expect("post");
    social.like(&bob_ctx, post.id).await.expect("like");
    social.comment(&bob_ctx, post.id, "great shot").await.expect("comment");

    social.delete_post(&ana_ctx, post.id).await.expect("delete own post");

    let err = social.get_post(post.id).await.expect_err("post is gone");
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(social.like_count(post.id).await.expect("count"), 0);
    assert!(social.list_comments(post.id).await.expect("comments").is_empty());
    assert!(social.explore().await.expect("explore").is_empty());
}

#[tokio::test]
async fn only_the_owner_may_delete_a_post() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (_, bob_ctx, _) = register_user(&mut social, "bob").await;

    let post = social.create_post(&ana_ctx, "pic.jpg", "").await.expect("post");
    let err = social
        .delete_post(&bob_ctx, post.id)
        .await
        .expect_err("non-owner delete");
    assert!(matches!(err, CoreError::Forbidden));
    social.get_post(post.id).await.expect("post survives");
}

#[tokio::test]
async fn deleting_an_identity_cascades_over_everything_it_touched() {
    let mut social = fresh_social();
    let (ana, ana_ctx, ana_token) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;

    // Edges in both directions, a post with engagement from bob, and ana's
    // own engagement on bob's post.
    social.follow(&ana_ctx, bob.id).await.expect("ana follows bob");
    social.follow(&bob_ctx, ana.id).await.expect("bob follows ana");
    let ana_post = social.create_post(&ana_ctx, "ana.jpg", "").await.expect("ana post");
    let bob_post = social.create_post(&bob_ctx, "bob.jpg", "").await.expect("bob post");
    social.like(&bob_ctx, ana_post.id).await.expect("bob likes ana's post");
    social.like(&ana_ctx, bob_post.id).await.expect("ana likes bob's post");
    social.comment(&ana_ctx, bob_post.id, "hi").await.expect("ana comments");

    social.delete_identity(&ana_ctx).await.expect("delete ana");

    // Identity and sessions are gone.
    let err = social.get_identity(ana.id).await.expect_err("identity gone");
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = social.require_session(&ana_token).await.expect_err("session revoked");
    assert!(matches!(err, CoreError::Unauthenticated));

    // Edges in both directions are gone.
    assert!(social.list_followers(bob.id).await.expect("followers").is_empty());
    assert!(social.list_following(bob.id).await.expect("following").is_empty());

    // Her post fell with its engagement; her like and comment elsewhere are
    // retracted.
    let err = social.get_post(ana_post.id).await.expect_err("post gone");
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(social.like_count(bob_post.id).await.expect("count"), 0);
    assert!(social.list_comments(bob_post.id).await.expect("comments").is_empty());

    // Bob's inbox no longer matters here, but ana's is cleared with her.
    let explore = social.explore().await.expect("explore");
    assert_eq!(explore.len(), 1);
    assert_eq!(explore[0].id, bob_post.id);
}

#[tokio::test]
async fn email_and_username_are_reusable_after_deletion() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    social.delete_identity(&ana_ctx).await.expect("delete");

    let (reborn, _) = social
        .register(NewIdentity {
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "ana-password".to_string(),
        })
        .await
        .expect("claims released by deletion");
    assert_eq!(reborn.username, "ana");
}
