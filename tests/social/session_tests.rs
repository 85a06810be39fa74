use super::support::*;

#[tokio::test]
async fn unknown_tokens_are_rejected() {
    let mut social = fresh_social();
    register_user(&mut social, "ana").await;

    let err = social
        .require_session(&SessionToken("no-such-token".to_string()))
        .await
        .expect_err("bogus token");
    assert!(matches!(err, CoreError::Unauthenticated));
}

#[tokio::test]
async fn logout_invalidates_the_token_and_is_idempotent() {
    let mut social = fresh_social();
    let (_, _, token) = register_user(&mut social, "ana").await;

    social.logout(&token).await.expect("logout");
    social.logout(&token).await.expect("repeated logout is a no-op");

    let err = social.require_session(&token).await.expect_err("token is dead");
    assert!(matches!(err, CoreError::Unauthenticated));
}

#[tokio::test]
async fn each_login_issues_an_independent_token() {
    let mut social = fresh_social();
    let (identity, _, first) = register_user(&mut social, "ana").await;
    let second = social
        .login("ana@example.com", "ana-password")
        .await
        .expect("second login");
    assert_ne!(first.0, second.0);

    social.logout(&first).await.expect("logout first");
    let ctx = social.require_session(&second).await.expect("second survives");
    assert_eq!(ctx.identity, identity.id);
}

#[tokio::test]
async fn notifications_can_only_be_read_by_their_recipient() {
    let mut social = fresh_social();
    let (ana, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (_, bob_ctx, _) = register_user(&mut social, "bob").await;

    social.follow(&bob_ctx, ana.id).await.expect("bob follows ana");
    let inbox = social.list_notifications(&ana_ctx).await.expect("inbox");
    let notification = &inbox[0];

    let err = social
        .mark_read(&bob_ctx, notification.id)
        .await
        .expect_err("bob cannot read ana's notification");
    assert!(matches!(err, CoreError::Forbidden));

    let read = social.mark_read(&ana_ctx, notification.id).await.expect("ana can");
    assert!(read.read);
    // Marking twice is harmless.
    let again = social.mark_read(&ana_ctx, notification.id).await.expect("again");
    assert!(again.read);
}

#[tokio::test]
async fn gated_operations_see_the_authenticated_identity_only() {
    let mut social = fresh_social();
    let (ana, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;

    let post = social.create_post(&ana_ctx, "pic.jpg", "").await.expect("post");
    assert_eq!(post.owner_id, ana.id);

    let edge = social.follow(&bob_ctx, ana.id).await.expect("follow");
    assert_eq!(edge.source_id, bob.id);
    assert_eq!(edge.target_id, ana.id);
}
