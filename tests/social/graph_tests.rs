use super::support::*;

#[tokio::test]
async fn repeated_follow_keeps_a_single_edge_and_notification() {
    let mut social = fresh_social();
    let (_ana, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;

    let first = social.follow(&ana_ctx, bob.id).await.expect("first follow");
    let second = social.follow(&ana_ctx, bob.id).await.expect("repeated follow");
    assert_eq!(first.id, second.id, "re-follow must return the existing edge");

    let followers = social.list_followers(bob.id).await.expect("list followers");
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].username, "ana");

    let inbox = social.list_notifications(&bob_ctx).await.expect("inbox");
    assert_eq!(inbox.len(), 1, "one follow, one notification");
    assert_eq!(inbox[0].text, "ana started following you");
    assert!(!inbox[0].read);
}

#[tokio::test]
async fn following_yourself_is_rejected() {
    let mut social = fresh_social();
    let (ana, ana_ctx, _) = register_user(&mut social, "ana").await;

    let err = social.follow(&ana_ctx, ana.id).await.expect_err("self-follow");
    assert!(matches!(err, CoreError::SelfFollow));

    let inbox = social.list_notifications(&ana_ctx).await.expect("inbox");
    assert!(inbox.is_empty());
}

#[tokio::test]
async fn following_an_unknown_identity_fails() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;

    let err = social
        .follow(&ana_ctx, snapgraph::IdentityId(9999))
        .await
        .expect_err("missing target");
    assert!(matches!(err, CoreError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn unfollow_is_a_noop_when_not_following() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, _, _) = register_user(&mut social, "bob").await;

    social.unfollow(&ana_ctx, bob.id).await.expect("unfollow without edge");

    social.follow(&ana_ctx, bob.id).await.expect("follow");
    social.unfollow(&ana_ctx, bob.id).await.expect("unfollow");
    social.unfollow(&ana_ctx, bob.id).await.expect("second unfollow");

    let followers = social.list_followers(bob.id).await.expect("list followers");
    assert!(followers.is_empty());
}

#[tokio::test]
async fn follow_listings_are_newest_first() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, _, _) = register_user(&mut social, "bob").await;
    let (cara, _, _) = register_user(&mut social, "cara").await;
    let (dan, _, _) = register_user(&mut social, "dan").await;

    social.follow(&ana_ctx, bob.id).await.expect("follow bob");
    social.follow(&ana_ctx, cara.id).await.expect("follow cara");
    social.follow(&ana_ctx, dan.id).await.expect("follow dan");

    let following = social.list_following(ana_ctx.identity).await.expect("following");
    let names: Vec<&str> = following.iter().map(|identity| identity.username.as_str()).collect();
    assert_eq!(names, vec!["dan", "cara", "bob"]);
}

#[tokio::test]
async fn follow_after_unfollow_creates_a_fresh_edge() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;

    let first = social.follow(&ana_ctx, bob.id).await.expect("follow");
    social.unfollow(&ana_ctx, bob.id).await.expect("unfollow");
    let second = social.follow(&ana_ctx, bob.id).await.expect("re-follow");
    assert_ne!(first.id, second.id);

    // Each genuinely new edge notifies again.
    let inbox = social.list_notifications(&bob_ctx).await.expect("inbox");
    assert_eq!(inbox.len(), 2);
}

// A concurrent cross-process follow can leave the pair claim visible before
// (or without) the winner's edge document. The loser must still land on
// idempotent success, not an error.
#[tokio::test]
async fn follow_repairs_a_claim_that_lost_its_edge_document() {
    use snapgraph::keys::KeySpace;
    use snapgraph::{Backend, IdentityId, MemoryBackend, SocialGraph};

    let keys = KeySpace::new("sgpair");
    let graph = SocialGraph::new(keys.clone());
    let mut backend = MemoryBackend::new();
    let source = IdentityId(1);
    let target = IdentityId(2);
    backend
        .put_if_absent(&keys.unique("follow_edges", "pair", "1:2"), "9")
        .await
        .expect("seed claim");

    let outcome = graph
        .follow(&mut backend, source, target)
        .await
        .expect("lost claim race lands on success");
    assert!(!outcome.was_created(), "repaired edge must not trigger fan-out");
    assert_eq!(outcome.edge().source_id, source);
    assert_eq!(outcome.edge().target_id, target);

    assert!(graph.is_following(&mut backend, source, target).await.expect("is_following"));
    let edges = graph.following_edges(&mut backend, source).await.expect("edges");
    assert_eq!(edges.len(), 1);
    let edges = graph.follower_edges(&mut backend, target).await.expect("edges");
    assert_eq!(edges.len(), 1);

    graph.unfollow(&mut backend, source, target).await.expect("unfollow");
    assert!(!graph.is_following(&mut backend, source, target).await.expect("is_following"));
}
