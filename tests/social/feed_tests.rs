use super::support::*;

#[tokio::test]
async fn home_feed_shows_only_followed_identities() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;
    let (_, cara_ctx, _) = register_user(&mut social, "cara").await;

    social.follow(&ana_ctx, bob.id).await.expect("follow bob");
    let bob_post = social.create_post(&bob_ctx, "bob.jpg", "").await.expect("bob post");
    social.create_post(&cara_ctx, "cara.jpg", "").await.expect("cara post");

    let feed = social.home_feed(&ana_ctx).await.expect("feed");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, bob_post.id);
}

#[tokio::test]
async fn your_own_posts_do_not_appear_in_your_home_feed() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    social.create_post(&ana_ctx, "mine.jpg", "").await.expect("post");

    assert!(social.home_feed(&ana_ctx).await.expect("feed").is_empty());
    assert_eq!(social.explore().await.expect("explore").len(), 1);
}

#[tokio::test]
async fn feeds_are_newest_first() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;
    let (cara, cara_ctx, _) = register_user(&mut social, "cara").await;

    social.follow(&ana_ctx, bob.id).await.expect("follow bob");
    social.follow(&ana_ctx, cara.id).await.expect("follow cara");

    let first = social.create_post(&bob_ctx, "one.jpg", "").await.expect("post");
    let second = social.create_post(&cara_ctx, "two.jpg", "").await.expect("post");
    let third = social.create_post(&bob_ctx, "three.jpg", "").await.expect("post");

    let feed = social.home_feed(&ana_ctx).await.expect("feed");
    let ids: Vec<_> = feed.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let explore = social.explore().await.expect("explore");
    let ids: Vec<_> = explore.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn unfollowing_removes_their_posts_from_the_feed() {
    let mut social = fresh_social();
    let (_, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;

    social.follow(&ana_ctx, bob.id).await.expect("follow");
    social.create_post(&bob_ctx, "bob.jpg", "").await.expect("post");
    assert_eq!(social.home_feed(&ana_ctx).await.expect("feed").len(), 1);

    social.unfollow(&ana_ctx, bob.id).await.expect("unfollow");
    assert!(social.home_feed(&ana_ctx).await.expect("feed").is_empty());
    // Explore still carries the post.
    assert_eq!(social.explore().await.expect("explore").len(), 1);
}

// End-to-end pass over the whole surface: register, follow, post, engage,
// read notifications and feeds.
#[tokio::test]
async fn full_scenario_round_trip() {
    let mut social = fresh_social();
    let (ana, ana_ctx, _) = register_user(&mut social, "ana").await;
    let (bob, bob_ctx, _) = register_user(&mut social, "bob").await;

    social.follow(&bob_ctx, ana.id).await.expect("bob follows ana");
    let post = social.create_post(&ana_ctx, "trip.jpg", "on the road").await.expect("post");
    social.like(&bob_ctx, post.id).await.expect("bob likes");
    social.comment(&bob_ctx, post.id, "looks fun").await.expect("bob comments");

    let feed = social.home_feed(&bob_ctx).await.expect("bob's feed");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].description, "on the road");

    let inbox = social.list_notifications(&ana_ctx).await.expect("ana's inbox");
    let texts: Vec<&str> = inbox.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "bob commented on your post",
            "bob liked your post",
            "bob started following you",
        ],
        "newest first"
    );

    let read = social.mark_read(&ana_ctx, inbox[0].id).await.expect("mark read");
    assert!(read.read);

    let followers = social.list_followers(ana.id).await.expect("followers");
    assert_eq!(followers[0].id, bob.id);
}
