//! Session-gated facade over the stores.
//!
//! [`Social`] owns the backend and one instance of each store, all sharing a
//! [`KeySpace`]. Mutating operations (everything except `register`/`login`)
//! take a [`SessionContext`] produced by the gate; there is no other way to
//! name the current identity. Socially meaningful mutations (follow, like,
//! comment) hand a [`SocialEvent`] to the notification engine in the same
//! call.

use crate::content::ContentStore;
use crate::engagement::{EngagementStore, LikeOutcome};
use crate::errors::CoreError;
use crate::feed;
use crate::graph::SocialGraph;
use crate::id::{IdentityId, NotificationId, PostId};
use crate::identity::{IdentityStore, NewIdentity, ProfileUpdate};
use crate::keys::KeySpace;
use crate::model::{Comment, FollowEdge, Identity, Notification, Post};
use crate::notify::{EventKind, NotificationEngine, SocialEvent};
use crate::session::{SessionContext, SessionGate, SessionToken};
use crate::store::Backend;

pub struct Social<B: Backend> {
    backend: B,
    identities: IdentityStore,
    graph: SocialGraph,
    content: ContentStore,
    engagement: EngagementStore,
    notifications: NotificationEngine,
    sessions: SessionGate,
}

impl<B: Backend> Social<B> {
    pub fn new(backend: B, prefix: impl Into<String>) -> Self {
        let keys = KeySpace::new(prefix);
        Self {
            backend,
            identities: IdentityStore::new(keys.clone()),
            graph: SocialGraph::new(keys.clone()),
            content: ContentStore::new(keys.clone()),
            engagement: EngagementStore::new(keys.clone()),
            notifications: NotificationEngine::new(keys.clone()),
            sessions: SessionGate::new(keys),
        }
    }

    /// Direct backend access (diagnostics, test cleanup).
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ---- identity & session -------------------------------------------------

    /// Creates an account and, on success, establishes a session for it.
    pub async fn register(&mut self, new: NewIdentity) -> Result<(Identity, SessionToken), CoreError> {
        let identity = self.identities.register(&mut self.backend, new).await?;
        let token = self.sessions.open(&mut self.backend, identity.id).await?;
        Ok((identity, token))
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<SessionToken, CoreError> {
        let identity = self.identities.authenticate(&mut self.backend, email, password).await?;
        self.sessions.open(&mut self.backend, identity.id).await
    }

    /// Idempotent session invalidation.
    pub async fn logout(&mut self, token: &SessionToken) -> Result<(), CoreError> {
        self.sessions.close(&mut self.backend, token).await
    }

    /// Resolves a token into the authenticated context; the sole authority
    /// for "current identity".
    pub async fn require_session(&mut self, token: &SessionToken) -> Result<SessionContext, CoreError> {
        self.sessions.require_session(&mut self.backend, token).await
    }

    pub async fn get_identity(&mut self, id: IdentityId) -> Result<Identity, CoreError> {
        self.identities.get(&mut self.backend, id).await
    }

    pub async fn update_profile(&mut self, ctx: &SessionContext, update: ProfileUpdate) -> Result<Identity, CoreError> {
        self.identities.update_profile(&mut self.backend, ctx.identity, update).await
    }

    pub async fn set_profile_image(&mut self, ctx: &SessionContext, image_ref: &str) -> Result<Identity, CoreError> {
        self.identities
            .set_profile_image(&mut self.backend, ctx.identity, image_ref)
            .await
    }

    /// Deletes the authenticated identity and everything it owns: follow
    /// edges in both directions, posts (with their likes and comments), its
    /// own likes and comments elsewhere, its notifications, its sessions and
    /// its unique claims. Each step is an explicit cascade.
    pub async fn delete_identity(&mut self, ctx: &SessionContext) -> Result<(), CoreError> {
        let identity = self.identities.get(&mut self.backend, ctx.identity).await?;
        self.graph.remove_all_edges(&mut self.backend, identity.id).await?;
        self.content
            .remove_posts_of(&mut self.backend, &self.engagement, identity.id)
            .await?;
        self.engagement
            .remove_identity_engagement(&mut self.backend, identity.id)
            .await?;
        self.notifications.clear_inbox(&mut self.backend, identity.id).await?;
        self.sessions.revoke_all(&mut self.backend, identity.id).await?;
        self.identities.remove_record(&mut self.backend, &identity).await
    }

    // ---- social graph -------------------------------------------------------

    /// Follows `target`. Idempotent: re-following returns the existing edge
    /// and fans no second notification out.
    pub async fn follow(&mut self, ctx: &SessionContext, target: IdentityId) -> Result<FollowEdge, CoreError> {
        // Referential integrity: the target must exist before an edge can.
        self.identities.get(&mut self.backend, target).await?;
        let outcome = self.graph.follow(&mut self.backend, ctx.identity, target).await?;
        if outcome.was_created() {
            let actor = self.identities.get(&mut self.backend, ctx.identity).await?;
            self.notifications
                .fan_out(
                    &mut self.backend,
                    &SocialEvent {
                        kind: EventKind::Follow,
                        actor: ctx.identity,
                        recipient: target,
                        subject: None,
                    },
                    &actor.username,
                )
                .await?;
        }
        Ok(outcome.into_edge())
    }

    /// No-op when not following.
    pub async fn unfollow(&mut self, ctx: &SessionContext, target: IdentityId) -> Result<(), CoreError> {
        self.graph.unfollow(&mut self.backend, ctx.identity, target).await
    }

    /// Identities following `id`, most recent edge first.
    pub async fn list_followers(&mut self, id: IdentityId) -> Result<Vec<Identity>, CoreError> {
        let edges = self.graph.follower_edges(&mut self.backend, id).await?;
        self.resolve_identities(edges.iter().map(|edge| edge.source_id)).await
    }

    /// Identities `id` follows, most recent edge first.
    pub async fn list_following(&mut self, id: IdentityId) -> Result<Vec<Identity>, CoreError> {
        let edges = self.graph.following_edges(&mut self.backend, id).await?;
        self.resolve_identities(edges.iter().map(|edge| edge.target_id)).await
    }

    // ---- content ------------------------------------------------------------

    pub async fn create_post(
        &mut self,
        ctx: &SessionContext,
        image_ref: &str,
        description: &str,
    ) -> Result<Post, CoreError> {
        self.content
            .create_post(&mut self.backend, ctx.identity, image_ref, description)
            .await
    }

    pub async fn get_post(&mut self, id: PostId) -> Result<Post, CoreError> {
        self.content.get_post(&mut self.backend, id).await
    }

    pub async fn delete_post(&mut self, ctx: &SessionContext, id: PostId) -> Result<(), CoreError> {
        self.content
            .delete_post(&mut self.backend, &self.engagement, id, ctx.identity)
            .await
    }

    // ---- engagement ---------------------------------------------------------

    /// Toggles a like. The first call creates it and notifies the post owner
    /// (unless the liker owns the post); the second removes it silently.
    pub async fn like(&mut self, ctx: &SessionContext, post_id: PostId) -> Result<LikeOutcome, CoreError> {
        let post = self.content.get_post(&mut self.backend, post_id).await?;
        let outcome = self.engagement.like(&mut self.backend, ctx.identity, post.id).await?;
        if outcome.is_liked() {
            let actor = self.identities.get(&mut self.backend, ctx.identity).await?;
            self.notifications
                .fan_out(
                    &mut self.backend,
                    &SocialEvent {
                        kind: EventKind::Like,
                        actor: ctx.identity,
                        recipient: post.owner_id,
                        subject: Some(post.id),
                    },
                    &actor.username,
                )
                .await?;
        }
        Ok(outcome)
    }

    pub async fn comment(&mut self, ctx: &SessionContext, post_id: PostId, text: &str) -> Result<Comment, CoreError> {
        let post = self.content.get_post(&mut self.backend, post_id).await?;
        let comment = self
            .engagement
            .comment(&mut self.backend, ctx.identity, post.id, text)
            .await?;
        let actor = self.identities.get(&mut self.backend, ctx.identity).await?;
        self.notifications
            .fan_out(
                &mut self.backend,
                &SocialEvent {
                    kind: EventKind::Comment,
                    actor: ctx.identity,
                    recipient: post.owner_id,
                    subject: Some(post.id),
                },
                &actor.username,
            )
            .await?;
        Ok(comment)
    }

    pub async fn list_comments(&mut self, post_id: PostId) -> Result<Vec<Comment>, CoreError> {
        self.engagement.list_comments(&mut self.backend, post_id).await
    }

    pub async fn like_count(&mut self, post_id: PostId) -> Result<u64, CoreError> {
        self.engagement.like_count(&mut self.backend, post_id).await
    }

    pub async fn has_liked(&mut self, ctx: &SessionContext, post_id: PostId) -> Result<bool, CoreError> {
        self.engagement.has_liked(&mut self.backend, ctx.identity, post_id).await
    }

    // ---- notifications ------------------------------------------------------

    pub async fn list_notifications(&mut self, ctx: &SessionContext) -> Result<Vec<Notification>, CoreError> {
        self.notifications.list(&mut self.backend, ctx.identity).await
    }

    pub async fn mark_read(&mut self, ctx: &SessionContext, id: NotificationId) -> Result<Notification, CoreError> {
        self.notifications.mark_read(&mut self.backend, id, ctx.identity).await
    }

    // ---- feeds --------------------------------------------------------------

    pub async fn explore(&mut self) -> Result<Vec<Post>, CoreError> {
        feed::explore(&mut self.backend, &self.content).await
    }

    pub async fn home_feed(&mut self, ctx: &SessionContext) -> Result<Vec<Post>, CoreError> {
        feed::home_feed(&mut self.backend, &self.graph, &self.content, ctx.identity).await
    }

    async fn resolve_identities(
        &mut self,
        ids: impl Iterator<Item = IdentityId>,
    ) -> Result<Vec<Identity>, CoreError> {
        let mut identities = Vec::new();
        for id in ids {
            if let Some(identity) = self.identities.try_get(&mut self.backend, id).await? {
                identities.push(identity);
            }
        }
        Ok(identities)
    }
}
