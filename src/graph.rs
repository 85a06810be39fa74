//! Social graph store: directed follow edges.
//!
//! The `(source, target)` pair claim (`follow_edges:unique:pair:*`) is the
//! single source of truth for "does this edge exist"; the per-identity
//! relation sets are navigation indexes maintained alongside it.

use chrono::Utc;

use crate::errors::CoreError;
use crate::id::{FollowEdgeId, IdentityId};
use crate::keys::KeySpace;
use crate::model::FollowEdge;
use crate::store::{self, Backend};

/// Relation alias: identity -> ids of edges where it is the source.
pub(crate) const REL_FOLLOWING: &str = "following";
/// Relation alias: identity -> ids of edges where it is the target.
pub(crate) const REL_FOLLOWERS: &str = "followers";

/// Result of a follow request.
#[derive(Debug, Clone)]
pub enum FollowOutcome {
    /// A new edge was created (fan-out should fire).
    Created(FollowEdge),
    /// The edge already existed; the request was a no-op.
    Existing(FollowEdge),
}

impl FollowOutcome {
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_edge(self) -> FollowEdge {
        match self {
            Self::Created(edge) => edge,
            Self::Existing(edge) => edge,
        }
    }

    pub fn edge(&self) -> &FollowEdge {
        match self {
            Self::Created(edge) => edge,
            Self::Existing(edge) => edge,
        }
    }
}

pub struct SocialGraph {
    keys: KeySpace,
}

impl SocialGraph {
    pub fn new(keys: KeySpace) -> Self {
        Self { keys }
    }

    fn pair_key(&self, source: IdentityId, target: IdentityId) -> String {
        self.keys
            .unique(FollowEdge::COLLECTION, "pair", &format!("{source}:{target}"))
    }

    /// Creates the edge `source -> target`, or returns the existing one.
    ///
    /// Idempotent: a second request (including one that lost a concurrent
    /// race on the pair claim) reports [`FollowOutcome::Existing`] so callers
    /// know not to fan a second notification out. A claim whose edge document
    /// is not visible (the winner has not written it yet, or never did) is
    /// repaired in place rather than surfaced as an error.
    pub async fn follow<B: Backend>(
        &self,
        backend: &mut B,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<FollowOutcome, CoreError> {
        if source == target {
            return Err(CoreError::SelfFollow);
        }

        let pair_key = self.pair_key(source, target);
        loop {
            let id = FollowEdgeId(backend.next_id(&self.keys.sequence(FollowEdge::COLLECTION)).await?);
            if backend.put_if_absent(&pair_key, &id.to_string()).await? {
                let edge = FollowEdge {
                    id,
                    source_id: source,
                    target_id: target,
                    created_at: Utc::now(),
                };
                self.write_edge(backend, &edge).await?;
                log::debug!("follow edge {id}: {source} -> {target}");
                return Ok(FollowOutcome::Created(edge));
            }

            // Lost the claim race.
            let Some(claimed_raw) = backend.get(&pair_key).await? else {
                // Claim released in between (concurrent unfollow); take
                // another run at it.
                continue;
            };
            let claimed_id = claimed_raw
                .parse::<FollowEdgeId>()
                .map_err(|_| CoreError::other(format!("corrupt follow edge reference: {claimed_raw}")))?;
            if let Some(existing) =
                store::get_doc::<B, FollowEdge>(backend, &self.keys.entity(FollowEdge::COLLECTION, claimed_id)).await?
            {
                return Ok(FollowOutcome::Existing(existing));
            }
            // Claim without an edge document: rebuild it from the claim so
            // the request still lands on idempotent success.
            let edge = FollowEdge {
                id: claimed_id,
                source_id: source,
                target_id: target,
                created_at: Utc::now(),
            };
            self.write_edge(backend, &edge).await?;
            return Ok(FollowOutcome::Existing(edge));
        }
    }

    async fn write_edge<B: Backend>(&self, backend: &mut B, edge: &FollowEdge) -> Result<(), CoreError> {
        let member = edge.id.to_string();
        store::put_doc(backend, &self.keys.entity(FollowEdge::COLLECTION, edge.id), edge).await?;
        backend
            .set_add(&self.keys.relation(REL_FOLLOWING, edge.source_id), &member)
            .await?;
        backend
            .set_add(&self.keys.relation(REL_FOLLOWERS, edge.target_id), &member)
            .await?;
        Ok(())
    }

    /// Removes the edge `source -> target` if present; no-op otherwise.
    pub async fn unfollow<B: Backend>(
        &self,
        backend: &mut B,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<(), CoreError> {
        let pair_key = self.pair_key(source, target);
        let Some(edge) = self.edge_for_pair(backend, &pair_key).await? else {
            return Ok(());
        };
        self.remove_edge(backend, &edge).await
    }

    /// True if the edge `source -> target` exists.
    pub async fn is_following<B: Backend>(
        &self,
        backend: &mut B,
        source: IdentityId,
        target: IdentityId,
    ) -> Result<bool, CoreError> {
        Ok(backend.get(&self.pair_key(source, target)).await?.is_some())
    }

    /// Edges where `id` is the target, most recent first.
    pub async fn follower_edges<B: Backend>(&self, backend: &mut B, id: IdentityId) -> Result<Vec<FollowEdge>, CoreError> {
        self.load_edges(backend, &self.keys.relation(REL_FOLLOWERS, id)).await
    }

    /// Edges where `id` is the source, most recent first.
    pub async fn following_edges<B: Backend>(&self, backend: &mut B, id: IdentityId) -> Result<Vec<FollowEdge>, CoreError> {
        self.load_edges(backend, &self.keys.relation(REL_FOLLOWING, id)).await
    }

    /// Removes all edges where `id` is source or target (identity cascade).
    pub(crate) async fn remove_all_edges<B: Backend>(&self, backend: &mut B, id: IdentityId) -> Result<(), CoreError> {
        let mut edges = self.follower_edges(backend, id).await?;
        edges.extend(self.following_edges(backend, id).await?);
        for edge in &edges {
            self.remove_edge(backend, edge).await?;
        }
        backend
            .del(&[
                self.keys.relation(REL_FOLLOWING, id),
                self.keys.relation(REL_FOLLOWERS, id),
            ])
            .await?;
        Ok(())
    }

    async fn remove_edge<B: Backend>(&self, backend: &mut B, edge: &FollowEdge) -> Result<(), CoreError> {
        let member = edge.id.to_string();
        backend
            .set_remove(&self.keys.relation(REL_FOLLOWING, edge.source_id), &member)
            .await?;
        backend
            .set_remove(&self.keys.relation(REL_FOLLOWERS, edge.target_id), &member)
            .await?;
        backend
            .del(&[
                self.pair_key(edge.source_id, edge.target_id),
                self.keys.entity(FollowEdge::COLLECTION, edge.id),
            ])
            .await?;
        Ok(())
    }

    async fn edge_for_pair<B: Backend>(&self, backend: &mut B, pair_key: &str) -> Result<Option<FollowEdge>, CoreError> {
        let Some(id_raw) = backend.get(pair_key).await? else {
            return Ok(None);
        };
        let id = id_raw
            .parse::<FollowEdgeId>()
            .map_err(|_| CoreError::other(format!("corrupt follow edge reference: {id_raw}")))?;
        store::get_doc(backend, &self.keys.entity(FollowEdge::COLLECTION, id)).await
    }

    async fn load_edges<B: Backend>(&self, backend: &mut B, set_key: &str) -> Result<Vec<FollowEdge>, CoreError> {
        let mut edges = Vec::new();
        for member in backend.set_members(set_key).await? {
            let Ok(id) = member.parse::<FollowEdgeId>() else {
                continue;
            };
            if let Some(edge) = store::get_doc::<B, FollowEdge>(backend, &self.keys.entity(FollowEdge::COLLECTION, id)).await? {
                edges.push(edge);
            }
        }
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(edges)
    }
}
