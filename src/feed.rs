//! Feed/query service: read-only compositions over the stores.
//!
//! Pull model, recomputed on every call: no independent state, no caching
//! staleness to reason about. Ordering is part of the contract (reverse
//! chronological, monotonic id as tie-break).

use crate::content::ContentStore;
use crate::errors::CoreError;
use crate::graph::SocialGraph;
use crate::id::IdentityId;
use crate::model::Post;
use crate::store::Backend;

/// Every post, newest first, regardless of follow state.
pub async fn explore<B: Backend>(backend: &mut B, content: &ContentStore) -> Result<Vec<Post>, CoreError> {
    content.all_posts(backend).await
}

/// Posts authored by identities `identity` follows, newest first.
pub async fn home_feed<B: Backend>(
    backend: &mut B,
    graph: &SocialGraph,
    content: &ContentStore,
    identity: IdentityId,
) -> Result<Vec<Post>, CoreError> {
    let following = graph.following_edges(backend, identity).await?;
    let mut posts = Vec::new();
    for edge in &following {
        posts.extend(content.posts_of(backend, edge.target_id).await?);
    }
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(posts)
}
