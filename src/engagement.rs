//! Engagement store: likes (toggle semantics) and comments.

use chrono::Utc;

use crate::errors::{CoreError, ValidationError};
use crate::id::{CommentId, IdentityId, LikeId, PostId};
use crate::keys::KeySpace;
use crate::model::{Comment, Like};
use crate::store::{self, Backend};

/// Relation alias: post -> ids of its likes.
pub(crate) const REL_POST_LIKES: &str = "post_likes";
/// Relation alias: identity -> ids of likes it placed.
pub(crate) const REL_IDENTITY_LIKES: &str = "identity_likes";
/// Relation alias: post -> ids of its comments.
pub(crate) const REL_POST_COMMENTS: &str = "post_comments";
/// Relation alias: identity -> ids of comments it wrote.
pub(crate) const REL_IDENTITY_COMMENTS: &str = "identity_comments";

/// Result of a like request.
#[derive(Debug, Clone)]
pub enum LikeOutcome {
    /// The like was created (fan-out should fire unless suppressed).
    Liked(Like),
    /// A prior like existed and was removed. No notification.
    Unliked,
}

impl LikeOutcome {
    pub fn is_liked(&self) -> bool {
        matches!(self, Self::Liked(_))
    }
}

pub struct EngagementStore {
    keys: KeySpace,
}

impl EngagementStore {
    pub fn new(keys: KeySpace) -> Self {
        Self { keys }
    }

    fn pair_key(&self, identity: IdentityId, post: PostId) -> String {
        self.keys.unique(Like::COLLECTION, "pair", &format!("{identity}:{post}"))
    }

    /// Toggles the like of `identity` on `post`.
    ///
    /// The `(identity, post)` pair claim serializes concurrent toggles: the
    /// writer that loses the claim race observes the existing like and
    /// removes it, so a constraint collision never surfaces as an error.
    pub async fn like<B: Backend>(
        &self,
        backend: &mut B,
        identity: IdentityId,
        post: PostId,
    ) -> Result<LikeOutcome, CoreError> {
        let id = LikeId(backend.next_id(&self.keys.sequence(Like::COLLECTION)).await?);
        let pair_key = self.pair_key(identity, post);
        if !backend.put_if_absent(&pair_key, &id.to_string()).await? {
            if let Some(claimed_raw) = backend.get(&pair_key).await? {
                if let Some(existing) = self.like_by_raw_id(backend, &claimed_raw).await? {
                    self.remove_like(backend, &existing).await?;
                } else {
                    // Claim without a like document (the winner has not
                    // written it yet, or never did). Clear every trace so
                    // the toggle converges instead of wedging on the stale
                    // claim.
                    let claimed_id = claimed_raw
                        .parse::<LikeId>()
                        .map_err(|_| CoreError::other(format!("corrupt like reference: {claimed_raw}")))?;
                    let leftover = Like {
                        id: claimed_id,
                        identity_id: identity,
                        post_id: post,
                        created_at: Utc::now(),
                    };
                    self.remove_like(backend, &leftover).await?;
                }
            }
            return Ok(LikeOutcome::Unliked);
        }

        let like = Like {
            id,
            identity_id: identity,
            post_id: post,
            created_at: Utc::now(),
        };
        store::put_doc(backend, &self.keys.entity(Like::COLLECTION, id), &like).await?;
        backend
            .set_add(&self.keys.relation(REL_POST_LIKES, post), &id.to_string())
            .await?;
        backend
            .set_add(&self.keys.relation(REL_IDENTITY_LIKES, identity), &id.to_string())
            .await?;
        Ok(LikeOutcome::Liked(like))
    }

    /// True if `identity` currently likes `post`.
    pub async fn has_liked<B: Backend>(
        &self,
        backend: &mut B,
        identity: IdentityId,
        post: PostId,
    ) -> Result<bool, CoreError> {
        Ok(backend.get(&self.pair_key(identity, post)).await?.is_some())
    }

    /// Number of likes currently on `post`.
    pub async fn like_count<B: Backend>(&self, backend: &mut B, post: PostId) -> Result<u64, CoreError> {
        backend.set_len(&self.keys.relation(REL_POST_LIKES, post)).await
    }

    /// Adds a comment. Text must be non-empty; an identity may comment on the
    /// same post any number of times.
    pub async fn comment<B: Backend>(
        &self,
        backend: &mut B,
        identity: IdentityId,
        post: PostId,
        text: &str,
    ) -> Result<Comment, CoreError> {
        if text.is_empty() {
            return Err(ValidationError::single("text", "validation.required", "comment text must not be empty").into());
        }
        let id = CommentId(backend.next_id(&self.keys.sequence(Comment::COLLECTION)).await?);
        let comment = Comment {
            id,
            identity_id: identity,
            post_id: post,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        store::put_doc(backend, &self.keys.entity(Comment::COLLECTION, id), &comment).await?;
        backend
            .set_add(&self.keys.relation(REL_POST_COMMENTS, post), &id.to_string())
            .await?;
        backend
            .set_add(&self.keys.relation(REL_IDENTITY_COMMENTS, identity), &id.to_string())
            .await?;
        Ok(comment)
    }

    /// Comments on `post` in chronological thread order (oldest first).
    pub async fn list_comments<B: Backend>(&self, backend: &mut B, post: PostId) -> Result<Vec<Comment>, CoreError> {
        let mut comments = Vec::new();
        for member in backend.set_members(&self.keys.relation(REL_POST_COMMENTS, post)).await? {
            let Ok(id) = member.parse::<CommentId>() else {
                continue;
            };
            if let Some(comment) = store::get_doc::<B, Comment>(backend, &self.keys.entity(Comment::COLLECTION, id)).await? {
                comments.push(comment);
            }
        }
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    /// Removes every like and comment attached to `post` (post cascade).
    pub(crate) async fn remove_post_engagement<B: Backend>(&self, backend: &mut B, post: PostId) -> Result<(), CoreError> {
        for member in backend.set_members(&self.keys.relation(REL_POST_LIKES, post)).await? {
            if let Some(like) = self.like_by_raw_id(backend, &member).await? {
                self.remove_like(backend, &like).await?;
            }
        }
        for member in backend.set_members(&self.keys.relation(REL_POST_COMMENTS, post)).await? {
            if let Some(comment) = self.comment_by_raw_id(backend, &member).await? {
                self.remove_comment(backend, &comment).await?;
            }
        }
        backend
            .del(&[
                self.keys.relation(REL_POST_LIKES, post),
                self.keys.relation(REL_POST_COMMENTS, post),
            ])
            .await?;
        Ok(())
    }

    /// Removes every like and comment `identity` placed anywhere (identity
    /// cascade).
    pub(crate) async fn remove_identity_engagement<B: Backend>(
        &self,
        backend: &mut B,
        identity: IdentityId,
    ) -> Result<(), CoreError> {
        for member in backend.set_members(&self.keys.relation(REL_IDENTITY_LIKES, identity)).await? {
            if let Some(like) = self.like_by_raw_id(backend, &member).await? {
                self.remove_like(backend, &like).await?;
            }
        }
        for member in backend
            .set_members(&self.keys.relation(REL_IDENTITY_COMMENTS, identity))
            .await?
        {
            if let Some(comment) = self.comment_by_raw_id(backend, &member).await? {
                self.remove_comment(backend, &comment).await?;
            }
        }
        backend
            .del(&[
                self.keys.relation(REL_IDENTITY_LIKES, identity),
                self.keys.relation(REL_IDENTITY_COMMENTS, identity),
            ])
            .await?;
        Ok(())
    }

    async fn remove_like<B: Backend>(&self, backend: &mut B, like: &Like) -> Result<(), CoreError> {
        let member = like.id.to_string();
        backend
            .set_remove(&self.keys.relation(REL_POST_LIKES, like.post_id), &member)
            .await?;
        backend
            .set_remove(&self.keys.relation(REL_IDENTITY_LIKES, like.identity_id), &member)
            .await?;
        backend
            .del(&[
                self.pair_key(like.identity_id, like.post_id),
                self.keys.entity(Like::COLLECTION, like.id),
            ])
            .await?;
        Ok(())
    }

    async fn remove_comment<B: Backend>(&self, backend: &mut B, comment: &Comment) -> Result<(), CoreError> {
        let member = comment.id.to_string();
        backend
            .set_remove(&self.keys.relation(REL_POST_COMMENTS, comment.post_id), &member)
            .await?;
        backend
            .set_remove(&self.keys.relation(REL_IDENTITY_COMMENTS, comment.identity_id), &member)
            .await?;
        backend
            .del(&[self.keys.entity(Comment::COLLECTION, comment.id)])
            .await?;
        Ok(())
    }

    async fn like_by_raw_id<B: Backend>(&self, backend: &mut B, raw: &str) -> Result<Option<Like>, CoreError> {
        let Ok(id) = raw.parse::<LikeId>() else {
            return Ok(None);
        };
        store::get_doc(backend, &self.keys.entity(Like::COLLECTION, id)).await
    }

    async fn comment_by_raw_id<B: Backend>(&self, backend: &mut B, raw: &str) -> Result<Option<Comment>, CoreError> {
        let Ok(id) = raw.parse::<CommentId>() else {
            return Ok(None);
        };
        store::get_doc(backend, &self.keys.entity(Comment::COLLECTION, id)).await
    }
}
