//! Content store: posts and their explicit delete cascade.

use chrono::Utc;

use crate::engagement::EngagementStore;
use crate::errors::{CoreError, ValidationError};
use crate::id::{IdentityId, PostId};
use crate::keys::KeySpace;
use crate::model::Post;
use crate::store::{self, Backend};

/// Relation alias: identity -> ids of posts it owns.
pub(crate) const REL_OWNER_POSTS: &str = "owner_posts";

pub struct ContentStore {
    keys: KeySpace,
}

impl ContentStore {
    pub fn new(keys: KeySpace) -> Self {
        Self { keys }
    }

    /// Creates a post. The image reference is mandatory (a post without media
    /// is invalid); the description may be empty.
    pub async fn create_post<B: Backend>(
        &self,
        backend: &mut B,
        owner: IdentityId,
        image_ref: &str,
        description: &str,
    ) -> Result<Post, CoreError> {
        if image_ref.is_empty() {
            return Err(ValidationError::single(
                "image_ref",
                "validation.required",
                "image reference must not be empty",
            )
            .into());
        }
        let id = PostId(backend.next_id(&self.keys.sequence(Post::COLLECTION)).await?);
        let post = Post {
            id,
            owner_id: owner,
            image_ref: image_ref.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        store::put_doc(backend, &self.keys.entity(Post::COLLECTION, id), &post).await?;
        backend
            .set_add(&self.keys.relation(REL_OWNER_POSTS, owner), &id.to_string())
            .await?;
        backend
            .set_add(&self.keys.index(Post::COLLECTION), &id.to_string())
            .await?;
        log::debug!("post {id} created by {owner}");
        Ok(post)
    }

    pub async fn get_post<B: Backend>(&self, backend: &mut B, id: PostId) -> Result<Post, CoreError> {
        store::get_doc(backend, &self.keys.entity(Post::COLLECTION, id))
            .await?
            .ok_or_else(|| CoreError::not_found("post", id))
    }

    /// Deletes a post on behalf of `requester`.
    ///
    /// Only the owner may delete; dependents (likes, comments) are removed in
    /// the same operation, an explicit cascade rather than storage-layer
    /// magic.
    pub async fn delete_post<B: Backend>(
        &self,
        backend: &mut B,
        engagement: &EngagementStore,
        id: PostId,
        requester: IdentityId,
    ) -> Result<(), CoreError> {
        let post = self.get_post(backend, id).await?;
        if post.owner_id != requester {
            return Err(CoreError::Forbidden);
        }
        self.remove_post(backend, engagement, &post).await
    }

    /// Posts owned by `owner`, most recent first.
    pub async fn posts_of<B: Backend>(&self, backend: &mut B, owner: IdentityId) -> Result<Vec<Post>, CoreError> {
        self.load_posts(backend, &self.keys.relation(REL_OWNER_POSTS, owner)).await
    }

    /// Every post, most recent first.
    pub async fn all_posts<B: Backend>(&self, backend: &mut B) -> Result<Vec<Post>, CoreError> {
        self.load_posts(backend, &self.keys.index(Post::COLLECTION)).await
    }

    /// Removes every post `owner` has (identity cascade).
    pub(crate) async fn remove_posts_of<B: Backend>(
        &self,
        backend: &mut B,
        engagement: &EngagementStore,
        owner: IdentityId,
    ) -> Result<(), CoreError> {
        for post in self.posts_of(backend, owner).await? {
            self.remove_post(backend, engagement, &post).await?;
        }
        backend.del(&[self.keys.relation(REL_OWNER_POSTS, owner)]).await?;
        Ok(())
    }

    async fn remove_post<B: Backend>(
        &self,
        backend: &mut B,
        engagement: &EngagementStore,
        post: &Post,
    ) -> Result<(), CoreError> {
        engagement.remove_post_engagement(backend, post.id).await?;
        let member = post.id.to_string();
        backend
            .set_remove(&self.keys.relation(REL_OWNER_POSTS, post.owner_id), &member)
            .await?;
        backend.set_remove(&self.keys.index(Post::COLLECTION), &member).await?;
        backend.del(&[self.keys.entity(Post::COLLECTION, post.id)]).await?;
        log::debug!("post {} deleted", post.id);
        Ok(())
    }

    async fn load_posts<B: Backend>(&self, backend: &mut B, set_key: &str) -> Result<Vec<Post>, CoreError> {
        let mut posts = Vec::new();
        for member in backend.set_members(set_key).await? {
            let Ok(id) = member.parse::<PostId>() else {
                continue;
            };
            if let Some(post) = store::get_doc::<B, Post>(backend, &self.keys.entity(Post::COLLECTION, id)).await? {
                posts.push(post);
            }
        }
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }
}
