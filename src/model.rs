//! Entity types persisted by the stores.
//!
//! All timestamps are UTC; all ids are typed, opaque and monotonically
//! assigned per collection (see [`crate::id`]).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CommentId, FollowEdgeId, IdentityId, LikeId, NotificationId, PostId};

/// Bio placeholder assigned at registration.
pub const DEFAULT_BIO: &str = "Update Bio!";

/// An account record.
#[derive(Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    /// Argon2id PHC hash of the credential. Never the raw value.
    pub(crate) credential: String,
    pub bio: String,
    /// Reference to an already-stored image resource, if any.
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub const COLLECTION: &'static str = "identities";
}

// Manual Debug so the credential verifier never lands in logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("credential", &"<redacted>")
            .field("bio", &self.bio)
            .field("profile_image", &self.profile_image)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A directed follow relationship: `source_id` follows `target_id`.
///
/// At most one edge exists per `(source, target)` pair and `source != target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdge {
    pub id: FollowEdgeId,
    pub source_id: IdentityId,
    pub target_id: IdentityId,
    pub created_at: DateTime<Utc>,
}

impl FollowEdge {
    pub const COLLECTION: &'static str = "follow_edges";
}

/// A post with a mandatory media reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub owner_id: IdentityId,
    /// Reference to an already-stored image resource. Non-empty.
    pub image_ref: String,
    /// Free-text caption; may be empty.
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub const COLLECTION: &'static str = "posts";
}

/// A like on a post. At most one per `(identity, post)` pair; a repeated like
/// removes this record instead of duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub identity_id: IdentityId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub const COLLECTION: &'static str = "likes";
}

/// A comment on a post. No uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub identity_id: IdentityId,
    pub post_id: PostId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub const COLLECTION: &'static str = "comments";
}

/// A notification record. Created only by the notification engine, never
/// directly by a client command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: IdentityId,
    /// Rendered description of the triggering event.
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub const COLLECTION: &'static str = "notifications";
}
