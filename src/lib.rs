//! snapgraph core library.
//!
//! The backend data and authorization core of a minimal photo-sharing social
//! app: identities, a directed follow graph, posts with media references,
//! likes, comments, notification fan-out, and a session gate in front of
//! every mutation. Presentation and transport live outside this crate; the
//! core exposes typed operations and returns plain structured results.
//!
//! All state sits behind the [`store::Backend`] seam. [`store::RedisBackend`]
//! is the production implementation; [`store::MemoryBackend`] is a
//! deterministic in-process backend used by the test suite and embeddable
//! demos. [`social::Social`] bundles the stores behind a session-gated facade.

pub mod content;
pub mod engagement;
pub mod errors;
pub mod feed;
pub mod graph;
pub mod id;
pub mod identity;
pub mod keys;
pub mod model;
pub mod notify;
pub mod password;
pub mod session;
pub mod social;
pub mod store;
pub mod validators;

pub use content::ContentStore;
pub use engagement::{EngagementStore, LikeOutcome};
pub use errors::*;
pub use feed::{explore, home_feed};
pub use graph::{FollowOutcome, SocialGraph};
pub use id::{CommentId, FollowEdgeId, IdentityId, LikeId, NotificationId, PostId};
pub use identity::{IdentityStore, NewIdentity, ProfileUpdate};
pub use model::{Comment, FollowEdge, Identity, Like, Notification, Post};
pub use notify::{EventKind, NotificationEngine, SocialEvent};
pub use session::{SessionContext, SessionGate, SessionToken};
pub use social::Social;
pub use store::{Backend, MemoryBackend, RedisBackend};

// Re-export redis types so embedders don't need to depend on a specific
// redis version.
pub use redis;
pub use redis::aio::ConnectionManager;
