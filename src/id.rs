use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use nanoid::nanoid;
use serde::{Deserialize, Serialize};

/// Canonical alphabet for session tokens (no ambiguous glyphs).
const SESSION_TOKEN_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
/// Session token length.
const SESSION_TOKEN_LENGTH: usize = 32;

/// Generates a new opaque session token.
pub fn generate_session_token() -> String {
    nanoid!(SESSION_TOKEN_LENGTH, SESSION_TOKEN_ALPHABET)
}

/// Declares a typed entity identifier. Values are minted from the entity's
/// collection sequence (see [`crate::store::Backend::next_id`]).
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Ok(Self(raw.parse()?))
            }
        }
    };
}

entity_id!(
    /// Identifier of an [`crate::model::Identity`].
    IdentityId
);
entity_id!(
    /// Identifier of a [`crate::model::FollowEdge`].
    FollowEdgeId
);
entity_id!(
    /// Identifier of a [`crate::model::Post`].
    PostId
);
entity_id!(
    /// Identifier of a [`crate::model::Like`].
    LikeId
);
entity_id!(
    /// Identifier of a [`crate::model::Comment`].
    CommentId
);
entity_id!(
    /// Identifier of a [`crate::model::Notification`].
    NotificationId
);
