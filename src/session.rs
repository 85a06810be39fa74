//! Session gate: binds an authenticated identity to a request context.
//!
//! There is no ambient "current user": [`SessionGate::require_session`]
//! resolves a token into a [`SessionContext`] that callers thread explicitly
//! through every gated operation.

use crate::errors::CoreError;
use crate::id::{IdentityId, generate_session_token};
use crate::keys::KeySpace;
use crate::store::Backend;

/// Relation alias: identity -> tokens of its open sessions.
pub(crate) const REL_SESSIONS: &str = "sessions";

/// Opaque session token handed to the caller at login/registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(pub String);

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated request context. Produced only by the session gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub identity: IdentityId,
}

pub struct SessionGate {
    keys: KeySpace,
}

impl SessionGate {
    pub fn new(keys: KeySpace) -> Self {
        Self { keys }
    }

    /// Opens a session for an already-authenticated identity.
    pub async fn open<B: Backend>(&self, backend: &mut B, identity: IdentityId) -> Result<SessionToken, CoreError> {
        let token = SessionToken(generate_session_token());
        backend.put(&self.keys.session(&token.0), &identity.to_string()).await?;
        backend
            .set_add(&self.keys.relation(REL_SESSIONS, identity), &token.0)
            .await?;
        log::debug!("session opened for {identity}");
        Ok(token)
    }

    /// Resolves a token into the authenticated context, or
    /// [`CoreError::Unauthenticated`].
    pub async fn require_session<B: Backend>(
        &self,
        backend: &mut B,
        token: &SessionToken,
    ) -> Result<SessionContext, CoreError> {
        let Some(raw) = backend.get(&self.keys.session(&token.0)).await? else {
            return Err(CoreError::Unauthenticated);
        };
        let identity = raw.parse::<IdentityId>().map_err(|_| CoreError::Unauthenticated)?;
        Ok(SessionContext { identity })
    }

    /// Invalidates a session. Idempotent: closing an unknown token succeeds.
    pub async fn close<B: Backend>(&self, backend: &mut B, token: &SessionToken) -> Result<(), CoreError> {
        let session_key = self.keys.session(&token.0);
        if let Some(raw) = backend.get(&session_key).await? {
            backend.del(&[session_key]).await?;
            if let Ok(identity) = raw.parse::<IdentityId>() {
                backend
                    .set_remove(&self.keys.relation(REL_SESSIONS, identity), &token.0)
                    .await?;
            }
        }
        Ok(())
    }

    /// Invalidates every session of `identity` (identity cascade).
    pub(crate) async fn revoke_all<B: Backend>(&self, backend: &mut B, identity: IdentityId) -> Result<(), CoreError> {
        let set_key = self.keys.relation(REL_SESSIONS, identity);
        let mut keys: Vec<String> = backend
            .set_members(&set_key)
            .await?
            .into_iter()
            .map(|token| self.keys.session(&token))
            .collect();
        keys.push(set_key);
        backend.del(&keys).await?;
        Ok(())
    }
}
