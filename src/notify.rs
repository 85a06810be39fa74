//! Notification engine: fan-out from social events to per-recipient records.
//!
//! Records are created here and nowhere else. The one interesting rule is
//! suppression: an event whose actor is also its recipient produces nothing,
//! so no identity is ever notified about its own action.

use chrono::Utc;

use crate::errors::CoreError;
use crate::id::{IdentityId, NotificationId, PostId};
use crate::keys::KeySpace;
use crate::model::Notification;
use crate::store::{self, Backend};

/// Relation alias: identity -> ids of notifications addressed to it.
pub(crate) const REL_INBOX: &str = "inbox";

/// Kind of socially meaningful event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Follow,
    Like,
    Comment,
}

/// A socially meaningful event, emitted by the graph/engagement stores after
/// a successful mutation.
#[derive(Debug, Clone)]
pub struct SocialEvent {
    pub kind: EventKind,
    pub actor: IdentityId,
    pub recipient: IdentityId,
    /// Post the event concerns, if any (none for follows).
    pub subject: Option<PostId>,
}

/// Deterministic notification text for `(kind, actor display name)`.
pub fn render(kind: EventKind, actor_name: &str) -> String {
    match kind {
        EventKind::Follow => format!("{actor_name} started following you"),
        EventKind::Like => format!("{actor_name} liked your post"),
        EventKind::Comment => format!("{actor_name} commented on your post"),
    }
}

pub struct NotificationEngine {
    keys: KeySpace,
}

impl NotificationEngine {
    pub fn new(keys: KeySpace) -> Self {
        Self { keys }
    }

    /// Appends a notification for the event's recipient, or returns `None`
    /// when the suppression rule applies (`actor == recipient`).
    pub async fn fan_out<B: Backend>(
        &self,
        backend: &mut B,
        event: &SocialEvent,
        actor_name: &str,
    ) -> Result<Option<Notification>, CoreError> {
        if event.actor == event.recipient {
            return Ok(None);
        }
        let id = NotificationId(backend.next_id(&self.keys.sequence(Notification::COLLECTION)).await?);
        let notification = Notification {
            id,
            recipient_id: event.recipient,
            text: render(event.kind, actor_name),
            created_at: Utc::now(),
            read: false,
        };
        store::put_doc(backend, &self.keys.entity(Notification::COLLECTION, id), &notification).await?;
        backend
            .set_add(&self.keys.relation(REL_INBOX, event.recipient), &id.to_string())
            .await?;
        log::debug!("notification {id} for {} ({:?})", event.recipient, event.kind);
        Ok(Some(notification))
    }

    /// Notifications addressed to `recipient`, most recent first.
    pub async fn list<B: Backend>(&self, backend: &mut B, recipient: IdentityId) -> Result<Vec<Notification>, CoreError> {
        let mut notifications = Vec::new();
        for member in backend.set_members(&self.keys.relation(REL_INBOX, recipient)).await? {
            let Ok(id) = member.parse::<NotificationId>() else {
                continue;
            };
            if let Some(notification) =
                store::get_doc::<B, Notification>(backend, &self.keys.entity(Notification::COLLECTION, id)).await?
            {
                notifications.push(notification);
            }
        }
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }

    /// Marks a notification read. Only its recipient may do so.
    pub async fn mark_read<B: Backend>(
        &self,
        backend: &mut B,
        id: NotificationId,
        requester: IdentityId,
    ) -> Result<Notification, CoreError> {
        let key = self.keys.entity(Notification::COLLECTION, id);
        let mut notification: Notification = store::get_doc(backend, &key)
            .await?
            .ok_or_else(|| CoreError::not_found("notification", id))?;
        if notification.recipient_id != requester {
            return Err(CoreError::Forbidden);
        }
        notification.read = true;
        store::put_doc(backend, &key, &notification).await?;
        Ok(notification)
    }

    /// Drops every notification addressed to `recipient` (identity cascade).
    pub(crate) async fn clear_inbox<B: Backend>(&self, backend: &mut B, recipient: IdentityId) -> Result<(), CoreError> {
        let inbox_key = self.keys.relation(REL_INBOX, recipient);
        let mut keys: Vec<String> = backend
            .set_members(&inbox_key)
            .await?
            .into_iter()
            .filter_map(|member| member.parse::<NotificationId>().ok())
            .map(|id| self.keys.entity(Notification::COLLECTION, id))
            .collect();
        keys.push(inbox_key);
        backend.del(&keys).await?;
        Ok(())
    }
}
