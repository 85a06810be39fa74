pub(crate) use snapgraph::errors::CoreError;
pub(crate) use snapgraph::model::Identity;
pub(crate) use snapgraph::session::{SessionContext, SessionToken};
pub(crate) use snapgraph::{MemoryBackend, NewIdentity, Social};

use std::sync::atomic::{AtomicUsize, Ordering};

static TEST_NAMESPACE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A [`Social`] over a fresh in-memory backend with a unique key prefix, so
/// tests never observe each other's data even when run in one process.
pub(crate) fn fresh_social() -> Social<MemoryBackend> {
    let idx = TEST_NAMESPACE_COUNTER.fetch_add(1, Ordering::SeqCst);
    Social::new(MemoryBackend::new(), format!("sgtest{idx}"))
}

/// Registers `<name>@example.com` with a valid password and returns the
/// identity along with a resolved session context.
pub(crate) async fn register_user(
    social: &mut Social<MemoryBackend>,
    name: &str,
) -> (Identity, SessionContext, SessionToken) {
    let (identity, token) = social
        .register(NewIdentity {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: format!("{name}-password"),
        })
        .await
        .expect("registration should succeed");
    let ctx = social
        .require_session(&token)
        .await
        .expect("fresh token should resolve");
    (identity, ctx, token)
}
