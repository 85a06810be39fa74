use super::support::*;

use snapgraph::model::DEFAULT_BIO;

#[tokio::test]
async fn register_assigns_defaults_and_opens_session() {
    let mut social = fresh_social();
    let (identity, ctx, _) = register_user(&mut social, "ana").await;

    assert_eq!(identity.username, "ana");
    assert_eq!(identity.email, "ana@example.com");
    assert_eq!(identity.bio, DEFAULT_BIO);
    assert!(identity.profile_image.is_none());
    assert_eq!(ctx.identity, identity.id);
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let mut social = fresh_social();
    register_user(&mut social, "ana").await;

    let err = social
        .register(NewIdentity {
            username: "other".to_string(),
            email: "Ana@Example.COM".to_string(),
            password: "irrelevant-pw".to_string(),
        })
        .await
        .expect_err("second identity with the same email must be rejected");
    assert!(matches!(err, CoreError::DuplicateEmail { .. }), "got {err:?}");
}

#[tokio::test]
async fn duplicate_username_is_rejected_case_insensitively() {
    let mut social = fresh_social();
    register_user(&mut social, "ana").await;

    let err = social
        .register(NewIdentity {
            username: "ANA".to_string(),
            email: "different@example.com".to_string(),
            password: "irrelevant-pw".to_string(),
        })
        .await
        .expect_err("second identity with the same username must be rejected");
    assert!(matches!(err, CoreError::DuplicateUsername { .. }), "got {err:?}");
}

#[tokio::test]
async fn validation_reports_every_failing_field_at_once() {
    let mut social = fresh_social();
    let err = social
        .register(NewIdentity {
            username: "a".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
        })
        .await
        .expect_err("invalid registration must fail");

    let CoreError::InvalidInput(validation) = err else {
        panic!("expected InvalidInput, got {err:?}");
    };
    let fields: Vec<&str> = validation.issues.iter().map(|issue| issue.field.as_str()).collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn failed_login_does_not_reveal_which_part_was_wrong() {
    let mut social = fresh_social();
    register_user(&mut social, "ana").await;

    let wrong_password = social
        .login("ana@example.com", "not-the-password")
        .await
        .expect_err("wrong password must fail");
    let unknown_email = social
        .login("ghost@example.com", "ana-password")
        .await
        .expect_err("unknown email must fail");

    assert!(matches!(wrong_password, CoreError::InvalidCredentials));
    assert!(matches!(unknown_email, CoreError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn login_accepts_the_registered_credentials() {
    let mut social = fresh_social();
    let (identity, _, _) = register_user(&mut social, "ana").await;

    let token = social
        .login("ana@example.com", "ana-password")
        .await
        .expect("login with correct credentials");
    let ctx = social.require_session(&token).await.expect("token resolves");
    assert_eq!(ctx.identity, identity.id);
}

#[tokio::test]
async fn profile_update_checks_username_availability() {
    let mut social = fresh_social();
    let (_, _, _) = register_user(&mut social, "ana").await;
    let (_, bob_ctx, _) = register_user(&mut social, "bob").await;

    let err = social
        .update_profile(
            &bob_ctx,
            snapgraph::ProfileUpdate {
                username: "ana".to_string(),
                bio: "stolen".to_string(),
            },
        )
        .await
        .expect_err("taken username must be rejected");
    assert!(matches!(err, CoreError::DuplicateUsername { .. }), "got {err:?}");

    let updated = social
        .update_profile(
            &bob_ctx,
            snapgraph::ProfileUpdate {
                username: "robert".to_string(),
                bio: "hello".to_string(),
            },
        )
        .await
        .expect("free username is accepted");
    assert_eq!(updated.username, "robert");
    assert_eq!(updated.bio, "hello");

    // The old name is released and can be claimed again.
    social
        .register(NewIdentity {
            username: "bob".to_string(),
            email: "bob2@example.com".to_string(),
            password: "bob2-password".to_string(),
        })
        .await
        .expect("released username is claimable");
}

// A registration that died between claiming its unique keys and writing the
// identity document must not pin the email or username forever.
#[tokio::test]
async fn interrupted_registration_does_not_pin_its_claims() {
    use snapgraph::keys::KeySpace;
    use snapgraph::{Backend, IdentityStore, MemoryBackend};

    let keys = KeySpace::new("sgclaim");
    let store = IdentityStore::new(keys.clone());
    let mut backend = MemoryBackend::new();
    // Claims pointing at an identity id that has no document.
    backend
        .put_if_absent(&keys.unique("identities", "email", "ana@example.com"), "77")
        .await
        .expect("seed email claim");
    backend
        .put_if_absent(&keys.unique("identities", "username", "ana"), "77")
        .await
        .expect("seed username claim");

    let identity = store
        .register(
            &mut backend,
            NewIdentity {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                password: "ana-password".to_string(),
            },
        )
        .await
        .expect("dangling claims are released");
    assert_eq!(identity.username, "ana");

    // A claim backed by a real identity still wins.
    let err = store
        .register(
            &mut backend,
            NewIdentity {
                username: "other".to_string(),
                email: "ana@example.com".to_string(),
                password: "other-password".to_string(),
            },
        )
        .await
        .expect_err("live claim still blocks");
    assert!(matches!(err, CoreError::DuplicateEmail { .. }), "got {err:?}");
}
