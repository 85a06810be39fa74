//! Identity store: accounts, credential verification, profile fields.
//!
//! Email and username are unique case-insensitively; claims live in
//! `identities:unique:*` keys and are taken with the backend's atomic
//! conditional insert, so a concurrent duplicate registration loses the race
//! cleanly instead of corrupting state.

use chrono::Utc;

use crate::errors::{CoreError, ValidationError, ValidationIssue};
use crate::id::IdentityId;
use crate::keys::KeySpace;
use crate::model::{DEFAULT_BIO, Identity};
use crate::password;
use crate::store::{self, Backend};
use crate::validators::{MIN_EMAIL_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, is_valid_email};

/// Registration input. The raw credential is consumed here and replaced by a
/// one-way verifier before anything is stored.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Profile overwrite input for [`IdentityStore::update_profile`].
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub username: String,
    pub bio: String,
}

pub struct IdentityStore {
    keys: KeySpace,
}

impl IdentityStore {
    pub fn new(keys: KeySpace) -> Self {
        Self { keys }
    }

    /// Creates a new identity.
    ///
    /// Uniqueness is checked email first, then username, matching the order
    /// the original sign-up surface reported conflicts in. A username
    /// conflict rolls the email claim back so the address stays available.
    pub async fn register<B: Backend>(&self, backend: &mut B, new: NewIdentity) -> Result<Identity, CoreError> {
        validate_registration(&new)?;

        let email_norm = normalize(&new.email);
        let username_norm = normalize(&new.username);
        let id = IdentityId(backend.next_id(&self.keys.sequence(Identity::COLLECTION)).await?);

        let email_key = self.keys.unique(Identity::COLLECTION, "email", &email_norm);
        if !self.claim_unique(backend, &email_key, id).await? {
            return Err(CoreError::DuplicateEmail { email: new.email });
        }
        let username_key = self.keys.unique(Identity::COLLECTION, "username", &username_norm);
        if !self.claim_unique(backend, &username_key, id).await? {
            backend.del(&[email_key]).await?;
            return Err(CoreError::DuplicateUsername { username: new.username });
        }

        let identity = Identity {
            id,
            username: new.username,
            email: new.email,
            credential: password::hash_credential(&new.password)?,
            bio: DEFAULT_BIO.to_string(),
            profile_image: None,
            created_at: Utc::now(),
        };
        store::put_doc(backend, &self.keys.entity(Identity::COLLECTION, id), &identity).await?;
        log::debug!("registered identity {id} ({username_norm})");
        Ok(identity)
    }

    /// Verifies email + credential.
    ///
    /// Surfaces a single [`CoreError::InvalidCredentials`] for both unknown
    /// email and wrong credential, and burns a hashing round on the
    /// unknown-email path so the two failures cost roughly the same.
    pub async fn authenticate<B: Backend>(
        &self,
        backend: &mut B,
        email: &str,
        password_raw: &str,
    ) -> Result<Identity, CoreError> {
        let email_key = self.keys.unique(Identity::COLLECTION, "email", &normalize(email));
        let Some(id_raw) = backend.get(&email_key).await? else {
            password::burn_verification(password_raw);
            return Err(CoreError::InvalidCredentials);
        };
        let id = parse_identity_id(&id_raw)?;
        let Some(identity) = self.try_get(backend, id).await? else {
            password::burn_verification(password_raw);
            return Err(CoreError::InvalidCredentials);
        };
        if password::verify_credential(password_raw, &identity.credential)? {
            Ok(identity)
        } else {
            Err(CoreError::InvalidCredentials)
        }
    }

    pub async fn get<B: Backend>(&self, backend: &mut B, id: IdentityId) -> Result<Identity, CoreError> {
        self.try_get(backend, id)
            .await?
            .ok_or_else(|| CoreError::not_found("identity", id))
    }

    pub async fn try_get<B: Backend>(&self, backend: &mut B, id: IdentityId) -> Result<Option<Identity>, CoreError> {
        store::get_doc(backend, &self.keys.entity(Identity::COLLECTION, id)).await
    }

    /// Overwrites username and bio.
    ///
    /// Username uniqueness is re-validated here, consistent with
    /// registration: the new claim is taken before the old one is released,
    /// so the name can never be held by two identities at once.
    pub async fn update_profile<B: Backend>(
        &self,
        backend: &mut B,
        id: IdentityId,
        update: ProfileUpdate,
    ) -> Result<Identity, CoreError> {
        if update.username.len() < MIN_USERNAME_LENGTH {
            return Err(ValidationError::single(
                "username",
                "validation.length",
                format!("username must be at least {MIN_USERNAME_LENGTH} characters"),
            )
            .into());
        }

        let mut identity = self.get(backend, id).await?;
        let old_norm = normalize(&identity.username);
        let new_norm = normalize(&update.username);
        if new_norm != old_norm {
            let new_key = self.keys.unique(Identity::COLLECTION, "username", &new_norm);
            if !self.claim_unique(backend, &new_key, id).await? {
                return Err(CoreError::DuplicateUsername {
                    username: update.username,
                });
            }
            backend
                .del(&[self.keys.unique(Identity::COLLECTION, "username", &old_norm)])
                .await?;
        }

        identity.username = update.username;
        identity.bio = update.bio;
        store::put_doc(backend, &self.keys.entity(Identity::COLLECTION, id), &identity).await?;
        Ok(identity)
    }

    /// Overwrites the profile image reference. The core stores only the
    /// reference string; file persistence belongs to the upload collaborator
    /// (see [`crate::validators::is_allowed_image`]).
    pub async fn set_profile_image<B: Backend>(
        &self,
        backend: &mut B,
        id: IdentityId,
        image_ref: &str,
    ) -> Result<Identity, CoreError> {
        if image_ref.is_empty() {
            return Err(ValidationError::single(
                "image_ref",
                "validation.required",
                "image reference must not be empty",
            )
            .into());
        }
        let mut identity = self.get(backend, id).await?;
        identity.profile_image = Some(image_ref.to_string());
        store::put_doc(backend, &self.keys.entity(Identity::COLLECTION, id), &identity).await?;
        Ok(identity)
    }

    /// Takes a unique claim on behalf of `id`.
    ///
    /// A lost claim whose holder has no identity document is a leftover from
    /// an interrupted registration; it is released and retaken so the value
    /// does not stay pinned forever.
    async fn claim_unique<B: Backend>(&self, backend: &mut B, key: &str, id: IdentityId) -> Result<bool, CoreError> {
        if backend.put_if_absent(key, &id.to_string()).await? {
            return Ok(true);
        }
        let Some(holder_raw) = backend.get(key).await? else {
            // Claim released in between (concurrent deletion); retake.
            return backend.put_if_absent(key, &id.to_string()).await;
        };
        let holder = parse_identity_id(&holder_raw)?;
        if self.try_get(backend, holder).await?.is_some() {
            return Ok(false);
        }
        backend.del(&[key.to_string()]).await?;
        backend.put_if_absent(key, &id.to_string()).await
    }

    /// Removes the identity document and its unique claims.
    ///
    /// Cascades over dependent entities are orchestrated by
    /// [`crate::social::Social::delete_identity`]; this only clears what the
    /// identity store itself owns.
    pub(crate) async fn remove_record<B: Backend>(&self, backend: &mut B, identity: &Identity) -> Result<(), CoreError> {
        backend
            .del(&[
                self.keys.entity(Identity::COLLECTION, identity.id),
                self.keys
                    .unique(Identity::COLLECTION, "email", &normalize(&identity.email)),
                self.keys
                    .unique(Identity::COLLECTION, "username", &normalize(&identity.username)),
            ])
            .await?;
        log::debug!("removed identity {}", identity.id);
        Ok(())
    }
}

/// Case-insensitive normal form used for unique claims.
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn parse_identity_id(raw: &str) -> Result<IdentityId, CoreError> {
    raw.parse::<IdentityId>()
        .map_err(|_| CoreError::other(format!("corrupt identity id reference: {raw}")))
}

fn validate_registration(new: &NewIdentity) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    if new.username.len() < MIN_USERNAME_LENGTH {
        issues.push(ValidationIssue::new(
            "username",
            "validation.length",
            format!("username must be at least {MIN_USERNAME_LENGTH} characters"),
        ));
    }
    if new.email.len() < MIN_EMAIL_LENGTH || !is_valid_email(&new.email) {
        issues.push(ValidationIssue::new(
            "email",
            "validation.email",
            "value must be a valid email address",
        ));
    }
    if new.password.len() < MIN_PASSWORD_LENGTH {
        issues.push(ValidationIssue::new(
            "password",
            "validation.length",
            format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    if issues.is_empty() { Ok(()) } else { Err(ValidationError::new(issues)) }
}
