use email_address::EmailAddress;

/// Extension allow-list the upload collaborator applies before the core
/// stores a reference to an image file.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Minimum username length accepted at registration and on profile update.
pub const MIN_USERNAME_LENGTH: usize = 2;
/// Minimum email length accepted at registration.
pub const MIN_EMAIL_LENGTH: usize = 4;
/// Minimum raw credential length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 7;

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` if the filename carries an allowed image extension.
///
/// The core never inspects file bytes; this predicate is the contract the
/// upload collaborator enforces before handing the core a reference string.
pub fn is_allowed_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| {
            ALLOWED_IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false)
}
