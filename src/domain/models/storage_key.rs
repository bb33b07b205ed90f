//! Storage key layout: `uploads/<ownerId>/<randomId>[.<ext>]` for files and
//! `avatars/<ownerId>/<timestampMs>[.<ext>]` for profile pictures.
//!
//! The owner segment is the only thing that ties an object to a user, so
//! every read or delete is gated on [`is_owned_by`] or [`is_avatar_owned_by`].

use uuid::Uuid;

pub const UPLOADS_ROOT: &str = "uploads";
pub const AVATARS_ROOT: &str = "avatars";

pub fn owner_prefix(owner_id: &str) -> String {
    format!("{}/{}/", UPLOADS_ROOT, owner_id)
}

/// True iff `key` starts with `uploads/<owner_id>/`.
pub fn is_owned_by(key: &str, owner_id: &str) -> bool {
    key.starts_with(&owner_prefix(owner_id))
}

pub fn avatar_prefix(owner_id: &str) -> String {
    format!("{}/{}/", AVATARS_ROOT, owner_id)
}

pub fn is_avatar_owned_by(key: &str, owner_id: &str) -> bool {
    key.starts_with(&avatar_prefix(owner_id))
}

/// Extension taken from the last `.` of the client filename, ASCII
/// alphanumerics only.
pub fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext: String = ext.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

pub fn generate(owner_id: &str, filename: &str) -> String {
    let random_id = Uuid::new_v4();
    match extension(filename) {
        Some(ext) => format!("{}{}.{}", owner_prefix(owner_id), random_id, ext),
        None => format!("{}{}", owner_prefix(owner_id), random_id),
    }
}

pub fn generate_avatar(owner_id: &str, filename: &str, timestamp_ms: i64) -> String {
    match extension(filename) {
        Some(ext) => format!("{}{}.{}", avatar_prefix(owner_id), timestamp_ms, ext),
        None => format!("{}{}", avatar_prefix(owner_id), timestamp_ms),
    }
}

/// Key of the avatar an avatar URL points at: everything after its last
/// `/avatars/` segment, without query or fragment.
pub fn avatar_key_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.rsplit_once(&format!("/{}/", AVATARS_ROOT))?;
    let path = rest.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() || path.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(format!("{}/{}", AVATARS_ROOT, path))
}
