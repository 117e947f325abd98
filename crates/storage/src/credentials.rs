//! Password digests for the login equality check.
//!
//! Not real authentication: a login only has to reproduce the digest
//! stored on first use.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the password, salted with the username so equal
/// passwords on different accounts do not share a digest.
pub fn password_digest(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"vitaltrack:");
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Short stable hex tag for a username, used to keep file names unique
/// after sanitizing.
pub(crate) fn username_tag(username: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(username.as_bytes()));
    digest[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let a = password_digest("alice", "hunter2");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, password_digest("alice", "hunter2"));
    }

    #[test]
    fn digest_is_salted_by_username() {
        assert_ne!(password_digest("alice", "pw"), password_digest("bob", "pw"));
    }

    #[test]
    fn tag_distinguishes_case() {
        assert_ne!(username_tag("Bob"), username_tag("bob"));
        assert_eq!(username_tag("bob").len(), 8);
    }
}
