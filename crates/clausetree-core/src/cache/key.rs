use sha2::{Digest, Sha256};

/// Directory-safe key for one subject/language pair.
pub fn cache_key(subject_key: &str, language: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(subject_key.as_bytes());
    hasher.update(b"\n");
    hasher.update(language.as_bytes());
    hex::encode(hasher.finalize())
}

/// `sha256:<hex>` digest of stored content.
pub fn content_digest(content: &str) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(content.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_depends_on_subject_and_language() {
        let a = cache_key("John 3:16", "en");
        assert_eq!(a.len(), 64);
        assert_eq!(a, cache_key("John 3:16", "en"));
        assert_ne!(a, cache_key("John 3:16", "de"));
        assert_ne!(a, cache_key("John 3:17", "en"));
        // The separator keeps the pair unambiguous.
        assert_ne!(cache_key("ab", "c"), cache_key("a", "bc"));
    }

    #[test]
    fn digest_is_prefixed_hex() {
        let d = content_digest("{}");
        assert!(d.starts_with("sha256:"));
        assert_eq!(d.len(), "sha256:".len() + 64);
    }
}
