// Profile id validation - ids ride inside tag payloads and shareable URLs

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PROFILE_ID_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]{0,63}$").unwrap();
}

/// Check that an id is URL- and tag-safe before it reaches the database
pub fn validate_profile_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("Profile id must not be empty".to_string());
    }
    if !PROFILE_ID_REGEX.is_match(id) {
        return Err(format!(
            "Profile id '{}' may only contain letters, numbers, hyphens and underscores (max 64 characters)",
            id
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tag_style_ids() {
        assert!(validate_profile_id("042").is_ok());
        assert!(validate_profile_id("demo001").is_ok());
        assert!(validate_profile_id("ghost-id").is_ok());
        assert!(validate_profile_id("a_B-9").is_ok());
    }

    #[test]
    fn rejects_unsafe_ids() {
        assert!(validate_profile_id("").is_err());
        assert!(validate_profile_id("-leading-dash").is_err());
        assert!(validate_profile_id("has space").is_err());
        assert!(validate_profile_id("path/../traversal").is_err());
        assert!(validate_profile_id(&"x".repeat(65)).is_err());
    }
}
