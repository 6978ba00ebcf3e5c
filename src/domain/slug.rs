//! Slug derivation and validation shared by the resource business keys

use thiserror::Error;

/// Validation errors for slugs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("slug cannot be empty")]
    Empty,
    #[error("slug cannot exceed {max} characters")]
    TooLong { max: usize },
    #[error("slug may only contain lowercase letters, digits and hyphens")]
    InvalidCharacters,
    #[error("slug cannot start or end with a hyphen")]
    HyphenAtEdge,
}

const MAX_SLUG_LENGTH: usize = 100;

/// Validate a slug string
pub fn validate_slug(slug: &str) -> Result<(), SlugError> {
    if slug.is_empty() {
        return Err(SlugError::Empty);
    }

    if slug.len() > MAX_SLUG_LENGTH {
        return Err(SlugError::TooLong {
            max: MAX_SLUG_LENGTH,
        });
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SlugError::InvalidCharacters);
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(SlugError::HyphenAtEdge);
    }

    Ok(())
}

/// Derive a slug from a display name.
///
/// Lowercases, maps whitespace runs to single hyphens and drops anything
/// that is not URL-safe. `"My Crazy Team!!"` becomes `"my-crazy-team"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
        } else if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug_ok() {
        assert!(validate_slug("my-team").is_ok());
        assert!(validate_slug("team-123").is_ok());
        assert!(validate_slug("x").is_ok());
    }

    #[test]
    fn test_validate_slug_rejects_bad_shapes() {
        assert_eq!(validate_slug(""), Err(SlugError::Empty));
        assert_eq!(validate_slug("My-Team"), Err(SlugError::InvalidCharacters));
        assert_eq!(validate_slug("my team"), Err(SlugError::InvalidCharacters));
        assert_eq!(validate_slug("-team"), Err(SlugError::HyphenAtEdge));
        assert_eq!(validate_slug("team-"), Err(SlugError::HyphenAtEdge));
    }

    #[test]
    fn test_validate_slug_length() {
        let long = "a".repeat(101);
        assert_eq!(validate_slug(&long), Err(SlugError::TooLong { max: 100 }));
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("My Crazy Team"), "my-crazy-team");
        assert_eq!(slugify("Hack 24"), "hack-24");
    }

    #[test]
    fn test_slugify_strips_unsafe_characters() {
        assert_eq!(slugify("Rust & Friends!"), "rust-friends");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_is_valid() {
        for name in ["Team Jetpack", "The 3 Amigos", "under_scored"] {
            assert!(validate_slug(&slugify(name)).is_ok(), "{name}");
        }
    }
}
