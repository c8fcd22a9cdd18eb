//! Slug validation for identifiers used as path segments.
//!
//! The same rule set applies to agent and skill slugs:
//!
//! 1. trim surrounding whitespace,
//! 2. strip any run of leading/trailing `/` or `\`,
//! 3. reject empty results, `..`, inner separators and anything outside
//!    `[A-Za-z0-9_-]`.

use thiserror::Error;

use crate::types::Slug;

/// Why a raw slug was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,

    #[error("slug contains '..'")]
    ParentTraversal,

    #[error("slug contains a path separator")]
    PathSeparator,

    #[error("slug contains invalid character {0:?}")]
    InvalidChar(char),
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Validate and normalise `raw` into a [`Slug`].
pub fn validate_slug(raw: &str) -> Result<Slug, SlugError> {
    let stripped = raw.trim().trim_matches(is_separator);
    if stripped.is_empty() {
        return Err(SlugError::Empty);
    }
    if stripped.contains("..") {
        return Err(SlugError::ParentTraversal);
    }
    if stripped.contains(is_separator) {
        return Err(SlugError::PathSeparator);
    }
    if let Some(bad) = stripped
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(SlugError::InvalidChar(bad));
    }
    Ok(Slug(stripped.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("engineer", "engineer")]
    #[case("  engineer  ", "engineer")]
    #[case("/engineer/", "engineer")]
    #[case("\\\\engineer//", "engineer")]
    #[case("data_team-2", "data_team-2")]
    fn accepts_and_normalises(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(validate_slug(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("", SlugError::Empty)]
    #[case("   ", SlugError::Empty)]
    #[case("///", SlugError::Empty)]
    #[case("..", SlugError::ParentTraversal)]
    #[case("a..b", SlugError::ParentTraversal)]
    #[case("../etc", SlugError::ParentTraversal)]
    #[case("a/b", SlugError::PathSeparator)]
    #[case("a\\b", SlugError::PathSeparator)]
    #[case("a.b", SlugError::InvalidChar('.'))]
    #[case("a b", SlugError::InvalidChar(' '))]
    #[case("café", SlugError::InvalidChar('é'))]
    fn rejects(#[case] raw: &str, #[case] expected: SlugError) {
        assert_eq!(validate_slug(raw).unwrap_err(), expected);
    }

    #[test]
    fn clean_slug_is_a_fixed_point() {
        for s in ["a", "engineer", "QA_bot-7"] {
            let once = validate_slug(s).unwrap();
            assert_eq!(once.as_str(), s);
            assert_eq!(validate_slug(&format!("/{s}/")).unwrap(), once);
            assert_eq!(validate_slug(once.as_str()).unwrap(), once);
        }
    }
}
