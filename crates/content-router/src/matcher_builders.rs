//! Matcher construction helpers and the route pattern DSL.
//!
//! [`parse`] implements the pattern language accepted by
//! [`Router::on`](crate::router::Router::on):
//!
//! | pattern | meaning |
//! |---|---|
//! | `/prefix/X` | payload starts with `X` |
//! | `/suffix/X` | payload ends with `X` |
//! | `/contains/X` | payload contains `X` |
//! | `/regex/X` | payload matches the regex `X` |
//! | anything else not starting with `/` | shorthand for a prefix match |
//!
//! A pattern starting with `/` that names none of the four forms is
//! rejected rather than silently treated as a prefix, so typos like
//! `/prefx/…` surface at registration time. Use `/prefix//cmd` to
//! prefix-match a payload that itself begins with a slash.
//!
//! The small free functions ([`prefix`], [`suffix`], [`contains`],
//! [`pattern`]) exist for call sites that want a matcher without going
//! through the DSL.

use crate::error::PatternError;
use crate::matcher::{Contains, Matcher, Pattern, Prefix, Suffix};

/// Creates a prefix matcher over `pattern`.
pub fn prefix(pattern: impl Into<Vec<u8>>) -> Prefix {
    Prefix::new(pattern)
}

/// Creates a suffix matcher over `pattern`.
pub fn suffix(pattern: impl Into<Vec<u8>>) -> Suffix {
    Suffix::new(pattern)
}

/// Creates a substring matcher over `pattern`.
pub fn contains(pattern: impl Into<Vec<u8>>) -> Contains {
    Contains::new(pattern)
}

/// Compiles `expr` into a regex matcher.
pub fn pattern(expr: &str) -> Result<Pattern, PatternError> {
    Pattern::new(expr)
}

/// Parses a route pattern into a matcher.
///
/// # Example
///
/// ```
/// use content_router::matcher_builders::parse;
///
/// assert!(parse("/suffix/.log").is_ok());
/// assert!(parse("Hello").is_ok()); // bare string: prefix match
/// assert!(parse("/prefx/typo").is_err());
/// ```
pub fn parse(pattern: &str) -> Result<Box<dyn Matcher>, PatternError> {
    if let Some(body) = pattern.strip_prefix("/prefix/") {
        Ok(Box::new(Prefix::new(body)))
    } else if let Some(body) = pattern.strip_prefix("/suffix/") {
        Ok(Box::new(Suffix::new(body)))
    } else if let Some(body) = pattern.strip_prefix("/contains/") {
        Ok(Box::new(Contains::new(body)))
    } else if let Some(body) = pattern.strip_prefix("/regex/") {
        Ok(Box::new(Pattern::new(body)?))
    } else if pattern.starts_with('/') {
        Err(PatternError::UnknownForm(pattern.to_string()))
    } else {
        Ok(Box::new(Prefix::new(pattern)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::scope::Scope;
    use content_router_core::Buffer;

    fn ctx(payload: &str) -> Context {
        Context::new(Scope::background(), Buffer::from(payload))
    }

    #[test]
    fn test_parse_prefix_form() {
        let m = parse("/prefix/EVENT:").unwrap();
        assert!(m.matches(&ctx("EVENT:login")));
        assert!(!m.matches(&ctx("login EVENT:")));
    }

    #[test]
    fn test_parse_suffix_form() {
        let m = parse("/suffix/.log").unwrap();
        assert!(m.matches(&ctx("app.log")));
        assert!(!m.matches(&ctx("app.log.gz")));
    }

    #[test]
    fn test_parse_contains_form() {
        let m = parse("/contains/warn").unwrap();
        assert!(m.matches(&ctx("level=warn msg=x")));
        assert!(!m.matches(&ctx("level=info")));
    }

    #[test]
    fn test_parse_regex_form() {
        let m = parse(r"/regex/^\d{4}-\d{2}-\d{2}").unwrap();
        assert!(m.matches(&ctx("2026-08-29 entry")));
        assert!(!m.matches(&ctx("entry 2026-08-29")));
    }

    #[test]
    fn test_bare_string_is_prefix() {
        let m = parse("Hello").unwrap();
        assert!(m.matches(&ctx("Hello, World!")));
        assert!(!m.matches(&ctx("Goodbye")));
    }

    #[test]
    fn test_unknown_form_is_rejected() {
        assert!(matches!(
            parse("/glob/*.rs"),
            Err(PatternError::UnknownForm(_))
        ));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        assert!(matches!(
            parse("/regex/(unclosed"),
            Err(PatternError::Regex(_))
        ));
    }

    #[test]
    fn test_escaping_slash_payloads() {
        let m = parse("/prefix//cmd").unwrap();
        assert!(m.matches(&ctx("/cmd start")));
    }

    #[test]
    fn test_empty_dsl_body_matches_all() {
        for pattern in ["/prefix/", "/suffix/", "/contains/", "/regex/"] {
            let m = parse(pattern).unwrap();
            assert!(m.matches(&ctx("")), "{pattern} vs empty payload");
            assert!(m.matches(&ctx("anything")), "{pattern} vs non-empty payload");
        }
    }
}
