//! Label annotations
//!
//! A response may embed `@label{...}` to pick the short text shown on its
//! button while the full text appears in the poll body. The annotation
//! syntax itself must never reach the end user.

use regex::Regex;
use std::sync::LazyLock;

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@label\{([^}]+)\}").unwrap());

/// Content of the first `@label{...}` annotation, if any.
pub fn extract(text: &str) -> Option<String> {
    LABEL_RE.captures(text).map(|caps| caps[1].to_string())
}

/// Replace every `@label{...}` annotation with its content, leaving the
/// surrounding text unchanged.
pub fn strip(text: &str) -> String {
    LABEL_RE.replace_all(text, "$1").into_owned()
}

/// Visible caption for a short control: the first label if present,
/// otherwise the full text.
pub fn caption(text: &str) -> String {
    extract(text).unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_returns_first_annotation_content() {
        assert_eq!(extract("@label{IPA} Beer"), Some("IPA".to_string()));
        assert_eq!(extract("go @label{home} drink @label{beer}"), Some("home".to_string()));
        assert_eq!(extract("Beer"), None);
    }

    #[test]
    fn strip_unwraps_every_annotation() {
        assert_eq!(strip("@label{IPA} Beer"), "IPA Beer");
        assert_eq!(strip("go @label{home} drink @label{beer}"), "go home drink beer");
    }

    #[test]
    fn strip_is_identity_without_annotations() {
        assert_eq!(strip("Water... Sorry"), "Water... Sorry");
        assert_eq!(strip(""), "");
    }

    #[test]
    fn caption_falls_back_to_full_text() {
        assert_eq!(caption("Milk @label{Stout}"), "Stout");
        assert_eq!(caption("Water"), "Water");
    }

    #[test]
    fn empty_braces_are_not_an_annotation() {
        assert_eq!(extract("@label{}"), None);
        assert_eq!(strip("@label{}"), "@label{}");
    }
}
