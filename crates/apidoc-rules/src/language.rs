//! # Language Predicate
//!
//! Titles and descriptions must be written in the project's documentation
//! language. The check is a trait object so the engine does not depend on
//! any particular detection library.

/// Decides whether a piece of documentation text is in the expected
/// language. Implementations must be pure and cheap; the engine calls them
/// once per title and description.
pub trait LanguagePredicate: Send + Sync {
    fn is_compliant(&self, text: &str) -> bool;

    /// Short name used in violation messages.
    fn language_name(&self) -> &'static str;
}

/// Accepts text containing at least one CJK unified ideograph.
///
/// Mixed text such as `获取 OAuth token` passes; pure ASCII such as
/// `Get user info` does not.
#[derive(Debug, Clone, Copy, Default)]
pub struct CjkLanguage;

impl CjkLanguage {
    fn is_cjk(c: char) -> bool {
        matches!(c,
            '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
            | '\u{3400}'..='\u{4DBF}'   // Extension A
            | '\u{20000}'..='\u{2A6DF}' // Extension B
            | '\u{F900}'..='\u{FAFF}'   // Compatibility Ideographs
        )
    }
}

impl LanguagePredicate for CjkLanguage {
    fn is_compliant(&self, text: &str) -> bool {
        text.chars().any(Self::is_cjk)
    }

    fn language_name(&self) -> &'static str {
        "Chinese"
    }
}

/// Accepts everything. Used when a project documents in any language.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyLanguage;

impl LanguagePredicate for AnyLanguage {
    fn is_compliant(&self, _text: &str) -> bool {
        true
    }

    fn language_name(&self) -> &'static str {
        "any"
    }
}
