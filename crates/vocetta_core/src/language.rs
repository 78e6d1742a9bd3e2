//! Script-based language detection.

use serde::{Deserialize, Serialize};

/// Language detected in the input text, reported back to the caller.
///
/// Detection tests for the presence of Arabic-block and Latin-letter code
/// points; it makes no attempt at real language identification.
///
/// # Examples
///
/// ```
/// use vocetta_core::Language;
///
/// assert_eq!(Language::detect("hello world"), Language::En);
/// assert_eq!(Language::detect("مرحبا"), Language::Ar);
/// assert_eq!(Language::detect("hello مرحبا"), Language::Mixed);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Latin letters only (or neither script present)
    #[display("en")]
    En,
    /// Arabic-block code points only
    #[display("ar")]
    Ar,
    /// Both scripts present
    #[display("mixed")]
    Mixed,
}

impl Language {
    /// Detect the language of a text by script membership.
    pub fn detect(text: &str) -> Self {
        let has_arabic = text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c));
        let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());

        match (has_arabic, has_latin) {
            (true, true) => Language::Mixed,
            (true, false) => Language::Ar,
            _ => Language::En,
        }
    }

    /// Convert to the identifier used in the `X-Language` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
            Language::Mixed => "mixed",
        }
    }
}
