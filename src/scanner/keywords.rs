//! Ordered, word-bounded keyword sets used by the text strategies.
//!
//! Keywords are stored lower-cased and matched against lower-cased text, so a
//! caller lowers its input once and queries several sets with it. A keyword
//! only matches as a whole word: `urgente` does not match inside `insurgente`.
//!
//! Word boundaries follow Unicode word characters, which include combining
//! marks. Input is not normalized, so a decomposed `urgente\u{301}` does not
//! match `urgente`.

#![allow(missing_docs)]

use regex::Regex;

use crate::core::errors::{Result, SedError};

#[derive(Debug, Clone)]
struct KeywordPattern {
    keyword: String,
    regex: Regex,
}

/// Keywords in declaration order; iteration order is report order.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    patterns: Vec<KeywordPattern>,
}

impl KeywordSet {
    /// Compile a built-in list. Keywords are regex-escaped, so compilation
    /// cannot fail on their content.
    #[must_use]
    pub fn builtin(keywords: &[&'static str]) -> Self {
        let patterns = keywords
            .iter()
            .filter_map(|keyword| {
                let keyword = keyword.to_lowercase();
                word_bounded(&keyword)
                    .ok()
                    .map(|regex| KeywordPattern { keyword, regex })
            })
            .collect();
        Self { patterns }
    }

    /// Append user-provided keywords after the existing ones. Keywords that
    /// are already present (ignoring case) are skipped so a match is never
    /// counted twice.
    pub fn with_custom<I, S>(mut self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in extra {
            let keyword = raw.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return Err(SedError::InvalidPattern {
                    pattern: raw.as_ref().to_string(),
                    details: "keyword cannot be empty".to_string(),
                });
            }
            if self.contains(&keyword) {
                continue;
            }
            let regex = word_bounded(&keyword).map_err(|err| SedError::InvalidPattern {
                pattern: keyword.clone(),
                details: err.to_string(),
            })?;
            self.patterns.push(KeywordPattern { keyword, regex });
        }
        Ok(self)
    }

    fn contains(&self, keyword: &str) -> bool {
        self.patterns.iter().any(|p| p.keyword == keyword)
    }

    /// Keywords in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.keyword.as_str())
    }

    /// Every keyword present in `lowered`, in declaration order.
    pub fn matching<'s, 't>(
        &'s self,
        lowered: &'t str,
    ) -> impl Iterator<Item = &'s str> + use<'s, 't> {
        self.patterns
            .iter()
            .filter(move |p| p.regex.is_match(lowered))
            .map(|p| p.keyword.as_str())
    }

    /// The first keyword (in declaration order) present in `lowered`.
    #[must_use]
    pub fn first_match(&self, lowered: &str) -> Option<&str> {
        self.matching(lowered).next()
    }
}

fn word_bounded(keyword: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
}

#[cfg(test)]
mod tests {
    use super::KeywordSet;

    #[test]
    fn whole_words_only() {
        let set = KeywordSet::builtin(&["urgente", "ya"]);
        assert_eq!(set.first_match("esto es urgente"), Some("urgente"));
        assert_eq!(set.first_match("movimiento insurgente"), None);
        assert_eq!(set.first_match("yate"), None);
        assert_eq!(set.first_match("hazlo ya."), Some("ya"));
    }

    #[test]
    fn accented_and_multi_word_keywords_match() {
        let set = KeywordSet::builtin(&["acción requerida", "límite", "cancelación"]);
        let hits: Vec<&str> = set
            .matching("acción requerida antes del límite de cancelación")
            .collect();
        assert_eq!(hits, ["acción requerida", "límite", "cancelación"]);
    }

    #[test]
    fn accented_letters_are_word_characters() {
        let set = KeywordSet::builtin(&["envía"]);
        assert_eq!(set.first_match("reenvían"), None);
        assert_eq!(set.first_match("envía el código"), Some("envía"));
    }

    #[test]
    fn matches_follow_declaration_order() {
        let set = KeywordSet::builtin(&["b", "a"]);
        let hits: Vec<&str> = set.matching("a b").collect();
        assert_eq!(hits, ["b", "a"]);
    }

    #[test]
    fn custom_keywords_are_lowercased_and_deduplicated() {
        let set = KeywordSet::builtin(&["ahora"])
            .with_custom(["AHORA", "Hoy Mismo"])
            .expect("custom keywords compile");
        assert_eq!(set.keywords().collect::<Vec<_>>(), ["ahora", "hoy mismo"]);
        assert_eq!(set.first_match("pague hoy mismo"), Some("hoy mismo"));
    }

    #[test]
    fn custom_keywords_with_regex_metacharacters_are_literal() {
        let set = KeywordSet::default()
            .with_custom(["c.e.o"])
            .expect("escaped keyword compiles");
        assert_eq!(set.first_match("el c.e.o dice"), Some("c.e.o"));
        assert_eq!(set.first_match("el cxexo dice"), None);
    }

    #[test]
    fn matches_outlive_the_scanned_text() {
        let set = KeywordSet::builtin(&["ceo", "banco"]);
        let hit = {
            let lowered = "Soy el CEO".to_lowercase();
            set.first_match(&lowered)
        };
        assert_eq!(hit, Some("ceo"));
    }

    #[test]
    fn combining_marks_extend_the_word() {
        let set = KeywordSet::builtin(&["urgente"]);
        assert_eq!(set.first_match("urgente\u{301} ya"), None);
        assert_eq!(set.first_match("urgente, ya"), Some("urgente"));
    }

    #[test]
    fn blank_custom_keyword_is_rejected() {
        let err = KeywordSet::default().with_custom(["  "]).unwrap_err();
        assert_eq!(err.code(), "SED-2001");
    }
}
