//! Whole-word keyword matching
//!
//! A keyword hits only where it is not glued to a neighbouring word
//! character. Letters, digits, `_` and `-` all count as word characters,
//! so `agent` does not hit inside `multi-agent` or `agent_pool`.

use regex::Regex;

/// Compiled case-insensitive matcher for one keyword
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
    regex: Regex,
}

impl KeywordMatcher {
    /// Compile a matcher
    ///
    /// Runs of whitespace inside the keyword match any run of whitespace
    /// in the text.
    ///
    /// # Errors
    /// Returns error if the keyword is blank or the pattern fails to compile
    pub fn new(keyword: &str) -> Result<Self, regex::Error> {
        let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
        if words.is_empty() {
            return Err(regex::Error::Syntax("empty keyword".to_string()));
        }
        let pattern = format!(r"(?i)(?:^|[^\w-]){}(?:[^\w-]|$)", words.join(r"\s+"));
        Ok(Self {
            keyword: keyword.to_string(),
            regex: Regex::new(&pattern)?,
        })
    }

    /// Keyword as given
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Whether the keyword occurs as a whole word in `text`
    #[inline]
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
