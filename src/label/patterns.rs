//! PatternLibrary - keyword pattern detection via Regex
//!
//! Detects keyword patterns in label text:
//! - Mentions: @username
//! - URLs: scheme://... or www....
//! - Phone numbers: +1 (555) 123-4567, 555.123.4567, 13800138000
//! - Street addresses: 1600 Amphitheatre Parkway
//! - Emoticon codes: [smile] (or a caller-supplied pattern)
//! - Custom regex patterns
//!
//! Built-in patterns are compiled once. Custom patterns are compiled on
//! first use and cached by pattern string.
//!
//! Match semantics are those of the `regex` crate: matches are reported
//! left to right, never overlap within one category, and alternations are
//! leftmost-first (the first alternative that matches wins, not the
//! longest). `ab|abc` on "abc" yields "ab".

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

use crate::label::category::KeywordCategory;
use crate::label::error::{LabelError, LabelResult};

// =============================================================================
// Constants
// =============================================================================

/// URL matches longer than this (in UTF-16 code units, the length a JS or
/// Cocoa host sees) are dropped, not truncated
pub const MAX_URL_LEN: usize = 1020;

/// @username (unicode word characters, `-`)
const MENTION_PATTERN: &str = r"@[\w\-]+";

/// scheme://... or www.... ; the last character may not be sentence punctuation
const URL_PATTERN: &str = r#"(?i)(?:\b(?:https?|ftp)://|\bwww\.)[^\s<>"]*[^\s<>".,;:!?'()\[\]{}]"#;

/// Optional +country, optional (area), then two digit groups
const PHONE_PATTERN: &str = r"(?:\+\d{1,3}[\s.\-]?)?(?:\(\d{2,4}\)|\d{2,4})[\s.\-]?\d{3,4}[\s.\-]?\d{3,4}\b";

/// House number, one to four capitalised words, street suffix
const ADDRESS_PATTERN: &str = r"\b\d{1,6}\s+(?:[A-Z][A-Za-z]*\.?\s+){1,4}(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl|Parkway|Pkwy|Square|Sq)\b\.?";

/// Bracketed emoticon code such as [smile] or [微笑]
pub const DEFAULT_EMOTICON_PATTERN: &str = r"\[[^\[\]\s]{1,8}\]";

// =============================================================================
// Types
// =============================================================================

/// A single keyword match
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Half-open byte range in the scanned text
    pub range: Range<usize>,
    pub category: KeywordCategory,
    pub raw_text: String,
}

// =============================================================================
// PatternLibrary
// =============================================================================

/// Keyword pattern detector
pub struct PatternLibrary {
    mention_re: Regex,
    url_re: Regex,
    phone_re: Regex,
    address_re: Regex,
    emoticon_re: Regex,
    custom: HashMap<String, Regex>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary {
    /// Create a library with all built-in patterns compiled
    pub fn new() -> Self {
        // Built-in patterns are constants covered by tests.
        let builtin = |p: &str| Regex::new(p).expect("built-in pattern compiles");
        Self {
            mention_re: builtin(MENTION_PATTERN),
            url_re: builtin(URL_PATTERN),
            phone_re: builtin(PHONE_PATTERN),
            address_re: builtin(ADDRESS_PATTERN),
            emoticon_re: builtin(DEFAULT_EMOTICON_PATTERN),
            custom: HashMap::new(),
        }
    }

    /// Number of cached custom patterns
    pub fn custom_pattern_count(&self) -> usize {
        self.custom.len()
    }

    /// Compile a custom pattern ahead of scanning.
    /// Invalid patterns are reported here rather than at scan time.
    pub fn prepare(&mut self, category: &KeywordCategory) -> LabelResult<()> {
        match category {
            KeywordCategory::Regex { pattern } => self.custom_regex(pattern).map(|_| ()),
            KeywordCategory::Emoticon(spec) => match &spec.pattern {
                Some(pattern) => self.custom_regex(pattern).map(|_| ()),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Scan `text` for matches of one category, left to right
    pub fn scan(&mut self, category: &KeywordCategory, text: &str) -> LabelResult<Vec<MatchResult>> {
        let re = match category {
            KeywordCategory::Mention => &self.mention_re,
            KeywordCategory::Url => &self.url_re,
            KeywordCategory::Phone => &self.phone_re,
            KeywordCategory::Address => &self.address_re,
            KeywordCategory::Emoticon(spec) => match &spec.pattern {
                Some(pattern) => self.custom_regex(pattern)?,
                None => &self.emoticon_re,
            },
            KeywordCategory::Regex { pattern } => self.custom_regex(pattern)?,
        };

        let is_url = matches!(category, KeywordCategory::Url);
        let matches = re
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .filter(|m| !(is_url && utf16_len(m.as_str()) > MAX_URL_LEN))
            .map(|m| MatchResult {
                range: m.range(),
                category: category.clone(),
                raw_text: m.as_str().to_string(),
            })
            .collect::<Vec<_>>();

        tracing::trace!(category = ?category, count = matches.len(), "scanned category");
        Ok(matches)
    }

    fn custom_regex(&mut self, pattern: &str) -> LabelResult<&Regex> {
        if !self.custom.contains_key(pattern) {
            let re = Regex::new(pattern).map_err(|source| LabelError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            self.custom.insert(pattern.to_string(), re);
        }
        Ok(&self.custom[pattern])
    }
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

// =============================================================================
// Tests
// =============================================================================
