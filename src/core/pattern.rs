//! Event name pattern matching
//!
//! Provides glob-style matching of event names against subscription
//! patterns: `*` matches any run of characters, `?` matches exactly one
//! character, everything else matches literally. Patterns are compiled by
//! escaping into an anchored regular expression.

use regex::Regex;

/// A compiled subscription pattern
#[derive(Debug, Clone)]
pub struct EventPattern {
    raw: String,
    regex: Option<Regex>,
}

impl EventPattern {
    /// Compile a pattern string
    ///
    /// Patterns without wildcards skip regex compilation entirely and are
    /// matched by string equality.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.contains('*') && !pattern.contains('?') {
            return Ok(Self {
                raw: pattern.to_string(),
                regex: None,
            });
        }

        let mut escaped = String::with_capacity(pattern.len() + 8);
        escaped.push('^');
        for ch in pattern.chars() {
            match ch {
                '*' => escaped.push_str(".*"),
                '?' => escaped.push('.'),
                other => escaped.push_str(&regex::escape(&other.to_string())),
            }
        }
        escaped.push('$');

        let regex = Regex::new(&escaped).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex: Some(regex),
        })
    }

    /// Check whether an event name matches this pattern
    pub fn matches(&self, event_name: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(event_name),
            None => self.raw == event_name,
        }
    }

    /// The original pattern string
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Error raised when a pattern cannot be compiled
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid event pattern '{pattern}': {cause}")]
pub struct PatternError {
    pub pattern: String,
    pub cause: String,
}
