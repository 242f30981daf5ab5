//! Placeholder substitution
//!
//! Replaces `{token}` placeholders in file contents and path segments.
//! All placeholder spans are located in one pass over the original text
//! and substituted together, so a substituted value is never scanned again.
//! Placeholders with no entry in the token table are left as they are.

use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Result, ScaffoldError};
use crate::tokens::TokenSet;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{[+-]?[A-Za-z][A-Za-z0-9_-]*\}").expect("placeholder pattern is valid")
    })
}

/// Rewrite raw bytes. Only ASCII placeholder spans are touched, so bytes
/// outside them (including invalid UTF-8) pass through unchanged.
pub fn rewrite<'a>(content: &'a [u8], tokens: &TokenSet) -> Cow<'a, [u8]> {
    placeholder_pattern().replace_all(content, |caps: &Captures| {
        let span = &caps[0];
        std::str::from_utf8(span)
            .ok()
            .and_then(|key| tokens.get(key))
            .map(|value| value.as_bytes().to_vec())
            .unwrap_or_else(|| span.to_vec())
    })
}

/// Rewrite a string, e.g. a single path segment
pub fn rewrite_str(content: &str, tokens: &TokenSet) -> String {
    match rewrite(content.as_bytes(), tokens) {
        Cow::Borrowed(_) => content.to_string(),
        Cow::Owned(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Find every distinct placeholder used in `content`
pub fn find_placeholders(content: &[u8]) -> Vec<String> {
    let mut found: Vec<String> = placeholder_pattern()
        .find_iter(content)
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .collect();

    found.sort();
    found.dedup();
    found
}

/// Check if a file is likely binary (should not have placeholder substitution)
pub fn is_binary_file(content: &[u8]) -> bool {
    // Check for null bytes in first 8KB
    let check_len = content.len().min(8192);
    content[..check_len].contains(&0)
}

/// Rewrite a file in place. Returns whether the content changed.
pub fn rewrite_file(path: &Path, tokens: &TokenSet) -> Result<bool> {
    let content = fs::read(path).map_err(|e| ScaffoldError::io(path, e))?;

    if is_binary_file(&content) {
        return Ok(false);
    }

    match rewrite(&content, tokens) {
        Cow::Borrowed(_) => Ok(false),
        Cow::Owned(rewritten) => {
            fs::write(path, rewritten).map_err(|e| ScaffoldError::io(path, e))?;
            Ok(true)
        }
    }
}
