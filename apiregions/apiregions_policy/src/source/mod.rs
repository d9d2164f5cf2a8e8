//! Property sources.
//!
//! A property source turns a logical configuration file name into a list
//! of `key=value1,value2,...` entries. This module defines the source
//! trait, the line-oriented document parser shared by base files and
//! overlays, and the location-based and embedded implementations.

mod embedded;
mod location;

pub use embedded::EmbeddedResources;
pub use location::LocationPropertySource;

use apiregions_core::error::{ConfigError, Result};
use tracing::warn;

/// One parsed `key=value1,value2,...` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// The unescaped, trimmed key.
    pub key: String,

    /// The unescaped, trimmed, non-empty values in document order.
    pub values: Vec<String>,

    /// The 1-based line the entry started on.
    pub line: usize,
}

/// Trait for configuration file sources.
///
/// A property source is responsible for locating and reading the base
/// configuration files.
pub trait PropertySource: Send + Sync {
    /// Read a logical file if it is available.
    ///
    /// # Arguments
    ///
    /// * `file_name` - The logical file name, e.g. `regions.properties`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(entries))` - The parsed entries of the file.
    /// * `Ok(None)` - If the source has no such file.
    /// * `Err` - If the file has a location but could not be read.
    fn read_if_present(&self, file_name: &str) -> Result<Option<Vec<PropertyEntry>>>;

    /// The location a logical file is read from, if any.
    fn location(&self, file_name: &str) -> Option<String>;
}

/// Parse a properties document.
///
/// Blank lines and lines starting with `#` or `!` are ignored, a trailing
/// backslash continues the entry on the next line, and malformed entries
/// are logged and skipped.
///
/// # Arguments
///
/// * `source_name` - Name of the document, used in log messages.
/// * `text` - The document contents.
///
/// # Returns
///
/// The well-formed entries in document order.
pub fn parse_properties(source_name: &str, text: &str) -> Vec<PropertyEntry> {
    let mut entries = Vec::new();
    let mut logical = String::new();
    let mut start_line = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_start();

        if logical.is_empty() {
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            start_line = index + 1;
        }

        if ends_with_continuation(line) {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }

        logical.push_str(line);
        collect_entry(source_name, start_line, &logical, &mut entries);
        logical.clear();
    }

    if !logical.is_empty() {
        collect_entry(source_name, start_line, &logical, &mut entries);
    }

    entries
}

fn collect_entry(source_name: &str, line: usize, text: &str, entries: &mut Vec<PropertyEntry>) {
    match parse_entry(source_name, line, text) {
        Ok(entry) => entries.push(entry),
        Err(e) => warn!(source = source_name, line, "Skipping entry: {}", e),
    }
}

/// Parse a single `key=value1,value2,...` entry.
///
/// # Returns
///
/// * `Ok(PropertyEntry)` - The parsed entry.
/// * `Err(ConfigError::MalformedEntry)` - If there is no unescaped `=` or
///   the key is empty.
pub fn parse_entry(
    source_name: &str,
    line: usize,
    text: &str,
) -> std::result::Result<PropertyEntry, ConfigError> {
    let malformed = |reason: &str| ConfigError::MalformedEntry {
        source_name: source_name.to_string(),
        line,
        reason: reason.to_string(),
    };

    let split = find_unescaped(text, '=').ok_or_else(|| malformed("missing '='"))?;
    let key = unescape(text[..split].trim());
    if key.is_empty() {
        return Err(malformed("empty key"));
    }

    let values = split_unescaped(&text[split + 1..], ',')
        .into_iter()
        .map(|token| unescape(token.trim()))
        .filter(|value| !value.is_empty())
        .collect();

    Ok(PropertyEntry { key, values, line })
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn find_unescaped(text: &str, needle: char) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == needle {
            return Some(index);
        }
    }
    None
}

fn split_unescaped(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(index) = find_unescaped(rest, separator) {
        parts.push(&rest[..index]);
        rest = &rest[index + separator.len_utf8()..];
    }
    parts.push(rest);
    parts
}

fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some(other) => result.push(other),
            None => {}
        }
    }
    result
}
