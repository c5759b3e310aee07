//! Index of the entries a target file already contains.

use std::{
    collections::HashMap,
    io::{self, BufRead},
    path::Path,
};

use crate::{
    error::Result,
    line::{ENTRY_OPEN, entry_key},
    traits::FromLines,
};

/// Maps each entry key of a target file to its full trimmed line.
///
/// Built in a single pass; when a key occurs more than once the last line
/// wins and the key is remembered in [`ExistingEntryIndex::duplicates`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingEntryIndex {
    entries: HashMap<String, String>,
    duplicates: Vec<String>,
}

impl ExistingEntryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `line` under `key`, replacing any earlier line for the same key.
    pub fn insert(&mut self, key: impl Into<String>, line: impl Into<String>) {
        let key = key.into();
        if self.entries.insert(key.clone(), line.into()).is_some() {
            tracing::warn!(key = %key, "duplicate entry key, keeping the last occurrence");
            if !self.duplicates.contains(&key) {
                self.duplicates.push(key);
            }
        }
    }

    /// Returns the existing line for `key`, if the target has one.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that appeared more than once, in order of their first repetition.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

impl FromLines for ExistingEntryIndex {
    fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut index = ExistingEntryIndex::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.starts_with(ENTRY_OPEN) {
                continue;
            }
            match entry_key(trimmed) {
                Some(key) => index.insert(key, trimmed),
                None => tracing::debug!(line = trimmed, "entry line without a quoted key"),
            }
        }
        Ok(index)
    }
}

/// Builds the index of existing entries for the target file at `path`.
pub fn build_index<P: AsRef<Path>>(path: P) -> Result<ExistingEntryIndex> {
    ExistingEntryIndex::read_from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_keeps_full_trimmed_line() {
        let xml = r#"<resources>
    <string name="app_name">我的应用</string>
    <string name="title" translatable="false">Titre</string>
</resources>
"#;
        let index = ExistingEntryIndex::from_text(xml).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get("app_name"),
            Some(r#"<string name="app_name">我的应用</string>"#)
        );
        assert_eq!(
            index.get("title"),
            Some(r#"<string name="title" translatable="false">Titre</string>"#)
        );
        assert!(index.duplicates().is_empty());
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let xml = r#"<resources>
    <string name="dup">first</string>
    <string name="dup">second</string>
    <string name="dup">third</string>
</resources>
"#;
        let index = ExistingEntryIndex::from_text(xml).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("dup"), Some(r#"<string name="dup">third</string>"#));
        assert_eq!(index.duplicates(), ["dup".to_string()]);
    }

    #[test]
    fn test_lines_without_key_are_skipped() {
        let xml = "<resources>\n<string>anonymous</string>\n<!-- <string name=\"c\">x</string> -->\n</resources>\n";
        let index = ExistingEntryIndex::from_text(xml).unwrap();
        assert!(index.is_empty());
        assert!(!index.contains_key("c"));
    }

    #[test]
    fn test_build_index_missing_file() {
        assert!(build_index("/nonexistent/values-fr/strings.xml").is_err());
    }
}
