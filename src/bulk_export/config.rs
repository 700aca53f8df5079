//! Run configuration: the ordered column plan
//!
//! Column order is the output order of every row. An empty plan switches the
//! executor into label auto-discovery.

use std::collections::HashMap;

use super::codec::{FIELD_SEPARATOR, TUPLE_SEPARATOR};
use super::error::ExportError;
use super::format::FormatPattern;

/// One exported column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    key: String,
    format: Option<FormatPattern>,
}

impl ColumnSpec {
    /// Path label the column reads
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Format as written; empty means raw rendering
    pub fn pattern(&self) -> &str {
        self.format.as_ref().map_or("", FormatPattern::as_str)
    }

    pub fn format(&self) -> Option<&FormatPattern> {
        self.format.as_ref()
    }

    pub fn is_raw(&self) -> bool {
        self.format.is_none()
    }
}

/// Immutable, validated column plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfiguration {
    columns: Vec<ColumnSpec>,
    index: HashMap<String, usize>,
}

fn check_separators(field: &'static str, value: &str) -> Result<(), ExportError> {
    if value.contains(TUPLE_SEPARATOR) || value.contains(FIELD_SEPARATOR) {
        return Err(ExportError::ReservedSeparator {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

impl RunConfiguration {
    /// Build a plan from `(key, format)` pairs in column order
    pub fn new<I, K, F>(columns: I) -> Result<Self, ExportError>
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: Into<String>,
    {
        let mut config = Self::default();

        for (position, (key, pattern)) in columns.into_iter().enumerate() {
            let key: String = key.into();
            let pattern: String = pattern.into();

            if key.is_empty() {
                return Err(ExportError::EmptyKey { index: position });
            }
            check_separators("key", &key)?;
            check_separators("format", &pattern)?;
            if config.index.contains_key(&key) {
                return Err(ExportError::DuplicateKey(key));
            }

            let format = if pattern.is_empty() {
                None
            } else {
                let parsed =
                    FormatPattern::parse(&pattern).map_err(|source| ExportError::InvalidFormat {
                        key: key.clone(),
                        pattern: pattern.clone(),
                        source,
                    })?;
                Some(parsed)
            };

            config.index.insert(key.clone(), config.columns.len());
            config.columns.push(ColumnSpec { key, format });
        }

        Ok(config)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Keys in column order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnSpec::key)
    }

    pub fn get(&self, key: &str) -> Option<&ColumnSpec> {
        self.index.get(key).map(|&i| &self.columns[i])
    }

    /// Parsed format for `key`; `None` for raw or unknown columns
    pub fn format_for(&self, key: &str) -> Option<&FormatPattern> {
        self.get(key).and_then(ColumnSpec::format)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}
