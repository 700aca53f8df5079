//! Flat encoding of the column plan
//!
//! ```text
//! key₀ FS format₀ TS key₁ FS format₁ TS ...
//!
//! TS = U+0001 (tuple separator)
//! FS = U+0002 (field separator)
//! ```
//!
//! Every worker decodes the same blob, so every replica ends up with the same
//! plan.

use std::collections::HashSet;

use super::config::RunConfiguration;
use super::error::ExportError;
use super::EXPORT_PROPERTIES;
use crate::pregel::VertexComputeKey;

pub const TUPLE_SEPARATOR: char = '\u{1}';
pub const FIELD_SEPARATOR: char = '\u{2}';

/// Decode a blob into a validated plan
///
/// `""` decodes to the empty plan.
pub fn decode(blob: &str) -> Result<RunConfiguration, ExportError> {
    if blob.is_empty() {
        return Ok(RunConfiguration::empty());
    }

    let mut pairs = Vec::new();
    for (index, tuple) in blob.split(TUPLE_SEPARATOR).enumerate() {
        let mut fields = tuple.split(FIELD_SEPARATOR);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(key), Some(format), None) => pairs.push((key, format)),
            _ => {
                return Err(ExportError::MalformedTuple {
                    index,
                    tuple: tuple.to_string(),
                })
            }
        }
    }

    RunConfiguration::new(pairs)
}

/// Encode a plan; the inverse of [`decode`]
pub fn encode(config: &RunConfiguration) -> String {
    let mut blob = String::new();
    for (i, column) in config.columns().iter().enumerate() {
        if i > 0 {
            blob.push(TUPLE_SEPARATOR);
        }
        blob.push_str(column.key());
        blob.push(FIELD_SEPARATOR);
        blob.push_str(column.pattern());
    }
    blob
}

/// The single attribute the program writes
pub fn read_compute_keys() -> HashSet<VertexComputeKey> {
    HashSet::from([VertexComputeKey::new(EXPORT_PROPERTIES, false)])
}
