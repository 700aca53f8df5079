//! Per-vertex projection of halted traversers into export rows
//!
//! Execution is a pure function of the run configuration and the vertex's
//! traversers. Rows are built in full before anything is written, so a failing
//! vertex keeps whatever it held before.

use std::collections::BTreeSet;

use super::config::RunConfiguration;
use super::error::ExportError;
use super::format::FormatPattern;
use super::EXPORT_PROPERTIES;
use crate::pregel::{PropertyValue, Vertex};
use crate::traversal::{ExportRow, Path, PathValue, TraverserSet, HALTED_TRAVERSERS};

/// Columns to emit for this vertex
///
/// A configured plan yields its keys in declared order. An empty plan yields
/// every label on any of the vertex's paths, sorted ascending.
pub fn resolve_columns<'a>(config: &'a RunConfiguration, traversers: &'a TraverserSet) -> Vec<&'a str> {
    if !config.is_empty() {
        return config.keys().collect();
    }
    let labels: BTreeSet<&'a str> = traversers
        .iter()
        .flat_map(|traverser| traverser.path().labels())
        .collect();
    labels.into_iter().collect()
}

/// Render one value: canonical form when raw, otherwise through the format
pub fn render_value(
    key: &str,
    format: Option<&FormatPattern>,
    value: &PathValue,
) -> Result<String, ExportError> {
    match format {
        None => Ok(value.to_string()),
        Some(pattern) => pattern
            .apply(value)
            .map_err(|source| ExportError::FormatMismatch {
                key: key.to_string(),
                pattern: pattern.as_str().to_string(),
                source,
            }),
    }
}

fn project(config: &RunConfiguration, columns: &[&str], path: &Path) -> Result<ExportRow, ExportError> {
    columns
        .iter()
        .map(|&key| {
            let value = path.get(key).ok_or_else(|| ExportError::MissingLabel {
                label: key.to_string(),
            })?;
            render_value(key, config.format_for(key), &value)
        })
        .collect()
}

/// One row per traverser, in traverser order
pub fn export_rows(
    config: &RunConfiguration,
    traversers: &TraverserSet,
) -> Result<Vec<ExportRow>, ExportError> {
    let columns = resolve_columns(config, traversers);
    traversers
        .iter()
        .map(|traverser| project(config, &columns, traverser.path()))
        .collect()
}

/// Export one vertex
///
/// Returns the number of rows written, or `None` when the vertex carries no
/// halted traversers.
pub fn execute_vertex(
    config: &RunConfiguration,
    vertex: &mut Vertex,
) -> Result<Option<usize>, ExportError> {
    let rows = match vertex.property(HALTED_TRAVERSERS) {
        None => return Ok(None),
        Some(PropertyValue::Traversers(traversers)) => export_rows(config, traversers)?,
        Some(other) => {
            return Err(ExportError::UnexpectedInput {
                key: HALTED_TRAVERSERS.to_string(),
                found: other.kind(),
            })
        }
    };

    let count = rows.len();
    vertex.set_property(EXPORT_PROPERTIES, rows);
    Ok(Some(count))
}
