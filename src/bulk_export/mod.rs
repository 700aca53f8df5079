//! Bulk export of traversal results
//!
//! After a traversal halts, each vertex holds the traversers that stopped
//! there. The bulk export program turns every traverser's labeled path into an
//! [`ExportRow`](crate::traversal::ExportRow) and stores the rows on the vertex
//! under [`EXPORT_PROPERTIES`] for a downstream writer.
//!
//! ```text
//! Builder ──encode──► Configuration ──decode──► RunConfiguration (per worker)
//!                                                     │
//!   vertex[traversal.halted_traversers] ──► executor ─┴─► vertex[bulk_export.properties]
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod format;
pub mod program;

/// Vertex property the rows are written to; also the configuration key of
/// the encoded column plan
pub const EXPORT_PROPERTIES: &str = "bulk_export.properties";

pub use codec::{decode, encode, read_compute_keys, FIELD_SEPARATOR, TUPLE_SEPARATOR};
pub use config::{ColumnSpec, RunConfiguration};
pub use error::ExportError;
pub use executor::{execute_vertex, export_rows, render_value, resolve_columns};
pub use format::{FormatError, FormatPattern};
pub use program::{BulkExportVertexProgram, Builder};
