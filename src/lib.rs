//! bulk-export: turn halted traversal paths into exportable rows
//!
//! A vertex program for Pregel-style graph computers. After a traversal has
//! halted, every vertex carries the traversers that stopped on it. The
//! [`BulkExportVertexProgram`] projects chosen labels from each traverser's
//! path into a row of strings and writes the rows back onto the vertex.
//!
//! - `traversal`: typed paths, traversers and rows
//! - `pregel`: the host contract plus an in-process [`LocalComputer`]
//! - `bulk_export`: the column plan, its wire codec, the executor and the
//!   program itself
//!
//! # Example
//!
//! ```rust,ignore
//! use bulk_export::{BulkExportVertexProgram, LocalComputer};
//!
//! let program = BulkExportVertexProgram::build()
//!     .key("name")
//!     .key_with_format("age", "Age: %s")
//!     .create()?;
//!
//! let result = LocalComputer::new().submit_program(&mut graph, &program).await?;
//! // result.graph holds `bulk_export.properties` on every exported vertex
//! ```

pub mod traversal;
pub mod pregel;
pub mod bulk_export;

// Re-exports for convenience
pub use traversal::{
    ElementId, EdgeRef, ExportRow, Path, PathStep, PathValue, PropertyRef, Traverser,
    TraverserSet, VertexPropertyRef, VertexRef, HALTED_TRAVERSERS,
};
pub use pregel::{
    ComputerConfig, ComputerResult, Configuration, Edge, Graph, LocalComputer, Memory, Persist,
    PregelError, PropertyValue, ResultGraph, Vertex, VertexId, VertexProgram,
};
pub use bulk_export::{
    BulkExportVertexProgram, Builder, ColumnSpec, ExportError, FormatError, FormatPattern,
    RunConfiguration, EXPORT_PROPERTIES,
};
