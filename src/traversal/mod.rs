//! Traversal data attached to vertices
//!
//! Upstream traversal programs leave their halted traversers on the vertex
//! where each one stopped. This module holds the typed form of that data:
//!
//! - [`PathValue`]: a value bound to a path step
//! - [`Path`]: labeled history of a traverser
//! - [`Traverser`] / [`TraverserSet`]: what is attached to a vertex
//! - [`ExportRow`]: formatted projection of one path

pub mod value;
pub mod path;
pub mod traverser;
pub mod row;

pub use value::{render_float, EdgeRef, ElementId, PathValue, PropertyRef, VertexPropertyRef, VertexRef};
pub use path::{Path, PathStep};
pub use traverser::{Traverser, TraverserSet};
pub use row::ExportRow;

/// Vertex property under which a traversal program stores halted traversers
pub const HALTED_TRAVERSERS: &str = "traversal.halted_traversers";
