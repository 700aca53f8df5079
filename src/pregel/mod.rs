//! Pregel-style host contract for vertex programs
//!
//! This module defines the seams a bulk-synchronous-parallel graph computer
//! exposes to the programs it runs, plus a local computer that implements
//! them in-process.
//!
//! - **Vertex program**: per-vertex computation plus global decisions
//! - **Superstep**: one synchronized round of parallel vertex execution
//! - **Memory**: job-wide state, read-only during a superstep
//! - **Message scope**: where a vertex may send messages
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    LocalComputer                           │
//! │  Configuration ──► worker 0 replica   worker 1 replica ... │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐                     │
//! │  │Superstep│→ │Superstep│→ │Superstep│→ ...                │
//! │  │    0    │  │    1    │  │    2    │                     │
//! │  └─────────┘  └─────────┘  └─────────┘                     │
//! │       │            │            │                          │
//! │       ▼            ▼            ▼                          │
//! │  ┌────────────────────────────────────────────────────┐    │
//! │  │ Per-Superstep: Terminate? → Execute → Route        │    │
//! │  └────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod vertex;
pub mod message;
pub mod memory;
pub mod config;
pub mod error;
pub mod program;
pub mod runtime;

// Re-exports
pub use vertex::{Edge, Graph, PropertyValue, Vertex, VertexId};
pub use message::{MessageScope, Messenger, NoMessage, VertexMessage};
pub use memory::Memory;
pub use config::ComputerConfig;
pub use error::PregelError;
pub use program::{
    check_program, Configuration, Persist, ResultGraph, VertexComputeKey, VertexProgram,
    VERTEX_PROGRAM,
};
pub use runtime::{ComputerResult, LocalComputer};
