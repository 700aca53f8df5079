//! The vertex program contract
//!
//! A vertex program is loaded once per worker from an identical
//! [`Configuration`], executed once per vertex per superstep, and asked by the
//! computer whether the job should stop.
//!
//! # Lifecycle
//!
//! ```text
//! store_state ──► Configuration ──► (serialized to every worker)
//!                                         │
//!                      load_state ◄───────┘   one replica per worker
//!                          │
//!                        setup
//!                          │
//!     ┌──► terminate? ──no──► execute(vertex) for every vertex ──┐
//!     └──────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::error::PregelError;
use super::memory::Memory;
use super::message::{MessageScope, Messenger, VertexMessage};
use super::vertex::Vertex;

/// Configuration key naming the program a configuration belongs to
pub const VERTEX_PROGRAM: &str = "vertex_program";

/// Flat string settings distributed to every worker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Set a value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style `set`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `other` into this configuration
    pub fn copy_from(&mut self, other: &Configuration) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Serialize to the blob handed to workers
    pub fn to_json(&self) -> Result<String, PregelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from a worker blob
    pub fn from_json(blob: &str) -> Result<Self, PregelError> {
        Ok(serde_json::from_str(blob)?)
    }
}

/// A vertex property a program writes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexComputeKey {
    key: String,
    transient: bool,
}

impl VertexComputeKey {
    /// Declare a compute key
    ///
    /// Transient keys exist only while the job runs and are stripped from the
    /// result graph.
    pub fn new(key: impl Into<String>, transient: bool) -> Self {
        Self {
            key: key.into(),
            transient,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_transient(&self) -> bool {
        self.transient
    }
}

/// Which graph the job's results land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultGraph {
    /// Results are written back into the submitted graph
    Original,
    /// Results go to a new graph; the submitted graph is left untouched
    New,
}

/// How much of the graph the result keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persist {
    /// Nothing: the result graph is empty
    Nothing,
    /// Vertices and their properties, no edges
    VertexProperties,
    /// Vertices, properties and edges
    Edges,
}

/// The core trait every vertex program implements
///
/// Implementations must be safe to replicate: two replicas loaded from the
/// same configuration behave identically, and `execute` only touches the
/// vertex it is given.
#[async_trait]
pub trait VertexProgram: Send + Sync + Sized + 'static {
    /// Message type exchanged between vertices
    type Message: VertexMessage;

    /// Name recorded under [`VERTEX_PROGRAM`]
    const NAME: &'static str;

    /// Build a replica from a distributed configuration
    fn load_state(configuration: &Configuration) -> Result<Self, PregelError>;

    /// Write everything needed to rebuild this program into `configuration`
    fn store_state(&self, configuration: &mut Configuration) {
        configuration.set(VERTEX_PROGRAM, Self::NAME);
    }

    /// Called once before the first superstep
    fn setup(&self, _memory: &Memory) {}

    /// Execute for one vertex in the current superstep
    async fn execute(
        &self,
        vertex: &mut Vertex,
        messenger: &mut Messenger<'_, Self::Message>,
        memory: &Memory,
    ) -> Result<(), PregelError>;

    /// Whether the job should stop
    fn terminate(&self, memory: &Memory) -> bool;

    /// Scopes messages may travel along in the current superstep
    fn message_scopes(&self, memory: &Memory) -> HashSet<MessageScope>;

    /// Properties this program writes
    fn vertex_compute_keys(&self) -> HashSet<VertexComputeKey>;

    fn preferred_result_graph(&self) -> ResultGraph {
        ResultGraph::Original
    }

    fn preferred_persist(&self) -> Persist {
        Persist::VertexProperties
    }
}

/// Verify that `configuration` belongs to `P`, if it names a program at all
pub fn check_program<P: VertexProgram>(configuration: &Configuration) -> Result<(), PregelError> {
    match configuration.get(VERTEX_PROGRAM) {
        Some(found) if found != P::NAME => Err(PregelError::program_mismatch(P::NAME, found)),
        _ => Ok(()),
    }
}
