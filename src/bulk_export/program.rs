//! The bulk export vertex program and its builder
//!
//! The program runs for exactly one superstep. It never sends messages, and
//! it asks the host for a new result graph that keeps edges, so the input
//! graph is never modified.

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use super::codec;
use super::config::RunConfiguration;
use super::error::ExportError;
use super::executor;
use super::EXPORT_PROPERTIES;
use crate::pregel::{
    check_program, Configuration, Memory, MessageScope, Messenger, NoMessage, Persist,
    PregelError, ResultGraph, Vertex, VertexComputeKey, VertexProgram, VERTEX_PROGRAM,
};

/// Projects halted traverser paths into rows of strings
#[derive(Debug, Clone)]
pub struct BulkExportVertexProgram {
    plan: RunConfiguration,
    /// Host settings the program was loaded from, carried on store
    configuration: Configuration,
}

impl BulkExportVertexProgram {
    /// Start building a program
    pub fn build() -> Builder {
        Builder::default()
    }

    pub fn run_configuration(&self) -> &RunConfiguration {
        &self.plan
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }
}

#[async_trait]
impl VertexProgram for BulkExportVertexProgram {
    type Message = NoMessage;
    const NAME: &'static str = "BulkExportVertexProgram";

    fn load_state(configuration: &Configuration) -> Result<Self, PregelError> {
        check_program::<Self>(configuration)?;
        let plan = codec::decode(configuration.get_or(EXPORT_PROPERTIES, ""))
            .map_err(|e| PregelError::program_load(Self::NAME, e))?;

        Ok(Self {
            plan,
            configuration: configuration.clone(),
        })
    }

    fn store_state(&self, configuration: &mut Configuration) {
        configuration.copy_from(&self.configuration);
        configuration.set(VERTEX_PROGRAM, Self::NAME);
        configuration.set(EXPORT_PROPERTIES, codec::encode(&self.plan));
    }

    async fn execute(
        &self,
        vertex: &mut Vertex,
        _messenger: &mut Messenger<'_, NoMessage>,
        memory: &Memory,
    ) -> Result<(), PregelError> {
        match executor::execute_vertex(&self.plan, vertex) {
            Ok(Some(rows)) => {
                debug!(
                    vertex_id = %vertex.id(),
                    superstep = memory.iteration(),
                    rows,
                    "Exported rows"
                );
                Ok(())
            }
            Ok(None) => {
                debug!(vertex_id = %vertex.id(), "No halted traversers");
                Ok(())
            }
            Err(e) => {
                warn!(
                    vertex_id = %vertex.id(),
                    superstep = memory.iteration(),
                    error = %e,
                    "Bulk export failed"
                );
                Err(PregelError::vertex_error_with_source(
                    vertex.id().clone(),
                    "bulk export failed",
                    e,
                ))
            }
        }
    }

    fn terminate(&self, memory: &Memory) -> bool {
        self.plan.is_empty() || !memory.is_initial_iteration()
    }

    fn message_scopes(&self, _memory: &Memory) -> HashSet<MessageScope> {
        HashSet::new()
    }

    fn vertex_compute_keys(&self) -> HashSet<VertexComputeKey> {
        codec::read_compute_keys()
    }

    fn preferred_result_graph(&self) -> ResultGraph {
        ResultGraph::New
    }

    fn preferred_persist(&self) -> Persist {
        Persist::Edges
    }
}

impl fmt::Display for BulkExportVertexProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", Self::NAME)?;
        for (i, key) in self.plan.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(key)?;
        }
        f.write_str("]")
    }
}

/// Incremental column plan builder
///
/// Columns are appended in call order; that order is the row order.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    columns: Vec<(String, String)>,
    extra: Configuration,
}

impl Builder {
    /// Export `key` in its canonical string form
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.columns.push((key.into(), String::new()));
        self
    }

    /// Export `key` through a format pattern
    pub fn key_with_format(mut self, key: impl Into<String>, format: impl Into<String>) -> Self {
        self.columns.push((key.into(), format.into()));
        self
    }

    /// Append several raw columns
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .extend(keys.into_iter().map(|key| (key.into(), String::new())));
        self
    }

    /// Carry an extra host setting alongside the plan
    pub fn configure(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.set(key, value);
        self
    }

    /// The host configuration to distribute to workers
    pub fn configuration(&self) -> Result<Configuration, ExportError> {
        let plan = RunConfiguration::new(self.columns.iter().cloned())?;
        let mut configuration = self.extra.clone();
        configuration.set(VERTEX_PROGRAM, BulkExportVertexProgram::NAME);
        configuration.set(EXPORT_PROPERTIES, codec::encode(&plan));
        Ok(configuration)
    }

    /// Validate the plan and load a program from it
    pub fn create(self) -> Result<BulkExportVertexProgram, PregelError> {
        let configuration = self
            .configuration()
            .map_err(|e| PregelError::program_load(BulkExportVertexProgram::NAME, e))?;
        BulkExportVertexProgram::load_state(&configuration)
    }
}
