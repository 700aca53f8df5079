//! Error types for the graph computer
//!
//! Errors raised by the host while loading, running and collecting a vertex
//! program. Program-specific failures are carried as boxed sources.

use super::vertex::VertexId;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while running a vertex program
#[derive(Debug, Error)]
pub enum PregelError {
    /// Maximum supersteps exceeded
    #[error("Max supersteps exceeded: {0}")]
    MaxSuperstepsExceeded(usize),

    /// Vertex execution timed out
    #[error("Vertex timeout: {0:?}")]
    VertexTimeout(VertexId),

    /// Error during vertex execution
    #[error("Vertex error in {vertex_id:?}: {message}")]
    VertexError {
        vertex_id: VertexId,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Program could not be reconstructed from its configuration
    #[error("Failed to load {program} state")]
    ProgramLoad {
        program: String,
        #[source]
        source: BoxedSource,
    },

    /// Configuration names a different vertex program
    #[error("Vertex program mismatch: expected {expected}, found {found}")]
    ProgramMismatch { expected: String, found: String },

    /// Invalid computer configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A vertex sent a message along a scope the program never declared
    #[error("Undeclared message scope from {vertex_id:?}: {scope}")]
    UndeclaredScope { vertex_id: VertexId, scope: String },

    /// Message delivery failed
    #[error("Message delivery failed: {0}")]
    MessageDeliveryError(String),

    /// Job execution timed out
    #[error("Job timeout after {0:?}")]
    JobTimeout(std::time::Duration),

    /// A worker task panicked or was cancelled
    #[error("Worker failure: {0}")]
    WorkerFailure(String),

    /// Configuration blob could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PregelError {
    /// Create a vertex error with a message
    pub fn vertex_error(vertex_id: impl Into<VertexId>, message: impl Into<String>) -> Self {
        Self::VertexError {
            vertex_id: vertex_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a vertex error with source
    pub fn vertex_error_with_source(
        vertex_id: impl Into<VertexId>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::VertexError {
            vertex_id: vertex_id.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a program load error
    pub fn program_load(
        program: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ProgramLoad {
            program: program.into(),
            source: Box::new(source),
        }
    }

    /// Create a program mismatch error
    pub fn program_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::ProgramMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a config error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if the error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, PregelError::VertexTimeout(_) | PregelError::JobTimeout(_))
    }

    /// Check if the error was raised before any vertex executed
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            PregelError::ProgramLoad { .. }
                | PregelError::ProgramMismatch { .. }
                | PregelError::ConfigError(_)
                | PregelError::Serialization(_)
        )
    }

    /// Vertex the error is attributed to, if any
    pub fn vertex_id(&self) -> Option<&VertexId> {
        match self {
            PregelError::VertexTimeout(id) => Some(id),
            PregelError::VertexError { vertex_id, .. } => Some(vertex_id),
            PregelError::UndeclaredScope { vertex_id, .. } => Some(vertex_id),
            _ => None,
        }
    }
}
