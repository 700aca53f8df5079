//! Message passing between vertex invocations
//!
//! Messages sent during superstep `n` are delivered at the start of superstep
//! `n + 1`, and only along the scopes the program declared for superstep `n`.

use std::fmt;

use super::vertex::VertexId;

/// Trait bound for vertex messages
pub trait VertexMessage: Clone + Send + Sync + 'static {}

/// Message type of programs that never communicate
///
/// Uninhabited: a `Messenger<NoMessage>` can receive nothing and send nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMessage {}

impl VertexMessage for NoMessage {}

/// Where messages sent by a vertex may travel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageScope {
    /// Along the sender's outgoing edges, optionally only those with this label
    Local { edge_label: Option<String> },
    /// To explicitly named vertices
    Global { targets: Vec<VertexId> },
}

impl MessageScope {
    /// Local scope over all outgoing edges
    pub fn local() -> Self {
        Self::Local { edge_label: None }
    }

    /// Local scope over outgoing edges with the given label
    pub fn local_with_label(label: impl Into<String>) -> Self {
        Self::Local {
            edge_label: Some(label.into()),
        }
    }

    /// Global scope to the given vertices
    pub fn global(targets: impl IntoIterator<Item = impl Into<VertexId>>) -> Self {
        Self::Global {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for MessageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageScope::Local { edge_label: None } => f.write_str("local"),
            MessageScope::Local {
                edge_label: Some(label),
            } => write!(f, "local[{}]", label),
            MessageScope::Global { targets } => write!(f, "global[{} targets]", targets.len()),
        }
    }
}

/// Per-invocation mailbox handed to a vertex program
///
/// Provides access to:
/// - Messages delivered to this vertex for the current superstep
/// - Outbox for messages to deliver next superstep
pub struct Messenger<'a, M: VertexMessage> {
    vertex_id: VertexId,
    messages: &'a [M],
    outbox: Vec<(MessageScope, M)>,
}

impl<'a, M: VertexMessage> Messenger<'a, M> {
    /// Create a new messenger
    pub fn new(vertex_id: VertexId, messages: &'a [M]) -> Self {
        Self {
            vertex_id,
            messages,
            outbox: Vec::new(),
        }
    }

    /// Get the current vertex ID
    pub fn id(&self) -> &VertexId {
        &self.vertex_id
    }

    /// Messages received for this superstep
    pub fn receive(&self) -> &'a [M] {
        self.messages
    }

    /// Queue a message for delivery along `scope`
    pub fn send(&mut self, scope: MessageScope, message: M) {
        self.outbox.push((scope, message));
    }

    /// Check if any messages were received
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Consume the messenger and return the outbox
    pub fn into_outbox(self) -> Vec<(MessageScope, M)> {
        self.outbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);

    impl VertexMessage for Ping {}

    #[test]
    fn test_messenger_send_and_receive() {
        let inbox = vec![Ping(1), Ping(2)];
        let mut messenger = Messenger::new(VertexId::new("v1"), &inbox);

        assert!(messenger.has_messages());
        assert_eq!(messenger.receive().len(), 2);
        assert_eq!(messenger.id(), &VertexId::new("v1"));

        messenger.send(MessageScope::local(), Ping(3));
        messenger.send(MessageScope::global(["v2"]), Ping(4));

        let outbox = messenger.into_outbox();
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox[0], (MessageScope::local(), Ping(3)));
    }

    #[test]
    fn test_empty_messenger() {
        let messenger = Messenger::<NoMessage>::new(VertexId::new("v1"), &[]);
        assert!(!messenger.has_messages());
        assert!(messenger.into_outbox().is_empty());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(MessageScope::local().to_string(), "local");
        assert_eq!(MessageScope::local_with_label("knows").to_string(), "local[knows]");
        assert_eq!(MessageScope::global(["a", "b"]).to_string(), "global[2 targets]");
    }
}
