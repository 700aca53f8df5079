//! Graph elements seen by vertex programs
//!
//! A vertex owns a set of typed properties. During a superstep each vertex is
//! handed to exactly one program invocation, which may read and replace its
//! properties but never touches another vertex.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::traversal::{ExportRow, PathValue, TraverserSet};

/// Unique identifier for a vertex in the graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub String);

impl VertexId {
    /// Create a new VertexId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed value of a vertex property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Ordinary stored property
    Value(PathValue),
    /// Halted traversers left by a traversal program
    Traversers(TraverserSet),
    /// Formatted export rows
    Rows(Vec<ExportRow>),
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Value(_) => "value",
            PropertyValue::Traversers(_) => "traversers",
            PropertyValue::Rows(_) => "rows",
        }
    }
}

impl From<PathValue> for PropertyValue {
    fn from(value: PathValue) -> Self {
        Self::Value(value)
    }
}

impl From<TraverserSet> for PropertyValue {
    fn from(traversers: TraverserSet) -> Self {
        Self::Traversers(traversers)
    }
}

impl From<Vec<ExportRow>> for PropertyValue {
    fn from(rows: Vec<ExportRow>) -> Self {
        Self::Rows(rows)
    }
}

/// A vertex with its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    id: VertexId,
    label: String,
    #[serde(default)]
    properties: BTreeMap<String, PropertyValue>,
}

impl Vertex {
    pub fn new(id: impl Into<VertexId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property assignment
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &VertexId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Set a property, replacing and returning any previous value
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    /// Halted traversers under `key`, if that property holds traversers
    pub fn traversers(&self, key: &str) -> Option<&TraverserSet> {
        match self.properties.get(key) {
            Some(PropertyValue::Traversers(set)) => Some(set),
            _ => None,
        }
    }

    /// Export rows under `key`, if that property holds rows
    pub fn rows(&self, key: &str) -> Option<&[ExportRow]> {
        match self.properties.get(key) {
            Some(PropertyValue::Rows(rows)) => Some(rows),
            _ => None,
        }
    }
}

/// A directed, labeled edge between two vertices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub label: String,
    #[serde(rename = "outV")]
    pub out_v: VertexId,
    #[serde(rename = "inV")]
    pub in_v: VertexId,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        out_v: impl Into<VertexId>,
        label: impl Into<String>,
        in_v: impl Into<VertexId>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            out_v: out_v.into(),
            in_v: in_v.into(),
        }
    }
}

/// In-memory graph handed to a computer
///
/// Vertices are kept ordered by id so every run visits them identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    vertices: BTreeMap<VertexId, Vertex>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex, replacing any vertex with the same id
    pub fn add_vertex(&mut self, vertex: Vertex) -> &mut Self {
        self.vertices.insert(vertex.id().clone(), vertex);
        self
    }

    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    pub fn vertex(&self, id: &VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn vertex_mut(&mut self, id: &VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id)
    }

    pub fn contains_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of `id`, optionally restricted to one edge label
    pub fn out_edges<'a>(
        &'a self,
        id: &'a VertexId,
        label: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |e| &e.out_v == id && label.map_or(true, |l| e.label == l))
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<VertexId, Vertex>, Vec<Edge>) {
        (self.vertices, self.edges)
    }

    pub(crate) fn from_parts(vertices: BTreeMap<VertexId, Vertex>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::Path;

    #[test]
    fn test_vertex_id_from_str() {
        let id: VertexId = "v1".into();
        assert_eq!(id.0, "v1");
    }

    #[test]
    fn test_vertex_id_display() {
        let id = VertexId::new("marko");
        assert_eq!(format!("{}", id), "marko");
    }

    #[test]
    fn test_vertex_id_ordering() {
        let mut ids = vec![VertexId::from("c"), VertexId::from("a"), VertexId::from("b")];
        ids.sort();
        assert_eq!(ids, vec![VertexId::from("a"), VertexId::from("b"), VertexId::from("c")]);
    }

    #[test]
    fn test_set_property_replaces() {
        let mut v = Vertex::new("v1", "person").with_property("name", PathValue::from("marko"));
        let prior = v.set_property("name", PathValue::from("josh"));
        assert_eq!(prior, Some(PropertyValue::Value("marko".into())));
        assert_eq!(v.property("name"), Some(&PropertyValue::Value("josh".into())));
    }

    #[test]
    fn test_typed_accessors() {
        let set: TraverserSet = vec![Path::new().extend_labeled("a", 1)].into_iter().collect();
        let v = Vertex::new("v1", "person")
            .with_property("halted", set)
            .with_property("rows", vec![ExportRow::new(vec!["1".into()])]);

        assert_eq!(v.traversers("halted").map(TraverserSet::len), Some(1));
        assert!(v.traversers("rows").is_none());
        assert_eq!(v.rows("rows").map(<[ExportRow]>::len), Some(1));
        assert!(v.rows("missing").is_none());
    }

    #[test]
    fn test_graph_out_edges() {
        let mut graph = Graph::new();
        graph
            .add_vertex(Vertex::new("1", "person"))
            .add_vertex(Vertex::new("2", "person"))
            .add_vertex(Vertex::new("3", "software"))
            .add_edge(Edge::new("7", "1", "knows", "2"))
            .add_edge(Edge::new("9", "1", "created", "3"));

        let id = VertexId::from("1");
        assert_eq!(graph.out_edges(&id, None).count(), 2);
        assert_eq!(graph.out_edges(&id, Some("knows")).count(), 1);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_graph_iterates_in_id_order() {
        let mut graph = Graph::new();
        graph
            .add_vertex(Vertex::new("b", "x"))
            .add_vertex(Vertex::new("a", "x"));
        let ids: Vec<_> = graph.vertices().map(|v| v.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_graph_serialization() {
        let mut graph = Graph::new();
        graph.add_vertex(Vertex::new("1", "person").with_property("age", PathValue::from(29)));
        let json = serde_json::to_string(&graph).unwrap();
        let restored: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, graph);
    }
}
