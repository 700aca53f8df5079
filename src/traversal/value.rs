//! Typed values bound to path labels
//!
//! Values are tagged GraphSON-style (`@type` / `@value`) when serialized so
//! they survive being shipped between workers unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a graph element referenced from a path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementId {
    Int(i64),
    String(String),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Int(id) => write!(f, "{}", id),
            ElementId::String(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ElementId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ElementId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self::String(id)
    }
}

/// Reference to a vertex visited by a traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRef {
    pub id: ElementId,
    pub label: String,
}

impl VertexRef {
    pub fn new(id: impl Into<ElementId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Reference to an edge visited by a traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub id: ElementId,
    pub label: String,
    #[serde(rename = "outV")]
    pub out_v: ElementId,
    #[serde(rename = "inV")]
    pub in_v: ElementId,
}

impl EdgeRef {
    pub fn new(
        id: impl Into<ElementId>,
        out_v: impl Into<ElementId>,
        label: impl Into<String>,
        in_v: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            out_v: out_v.into(),
            in_v: in_v.into(),
        }
    }
}

/// A vertex property (id, key, value) yielded by a `properties()` step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexPropertyRef {
    pub id: ElementId,
    pub label: String,
    pub value: Box<PathValue>,
}

impl VertexPropertyRef {
    pub fn new(id: impl Into<ElementId>, label: impl Into<String>, value: impl Into<PathValue>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: Box::new(value.into()),
        }
    }
}

/// A plain key/value property (edge or meta property)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRef {
    pub key: String,
    pub value: Box<PathValue>,
}

impl PropertyRef {
    pub fn new(key: impl Into<String>, value: impl Into<PathValue>) -> Self {
        Self {
            key: key.into(),
            value: Box::new(value.into()),
        }
    }
}

/// A value bound to a step of a traversal path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type", content = "@value")]
pub enum PathValue {
    #[serde(rename = "g:Null")]
    Null,
    #[serde(rename = "g:Boolean")]
    Bool(bool),
    #[serde(rename = "g:Int64")]
    Int(i64),
    #[serde(rename = "g:Double")]
    Float(f64),
    #[serde(rename = "g:String")]
    String(String),
    #[serde(rename = "g:List")]
    List(Vec<PathValue>),
    /// Entries keep their insertion order
    #[serde(rename = "g:Map")]
    Map(Vec<(String, PathValue)>),
    #[serde(rename = "g:Vertex")]
    Vertex(VertexRef),
    #[serde(rename = "g:Edge")]
    Edge(EdgeRef),
    #[serde(rename = "g:VertexProperty")]
    VertexProperty(VertexPropertyRef),
    #[serde(rename = "g:Property")]
    Property(PropertyRef),
}

/// Property values longer than this are abbreviated in element strings
const PROPERTY_PREVIEW_CHARS: usize = 20;

impl PathValue {
    /// Short type name used in error reports
    pub fn type_name(&self) -> &'static str {
        match self {
            PathValue::Null => "null",
            PathValue::Bool(_) => "boolean",
            PathValue::Int(_) => "integer",
            PathValue::Float(_) => "float",
            PathValue::String(_) => "string",
            PathValue::List(_) => "list",
            PathValue::Map(_) => "map",
            PathValue::Vertex(_) => "vertex",
            PathValue::Edge(_) => "edge",
            PathValue::VertexProperty(_) => "vertex property",
            PathValue::Property(_) => "property",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PathValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PathValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PathValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PathValue::Float(n) => Some(*n),
            _ => None,
        }
    }
}

/// Renders a double the way JVM-hosted graph engines print them:
/// integral values keep a `.0`, large and tiny magnitudes use `E` notation.
pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let scientific = format!("{:e}", value);
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
        if mantissa.contains('.') {
            format!("{}E{}", mantissa, exponent)
        } else {
            format!("{}.0E{}", mantissa, exponent)
        }
    }
}

fn abbreviate(text: &str) -> String {
    if text.chars().count() <= PROPERTY_PREVIEW_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(PROPERTY_PREVIEW_CHARS - 3).collect();
    format!("{}...", head)
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathValue::Null => f.write_str("null"),
            PathValue::Bool(b) => write!(f, "{}", b),
            PathValue::Int(n) => write!(f, "{}", n),
            PathValue::Float(n) => f.write_str(&render_float(*n)),
            PathValue::String(s) => f.write_str(s),
            PathValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            PathValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                }
                f.write_str("}")
            }
            PathValue::Vertex(v) => write!(f, "v[{}]", v.id),
            PathValue::Edge(e) => write!(f, "e[{}][{}-{}->{}]", e.id, e.out_v, e.label, e.in_v),
            PathValue::VertexProperty(vp) => {
                write!(f, "vp[{}->{}]", vp.label, abbreviate(&vp.value.to_string()))
            }
            PathValue::Property(p) => {
                write!(f, "p[{}->{}]", p.key, abbreviate(&p.value.to_string()))
            }
        }
    }
}

impl From<&str> for PathValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PathValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PathValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for PathValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for PathValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for PathValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<VertexRef> for PathValue {
    fn from(v: VertexRef) -> Self {
        Self::Vertex(v)
    }
}

impl From<EdgeRef> for PathValue {
    fn from(e: EdgeRef) -> Self {
        Self::Edge(e)
    }
}

impl From<VertexPropertyRef> for PathValue {
    fn from(vp: VertexPropertyRef) -> Self {
        Self::VertexProperty(vp)
    }
}

impl From<PropertyRef> for PathValue {
    fn from(p: PropertyRef) -> Self {
        Self::Property(p)
    }
}

impl<T: Into<PathValue>> From<Vec<T>> for PathValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PathValue>> From<Option<T>> for PathValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PathValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(PathValue::from("Alice").to_string(), "Alice");
        assert_eq!(PathValue::from(30).to_string(), "30");
        assert_eq!(PathValue::from(true).to_string(), "true");
        assert_eq!(PathValue::Null.to_string(), "null");
    }

    #[test]
    fn test_float_rendering() {
        assert_eq!(render_float(30.0), "30.0");
        assert_eq!(render_float(1.5), "1.5");
        assert_eq!(render_float(-0.25), "-0.25");
        assert_eq!(render_float(0.0), "0.0");
        assert_eq!(render_float(1.0e7), "1.0E7");
        assert_eq!(render_float(1.25e-5), "1.25E-5");
        assert_eq!(render_float(f64::NAN), "NaN");
        assert_eq!(render_float(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_element_rendering() {
        let v = PathValue::from(VertexRef::new(1, "person"));
        assert_eq!(v.to_string(), "v[1]");

        let e = PathValue::from(EdgeRef::new(7, 1, "knows", 2));
        assert_eq!(e.to_string(), "e[7][1-knows->2]");

        let vp = PathValue::from(VertexPropertyRef::new(0, "name", "marko"));
        assert_eq!(vp.to_string(), "vp[name->marko]");

        let p = PathValue::from(PropertyRef::new("weight", 0.5));
        assert_eq!(p.to_string(), "p[weight->0.5]");
    }

    #[test]
    fn test_long_property_values_are_abbreviated() {
        let p = PathValue::from(PropertyRef::new("bio", "a very long biography text"));
        assert_eq!(p.to_string(), "p[bio->a very long biogr...]");
    }

    #[test]
    fn test_collection_rendering() {
        let list = PathValue::from(vec![1, 2, 3]);
        assert_eq!(list.to_string(), "[1, 2, 3]");

        let map = PathValue::Map(vec![
            ("name".to_string(), "Alice".into()),
            ("age".to_string(), 30.into()),
        ]);
        assert_eq!(map.to_string(), "{name=Alice, age=30}");
    }

    #[test]
    fn test_option_conversion() {
        assert!(PathValue::from(None::<i64>).is_null());
        assert_eq!(PathValue::from(Some("x")).as_str(), Some("x"));
    }

    #[test]
    fn test_value_serialization_is_type_tagged() {
        let value = PathValue::from(42);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["@type"], "g:Int64");
        assert_eq!(json["@value"], 42);

        let vertex = PathValue::from(VertexRef::new("a1", "person"));
        let encoded = serde_json::to_string(&vertex).unwrap();
        let decoded: PathValue = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, vertex);
    }
}
