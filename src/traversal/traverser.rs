//! Halted traversers attached to vertices by an upstream traversal

use serde::{Deserialize, Serialize};

use super::path::Path;
use super::value::PathValue;

fn default_bulk() -> u64 {
    1
}

/// A traversal that finished at a vertex, carrying its full path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traverser {
    path: Path,
    #[serde(default = "default_bulk")]
    bulk: u64,
}

impl Traverser {
    pub fn new(path: Path) -> Self {
        Self { path, bulk: 1 }
    }

    /// Set how many identical traversers this one stands for
    pub fn with_bulk(mut self, bulk: u64) -> Self {
        self.bulk = bulk.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bulk(&self) -> u64 {
        self.bulk
    }

    /// Current object (last step of the path)
    pub fn get(&self) -> Option<&PathValue> {
        self.path.head()
    }
}

impl From<Path> for Traverser {
    fn from(path: Path) -> Self {
        Self::new(path)
    }
}

/// Ordered collection of halted traversers
///
/// Iteration order is the order the host inserted them in, which keeps
/// per-vertex output reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraverserSet {
    traversers: Vec<Traverser>,
}

impl TraverserSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, traverser: impl Into<Traverser>) {
        self.traversers.push(traverser.into());
    }

    pub fn len(&self) -> usize {
        self.traversers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traversers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Traverser> {
        self.traversers.iter()
    }

    /// Sum of bulks across all traversers
    pub fn bulk_size(&self) -> u64 {
        self.traversers.iter().map(Traverser::bulk).sum()
    }
}

impl<T: Into<Traverser>> FromIterator<T> for TraverserSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            traversers: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TraverserSet {
    type Item = &'a Traverser;
    type IntoIter = std::slice::Iter<'a, Traverser>;

    fn into_iter(self) -> Self::IntoIter {
        self.traversers.iter()
    }
}

impl IntoIterator for TraverserSet {
    type Item = Traverser;
    type IntoIter = std::vec::IntoIter<Traverser>;

    fn into_iter(self) -> Self::IntoIter {
        self.traversers.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traverser_defaults() {
        let t = Traverser::new(Path::new().extend_labeled("a", 1));
        assert_eq!(t.bulk(), 1);
        assert_eq!(t.get(), Some(&PathValue::from(1)));
    }

    #[test]
    fn test_bulk_minimum() {
        let t = Traverser::new(Path::new()).with_bulk(0);
        assert_eq!(t.bulk(), 1);
    }

    #[test]
    fn test_set_preserves_insertion_order() {
        let set: TraverserSet = vec![
            Path::new().extend_labeled("n", 3),
            Path::new().extend_labeled("n", 1),
            Path::new().extend_labeled("n", 2),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = set.iter().filter_map(|t| t.get().and_then(PathValue::as_i64)).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_bulk_size() {
        let mut set = TraverserSet::new();
        set.push(Traverser::new(Path::new()).with_bulk(3));
        set.push(Path::new());
        assert_eq!(set.len(), 2);
        assert_eq!(set.bulk_size(), 4);
    }

    #[test]
    fn test_bulk_defaults_when_deserialized() {
        let json = r#"[{"path": []}]"#;
        let set: TraverserSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.iter().next().map(Traverser::bulk), Some(1));
    }
}
