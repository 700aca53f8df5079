//! Traversal paths
//!
//! A path is the ordered history of objects a traverser visited. Each step may
//! carry any number of labels; the same label can appear on several steps.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use super::value::PathValue;

/// One visited object and the labels attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub object: PathValue,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl PathStep {
    pub fn new(object: impl Into<PathValue>) -> Self {
        Self {
            object: object.into(),
            labels: BTreeSet::new(),
        }
    }

    pub fn labeled<I, S>(object: impl Into<PathValue>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            object: object.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

/// Ordered label → value bindings of a halted traverser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unlabeled step
    pub fn extend(mut self, object: impl Into<PathValue>) -> Self {
        self.steps.push(PathStep::new(object));
        self
    }

    /// Append a step carrying a single label
    pub fn extend_labeled(mut self, label: impl Into<String>, object: impl Into<PathValue>) -> Self {
        let label: String = label.into();
        self.steps.push(PathStep::labeled(object, [label]));
        self
    }

    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn objects(&self) -> impl Iterator<Item = &PathValue> {
        self.steps.iter().map(|s| &s.object)
    }

    /// The object of the last step (the traverser's current position)
    pub fn head(&self) -> Option<&PathValue> {
        self.steps.last().map(|s| &s.object)
    }

    /// Every distinct label on this path, ascending
    pub fn labels(&self) -> BTreeSet<&str> {
        self.steps
            .iter()
            .flat_map(|s| s.labels.iter().map(String::as_str))
            .collect()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.steps.iter().any(|s| s.has_label(label))
    }

    /// Value bound to `label`
    ///
    /// A label bound on a single step yields that step's object. A label
    /// bound on several steps yields a list of their objects in path order.
    pub fn get(&self, label: &str) -> Option<Cow<'_, PathValue>> {
        let mut matches = self.steps.iter().filter(|s| s.has_label(label));
        let first = matches.next()?;
        match matches.next() {
            None => Some(Cow::Borrowed(&first.object)),
            Some(second) => {
                let mut objects = vec![first.object.clone(), second.object.clone()];
                objects.extend(matches.map(|s| s.object.clone()));
                Some(Cow::Owned(PathValue::List(objects)))
            }
        }
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("path[")?;
        for (i, object) in self.objects().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", object)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::value::VertexRef;

    fn sample() -> Path {
        Path::new()
            .extend_labeled("a", VertexRef::new(1, "person"))
            .extend("knows")
            .extend_labeled("b", VertexRef::new(2, "person"))
            .extend_labeled("name", "vadas")
    }

    #[test]
    fn test_get_single_binding() {
        let path = sample();
        assert_eq!(path.get("name").unwrap().as_ref(), &PathValue::from("vadas"));
        assert!(matches!(path.get("a"), Some(Cow::Borrowed(_))));
    }

    #[test]
    fn test_get_missing_label() {
        assert!(sample().get("missing").is_none());
    }

    #[test]
    fn test_get_repeated_label_returns_list() {
        let path = Path::new()
            .extend_labeled("x", 1)
            .extend_labeled("y", 2)
            .extend_labeled("x", 3);
        let value = path.get("x").unwrap().into_owned();
        assert_eq!(value, PathValue::List(vec![1.into(), 3.into()]));
    }

    #[test]
    fn test_multi_label_step() {
        let path: Path = [PathStep::labeled("v", ["a", "b"])].into_iter().collect();
        assert_eq!(path.get("a").unwrap().as_ref(), &PathValue::from("v"));
        assert_eq!(path.get("b").unwrap().as_ref(), &PathValue::from("v"));
    }

    #[test]
    fn test_labels_sorted_and_distinct() {
        let path = Path::new()
            .extend_labeled("x", 1)
            .extend_labeled("a", 2)
            .extend_labeled("x", 3);
        let labels: Vec<_> = path.labels().into_iter().collect();
        assert_eq!(labels, vec!["a", "x"]);
    }

    #[test]
    fn test_head_and_display() {
        let path = sample();
        assert_eq!(path.len(), 4);
        assert_eq!(path.head(), Some(&PathValue::from("vadas")));
        assert_eq!(path.to_string(), "path[v[1], knows, v[2], vadas]");
    }
}
