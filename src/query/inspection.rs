//! Read-only inspection nodes for building query-plan trees.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One node of a human-readable query-plan tree.
///
/// Match implementations and term providers produce these from their
/// `inspect` methods; nesting mirrors the execution tree. Inspection
/// never mutates the inspected object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInspectionNode {
    /// Name of the component (e.g. `MultiTermMatch`).
    name: String,
    /// Named parameters describing the component's state.
    parameters: BTreeMap<String, String>,
    /// Nested inspection nodes of inner components.
    children: Vec<QueryInspectionNode>,
}

impl QueryInspectionNode {
    /// Create a leaf node with the given component name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        QueryInspectionNode {
            name: name.into(),
            parameters: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Attach a named parameter.
    pub fn with_parameter<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Attach a child node.
    pub fn with_child(mut self, child: QueryInspectionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parameter map.
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Get the child nodes.
    pub fn children(&self) -> &[QueryInspectionNode] {
        &self.children
    }

    /// Serialize the tree to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{}{}", indent, self.name)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            write!(f, " [{}]", params.join(", "))?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for QueryInspectionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
