//! Shared identifier types

use serde::{Deserialize, Serialize};

/// Topology node identifier
///
/// Node ids are assigned by the workspace, not minted here, so this is a
/// string newtype rather than a generated id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display() {
        let id = NodeId::new("inbox");
        assert_eq!(id.to_string(), "inbox");
        assert_eq!(id.as_str(), "inbox");
    }

    #[test]
    fn node_id_from_str() {
        let id: NodeId = "projects.bureau".into();
        assert_eq!(id, NodeId::new("projects.bureau"));
    }
}
