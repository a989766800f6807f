//! Error types for pathgraph-core
//!
//! Two failure kinds cover the whole crate: a graph operation was handed a
//! node the numbered-node manager cannot resolve, or an internal invariant
//! audit found the successor/predecessor state out of sync.

use thiserror::Error;

/// Main error type for pathgraph-core operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node passed to an edge operation is not registered in the graph
    #[error("node not in graph: {node}")]
    NotInGraph { node: String },

    /// An internal invariant was found broken during an audit pass
    #[error("contract violation: {detail}")]
    ContractViolation { detail: String },
}

impl GraphError {
    /// Build a `NotInGraph` error from any debuggable node value
    pub fn not_in_graph(node: impl std::fmt::Debug) -> Self {
        GraphError::NotInGraph {
            node: format!("{:?}", node),
        }
    }

    /// Build a `ContractViolation` error
    pub fn contract(detail: impl Into<String>) -> Self {
        GraphError::ContractViolation {
            detail: detail.into(),
        }
    }
}

/// Result type for pathgraph-core operations
pub type GraphResult<T> = Result<T, GraphError>;
