/*
 * Sparse Numbered Edge Manager
 *
 * Tracks directed edges over node numbers. Forward and reverse adjacency are
 * kept as two binary relations maintained in lockstep:
 *
 *   succ: x -> { y | x -> y }        pred: y -> { x | x -> y }
 *
 * plus a bit set caching which nodes currently have at least one successor,
 * so hot has-any-successor probes skip the relation entirely.
 *
 * Invariants after every public operation:
 *   (x, y) in succ  <=>  (y, x) in pred
 *   has_successor contains x  <=>  succ(x) is non-empty
 */

use std::fmt;

use tracing::trace;

use crate::errors::{GraphError, GraphResult};
use crate::features::intset::{BinaryRelation, BitSet, RowKind, RowSet};

/// Directed-edge store over numbered nodes
#[derive(Debug, Clone, Default)]
pub struct SparseNumberedEdgeManager {
    successors: BinaryRelation,
    predecessors: BinaryRelation,
    has_successor: BitSet,
}

impl SparseNumberedEdgeManager {
    /// Create an edge manager whose adjacency rows all use the two-level
    /// encoding.
    pub fn new() -> Self {
        Self::with_normal_case(0)
    }

    /// Create an edge manager expecting `normal_case` to bound the typical
    /// node number: the first `normal_case` adjacency rows use the simple
    /// encoding, trading a little space for faster small-row updates.
    pub fn with_normal_case(normal_case: usize) -> Self {
        let kinds = vec![RowKind::Simple; normal_case];
        Self {
            successors: BinaryRelation::new(kinds.clone(), RowKind::TwoLevel),
            predecessors: BinaryRelation::new(kinds, RowKind::TwoLevel),
            has_successor: BitSet::new(),
        }
    }

    /// Insert the edge `x -> y`; idempotent.
    pub fn add_edge(&mut self, x: u32, y: u32) {
        self.predecessors.add(y, x);
        self.successors.add(x, y);
        self.has_successor.insert(x);
        trace!("edge added: {} -> {}", x, y);
    }

    /// True iff the edge `x -> y` is present
    pub fn has_edge(&self, x: u32, y: u32) -> bool {
        self.successors.contains(x, y)
    }

    /// Delete the edge `x -> y`; idempotent, a no-op when absent.
    pub fn remove_edge(&mut self, x: u32, y: u32) {
        self.successors.remove(x, y);
        if self.successors.related_count(x) == 0 {
            self.has_successor.remove(x);
        }
        self.predecessors.remove(y, x);
    }

    /// Delete every edge leaving `x`
    pub fn remove_outgoing_edges(&mut self, x: u32) {
        if let Some(succ) = self.successors.related(x) {
            let targets: Vec<u32> = succ.iter().collect();
            for y in targets {
                self.predecessors.remove(y, x);
            }
        }
        self.successors.remove_all(x);
        self.has_successor.remove(x);
    }

    /// Delete every edge entering `y`
    pub fn remove_incoming_edges(&mut self, y: u32) {
        if let Some(pred) = self.predecessors.related(y) {
            let sources: Vec<u32> = pred.iter().collect();
            for x in sources {
                self.successors.remove(x, y);
                if self.successors.related_count(x) == 0 {
                    self.has_successor.remove(x);
                }
            }
        }
        self.predecessors.remove_all(y);
    }

    /// Delete every edge touching `n`, in either direction
    pub fn remove_all_incident_edges(&mut self, n: u32) {
        self.remove_outgoing_edges(n);
        self.remove_incoming_edges(n);
        self.has_successor.remove(n);
    }

    /// Live view of the successor numbers of `x`; `None` when it has none.
    /// Invalidated by any subsequent mutation.
    pub fn succ_node_numbers(&self, x: u32) -> Option<&RowSet> {
        self.successors.related(x)
    }

    /// Live view of the predecessor numbers of `y`; `None` when it has none.
    pub fn pred_node_numbers(&self, y: u32) -> Option<&RowSet> {
        self.predecessors.related(y)
    }

    /// Out-degree of `x`
    pub fn succ_node_count(&self, x: u32) -> usize {
        self.successors.related_count(x)
    }

    /// In-degree of `y`
    pub fn pred_node_count(&self, y: u32) -> usize {
        self.predecessors.related_count(y)
    }

    /// Cached out-degree-positive probe
    #[inline]
    pub fn has_any_successor(&self, x: u32) -> bool {
        self.has_successor.contains(x)
    }

    /// Verify the symmetry and cache invariants, returning a
    /// `ContractViolation` describing the first breach found.
    pub fn audit(&self) -> GraphResult<()> {
        for (x, y) in self.successors.iter() {
            if !self.predecessors.contains(y, x) {
                return Err(GraphError::contract(format!(
                    "succ({}, {}) has no mirror pred({}, {})",
                    x, y, y, x
                )));
            }
        }
        for (y, x) in self.predecessors.iter() {
            if !self.successors.contains(x, y) {
                return Err(GraphError::contract(format!(
                    "pred({}, {}) has no mirror succ({}, {})",
                    y, x, x, y
                )));
            }
        }
        for (x, _) in self.successors.rows() {
            if !self.has_successor.contains(x) {
                return Err(GraphError::contract(format!(
                    "has_successor cache misses node {}",
                    x
                )));
            }
        }
        for x in self.has_successor.iter() {
            if self.successors.related_count(x) == 0 {
                return Err(GraphError::contract(format!(
                    "has_successor cache stale for node {}",
                    x
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SparseNumberedEdgeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "successors relation:")?;
        write!(f, "{}", self.successors)
    }
}
