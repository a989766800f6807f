/*
 * pathgraph-core
 *
 * Data-structure substrate for IFDS-style interprocedural dataflow analysis:
 *
 * - intset/      : sets of small naturals (sorted-vec, dense bits, two-level
 *                  bits), a natural-indexed sparse vector, and a binary
 *                  relation dense in its first coordinate
 * - path_edges/  : the per-procedure path-edge index a tabulation solver
 *                  records same-level realizable paths into
 * - graph/       : numbered nodes, a sparse edge manager with mirrored
 *                  forward/reverse adjacency, and a typed graph facade
 *
 * The crate assumes a single logical writer: nothing here synchronizes, and
 * views returned by query operations borrow live interior storage, which the
 * borrow checker confines to the span before the next mutation.
 */

pub mod errors;
pub mod features;

pub use errors::{GraphError, GraphResult};
pub use features::graph::{
    Graph, NumberedNodeManager, SlowNumberedNodeManager, SlowSparseNumberedGraph,
    SparseNumberedEdgeManager,
};
pub use features::intset::{
    BinaryRelation, BitSet, RowKind, RowSet, SparseIntSet, SparseVector, TwoLevelBitSet,
};
pub use features::path_edges::LocalPathEdges;
