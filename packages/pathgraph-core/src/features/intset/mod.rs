//! Set-of-naturals substrate
//!
//! Small-integer set machinery shared by the path-edge index and the graph
//! edge manager: a sorted-vec sparse set, a dense bit set, a two-level sparse
//! bit set, a natural-indexed sparse vector, and the binary relation built on
//! top of them.

pub mod bit_set;
pub mod relation;
pub mod sparse_int_set;
pub mod sparse_vector;
pub mod two_level;

pub use bit_set::BitSet;
pub use relation::{BinaryRelation, RowKind, RowSet, SIMPLE_ROW_PROMOTION_LIMIT};
pub use sparse_int_set::SparseIntSet;
pub use sparse_vector::SparseVector;
pub use two_level::TwoLevelBitSet;
