/*
 * Local Path Edges
 *
 * Per-procedure index of IFDS path edges. For a procedure with entry s_p, a
 * path edge <s_p, d1> -> <n, d2> records that a same-level realizable path
 * from the entry with fact d1 reaches basic block n with fact d2. A whole-
 * program tabulation records hundreds of millions of these, so the triple
 * space (n, d1, d2) is split across three stores that each exploit a shape
 * the general representation would waste memory on:
 *
 * - paths:          d2 -> relation (n, d1), for d1 != 0 and d1 != d2
 * - identity_paths: d1 -> bit set of n,     for d1 == d2 != 0
 * - zero_paths:     d2 -> bit set of n,     for d1 == 0
 *
 * Identity and zero edges dominate real workloads; keeping them out of the
 * general relation cuts space by roughly an order of magnitude. Block
 * numbers are dense per (d1, d2), so n is always the first relation
 * coordinate.
 *
 * An optional fourth store, alt_paths (d1 -> relation (n, d2)), mirrors the
 * other three to answer forward queries in constant time for merge-heavy
 * solvers, at about twice the memory.
 */

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::features::intset::{BinaryRelation, BitSet, RowKind, SparseIntSet, SparseVector};

/// Cross-check the fast and slow `reachable` paths on every query. Slow;
/// enable only when hunting a store-consistency bug.
const PARANOID: bool = false;

/// First-coordinate rows of a path relation are block numbers, dense and
/// small for most (d1, d2) pairs; the second coordinate stays sparse.
fn path_relation() -> BinaryRelation {
    BinaryRelation::new(vec![RowKind::Simple], RowKind::TwoLevel)
}

/// Set of path edges for one procedure entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalPathEdges {
    /// d2 -> relation over (n, d1), for edges with d1 not in {0, d2}
    paths: SparseVector<BinaryRelation>,

    /// Redundant mirror, d1 -> relation over (n, d2), present iff the index
    /// was built with `fast_merge`. Holds every edge the three primary
    /// stores hold.
    alt_paths: Option<SparseVector<BinaryRelation>>,

    /// d1 -> blocks n with an identity edge <s_p, d1> -> <n, d1>, d1 != 0
    identity_paths: SparseVector<BitSet>,

    /// d2 -> blocks n with a zero edge <s_p, 0> -> <n, d2>
    zero_paths: SparseVector<BitSet>,
}

impl LocalPathEdges {
    /// Create an empty index.
    ///
    /// With `fast_merge` the index spends extra space on the `alt_paths`
    /// mirror so `reachable` answers in one row lookup instead of a scan
    /// over every d2 row.
    pub fn new(fast_merge: bool) -> Self {
        Self {
            paths: SparseVector::new(),
            alt_paths: fast_merge.then(SparseVector::new),
            identity_paths: SparseVector::new(),
            zero_paths: SparseVector::new(),
        }
    }

    /// True when the `alt_paths` mirror is maintained
    pub fn is_fast_merge(&self) -> bool {
        self.alt_paths.is_some()
    }

    /// Record the path edge <s_p, i> -> <n, j>.
    ///
    /// Exactly one primary store receives the edge: the zero store when
    /// `i == 0` (including the pure-zero edge i == j == 0), the identity
    /// store when `i == j != 0`, and the general relation otherwise.
    pub fn add_path_edge(&mut self, i: u32, n: u32, j: u32) {
        if i == 0 {
            self.add_zero_path_edge(n, j);
        } else if i == j {
            self.add_identity_path_edge(i, n);
        } else {
            self.paths.get_or_insert_with(j, path_relation).add(n, i);
            if let Some(alt) = &mut self.alt_paths {
                alt.get_or_insert_with(i, path_relation).add(n, j);
            }
            trace!("path edge recorded: d1={} reaches block {} as d2={}", i, n, j);
        }
    }

    fn add_identity_path_edge(&mut self, i: u32, n: u32) {
        self.identity_paths.get_or_insert_with(i, BitSet::new).insert(n);
        if let Some(alt) = &mut self.alt_paths {
            alt.get_or_insert_with(i, path_relation).add(n, i);
        }
        trace!("identity path edge recorded: d1={} reaches block {}", i, n);
    }

    fn add_zero_path_edge(&mut self, n: u32, j: u32) {
        self.zero_paths.get_or_insert_with(j, BitSet::new).insert(n);
        if let Some(alt) = &mut self.alt_paths {
            alt.get_or_insert_with(0, path_relation).add(n, j);
        }
        trace!("zero path edge recorded: block {} reached as d2={}", n, j);
    }

    /// True iff the edge <s_p, i> -> <n, j> has been recorded.
    ///
    /// Routing mirrors `add_path_edge`: each query consults exactly the one
    /// store the triple was dispatched to, so an identity query is never
    /// answered out of the general relation and vice versa.
    pub fn contains(&self, i: u32, n: u32, j: u32) -> bool {
        if i == 0 {
            self.zero_paths.get(j).map_or(false, |z| z.contains(n))
        } else if i == j {
            self.identity_paths.get(i).map_or(false, |s| s.contains(n))
        } else {
            self.paths.get(j).map_or(false, |r| r.contains(n, i))
        }
    }

    /// The facts d1 with a recorded edge <s_p, d1> -> <n, d2>, or `None`
    /// when there are none.
    ///
    /// When a solver runs with a zero-path short circuit, an edge
    /// <s_p, d1> -> <n, d2> with d1 != 0 may exist only implicitly through
    /// <s_p, 0> -> <n, d2>; such implicit d1 are NOT reported. Callers must
    /// only depend on 0 being present whenever the zero fact reaches
    /// (n, d2), which is all the tabulation solver needs when propagating
    /// exit facts back to return sites. Do not tighten this.
    pub fn inverse(&self, n: u32, d2: u32) -> Option<SparseIntSet> {
        let related = self.paths.get(d2).and_then(|r| r.related(n));
        let identity = self
            .identity_paths
            .get(d2)
            .map_or(false, |s| s.contains(n));
        let zero = self.zero_paths.get(d2).map_or(false, |z| z.contains(n));

        match related {
            None => match (identity, zero) {
                (false, false) => None,
                (true, false) => Some(SparseIntSet::singleton(d2)),
                (false, true) => Some(SparseIntSet::singleton(0)),
                (true, true) => Some(SparseIntSet::pair(0, d2)),
            },
            Some(row) => {
                let mut result = row.to_sparse();
                if identity {
                    result.insert(d2);
                }
                if zero {
                    result.insert(0);
                }
                Some(result)
            }
        }
    }

    /// The facts d2 with a recorded edge <s_p, d1> -> <n, d2>.
    pub fn reachable(&self, n: u32, d1: u32) -> SparseIntSet {
        match &self.alt_paths {
            Some(alt) => {
                if PARANOID {
                    assert!(
                        self.reachable_slow(n, d1)
                            .same_value(&Self::reachable_fast(alt, n, d1)),
                        "fast/slow reachable disagree at n={} d1={}",
                        n,
                        d1
                    );
                }
                Self::reachable_fast(alt, n, d1)
            }
            None => self.reachable_slow(n, d1),
        }
    }

    /// One row lookup in the mirror.
    fn reachable_fast(alt: &SparseVector<BinaryRelation>, n: u32, d1: u32) -> SparseIntSet {
        alt.get(d1)
            .and_then(|r| r.related(n))
            .map(|row| row.to_sparse())
            .unwrap_or_default()
    }

    /// Union over the primary stores. Costs a probe per materialized d2 row;
    /// the d2 rows are walked in the sparse vector's dense internal order
    /// rather than probed by random access.
    fn reachable_slow(&self, n: u32, d1: u32) -> SparseIntSet {
        let mut result = SparseIntSet::new();
        for (d2, relation) in self.paths.iter() {
            if relation.contains(n, d1) {
                result.insert(d2);
            }
        }
        if let Some(s) = self.identity_paths.get(d1) {
            if s.contains(n) {
                result.insert(d1);
            }
        }
        if d1 == 0 {
            for (d2, blocks) in self.zero_paths.iter() {
                if blocks.contains(n) {
                    result.insert(d2);
                }
            }
        }
        result
    }

    /// The facts d2 reached at block n from any entry fact.
    pub fn reachable_from_any(&self, n: u32) -> SparseIntSet {
        let mut result = SparseIntSet::new();
        for (d2, relation) in self.paths.iter() {
            if relation.related_count(n) > 0 {
                result.insert(d2);
            }
        }
        for (d1, blocks) in self.identity_paths.iter() {
            if blocks.contains(n) {
                result.insert(d1);
            }
        }
        for (d2, blocks) in self.zero_paths.iter() {
            if blocks.contains(n) {
                result.insert(d2);
            }
        }
        result
    }

    /// Every block number appearing in any recorded edge.
    pub fn reached_nodes(&self) -> SparseIntSet {
        let mut result = SparseIntSet::new();
        for (_, relation) in self.paths.iter() {
            for (n, _) in relation.rows() {
                result.insert(n);
            }
        }
        for (_, blocks) in self.identity_paths.iter() {
            for n in blocks.iter() {
                result.insert(n);
            }
        }
        for (_, blocks) in self.zero_paths.iter() {
            for n in blocks.iter() {
                result.insert(n);
            }
        }
        result
    }
}
