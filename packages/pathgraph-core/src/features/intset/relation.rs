//! Binary Natural Relation
//!
//! A set of `(x, y)` pairs over small nonnegative integers, dense in `x` and
//! sparse in `y`. Rows are stored in a plain vector indexed by `x`; each row
//! is a tagged variant choosing between the two encodings instead of the
//! virtual dispatch a per-row object hierarchy would cost:
//!
//! - `Simple`: sorted-vec set, space-stingy while a row holds a handful of
//!   values
//! - `TwoLevel`: word-directory bit set, for rows that grow large
//!
//! A constructor-supplied implementation vector assigns the preferred
//! encoding to rows `0..k`; rows past the vector use the delegate encoding.
//! `Simple` rows promote themselves to `TwoLevel` once they outgrow
//! [`SIMPLE_ROW_PROMOTION_LIMIT`]; promotion preserves set membership, not
//! iteration order.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::sparse_int_set::SparseIntSet;
use super::two_level::TwoLevelBitSet;

/// A `Simple` row switches to `TwoLevel` when an insert would push it past
/// this many elements.
pub const SIMPLE_ROW_PROMOTION_LIMIT: usize = 16;

/// Row encoding selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// Sorted-vec set, best for rows of roughly eight values or fewer
    Simple,
    /// Two-level sparse bit set, best for large rows
    TwoLevel,
}

/// One materialized row of the relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSet {
    Simple(SparseIntSet),
    TwoLevel(TwoLevelBitSet),
}

impl RowSet {
    /// Create an empty row with the requested encoding
    pub fn with_kind(kind: RowKind) -> Self {
        match kind {
            RowKind::Simple => RowSet::Simple(SparseIntSet::new()),
            RowKind::TwoLevel => RowSet::TwoLevel(TwoLevelBitSet::new()),
        }
    }

    /// Insert a value, promoting a full `Simple` row first.
    /// Returns true if the value was not present.
    pub fn insert(&mut self, value: u32) -> bool {
        if let RowSet::Simple(s) = self {
            if s.len() >= SIMPLE_ROW_PROMOTION_LIMIT && !s.contains(value) {
                let mut promoted = TwoLevelBitSet::new();
                for v in s.iter() {
                    promoted.insert(v);
                }
                *self = RowSet::TwoLevel(promoted);
            }
        }
        match self {
            RowSet::Simple(s) => s.insert(value),
            RowSet::TwoLevel(s) => s.insert(value),
        }
    }

    /// Remove a value. Returns true if it was present.
    pub fn remove(&mut self, value: u32) -> bool {
        match self {
            RowSet::Simple(s) => s.remove(value),
            RowSet::TwoLevel(s) => s.remove(value),
        }
    }

    /// Membership test
    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        match self {
            RowSet::Simple(s) => s.contains(value),
            RowSet::TwoLevel(s) => s.contains(value),
        }
    }

    /// Number of values in the row
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            RowSet::Simple(s) => s.len(),
            RowSet::TwoLevel(s) => s.len(),
        }
    }

    /// Emptiness test
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate values. Order is unspecified.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            RowSet::Simple(s) => Box::new(s.iter()),
            RowSet::TwoLevel(s) => Box::new(s.iter()),
        }
    }

    /// Copy the row out as a sorted sparse set
    pub fn to_sparse(&self) -> SparseIntSet {
        SparseIntSet::from_iter(self.iter())
    }
}

/// Binary relation over naturals, dense in the first coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryRelation {
    /// Row `x` lives at `rows[x]`; `None` means the empty row
    rows: Vec<Option<RowSet>>,
    /// Preferred encodings for rows `0..row_kinds.len()`
    row_kinds: Vec<RowKind>,
    /// Encoding for every row past the implementation vector
    delegate: RowKind,
}

impl Default for BinaryRelation {
    fn default() -> Self {
        Self::new(Vec::new(), RowKind::TwoLevel)
    }
}

impl BinaryRelation {
    /// Create a relation with an implementation vector and delegate encoding
    pub fn new(row_kinds: Vec<RowKind>, delegate: RowKind) -> Self {
        Self {
            rows: Vec::new(),
            row_kinds,
            delegate,
        }
    }

    #[inline]
    fn kind_for(&self, x: u32) -> RowKind {
        self.row_kinds
            .get(x as usize)
            .copied()
            .unwrap_or(self.delegate)
    }

    /// Insert the pair `(x, y)`. Returns true if it was not present.
    pub fn add(&mut self, x: u32, y: u32) -> bool {
        let xi = x as usize;
        if xi >= self.rows.len() {
            self.rows.resize_with(xi + 1, || None);
        }
        let kind = self.kind_for(x);
        let row = self.rows[xi].get_or_insert_with(|| RowSet::with_kind(kind));
        row.insert(y)
    }

    /// Delete the pair `(x, y)`; no-op when absent.
    ///
    /// A row emptied by the removal is dematerialized.
    pub fn remove(&mut self, x: u32, y: u32) {
        if let Some(slot) = self.rows.get_mut(x as usize) {
            if let Some(row) = slot {
                row.remove(y);
                if row.is_empty() {
                    *slot = None;
                }
            }
        }
    }

    /// Delete every pair with first coordinate `x`
    pub fn remove_all(&mut self, x: u32) {
        if let Some(slot) = self.rows.get_mut(x as usize) {
            *slot = None;
        }
    }

    /// Membership test for `(x, y)`
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.related(x).map_or(false, |row| row.contains(y))
    }

    /// Live view of row `x`; `None` when the row is empty.
    ///
    /// The returned view aliases interior storage and is invalidated by any
    /// subsequent mutation of the relation.
    #[inline]
    pub fn related(&self, x: u32) -> Option<&RowSet> {
        self.rows.get(x as usize).and_then(|slot| slot.as_ref())
    }

    /// Number of values related to `x`
    #[inline]
    pub fn related_count(&self, x: u32) -> usize {
        self.related(x).map_or(0, |row| row.len())
    }

    /// True when any value is related to `x`
    #[inline]
    pub fn any_related(&self, x: u32) -> bool {
        self.related(x).is_some()
    }

    /// Iterate non-empty rows as `(x, row)` in ascending `x`
    pub fn rows(&self) -> impl Iterator<Item = (u32, &RowSet)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(x, slot)| slot.as_ref().map(|row| (x as u32, row)))
    }

    /// Iterate all pairs `(x, y)`, visiting each exactly once
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.rows()
            .flat_map(|(x, row)| row.iter().map(move |y| (x, y)))
    }
}

impl fmt::Display for BinaryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (x, row) in self.rows() {
            let mut ys: Vec<u32> = row.iter().collect();
            ys.sort_unstable();
            writeln!(f, "{} -> {:?}", x, ys)?;
        }
        Ok(())
    }
}
