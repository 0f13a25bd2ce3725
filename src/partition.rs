//! Edge partitions: the grouping of frontier positions into maximal
//! sets that are connected through the grown grid's interior, one
//! partition per colour.

/// Positions of one connected monochromatic frontier component, kept in
/// ascending order once sorted.
pub type EdgeSet = Vec<i32>;

/// A list of edge sets for one colour. The derived ordering compares
/// sets element by element and then set by set, with a strict prefix
/// ordering first — exactly the ordering the canonicalisation minimises
/// over.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgePartition {
    pub sets: Vec<EdgeSet>,
}

impl EdgePartition {
    pub fn new(sets: Vec<EdgeSet>) -> Self {
        Self { sets }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Sorts each set ascending, then the sets by their least element.
    /// Idempotent.
    pub fn sort(&mut self) {
        for set in &mut self.sets {
            set.sort_unstable();
        }
        self.sets.sort_unstable_by_key(|set| set[0]);
    }

    /// Reflection across the grid's main diagonal: every position is
    /// negated, which reverses each set, and the sets are re-sorted by
    /// their new minimum.
    pub fn diagonal_flip(&self) -> EdgePartition {
        let mut sets: Vec<EdgeSet> = self
            .sets
            .iter()
            .map(|set| set.iter().rev().map(|p| -p).collect())
            .collect();
        sets.sort_unstable_by_key(|set: &EdgeSet| set[0]);
        EdgePartition { sets }
    }

    /// Mirror across the vertical midline of a width-wide row:
    /// `p` becomes `(width - 1) - p`.
    pub fn midpoint_flip(&self, width: i32) -> EdgePartition {
        let mut sets: Vec<EdgeSet> = self
            .sets
            .iter()
            .map(|set| set.iter().rev().map(|p| (width - 1) - p).collect())
            .collect();
        sets.sort_unstable_by_key(|set: &EdgeSet| set[0]);
        EdgePartition { sets }
    }

    pub fn contains(&self, x: i32) -> bool {
        self.sets.iter().any(|set| set.contains(&x))
    }

    /// The image of each set on the next-larger ring: the squares of
    /// the new ring adjacent to the set.
    ///
    /// ```text
    ///        2 -> 3
    ///        1 -> 2
    /// -2 -1  0 -> 1
    ///  |  |  |
    ///  V  V  V
    /// -3 -2 -1    (the corner 0 of the new ring has no preimage)
    /// ```
    pub fn expand(&self) -> EdgePartition {
        EdgePartition {
            sets: self.sets.iter().map(|set| expand_set(set)).collect(),
        }
    }
}

/// Ring-adjacency image of a single edge set; the corner position maps
/// to both of its new neighbours.
pub fn expand_set(set: &[i32]) -> EdgeSet {
    let mut ret = Vec::with_capacity(set.len() + 1);
    for &pos in set {
        match pos {
            0 => {
                ret.push(-1);
                ret.push(1);
            }
            p if p < 0 => ret.push(p - 1),
            p => ret.push(p + 1),
        }
    }
    ret
}
