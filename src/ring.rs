//! Equivalence classes of n×n grids summarised by their outermost ring.
//!
//!  x   x   2
//!  x   x   1
//! -2  -1   0
//!
//! A boundary stores, per colour, the sets of ring positions that are
//! connected to each other through the grown grid. The canonical form
//! is reached by sorting positions within each set, sorting sets by
//! their minimum, and then taking the minimum over the two involutions
//! the grid admits: swapping the colours, and reflecting along the
//! diagonal (which negates every position). For example
//!
//!   (-3 -1 0) | (-2) (1 2 3)
//!
//! flips by colour to `(-2) (1 2 3) | (-3 -1 0)`, by diagonal to
//! `(0 1 3) | (-3 -2 -1) (2)` and by both to
//! `(-3 -2 -1) (2) | (0 1 3)`, the lexicographically smallest of the
//! four.
//!
//! A single-colour frontier keeps one extra bit: whether the whole grid
//! is that colour (`solid`) or the interior already holds the other
//! colour (`bicolor`). Solid boundaries are coloured White.

use crate::colorings::{Coloring, BLACK, WHITE};
use crate::partition::{EdgePartition, EdgeSet};
use crate::unionfind::{Cell, UnionFind};
use rustc_hash::FxHashMap;
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridBoundary {
    pub size: i32,
    pub solid: bool,
    pub white: EdgePartition,
    pub black: EdgePartition,
}

impl GridBoundary {
    /// The 1×1 grid: a solid frontier of one cell.
    pub fn initial() -> Self {
        Self {
            size: 1,
            solid: true,
            white: EdgePartition::new(vec![vec![0]]),
            black: EdgePartition::default(),
        }
    }

    pub fn set_count(&self) -> usize {
        self.white.len() + self.black.len()
    }

    /// Rewrites the boundary as the canonical representative of its
    /// equivalence class.
    pub fn make_canonical(&mut self) {
        self.white.sort();
        self.black.sort();

        let extremal = self.size - 1;
        if !self.black.is_empty() && self.black.sets[0][0] == -extremal {
            // Swap so that White owns the smallest edge.
            std::mem::swap(&mut self.white, &mut self.black);
        }

        if self.black.contains(extremal) {
            // The largest edge is Black: colour change + diagonal is
            // the only competing transform.
            let alt = self.black.diagonal_flip();
            if alt < self.white {
                self.black = self.white.diagonal_flip();
                self.white = alt;
            }
        } else {
            let alt = self.white.diagonal_flip();
            match alt.cmp(&self.white) {
                std::cmp::Ordering::Less => {
                    self.black = self.black.diagonal_flip();
                    self.white = alt;
                }
                std::cmp::Ordering::Equal => {
                    // White is symmetric; tie-break on Black alone.
                    let alt_black = self.black.diagonal_flip();
                    if alt_black < self.black {
                        self.black = alt_black;
                        self.white = alt;
                    }
                }
                std::cmp::Ordering::Greater => {}
            }
        }
    }

    /// A string unique to the canonical form, usable as a map key.
    pub fn key(&self) -> String {
        let mut buf = String::new();
        write!(buf, "{}", self.size).unwrap();
        if self.black.is_empty() {
            buf.push_str(if self.solid { ":solid" } else { ":bicolor" });
            return buf;
        }

        for set in &self.white.sets {
            buf.push_str(":W");
            for p in set {
                write!(buf, ",{p}").unwrap();
            }
        }
        for set in &self.black.sets {
            buf.push_str(":B");
            for p in set {
                write!(buf, ",{p}").unwrap();
            }
        }
        buf
    }

    /// ASCII rendering for debugging: lowercase letters for white sets,
    /// uppercase (from Z downward) for black sets, dots for the
    /// interior.
    pub fn plot(&self) -> String {
        let white_letters = b"abcdefghijklmnopqrstuvwxyz";
        let black_letters = b"ZYXWVUTSRQPONMLKJIHGFEDCBA";
        let n = self.size as usize;
        let mut right = vec![b'.'; n];
        let mut lower = vec![b'.'; n];
        let mut zero = b'.';

        let mut mark = |sets: &[EdgeSet], letters: &[u8]| {
            for (i, set) in sets.iter().enumerate() {
                for &pos in set {
                    match pos.cmp(&0) {
                        std::cmp::Ordering::Equal => zero = letters[i],
                        std::cmp::Ordering::Less => lower[(-pos) as usize] = letters[i],
                        std::cmp::Ordering::Greater => right[pos as usize] = letters[i],
                    }
                }
            }
        };
        mark(&self.white.sets, white_letters);
        mark(&self.black.sets, black_letters);

        let mut buf = String::new();
        for y in 0..n - 1 {
            for _ in 0..n - 1 {
                buf.push('.');
            }
            buf.push(right[n - 1 - y] as char);
            buf.push('\n');
        }
        for x in 0..n - 1 {
            buf.push(lower[n - 1 - x] as char);
        }
        buf.push(zero as char);
        buf.push('\n');
        buf
    }

    /// Attaches a coloured ring of 2n+1 cells and returns the canonical
    /// boundary of the (n+1)×(n+1) grid.
    ///
    /// New bottom cells sit below the old cell one position to the
    /// right; new right cells sit right of the old cell one position
    /// down; the corner touches only its two neighbours on the new
    /// ring:
    ///
    /// ```text
    ///        2 -> 3
    ///        1 -> 2
    /// -2 -1  0 -> 1
    ///  |  |  |
    ///  V  V  V
    /// -3 -2 -1    0
    /// ```
    pub fn expand(&self, border: &Coloring) -> GridBoundary {
        let n = self.size;
        if border.len() != (2 * n + 1) as usize {
            panic!(
                "incomplete border: {} cells for a ring of {}",
                border.len(),
                2 * n + 1
            );
        }

        let mut uf = UnionFind::new();
        for i in -(n - 1)..=(n - 1) {
            uf.make_set(Cell::new(n, i));
        }
        for i in -n..=n {
            uf.make_set(Cell::new(n + 1, i));
        }

        // Colours of the old ring, dense by offset position.
        let offset = n - 1;
        let mut old_colors = vec![WHITE; (2 * n - 1) as usize];
        let preunion = |sets: &[EdgeSet], color: u8, uf: &mut UnionFind,
                        old_colors: &mut Vec<u8>| {
            for set in sets {
                let first = Cell::new(n, set[0]);
                old_colors[(set[0] + offset) as usize] = color;
                for &p in &set[1..] {
                    uf.union(first, Cell::new(n, p));
                    old_colors[(p + offset) as usize] = color;
                }
            }
        };
        preunion(&self.white.sets, WHITE, &mut uf, &mut old_colors);
        preunion(&self.black.sets, BLACK, &mut uf, &mut old_colors);

        let old_color = |p: i32| old_colors[(p + offset) as usize];

        // New bottom cells: stitch to the cell above and to the right
        // neighbour on the new ring (including the corner).
        for i in -n..0 {
            if border.get(i) == old_color(i + 1) {
                uf.union(Cell::new(n + 1, i), Cell::new(n, i + 1));
            }
            if border.get(i) == border.get(i + 1) {
                uf.union(Cell::new(n + 1, i), Cell::new(n + 1, i + 1));
            }
        }

        // New right cells: stitch to the cell on the left and to the
        // cell below on the new ring.
        for i in 1..=n {
            if border.get(i) == old_color(i - 1) {
                uf.union(Cell::new(n + 1, i), Cell::new(n, i - 1));
            }
            if border.get(i) == border.get(i - 1) {
                uf.union(Cell::new(n + 1, i), Cell::new(n + 1, i - 1));
            }
        }

        let mut white_groups: FxHashMap<Cell, EdgeSet> = FxHashMap::default();
        let mut black_groups: FxHashMap<Cell, EdgeSet> = FxHashMap::default();
        for i in -n..=n {
            let root = uf.find(Cell::new(n + 1, i));
            if border.get(i) == WHITE {
                white_groups.entry(root).or_default().push(i);
            } else {
                black_groups.entry(root).or_default().push(i);
            }
        }

        let white: Vec<EdgeSet> = white_groups.into_values().collect();
        let black: Vec<EdgeSet> = black_groups.into_values().collect();

        // A single-colour border must form one set.
        if white.is_empty() && black.len() != 1 {
            panic!("solid border split into {} black sets", black.len());
        }
        if black.is_empty() && white.len() != 1 {
            panic!("solid border split into {} white sets", white.len());
        }

        let mut ret = GridBoundary {
            size: n + 1,
            solid: self.solid && black.is_empty(),
            white: EdgePartition::new(white),
            black: EdgePartition::new(black),
        };
        ret.make_canonical();
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorings::IndicatorConfig;

    fn boundary(size: i32, white: Vec<EdgeSet>, black: Vec<EdgeSet>) -> GridBoundary {
        GridBoundary {
            size,
            solid: false,
            white: EdgePartition::new(white),
            black: EdgePartition::new(black),
        }
    }

    #[test]
    fn test_make_canonical_cases() {
        let cases = vec![
            (
                // ..x
                // ..x
                // YYx
                boundary(3, vec![vec![1, 2, 0]], vec![vec![-1, -2]]),
                boundary(3, vec![vec![-2, -1]], vec![vec![0, 1, 2]]),
            ),
            (
                // ..x
                // ..Y
                // xYZ
                boundary(3, vec![vec![2, -2], vec![0]], vec![vec![-1, 1]]),
                boundary(3, vec![vec![-2, 2], vec![0]], vec![vec![-1, 1]]),
            ),
            (
                // ...c
                // ...c
                // ...D
                // aBaD
                boundary(4, vec![vec![-3, -1], vec![2, 3]], vec![vec![-2], vec![1, 0]]),
                boundary(4, vec![vec![-3, -2], vec![1, 3]], vec![vec![-1, 0], vec![2]]),
            ),
            (
                // ...a
                // ...D
                // ...a
                // aBaC
                boundary(
                    4,
                    vec![vec![3, 1, -3, -1]],
                    vec![vec![2], vec![0], vec![-2]],
                ),
                boundary(
                    4,
                    vec![vec![-3, -1, 1, 3]],
                    vec![vec![-2], vec![0], vec![2]],
                ),
            ),
        ];

        for (mut input, expected) in cases {
            input.make_canonical();
            assert_eq!(input, expected, "key {}", input.key());
        }
    }

    fn random_boundary(rng: &mut impl rand::Rng, n: i32) -> GridBoundary {
        // Random membership tags for the 2n-1 edges; even tags go to
        // White, odd to Black. Many of these partitions cannot occur in
        // a real grid, but canonicalisation must still be coherent.
        let mut members: FxHashMap<i32, EdgeSet> = FxHashMap::default();
        for pos in -(n - 1)..=(n - 1) {
            let tag = rng.gen_range(0..2 * n - 1);
            members.entry(tag).or_default().push(pos);
        }
        let mut white = Vec::new();
        let mut black = Vec::new();
        for (tag, edges) in members {
            if tag % 2 == 0 {
                white.push(edges);
            } else {
                black.push(edges);
            }
        }
        boundary(n, white, black)
    }

    #[test]
    fn test_canonical_is_invariant() {
        use rand::seq::SliceRandom;
        let mut rng = rand::thread_rng();
        let n = 5;

        for _ in 0..200 {
            let orig = random_boundary(&mut rng, n);
            let mut canonical = orig.clone();
            canonical.make_canonical();

            let mut color_swap = orig.clone();
            std::mem::swap(&mut color_swap.white, &mut color_swap.black);
            color_swap.make_canonical();
            assert_eq!(canonical, color_swap, "colour swap changed the class");

            let mut diag = orig.clone();
            diag.white = diag.white.diagonal_flip();
            diag.black = diag.black.diagonal_flip();
            diag.make_canonical();
            assert_eq!(canonical, diag, "diagonal flip changed the class");

            let mut both = orig.clone();
            let flipped_white = both.white.diagonal_flip();
            both.white = both.black.diagonal_flip();
            both.black = flipped_white;
            both.make_canonical();
            assert_eq!(canonical, both, "combined flip changed the class");

            let mut reorder = orig.clone();
            reorder.white.sets.shuffle(&mut rng);
            reorder.black.sets.shuffle(&mut rng);
            for set in &mut reorder.white.sets {
                set.shuffle(&mut rng);
            }
            reorder.make_canonical();
            assert_eq!(canonical, reorder, "reordering changed the class");
        }
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let mut b = random_boundary(&mut rng, 4);
            b.make_canonical();
            let once = b.clone();
            b.make_canonical();
            assert_eq!(b, once);
        }
    }

    #[test]
    fn test_key_formats() {
        assert_eq!(GridBoundary::initial().key(), "1:solid");

        let mut covered = GridBoundary {
            size: 2,
            solid: false,
            white: EdgePartition::new(vec![vec![-1, 0, 1]]),
            black: EdgePartition::default(),
        };
        covered.make_canonical();
        assert_eq!(covered.key(), "2:bicolor");

        let mut two = boundary(3, vec![vec![0, 1, 2]], vec![vec![-1, -2]]);
        two.make_canonical();
        assert_eq!(two.key(), "3:W,-2,-1:B,0,1,2");
    }

    #[test]
    fn test_expand_example() {
        // ...          ....
        // .XX    ->    .XXX
        // .X.          .X..
        //              .X.X
        let before = boundary(3, vec![vec![-2, 2], vec![0]], vec![vec![-1, 1]]);

        let config = IndicatorConfig { size: 7, offset: 3 };
        let mut border = Coloring::new(config);
        for (i, color) in [0u8, 1, 0, 1, 0, 1, 0].into_iter().enumerate() {
            border.set(i as i32 - 3, color);
        }

        let actual = before.expand(&border);

        let expected = boundary(
            4,
            vec![vec![-3, 3], vec![-1, 1]],
            vec![vec![-2, 2], vec![0]],
        );
        assert_eq!(actual, expected, "got {}", actual.key());
    }

    #[test]
    fn test_expand_matches_flood_fill() {
        // Expanding the 4×4 class of a random 5×5 grid with the grid's
        // outer ring lands on the class the flood fill computes for the
        // full grid.
        use ndarray::s;
        use rand::Rng;
        let mut rng = rand::thread_rng();

        for _ in 0..300 {
            let colors =
                ndarray::Array2::from_shape_fn((5, 5), |_| rng.gen_range(0..2u8));

            // Solid boundaries are White by convention; an all-black
            // interior would need its border recoloured to match.
            if colors.slice(s![0..4, 0..4]).iter().all(|&c| c == 1) {
                continue;
            }

            let inner = crate::dfs::edge_class_for_grid(&colors.slice(s![0..4, 0..4]));

            let config = IndicatorConfig { size: 9, offset: 4 };
            let mut border = Coloring::new(config);
            for x in 0..=4 {
                border.set(x - 4, colors[[4, x as usize]]);
            }
            for y in 0..4 {
                border.set(4 - y, colors[[y as usize, 4]]);
            }

            let actual = inner.expand(&border);

            let mut expected = crate::dfs::edge_class_for_grid(&colors.view());
            expected.make_canonical();
            assert_eq!(actual, expected, "grid {colors:?}");
        }
    }

    #[test]
    #[should_panic(expected = "incomplete border")]
    fn test_expand_rejects_short_border() {
        let config = IndicatorConfig { size: 3, offset: 1 };
        let border = Coloring::new(config);
        boundary(3, vec![vec![-2, -1, 0, 1, 2]], vec![]).expand(&border);
    }

    #[test]
    fn test_sealing_a_solid_grid_is_not_solid() {
        // Wrapping the opposite colour around a solid grid leaves a
        // single-colour frontier with the first colour inside: bicolor,
        // never solid.
        let config = IndicatorConfig { size: 3, offset: 1 };
        let sealed = GridBoundary::initial().expand(&Coloring::filled(config, 1));
        assert_eq!(sealed.key(), "2:bicolor");
        assert!(!sealed.solid);
        assert_eq!(sealed.set_count(), 1);
    }
}
