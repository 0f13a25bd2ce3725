//! Equivalence classes of W×H grids summarised by their bottom row.
//!
//!  x   x   x
//!  0   1   2
//!
//! The canonical form minimises over colour interchange and the mirror
//! across the vertical midline, `p -> (W-1) - p`. Solid rows are
//! coloured White. The key omits the height on purpose: the successors
//! of a row class are the same at every height, so one cached list
//! serves the whole run.

use crate::colorings::{Coloring, BLACK, WHITE};
use crate::partition::{EdgePartition, EdgeSet};
use crate::unionfind::RowUnionFind;
use rustc_hash::FxHashMap;
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRectangle {
    pub width: i32,
    pub height: i32,
    pub solid: bool,
    pub white: EdgePartition,
    pub black: EdgePartition,
}

impl GridRectangle {
    pub fn set_count(&self) -> usize {
        self.white.len() + self.black.len()
    }

    pub fn make_canonical(&mut self) {
        self.white.sort();
        self.black.sort();

        // The smallest edge is 0.
        if !self.black.is_empty() && self.black.sets[0][0] == 0 {
            std::mem::swap(&mut self.white, &mut self.black);
        }

        let extremal = self.width - 1;
        if self.black.contains(extremal) {
            let alt = self.black.midpoint_flip(self.width);
            if alt < self.white {
                self.black = self.white.midpoint_flip(self.width);
                self.white = alt;
            }
        } else {
            let alt = self.white.midpoint_flip(self.width);
            match alt.cmp(&self.white) {
                std::cmp::Ordering::Less => {
                    self.black = self.black.midpoint_flip(self.width);
                    self.white = alt;
                }
                std::cmp::Ordering::Equal => {
                    let alt_black = self.black.midpoint_flip(self.width);
                    if alt_black < self.black {
                        self.black = alt_black;
                        self.white = alt;
                    }
                }
                std::cmp::Ordering::Greater => {}
            }
        }
    }

    pub fn key(&self) -> String {
        let mut buf = String::new();
        write!(buf, "{}", self.width).unwrap();
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

    /// One-line rendering of the bottom row; same letter scheme as the
    /// ring plot.
    pub fn plot(&self) -> String {
        let white_letters = b"abcdefghijklmnopqrstuvwxyz";
        let black_letters = b"ZYXWVUTSRQPONMLKJIHGFEDCBA";
        let mut lower = vec![b'.'; self.width as usize];

        for (i, set) in self.white.sets.iter().enumerate() {
            for &pos in set {
                lower[pos as usize] = white_letters[i];
            }
        }
        for (i, set) in self.black.sets.iter().enumerate() {
            for &pos in set {
                lower[pos as usize] = black_letters[i];
            }
        }
        String::from_utf8(lower).unwrap()
    }

    /// Attaches a coloured row of W cells below the current bottom edge
    /// and returns the canonical class one row taller.
    pub fn expand(&self, border: &Coloring) -> GridRectangle {
        let width = self.width as usize;
        if border.len() != width {
            panic!(
                "incomplete row: {} cells for width {}",
                border.len(),
                width
            );
        }

        let mut uf = RowUnionFind::new(width);

        let mut old_colors = vec![WHITE; width];
        let preunion = |sets: &[EdgeSet], color: u8, uf: &mut RowUnionFind,
                        old_colors: &mut Vec<u8>| {
            for set in sets {
                let first = set[0] as usize;
                old_colors[first] = color;
                for &p in &set[1..] {
                    uf.union_cell(0, first, 0, p as usize);
                    old_colors[p as usize] = color;
                }
            }
        };
        preunion(&self.white.sets, WHITE, &mut uf, &mut old_colors);
        preunion(&self.black.sets, BLACK, &mut uf, &mut old_colors);

        for x in 0..width {
            // Same colour as the cell above?
            if border.get(x as i32) == old_colors[x] {
                uf.union_cell(1, x, 0, x);
            }
            // Same colour as the cell to the left?
            if x > 0 && border.get(x as i32) == border.get(x as i32 - 1) {
                uf.union_cell(1, x, 1, x - 1);
            }
        }

        let mut white_groups: FxHashMap<usize, EdgeSet> = FxHashMap::default();
        let mut black_groups: FxHashMap<usize, EdgeSet> = FxHashMap::default();
        for x in 0..width {
            let root = uf.find_cell(1, x);
            if border.get(x as i32) == WHITE {
                white_groups.entry(root).or_default().push(x as i32);
            } else {
                black_groups.entry(root).or_default().push(x as i32);
            }
        }

        let white: Vec<EdgeSet> = white_groups.into_values().collect();
        let black: Vec<EdgeSet> = black_groups.into_values().collect();

        if white.is_empty() && black.len() != 1 {
            panic!("solid row split into {} black sets", black.len());
        }
        if black.is_empty() && white.len() != 1 {
            panic!("solid row split into {} white sets", white.len());
        }

        let mut ret = GridRectangle {
            width: self.width,
            height: self.height + 1,
            solid: self.solid && black.is_empty(),
            white: EdgePartition::new(white),
            black: EdgePartition::new(black),
        };
        ret.make_canonical();
        ret
    }
}
