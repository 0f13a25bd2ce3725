//! Flood-fill reference: computes boundary classes and region counts
//! directly from a fully coloured grid. Used by the exhaustive mode and
//! as the oracle the expansion tests compare against.

use crate::partition::EdgePartition;
use crate::ring::GridBoundary;
use crate::row::GridRectangle;
use crate::unionfind::Cell;
use ndarray::{s, Array2, ArrayView2};

/// Padding colour for grids that are not square.
pub const NO_COLOR: u8 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The ring coordinates of this square: the ring index is one past
    /// the larger axis, the position is the (signed) offset from the
    /// diagonal.
    pub fn to_cell(self) -> Cell {
        match self.x.cmp(&self.y) {
            std::cmp::Ordering::Equal => Cell::new(self.x + 1, 0),
            std::cmp::Ordering::Greater => Cell::new(self.x + 1, self.x - self.y),
            std::cmp::Ordering::Less => Cell::new(self.y + 1, self.x - self.y),
        }
    }

    fn index(self) -> (usize, usize) {
        (self.y as usize, self.x as usize)
    }

    fn neighbors(self) -> [Coord; 4] {
        [
            Coord::new(self.x - 1, self.y),
            Coord::new(self.x + 1, self.y),
            Coord::new(self.x, self.y - 1),
            Coord::new(self.x, self.y + 1),
        ]
    }
}

/// Collects the monochromatic component containing `start`, marking it
/// visited; returns nothing if `start` was already visited.
pub fn connected_component(
    colors: &ArrayView2<u8>,
    start: Coord,
    visited: &mut Array2<bool>,
) -> Vec<Coord> {
    let (rows, cols) = (colors.nrows() as i32, colors.ncols() as i32);
    let mut component = Vec::new();
    if visited[start.index()] {
        return component;
    }

    let mut to_see = vec![start];
    visited[start.index()] = true;
    while let Some(curr) = to_see.pop() {
        component.push(curr);
        for next in curr.neighbors() {
            if next.x < 0 || next.x >= cols || next.y < 0 || next.y >= rows {
                continue;
            }
            if !visited[next.index()] && colors[next.index()] == colors[curr.index()] {
                visited[next.index()] = true;
                to_see.push(next);
            }
        }
    }
    component
}

/// True when the grid splits into exactly two monochromatic regions.
pub fn has_two_regions(colors: &ArrayView2<u8>) -> bool {
    let mut visited = Array2::from_elem(colors.raw_dim(), false);
    let mut components = 0;
    for y in 0..colors.nrows() as i32 {
        for x in 0..colors.ncols() as i32 {
            if !connected_component(colors, Coord::new(x, y), &mut visited).is_empty() {
                components += 1;
                if components > 2 {
                    return false;
                }
            }
        }
    }
    components == 2
}

/// The (non-canonical) ring class of a coloured n×n grid: one edge set
/// per component touching the outer ring, holding the ring positions
/// the component occupies.
pub fn edge_class_for_grid(colors: &ArrayView2<u8>) -> GridBoundary {
    let n = colors.nrows() as i32;
    assert_eq!(colors.ncols() as i32, n, "ring classes need a square grid");

    let mut visited = Array2::from_elem(colors.raw_dim(), false);
    let mut white = Vec::new();
    let mut black = Vec::new();
    let mut components = 0;

    let mut add_component = |component: Vec<Coord>, color: u8,
                             white: &mut Vec<Vec<i32>>,
                             black: &mut Vec<Vec<i32>>| {
        if component.is_empty() {
            return;
        }
        components += 1;

        let edges: Vec<i32> = component
            .iter()
            .filter_map(|c| {
                let cell = c.to_cell();
                (cell.layer == n).then_some(cell.position)
            })
            .collect();

        if color == 0 {
            white.push(edges);
        } else {
            black.push(edges);
        }
    };

    for x in 0..n {
        let start = Coord::new(x, n - 1);
        let color = colors[start.index()];
        let component = connected_component(colors, start, &mut visited);
        add_component(component, color, &mut white, &mut black);
    }
    for y in 0..n - 1 {
        let start = Coord::new(n - 1, y);
        let color = colors[start.index()];
        let component = connected_component(colors, start, &mut visited);
        add_component(component, color, &mut white, &mut black);
    }

    let solid = components == 1 && solid_color(colors);

    GridBoundary {
        size: n,
        solid,
        white: EdgePartition::new(white),
        black: EdgePartition::new(black),
    }
}

/// The (non-canonical) row class of a coloured H×W grid, H ≤ W. The
/// grid is padded to W×W with a sentinel colour so the square walk can
/// be reused; the padding never joins a real component.
pub fn rectangle_class_for_grid(colors: &ArrayView2<u8>) -> GridRectangle {
    let height = colors.nrows() as i32;
    let width = colors.ncols() as i32;
    assert!(
        height <= width,
        "row classes grow downward; height must not exceed width"
    );

    let mut padded = Array2::from_elem((width as usize, width as usize), NO_COLOR);
    padded
        .slice_mut(s![0..height as usize, 0..width as usize])
        .assign(colors);
    let padded = padded.view();

    let mut visited = Array2::from_elem(padded.raw_dim(), false);
    let mut white = Vec::new();
    let mut black = Vec::new();
    let mut components = 0;

    for x in 0..width {
        let start = Coord::new(x, height - 1);
        let color = padded[start.index()];
        let component = connected_component(&padded, start, &mut visited);
        if component.is_empty() {
            continue;
        }
        components += 1;

        let edges: Vec<i32> = component
            .iter()
            .filter_map(|c| (c.y == height - 1).then_some(c.x))
            .collect();

        if color == 0 {
            white.push(edges);
        } else {
            black.push(edges);
        }
    }

    let solid = components == 1 && solid_color(colors);

    GridRectangle {
        width,
        height,
        solid,
        white: EdgePartition::new(white),
        black: EdgePartition::new(black),
    }
}

fn solid_color(colors: &ArrayView2<u8>) -> bool {
    let first = colors[(0, 0)];
    colors.iter().all(|&c| c == first)
}
