//! Disjoint-set structures used to stitch a freshly attached frontier
//! onto an existing boundary. Both variants do path compression and
//! union by rank; both are built per expansion and thrown away.

use rustc_hash::FxHashMap;

/// A cell of the growing grid, identified by the ring it sits on and its
/// position along that ring. Position 0 is the lower-right corner,
/// negative positions run along the bottom edge, positive ones up the
/// right edge.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Cell {
    pub layer: i32,
    pub position: i32,
}

impl Cell {
    pub fn new(layer: i32, position: i32) -> Self {
        Self { layer, position }
    }
}

/// Union-find keyed by [`Cell`], covering the two rings involved in one
/// ring expansion. `find` on a cell that was never `make_set` is a
/// logic error in the caller and panics.
pub struct UnionFind {
    parent: FxHashMap<Cell, Cell>,
    rank: FxHashMap<Cell, u32>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self {
            parent: FxHashMap::default(),
            rank: FxHashMap::default(),
        }
    }

    pub fn make_set(&mut self, key: Cell) {
        self.parent.insert(key, key);
        self.rank.insert(key, 0);
    }

    pub fn find(&mut self, key: Cell) -> Cell {
        let mut root = *self
            .parent
            .get(&key)
            .unwrap_or_else(|| panic!("find on unknown cell {key:?}"));
        if root == key {
            return key;
        }
        while self.parent[&root] != root {
            root = self.parent[&root];
        }

        // Point the whole path at the root.
        let mut current = key;
        while current != root {
            let next = self.parent[&current];
            self.parent.insert(current, root);
            current = next;
        }
        root
    }

    pub fn union(&mut self, a: Cell, b: Cell) {
        let a_root = self.find(a);
        let b_root = self.find(b);
        if a_root == b_root {
            return;
        }

        let a_rank = self.rank[&a_root];
        let b_rank = self.rank[&b_root];
        match a_rank.cmp(&b_rank) {
            std::cmp::Ordering::Greater => {
                self.parent.insert(b_root, a_root);
            }
            std::cmp::Ordering::Less => {
                self.parent.insert(a_root, b_root);
            }
            std::cmp::Ordering::Equal => {
                self.parent.insert(b_root, a_root);
                self.rank.insert(a_root, a_rank + 1);
            }
        }
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

/// Union-find specialised for the two-row case: keys are `y * width + x`
/// for `y` in `{0, 1}`, so the whole universe is `[0, 2 * width)` and
/// the forest lives in two flat vectors.
pub struct RowUnionFind {
    width: usize,
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl RowUnionFind {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            parent: (0..2 * width).collect(),
            rank: vec![0; 2 * width],
        }
    }

    pub fn find_cell(&mut self, y: usize, x: usize) -> usize {
        self.find(y * self.width + x)
    }

    pub fn find(&mut self, key: usize) -> usize {
        let mut root = self.parent[key];
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = key;
        while current != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    pub fn union_cell(&mut self, y1: usize, x1: usize, y2: usize, x2: usize) {
        self.union(y1 * self.width + x1, y2 * self.width + x2)
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let a_root = self.find(a);
        let b_root = self.find(b);
        if a_root == b_root {
            return;
        }

        match self.rank[a_root].cmp(&self.rank[b_root]) {
            std::cmp::Ordering::Greater => self.parent[b_root] = a_root,
            std::cmp::Ordering::Less => self.parent[a_root] = b_root,
            std::cmp::Ordering::Equal => {
                self.parent[b_root] = a_root;
                self.rank[a_root] += 1;
            }
        }
    }
}
