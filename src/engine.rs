//! The enumeration engine: iteratively grows every boundary class by
//! one ring (square mode) or one row (rectangle mode), caching each
//! class's successor list the first time it is expanded and folding
//! weighted counts forward through the population.

use {
    crate::{
        colorings::{Coloring, IndicatorConfig, Product, SetGenerator, BLACK, WHITE},
        partition::EdgePartition,
        ring::GridBoundary,
        row::GridRectangle,
        Overwriter,
    },
    dashmap::DashMap,
    num_bigint::BigUint,
    rayon::prelude::*,
    rustc_hash::FxHashMap,
    std::collections::BTreeMap,
};

#[derive(Clone, Default)]
pub struct FxBuildHasher;

impl std::hash::BuildHasher for FxBuildHasher {
    type Hasher = rustc_hash::FxHasher;

    fn build_hasher(&self) -> Self::Hasher {
        rustc_hash::FxHasher::default()
    }
}

/// Engine configuration, passed explicitly to the drivers instead of
/// living in process globals.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub workers: usize,
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            verbose: false,
        }
    }
}

/// One successor of an expanded class: the canonical child and how many
/// distinct border colourings of the parent produce it.
#[derive(Clone, Debug)]
pub struct Expansion<F> {
    pub key: String,
    pub class: F,
    pub count: u64,
}

/// What the engine needs from a boundary class. Implemented by the
/// ring and row variants; the enumeration loop is shared.
pub trait Frontier: Clone + Send + Sync {
    fn key(&self) -> String;
    fn plot(&self) -> String;
    /// Total number of edge sets across both colours.
    fn set_count(&self) -> usize;
    fn is_solid(&self) -> bool;
    /// All canonical children with their colouring multiplicities.
    fn children(&self) -> Vec<Expansion<Self>>
    where
        Self: Sized;
}

fn add_expansion<F: Frontier>(by_key: &mut FxHashMap<String, Expansion<F>>, class: F) {
    let key = class.key();
    if let Some(existing) = by_key.get_mut(&key) {
        existing.count += 1;
    } else {
        by_key.insert(
            key.clone(),
            Expansion {
                key,
                class,
                count: 1,
            },
        );
    }
}

impl Frontier for GridBoundary {
    fn key(&self) -> String {
        GridBoundary::key(self)
    }

    fn plot(&self) -> String {
        GridBoundary::plot(self)
    }

    fn set_count(&self) -> usize {
        GridBoundary::set_count(self)
    }

    fn is_solid(&self) -> bool {
        self.solid
    }

    fn children(&self) -> Vec<Expansion<GridBoundary>> {
        let config = IndicatorConfig {
            size: (2 * self.size + 1) as usize,
            offset: self.size,
        };

        // A single-colour border around a two-colour grid can only grow
        // by wrapping the same colour around it again.
        if self.black.is_empty() && !self.solid {
            let class = self.expand(&Coloring::filled(config, WHITE));
            return vec![Expansion {
                key: class.key(),
                class,
                count: 1,
            }];
        }

        let mut by_key = FxHashMap::default();

        // A lone set of either colour may be sealed behind a solid ring
        // of the other colour.
        if self.white.len() == 1 {
            add_expansion(&mut by_key, self.expand(&Coloring::filled(config, BLACK)));
        }
        if self.black.len() == 1 {
            add_expansion(&mut by_key, self.expand(&Coloring::filled(config, WHITE)));
        }

        // Otherwise every existing set must reach the new ring
        // somewhere, or its region would be cut off for good. The
        // corner square touches no old cell and is free.
        let white_expansion = self.white.expand();
        let black_expansion = self.black.expand();

        let mut generators =
            Vec::with_capacity(white_expansion.len() + black_expansion.len() + 1);
        for set in &white_expansion.sets {
            generators.push(SetGenerator::MandatoryZero(set.clone()));
        }
        generators.push(SetGenerator::FreeChoice(0));
        for set in &black_expansion.sets {
            generators.push(SetGenerator::MandatoryOne(set.clone()));
        }

        for border in Product::new(config, generators) {
            add_expansion(&mut by_key, self.expand(&border));
        }

        by_key.into_values().collect()
    }
}

impl Frontier for GridRectangle {
    fn key(&self) -> String {
        GridRectangle::key(self)
    }

    fn plot(&self) -> String {
        GridRectangle::plot(self)
    }

    fn set_count(&self) -> usize {
        GridRectangle::set_count(self)
    }

    fn is_solid(&self) -> bool {
        self.solid
    }

    fn children(&self) -> Vec<Expansion<GridRectangle>> {
        let config = IndicatorConfig {
            size: self.width as usize,
            offset: 0,
        };

        if self.black.is_empty() && !self.solid {
            let class = self.expand(&Coloring::filled(config, WHITE));
            return vec![Expansion {
                key: class.key(),
                class,
                count: 1,
            }];
        }

        let mut by_key = FxHashMap::default();

        if self.white.len() == 1 {
            add_expansion(&mut by_key, self.expand(&Coloring::filled(config, BLACK)));
        }
        if self.black.len() == 1 {
            add_expansion(&mut by_key, self.expand(&Coloring::filled(config, WHITE)));
        }

        // Every set extends straight down into the new row.
        let mut generators = Vec::with_capacity(self.white.len() + self.black.len());
        for set in &self.white.sets {
            generators.push(SetGenerator::MandatoryZero(set.clone()));
        }
        for set in &self.black.sets {
            generators.push(SetGenerator::MandatoryOne(set.clone()));
        }

        for border in Product::new(config, generators) {
            add_expansion(&mut by_key, self.expand(&border));
        }

        by_key.into_values().collect()
    }
}

/// The shared engine state: population counts per class, the lazily
/// filled successor cache, and the classes discovered last wave that
/// still need expanding.
pub struct SuccessorMap<F: Frontier> {
    config: EngineConfig,

    /// key -> [(successor key, multiplicity)], computed at most once.
    successors: DashMap<String, Vec<(String, u64)>, FxBuildHasher>,

    /// Classes discovered in the current wave, keyed for dedup.
    next_classes: DashMap<String, F, FxBuildHasher>,

    /// Keys whose class has exactly two regions.
    valid: DashMap<String, (), FxBuildHasher>,

    /// Classes whose successors are not cached yet.
    new_classes: Vec<F>,

    /// How many grids realise each class at the current height.
    counts: FxHashMap<String, BigUint>,
}

fn check_valid<F: Frontier>(valid: &DashMap<String, (), FxBuildHasher>, key: &str, class: &F) {
    let sets = class.set_count();
    if sets == 2 || (sets == 1 && !class.is_solid()) {
        valid.insert(key.to_string(), ());
    }
}

impl<F: Frontier> SuccessorMap<F> {
    pub fn new(config: EngineConfig, starting: Vec<Expansion<F>>) -> Self {
        let mut map = Self {
            config,
            successors: DashMap::with_hasher(FxBuildHasher),
            next_classes: DashMap::with_hasher(FxBuildHasher),
            valid: DashMap::with_hasher(FxBuildHasher),
            new_classes: Vec::with_capacity(starting.len()),
            counts: FxHashMap::default(),
        };
        for expansion in starting {
            check_valid(&map.valid, &expansion.key, &expansion.class);
            map.counts
                .insert(expansion.key, BigUint::from(expansion.count));
            map.new_classes.push(expansion.class);
        }
        map
    }

    /// Grows every class in the population by one ring/row: expands the
    /// classes that have no cached successor list, then rebuilds the
    /// population from the cache.
    pub fn iterate(&mut self) {
        // Placeholders keep a queued class from being re-discovered by
        // a concurrent worker.
        for class in &self.new_classes {
            self.successors.insert(class.key(), Vec::new());
        }

        let successors = &self.successors;
        let next_classes = &self.next_classes;
        let valid = &self.valid;
        let verbose = self.config.verbose;

        self.new_classes.par_iter().for_each(|class| {
            let class_key = class.key();
            if verbose {
                println!("expanding {} {}", class.plot(), class_key);
            }

            let expansions = class.children();
            let mut list = Vec::with_capacity(expansions.len());
            for expansion in expansions {
                if !successors.contains_key(&expansion.key) {
                    if verbose {
                        println!(
                            " {} {} {} NEW",
                            expansion.class.plot(),
                            expansion.count,
                            expansion.key
                        );
                    }
                    check_valid(valid, &expansion.key, &expansion.class);
                    next_classes.insert(expansion.key.clone(), expansion.class);
                } else if verbose {
                    println!(" {} {}", expansion.count, expansion.key);
                }
                list.push((expansion.key, expansion.count));
            }
            successors.insert(class_key, list);
        });

        let next = std::mem::replace(&mut self.next_classes, DashMap::with_hasher(FxBuildHasher));
        self.new_classes = next.into_iter().map(|(_, class)| class).collect();

        // Big-integer accumulation stays single-threaded; totals cannot
        // depend on worker scheduling.
        let mut new_counts: FxHashMap<String, BigUint> = FxHashMap::default();
        for (key, count) in &self.counts {
            let successors = self
                .successors
                .get(key)
                .unwrap_or_else(|| panic!("no successors recorded for {key}"));
            for (child_key, multiplicity) in successors.iter() {
                *new_counts.entry(child_key.clone()).or_default() +=
                    BigUint::from(*multiplicity) * count;
            }
        }
        self.counts = new_counts;
    }

    /// Grids whose class has exactly two regions at the current height.
    pub fn valid_count(&self) -> BigUint {
        let mut total = BigUint::default();
        for (key, count) in &self.counts {
            if self.valid.contains_key(key) {
                total += count;
            }
        }
        total
    }

    pub fn class_count(&self) -> usize {
        self.counts.len()
    }

    pub fn pending_classes(&self) -> usize {
        self.new_classes.len()
    }

    pub fn population(&self) -> &FxHashMap<String, BigUint> {
        &self.counts
    }
}

/// Per-size result: the sequence term and how many classes the
/// population held.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeResult {
    pub grids: BigUint,
    pub classes: usize,
}

/// Square mode: grow rings outward from the 1×1 grid, reporting every
/// requested size on the way up (all smaller sizes are computed
/// anyway).
pub fn square_enumeration(cases: &[i32], config: EngineConfig) -> BTreeMap<i32, SizeResult> {
    let mut cases = cases.to_vec();
    cases.sort_unstable();
    cases.dedup();

    let mut results = BTreeMap::new();
    let Some(&max) = cases.last() else {
        return results;
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .expect("building worker pool");

    let initial = GridBoundary::initial();
    let mut map = SuccessorMap::new(
        config,
        vec![Expansion {
            key: initial.key(),
            class: initial,
            count: 2,
        }],
    );

    let mut progress = Overwriter::default();
    if cases.binary_search(&1).is_ok() {
        results.insert(1, report(1, &map));
    }

    for size in 2..=max {
        pool.install(|| map.iterate());

        if cases.binary_search(&size).is_ok() {
            progress.finish();
            results.insert(size, report(size, &map));
        } else if config.verbose {
            println!(" size={} classes={}", size, map.class_count());
        } else {
            progress.print(format!("size {size}/{max}: {} classes", map.class_count()));
        }
    }
    progress.finish();
    results
}

/// Rectangle mode: per requested width, build the first-row classes and
/// grow row by row to a square.
pub fn rectangle_enumeration(cases: &[i32], config: EngineConfig) -> BTreeMap<i32, SizeResult> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .expect("building worker pool");

    let mut results = BTreeMap::new();
    for &width in cases {
        let mut map = SuccessorMap::new(config, starting_classes(width));
        let mut progress = Overwriter::default();

        for height in 2..=width {
            pool.install(|| map.iterate());
            if config.verbose {
                println!(
                    " height={} classes={}+{}",
                    height,
                    map.class_count(),
                    map.pending_classes()
                );
            } else {
                progress.print(format!("width {width}: height {height}/{width}"));
            }
        }
        progress.finish();
        results.insert(width, report(width, &map));
    }
    results
}

fn report<F: Frontier>(size: i32, map: &SuccessorMap<F>) -> SizeResult {
    let result = SizeResult {
        grids: map.valid_count(),
        classes: map.class_count(),
    };
    println!(
        "**** N={} | grids={} | classes={}",
        size, result.grids, result.classes
    );
    result
}

/// Every valid first row of a width-wide rectangle, aggregated by
/// canonical class. A first row is valid with one, two or three
/// monochromatic runs; four or more runs could never reconnect their
/// outer components without crossing the middle one.
pub fn starting_classes(width: i32) -> Vec<Expansion<GridRectangle>> {
    let mut by_key: FxHashMap<String, Expansion<GridRectangle>> = FxHashMap::default();

    // Solid row, once per colour.
    let mut solid = GridRectangle {
        width,
        height: 1,
        solid: true,
        white: EdgePartition::new(vec![(0..width).collect()]),
        black: EdgePartition::default(),
    };
    solid.make_canonical();
    let key = solid.key();
    by_key.insert(
        key.clone(),
        Expansion {
            key,
            class: solid,
            count: 2,
        },
    );

    // Two runs; both colourings of every split. Mirrors collapse onto
    // the same class and accumulate.
    for split in 1..width {
        let left: Vec<i32> = (0..split).collect();
        let right: Vec<i32> = (split..width).collect();
        for (white, black) in [(left.clone(), right.clone()), (right, left)] {
            let mut class = GridRectangle {
                width,
                height: 1,
                solid: false,
                white: EdgePartition::new(vec![white]),
                black: EdgePartition::new(vec![black]),
            };
            class.make_canonical();
            add_expansion(&mut by_key, class);
        }
    }

    // Three runs a|b|a; colour inversion cannot alias here, mirrors
    // can.
    for left in 1..width - 1 {
        for right in left + 1..width {
            let outer_left: Vec<i32> = (0..left).collect();
            let middle: Vec<i32> = (left..right).collect();
            let outer_right: Vec<i32> = (right..width).collect();

            let mut outer_white = GridRectangle {
                width,
                height: 1,
                solid: false,
                white: EdgePartition::new(vec![outer_left.clone(), outer_right.clone()]),
                black: EdgePartition::new(vec![middle.clone()]),
            };
            outer_white.make_canonical();
            add_expansion(&mut by_key, outer_white);

            let mut outer_black = GridRectangle {
                width,
                height: 1,
                solid: false,
                white: EdgePartition::new(vec![middle]),
                black: EdgePartition::new(vec![outer_left, outer_right]),
            };
            outer_black.make_canonical();
            add_expansion(&mut by_key, outer_black);
        }
    }

    by_key.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(workers: usize) -> EngineConfig {
        EngineConfig {
            workers,
            verbose: false,
        }
    }

    #[test]
    fn test_initial_square_class() {
        let initial = GridBoundary::initial();
        assert_eq!(initial.key(), "1:solid");
        assert_eq!(initial.set_count(), 1);
        assert!(initial.is_solid());
    }

    #[test]
    fn test_starting_classes_w4() {
        let classes = starting_classes(4);
        assert_eq!(classes.len(), 5);

        // 2^4 rows minus the two alternating four-run rows.
        let total: u64 = classes.iter().map(|e| e.count).sum();
        assert_eq!(total, 14);

        let solid: Vec<_> = classes.iter().filter(|e| e.class.solid).collect();
        assert_eq!(solid.len(), 1);
        assert_eq!(solid[0].count, 2);
        assert_eq!(solid[0].key, "4:solid");

        let two_run: Vec<_> = classes
            .iter()
            .filter(|e| e.class.set_count() == 2)
            .collect();
        assert_eq!(two_run.len(), 2);
        assert_eq!(two_run.iter().map(|e| e.count).sum::<u64>(), 6);

        let three_run: Vec<_> = classes
            .iter()
            .filter(|e| e.class.set_count() == 3)
            .collect();
        assert_eq!(three_run.len(), 2);
        assert_eq!(three_run.iter().map(|e| e.count).sum::<u64>(), 6);
    }

    #[test]
    fn test_ring_children_of_initial() {
        let children = GridBoundary::initial().children();

        // Every colouring of the first real ring except the one that
        // strands the centre cell.
        let total: u64 = children.iter().map(|e| e.count).sum();
        assert_eq!(total, 7);

        let bicolor = children.iter().find(|e| e.key == "2:bicolor").unwrap();
        assert_eq!(bicolor.count, 1);
        assert!(!bicolor.class.solid);

        let solid = children.iter().find(|e| e.key == "2:solid").unwrap();
        assert_eq!(solid.count, 1);
        assert!(solid.class.solid);
    }

    #[test]
    fn test_bicolor_grows_single_file() {
        let children = GridBoundary::initial().children();
        let bicolor = children
            .into_iter()
            .find(|e| e.key == "2:bicolor")
            .unwrap();

        let grandchildren = bicolor.class.children();
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(grandchildren[0].count, 1);
        assert_eq!(grandchildren[0].key, "3:bicolor");
    }

    #[test]
    fn test_two_set_boundary_has_valid_successor() {
        // A one-white-set, one-black-set frontier always has a valid
        // two-region child.
        let mut boundary = GridBoundary {
            size: 3,
            solid: false,
            white: EdgePartition::new(vec![vec![-2, -1]]),
            black: EdgePartition::new(vec![vec![0, 1, 2]]),
        };
        boundary.make_canonical();

        let children = boundary.children();
        assert!(children
            .iter()
            .any(|e| e.class.set_count() == 2 || (e.class.set_count() == 1 && !e.class.solid)));
    }

    #[test]
    fn test_rectangle_n2_counts_twelve() {
        let results = rectangle_enumeration(&[2], quiet(2));
        assert_eq!(results[&2].grids, BigUint::from(12u32));
    }

    #[test]
    fn test_engine_matches_exhaustive() {
        for n in 2..=4 {
            let (valid, _) = crate::exhaustive::exhaustive_count(n, &quiet(4));

            let rectangle = rectangle_enumeration(&[n], quiet(4));
            assert_eq!(rectangle[&n].grids, BigUint::from(valid), "rectangle n={n}");

            let square = square_enumeration(&[n], quiet(4));
            assert_eq!(square[&n].grids, BigUint::from(valid), "square n={n}");
        }
    }

    #[test]
    fn test_square_and_rectangle_agree() {
        let sizes = [2, 3, 4, 5];
        let square = square_enumeration(&sizes, quiet(4));
        let rectangle = rectangle_enumeration(&sizes, quiet(4));
        for n in sizes {
            assert_eq!(square[&n].grids, rectangle[&n].grids, "n={n}");
        }
    }

    #[test]
    fn test_worker_count_does_not_change_results() {
        let single = rectangle_enumeration(&[5], quiet(1));
        let eight = rectangle_enumeration(&[5], quiet(8));
        assert_eq!(single, eight);
    }

    #[test]
    fn test_population_determinism_at_every_height() {
        let mut single = SuccessorMap::new(quiet(1), starting_classes(5));
        let mut eight = SuccessorMap::new(quiet(8), starting_classes(5));
        for _ in 2..=5 {
            single.iterate();
            eight.iterate();
            assert_eq!(single.population(), eight.population());
            assert_eq!(single.valid_count(), eight.valid_count());
        }
    }

    #[test]
    #[should_panic(expected = "no successors recorded")]
    fn test_missing_successors_is_fatal() {
        let mut map = SuccessorMap::new(quiet(1), starting_classes(3));
        map.counts.insert("3:W,9:B,8".into(), BigUint::from(1u32));
        map.iterate();
    }
}
