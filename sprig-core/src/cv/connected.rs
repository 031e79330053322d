// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Deref;

use crate::cv::Connectivity;
use crate::error::SprigError;
use crate::im::{Grid, Label, LabelGrid};

/// A union-find structure for finding and merging connected components
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    /// Initialize a new union-find object with `n` elements in `n` sets
    pub fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
            rank: vec![1; n],
        }
    }

    /// Add a new element in its own set and return it
    pub fn push(&mut self) -> usize {
        let x = self.parent.len();
        self.parent.push(x);
        self.rank.push(1);
        x
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Find the root of the set containing `x`
    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            // Path compression
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Merge sets containing `x` and `y`
    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x != root_y {
            match self.rank[root_x].cmp(&self.rank[root_y]) {
                Ordering::Greater => self.parent[root_y] = root_x,
                Ordering::Less => self.parent[root_x] = root_y,
                Ordering::Equal => {
                    self.parent[root_y] = root_x;
                    self.rank[root_x] += 1;
                }
            }
        }
    }

    /// Check if `x` and `y` belong to the same set
    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
}

/// Classes of provisional labels known to belong to the same region
///
/// Label `0` is reserved and never registered. The union-find root of a
/// class is arbitrary; the canonical label of a class is always its
/// smallest member.
///
/// # Examples
///
/// ```
/// use sprig_core::cv::EquivalenceTable;
///
/// let mut table = EquivalenceTable::new();
/// let a = table.register();
/// let b = table.register();
/// let c = table.register();
///
/// table.merge(c, b);
/// assert!(table.equivalent(b, c));
/// assert!(!table.equivalent(a, c));
/// assert_eq!(table.canonical_map(), vec![0, 1, 2, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct EquivalenceTable {
    sets: UnionFind,
}

impl Default for EquivalenceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EquivalenceTable {
    pub fn new() -> Self {
        // Slot 0 stands for the background and stays a singleton
        EquivalenceTable {
            sets: UnionFind::new(1),
        }
    }

    /// Register the next provisional label as a singleton class
    pub fn register(&mut self) -> Label {
        self.sets.push() as Label
    }

    /// Number of registered provisional labels
    pub fn len(&self) -> usize {
        self.sets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge the classes of `a` and `b`
    pub fn merge(&mut self, a: Label, b: Label) {
        self.sets.union(a as usize, b as usize);
    }

    /// Union-find root of the class containing `label`
    pub fn find(&mut self, label: Label) -> Label {
        self.sets.find(label as usize) as Label
    }

    /// Check if two labels belong to the same class
    pub fn equivalent(&mut self, a: Label, b: Label) -> bool {
        self.sets.connected(a as usize, b as usize)
    }

    /// Map every provisional label (by index) to the minimum label of its class
    ///
    /// Index `0` maps to `0`.
    pub fn canonical_map(&mut self) -> Vec<Label> {
        let n = self.sets.len();
        let mut minimum = vec![0 as Label; n];
        let mut canonical = vec![0 as Label; n];

        // Ascending scan means the first member seen of each root is its minimum
        for label in 1..n {
            let root = self.sets.find(label);
            if minimum[root] == 0 {
                minimum[root] = label as Label;
            }
            canonical[label] = minimum[root];
        }

        canonical
    }

    /// Canonical label of every class
    pub fn canonical_labels(&mut self) -> BTreeSet<Label> {
        self.canonical_map().into_iter().skip(1).collect()
    }

    /// Members of every class keyed by canonical label
    pub fn classes(&mut self) -> BTreeMap<Label, Vec<Label>> {
        let mut classes: BTreeMap<Label, Vec<Label>> = BTreeMap::new();

        for (label, canonical) in self.canonical_map().into_iter().enumerate().skip(1) {
            classes.entry(canonical).or_default().push(label as Label);
        }

        classes
    }
}

/// Assign provisional labels to the non-background cells of a row-major block
///
/// New labels are drawn from `table`. The first distinct labelled neighbour
/// (in causal inspection order) is given to the pixel and every other
/// distinct neighbour label is merged into its class.
pub(crate) fn scan<P: PartialEq>(
    pixels: &[P],
    width: u32,
    height: u32,
    background: &P,
    connectivity: Connectivity,
    table: &mut EquivalenceTable,
) -> Vec<Label> {
    let w = width as usize;
    let mut labels = vec![0 as Label; pixels.len()];
    let mut found: Vec<Label> = Vec::with_capacity(4);

    for y in 0..height {
        for x in 0..width {
            let idx = y as usize * w + x as usize;

            if pixels[idx] == *background {
                continue;
            }

            found.clear();
            for (nx, ny) in connectivity.causal_neighbors(x, y, width, height) {
                let neighbor = labels[ny as usize * w + nx as usize];
                if neighbor != 0 && !found.contains(&neighbor) {
                    found.push(neighbor);
                }
            }

            match found.as_slice() {
                [] => labels[idx] = table.register(),
                [first, rest @ ..] => {
                    labels[idx] = *first;
                    for &other in rest {
                        table.merge(*first, other);
                    }
                }
            }
        }
    }

    labels
}

/// Rewrite every provisional label to the minimum label of its class
pub(crate) fn canonicalize(labels: &mut [Label], table: &mut EquivalenceTable) {
    let canonical = table.canonical_map();

    for label in labels.iter_mut() {
        if *label != 0 {
            *label = canonical[*label as usize];
        }
    }
}

/// Single-pass connected component labeling of non-background pixels
///
/// Pixels equal to `background` are labelled `0`. Every maximal connected
/// region of other pixels (under `connectivity`) receives one canonical
/// label, the smallest provisional label assigned inside it. The
/// equivalence table is returned for diagnostics.
///
/// # Arguments
///
/// * `grid` - A row-major grid of pixels
/// * `background` - Pixel value excluded from every region
/// * `connectivity` - Neighbourhood that decides adjacency
///
/// # Examples
///
/// ```
/// use sprig_core::cv::{label, Connectivity};
/// use sprig_core::im::Grid;
///
/// let grid = Grid::new(3, 3, vec![1, 1, 0, 1, 0, 1, 0, 1, 1]).unwrap();
///
/// let (labels, _) = label(&grid, &0, Connectivity::Four).unwrap();
/// assert_eq!(labels.as_raw(), &[1, 1, 0, 1, 0, 2, 0, 2, 2]);
///
/// let (labels, _) = label(&grid, &0, Connectivity::Eight).unwrap();
/// assert_eq!(labels.as_raw(), &[1, 1, 0, 1, 0, 1, 0, 1, 1]);
/// ```
pub fn label<P, Container>(
    grid: &Grid<P, Container>,
    background: &P,
    connectivity: Connectivity,
) -> Result<(LabelGrid, EquivalenceTable), SprigError>
where
    P: PartialEq,
    Container: Deref<Target = [P]>,
{
    if grid.is_empty() {
        return Err(SprigError::EmptyInput);
    }

    let mut table = EquivalenceTable::new();
    let mut labels = scan(
        grid.as_raw(),
        grid.width(),
        grid.height(),
        background,
        connectivity,
        &mut table,
    );

    canonicalize(&mut labels, &mut table);

    Ok((Grid::new(grid.width(), grid.height(), labels)?, table))
}
