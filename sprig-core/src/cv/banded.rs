// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::ops::Deref;

use rayon::prelude::*;

use crate::cv::Connectivity;
use crate::cv::connected::{EquivalenceTable, canonicalize, label, scan};
use crate::error::SprigError;
use crate::im::{Grid, Label, LabelGrid};

/// Connected component labeling over independently scanned row bands
///
/// Rows are split into `bands` contiguous bands that are scanned in
/// parallel. Band labels are offset into one table, and classes are then
/// merged across each seam using the upward half of the causal window.
/// The partition matches `label` exactly; label values are deterministic
/// for a given band count but can differ from the sequential ones.
///
/// # Arguments
///
/// * `grid` - A row-major grid of pixels
/// * `background` - Pixel value excluded from every region
/// * `connectivity` - Neighbourhood that decides adjacency
/// * `bands` - Number of row bands (`0` or `1` scans sequentially)
///
/// # Examples
///
/// ```
/// use sprig_core::cv::{label_banded, Connectivity};
/// use sprig_core::im::Grid;
///
/// // A vertical bar crossing the seam between two bands
/// let grid = Grid::new(2, 4, vec![0, 1, 0, 1, 0, 1, 0, 1]).unwrap();
/// let (labels, _) = label_banded(&grid, &0, Connectivity::Four, 2).unwrap();
///
/// assert_eq!(labels.as_raw(), &[0, 1, 0, 1, 0, 1, 0, 1]);
/// ```
pub fn label_banded<P, Container>(
    grid: &Grid<P, Container>,
    background: &P,
    connectivity: Connectivity,
    bands: usize,
) -> Result<(LabelGrid, EquivalenceTable), SprigError>
where
    P: PartialEq + Sync,
    Container: Deref<Target = [P]>,
{
    if grid.is_empty() {
        return Err(SprigError::EmptyInput);
    }

    let width = grid.width();
    let height = grid.height();
    let bands = bands.clamp(1, height as usize);

    if bands == 1 {
        return label(grid, background, connectivity);
    }

    let w = width as usize;
    let band_rows = (height as usize).div_ceil(bands);

    let scanned: Vec<(Vec<Label>, EquivalenceTable)> = grid
        .as_raw()
        .par_chunks(band_rows * w)
        .map(|band| {
            let rows = (band.len() / w) as u32;
            let mut table = EquivalenceTable::new();
            let labels = scan(band, width, rows, background, connectivity, &mut table);
            (labels, table)
        })
        .collect();

    let mut table = EquivalenceTable::new();
    let mut labels: Vec<Label> = Vec::with_capacity(grid.len());

    for (band_labels, mut band_table) in scanned {
        let offset = table.len() as Label;
        let n = band_table.len() as Label;

        for _ in 0..n {
            table.register();
        }

        for local in 1..=n {
            let root = band_table.find(local);
            if root != local {
                table.merge(offset + local, offset + root);
            }
        }

        labels.extend(
            band_labels
                .into_iter()
                .map(|l| if l == 0 { 0 } else { l + offset }),
        );
    }

    // Seams: first row of each band against the last row of the band above
    for y in (band_rows as u32..height).step_by(band_rows) {
        for x in 0..width {
            let current = labels[y as usize * w + x as usize];
            if current == 0 {
                continue;
            }

            for (nx, ny) in connectivity.causal_neighbors(x, y, width, height) {
                let neighbor = labels[ny as usize * w + nx as usize];
                if ny < y && neighbor != 0 {
                    table.merge(current, neighbor);
                }
            }
        }
    }

    canonicalize(&mut labels, &mut table);

    Ok((Grid::new(width, height, labels)?, table))
}

#[cfg(test)]
mod test {

    use super::*;

    use std::collections::HashMap;

    // Deterministic pseudo-random binary grid
    fn noise(width: u32, height: u32, seed: u64, density: u64) -> Grid<u8, Vec<u8>> {
        let mut state = seed;
        let cells = (0..width * height)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) % 100 < density) as u8
            })
            .collect();

        Grid::new(width, height, cells).unwrap()
    }

    // Check two label grids induce the same partition
    fn same_partition(a: &LabelGrid, b: &LabelGrid) -> bool {
        let mut forward: HashMap<Label, Label> = HashMap::new();
        let mut backward: HashMap<Label, Label> = HashMap::new();

        a.iter().zip(b.iter()).all(|(&la, &lb)| {
            if (la == 0) != (lb == 0) {
                return false;
            }
            *forward.entry(la).or_insert(lb) == lb && *backward.entry(lb).or_insert(la) == la
        })
    }

    #[test]
    fn test_banded_matches_sequential() {
        for (seed, density) in [(1, 35), (2, 50), (3, 65), (4, 80)] {
            let grid = noise(23, 31, seed, density);

            for connectivity in [Connectivity::Four, Connectivity::Eight] {
                let (sequential, _) = label(&grid, &0, connectivity).unwrap();

                for bands in [2, 3, 7, 31] {
                    let (banded, _) = label_banded(&grid, &0, connectivity, bands).unwrap();
                    assert!(
                        same_partition(&sequential, &banded),
                        "seed {} bands {} connectivity {}",
                        seed,
                        bands,
                        connectivity
                    );
                }
            }
        }
    }

    #[test]
    fn test_banded_diagonal_seam() {
        // Diagonal link that only exists across the seam
        let grid = Grid::new(2, 2, vec![0u8, 1, 1, 0]).unwrap();

        let (labels, _) = label_banded(&grid, &0, Connectivity::Eight, 2).unwrap();
        assert_eq!(labels.as_raw(), &[0, 1, 1, 0]);

        let (labels, _) = label_banded(&grid, &0, Connectivity::Four, 2).unwrap();
        assert_eq!(labels.as_raw(), &[0, 1, 2, 0]);
    }

    #[test]
    fn test_banded_more_bands_than_rows() {
        let grid = noise(5, 3, 9, 60);
        let (sequential, _) = label(&grid, &0, Connectivity::Eight).unwrap();
        let (banded, _) = label_banded(&grid, &0, Connectivity::Eight, 64).unwrap();
        assert!(same_partition(&sequential, &banded));
    }

    #[test]
    fn test_banded_is_deterministic() {
        let grid = noise(17, 40, 5, 55);
        let (a, _) = label_banded(&grid, &0, Connectivity::Eight, 4).unwrap();
        let (b, _) = label_banded(&grid, &0, Connectivity::Eight, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_banded_canonical_is_minimum() {
        let grid = noise(12, 12, 11, 50);
        let (labels, mut table) = label_banded(&grid, &0, Connectivity::Four, 3).unwrap();

        let classes = table.classes();

        for &l in labels.iter().filter(|&&l| l != 0) {
            assert_eq!(classes.get(&l).and_then(|members| members.first()), Some(&l));
        }
    }
}
