// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::hash::Hash;
use std::ops::Deref;

use crate::cv::{
    Connectivity, aggregate, collapse_transparent, estimate_background, label_banded,
    verify_regions,
};
use crate::error::SprigError;
use crate::im::{Channel, Color, Grid, LabelGrid, PixelGrid, Sprites};

/// Settings of a detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectOptions {
    /// Neighbourhood that decides adjacency
    pub connectivity: Connectivity,
    /// Row bands labelled in parallel (`1` labels sequentially)
    pub bands: usize,
    /// Treat pixels with zero alpha as background when no background is
    /// given (4-channel colors in `detect_pixels` only)
    pub transparent_alpha: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        DetectOptions {
            connectivity: Connectivity::default(),
            bands: 1,
            transparent_alpha: false,
        }
    }
}

/// Detect the sprites of a pixel grid
///
/// The background is estimated as the most common pixel when `None`.
/// Returns the canonical label grid and one sprite per region.
///
/// # Arguments
///
/// * `grid` - A row-major grid of pixels
/// * `background` - Optional pixel value excluded from every sprite
/// * `connectivity` - Neighbourhood that decides adjacency
///
/// # Examples
///
/// ```
/// use sprig_core::cv::{detect_regions, Connectivity};
/// use sprig_core::im::{Color, PixelGrid};
///
/// let w = Color::new([255u8, 255, 255]);
/// let r = Color::new([255u8, 0, 0]);
///
/// let grid = PixelGrid::<u8, 3>::new(3, 3, vec![r, w, w, r, r, w, w, w, w]).unwrap();
/// let (labels, sprites) = detect_regions(&grid, None, Connectivity::Four).unwrap();
///
/// assert_eq!(labels.as_raw(), &[1, 0, 0, 1, 1, 0, 0, 0, 0]);
/// assert_eq!(sprites.len(), 1);
/// assert_eq!(sprites.get(1).unwrap().bottom_right(), (1, 1));
/// ```
pub fn detect_regions<P, Container>(
    grid: &Grid<P, Container>,
    background: Option<P>,
    connectivity: Connectivity,
) -> Result<(LabelGrid, Sprites), SprigError>
where
    P: Copy + Eq + Hash + Sync,
    Container: Deref<Target = [P]>,
{
    detect_regions_with(
        grid,
        background,
        &DetectOptions {
            connectivity,
            ..DetectOptions::default()
        },
    )
}

/// Detect the sprites of a pixel grid using the provided options
///
/// # Arguments
///
/// * `grid` - A row-major grid of pixels
/// * `background` - Optional pixel value excluded from every sprite
/// * `options` - Connectivity and parallel band settings
pub fn detect_regions_with<P, Container>(
    grid: &Grid<P, Container>,
    background: Option<P>,
    options: &DetectOptions,
) -> Result<(LabelGrid, Sprites), SprigError>
where
    P: Copy + Eq + Hash + Sync,
    Container: Deref<Target = [P]>,
{
    if grid.is_empty() {
        return Err(SprigError::EmptyInput);
    }

    let background = match background {
        Some(background) => background,
        None => estimate_background(grid)?,
    };

    let (labels, mut table) =
        label_banded(grid, &background, options.connectivity, options.bands)?;

    let sprites = aggregate(&labels)?;
    verify_regions(&sprites, table.canonical_labels())?;

    Ok((labels, sprites))
}

/// Detect the sprites of a color grid and report the background used
///
/// With `options.transparent_alpha` set and no explicit background, every
/// 4-channel pixel with zero alpha is background regardless of its color
/// channels and the reported background is the clear color. Otherwise this
/// behaves as `detect_regions_with`.
///
/// # Arguments
///
/// * `grid` - A row-major grid of colors
/// * `background` - Optional color excluded from every sprite
/// * `options` - Connectivity, band and transparency settings
///
/// # Examples
///
/// ```
/// use sprig_core::cv::{DetectOptions, detect_pixels};
/// use sprig_core::im::{Color, PixelGrid};
///
/// // Transparent pixels with different color channels around one sprite
/// let grid = PixelGrid::<u8, 4>::from_subpixels(
///     3,
///     1,
///     &[0, 0, 0, 0, 9, 9, 9, 255, 255, 255, 255, 0],
/// )
/// .unwrap();
///
/// let options = DetectOptions { transparent_alpha: true, ..DetectOptions::default() };
/// let (_, sprites, background) = detect_pixels(&grid, None, &options).unwrap();
///
/// assert_eq!(background, Color::new([0, 0, 0, 0]));
/// assert_eq!(sprites.to_xyxy(), vec![[1, 0, 1, 0]]);
/// ```
pub fn detect_pixels<T: Channel, const C: usize>(
    grid: &PixelGrid<T, C>,
    background: Option<Color<T, C>>,
    options: &DetectOptions,
) -> Result<(LabelGrid, Sprites, Color<T, C>), SprigError> {
    if grid.is_empty() {
        return Err(SprigError::EmptyInput);
    }

    if background.is_none() && options.transparent_alpha {
        if let Some((cleared, clear)) = collapse_transparent(grid)? {
            let (labels, sprites) = detect_regions_with(&cleared, Some(clear), options)?;
            return Ok((labels, sprites, clear));
        }
    }

    let background = match background {
        Some(background) => background,
        None => estimate_background(grid)?,
    };

    let (labels, sprites) = detect_regions_with(grid, Some(background), options)?;

    Ok((labels, sprites, background))
}

#[cfg(test)]
mod test {

    use super::*;

    use std::collections::{BTreeSet, VecDeque};

    use crate::im::{Color, Label, PixelGrid, RgbColor};

    const W: RgbColor<u8> = Color::new([255, 255, 255]);
    const K: RgbColor<u8> = Color::new([0, 0, 0]);

    fn rgb(width: u32, height: u32, foreground: &[(u32, u32)]) -> PixelGrid<u8, 3> {
        let mut pixels = vec![W; (width * height) as usize];
        for &(x, y) in foreground {
            pixels[(y * width + x) as usize] = K;
        }
        PixelGrid::new(width, height, pixels).unwrap()
    }

    fn noise(width: u32, height: u32, seed: u64) -> Grid<u8, Vec<u8>> {
        let mut state = seed;
        let cells = (0..width * height)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state % 3) as u8
            })
            .collect();

        Grid::new(width, height, cells).unwrap()
    }

    // Reference labeling by breadth-first flood fill
    fn flood_components(
        grid: &Grid<u8, Vec<u8>>,
        background: u8,
        connectivity: Connectivity,
    ) -> Vec<BTreeSet<(u32, u32)>> {
        let (w, h) = (grid.width(), grid.height());
        let mut seen = vec![false; grid.len()];
        let mut components = vec![];

        for (x, y, &pixel) in grid.enumerate() {
            if pixel == background || seen[grid.index(x, y)] {
                continue;
            }

            let mut component = BTreeSet::new();
            let mut queue = VecDeque::from([(x, y)]);
            seen[grid.index(x, y)] = true;

            while let Some((cx, cy)) = queue.pop_front() {
                component.insert((cx, cy));
                for (nx, ny) in connectivity.neighbors(cx, cy, w, h) {
                    let idx = grid.index(nx, ny);
                    if !seen[idx] && grid.as_raw()[idx] != background {
                        seen[idx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }

            components.push(component);
        }

        components
    }

    #[test]
    fn test_scenario_all_background() {
        let (labels, sprites) = detect_regions(&rgb(3, 3, &[]), None, Connectivity::Four).unwrap();
        assert!(sprites.is_empty());
        assert!(labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_scenario_single_pixel() {
        let (_, sprites) = detect_regions(&rgb(3, 3, &[(1, 1)]), None, Connectivity::Four).unwrap();

        assert_eq!(sprites.len(), 1);
        let sprite = sprites.iter().next().unwrap();
        assert_eq!(sprite.as_xyxy(), [1, 1, 1, 1]);
        assert_eq!(sprite.width(), 1);
        assert_eq!(sprite.height(), 1);
    }

    #[test]
    fn test_scenario_separated_pixels() {
        let grid = rgb(3, 1, &[(0, 0), (2, 0)]);
        let (_, sprites) = detect_regions(&grid, Some(W), Connectivity::Four).unwrap();

        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites.to_xyxy(), vec![[0, 0, 0, 0], [2, 0, 2, 0]]);
        assert!(sprites.iter().all(|s| s.width() == 1 && s.height() == 1));
    }

    #[test]
    fn test_scenario_l_shape() {
        let grid = rgb(3, 3, &[(0, 0), (0, 1), (1, 1)]);
        let (_, sprites) = detect_regions(&grid, Some(W), Connectivity::Four).unwrap();

        assert_eq!(sprites.len(), 1);
        let sprite = sprites.iter().next().unwrap();
        assert_eq!(sprite.top_left(), (0, 0));
        assert_eq!(sprite.bottom_right(), (1, 1));
        assert_eq!((sprite.width(), sprite.height()), (2, 2));
    }

    #[test]
    fn test_scenario_diagonal() {
        let grid = rgb(3, 3, &[(0, 0), (1, 1)]);

        let (_, sprites) = detect_regions(&grid, Some(W), Connectivity::Four).unwrap();
        assert_eq!(sprites.len(), 2);

        let (_, sprites) = detect_regions(&grid, Some(W), Connectivity::Eight).unwrap();
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites.to_xyxy(), vec![[0, 0, 1, 1]]);
    }

    #[test]
    fn test_empty_grid() {
        let grid: PixelGrid<u8, 3> = PixelGrid::new(0, 0, vec![]).unwrap();
        assert_eq!(
            detect_regions(&grid, Some(W), Connectivity::Four).err(),
            Some(SprigError::EmptyInput)
        );
        assert_eq!(
            detect_regions(&grid, None, Connectivity::Four).err(),
            Some(SprigError::EmptyInput)
        );
    }

    #[test]
    fn test_partition_matches_flood_fill() {
        for seed in 1..6 {
            let grid = noise(19, 13, seed);

            for connectivity in [Connectivity::Four, Connectivity::Eight] {
                for bands in [1, 4] {
                    let options = DetectOptions {
                        connectivity,
                        bands,
                        ..DetectOptions::default()
                    };
                    let (labels, sprites) = detect_regions_with(&grid, Some(0), &options).unwrap();
                    let components = flood_components(&grid, 0, connectivity);

                    assert_eq!(sprites.len(), components.len());

                    for component in components {
                        let members: BTreeSet<Label> = component
                            .iter()
                            .map(|&(x, y)| *labels.get(x, y).unwrap())
                            .collect();
                        assert_eq!(members.len(), 1);

                        let l = *members.iter().next().unwrap();
                        let count = labels.iter().filter(|&&c| c == l).count();
                        assert_eq!(count, component.len());
                    }
                }
            }
        }
    }

    #[test]
    fn test_boxes_contain_and_are_minimal() {
        let grid = noise(21, 17, 42);
        let (labels, sprites) = detect_regions(&grid, Some(0), Connectivity::Eight).unwrap();

        for sprite in &sprites {
            let pixels: Vec<(u32, u32)> = labels
                .enumerate()
                .filter(|&(_, _, &l)| l == sprite.label())
                .map(|(x, y, _)| (x, y))
                .collect();

            assert!(pixels.iter().all(|&(x, y)| sprite.contains(x, y)));

            let (x1, y1) = sprite.top_left();
            let (x2, y2) = sprite.bottom_right();
            assert!(pixels.iter().any(|&(x, _)| x == x1));
            assert!(pixels.iter().any(|&(x, _)| x == x2));
            assert!(pixels.iter().any(|&(_, y)| y == y1));
            assert!(pixels.iter().any(|&(_, y)| y == y2));
        }
    }

    #[test]
    fn test_background_invariance() {
        let grid = noise(15, 15, 7);
        let (labels, sprites) = detect_regions(&grid, Some(2), Connectivity::Eight).unwrap();

        for (x, y, &pixel) in grid.enumerate() {
            let l = *labels.get(x, y).unwrap();
            assert_eq!(pixel == 2, l == 0);
        }

        assert!(!sprites.contains(0));
    }

    #[test]
    fn test_determinism() {
        let grid = noise(25, 25, 3);
        let a = detect_regions(&grid, None, Connectivity::Eight).unwrap();
        let b = detect_regions(&grid, None, Connectivity::Eight).unwrap();
        assert_eq!(a, b);
    }

    fn transparent_strip() -> PixelGrid<u8, 4> {
        // Sprite, two clear pixels, a clear pixel with white color channels, sprite
        PixelGrid::from_subpixels(
            5,
            1,
            &[
                200, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 0, 255, 255, 255, 0, 200, 0, 0, 255,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_detect_pixels_estimated_background() {
        let grid = transparent_strip();
        let (_, sprites, background) =
            detect_pixels(&grid, None, &DetectOptions::default()).unwrap();

        // Only the most common clear pixel is background
        assert_eq!(background, Color::new([0, 0, 0, 0]));
        assert_eq!(sprites.to_xyxy(), vec![[0, 0, 0, 0], [3, 0, 4, 0]]);
    }

    #[test]
    fn test_detect_pixels_transparent_alpha() {
        let grid = transparent_strip();
        let options = DetectOptions {
            transparent_alpha: true,
            ..DetectOptions::default()
        };

        let (labels, sprites, background) = detect_pixels(&grid, None, &options).unwrap();

        assert_eq!(background, Color::new([0, 0, 0, 0]));
        assert_eq!(labels.as_raw(), &[1, 0, 0, 0, 2]);
        assert_eq!(sprites.to_xyxy(), vec![[0, 0, 0, 0], [4, 0, 4, 0]]);
    }

    #[test]
    fn test_detect_pixels_explicit_background_wins() {
        let grid = transparent_strip();
        let options = DetectOptions {
            transparent_alpha: true,
            ..DetectOptions::default()
        };

        let sprite = Color::new([200, 0, 0, 255]);
        let (_, sprites, background) = detect_pixels(&grid, Some(sprite), &options).unwrap();

        assert_eq!(background, sprite);
        assert_eq!(sprites.to_xyxy(), vec![[1, 0, 3, 0]]);
    }

    #[test]
    fn test_detect_pixels_transparent_alpha_ignored_without_alpha() {
        let grid = rgb(3, 1, &[(1, 0)]);
        let options = DetectOptions {
            transparent_alpha: true,
            ..DetectOptions::default()
        };

        let (_, sprites, background) = detect_pixels(&grid, None, &options).unwrap();

        assert_eq!(background, W);
        assert_eq!(sprites.to_xyxy(), vec![[1, 0, 1, 0]]);
    }
}
