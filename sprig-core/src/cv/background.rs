// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;

use crate::error::SprigError;
use crate::im::{Channel, Color, Grid, PixelGrid};

/// Estimate the background as the most frequent pixel value of a grid
///
/// Ties resolve to the value that first reached the highest count while
/// scanning in row-major order.
///
/// # Arguments
///
/// * `grid` - A row-major grid of pixels
///
/// # Examples
///
/// ```
/// use sprig_core::cv::estimate_background;
/// use sprig_core::im::{Color, PixelGrid};
///
/// let grid = PixelGrid::<u8, 3>::from_subpixels(
///     2,
///     2,
///     &[255, 255, 255, 9, 9, 9, 255, 255, 255, 255, 255, 255],
/// )
/// .unwrap();
///
/// assert_eq!(estimate_background(&grid).unwrap(), Color::new([255, 255, 255]));
/// ```
pub fn estimate_background<P, Container>(grid: &Grid<P, Container>) -> Result<P, SprigError>
where
    P: Copy + Eq + Hash,
    Container: Deref<Target = [P]>,
{
    let mut counts: HashMap<P, usize> = HashMap::new();
    let mut best: Option<(P, usize)> = None;

    for pixel in grid.iter() {
        let count = counts.entry(*pixel).or_insert(0);
        *count += 1;

        match best {
            Some((_, max)) if *count <= max => {}
            _ => best = Some((*pixel, *count)),
        }
    }

    best.map(|(pixel, _)| pixel).ok_or(SprigError::EmptyInput)
}

/// Replace every fully transparent pixel of a 4-channel grid with one clear color
///
/// Returns the rewritten grid and the clear color (all channels zero), or
/// `None` when the grid has no alpha channel. Labelling the rewritten grid
/// against the clear color treats any pixel with zero alpha as background,
/// whatever its color channels hold.
///
/// # Arguments
///
/// * `grid` - A row-major grid of pixels
///
/// # Examples
///
/// ```
/// use sprig_core::cv::collapse_transparent;
/// use sprig_core::im::{Color, PixelGrid};
///
/// let grid = PixelGrid::<u8, 4>::from_subpixels(2, 1, &[255, 0, 0, 0, 7, 7, 7, 255]).unwrap();
/// let (cleared, clear) = collapse_transparent(&grid).unwrap().unwrap();
///
/// assert_eq!(clear, Color::new([0, 0, 0, 0]));
/// assert_eq!(cleared.get(0, 0), Some(&clear));
/// assert_eq!(cleared.get(1, 0), grid.get(1, 0));
/// ```
pub fn collapse_transparent<T: Channel, const C: usize>(
    grid: &PixelGrid<T, C>,
) -> Result<Option<(PixelGrid<T, C>, Color<T, C>)>, SprigError> {
    if C != 4 {
        return Ok(None);
    }

    let clear = Color::<T, C>::from_u32(&[0; C])?;

    let pixels = grid
        .iter()
        .map(|&pixel| if pixel.is_transparent() { clear } else { pixel })
        .collect();

    Ok(Some((Grid::new(grid.width(), grid.height(), pixels)?, clear)))
}
