// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::iter::Iterator;
use std::marker::PhantomData;
use std::ops::Deref;
use std::slice::ChunksExact;

use crate::cv::estimate_background;
use crate::error::SprigError;
use crate::im::{Channel, Color};

/// Integer region identifier; `0` marks pixels outside every region
pub type Label = u32;

/// A row-major container storing a `width` x `height` grid of cells.
///
/// The struct is generic over the cell type `T` and over the container that
/// holds the cells as a slice (`&[T]`) or vector (`Vec<T>`). The container
/// must implement `Deref<Target = [T]>` and its length must equal the
/// product of `w` * `h`. The origin is the top-left cell.
///
/// # Examples
///
/// ```
/// use sprig_core::im::Grid;
///
/// let grid = Grid::new(3, 2, vec![0u32; 6]);
/// assert_eq!(grid.unwrap().len(), 6);
///
/// let grid = Grid::new(3, 3, vec![0u32; 6]);
/// assert!(grid.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T, Container> {
    w: u32,                   // Width
    h: u32,                   // Height
    pub buffer: Container,    // Cells
    _phantom: PhantomData<T>, // Cell
}

/// A decoded image owning pixels with `C` channels of type `T`
pub type PixelGrid<T, const C: usize> = Grid<Color<T, C>, Vec<Color<T, C>>>;

/// A borrowed view over decoded pixels
pub type PixelGridView<'a, T, const C: usize> = Grid<Color<T, C>, &'a [Color<T, C>]>;

/// Labels assigned to each pixel of a grid
pub type LabelGrid = Grid<Label, Vec<Label>>;

impl<T, Container> Grid<T, Container>
where
    Container: Deref<Target = [T]>,
{
    /// Initializes a grid from a generic cell container
    ///
    /// # Arguments
    ///
    /// * `width` - Grid width
    /// * `height` - Grid height
    /// * `buffer` - A generic container (e.g. `Vec` or slice) in row-major order
    pub fn new(width: u32, height: u32, buffer: Container) -> Result<Self, SprigError> {
        if (width as usize) * (height as usize) == buffer.len() {
            Ok(Grid {
                w: width,
                h: height,
                buffer,
                _phantom: PhantomData,
            })
        } else {
            Err(SprigError::BufferSizeError)
        }
    }
}

// >>> PROPERTY METHODS

impl<T, Container> Grid<T, Container>
where
    Container: Deref<Target = [T]>,
{
    /// Width of the grid
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the grid
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Shape/dimensions of the grid
    pub fn shape(&self) -> (u32, u32) {
        (self.h, self.w)
    }

    /// Number of cells in the grid
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if grid has zero cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major offset of the cell at (`x`, `y`)
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    /// Coordinates (`x`, `y`) of a row-major offset
    pub fn position(&self, index: usize) -> (u32, u32) {
        let w = self.w.max(1) as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// Cell at (`x`, `y`), or `None` outside the grid
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        if x < self.w && y < self.h {
            self.buffer.get(self.index(x, y))
        } else {
            None
        }
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl<T, Container> Grid<T, Container>
where
    Container: Deref<Target = [T]>,
{
    /// Returns the raw cells
    pub fn into_raw(self) -> Container {
        self.buffer
    }

    /// Returns a reference to the raw cells
    pub fn as_raw(&self) -> &Container {
        &self.buffer
    }

    /// Borrow the grid as a slice-backed view
    pub fn view(&self) -> Grid<T, &[T]> {
        Grid {
            w: self.w,
            h: self.h,
            buffer: self.buffer.deref(),
            _phantom: PhantomData,
        }
    }

    /// An iterator over the cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// An iterator over rows of the grid
    pub fn iter_rows(&self) -> ChunksExact<'_, T> {
        self.buffer.chunks_exact(self.w.max(1) as usize)
    }

    /// An iterator over (`x`, `y`, cell) in row-major order
    pub fn enumerate(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        self.buffer.iter().enumerate().map(move |(i, cell)| {
            let (x, y) = self.position(i);
            (x, y, cell)
        })
    }
}

impl<T, const C: usize> Grid<Color<T, C>, Vec<Color<T, C>>>
where
    T: Channel,
{
    /// Group an interleaved subpixel buffer into a grid of colors
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `subpixels` - Row-major buffer with `C` consecutive values per pixel
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig_core::im::{Color, PixelGrid};
    ///
    /// let grid = PixelGrid::<u8, 3>::from_subpixels(2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(grid.get(1, 0), Some(&Color::new([4, 5, 6])));
    /// ```
    pub fn from_subpixels(width: u32, height: u32, subpixels: &[T]) -> Result<Self, SprigError> {
        if subpixels.len() % C != 0 {
            return Err(SprigError::BufferSizeError);
        }

        let pixels = subpixels
            .chunks_exact(C)
            .map(|pixel| {
                <[T; C]>::try_from(pixel)
                    .map(Color::new)
                    .map_err(|_| SprigError::BufferSizeError)
            })
            .collect::<Result<Vec<Color<T, C>>, SprigError>>()?;

        Grid::new(width, height, pixels)
    }

    /// Number of channels per pixel
    pub fn channels(&self) -> u32 {
        C as u32
    }

    /// Most common color of the grid
    pub fn background(&self) -> Result<Color<T, C>, SprigError> {
        estimate_background(self)
    }
}

// <<< CONVERSION METHODS
