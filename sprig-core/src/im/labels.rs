// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeSet;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, open as open_dynamic};

use crate::constant;
use crate::error::SprigError;
use crate::im::{Grid, Label, LabelGrid};
use crate::io::{read_numpy_labels, write_numpy};
use crate::ut::path::extension;

// >>> PROPERTY METHODS

impl LabelGrid {
    /// Unique non-zero labels in ascending order
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig_core::im::LabelGrid;
    ///
    /// let labels = LabelGrid::new(2, 2, vec![0, 4, 1, 4]).unwrap();
    /// assert_eq!(labels.labels(), vec![1, 4]);
    /// ```
    pub fn labels(&self) -> Vec<Label> {
        self.iter()
            .filter(|&&l| l != 0)
            .copied()
            .collect::<BTreeSet<Label>>()
            .into_iter()
            .collect()
    }

    /// Largest label in the grid, `0` if every pixel is background
    pub fn max_label(&self) -> Label {
        self.iter().copied().max().unwrap_or(0)
    }

    /// Number of pixels carrying `label`
    pub fn count(&self, label: Label) -> usize {
        self.iter().filter(|&&l| l == label).count()
    }
}

// <<< PROPERTY METHODS

// >>> I/O METHODS

impl LabelGrid {
    /// Open a label grid from a .npy array or a grayscale image
    ///
    /// # Arguments
    ///
    /// * `path` - A path to labels with a valid extension
    ///
    /// ```no_run
    /// use sprig_core::im::LabelGrid;
    /// let labels = LabelGrid::open("sheet_labels.npy");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<LabelGrid, SprigError> {
        match extension(&path).as_deref() {
            Some("npy") => read_numpy_labels(path),
            Some(ext) if constant::LABEL_FORMATS.contains(&ext) => {
                let image = open_dynamic(&path).map_err(|_| SprigError::ImageReadError)?;
                Self::new_from_dynamic(image)
            }
            _ => Err(SprigError::ImageExtensionError),
        }
    }

    /// Initialize a label grid from an 8 or 16-bit grayscale DynamicImage
    pub fn new_from_dynamic(image: DynamicImage) -> Result<LabelGrid, SprigError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => Grid::new(
                width,
                height,
                buffer.into_raw().into_iter().map(Label::from).collect(),
            ),
            DynamicImage::ImageLuma16(buffer) => Grid::new(
                width,
                height,
                buffer.into_raw().into_iter().map(Label::from).collect(),
            ),
            _ => Err(SprigError::UnsupportedFormat(
                "Label images must be 8 or 16-bit grayscale.",
            )),
        }
    }

    /// Save the label grid
    ///
    /// Labels are written exactly as u32 to .npy files, or as a 16-bit
    /// grayscale png when every label fits in a u16.
    ///
    /// # Arguments
    ///
    /// * `path` - Path with a .npy or .png extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SprigError> {
        match extension(&path).as_deref() {
            Some("npy") => write_numpy(
                path,
                self.as_raw(),
                &[self.height() as u64, self.width() as u64],
            ),
            Some("png") => {
                if self.max_label() > u16::MAX as Label {
                    return Err(SprigError::LabelRangeError);
                }

                ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(
                    self.width(),
                    self.height(),
                    self.iter().map(|&l| l as u16).collect(),
                )
                .ok_or(SprigError::ImageWriteError)?
                .save(path)
                .map_err(|_| SprigError::ImageWriteError)
            }
            _ => Err(SprigError::ImageExtensionError),
        }
    }
}

// <<< I/O METHODS

#[cfg(test)]
mod test {

    use super::*;

    fn labels() -> LabelGrid {
        LabelGrid::new(3, 2, vec![0, 1, 1, 7, 0, 1]).unwrap()
    }

    #[test]
    fn test_label_properties() {
        let labels = labels();
        assert_eq!(labels.labels(), vec![1, 7]);
        assert_eq!(labels.max_label(), 7);
        assert_eq!(labels.count(1), 3);
        assert_eq!(labels.count(0), 2);
    }

    #[test]
    fn test_labels_save() {
        const TEST_PNG: &str = "TEST_SAVE_LABELS.png";
        const TEST_NUMPY: &str = "TEST_SAVE_LABELS.npy";

        let labels = labels();

        labels.save(TEST_PNG).unwrap();
        labels.save(TEST_NUMPY).unwrap();

        assert_eq!(LabelGrid::open(TEST_PNG).unwrap(), labels);
        assert_eq!(LabelGrid::open(TEST_NUMPY).unwrap(), labels);

        std::fs::remove_file(TEST_PNG).unwrap();
        std::fs::remove_file(TEST_NUMPY).unwrap();
    }

    #[test]
    fn test_labels_save_png_range() {
        let labels = LabelGrid::new(2, 1, vec![0, 70_000]).unwrap();
        assert_eq!(
            labels.save("TEST_SAVE_LABELS_RANGE.png"),
            Err(SprigError::LabelRangeError)
        );
    }

    #[test]
    fn test_labels_save_extension() {
        assert_eq!(
            labels().save("TEST_SAVE_LABELS.txt"),
            Err(SprigError::ImageExtensionError)
        );
    }
}
