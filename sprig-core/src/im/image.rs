// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;

use image::{DynamicImage, open as open_dynamic};

use crate::constant;
use crate::cv::{DetectOptions, detect_pixels};
use crate::error::SprigError;
use crate::im::{Channel, Color, LabelGrid, PixelGrid, Sprites};
use crate::impl_enum_dispatch;
use crate::ut::path::extension;

/// A decoded sprite sheet with an explicit channel type and count
///
/// All external image types (e.g `DynamicImage`) are converted to a
/// SprigImage once, so every pixel of a sheet shares one color type.
///
/// # Examples
///
/// ```
/// use image::{RgbImage, DynamicImage};
/// use sprig_core::im::SprigImage;
///
/// let rgb = RgbImage::new(10, 10);
/// let dynamic = DynamicImage::ImageRgb8(rgb);
/// let image = SprigImage::new_from_dynamic(dynamic).unwrap();
///
/// assert_eq!(image.channels(), 3);
/// ```
#[derive(Debug, Clone)]
pub enum SprigImage {
    Gray8(PixelGrid<u8, 1>),
    Rgb8(PixelGrid<u8, 3>),
    Rgba8(PixelGrid<u8, 4>),
    Gray16(PixelGrid<u16, 1>),
    Rgb16(PixelGrid<u16, 3>),
    Rgba16(PixelGrid<u16, 4>),
}

/// Output of a detection run over a sprite sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Canonical label of every pixel
    pub labels: LabelGrid,
    /// One sprite per region
    pub sprites: Sprites,
    /// Background color used to separate sprites
    pub background: Vec<u32>,
}

// >>> I/O METHODS

impl SprigImage {
    /// Open a new sprite sheet from a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image with a valid extension
    ///
    /// ```no_run
    /// use sprig_core::im::SprigImage;
    /// let image = SprigImage::open("sheet.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SprigImage, SprigError> {
        if let Some(ext) = extension(&path) {
            if constant::SUPPORTED_IMAGE_FORMATS.contains(&ext.as_str()) {
                let image = open_dynamic(&path).map_err(|_| SprigError::ImageReadError)?;
                return Self::new_from_dynamic(image);
            }
        }

        Err(SprigError::ImageExtensionError)
    }

    /// Initialize a new sprite sheet from a DynamicImage
    ///
    /// # Arguments
    ///
    /// * `image` - An 8 or 16-bit grayscale, rgb or rgba DynamicImage
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{GrayAlphaImage, DynamicImage};
    /// use sprig_core::im::SprigImage;
    ///
    /// let gray_alpha = GrayAlphaImage::new(10, 10);
    /// let dynamic = DynamicImage::ImageLumaA8(gray_alpha);
    /// assert!(SprigImage::new_from_dynamic(dynamic).is_err());
    /// ```
    pub fn new_from_dynamic(image: DynamicImage) -> Result<SprigImage, SprigError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => Ok(SprigImage::Gray8(
                PixelGrid::from_subpixels(width, height, buffer.as_raw())?,
            )),
            DynamicImage::ImageRgb8(buffer) => Ok(SprigImage::Rgb8(PixelGrid::from_subpixels(
                width,
                height,
                buffer.as_raw(),
            )?)),
            DynamicImage::ImageRgba8(buffer) => Ok(SprigImage::Rgba8(
                PixelGrid::from_subpixels(width, height, buffer.as_raw())?,
            )),
            DynamicImage::ImageLuma16(buffer) => Ok(SprigImage::Gray16(
                PixelGrid::from_subpixels(width, height, buffer.as_raw())?,
            )),
            DynamicImage::ImageRgb16(buffer) => Ok(SprigImage::Rgb16(
                PixelGrid::from_subpixels(width, height, buffer.as_raw())?,
            )),
            DynamicImage::ImageRgba16(buffer) => Ok(SprigImage::Rgba16(
                PixelGrid::from_subpixels(width, height, buffer.as_raw())?,
            )),
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
                Err(SprigError::UnsupportedFormat(
                    "Grayscale images with an alpha channel must be converted first.",
                ))
            }
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => Err(
                SprigError::UnsupportedFormat("Floating point images must be converted first."),
            ),
            _ => Err(SprigError::UnsupportedFormat(
                "A dynamic image with a valid pixel encoding was not detected.",
            )),
        }
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl_enum_dispatch!(SprigImage, Gray8, Rgb8, Rgba8, Gray16, Rgb16, Rgba16; width(&self) -> u32);
impl_enum_dispatch!(SprigImage, Gray8, Rgb8, Rgba8, Gray16, Rgb16, Rgba16; height(&self) -> u32);
impl_enum_dispatch!(SprigImage, Gray8, Rgb8, Rgba8, Gray16, Rgb16, Rgba16; channels(&self) -> u32);
impl_enum_dispatch!(SprigImage, Gray8, Rgb8, Rgba8, Gray16, Rgb16, Rgba16; len(&self) -> usize);
impl_enum_dispatch!(SprigImage, Gray8, Rgb8, Rgba8, Gray16, Rgb16, Rgba16; is_empty(&self) -> bool);

// <<< PROPERTY METHODS

// >>> DETECTION METHODS

impl_enum_dispatch!(SprigImage, Gray8, Rgb8, Rgba8, Gray16, Rgb16, Rgba16; background(&self) -> Result<Vec<u32>, SprigError> => |c| c.to_u32());

impl SprigImage {
    /// Detect the sprites packed in this sheet
    ///
    /// # Arguments
    ///
    /// * `background` - Optional background with one value per channel
    /// * `options` - Connectivity, band and transparency settings
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{DynamicImage, Luma, GrayImage};
    /// use sprig_core::cv::DetectOptions;
    /// use sprig_core::im::SprigImage;
    ///
    /// let mut gray = GrayImage::from_pixel(4, 4, Luma([0]));
    /// gray.put_pixel(1, 1, Luma([200]));
    /// gray.put_pixel(3, 3, Luma([200]));
    ///
    /// let image = SprigImage::new_from_dynamic(DynamicImage::ImageLuma8(gray)).unwrap();
    /// let detection = image.detect(None, &DetectOptions::default()).unwrap();
    ///
    /// assert_eq!(detection.background, vec![0]);
    /// assert_eq!(detection.sprites.len(), 2);
    /// ```
    pub fn detect(
        &self,
        background: Option<&[u32]>,
        options: &DetectOptions,
    ) -> Result<Detection, SprigError> {
        match self {
            SprigImage::Gray8(grid) => detect_grid(grid, background, options),
            SprigImage::Rgb8(grid) => detect_grid(grid, background, options),
            SprigImage::Rgba8(grid) => detect_grid(grid, background, options),
            SprigImage::Gray16(grid) => detect_grid(grid, background, options),
            SprigImage::Rgb16(grid) => detect_grid(grid, background, options),
            SprigImage::Rgba16(grid) => detect_grid(grid, background, options),
        }
    }
}

fn detect_grid<T: Channel, const C: usize>(
    grid: &PixelGrid<T, C>,
    background: Option<&[u32]>,
    options: &DetectOptions,
) -> Result<Detection, SprigError> {
    let background = background
        .map(Color::<T, C>::from_u32)
        .transpose()?;

    let (labels, sprites, background) = detect_pixels(grid, background, options)?;

    Ok(Detection {
        labels,
        sprites,
        background: background.to_u32(),
    })
}

// <<< DETECTION METHODS
