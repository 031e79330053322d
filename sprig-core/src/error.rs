// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SprigError {
    EmptyInput,
    UnsupportedFormat(&'static str),
    InvalidConnectivity(String),
    InvalidBoundingBox,
    EmptyRegion(u32),
    BufferSizeError,
    ColorChannelError,
    LabelRangeError,
    ImageReadError,
    ImageWriteError,
    ImageExtensionError,
    SpritesReadError,
    SpritesWriteError,
    NoFileError(String),
    DirError(String),
}

impl fmt::Display for SprigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SprigError::EmptyInput => {
                write!(
                    f,
                    "[sprig::EmptyInput] The pixel grid has zero pixels and no background can be estimated."
                )
            }
            SprigError::UnsupportedFormat(message) => {
                write!(
                    f,
                    "[sprig::UnsupportedFormat] Only decoded 1, 3 and 4-channel u8 and u16 pixels are supported. {}",
                    message
                )
            }
            SprigError::InvalidConnectivity(value) => {
                write!(
                    f,
                    "[sprig::InvalidConnectivity] Connectivity must be 4 or 8 but received '{}'.",
                    value
                )
            }
            SprigError::InvalidBoundingBox => {
                write!(
                    f,
                    "[sprig::InvalidBoundingBox] The bounding box is invalid as x2 (y2) must be greater than or equal to x1 (y1)."
                )
            }
            SprigError::EmptyRegion(label) => {
                write!(
                    f,
                    "[sprig::EmptyRegion] Label {} was resolved but owns no pixels.",
                    label
                )
            }
            SprigError::BufferSizeError => {
                write!(
                    f,
                    "[sprig::BufferSizeError] The buffer does not match provided size."
                )
            }
            SprigError::ColorChannelError => {
                write!(
                    f,
                    "[sprig::ColorChannelError] The color does not match the channel count or range of the image."
                )
            }
            SprigError::LabelRangeError => {
                write!(
                    f,
                    "[sprig::LabelRangeError] Labels exceed the range of a 16-bit png. Save labels as .npy instead."
                )
            }
            SprigError::ImageReadError => {
                write!(f, "[sprig::ImageReadError] Failed to read image.")
            }
            SprigError::ImageWriteError => {
                write!(f, "[sprig::ImageWriteError] Failed to write image.")
            }
            SprigError::ImageExtensionError => {
                write!(
                    f,
                    "[sprig::ImageExtensionError] Could not detect a valid image extension for input."
                )
            }
            SprigError::SpritesReadError => {
                write!(f, "[sprig::SpritesReadError] Sprites could not be read.")
            }
            SprigError::SpritesWriteError => {
                write!(
                    f,
                    "[sprig::SpritesWriteError] Failed to successfully write sprites to output."
                )
            }
            SprigError::NoFileError(message) => {
                write!(
                    f,
                    "[sprig::NoFileError] File could not be found. {}.",
                    message
                )
            }
            SprigError::DirError(message) => {
                write!(
                    f,
                    "[sprig::DirError] Directory could not be read. {}.",
                    message
                )
            }
        }
    }
}

impl std::error::Error for SprigError {}
