// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt::Debug;
use std::hash::Hash;

use num::{FromPrimitive, ToPrimitive};

use crate::error::SprigError;

/// Scalar type of a single color channel (e.g. `u8` or `u16`)
pub trait Channel:
    Copy + Eq + Ord + Hash + Debug + Send + Sync + ToPrimitive + FromPrimitive
{
}

impl<T> Channel for T where
    T: Copy + Eq + Ord + Hash + Debug + Send + Sync + ToPrimitive + FromPrimitive
{
}

/// A pixel color with a channel count fixed at compile time
///
/// Two colors are equal only if every channel is equal.
///
/// # Examples
///
/// ```
/// use sprig_core::im::{Color, RgbColor};
///
/// let white: RgbColor<u8> = Color::new([255, 255, 255]);
/// let parsed = RgbColor::<u8>::from_u32(&[255, 255, 255]).unwrap();
///
/// assert_eq!(white, parsed);
/// assert!(RgbColor::<u8>::from_u32(&[255, 255]).is_err());
/// assert!(RgbColor::<u8>::from_u32(&[256, 0, 0]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color<T, const C: usize>([T; C]);

pub type GrayColor<T> = Color<T, 1>;
pub type RgbColor<T> = Color<T, 3>;
pub type RgbaColor<T> = Color<T, 4>;

impl<T: Channel, const C: usize> Color<T, C> {
    /// Number of channels of this color type
    pub const CHANNELS: usize = C;

    pub const fn new(channels: [T; C]) -> Self {
        Color(channels)
    }

    /// Parse a color from loosely typed channel values
    ///
    /// # Arguments
    ///
    /// * `values` - One value per channel, each within the range of `T`
    pub fn from_u32(values: &[u32]) -> Result<Self, SprigError> {
        if values.len() != C {
            return Err(SprigError::ColorChannelError);
        }

        let channels = values
            .iter()
            .map(|&v| T::from_u32(v).ok_or(SprigError::ColorChannelError))
            .collect::<Result<Vec<T>, SprigError>>()?;

        let channels: [T; C] = channels
            .try_into()
            .map_err(|_| SprigError::ColorChannelError)?;

        Ok(Color(channels))
    }

    pub fn channels(&self) -> &[T; C] {
        &self.0
    }

    /// Widen every channel to u32
    pub fn to_u32(&self) -> Vec<u32> {
        self.0.iter().map(|c| c.to_u32().unwrap_or(0)).collect()
    }

    /// Alpha channel, present only on 4-channel colors
    pub fn alpha(&self) -> Option<T> {
        if C == 4 { self.0.get(3).copied() } else { None }
    }

    /// Whether the color has an alpha channel equal to zero
    pub fn is_transparent(&self) -> bool {
        self.alpha().and_then(|a| a.to_u32()) == Some(0)
    }
}

impl<T: Channel, const C: usize> From<[T; C]> for Color<T, C> {
    fn from(channels: [T; C]) -> Self {
        Color(channels)
    }
}
