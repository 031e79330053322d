// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;
use std::str::FromStr;

use crate::error::SprigError;

/// Neighbourhood used to decide whether two pixels touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// Edge-sharing neighbours only
    Four,
    /// Edge and corner-sharing neighbours
    #[default]
    Eight,
}

// Already-visited neighbours of a raster scan, in inspection order
const CAUSAL_FOUR: [(i64, i64); 2] = [(0, -1), (-1, 0)];
const CAUSAL_EIGHT: [(i64, i64); 4] = [(-1, -1), (0, -1), (1, -1), (-1, 0)];

const FULL_FOUR: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
const FULL_EIGHT: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Connectivity {
    /// Offsets of the neighbours a top-to-bottom, left-to-right scan has visited
    pub fn causal_offsets(&self) -> &'static [(i64, i64)] {
        match self {
            Connectivity::Four => &CAUSAL_FOUR,
            Connectivity::Eight => &CAUSAL_EIGHT,
        }
    }

    /// Offsets of every neighbour
    pub fn offsets(&self) -> &'static [(i64, i64)] {
        match self {
            Connectivity::Four => &FULL_FOUR,
            Connectivity::Eight => &FULL_EIGHT,
        }
    }

    /// Visited neighbours of (`x`, `y`) that lie inside a `width` x `height` grid
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig_core::cv::Connectivity;
    ///
    /// let four: Vec<_> = Connectivity::Four.causal_neighbors(1, 1, 3, 3).collect();
    /// assert_eq!(four, vec![(1, 0), (0, 1)]);
    ///
    /// let eight: Vec<_> = Connectivity::Eight.causal_neighbors(2, 1, 3, 3).collect();
    /// assert_eq!(eight, vec![(1, 0), (2, 0), (1, 1)]);
    /// ```
    pub fn causal_neighbors(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (u32, u32)> {
        within(self.causal_offsets(), x, y, width, height)
    }

    /// Every neighbour of (`x`, `y`) that lies inside a `width` x `height` grid
    pub fn neighbors(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (u32, u32)> {
        within(self.offsets(), x, y, width, height)
    }

    /// Check if two distinct coordinates are neighbours
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig_core::cv::Connectivity;
    ///
    /// assert!(Connectivity::Four.is_adjacent((0, 0), (0, 1)));
    /// assert!(!Connectivity::Four.is_adjacent((0, 0), (1, 1)));
    /// assert!(Connectivity::Eight.is_adjacent((0, 0), (1, 1)));
    /// assert!(!Connectivity::Eight.is_adjacent((0, 0), (0, 0)));
    /// ```
    pub fn is_adjacent(&self, a: (u32, u32), b: (u32, u32)) -> bool {
        let dx = a.0.abs_diff(b.0);
        let dy = a.1.abs_diff(b.1);

        match self {
            Connectivity::Four => dx + dy == 1,
            Connectivity::Eight => dx.max(dy) == 1,
        }
    }
}

fn within(
    offsets: &'static [(i64, i64)],
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> impl Iterator<Item = (u32, u32)> {
    offsets.iter().filter_map(move |&(dx, dy)| {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;

        if nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64 {
            Some((nx as u32, ny as u32))
        } else {
            None
        }
    })
}

impl TryFrom<u8> for Connectivity {
    type Error = SprigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Connectivity::Four),
            8 => Ok(Connectivity::Eight),
            _ => Err(SprigError::InvalidConnectivity(value.to_string())),
        }
    }
}

impl FromStr for Connectivity {
    type Err = SprigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "4" | "four" => Ok(Connectivity::Four),
            "8" | "eight" => Ok(Connectivity::Eight),
            _ => Err(SprigError::InvalidConnectivity(s.to_string())),
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Connectivity::Four => write!(f, "4"),
            Connectivity::Eight => write!(f, "8"),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_causal_neighbors_corner() {
        assert_eq!(Connectivity::Eight.causal_neighbors(0, 0, 3, 3).count(), 0);
        assert_eq!(Connectivity::Four.causal_neighbors(0, 0, 3, 3).count(), 0);
    }

    #[test]
    fn test_causal_neighbors_order() {
        let eight: Vec<(u32, u32)> = Connectivity::Eight.causal_neighbors(1, 1, 3, 3).collect();
        assert_eq!(eight, vec![(0, 0), (1, 0), (2, 0), (0, 1)]);

        let four: Vec<(u32, u32)> = Connectivity::Four.causal_neighbors(1, 1, 3, 3).collect();
        assert_eq!(four, vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn test_causal_neighbors_are_adjacent() {
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            for (nx, ny) in connectivity.causal_neighbors(2, 2, 5, 5) {
                assert!(connectivity.is_adjacent((2, 2), (nx, ny)));
            }
        }
    }

    #[test]
    fn test_neighbors_bounds() {
        assert_eq!(Connectivity::Eight.neighbors(1, 1, 3, 3).count(), 8);
        assert_eq!(Connectivity::Eight.neighbors(0, 0, 3, 3).count(), 3);
        assert_eq!(Connectivity::Four.neighbors(2, 2, 3, 3).count(), 2);
        assert_eq!(Connectivity::Four.neighbors(0, 0, 1, 1).count(), 0);
    }

    #[test]
    fn test_parse_connectivity() {
        assert_eq!(Connectivity::try_from(4u8), Ok(Connectivity::Four));
        assert_eq!(Connectivity::try_from(8u8), Ok(Connectivity::Eight));
        assert_eq!(
            Connectivity::try_from(6u8),
            Err(SprigError::InvalidConnectivity("6".to_string()))
        );

        assert_eq!("Eight".parse::<Connectivity>(), Ok(Connectivity::Eight));
        assert_eq!(" 4 ".parse::<Connectivity>(), Ok(Connectivity::Four));
        assert!("diagonal".parse::<Connectivity>().is_err());
    }

    #[test]
    fn test_default_is_eight() {
        assert_eq!(Connectivity::default(), Connectivity::Eight);
    }
}
