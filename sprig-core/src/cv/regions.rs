// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::collections::BTreeMap;
use std::ops::Deref;

use crate::error::SprigError;
use crate::im::{Grid, Label, Sprite, Sprites};

/// Compute the tight bounding box of every non-zero label in a label grid
///
/// # Arguments
///
/// * `labels` - A canonical label grid where `0` marks background pixels
///
/// # Examples
///
/// ```
/// use sprig_core::cv::aggregate;
/// use sprig_core::im::Grid;
///
/// let labels = Grid::new(3, 3, vec![1, 0, 0, 1, 1, 0, 0, 0, 4]).unwrap();
/// let sprites = aggregate(&labels).unwrap();
///
/// assert_eq!(sprites.len(), 2);
/// assert_eq!(sprites.get(1).unwrap().as_xyxy(), [0, 0, 1, 1]);
/// assert_eq!(sprites.get(4).unwrap().as_xyxy(), [2, 2, 2, 2]);
/// ```
pub fn aggregate<Container>(labels: &Grid<Label, Container>) -> Result<Sprites, SprigError>
where
    Container: Deref<Target = [Label]>,
{
    let mut boxes: BTreeMap<Label, [u32; 4]> = BTreeMap::new();

    for (x, y, &label) in labels.enumerate() {
        if label == 0 {
            continue;
        }

        boxes
            .entry(label)
            .and_modify(|[x1, y1, x2, y2]| {
                *x1 = (*x1).min(x);
                *y1 = (*y1).min(y);
                *x2 = (*x2).max(x);
                *y2 = (*y2).max(y);
            })
            .or_insert([x, y, x, y]);
    }

    boxes
        .into_iter()
        .map(|(label, [x1, y1, x2, y2])| Sprite::new(label, x1, y1, x2, y2))
        .collect()
}

/// Check that every expected label owns a sprite
///
/// # Arguments
///
/// * `sprites` - Sprites produced by `aggregate`
/// * `expected` - Canonical labels resolved during labeling
pub fn verify_regions<I>(sprites: &Sprites, expected: I) -> Result<(), SprigError>
where
    I: IntoIterator<Item = Label>,
{
    match expected.into_iter().find(|&label| !sprites.contains(label)) {
        Some(label) => Err(SprigError::EmptyRegion(label)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_aggregate_empty() {
        let labels = Grid::new(3, 3, vec![0; 9]).unwrap();
        assert!(aggregate(&labels).unwrap().is_empty());
    }

    #[test]
    fn test_aggregate_boxes_are_minimal() {
        #[rustfmt::skip]
        let cells = vec![
            0, 2, 0, 0,
            2, 2, 2, 0,
            0, 0, 0, 0,
            0, 0, 0, 2,
        ];

        let labels = Grid::new(4, 4, cells).unwrap();
        let sprites = aggregate(&labels).unwrap();
        let sprite = sprites.get(2).unwrap();

        assert_eq!(sprite.top_left(), (0, 0));
        assert_eq!(sprite.bottom_right(), (3, 3));

        // Every labelled pixel is contained and each edge touches one
        for (x, y, &l) in labels.enumerate() {
            if l == 2 {
                assert!(sprite.contains(x, y));
            }
        }

        let [x1, y1, x2, y2] = sprite.as_xyxy();
        assert!(labels.enumerate().any(|(x, _, &l)| l == 2 && x == x1));
        assert!(labels.enumerate().any(|(_, y, &l)| l == 2 && y == y1));
        assert!(labels.enumerate().any(|(x, _, &l)| l == 2 && x == x2));
        assert!(labels.enumerate().any(|(_, y, &l)| l == 2 && y == y2));
    }

    #[test]
    fn test_verify_regions() {
        let sprites: Sprites = [Sprite::new(1, 0, 0, 0, 0).unwrap()].into_iter().collect();

        assert!(verify_regions(&sprites, [1]).is_ok());
        assert_eq!(verify_regions(&sprites, [1, 3]), Err(SprigError::EmptyRegion(3)));
    }
}
