// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::ops::Deref;

use image::{Rgba, RgbaImage};

use crate::constant::{DEFAULT_CANVAS_COLOR, RENDER_CHANNEL_MAX, RENDER_CHANNEL_MIN};
use crate::im::{Grid, Label, Sprites};

/// Deterministic display colour of a label
///
/// Every channel falls in `[RENDER_CHANNEL_MIN, RENDER_CHANNEL_MAX]` and
/// the alpha channel is opaque.
///
/// # Examples
///
/// ```
/// use sprig_core::im::label_color;
///
/// let color = label_color(3);
/// assert_eq!(color, label_color(3));
/// assert_eq!(color[3], 255);
/// assert!(color[..3].iter().all(|&c| (64..=200).contains(&c)));
/// ```
pub fn label_color(label: Label) -> [u8; 4] {
    // splitmix64 finalizer
    let mut z = (label as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;

    let span = (RENDER_CHANNEL_MAX - RENDER_CHANNEL_MIN) as u64 + 1;
    let channel = |shift: u32| RENDER_CHANNEL_MIN + ((z >> shift) % span) as u8;

    [channel(0), channel(16), channel(32), 255]
}

/// Render detected sprites as a colour-coded image
///
/// Labelled pixels are painted with their label colour, background pixels
/// with `canvas`, and each sprite box is outlined in its label colour.
///
/// # Arguments
///
/// * `labels` - Canonical label grid of a sheet
/// * `sprites` - Sprites detected from `labels`
/// * `canvas` - Background colour, opaque white if `None`
///
/// # Examples
///
/// ```
/// use sprig_core::cv::{Connectivity, detect_regions};
/// use sprig_core::im::{GrayColor, PixelGrid, render_sprites};
///
/// let grid = PixelGrid::<u8, 1>::from_subpixels(3, 1, &[0, 9, 0]).unwrap();
/// let (labels, sprites) = detect_regions(&grid, Some(GrayColor::new([0])), Connectivity::Eight).unwrap();
/// let render = render_sprites(&labels, &sprites, Some([0, 0, 0, 255]));
///
/// assert_eq!(render.get_pixel(0, 0).0, [0, 0, 0, 255]);
/// assert_ne!(render.get_pixel(1, 0).0, [0, 0, 0, 255]);
/// ```
pub fn render_sprites<Container>(
    labels: &Grid<Label, Container>,
    sprites: &Sprites,
    canvas: Option<[u8; 4]>,
) -> RgbaImage
where
    Container: Deref<Target = [Label]>,
{
    let canvas = Rgba(canvas.unwrap_or(DEFAULT_CANVAS_COLOR));
    let mut image = RgbaImage::from_pixel(labels.width(), labels.height(), canvas);

    for (x, y, &label) in labels.enumerate() {
        if label != 0 {
            image.put_pixel(x, y, Rgba(label_color(label)));
        }
    }

    for sprite in sprites {
        let color = Rgba(label_color(sprite.label()));
        let (x1, y1) = sprite.top_left();
        let (x2, y2) = sprite.bottom_right();

        for x in x1..=x2 {
            for y in [y1, y2] {
                if let Some(pixel) = image.get_pixel_mut_checked(x, y) {
                    *pixel = color;
                }
            }
        }

        for y in y1..=y2 {
            for x in [x1, x2] {
                if let Some(pixel) = image.get_pixel_mut_checked(x, y) {
                    *pixel = color;
                }
            }
        }
    }

    image
}

#[cfg(test)]
mod test {

    use super::*;

    use crate::im::{LabelGrid, Sprite};

    #[test]
    fn test_label_color_range() {
        for label in 1..500 {
            let color = label_color(label);
            assert!(color[..3]
                .iter()
                .all(|&c| (RENDER_CHANNEL_MIN..=RENDER_CHANNEL_MAX).contains(&c)));
            assert_eq!(color[3], 255);
        }

        assert_ne!(label_color(1), label_color(2));
    }

    #[test]
    fn test_render_sprites() {
        // An L-shaped sprite whose box covers one background pixel
        let labels = LabelGrid::new(4, 3, vec![1, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0]).unwrap();

        let sprites: Sprites = [Sprite::new(1, 0, 0, 1, 1).unwrap()].into_iter().collect();
        let render = render_sprites(&labels, &sprites, None);

        let color = label_color(1);

        assert_eq!(render.dimensions(), (4, 3));
        assert_eq!(render.get_pixel(0, 0).0, color);
        assert_eq!(render.get_pixel(1, 1).0, color);
        // Outline
        assert_eq!(render.get_pixel(1, 0).0, color);
        // Canvas
        assert_eq!(render.get_pixel(3, 2).0, DEFAULT_CANVAS_COLOR);
        assert_eq!(render.get_pixel(2, 0).0, DEFAULT_CANVAS_COLOR);
    }

    #[test]
    fn test_render_empty() {
        let labels = LabelGrid::new(2, 2, vec![0; 4]).unwrap();
        let render = render_sprites(&labels, &Sprites::new(), Some([1, 2, 3, 4]));
        assert!(render.pixels().all(|p| p.0 == [1, 2, 3, 4]));
    }
}
