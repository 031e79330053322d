// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constant::SPRITES_JSON_VALID_KEYS;
use crate::error::SprigError;
use crate::im::Label;
use crate::ut::path::extension;

/// The label and tight bounding box of one sprite
///
/// The box is stored in inclusive xyxy format: (`x1`, `y1`) is the top-left
/// pixel and (`x2`, `y2`) the bottom-right pixel of the sprite.
///
/// # Examples
///
/// ```
/// use sprig_core::im::Sprite;
///
/// let sprite = Sprite::new(1, 2, 3, 4, 7).unwrap();
/// assert_eq!(sprite.top_left(), (2, 3));
/// assert_eq!(sprite.bottom_right(), (4, 7));
/// assert_eq!(sprite.width(), 3);
/// assert_eq!(sprite.height(), 5);
///
/// assert!(Sprite::new(1, 5, 0, 4, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SpriteRecord")]
pub struct Sprite {
    label: Label,
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

#[derive(Deserialize)]
struct SpriteRecord {
    label: Label,
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl TryFrom<SpriteRecord> for Sprite {
    type Error = SprigError;

    fn try_from(r: SpriteRecord) -> Result<Self, Self::Error> {
        Sprite::new(r.label, r.x1, r.y1, r.x2, r.y2)
    }
}

impl Sprite {
    /// Initialize a new sprite
    ///
    /// # Arguments
    ///
    /// * `label` - Label shared by every pixel of the sprite
    /// * `x1` - Left column
    /// * `y1` - Top row
    /// * `x2` - Right column (inclusive)
    /// * `y2` - Bottom row (inclusive)
    pub fn new(label: Label, x1: u32, y1: u32, x2: u32, y2: u32) -> Result<Self, SprigError> {
        if x1 > x2 || y1 > y2 {
            return Err(SprigError::InvalidBoundingBox);
        }

        Ok(Sprite {
            label,
            x1,
            y1,
            x2,
            y2,
        })
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn top_left(&self) -> (u32, u32) {
        (self.x1, self.y1)
    }

    pub fn bottom_right(&self) -> (u32, u32) {
        (self.x2, self.y2)
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels covered by the bounding box
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Bounding box as [x1, y1, x2, y2]
    pub fn as_xyxy(&self) -> [u32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Check if the pixel (`x`, `y`) lies inside the bounding box
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }
}

/// Sprites of one sprite sheet keyed by ascending label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprites {
    data: BTreeMap<Label, Sprite>,
}

impl Sprites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sprite, replacing any sprite with the same label
    pub fn insert(&mut self, sprite: Sprite) -> Option<Sprite> {
        self.data.insert(sprite.label(), sprite)
    }
}

impl FromIterator<Sprite> for Sprites {
    fn from_iter<I: IntoIterator<Item = Sprite>>(iter: I) -> Self {
        Sprites {
            data: iter.into_iter().map(|s| (s.label(), s)).collect(),
        }
    }
}

// >>> PROPERTY METHODS

impl Sprites {
    /// Number of sprites
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no sprites were found
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, label: Label) -> Option<&Sprite> {
        self.data.get(&label)
    }

    pub fn contains(&self, label: Label) -> bool {
        self.data.contains_key(&label)
    }

    /// Labels in ascending order
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.data.keys().copied()
    }

    /// Sprites in ascending label order
    pub fn iter(&self) -> btree_map::Values<'_, Label, Sprite> {
        self.data.values()
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl Sprites {
    /// Return a reference to the label to sprite mapping
    pub fn as_map(&self) -> &BTreeMap<Label, Sprite> {
        &self.data
    }

    /// Return the label to sprite mapping
    pub fn into_inner(self) -> BTreeMap<Label, Sprite> {
        self.data
    }

    /// Return the bounding boxes in xyxy format, ordered by label
    pub fn to_xyxy(&self) -> Vec<[u32; 4]> {
        self.iter().map(Sprite::as_xyxy).collect()
    }
}

impl<'a> IntoIterator for &'a Sprites {
    type Item = &'a Sprite;
    type IntoIter = btree_map::Values<'a, Label, Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// <<< CONVERSION METHODS

// >>> I/O METHODS

impl Sprites {
    /// Open sprites from the provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to sprites with a valid extension
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sprig_core::im::Sprites;
    /// let sprites = Sprites::open("sprites.json");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Sprites, SprigError> {
        match extension(&path).as_deref() {
            Some("json") => read_sprites_json(path),
            _ => Err(SprigError::SpritesReadError),
        }
    }

    /// Save sprites at the provided path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to save sprites
    /// * `background` - Background color the sprites were separated from
    pub fn save<P: AsRef<Path>>(&self, path: P, background: Option<&[u32]>) -> Result<(), SprigError> {
        match extension(&path).as_deref() {
            Some("json") => write_sprites_json(path, self, background),
            _ => Err(SprigError::SpritesWriteError),
        }
    }
}

// <<< I/O METHODS

/// Read sprites stored as json format
pub fn read_sprites_json<P: AsRef<Path>>(path: P) -> Result<Sprites, SprigError> {
    let mut contents = String::new();

    File::open(path)
        .map_err(|err| SprigError::NoFileError(err.to_string()))?
        .read_to_string(&mut contents)
        .map_err(|err| SprigError::NoFileError(err.to_string()))?;

    let data: Value = serde_json::from_str(&contents).map_err(|_| SprigError::SpritesReadError)?;

    for key in &SPRITES_JSON_VALID_KEYS {
        if let Some(sprites) = data.get(key) {
            let sprites: Vec<Sprite> = serde_json::from_value(sprites.clone())
                .map_err(|_| SprigError::SpritesReadError)?;

            return Ok(sprites.into_iter().collect());
        }
    }

    Err(SprigError::SpritesReadError)
}

/// Write sprites to a json file
pub fn write_sprites_json<P: AsRef<Path>>(
    path: P,
    sprites: &Sprites,
    background: Option<&[u32]>,
) -> Result<(), SprigError> {
    let file = File::create(path).map_err(|_| SprigError::SpritesWriteError)?;
    let writer = BufWriter::new(file);

    let sprites: Vec<&Sprite> = sprites.iter().collect();

    serde_json::to_writer(
        writer,
        &serde_json::json!({ "background": background, "sprites": sprites }),
    )
    .map_err(|_| SprigError::SpritesWriteError)?;

    Ok(())
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_sprite_accessors() {
        let sprite = Sprite::new(3, 1, 1, 1, 1).unwrap();
        assert_eq!(sprite.label(), 3);
        assert_eq!(sprite.width(), 1);
        assert_eq!(sprite.height(), 1);
        assert_eq!(sprite.area(), 1);
        assert!(sprite.contains(1, 1));
        assert!(!sprite.contains(0, 1));
    }

    #[test]
    fn test_sprite_invalid_box() {
        assert_eq!(Sprite::new(1, 0, 3, 0, 2), Err(SprigError::InvalidBoundingBox));
        assert_eq!(Sprite::new(1, 3, 0, 2, 0), Err(SprigError::InvalidBoundingBox));
    }

    #[test]
    fn test_sprites_ordered_by_label() {
        let sprites: Sprites = [
            Sprite::new(9, 0, 0, 1, 1).unwrap(),
            Sprite::new(2, 4, 4, 5, 6).unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(sprites.labels().collect::<Vec<_>>(), vec![2, 9]);
        assert_eq!(sprites.to_xyxy(), vec![[4, 4, 5, 6], [0, 0, 1, 1]]);
    }

    #[test]
    fn test_write_json() {
        const OUTPUT: &str = "TEST_SPRITES_WRITE.json";

        let sprites: Sprites = [
            Sprite::new(1, 0, 0, 2, 3).unwrap(),
            Sprite::new(5, 6, 1, 6, 1).unwrap(),
        ]
        .into_iter()
        .collect();

        sprites
            .save(OUTPUT, Some([255, 255, 255].as_slice()))
            .unwrap();

        let reloaded = Sprites::open(OUTPUT).unwrap();
        assert_eq!(sprites, reloaded);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(OUTPUT).unwrap()).unwrap();
        assert_eq!(raw["background"], serde_json::json!([255, 255, 255]));
        assert_eq!(raw["sprites"][1]["x1"], 6);

        std::fs::remove_file(OUTPUT).unwrap();
    }

    #[test]
    fn test_open_json_rejects_invalid_box() {
        const OUTPUT: &str = "TEST_SPRITES_INVALID.json";

        std::fs::write(
            OUTPUT,
            r#"{"boxes": [{"label": 1, "x1": 4, "y1": 0, "x2": 2, "y2": 0}]}"#,
        )
        .unwrap();

        assert_eq!(Sprites::open(OUTPUT), Err(SprigError::SpritesReadError));

        std::fs::remove_file(OUTPUT).unwrap();
    }

    #[test]
    fn test_open_json_failure() {
        assert!(Sprites::open("does_not_exist.json").is_err());
        assert_eq!(Sprites::open("sprites.csv"), Err(SprigError::SpritesReadError));
    }
}
