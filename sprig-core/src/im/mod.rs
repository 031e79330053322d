mod color;
mod grid;
mod image;
mod labels;
mod render;
mod sprite;

pub use color::Channel;
pub use color::Color;
pub use color::GrayColor;
pub use color::RgbColor;
pub use color::RgbaColor;

pub use grid::Grid;
pub use grid::Label;
pub use grid::LabelGrid;
pub use grid::PixelGrid;
pub use grid::PixelGridView;

pub use image::Detection;
pub use image::SprigImage;

pub use render::label_color;
pub use render::render_sprites;

pub use sprite::Sprite;
pub use sprite::Sprites;
pub use sprite::read_sprites_json;
pub use sprite::write_sprites_json;
