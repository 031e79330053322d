pub mod background;
pub mod detect;
