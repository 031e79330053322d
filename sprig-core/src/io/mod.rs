mod npy;

pub use npy::read_numpy_labels;
pub use npy::write_numpy;
