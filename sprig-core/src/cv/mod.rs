pub mod background;
pub mod banded;
pub mod connected;
pub mod connectivity;
pub mod detect;
pub mod regions;

pub use background::{collapse_transparent, estimate_background};
pub use banded::label_banded;
pub use connected::{EquivalenceTable, UnionFind, label};
pub use connectivity::Connectivity;
pub use detect::{DetectOptions, detect_pixels, detect_regions, detect_regions_with};
pub use regions::{aggregate, verify_regions};
