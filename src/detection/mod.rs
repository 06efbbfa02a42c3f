pub mod bands;
pub mod classify;
pub mod contours;
pub mod crop;
pub mod preprocessing;
pub mod rotation;
pub mod segmentation;
pub mod white_balance;

pub use bands::{dedup_bands, merge_sort_by_key, order_bands};
pub use classify::{Classification, ColorClassifier, ReferenceOutlines, shape_distance};
pub use segmentation::{ColorProfile, ColorSegment, PROFILES, segment};
