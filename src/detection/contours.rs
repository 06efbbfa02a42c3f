use std::collections::HashMap;

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::models::Outline;

/// Per-pixel component labels; 0 is background.
pub type LabelImage = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Every traced border in a binary image, outer and hole alike.
pub fn find_all_outlines(binary: &GrayImage) -> Vec<Outline> {
    find_contours::<i32>(binary)
        .into_iter()
        .map(|c| Outline::new(c.points))
        .collect()
}

/// Only the outermost borders of a binary image; holes and nested regions
/// are dropped.
pub fn find_external_outlines(binary: &GrayImage) -> Vec<Outline> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Outline::new(c.points))
        .collect()
}

/// Label 8-connected foreground regions and count the pixels of each.
pub fn label_components(mask: &GrayImage) -> (LabelImage, HashMap<u32, u32>) {
    let labeled = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut areas: HashMap<u32, u32> = HashMap::new();
    for label in labeled.pixels() {
        let label_val = label[0];
        if label_val == 0 {
            continue; // Skip background
        }
        *areas.entry(label_val).or_insert(0) += 1;
    }

    (labeled, areas)
}

/// Binary mask of the pixels whose label is accepted by `keep`.
pub fn mask_from_labels(labeled: &LabelImage, keep: impl Fn(u32) -> bool) -> GrayImage {
    GrayImage::from_fn(labeled.width(), labeled.height(), |x, y| {
        let label = labeled.get_pixel(x, y)[0];
        if label != 0 && keep(label) { Luma([255]) } else { Luma([0]) }
    })
}
