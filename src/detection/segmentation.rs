use image::RgbImage;
use imageproc::filter::median_filter;
use tracing::debug;

use crate::config::SegmentationConfig;
use crate::detection::{contours, preprocessing};
use crate::detection::preprocessing::Hsv;
use crate::models::{BandColor, Outline};

/// Static description of how one band colour is picked out of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorProfile {
    pub color: BandColor,
    pub lower: Hsv,
    pub upper: Hsv,
    /// Components must be strictly larger than this.
    pub min_area: u32,
    /// Overrides the configured upper bound when set.
    pub max_area: Option<u32>,
    /// Keep only the single largest component, ignoring the area bounds.
    pub largest_only: bool,
    /// Median-blur the masked image before tracing outlines.
    pub blur: bool,
}

impl ColorProfile {
    const fn new(color: BandColor, lower: Hsv, upper: Hsv, min_area: u32) -> Self {
        Self {
            color,
            lower,
            upper,
            min_area,
            max_area: None,
            largest_only: false,
            blur: false,
        }
    }

    const fn blurred(mut self) -> Self {
        self.blur = true;
        self
    }

    const fn largest(mut self) -> Self {
        self.largest_only = true;
        self
    }

    const fn with_max_area(mut self, max_area: u32) -> Self {
        self.max_area = Some(max_area);
        self
    }
}

/// Every recognized colour, in the order segmentation runs.
pub const PROFILES: [ColorProfile; 11] = [
    ColorProfile::new(BandColor::Gold, [11, 32, 54], [22, 53, 141], 0).largest().blurred(),
    ColorProfile::new(BandColor::Brown, [0, 50, 50], [180, 76, 120], 200).blurred(),
    ColorProfile::new(BandColor::Green, [40, 130, 62], [74, 180, 115], 60),
    ColorProfile::new(BandColor::Violet, [125, 50, 100], [167, 125, 160], 100),
    ColorProfile::new(BandColor::Yellow, [23, 98, 138], [53, 190, 240], 20),
    ColorProfile::new(BandColor::Red, [150, 110, 90], [180, 180, 210], 50),
    ColorProfile::new(BandColor::Black, [25, 0, 20], [150, 90, 86], 2000).with_max_area(6000),
    ColorProfile::new(BandColor::Orange, [0, 110, 145], [30, 174, 205], 100),
    ColorProfile::new(BandColor::Blue, [90, 94, 79], [120, 148, 138], 50),
    ColorProfile::new(BandColor::White, [20, 12, 134], [30, 40, 170], 2000).with_max_area(6000),
    ColorProfile::new(BandColor::Grey, [44, 0, 46], [180, 20, 90], 50),
];

pub fn profile_for(color: BandColor) -> Option<&'static ColorProfile> {
    PROFILES.iter().find(|p| p.color == color)
}

/// Outlines detected for one colour.
#[derive(Debug, Clone)]
pub struct ColorSegment {
    pub color: BandColor,
    pub outlines: Vec<Outline>,
}

/// Segment one colour out of `image` and OR its surviving pixels into
/// `combined`, which is handed back to the caller for the next colour.
pub fn segment(
    image: &RgbImage,
    profile: &ColorProfile,
    mut combined: RgbImage,
    config: &SegmentationConfig,
) -> (ColorSegment, RgbImage) {
    let initial = preprocessing::hsv_in_range(image, profile.lower, profile.upper);
    let (labeled, areas) = contours::label_components(&initial);

    let refined = if profile.largest_only {
        // Ties go to the lowest label, i.e. the first component found in scan order
        let largest = areas
            .iter()
            .max_by(|(la, aa), (lb, ab)| aa.cmp(ab).then(lb.cmp(la)))
            .map(|(&label, _)| label);
        contours::mask_from_labels(&labeled, |label| Some(label) == largest)
    } else {
        let max_area = profile.max_area.unwrap_or(config.max_component_area);
        contours::mask_from_labels(&labeled, |label| {
            areas
                .get(&label)
                .is_some_and(|&area| profile.min_area < area && area < max_area)
        })
    };

    let mut band_img = preprocessing::apply_mask(image, &refined);
    if profile.blur {
        let radius = config.median_kernel / 2;
        band_img = median_filter(&band_img, radius, radius);
    }

    let band_gray = preprocessing::to_grayscale(&band_img);
    let binary = preprocessing::binarize(&band_gray, 1, false);
    let outlines = contours::find_external_outlines(&binary);

    if combined.dimensions() != image.dimensions() {
        combined = preprocessing::resize_to(&combined, image.width(), image.height());
    }
    preprocessing::or_into(&mut combined, &band_img);

    debug!(
        color = %profile.color,
        components = areas.len(),
        outlines = outlines.len(),
        "Segmented colour"
    );

    (
        ColorSegment {
            color: profile.color,
            outlines,
        },
        combined,
    )
}

/// Run every profile in turn, threading the combined image through.
pub fn segment_all(
    image: &RgbImage,
    profiles: &[ColorProfile],
    config: &SegmentationConfig,
) -> (Vec<ColorSegment>, RgbImage) {
    let mut combined = RgbImage::new(image.width(), image.height());
    let mut segments = Vec::with_capacity(profiles.len());

    for profile in profiles {
        let (segment, updated) = segment(image, profile, combined, config);
        segments.push(segment);
        combined = updated;
    }

    (segments, combined)
}

/// Outlines of the union of all colour detections.
pub fn combined_outlines(combined: &RgbImage) -> Vec<Outline> {
    let gray = preprocessing::to_grayscale(combined);
    let binary = preprocessing::binarize(&gray, 1, false);
    contours::find_external_outlines(&binary)
}
