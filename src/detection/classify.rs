use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::detection::segmentation::ColorSegment;
use crate::error::ReaderError;
use crate::models::{BandColor, Outline, Reading};

/// Order in which colours are tried against each band; the first match wins.
pub const CLASSIFY_PRIORITY: [BandColor; 11] = [
    BandColor::Orange,
    BandColor::Red,
    BandColor::Green,
    BandColor::Blue,
    BandColor::Yellow,
    BandColor::Black,
    BandColor::Brown,
    BandColor::Gold,
    BandColor::Violet,
    BandColor::White,
    BandColor::Grey,
];

const HU_EPSILON: f64 = 1.0e-5;

/// Moment-invariant distance between two shapes: the sum over Hu invariants
/// of `|1/mA - 1/mB|`, where `m = sign(h) * log10|h|`. Invariants that
/// vanish in either shape are skipped.
pub fn shape_distance(a: &Outline, b: &Outline) -> f64 {
    let ha = a.hu_moments();
    let hb = b.hu_moments();

    ha.iter()
        .zip(hb.iter())
        .filter(|(x, y)| x.abs() > HU_EPSILON && y.abs() > HU_EPSILON)
        .map(|(x, y)| {
            let ma = 1.0 / (x.signum() * x.abs().log10());
            let mb = 1.0 / (y.signum() * y.abs().log10());
            (ma - mb).abs()
        })
        .sum()
}

/// Reference outlines per colour that bands are matched against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceOutlines {
    by_color: HashMap<BandColor, Vec<Outline>>,
}

impl ReferenceOutlines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, color: BandColor, outlines: Vec<Outline>) {
        self.by_color.entry(color).or_default().extend(outlines);
    }

    pub fn get(&self, color: BandColor) -> &[Outline] {
        self.by_color.get(&color).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl From<&[ColorSegment]> for ReferenceOutlines {
    fn from(segments: &[ColorSegment]) -> Self {
        let mut refs = Self::new();
        for segment in segments {
            refs.insert(segment.color, segment.outlines.clone());
        }
        refs
    }
}

/// Assigns colours to ordered bands by shape and position.
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    pub shape_threshold: f64,
    pub centroid_threshold: i32,
    pub comparison_budget: usize,
}

impl ColorClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            shape_threshold: config.shape_threshold,
            centroid_threshold: config.centroid_threshold,
            comparison_budget: config.comparison_budget,
        }
    }

    fn matches(&self, band: &Outline, references: &[Outline]) -> bool {
        let band_cx = band.centroid_x();
        references.iter().any(|reference| {
            shape_distance(reference, band) <= self.shape_threshold
                && (band_cx - reference.centroid_x()).abs() <= self.centroid_threshold
        })
    }

    /// First colour in priority order with a matching reference outline.
    pub fn classify_band(&self, band: &Outline, refs: &ReferenceOutlines) -> Option<BandColor> {
        CLASSIFY_PRIORITY
            .into_iter()
            .find(|&color| self.matches(band, refs.get(color)))
    }

    /// Label each band, retrying unlabelled bands until four labels are
    /// collected, a gold band has been seen, or the comparison budget runs
    /// out.
    ///
    /// Each attempt to label one band counts as one comparison.
    pub fn assign(&self, bands: &[Outline], refs: &ReferenceOutlines) -> Classification {
        let mut labels: Vec<Option<BandColor>> = vec![None; bands.len()];
        let mut found = 0;
        let mut comparisons = 0;

        'passes: loop {
            let pending: Vec<usize> = (0..bands.len()).filter(|&i| labels[i].is_none()).collect();
            if pending.is_empty() {
                break;
            }

            for i in pending {
                if found == 4 || comparisons >= self.comparison_budget {
                    break 'passes;
                }
                comparisons += 1;
                if let Some(color) = self.classify_band(&bands[i], refs) {
                    debug!(band = i, %color, "Classified band");
                    labels[i] = Some(color);
                    found += 1;
                }
            }

            if found == 4 || labels.contains(&Some(BandColor::Gold)) {
                break;
            }
        }

        debug!(comparisons, found, "Classification finished");
        Classification { labels, comparisons }
    }

    /// Classify ordered bands into a four-colour reading.
    pub fn classify(&self, bands: &[Outline], refs: &ReferenceOutlines) -> Result<Reading, ReaderError> {
        if bands.is_empty() {
            return Err(ReaderError::NoBandsFound);
        }

        let classification = self.assign(bands, refs);
        let colors = classification.colors();
        if colors.len() != 4 {
            warn!(
                found = colors.len(),
                comparisons = classification.comparisons,
                "Incomplete reading"
            );
        }
        Reading::try_from(colors)
    }
}

/// Outcome of the bounded labelling loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// One slot per ordered band; `None` where nothing matched.
    pub labels: Vec<Option<BandColor>>,
    pub comparisons: usize,
}

impl Classification {
    /// Assigned colours in band order, skipping unlabelled bands.
    pub fn colors(&self) -> Vec<BandColor> {
        self.labels.iter().flatten().copied().collect()
    }
}
