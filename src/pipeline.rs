use std::path::PathBuf;

use anyhow::Result;
use image::{GrayImage, RgbImage};
use tracing::info;

use crate::config::ReaderConfig;
use crate::decode;
use crate::detection::{bands, contours, crop, preprocessing, rotation, segmentation, white_balance};
use crate::detection::classify::{ColorClassifier, ReferenceOutlines};
use crate::detection::segmentation::ColorSegment;
use crate::error::ReaderError;
use crate::models::{Outline, Reading, ResistanceValue};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context available to all pipeline stages
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Frame after geometric normalization, with the intermediate images kept.
#[derive(Clone, Debug)]
pub struct NormalizedFrame {
    pub rotated: RgbImage,
    pub cropped: RgbImage,
    pub balanced: RgbImage,
}

/// Colour analysis of a normalized resistor image.
#[derive(Clone, Debug)]
pub struct BandAnalysis {
    pub reading: Reading,
    pub resistance: ResistanceValue,
    /// Unique bands, left to right.
    pub bands: Vec<Outline>,
    pub segments: Vec<ColorSegment>,
    /// Union of all colour detections; a QA artifact only.
    pub combined: RgbImage,
}

/// Everything produced by one successful read.
#[derive(Clone, Debug)]
pub struct ReadingReport {
    pub reading: Reading,
    pub resistance: ResistanceValue,
    pub bands: Vec<Outline>,
    pub segments: Vec<ColorSegment>,
    /// Union of all colour detections; a QA artifact only.
    pub combined: RgbImage,
    pub normalized: NormalizedFrame,
}

/// Image-to-resistance pipeline for a single captured frame.
pub struct ResistorReader {
    template: GrayImage,
    reference: RgbImage,
    config: ReaderConfig,
    context: PipelineContext,
}

impl ResistorReader {
    /// Create a reader from the localization template and the white-balance
    /// reference image, with default settings.
    pub fn new(template: GrayImage, reference: RgbImage) -> Self {
        Self {
            template,
            reference,
            config: ReaderConfig::default(),
            context: PipelineContext::default(),
        }
    }

    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Threshold the frame and trace its foreground outlines.
    ///
    /// Returns every outline (used for rotation) once at least one of them
    /// is larger than the configured minimum area.
    pub fn detect_foreground(&self, frame: &RgbImage) -> Result<Vec<Outline>, ReaderError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(ReaderError::InvalidInput("captured frame is empty".into()));
        }

        let gray = preprocessing::to_grayscale(frame);
        let binary = preprocessing::binarize(&gray, self.config.capture.threshold, true);
        let outlines = contours::find_all_outlines(&binary);

        let significant = outlines
            .iter()
            .filter(|o| o.area() > self.config.capture.min_outline_area)
            .count();
        info!(outlines = outlines.len(), significant, "Foreground detection");

        if significant == 0 {
            return Err(ReaderError::NoForegroundDetected);
        }
        Ok(outlines)
    }

    /// Rotate, crop and white-balance the frame.
    pub fn normalize(&self, frame: &RgbImage, foreground: &[Outline]) -> Result<NormalizedFrame, ReaderError> {
        let rotated = rotation::correct_rotation(frame, foreground, &self.config.rotation)?;
        let cropped = crop::crop_resistor(&rotated, &self.template, &self.config.crop)?;
        let balanced = white_balance::white_balance(&cropped, &self.reference, &self.config.white_balance);

        Ok(NormalizedFrame {
            rotated,
            cropped,
            balanced,
        })
    }

    /// Segment, dedup, order, classify and decode the bands of an already
    /// normalized resistor image.
    pub fn analyze(&self, balanced: &RgbImage) -> Result<BandAnalysis, ReaderError> {
        let (segments, combined) =
            segmentation::segment_all(balanced, &segmentation::PROFILES, &self.config.segmentation);
        if self.context.verbose {
            for segment in &segments {
                println!("  {:<7} {} outlines", segment.color, segment.outlines.len());
            }
        }

        let unique = bands::dedup_bands(segmentation::combined_outlines(&combined));
        let ordered = bands::order_bands(unique);
        info!(bands = ordered.len(), "Bands after dedup");
        if self.context.verbose {
            println!("Unique bands: {}", ordered.len());
        }

        let refs = ReferenceOutlines::from(segments.as_slice());
        let reading = ColorClassifier::new(&self.config.classifier).classify(&ordered, &refs)?;
        info!(%reading, "Colours in order");
        if self.context.verbose {
            println!("Colours in order: {}", reading);
        }

        let resistance = decode::decode_reading(&reading)?;

        Ok(BandAnalysis {
            reading,
            resistance,
            bands: ordered,
            segments,
            combined,
        })
    }

    /// Read the resistance of the resistor in `frame`.
    pub fn read(&self, frame: &RgbImage) -> Result<ReadingReport, ReaderError> {
        let foreground = self.detect_foreground(frame)?;
        if self.context.verbose {
            println!("Foreground outlines: {}", foreground.len());
        }

        let normalized = self.normalize(frame, &foreground)?;
        if self.context.verbose {
            let (w, h) = normalized.balanced.dimensions();
            println!("Normalized resistor image: {}x{}", w, h);
        }

        let analysis = self.analyze(&normalized.balanced)?;

        Ok(ReadingReport {
            reading: analysis.reading,
            resistance: analysis.resistance,
            bands: analysis.bands,
            segments: analysis.segments,
            combined: analysis.combined,
            normalized,
        })
    }

    /// Read the frame and, in debug mode, save the intermediate images.
    pub fn run(&self, frame: &RgbImage) -> Result<ReadingReport> {
        let report = self.read(frame)?;
        self.save_debug_outputs(&report)?;
        Ok(report)
    }

    fn save_debug_outputs(&self, report: &ReadingReport) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };
        if !debug_config.enabled {
            return Ok(());
        }

        let outputs = [
            ("01_rotated.png", &report.normalized.rotated),
            ("02_cropped.png", &report.normalized.cropped),
            ("03_balanced.png", &report.normalized.balanced),
            ("04_combined.png", &report.combined),
        ];
        for (filename, img) in outputs {
            let output_path = debug_config.output_dir.join(filename);
            img.save(&output_path)
                .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
            if self.context.verbose {
                println!("  Debug: saved {}", filename);
            }
        }

        Ok(())
    }
}
