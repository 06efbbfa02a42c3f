use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Tunable parameters for every pipeline stage.
///
/// All sections default to the values the reader was calibrated with, so a
/// JSON file only needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub capture: CaptureConfig,
    pub rotation: RotationConfig,
    pub crop: CropConfig,
    pub white_balance: WhiteBalanceConfig,
    pub segmentation: SegmentationConfig,
    pub classifier: ClassifierConfig,
}

impl ReaderConfig {
    /// Load a config from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Foreground gate applied to the raw frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Pixels at or below this grey level count as foreground.
    pub threshold: u8,
    /// Outlines must enclose strictly more than this many px².
    pub min_outline_area: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            threshold: 140,
            min_outline_area: 200.0,
        }
    }
}

/// How destination pixels are produced when rotating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// Sample the source for every destination pixel (bilinear, no holes).
    Inverse,
    /// Push every source pixel to its destination; leaves unfilled gaps.
    Forward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Angles strictly inside (0, snap_degrees) are treated as horizontal.
    pub snap_degrees: f64,
    pub mode: RotationMode,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            snap_degrees: 5.0,
            mode: RotationMode::Inverse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub scale_x: u32,
    pub scale_y: u32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            scale_x: 2,
            scale_y: 3,
        }
    }
}

/// Location of the background patch assumed to be white.
///
/// The patch is addressed in a virtual view of the working image upscaled by
/// `scale`, so a 15px patch at scale 20 covers under one source pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitePatch {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub scale: f32,
}

impl Default for WhitePatch {
    fn default() -> Self {
        Self {
            x: 300,
            y: 60,
            size: 15,
            scale: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteBalanceConfig {
    pub working_width: u32,
    pub working_height: u32,
    pub patch: WhitePatch,
    /// Weight of the patch-max pass in the final blend.
    pub patch_max_weight: f32,
    /// Weight of the deviation pass in the final blend.
    pub deviation_weight: f32,
    /// Fraction of the patch distance added as a brightness shift.
    pub shift_factor: f32,
    /// Weight of the mean-ratio variant inside the deviation pass.
    pub scale_weight: f32,
    /// Weight of the shifted variant inside the deviation pass.
    pub shift_weight: f32,
}

impl Default for WhiteBalanceConfig {
    fn default() -> Self {
        Self {
            working_width: 450,
            working_height: 350,
            patch: WhitePatch::default(),
            patch_max_weight: 0.7,
            deviation_weight: 0.3,
            shift_factor: 0.03,
            scale_weight: 0.6,
            shift_weight: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Upper component-area bound for profiles that don't set their own.
    pub max_component_area: u32,
    /// Side of the square median kernel used by blurring profiles.
    pub median_kernel: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_component_area: 1300,
            median_kernel: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub shape_threshold: f64,
    pub centroid_threshold: i32,
    /// Total band comparisons allowed across all retry passes.
    pub comparison_budget: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            shape_threshold: 0.1,
            centroid_threshold: 10,
            comparison_budget: 20,
        }
    }
}
