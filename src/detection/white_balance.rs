use image::{Rgb, RgbImage};
use tracing::debug;

use crate::config::{WhiteBalanceConfig, WhitePatch};
use crate::detection::preprocessing;

/// Pixels of the assumed-white patch, sampled from a virtual upscaled view
/// of `img` without materializing it.
pub fn extract_white_patch(img: &RgbImage, patch: &WhitePatch) -> Vec<[f32; 3]> {
    let mut pixels = Vec::with_capacity((patch.size * patch.size) as usize);
    for py in patch.y..patch.y + patch.size {
        for px in patch.x..patch.x + patch.size {
            let fx = (px as f32 + 0.5) / patch.scale - 0.5;
            let fy = (py as f32 + 0.5) / patch.scale - 0.5;
            pixels.push(preprocessing::sample_bilinear(img, fx, fy));
        }
    }
    pixels
}

fn channel_max(patch: &[[f32; 3]]) -> [f32; 3] {
    patch.iter().fold([0.0f32; 3], |acc, p| {
        [acc[0].max(p[0]), acc[1].max(p[1]), acc[2].max(p[2])]
    })
}

fn mean(patch: &[[f32; 3]]) -> f32 {
    if patch.is_empty() {
        return 0.0;
    }
    patch.iter().flatten().sum::<f32>() / (patch.len() * 3) as f32
}

fn distance(a: &[[f32; 3]], b: &[[f32; 3]]) -> f32 {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Divide every pixel by the white patch's per-channel maximum.
pub fn patch_max_balance(img: &RgbImage, patch: &WhitePatch) -> RgbImage {
    let white = channel_max(&extract_white_patch(img, patch)).map(|m| m.max(1.0));

    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        Rgb([0usize, 1, 2].map(|c| ((p[c] as f32 / white[c]).clamp(0.0, 1.0) * 255.0) as u8))
    })
}

/// Correct `img` towards `reference` using their white patches: one variant
/// scales by the ratio of patch means, the other shifts by a fraction of the
/// patch distance, and the two are blended.
pub fn deviation_balance(img: &RgbImage, reference: &RgbImage, config: &WhiteBalanceConfig) -> RgbImage {
    let reference_patch = extract_white_patch(reference, &config.patch);
    let current_patch = extract_white_patch(img, &config.patch);

    let current_mean = mean(&current_patch);
    let scale = if current_mean > 0.0 {
        mean(&reference_patch) / current_mean
    } else {
        1.0
    };
    let shift = config.shift_factor * distance(&reference_patch, &current_patch);
    debug!(scale, shift, "Deviation white balance");

    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        Rgb([0usize, 1, 2].map(|c| {
            let v = p[c] as f32;
            let scaled = v * scale;
            let shifted = v + shift;
            (config.scale_weight * scaled + config.shift_weight * shifted).clamp(0.0, 255.0) as u8
        }))
    })
}

/// Neutralize colour cast: both passes run at the working resolution and are
/// blended.
///
/// If the patch location doesn't hold background the result is degraded
/// rather than rejected.
pub fn white_balance(img: &RgbImage, reference: &RgbImage, config: &WhiteBalanceConfig) -> RgbImage {
    let (w, h) = (config.working_width, config.working_height);
    let working = preprocessing::resize_to(img, w, h);
    let reference = preprocessing::resize_to(reference, w, h);

    let deviation = deviation_balance(&working, &reference, config);
    let patch_max = patch_max_balance(&working, &config.patch);

    preprocessing::blend(&deviation, config.deviation_weight, &patch_max, config.patch_max_weight)
}
