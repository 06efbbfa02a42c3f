use image::{GrayImage, RgbImage};
use image::imageops;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};
use tracing::debug;

use crate::config::CropConfig;
use crate::detection::preprocessing;
use crate::error::ReaderError;
use crate::models::BoundingBox;

/// Locate the resistor body by normalized cross-correlation against
/// `template` and return the template-sized region at the best match.
pub fn locate(gray: &GrayImage, template: &GrayImage) -> Result<BoundingBox, ReaderError> {
    let (tw, th) = template.dimensions();
    let (iw, ih) = gray.dimensions();

    if tw == 0 || th == 0 {
        return Err(ReaderError::InvalidInput("template image is empty".into()));
    }
    if tw > iw || th > ih {
        return Err(ReaderError::LocalizationFailure {
            reason: format!("template {tw}x{th} does not fit in {iw}x{ih} frame"),
        });
    }

    let scores = match_template(gray, template, MatchTemplateMethod::CrossCorrelationNormalized);
    let extremes = find_extremes(&scores);
    let (x, y) = extremes.max_value_location;
    debug!(x, y, score = extremes.max_value, "Template match");

    if !extremes.max_value.is_finite() || extremes.max_value <= 0.0 {
        return Err(ReaderError::LocalizationFailure {
            reason: format!("no template response (best score {})", extremes.max_value),
        });
    }

    let region = BoundingBox {
        x: x as i32,
        y: y as i32,
        width: tw as i32,
        height: th as i32,
    };
    if region.x + region.width > iw as i32 || region.y + region.height > ih as i32 {
        return Err(ReaderError::LocalizationFailure {
            reason: format!("match region {region:?} falls outside {iw}x{ih} frame"),
        });
    }

    Ok(region)
}

/// Crop the located body, upscale it and sharpen the result.
pub fn crop_resistor(
    rotated: &RgbImage,
    template: &GrayImage,
    config: &CropConfig,
) -> Result<RgbImage, ReaderError> {
    let gray = preprocessing::to_grayscale(rotated);
    let region = locate(&gray, template)?;

    let cropped = imageops::crop_imm(
        rotated,
        region.x as u32,
        region.y as u32,
        region.width as u32,
        region.height as u32,
    )
    .to_image();

    let upscaled = preprocessing::upscale(&cropped, config.scale_x, config.scale_y);
    Ok(preprocessing::sharpen(&upscaled))
}
