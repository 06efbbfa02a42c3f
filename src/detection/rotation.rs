use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp, Interpolation, Projection};
use imageproc::geometry::min_area_rect;
use imageproc::point::Point;
use tracing::debug;

use crate::config::{RotationConfig, RotationMode};
use crate::error::ReaderError;
use crate::models::Outline;

/// Row-major 2x3 affine transform mapping source to destination coordinates.
pub type AffineMatrix = [[f64; 3]; 2];

/// Outline enclosing the largest area, if any.
pub fn largest_outline(outlines: &[Outline]) -> Option<&Outline> {
    outlines
        .iter()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
}

/// Direction of the edge `a -> b` in degrees, folded into (-90, 90].
fn edge_angle(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let mut deg = dy.atan2(dx).to_degrees();
    if deg > 90.0 {
        deg -= 180.0;
    } else if deg <= -90.0 {
        deg += 180.0;
    }
    deg
}

fn edge_length(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    dx.hypot(dy)
}

/// Angle (degrees, counter-clockwise) that brings the outline's long axis
/// horizontal.
///
/// The reference edge of the minimum-area rectangle is the one whose angle
/// lies in (0, 90]. An exactly vertical reference edge means the rectangle
/// is already axis-aligned, and angles below `snap_degrees` are treated as
/// horizontal. Otherwise, when the reference corners span the short side,
/// the body slants the other way and a quarter turn is added.
pub fn rotation_angle(outline: &Outline, snap_degrees: f64) -> f64 {
    let points = outline.points();
    if points.len() < 3 {
        return 0.0;
    }

    let corners = min_area_rect(points);
    let edges = [(corners[0], corners[1]), (corners[1], corners[2])];

    let reference = edges
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| (i, edge_angle(a, b)))
        .find(|&(_, angle)| angle > 0.0 && angle <= 90.0);

    let Some((index, raw)) = reference else {
        return 0.0;
    };

    if raw == 90.0 || raw < snap_degrees {
        return 0.0;
    }

    let (ra, rb) = edges[index];
    let (oa, ob) = edges[1 - index];
    if edge_length(ra, rb) < edge_length(oa, ob) {
        raw + 90.0
    } else {
        raw
    }
}

/// Rotation about the image centre by `angle_degrees` (counter-clockwise on
/// screen).
pub fn rotation_matrix(width: u32, height: u32, angle_degrees: f64) -> AffineMatrix {
    let cx = (width.saturating_sub(1) / 2) as f64;
    let cy = (height.saturating_sub(1) / 2) as f64;
    let (beta, alpha) = angle_degrees.to_radians().sin_cos();

    [
        [alpha, beta, (1.0 - alpha) * cx - beta * cy],
        [-beta, alpha, beta * cx + (1.0 - alpha) * cy],
    ]
}

/// Push every source pixel to its destination. Destination pixels that no
/// source pixel lands on stay black.
fn rotate_forward(img: &RgbImage, m: &AffineMatrix) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut rotated = RgbImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let (xf, yf) = (x as f64, y as f64);
        let nx = (m[0][0] * xf + m[0][1] * yf + m[0][2]) as i64;
        let ny = (m[1][0] * xf + m[1][1] * yf + m[1][2]) as i64;
        if (0..width as i64).contains(&nx) && (0..height as i64).contains(&ny) {
            rotated.put_pixel(nx as u32, ny as u32, *pixel);
        }
    }

    rotated
}

/// Sample the source for every destination pixel with bilinear
/// interpolation; rows are filled in parallel.
fn rotate_inverse(img: &RgbImage, m: &AffineMatrix) -> Result<RgbImage, ReaderError> {
    let matrix = [
        m[0][0] as f32, m[0][1] as f32, m[0][2] as f32,
        m[1][0] as f32, m[1][1] as f32, m[1][2] as f32,
        0.0, 0.0, 1.0,
    ];
    let projection = Projection::from_matrix(matrix)
        .ok_or_else(|| ReaderError::InvalidInput("rotation matrix is not invertible".into()))?;
    Ok(warp(img, &projection, Interpolation::Bilinear, Rgb([0, 0, 0])))
}

/// Apply an affine transform, producing an image of the same size.
pub fn apply_affine(img: &RgbImage, m: &AffineMatrix, mode: RotationMode) -> Result<RgbImage, ReaderError> {
    match mode {
        RotationMode::Forward => Ok(rotate_forward(img, m)),
        RotationMode::Inverse => rotate_inverse(img, m),
    }
}

/// Straighten the frame so the largest foreground outline lies horizontally.
pub fn correct_rotation(
    frame: &RgbImage,
    foreground: &[Outline],
    config: &RotationConfig,
) -> Result<RgbImage, ReaderError> {
    let angle = largest_outline(foreground)
        .map(|outline| rotation_angle(outline, config.snap_degrees))
        .unwrap_or(0.0);
    debug!(angle, mode = ?config.mode, "Rotating frame");

    if angle == 0.0 {
        return Ok(frame.clone());
    }

    let matrix = rotation_matrix(frame.width(), frame.height(), angle);
    apply_affine(frame, &matrix, config.mode)
}
