use image::{GrayImage, Luma, Rgb, RgbImage};
use image::imageops::{self, FilterType};

/// Hue/saturation/value triple in the 8-bit convention: hue 0..180,
/// saturation and value 0..255.
pub type Hsv = [u8; 3];

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    imageops::grayscale(img)
}

/// Binary threshold: pixels above `threshold` become 255 (or 0 when
/// `inverted`), everything else the opposite.
pub fn binarize(gray: &GrayImage, threshold: u8, inverted: bool) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let above = gray.get_pixel(x, y)[0] > threshold;
        if above != inverted { Luma([255]) } else { Luma([0]) }
    })
}

/// Convert a single RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(rgb: Rgb<u8>) -> Hsv {
    let [r, g, b] = rgb.0;
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    if v == 0 || diff == 0.0 {
        return [0, 0, v];
    }

    let s = (diff * 255.0 / v as f32).round() as u8;

    // 30 hue units per sextant (half-degree scale)
    let sextant = if v == r {
        (gf - bf) / diff
    } else if v == g {
        (bf - rf) / diff + 2.0
    } else {
        (rf - gf) / diff + 4.0
    };
    let mut h = (sextant * 30.0).round() as i32;
    if h < 0 {
        h += 180;
    }

    [h as u8, s, v]
}

/// Mask of pixels whose HSV value lies inside `[lower, upper]` on all channels.
pub fn hsv_in_range(img: &RgbImage, lower: Hsv, upper: Hsv) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let hsv = rgb_to_hsv(*img.get_pixel(x, y));
        let inside = (0..3).all(|c| lower[c] <= hsv[c] && hsv[c] <= upper[c]);
        if inside { Luma([255]) } else { Luma([0]) }
    })
}

/// Resize by independent integer factors with bilinear interpolation.
pub fn upscale(img: &RgbImage, scale_x: u32, scale_y: u32) -> RgbImage {
    imageops::resize(
        img,
        img.width() * scale_x,
        img.height() * scale_y,
        FilterType::Triangle,
    )
}

/// Resize to an exact working resolution.
pub fn resize_to(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Sharpen with the 3x3 high-pass kernel `[0,-1,0; -1,5,-1; 0,-1,0]`.
///
/// Border pixels reuse their nearest in-bounds neighbours.
pub fn sharpen(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut sharpened = RgbImage::new(width, height);
    if width == 0 || height == 0 {
        return sharpened;
    }

    let at = |x: i64, y: i64, c: usize| -> f32 {
        let cx = x.clamp(0, width as i64 - 1) as u32;
        let cy = y.clamp(0, height as i64 - 1) as u32;
        img.get_pixel(cx, cy)[c] as f32
    };

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut out = [0u8; 3];
            for (c, value) in out.iter_mut().enumerate() {
                let center = at(x, y, c);
                let neighbours = at(x, y - 1, c) + at(x, y + 1, c) + at(x - 1, y, c) + at(x + 1, y, c);
                *value = (5.0 * center - neighbours).round().clamp(0.0, 255.0) as u8;
            }
            sharpened.put_pixel(x as u32, y as u32, Rgb(out));
        }
    }

    sharpened
}

/// Bilinear sample at a fractional source location, clamped to the image.
pub fn sample_bilinear(img: &RgbImage, fx: f32, fy: f32) -> [f32; 3] {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return [0.0; 3];
    }
    let fx = fx.clamp(0.0, (width - 1) as f32);
    let fy = fy.clamp(0.0, (height - 1) as f32);

    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let tx = fx - x0 as f32;
    let ty = fy - y0 as f32;

    let p00 = img.get_pixel(x0, y0);
    let p10 = img.get_pixel(x1, y0);
    let p01 = img.get_pixel(x0, y1);
    let p11 = img.get_pixel(x1, y1);

    let mut out = [0.0f32; 3];
    for (c, value) in out.iter_mut().enumerate() {
        let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
        let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
        *value = top * (1.0 - ty) + bottom * ty;
    }
    out
}

/// Weighted per-channel sum of two equally sized images, rounded and
/// saturated to 8 bits.
pub fn blend(a: &RgbImage, alpha: f32, b: &RgbImage, beta: f32) -> RgbImage {
    RgbImage::from_fn(a.width(), a.height(), |x, y| {
        let pa = a.get_pixel(x, y);
        let pb = b.get_pixel(x, y);
        Rgb([0usize, 1, 2].map(|c| {
            (pa[c] as f32 * alpha + pb[c] as f32 * beta).round().clamp(0.0, 255.0) as u8
        }))
    })
}

/// Keep colour pixels where `mask` is set, black elsewhere.
pub fn apply_mask(img: &RgbImage, mask: &GrayImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        if mask.get_pixel(x, y)[0] > 0 { *img.get_pixel(x, y) } else { Rgb([0, 0, 0]) }
    })
}

/// Per-channel bitwise OR of `src` into `dst`.
pub fn or_into(dst: &mut RgbImage, src: &RgbImage) {
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        for c in 0..3 {
            d[c] |= s[c];
        }
    }
}
