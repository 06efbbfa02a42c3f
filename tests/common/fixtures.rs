use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::point::Point;
use resistor_reader::detection::ReferenceOutlines;
use resistor_reader::{BandColor, Outline};

/// Gold as it appears on a balanced resistor body (HSV 16, 45, 120).
pub const GOLD: Rgb<u8> = Rgb([120, 110, 99]);
/// Red band (HSV 170, 150, 180).
pub const RED: Rgb<u8> = Rgb([180, 74, 109]);
/// Green band (HSV 66, 142, 90).
pub const GREEN: Rgb<u8> = Rgb([40, 90, 50]);
/// Violet band (HSV 137, 88, 130).
pub const VIOLET: Rgb<u8> = Rgb([110, 85, 130]);
/// Black band (HSV 120, 85, 30); outside the brown range.
pub const BLACK: Rgb<u8> = Rgb([20, 20, 30]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const DARK: Rgb<u8> = Rgb([40, 40, 40]);

/// Outline through the four corner pixels of an axis-aligned `w` x `h` box.
pub fn rect_outline(x: i32, y: i32, w: i32, h: i32) -> Outline {
    Outline::new(vec![
        Point::new(x, y),
        Point::new(x + w - 1, y),
        Point::new(x + w - 1, y + h - 1),
        Point::new(x, y + h - 1),
    ])
}

pub fn polygon(points: &[(i32, i32)]) -> Outline {
    Outline::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
}

/// Creates a frame filled with a single colour.
pub fn blank_frame(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

pub fn paint_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..y + h {
        for px in x..x + w {
            img.put_pixel(px, py, color);
        }
    }
}

/// White 450x350 working image with one `w` x `h` band per colour, left
/// edges at the given x positions, all starting at y = 150.
pub fn banded_body(bands: &[(Rgb<u8>, u32)], w: u32, h: u32) -> RgbImage {
    let mut img = blank_frame(450, 350, WHITE);
    for &(color, x) in bands {
        paint_rect(&mut img, x, 150, w, h, color);
    }
    img
}

fn texture_value(x: u32, y: u32) -> u8 {
    ((x * x * 31 + y * y * 17 + x * y * 7 + 11) % 251) as u8
}

/// Aperiodic grey texture with a single strong template-match peak for any
/// crop of it.
pub fn textured_gray(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([texture_value(x, y)]))
}

/// Same texture as `textured_gray`, with equal RGB channels.
pub fn textured_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = texture_value(x, y);
        Rgb([v, v, v])
    })
}

/// Counts pure black pixels inside a window.
pub fn count_black(img: &RgbImage, x: u32, y: u32, w: u32, h: u32) -> usize {
    let mut holes = 0;
    for py in y..y + h {
        for px in x..x + w {
            if *img.get_pixel(px, py) == Rgb([0, 0, 0]) {
                holes += 1;
            }
        }
    }
    holes
}

/// 8x40 bands spaced 30 px apart from x = 10, plus a reference outline of
/// the given colour on top of every band that has one.
pub fn banded_references(colors: &[Option<BandColor>]) -> (Vec<Outline>, ReferenceOutlines) {
    let mut bands = Vec::new();
    let mut refs = ReferenceOutlines::new();
    for (i, slot) in colors.iter().enumerate() {
        let band = rect_outline(10 + 30 * i as i32, 10, 8, 40);
        if let Some(color) = slot {
            refs.insert(*color, vec![band.clone()]);
        }
        bands.push(band);
    }
    (bands, refs)
}
