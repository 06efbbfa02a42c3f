use std::fmt;
use std::str::FromStr;

use imageproc::point::Point;

use crate::error::ReaderError;

/// Axis-aligned box of an outline, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Spatial moments up to third order of a closed polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,
}

impl Moments {
    /// Moments of the polygon through `points`, computed with Green's theorem.
    ///
    /// Orientation is normalized so `m00` is never negative.
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let mut m = Self::default();
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let (x0, y0) = (p.x as f64, p.y as f64);
            let (x1, y1) = (q.x as f64, q.y as f64);

            let a = x0 * y1 - x1 * y0;
            let (xx0, yy0, xx1, yy1) = (x0 * x0, y0 * y0, x1 * x1, y1 * y1);

            m.m00 += a;
            m.m10 += a * (x0 + x1);
            m.m01 += a * (y0 + y1);
            m.m20 += a * (xx0 + x0 * x1 + xx1);
            m.m11 += a * (x0 * (2.0 * y0 + y1) + x1 * (y0 + 2.0 * y1));
            m.m02 += a * (yy0 + y0 * y1 + yy1);
            m.m30 += a * (x0 + x1) * (xx0 + xx1);
            m.m21 += a * (xx0 * (3.0 * y0 + y1) + 2.0 * x0 * x1 * (y0 + y1) + xx1 * (y0 + 3.0 * y1));
            m.m12 += a * (yy0 * (3.0 * x0 + x1) + 2.0 * y0 * y1 * (x0 + x1) + yy1 * (x0 + 3.0 * x1));
            m.m03 += a * (y0 + y1) * (yy0 + yy1);
        }

        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m.m20 /= 12.0;
        m.m11 /= 24.0;
        m.m02 /= 12.0;
        m.m30 /= 20.0;
        m.m21 /= 60.0;
        m.m12 /= 60.0;
        m.m03 /= 20.0;

        if m.m00 < 0.0 {
            m = m.negated();
        }
        m
    }

    fn negated(self) -> Self {
        Self {
            m00: -self.m00,
            m10: -self.m10,
            m01: -self.m01,
            m20: -self.m20,
            m11: -self.m11,
            m02: -self.m02,
            m30: -self.m30,
            m21: -self.m21,
            m12: -self.m12,
            m03: -self.m03,
        }
    }

    /// The seven Hu invariants. All zero for a degenerate polygon.
    pub fn hu(&self) -> [f64; 7] {
        if self.m00 == 0.0 {
            return [0.0; 7];
        }

        let cx = self.m10 / self.m00;
        let cy = self.m01 / self.m00;

        let mu20 = self.m20 - cx * self.m10;
        let mu11 = self.m11 - cx * self.m01;
        let mu02 = self.m02 - cy * self.m01;
        let mu30 = self.m30 - cx * (3.0 * mu20 + cx * self.m10);
        let mu21 = self.m21 - cx * (2.0 * mu11 + cx * self.m01) - cy * mu20;
        let mu12 = self.m12 - cy * (2.0 * mu11 + cy * self.m10) - cx * mu02;
        let mu03 = self.m03 - cy * (3.0 * mu02 + cy * self.m01);

        let s2 = self.m00 * self.m00;
        let s3 = s2 * self.m00.sqrt();
        let (n20, n11, n02) = (mu20 / s2, mu11 / s2, mu02 / s2);
        let (n30, n21, n12, n03) = (mu30 / s3, mu21 / s3, mu12 / s3, mu03 / s3);

        let t0 = n30 + n12;
        let t1 = n21 + n03;
        let q0 = n30 - 3.0 * n12;
        let q1 = 3.0 * n21 - n03;
        let d = n20 - n02;

        [
            n20 + n02,
            d * d + 4.0 * n11 * n11,
            q0 * q0 + q1 * q1,
            t0 * t0 + t1 * t1,
            q0 * t0 * (t0 * t0 - 3.0 * t1 * t1) + q1 * t1 * (3.0 * t0 * t0 - t1 * t1),
            d * (t0 * t0 - t1 * t1) + 4.0 * n11 * t0 * t1,
            q1 * t0 * (t0 * t0 - 3.0 * t1 * t1) - q0 * t1 * (3.0 * t0 * t0 - t1 * t1),
        ]
    }
}

/// Closed boundary of one connected foreground region.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    points: Vec<Point<i32>>,
}

impl Outline {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Box covering every traced point; width and height count pixels, so a
    /// single point has a 1x1 box.
    pub fn bounding_box(&self) -> BoundingBox {
        let Some(first) = self.points.first() else {
            return BoundingBox { x: 0, y: 0, width: 0, height: 0 };
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    pub fn moments(&self) -> Moments {
        Moments::of_polygon(&self.points)
    }

    /// Enclosed polygon area.
    pub fn area(&self) -> f64 {
        self.moments().m00
    }

    /// Truncated x of the area centroid; 0 for a degenerate outline.
    pub fn centroid_x(&self) -> i32 {
        let m = self.moments();
        if m.m00 != 0.0 {
            (m.m10 / m.m00) as i32
        } else {
            0
        }
    }

    pub fn hu_moments(&self) -> [f64; 7] {
        self.moments().hu()
    }
}

/// Colour of a resistor band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandColor {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    Grey,
    White,
    Gold,
    Silver,
    /// Missing fourth band.
    Blank,
}

impl BandColor {
    pub const ALL: [BandColor; 13] = [
        BandColor::Black,
        BandColor::Brown,
        BandColor::Red,
        BandColor::Orange,
        BandColor::Yellow,
        BandColor::Green,
        BandColor::Blue,
        BandColor::Violet,
        BandColor::Grey,
        BandColor::White,
        BandColor::Gold,
        BandColor::Silver,
        BandColor::Blank,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BandColor::Black => "black",
            BandColor::Brown => "brown",
            BandColor::Red => "red",
            BandColor::Orange => "orange",
            BandColor::Yellow => "yellow",
            BandColor::Green => "green",
            BandColor::Blue => "blue",
            BandColor::Violet => "violet",
            BandColor::Grey => "grey",
            BandColor::White => "white",
            BandColor::Gold => "gold",
            BandColor::Silver => "silver",
            BandColor::Blank => "none",
        }
    }
}

impl fmt::Display for BandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for BandColor {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "gray" {
            return Ok(BandColor::Grey);
        }
        BandColor::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| ReaderError::InvalidInput(format!("unknown band colour '{s}'")))
    }
}

/// Exactly four band colours in left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading([BandColor; 4]);

impl Reading {
    pub fn new(colors: [BandColor; 4]) -> Self {
        Self(colors)
    }

    pub fn colors(&self) -> &[BandColor; 4] {
        &self.0
    }

    pub fn labels(&self) -> [&'static str; 4] {
        self.0.map(BandColor::name)
    }
}

impl TryFrom<Vec<BandColor>> for Reading {
    type Error = ReaderError;

    fn try_from(colors: Vec<BandColor>) -> Result<Self, Self::Error> {
        let found = colors.len();
        let colors: [BandColor; 4] = colors
            .try_into()
            .map_err(|_| ReaderError::IncompleteReading { found, expected: 4 })?;
        Ok(Self(colors))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join(", "))
    }
}

/// Decoded resistance in ohms with its tolerance text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResistanceValue {
    pub ohms: u64,
    pub tolerance: &'static str,
}

impl fmt::Display for ResistanceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Ohms {}", self.ohms, self.tolerance)
    }
}
