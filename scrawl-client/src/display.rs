//! Software renderer: a [`Surface`] backed by an RGB pixel buffer.
//!
//! Strokes are rasterised as capsules (a segment swept by a disc of
//! `line_width / 2`), which gives round joins between the short
//! segments a drag produces. The buffer can be dumped as a binary PPM.

use std::io::{self, Write};

use scrawl_core::{Color, Point, Surface};

/// An RGB8 frame buffer with a minimal path/stroke state machine.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    fill: Color,
    stroke: Color,
    line_width: f64,
    subpaths: Vec<Vec<Point>>,
}

impl RasterSurface {
    /// A black `width` × `height` buffer. Mounting it clears it to the
    /// canvas background.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            subpaths: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at pixel `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Color::rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Write the buffer as a binary PPM (`P6`) image.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(&self.pixels)?;
        out.flush()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    fn put(&mut self, x: u32, y: u32, color: Color) {
        let i = self.offset(x, y);
        self.pixels[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
    }

    /// Pixel index range covering `[lo, hi)` in continuous coordinates,
    /// clipped to `0..limit`.
    fn span(lo: f64, hi: f64, limit: u32) -> std::ops::Range<u32> {
        let clip = |v: f64| v.round().clamp(0.0, f64::from(limit)) as u32;
        clip(lo)..clip(hi)
    }

    fn stamp_segment(&mut self, a: Point, b: Point, radius: f64, color: Color) {
        let min = Point::new(-radius, -radius);
        let max = Point::new(
            f64::from(self.width) + radius,
            f64::from(self.height) + radius,
        );
        let Some((a, b)) = clip_segment(a, b, min, max) else {
            return;
        };

        let xs = Self::span(a.x.min(b.x) - radius, a.x.max(b.x) + radius, self.width);
        let ys = Self::span(a.y.min(b.y) - radius, a.y.max(b.y) + radius, self.height);
        let r2 = radius * radius;

        for y in ys {
            for x in xs.clone() {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if distance_sq(center, a, b) <= r2 {
                    self.put(x, y, color);
                }
            }
        }
    }
}

/// The part of segment `a`–`b` inside the box `min`..`max`, or `None` if
/// it misses the box.
///
/// Works on the midpoint and half-extent so that any pair of finite
/// endpoints stays finite.
fn clip_segment(a: Point, b: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    let inside = |p: Point| (min.x..=max.x).contains(&p.x) && (min.y..=max.y).contains(&p.y);
    if inside(a) && inside(b) {
        return Some((a, b));
    }

    let mid = Point::new(a.x / 2.0 + b.x / 2.0, a.y / 2.0 + b.y / 2.0);
    let half = Point::new(b.x / 2.0 - a.x / 2.0, b.y / 2.0 - a.y / 2.0);
    let (mut lo, mut hi) = (-1.0_f64, 1.0_f64);

    for (m, d, lower, upper) in [(mid.x, half.x, min.x, max.x), (mid.y, half.y, min.y, max.y)] {
        if d == 0.0 {
            if m < lower || m > upper {
                return None;
            }
            continue;
        }
        let (s1, s2) = ((lower - m) / d, (upper - m) / d);
        lo = lo.max(s1.min(s2));
        hi = hi.min(s1.max(s2));
        if lo > hi {
            return None;
        }
    }

    // Rounding on huge inputs can land a hair outside the box.
    let at = |s: f64| {
        Point::new(
            (mid.x + s * half.x).clamp(min.x, max.x),
            (mid.y + s * half.y).clamp(min.y, max.y),
        )
    };
    Some((at(lo), at(hi)))
}

/// Squared distance from `p` to the segment `a`–`b`.
fn distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx - p.x, a.y + t * dy - p.y);
    cx * cx + cy * cy
}

impl Surface for RasterSurface {
    fn set_fill_style(&mut self, color: Color) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let xs = Self::span(x.min(x + width), x.max(x + width), self.width);
        let ys = Self::span(y.min(y + height), y.max(y + height), self.height);
        let fill = self.fill;
        for py in ys {
            for px in xs.clone() {
                self.put(px, py, fill);
            }
        }
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, p: Point) {
        self.subpaths.push(vec![p]);
    }

    fn line_to(&mut self, p: Point) {
        match self.subpaths.last_mut() {
            Some(path) => path.push(p),
            // Without a current point, lineTo behaves like moveTo.
            None => self.subpaths.push(vec![p]),
        }
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.stroke = color;
    }

    fn stroke(&mut self) {
        let radius = self.line_width / 2.0;
        let color = self.stroke;
        let segments: Vec<(Point, Point)> = self
            .subpaths
            .iter()
            .flat_map(|path| path.windows(2).map(|w| (w[0], w[1])))
            .collect();
        for (a, b) in segments {
            self.stamp_segment(a, b, radius, color);
        }
    }

    fn close_path(&mut self) {
        let Some(path) = self.subpaths.last_mut() else {
            return;
        };
        if path.len() > 1 {
            let start = path[0];
            path.push(start);
            self.subpaths.push(vec![start]);
        }
    }
}
