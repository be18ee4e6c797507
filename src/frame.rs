use image::RgbImage;

use crate::foundation::{
    core::{BACKGROUND, Canvas, Line, Point, Rgb8},
    error::{FlipbookError, FlipbookResult},
};

/// One fixed-size RGB8 image in a frame stack.
///
/// The frame owns its pixel buffer and draws into it directly; there is no
/// separate drawing context aliasing the same memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    pixels: RgbImage,
}

impl RasterFrame {
    /// A frame filled with the background color.
    pub fn blank(canvas: Canvas) -> Self {
        Self {
            pixels: RgbImage::from_pixel(canvas.width, canvas.height, BACKGROUND.to_pixel()),
        }
    }

    /// Rebuild frame number `index` of a document from a raw row-major RGB
    /// dump. Fails with `PixelLengthMismatch` unless
    /// `bytes.len() == canvas.raw_len()`.
    pub fn from_raw(index: usize, canvas: Canvas, bytes: Vec<u8>) -> FlipbookResult<Self> {
        let (expected, actual) = (canvas.raw_len(), bytes.len());
        let mismatch = FlipbookError::PixelLengthMismatch {
            frame: index,
            expected,
            actual,
        };
        if actual != expected {
            return Err(mismatch);
        }
        RgbImage::from_raw(canvas.width, canvas.height, bytes)
            .map(|pixels| Self { pixels })
            .ok_or(mismatch)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        self.pixels.get_pixel_checked(x, y).map(|px| Rgb8::from(*px))
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbImage {
        self.pixels
    }

    /// Paint a straight segment of the given width.
    ///
    /// A pixel is covered when its sample point lies within `width / 2` of
    /// the segment, so consecutive segments of a drag join with round caps.
    /// Odd widths sample at the integer pixel position and even widths at the
    /// pixel's center (`+0.5`), which keeps the band exactly `width` pixels
    /// across. Widths of 0 or 1 draw a single-pixel Bresenham line. Anything
    /// outside the frame is clipped.
    pub fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb8) {
        if width <= 1 {
            self.draw_hairline(from, to, color);
            return;
        }

        let radius = f64::from(width) / 2.0;
        let radius_sq = radius * radius;
        let line = Line::new(from, to);
        let offset = if width % 2 == 0 { 0.5 } else { 0.0 };

        let max_x = i64::from(self.width()) - 1;
        let max_y = i64::from(self.height()) - 1;
        let x0 = ((from.x.min(to.x) - radius).floor() as i64).max(0);
        let y0 = ((from.y.min(to.y) - radius).floor() as i64).max(0);
        let x1 = ((from.x.max(to.x) + radius).ceil() as i64).min(max_x);
        let y1 = ((from.y.max(to.y) + radius).ceil() as i64).min(max_y);

        let px = color.to_pixel();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Point::new(x as f64 + offset, y as f64 + offset);
                if distance_sq_to_segment(line, center) <= radius_sq {
                    self.pixels.put_pixel(x as u32, y as u32, px);
                }
            }
        }
    }

    fn draw_hairline(&mut self, from: Point, to: Point, color: Rgb8) {
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put_clipped(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn put_clipped(&mut self, x: i64, y: i64, color: Rgb8) {
        if self.canvas().contains(x, y) {
            self.pixels.put_pixel(x as u32, y as u32, color.to_pixel());
        }
    }
}

fn distance_sq_to_segment(line: Line, p: Point) -> f64 {
    let d = line.p1 - line.p0;
    let len_sq = d.hypot2();
    if len_sq == 0.0 {
        return (p - line.p0).hypot2();
    }
    let t = ((p - line.p0).dot(d) / len_sq).clamp(0.0, 1.0);
    (p - line.p0.lerp(line.p1, t)).hypot2()
}
