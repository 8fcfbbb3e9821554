use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb as Pixel, RgbImage};

pub type Rgb = [u8; 3];

/// Width and height of one glyph cell before scaling.
pub const GLYPH_SIZE: u32 = 8;

/// Aliased raster surface; every primitive samples pixel centres.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Pixel(background)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.image.get_pixel(x, y).0
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, Pixel(color));
        }
    }

    /// Clamped pixel range covering `[min, max]` along one axis.
    fn span(&self, min: f32, max: f32, limit: u32) -> std::ops::Range<i64> {
        let start = min.floor().max(0.0) as i64;
        let end = (max.ceil() as i64 + 1).min(limit as i64);
        start..end.max(start)
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgb) {
        for py in y..y + height as i64 {
            for px in x..x + width as i64 {
                self.put(px, py, color);
            }
        }
    }

    /// Fills the part of the annulus `inner..=outer` around `center` whose
    /// polar angle lies in `[start, end]` radians, measured counter-clockwise
    /// from the positive x axis with y pointing up.
    pub fn fill_ring_sector(
        &mut self,
        center: (f32, f32),
        inner: f32,
        outer: f32,
        start: f32,
        end: f32,
        color: Rgb,
    ) {
        let (cx, cy) = center;
        let xs = self.span(cx - outer, cx + outer, self.width());
        let ys = self.span(cy - outer, cy + outer, self.height());
        for py in ys {
            for px in xs.clone() {
                let dx = px as f32 + 0.5 - cx;
                let dy = cy - (py as f32 + 0.5);
                let radius = dx.hypot(dy);
                if radius < inner || radius > outer {
                    continue;
                }
                let angle = dy.atan2(dx);
                if angle >= start && angle <= end {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Even-odd fill of a closed polygon given in image coordinates.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
            |(min_x, max_x, min_y, max_y), &(x, y)| {
                (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
            },
        );
        let xs = self.span(min_x, max_x, self.width());
        let ys = self.span(min_y, max_y, self.height());
        for py in ys {
            for px in xs.clone() {
                if contains(points, px as f32 + 0.5, py as f32 + 0.5) {
                    self.put(px, py, color);
                }
            }
        }
    }

    pub fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = dx.hypot(dy);
        if length == 0.0 {
            return;
        }
        let half = width.max(1.0) / 2.0;
        let (nx, ny) = (-dy / length * half, dx / length * half);
        self.fill_polygon(
            &[
                (from.0 + nx, from.1 + ny),
                (to.0 + nx, to.1 + ny),
                (to.0 - nx, to.1 - ny),
                (from.0 - nx, from.1 - ny),
            ],
            color,
        );
    }

    /// Draws `text` with its top-left corner at `(x, y)`. Characters outside
    /// the basic Latin set still advance the cursor but leave no ink.
    pub fn draw_text(&mut self, x: i64, y: i64, scale: u32, text: &str, color: Rgb) {
        let scale = scale.max(1);
        let advance = (GLYPH_SIZE * scale) as i64;
        for (idx, ch) in text.chars().enumerate() {
            let Some(rows) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let origin = x + idx as i64 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) != 0 {
                        self.fill_rect(
                            origin + (col * scale) as i64,
                            y + (row as u32 * scale) as i64,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }

    pub fn text_width(text: &str, scale: u32) -> u32 {
        text.chars().count() as u32 * GLYPH_SIZE * scale.max(1)
    }
}

fn contains(points: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut prev = points[points.len() - 1];
    for &current in points {
        let (x1, y1) = prev;
        let (x2, y2) = current;
        if (y1 > y) != (y2 > y) && x < (x2 - x1) * (y - y1) / (y2 - y1) + x1 {
            inside = !inside;
        }
        prev = current;
    }
    inside
}
