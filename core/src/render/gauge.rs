use crate::prelude::{GaugeError, GaugeResult};
use crate::render::canvas::{Canvas, Rgb, GLYPH_SIZE};
use crate::render::config::RenderConfig;
use crate::telemetry::log::LogManager;
use crate::transform::DisplayReading;
use image::{ImageFormat, RgbImage};
use std::f32::consts::PI;
use std::fs;
use std::io::Cursor;
use std::path::Path;

const MIN_RADIUS: f32 = 20.0;
const TICK_LENGTH: f32 = 5.0;
const TICK_LABEL_ROOM: f32 = 18.0;
const ROW_GAP: f32 = 4.0;
const BAND_INNER: f32 = 0.6;
const BAR_INNER: f32 = 0.7;
const BAR_OUTER: f32 = 0.9;

/// Pixel geometry derived from a [`RenderConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeLayout {
    pub width: u32,
    pub height: u32,
    pub center: (f32, f32),
    pub radius: f32,
    pub title_scale: u32,
    pub title_y: f32,
    pub row_scale: u32,
    pub delta_y: f32,
    pub annotation_y: f32,
}

impl GaugeLayout {
    pub fn compute(config: &RenderConfig) -> GaugeResult<Self> {
        let (width, height) = config.pixel_size();
        let margins = &config.margins;
        let area_width = width as f32 - (margins.left as f32 + margins.right as f32);
        let area_height = height as f32 - (margins.top as f32 + margins.bottom as f32);

        let row_scale = (height / 110).clamp(1, 3);
        let row_height = (GLYPH_SIZE * row_scale) as f32 + ROW_GAP;
        let radius = (area_width / 2.0 - TICK_LABEL_ROOM)
            .min(area_height - 2.0 * row_height - TICK_LABEL_ROOM * 0.7);
        if radius < MIN_RADIUS {
            return Err(GaugeError::InvalidConfig(format!(
                "{}x{} px with margins {:?} leaves no room for the gauge",
                width, height, margins
            )));
        }

        let title_scale = (margins.top / (2 * GLYPH_SIZE)).max(1);
        let title_y = (margins.top as f32 - (GLYPH_SIZE * title_scale) as f32) / 2.0;
        let center = (
            margins.left as f32 + area_width / 2.0,
            margins.top as f32 + TICK_LABEL_ROOM * 0.7 + radius,
        );
        let delta_y = center.1 + ROW_GAP;

        Ok(Self {
            width,
            height,
            center,
            radius,
            title_scale,
            title_y: title_y.max(0.0),
            row_scale,
            delta_y,
            annotation_y: delta_y + row_height,
        })
    }

    /// Angle of an axis value: 0 sits on the left end, `axis_max` on the right.
    pub fn angle_for(&self, value: f64, axis_max: f64) -> f32 {
        let fraction = (value / axis_max).clamp(0.0, 1.0) as f32;
        PI * (1.0 - fraction)
    }

    fn polar(&self, radius: f32, angle: f32) -> (f32, f32) {
        (
            self.center.0 + radius * angle.cos(),
            self.center.1 - radius * angle.sin(),
        )
    }
}

/// Rasterizes a [`DisplayReading`] into a radial gauge.
pub struct GaugeRenderer {
    config: RenderConfig,
    layout: GaugeLayout,
    logger: LogManager,
}

impl GaugeRenderer {
    pub fn new(config: RenderConfig) -> GaugeResult<Self> {
        config.validate()?;
        let layout = GaugeLayout::compute(&config)?;
        Ok(Self {
            config,
            layout,
            logger: LogManager::new("render"),
        })
    }

    pub fn render(&self, reading: &DisplayReading) -> RgbImage {
        let layout = &self.layout;
        let mut canvas = Canvas::new(layout.width, layout.height, self.config.background);

        self.draw_title(&mut canvas);
        self.draw_bands(&mut canvas);
        self.draw_ticks(&mut canvas);
        self.draw_bar(&mut canvas, reading.value);
        self.draw_value(&mut canvas, reading);
        self.draw_delta(&mut canvas, reading);
        self.draw_annotation(&mut canvas, reading);

        self.logger.detail(&format!(
            "rendered {}x{} gauge, radius {:.1}",
            layout.width, layout.height, layout.radius
        ));
        canvas.into_image()
    }

    pub fn encode_png(&self, reading: &DisplayReading) -> GaugeResult<Vec<u8>> {
        let image = self.render(reading);
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Writes the PNG to `path`, replacing whatever was there.
    pub fn render_to_file(&self, reading: &DisplayReading, path: &Path) -> GaugeResult<()> {
        let bytes = self.encode_png(reading)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;
        self.logger.record(&format!(
            "wrote {} bytes to {}",
            bytes.len(),
            path.display()
        ));
        Ok(())
    }

    fn draw_title(&self, canvas: &mut Canvas) {
        let layout = &self.layout;
        let title = &self.config.title;
        let width = Canvas::text_width(title, layout.title_scale) as f32;
        canvas.draw_text(
            (layout.center.0 - width / 2.0).round() as i64,
            layout.title_y.round() as i64,
            layout.title_scale,
            title,
            self.config.foreground,
        );
    }

    fn draw_bands(&self, canvas: &mut Canvas) {
        let layout = &self.layout;
        let axis_max = self.config.axis_max;
        for band in self.config.bands.iter() {
            if band.from >= axis_max {
                continue;
            }
            canvas.fill_ring_sector(
                layout.center,
                layout.radius * BAND_INNER,
                layout.radius,
                layout.angle_for(band.to, axis_max),
                layout.angle_for(band.from, axis_max),
                band.color,
            );
        }
        canvas.fill_ring_sector(
            layout.center,
            layout.radius,
            layout.radius + 1.0,
            0.0,
            PI,
            self.config.foreground,
        );
    }

    fn draw_ticks(&self, canvas: &mut Canvas) {
        let layout = &self.layout;
        let axis_max = self.config.axis_max;
        let step = self.config.tick_step;
        let count = (axis_max / step + 1e-9).floor() as u32;

        for idx in 0..=count {
            let value = step * idx as f64;
            let angle = layout.angle_for(value, axis_max);
            canvas.stroke_line(
                layout.polar(layout.radius, angle),
                layout.polar(layout.radius + TICK_LENGTH, angle),
                1.5,
                self.config.foreground,
            );

            let label = tick_label(value);
            let (x, y) = layout.polar(layout.radius + TICK_LABEL_ROOM * 0.7, angle);
            let half_width = Canvas::text_width(&label, 1) as f32 / 2.0;
            let offset_x = half_width * angle.cos();
            canvas.draw_text(
                (x - half_width + offset_x).round() as i64,
                (y - GLYPH_SIZE as f32 / 2.0).round() as i64,
                1,
                &label,
                self.config.foreground,
            );
        }
    }

    fn draw_bar(&self, canvas: &mut Canvas, value: f64) {
        let layout = &self.layout;
        if value <= 0.0 {
            return;
        }
        canvas.fill_ring_sector(
            layout.center,
            layout.radius * BAR_INNER,
            layout.radius * BAR_OUTER,
            layout.angle_for(value, self.config.axis_max),
            PI,
            self.config.bar_color,
        );
    }

    fn draw_value(&self, canvas: &mut Canvas, reading: &DisplayReading) {
        let layout = &self.layout;
        let label = reading.value_label();
        let hub = layout.radius * BAND_INNER;
        let glyphs = label.chars().count().max(1) as f32;
        let by_width = (hub * 1.6 / (glyphs * GLYPH_SIZE as f32)).floor();
        let by_height = (hub * 0.6 / GLYPH_SIZE as f32).floor();
        let scale = by_width.min(by_height).clamp(1.0, 6.0) as u32;

        let width = Canvas::text_width(&label, scale) as f32;
        let height = (GLYPH_SIZE * scale) as f32;
        canvas.draw_text(
            (layout.center.0 - width / 2.0).round() as i64,
            (layout.center.1 - height - 2.0).round() as i64,
            scale,
            &label,
            self.config.foreground,
        );
    }

    fn draw_delta(&self, canvas: &mut Canvas, reading: &DisplayReading) {
        let layout = &self.layout;
        let scale = layout.row_scale;
        let label = reading.delta_label();
        let size = (GLYPH_SIZE * scale) as f32;
        let rising = label.starts_with('+');
        let falling = label.starts_with('-');

        let (text, color) = if rising {
            (&label[1..], self.config.increasing_color)
        } else if falling {
            (&label[1..], self.config.decreasing_color)
        } else {
            (label.as_str(), self.config.foreground)
        };
        let marker = if rising || falling { size + ROW_GAP } else { 0.0 };
        let total = marker + Canvas::text_width(text, scale) as f32;
        let left = layout.center.0 - total / 2.0;
        let top = layout.delta_y;

        if rising {
            draw_triangle(canvas, (left, top), size, true, color);
        } else if falling {
            draw_triangle(canvas, (left, top), size, false, color);
        }
        canvas.draw_text(
            (left + marker).round() as i64,
            top.round() as i64,
            scale,
            text,
            color,
        );
    }

    fn draw_annotation(&self, canvas: &mut Canvas, reading: &DisplayReading) {
        let layout = &self.layout;
        let scale = layout.row_scale;
        let size = (GLYPH_SIZE * scale) as f32;
        let text = match self.config.minutes_suffix.as_str() {
            "" => reading.minutes_ago_label(),
            suffix => format!("{} {}", reading.minutes_ago_label(), suffix),
        };

        let total = size + ROW_GAP + Canvas::text_width(&text, scale) as f32;
        let left = layout.center.0 - total / 2.0;
        let top = layout.annotation_y;
        draw_arrow(
            canvas,
            (left + size / 2.0, top + size / 2.0),
            size,
            reading.direction.angle_degrees().to_radians(),
            scale as f32,
            self.config.foreground,
        );
        canvas.draw_text(
            (left + size + ROW_GAP).round() as i64,
            top.round() as i64,
            scale,
            &text,
            self.config.foreground,
        );
    }
}

fn tick_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn draw_triangle(canvas: &mut Canvas, origin: (f32, f32), size: f32, up: bool, color: Rgb) {
    let (x, y) = origin;
    let points = if up {
        [(x + size / 2.0, y), (x + size, y + size), (x, y + size)]
    } else {
        [(x, y), (x + size, y), (x + size / 2.0, y + size)]
    };
    canvas.fill_polygon(&points, color);
}

/// Arrow of length `size` centred on `center`, pointing along `angle`
/// (radians, counter-clockwise, y up).
fn draw_arrow(
    canvas: &mut Canvas,
    center: (f32, f32),
    size: f32,
    angle: f32,
    thickness: f32,
    color: Rgb,
) {
    let (dx, dy) = (angle.cos(), -angle.sin());
    let half = size / 2.0;
    let head = size * 0.45;
    let tip = (center.0 + dx * half, center.1 + dy * half);
    let tail = (center.0 - dx * half, center.1 - dy * half);
    let neck = (tip.0 - dx * head, tip.1 - dy * head);
    let (px, py) = (-dy * head * 0.6, dx * head * 0.6);

    canvas.stroke_line(tail, neck, thickness, color);
    canvas.fill_polygon(
        &[tip, (neck.0 + px, neck.1 + py), (neck.0 - px, neck.1 - py)],
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::config::RenderPreset;
    use crate::source::Direction;
    use tempfile::tempdir;

    fn reading() -> DisplayReading {
        DisplayReading {
            value: 10.0,
            reference: 8.9,
            minutes_ago: 0,
            direction: Direction::Flat,
        }
    }

    #[test]
    fn image_matches_screen_size() {
        let renderer = GaugeRenderer::new(RenderPreset::Standard.config()).unwrap();
        let image = renderer.render(&reading());
        assert_eq!(image.dimensions(), (403, 227));

        let renderer = GaugeRenderer::new(RenderPreset::Epaper.config()).unwrap();
        assert_eq!(renderer.render(&reading()).dimensions(), (400, 300));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = GaugeRenderer::new(RenderPreset::Standard.config()).unwrap();
        let first = renderer.encode_png(&reading()).unwrap();
        let second = renderer.encode_png(&reading()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_readings_produce_different_images() {
        let renderer = GaugeRenderer::new(RenderPreset::Standard.config()).unwrap();
        let mut other = reading();
        other.value = 4.2;
        other.direction = Direction::SingleDown;
        assert_ne!(
            renderer.encode_png(&reading()).unwrap(),
            renderer.encode_png(&other).unwrap()
        );
    }

    #[test]
    fn bands_are_painted_in_configured_colors() {
        let config = RenderPreset::Standard.config();
        let renderer = GaugeRenderer::new(config.clone()).unwrap();
        let layout = renderer.layout.clone();
        let mut low = reading();
        low.value = 0.0;
        let image = renderer.render(&low);

        // Just inside the outer edge, where the bar never reaches.
        let probe = |value: f64| {
            let angle = layout.angle_for(value, config.axis_max);
            let (x, y) = layout.polar(layout.radius * 0.95, angle);
            image.get_pixel(x as u32, y as u32).0
        };
        assert_eq!(probe(2.0), config.bands.low.color);
        assert_eq!(probe(7.0), config.bands.normal.color);
        assert_eq!(probe(18.0), config.bands.high.color);
    }

    #[test]
    fn value_bar_stops_at_reading() {
        let config = RenderPreset::Standard.config();
        let renderer = GaugeRenderer::new(config.clone()).unwrap();
        let layout = renderer.layout.clone();
        let image = renderer.render(&reading());

        let probe = |value: f64| {
            let angle = layout.angle_for(value, config.axis_max);
            let (x, y) = layout.polar(layout.radius * 0.8, angle);
            image.get_pixel(x as u32, y as u32).0
        };
        assert_eq!(probe(5.0), config.bar_color);
        assert_eq!(probe(15.0), config.bands.high.color);
    }

    #[test]
    fn render_to_file_overwrites_previous_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sgv_gauge.png");
        let renderer = GaugeRenderer::new(RenderPreset::Epaper.config()).unwrap();

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"stale").unwrap();
        renderer.render_to_file(&reading(), &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, renderer.encode_png(&reading()).unwrap());
        assert_eq!(&written[1..4], b"PNG");
    }

    #[test]
    fn layout_rejects_cramped_margins() {
        let mut config = RenderPreset::Standard.config();
        config.margins.left = 200;
        config.margins.right = 200;
        assert!(GaugeRenderer::new(config).is_err());
    }
}
