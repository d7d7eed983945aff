//! Raster sheet writer (binary PPM)

use glam::DVec2;

use super::drawing::Drawing;
use crate::config::RasterConfig;

const BACKGROUND: [u8; 3] = [255, 255, 255];
const INK: [u8; 3] = [0, 0, 0];
const LABEL_DOT: i64 = 1;

/// RGB pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 3;
        let pixels = BACKGROUND.iter().copied().cycle().take(len).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Set a pixel, ignoring points off the canvas
    pub fn plot(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[i..i + 3].copy_from_slice(&color);
    }

    /// Bresenham line between two pixel positions
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64), color: [u8; 3]) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Encode as binary PPM (P6)
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.pixels);
        out
    }
}

/// Rasterize a drawing, fitting the outline into the configured size
pub fn render_raster(drawing: &Drawing, config: &RasterConfig) -> Canvas {
    let mut canvas = Canvas::new(config.width_px, config.height_px);
    let outline = drawing.outline;
    let max = DVec2::new(
        f64::from(config.width_px) - 1.0,
        f64::from(config.height_px) - 1.0,
    );
    let scale = (max.x / outline.width()).min(max.y / outline.height());
    let to_canvas = |p: DVec2| {
        let local = (p - outline.min) * scale;
        DVec2::new(local.x, max.y - local.y)
    };

    for stroke in &drawing.strokes {
        if let Some((from, to)) = clip_segment(to_canvas(stroke.from), to_canvas(stroke.to), max) {
            canvas.line(to_px(from), to_px(to), INK);
        }
    }
    // Labels are rendered as anchor dots; text belongs to the vector output
    let margin = LABEL_DOT as f64;
    for label in &drawing.labels {
        let at = to_canvas(label.at);
        if !at.is_finite()
            || at.cmplt(DVec2::splat(-margin)).any()
            || at.cmpgt(max + margin).any()
        {
            continue;
        }
        let (x, y) = to_px(at);
        for dy in -LABEL_DOT..=LABEL_DOT {
            for dx in -LABEL_DOT..=LABEL_DOT {
                canvas.plot(x + dx, y + dy, INK);
            }
        }
    }
    canvas
}

/// Round a point already known to lie near the canvas
fn to_px(p: DVec2) -> (i64, i64) {
    (p.x.round() as i64, p.y.round() as i64)
}

/// Liang-Barsky clip of the segment `a..b` to `[0, max.x] x [0, max.y]`
///
/// Endpoints that land on an edge take that edge's coordinate exactly, so
/// long segments keep their position after clipping.
fn clip_segment(a: DVec2, b: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    if !a.is_finite() || !d.is_finite() {
        return None;
    }
    let edges = [
        (-d.x, a.x, Edge::X(0.0)),
        (d.x, max.x - a.x, Edge::X(max.x)),
        (-d.y, a.y, Edge::Y(0.0)),
        (d.y, max.y - a.y, Edge::Y(max.y)),
    ];
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let (mut enter, mut exit) = (None, None);
    for (p, q, edge) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            if t > t0 {
                t0 = t;
                enter = Some(edge);
            }
        } else {
            if t < t0 {
                return None;
            }
            if t < t1 {
                t1 = t;
                exit = Some(edge);
            }
        }
    }
    let clamp = |p: DVec2| p.clamp(DVec2::ZERO, max);
    let from = clamp(Edge::snap(enter, a + d * t0));
    let to = clamp(Edge::snap(exit, a + d * t1));
    Some((from, to))
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    X(f64),
    Y(f64),
}

impl Edge {
    fn snap(edge: Option<Edge>, p: DVec2) -> DVec2 {
        match edge {
            Some(Edge::X(x)) => DVec2::new(x, p.y),
            Some(Edge::Y(y)) => DVec2::new(p.x, y),
            None => p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::drawing::{Label, Stroke};
    use vd_core::Rect2;

    #[test]
    fn test_ppm_header_and_size() {
        let canvas = Canvas::new(4, 3);
        let ppm = canvas.to_ppm();
        assert!(ppm.starts_with(b"P6\n4 3\n255\n"));
        assert_eq!(ppm.len(), "P6\n4 3\n255\n".len() + 4 * 3 * 3);
    }

    #[test]
    fn test_line_endpoints() {
        let mut canvas = Canvas::new(10, 10);
        canvas.line((1, 1), (8, 5), INK);
        assert_eq!(canvas.pixel(1, 1), Some(INK));
        assert_eq!(canvas.pixel(8, 5), Some(INK));
        assert_eq!(canvas.pixel(9, 9), Some(BACKGROUND));
    }

    #[test]
    fn test_plot_off_canvas_is_ignored() {
        let mut canvas = Canvas::new(2, 2);
        canvas.plot(-1, 0, INK);
        canvas.plot(2, 0, INK);
        assert_eq!(canvas, Canvas::new(2, 2));
    }

    #[test]
    fn test_render_outline_corners() {
        let drawing = Drawing {
            title: String::new(),
            outline: Rect2::new(DVec2::ZERO, DVec2::new(10.0, 8.0)),
            strokes: vec![Stroke {
                from: DVec2::ZERO,
                to: DVec2::new(10.0, 8.0),
            }],
            labels: Vec::new(),
        };
        let canvas = render_raster(
            &drawing,
            &RasterConfig {
                width_px: 101,
                height_px: 81,
            },
        );
        // sheet origin is the bottom-left pixel
        assert_eq!(canvas.pixel(0, 80), Some(INK));
        assert_eq!(canvas.pixel(100, 0), Some(INK));
        assert_eq!(canvas.pixel(100, 80), Some(BACKGROUND));
    }

    #[test]
    fn test_clip_segment() {
        let max = DVec2::new(9.0, 9.0);
        let (from, to) = clip_segment(DVec2::new(-5.0, 4.0), DVec2::new(20.0, 4.0), max).unwrap();
        assert_eq!(from, DVec2::new(0.0, 4.0));
        assert_eq!(to, DVec2::new(9.0, 4.0));
        assert_eq!(clip_segment(DVec2::new(-5.0, -1.0), DVec2::new(20.0, -1.0), max), None);
        assert_eq!(clip_segment(DVec2::new(10.0, 0.0), DVec2::new(20.0, 9.0), max), None);
    }

    #[test]
    fn test_render_huge_strokes() {
        let drawing = Drawing {
            title: String::new(),
            outline: Rect2::new(DVec2::ZERO, DVec2::new(10.0, 8.0)),
            strokes: vec![
                Stroke {
                    from: DVec2::new(-1e150, 4.0),
                    to: DVec2::new(1e150, 4.0),
                },
                Stroke {
                    from: DVec2::splat(1e300),
                    to: DVec2::splat(-1e300),
                },
                Stroke {
                    from: DVec2::new(1e150, 1e150),
                    to: DVec2::new(2e150, 1e150),
                },
            ],
            labels: vec![Label {
                at: DVec2::splat(1e200),
                text: "X".to_string(),
            }],
        };
        let canvas = render_raster(
            &drawing,
            &RasterConfig {
                width_px: 101,
                height_px: 81,
            },
        );
        // the horizontal stroke crosses the whole canvas at sheet y = 4
        assert_eq!(canvas.pixel(0, 40), Some(INK));
        assert_eq!(canvas.pixel(100, 40), Some(INK));
    }
}
