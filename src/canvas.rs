//! Drawing surfaces.
//!
//! Generation never touches a surface; a finished [`Forest`] is painted onto
//! one afterwards, scaled to whatever size the surface reports.

use crate::config::Rgb;
use crate::error::Result;
use crate::forest::{DrawCall, Forest};
use image::{Rgb as Pixel, RgbImage};
use log::info;
use std::path::Path;

/// Anything that can execute stroke instructions.
pub trait Surface {
    /// Size in the surface's own units (pixels, braille dots).
    fn size(&self) -> (u32, u32);

    fn stroke(&mut self, call: &DrawCall);
}

/// Paint every segment in emission order.
pub fn paint<S: Surface + ?Sized>(forest: &Forest, surface: &mut S) {
    let (width, height) = surface.size();
    for call in forest.draw_calls_at(width, height) {
        surface.stroke(&call);
    }
}

/// RGB raster backed by an [`RgbImage`].
pub struct PixelSurface {
    image: RgbImage,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let fill = Pixel([background.r, background.g, background.b]);
        Self {
            image: RgbImage::from_pixel(width, height, fill),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        info!("wrote {}x{} image to {}", self.image.width(), self.image.height(), path.display());
        Ok(())
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Fill every pixel whose centre lies within half the stroke width of the
    /// segment (a round-capped line).
    fn stroke(&mut self, call: &DrawCall) {
        let (width, height) = self.image.dimensions();
        let radius = (call.stroke_width / 2.0).max(0.5);

        let min_x = (call.x0.min(call.x1) - radius).floor().max(0.0);
        let max_x = (call.x0.max(call.x1) + radius).ceil().min(f64::from(width) - 1.0);
        let min_y = (call.y0.min(call.y1) - radius).floor().max(0.0);
        let max_y = (call.y0.max(call.y1) + radius).ceil().min(f64::from(height) - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let color = Pixel([call.color.r, call.color.g, call.color.b]);
        for py in min_y as u32..=max_y as u32 {
            for px in min_x as u32..=max_x as u32 {
                let cx = f64::from(px) + 0.5;
                let cy = f64::from(py) + 0.5;
                if distance_to_segment(cx, cy, call) <= radius {
                    self.image.put_pixel(px, py, color);
                }
            }
        }
    }
}

fn distance_to_segment(px: f64, py: f64, call: &DrawCall) -> f64 {
    let dx = call.x1 - call.x0;
    let dy = call.y1 - call.y0;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - call.x0) * dx + (py - call.y0) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (px - (call.x0 + t * dx)).hypot(py - (call.y0 + t * dy))
}

/// Dot grid for braille output: each terminal cell holds 2x4 dots.
pub struct BrailleSurface {
    width: usize,
    height: usize,
    dots: Vec<Vec<Option<Rgb>>>,
}

impl BrailleSurface {
    /// Grid covering `cols` x `rows` terminal cells.
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        let width = cols as usize * 2;
        let height = rows as usize * 4;
        Self {
            width,
            height,
            dots: vec![vec![None; width]; height],
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.dots {
            row.fill(None);
        }
    }

    /// Braille glyph and colour for cell (cx, cy), if any dot is set.
    ///
    /// The colour is taken from the last dot set in the cell.
    pub fn cell(&self, cx: usize, cy: usize) -> Option<(char, Rgb)> {
        // Bit for each (dx, dy) dot in the U+2800 block
        const BITS: [(usize, usize, u8); 8] = [
            (0, 0, 0x01),
            (0, 1, 0x02),
            (0, 2, 0x04),
            (1, 0, 0x08),
            (1, 1, 0x10),
            (1, 2, 0x20),
            (0, 3, 0x40),
            (1, 3, 0x80),
        ];

        let bx = cx * 2;
        let by = cy * 4;
        let mut mask: u8 = 0;
        let mut color = None;
        for (dx, dy, bit) in BITS {
            if let Some(c) = self.dots.get(by + dy).and_then(|row| row.get(bx + dx)).copied().flatten() {
                mask |= bit;
                color = Some(c);
            }
        }

        let ch = char::from_u32(0x2800 + u32::from(mask))?;
        color.map(|c| (ch, c))
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.dots[y as usize][x as usize] = Some(color);
        }
    }
}

impl Surface for BrailleSurface {
    fn size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Bresenham line; stroke width is ignored at this resolution.
    fn stroke(&mut self, call: &DrawCall) {
        let (x1, y1) = (call.x1 as i64, call.y1 as i64);
        let (mut x, mut y) = (call.x0 as i64, call.y0 as i64);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, call.color);
            if x == x1 && y == y1 {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(x0: f64, y0: f64, x1: f64, y1: f64, stroke_width: f64) -> DrawCall {
        DrawCall {
            x0,
            y0,
            x1,
            y1,
            stroke_width,
            color: Rgb::GREEN,
        }
    }

    #[test]
    fn pixel_surface_strokes_inside_the_capsule() {
        let mut surface = PixelSurface::new(20, 20, Rgb::BLACK);
        surface.stroke(&call(2.0, 10.0, 18.0, 10.0, 2.0));

        let img = surface.image();
        assert_eq!(img.get_pixel(10, 9).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(10, 10).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(10, 14).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn pixel_surface_clips_off_canvas_segments() {
        let mut surface = PixelSurface::new(10, 10, Rgb::BLACK);
        surface.stroke(&call(-50.0, -50.0, -40.0, -40.0, 3.0));
        surface.stroke(&call(5.0, 5.0, 40.0, 5.0, 1.0));
        assert!(surface.image().pixels().any(|p| p.0 == [0, 255, 0]));
    }

    #[test]
    fn braille_line_sets_dots_in_cells() {
        let mut surface = BrailleSurface::for_cells(4, 2);
        assert_eq!(surface.size(), (8, 8));

        surface.stroke(&call(0.0, 0.0, 7.0, 0.0, 1.0));
        let (ch, color) = surface.cell(0, 0).unwrap();
        // Top row of both dot columns
        assert_eq!(ch, '\u{2809}');
        assert_eq!(color, Rgb::GREEN);
        assert!(surface.cell(0, 1).is_none());

        surface.clear();
        assert!(surface.cell(0, 0).is_none());
    }
}
