//! Color framebuffer: the output surface the pipeline draws into
//!
//! The textured rasterizer streams individual points here; the lite
//! render mode streams flat triangle fills and edge lines.

use super::math::Vec3;
use super::texture::Color;

pub struct Framebuffer {
    /// RGBA, 4 bytes per pixel
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&bytes);
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Bresenham line
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                self.set_pixel(x as usize, y as usize, color);
            }

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

    /// Flat-colored triangle fill over the bounding box (no depth test;
    /// the lite render path relies on painter's ordering instead)
    pub fn fill_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, color: Color) {
        let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
        let max_x = ((v1.x.max(v2.x).max(v3.x) + 1.0).min(self.width as f32)).max(0.0) as usize;
        let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
        let max_y = ((v1.y.max(v2.y).max(v3.y) + 1.0).min(self.height as f32)).max(0.0) as usize;

        let d = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
        if d.abs() < 0.0001 {
            return;
        }

        for y in min_y..max_y {
            for x in min_x..max_x {
                let px = x as f32;
                let py = y as f32;
                let u = ((v2.y - v3.y) * (px - v3.x) + (v3.x - v2.x) * (py - v3.y)) / d;
                let v = ((v3.y - v1.y) * (px - v3.x) + (v1.x - v3.x) * (py - v3.y)) / d;
                let w = 1.0 - u - v;

                const ERR: f32 = -0.0001;
                if u >= ERR && v >= ERR && w >= ERR {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Count of non-black pixels (test helper)
    #[cfg(test)]
    pub fn lit_pixels(&self) -> usize {
        self.pixels
            .chunks_exact(4)
            .filter(|p| p[0] != 0 || p[1] != 0 || p[2] != 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_in_bounds() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(1, 1, Color::RED);
        assert_eq!(fb.lit_pixels(), 1);
    }

    #[test]
    fn test_set_pixel_out_of_bounds_ignored() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(10, 10, Color::RED);
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn test_draw_line_endpoints() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_line(0, 0, 7, 7, Color::WHITE);
        let idx = (7 * 8 + 7) * 4;
        assert_eq!(fb.pixels[0], 255);
        assert_eq!(fb.pixels[idx], 255);
    }

    #[test]
    fn test_fill_triangle_covers_interior() {
        let mut fb = Framebuffer::new(16, 16);
        fb.fill_triangle(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(15.0, 0.0, 0.0),
            Vec3::new(0.0, 15.0, 0.0),
            Color::GREEN,
        );
        // Roughly half the square
        assert!(fb.lit_pixels() > 16 * 16 / 4);
    }

    #[test]
    fn test_fill_degenerate_triangle_draws_nothing() {
        let mut fb = Framebuffer::new(8, 8);
        let p = Vec3::new(2.0, 2.0, 0.0);
        fb.fill_triangle(p, p, p, Color::WHITE);
        assert_eq!(fb.lit_pixels(), 0);
    }
}
