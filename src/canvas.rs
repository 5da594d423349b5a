use image::{Rgba, RgbaImage};
use std::collections::VecDeque;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// An immutable full-resolution copy of the canvas, captured at one instant.
///
/// Owned exclusively by whichever history stack holds it; read-only once
/// captured.
#[derive(Clone)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// The in-memory framebuffer the tools draw into.
///
/// A fixed-size RGBA pixel buffer, created white. Capture and restore read
/// and write this buffer directly; nothing here depends on screen
/// coordinates or window state. The revision counter lets the shell know
/// when the GPU texture needs a re-upload.
pub struct Canvas {
    pixels: RgbaImage,
    revision: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, WHITE),
            revision: 0,
        }
    }

    /// Adopt an existing image as the canvas; its dimensions become the
    /// viewport.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels, revision: 0 }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Bumped on every mutation; the shell re-uploads its texture when this
    /// changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixels: self.pixels.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.pixels = snapshot.pixels.clone();
        self.mark_dirty();
    }

    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
        self.mark_dirty();
    }

    /// Replace the whole buffer, keeping the viewport size. Used by the
    /// filters, which operate on a copy of the image.
    pub fn replace_pixels(&mut self, pixels: RgbaImage) {
        debug_assert_eq!(pixels.dimensions(), self.pixels.dimensions());
        self.pixels = pixels;
        self.mark_dirty();
    }

    /// Paint `image` into the top-left corner, cropping whatever does not
    /// fit the viewport. The rest of the canvas is cleared to white first.
    pub fn blit_top_left(&mut self, image: &RgbaImage) {
        let w = self.pixels.width().min(image.width());
        let h = self.pixels.height().min(image.height());
        for pixel in self.pixels.pixels_mut() {
            *pixel = WHITE;
        }
        for y in 0..h {
            for x in 0..w {
                self.pixels.put_pixel(x, y, *image.get_pixel(x, y));
            }
        }
        self.mark_dirty();
    }

    /// Stamp a filled disc of `radius` at `(x, y)`, clamped to the buffer.
    /// Radius 0 paints a single pixel.
    pub fn stamp_brush(&mut self, x: i32, y: i32, radius: i32, color: Rgba<u8>) {
        let (width, height) = (self.pixels.width() as i32, self.pixels.height() as i32);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if nx >= 0 && nx < width && ny >= 0 && ny < height {
                    self.pixels.put_pixel(nx as u32, ny as u32, color);
                }
            }
        }
        self.mark_dirty();
    }

    /// Sweep the brush stamp along the segment from `p0` to `p1`
    /// (Bresenham), giving strokes round caps and joints.
    pub fn brush_segment(
        &mut self,
        p0: (i32, i32),
        p1: (i32, i32),
        radius: i32,
        color: Rgba<u8>,
    ) {
        let (x0, y0) = p0;
        let (x1, y1) = p1;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.stamp_brush(x, y, radius, color);
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

    /// Straight stroke committed on pointer release.
    pub fn draw_line(&mut self, p0: (i32, i32), p1: (i32, i32), radius: i32, color: Rgba<u8>) {
        self.brush_segment(p0, p1, radius, color);
    }

    /// Outlined rectangle spanning the drag from `p0` to `p1`.
    pub fn draw_rect(&mut self, p0: (i32, i32), p1: (i32, i32), radius: i32, color: Rgba<u8>) {
        let (x0, y0) = p0;
        let (x1, y1) = p1;
        self.brush_segment((x0, y0), (x1, y0), radius, color);
        self.brush_segment((x1, y0), (x1, y1), radius, color);
        self.brush_segment((x1, y1), (x0, y1), radius, color);
        self.brush_segment((x0, y1), (x0, y0), radius, color);
    }

    /// Outlined ellipse inscribed in the drag rectangle from `p0` to `p1`.
    pub fn draw_oval(&mut self, p0: (i32, i32), p1: (i32, i32), radius: i32, color: Rgba<u8>) {
        let cx = (p0.0 + p1.0) as f32 / 2.0;
        let cy = (p0.1 + p1.1) as f32 / 2.0;
        let rx = (p1.0 - p0.0).abs() as f32 / 2.0;
        let ry = (p1.1 - p0.1).abs() as f32 / 2.0;

        // Enough samples that consecutive points are at most a pixel apart;
        // segments between them cover the remainder.
        let steps = (std::f32::consts::TAU * rx.max(ry)).ceil().max(16.0) as u32;
        let mut last: Option<(i32, i32)> = None;
        for i in 0..=steps {
            let theta = std::f32::consts::TAU * i as f32 / steps as f32;
            let px = (cx + rx * theta.cos()).round() as i32;
            let py = (cy + ry * theta.sin()).round() as i32;
            if let Some(prev) = last {
                self.brush_segment(prev, (px, py), radius, color);
            }
            last = Some((px, py));
        }
    }

    /// Bucket fill: recolor the contiguous region of same-colored pixels
    /// under `(x, y)` (4-neighbor BFS). Out-of-bounds presses and fills
    /// with the region's own color are no-ops.
    pub fn flood_fill(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        let (width, height) = (self.pixels.width() as i32, self.pixels.height() as i32);
        if x < 0 || x >= width || y < 0 || y >= height {
            return;
        }
        let target = *self.pixels.get_pixel(x as u32, y as u32);
        if target == color {
            return;
        }

        let mut queue = VecDeque::with_capacity(1024);
        queue.push_back((x, y));
        while let Some((cx, cy)) = queue.pop_front() {
            if *self.pixels.get_pixel(cx as u32, cy as u32) != target {
                continue;
            }
            self.pixels.put_pixel(cx as u32, cy as u32, color);
            if cx > 0 {
                queue.push_back((cx - 1, cy));
            }
            if cx + 1 < width {
                queue.push_back((cx + 1, cy));
            }
            if cy > 0 {
                queue.push_back((cx, cy - 1));
            }
            if cy + 1 < height {
                queue.push_back((cx, cy + 1));
            }
        }
        self.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn new_canvas_is_white() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.pixel(0, 0), WHITE);
        assert_eq!(canvas.pixel(3, 2), WHITE);
    }

    #[test]
    fn stamp_with_zero_radius_paints_one_pixel() {
        let mut canvas = Canvas::new(5, 5);
        canvas.stamp_brush(2, 2, 0, RED);
        assert_eq!(canvas.pixel(2, 2), RED);
        assert_eq!(canvas.pixel(3, 2), WHITE);
    }

    #[test]
    fn stamp_is_clamped_at_the_border() {
        let mut canvas = Canvas::new(4, 4);
        canvas.stamp_brush(0, 0, 3, RED);
        canvas.stamp_brush(-10, -10, 2, RED); // fully outside
        assert_eq!(canvas.pixel(0, 0), RED);
    }

    #[test]
    fn brush_segment_covers_both_endpoints() {
        let mut canvas = Canvas::new(10, 10);
        canvas.brush_segment((1, 1), (8, 6), 0, RED);
        assert_eq!(canvas.pixel(1, 1), RED);
        assert_eq!(canvas.pixel(8, 6), RED);
    }

    #[test]
    fn rect_outline_leaves_the_interior_untouched() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_rect((1, 1), (8, 8), 0, RED);
        assert_eq!(canvas.pixel(1, 1), RED);
        assert_eq!(canvas.pixel(8, 1), RED);
        assert_eq!(canvas.pixel(4, 4), WHITE);
    }

    #[test]
    fn flood_fill_stops_at_a_boundary() {
        let mut canvas = Canvas::new(10, 10);
        // vertical wall splitting the canvas in two
        canvas.brush_segment((5, 0), (5, 9), 0, RED);
        canvas.flood_fill(2, 2, BLUE);
        assert_eq!(canvas.pixel(0, 0), BLUE);
        assert_eq!(canvas.pixel(4, 9), BLUE);
        assert_eq!(canvas.pixel(5, 5), RED);
        assert_eq!(canvas.pixel(6, 5), WHITE);
    }

    #[test]
    fn flood_fill_with_region_color_is_a_noop() {
        let mut canvas = Canvas::new(4, 4);
        let before = canvas.revision();
        canvas.flood_fill(1, 1, WHITE);
        assert_eq!(canvas.revision(), before);
    }

    #[test]
    fn snapshot_restore_round_trips_exactly() {
        let mut canvas = Canvas::new(6, 6);
        canvas.stamp_brush(3, 3, 2, RED);
        let snapshot = canvas.snapshot();
        canvas.clear(BLUE);
        assert_ne!(canvas.pixel(3, 3), RED);
        canvas.restore(&snapshot);
        assert_eq!(canvas.pixels().as_raw(), snapshot.pixels().as_raw());
    }

    #[test]
    fn blit_crops_to_the_viewport() {
        let mut canvas = Canvas::new(4, 4);
        let big = RgbaImage::from_pixel(8, 8, RED);
        canvas.blit_top_left(&big);
        assert_eq!(canvas.pixel(3, 3), RED);

        let small = RgbaImage::from_pixel(2, 2, BLUE);
        canvas.blit_top_left(&small);
        assert_eq!(canvas.pixel(1, 1), BLUE);
        assert_eq!(canvas.pixel(3, 3), WHITE); // cleared around the blit
    }

    #[test]
    fn mutations_bump_the_revision() {
        let mut canvas = Canvas::new(4, 4);
        let before = canvas.revision();
        canvas.stamp_brush(1, 1, 1, RED);
        assert!(canvas.revision() > before);
    }
}
