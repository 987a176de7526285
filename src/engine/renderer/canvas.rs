// Software canvas: pixel-exact 2D drawing into an RGBA image
//
// Everything is composited on the CPU and uploaded as one texture per frame.
// Coordinates are integer pixels; anything outside the canvas is clipped.

use glam::{IVec2, Vec2};
use image::{Rgba, RgbaImage};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Dash and gap length of dashed strokes
const DASH: u32 = 5;

/// 3x5 digit glyphs, one row per byte, high bit on the left
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Glyph pixel size
const GLYPH_SCALE: i32 = 2;
const GLYPH_WIDTH: i32 = 3 * GLYPH_SCALE;
pub const GLYPH_HEIGHT: i32 = 5 * GLYPH_SCALE;
const GLYPH_SPACING: i32 = GLYPH_SCALE;

/// Source-over blend of `src` onto `dst`
pub fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let src_a = src[3] as f32 / 255.0;
    if src_a >= 1.0 {
        return src;
    }
    if src_a <= 0.0 {
        return dst;
    }

    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let channel = |i: usize| {
        let value = (src[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}

/// Width in pixels of `text` drawn with the digit font
pub fn text_width(text: &str) -> i32 {
    let glyphs = text.chars().filter(char::is_ascii_digit).count() as i32;
    if glyphs == 0 {
        0
    } else {
        glyphs * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING
    }
}

/// An RGBA drawing surface
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// Overwrite every pixel
    pub fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Blend one pixel, ignoring anything off-canvas
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        *pixel = blend(*pixel, color);
    }

    /// Blend a filled rectangle
    pub fn fill_rect(&mut self, origin: IVec2, width: i32, height: i32, color: Rgba<u8>) {
        let x0 = origin.x.max(0);
        let y0 = origin.y.max(0);
        let x1 = (i64::from(origin.x) + i64::from(width)).min(i64::from(self.width())) as i32;
        let y1 = (i64::from(origin.y) + i64::from(height)).min(i64::from(self.height())) as i32;

        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Blend `src` with its top-left corner at `origin`
    pub fn blit(&mut self, src: &RgbaImage, origin: IVec2) {
        let x0 = origin.x.max(0);
        let y0 = origin.y.max(0);
        let x1 = (origin.x + src.width() as i32).min(self.width() as i32);
        let y1 = (origin.y + src.height() as i32).min(self.height() as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                let color = *src.get_pixel((x - origin.x) as u32, (y - origin.y) as u32);
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// One-pixel dashed outline covering `[origin, origin + size)`
    ///
    /// Dashes run clockwise from the top-left corner. Only the on-canvas
    /// part of each edge is visited, so cost is bounded by the canvas size.
    pub fn stroke_dashed_rect(&mut self, origin: IVec2, width: u32, height: u32, color: Rgba<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        let (w, h) = (i64::from(width), i64::from(height));
        let (ox, oy) = (i64::from(origin.x), i64::from(origin.y));

        // Local ranges of the rectangle that land on the canvas
        let xs = (-ox).max(0)..(i64::from(self.width()) - ox).min(w);
        let ys = (-oy).max(0)..(i64::from(self.height()) - oy).min(h);

        let plot = |canvas: &mut Self, x: i64, y: i64, step: i64| {
            if (step / i64::from(DASH)) % 2 == 0 {
                canvas.blend_pixel((ox + x) as i32, (oy + y) as i32, color);
            }
        };

        // Top, left to right
        if ys.contains(&0) {
            for x in xs.clone() {
                plot(self, x, 0, x);
            }
        }
        // Right, downwards
        if xs.contains(&(w - 1)) {
            for y in ys.start.max(1)..ys.end {
                plot(self, w - 1, y, w - 1 + y);
            }
        }
        // Bottom, right to left
        if h > 1 && ys.contains(&(h - 1)) {
            for x in xs.start..xs.end.min(w - 1) {
                plot(self, x, h - 1, w + h - 1 + (w - 2 - x));
            }
        }
        // Left, upwards
        if w > 1 && xs.contains(&0) {
            for y in ys.start.max(1)..ys.end.min(h - 1) {
                plot(self, 0, y, 2 * w + h - 2 + (h - 2 - y));
            }
        }
    }

    /// Draw decimal digits with the built-in font; other characters are skipped
    pub fn draw_digits(&mut self, origin: IVec2, text: &str, color: Rgba<u8>) {
        let mut pen = origin.x;

        for digit in text.chars().filter_map(|c| c.to_digit(10)) {
            let glyph = &DIGITS[digit as usize];
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) == 0 {
                        continue;
                    }
                    let x = pen + col * GLYPH_SCALE;
                    let y = origin.y + row as i32 * GLYPH_SCALE;
                    self.fill_rect(IVec2::new(x, y), GLYPH_SCALE, GLYPH_SCALE, color);
                }
            }
            pen += GLYPH_WIDTH + GLYPH_SPACING;
        }
    }

    /// Draw a `size`-sized region of `src` starting at `src_origin`
    ///
    /// The region's local origin is moved by `offset`, scaled by `scale`
    /// (negative x mirrors it) and placed at `position`. Sampling is
    /// nearest-neighbour.
    pub fn draw_region(
        &mut self,
        src: &RgbaImage,
        src_origin: IVec2,
        size: IVec2,
        position: Vec2,
        offset: Vec2,
        scale: Vec2,
    ) {
        if size.x <= 0 || size.y <= 0 || scale.x == 0.0 || scale.y == 0.0 {
            return;
        }

        // Destination bounds from the transformed corners
        let corner_a = position + offset * scale;
        let corner_b = position + (offset + size.as_vec2()) * scale;
        let min = corner_a.min(corner_b).floor().max(Vec2::ZERO);
        let max = corner_a.max(corner_b).ceil().min(self.size());

        for y in min.y as i32..max.y as i32 {
            for x in min.x as i32..max.x as i32 {
                let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let local = (centre - position) / scale - offset;
                if local.x < 0.0 || local.y < 0.0 {
                    continue;
                }
                let (u, v) = (local.x as i32, local.y as i32);
                if u >= size.x || v >= size.y {
                    continue;
                }

                let (sx, sy) = (src_origin.x + u, src_origin.y + v);
                if sx < 0 || sy < 0 || sx >= src.width() as i32 || sy >= src.height() as i32 {
                    continue;
                }
                let color = *src.get_pixel(sx as u32, sy as u32);
                self.blend_pixel(x, y, color);
            }
        }
    }
}
