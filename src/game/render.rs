// Stage and preview drawing
//
// Both views are pure functions of session state drawn into a `Canvas`.

use super::characters::ClipSet;
use crate::engine::assets::{SheetImage, Slice};
use crate::engine::renderer::canvas::{text_width, Canvas, GLYPH_HEIGHT, WHITE};
use crate::engine::renderer::Viewport;
use glam::{IVec2, Vec2};
use image::Rgba;

const STAGE_BACKGROUND: Rgba<u8> = Rgba([0x22, 0x22, 0x22, 255]);
const PREVIEW_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 0]);
const LABEL_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 128]);
const CLIP_HIGHLIGHT: Rgba<u8> = Rgba([0, 255, 0, 26]);

const LABEL_MARGIN: i32 = 4;
const LABEL_PADDING: i32 = 2;
const LABEL_HEIGHT: i32 = 16;

/// What the stage needs to draw the entity this tick
#[derive(Debug, Clone, Copy)]
pub struct StageSprite<'a> {
    pub sheet: &'a SheetImage,
    pub frame: Slice,
    /// Smallest frame width and height in the sheet
    pub min_frame: (u32, u32),
    pub position: Vec2,
    pub facing_left: bool,
    /// Multiplier, 1.0 is native size
    pub scale: f32,
}

impl StageSprite<'_> {
    /// Offset of the frame's top-left corner from the entity position
    ///
    /// Frames share a foot anchor: horizontally centred on the smallest
    /// frame, with the bottom edge half the smallest frame height below.
    pub fn anchor_offset(&self) -> Vec2 {
        let anchor_x = (self.min_frame.0 / 2) as f32;
        let anchor_y = (self.min_frame.1 / 2) as f32;
        Vec2::new(-anchor_x, -(self.frame.height as f32) + anchor_y)
    }
}

/// Draw the play field; the background is drawn even with nothing to show
pub fn draw_stage(canvas: &mut Canvas, sprite: Option<StageSprite<'_>>) {
    canvas.clear(STAGE_BACKGROUND);

    let Some(sprite) = sprite else {
        return;
    };

    let facing = if sprite.facing_left { -1.0 } else { 1.0 };
    let scale = Vec2::new(facing * sprite.scale, sprite.scale);

    canvas.draw_region(
        sprite.sheet.pixels(),
        IVec2::new(sprite.frame.x as i32, sprite.frame.y as i32),
        IVec2::new(sprite.frame.width as i32, sprite.frame.height as i32),
        sprite.position.round(),
        sprite.anchor_offset(),
        scale,
    );
}

/// Draw the sheet with slice outlines, frame numbers and clip highlights
pub fn draw_preview(
    canvas: &mut Canvas,
    sheet: Option<&SheetImage>,
    slices: &[Slice],
    clips: &ClipSet,
    viewport: &Viewport,
) {
    canvas.clear(PREVIEW_BACKGROUND);

    let Some(sheet) = sheet else {
        return;
    };

    let pan = viewport.pan().floor();
    let to_view = |slice: &Slice| IVec2::new(slice.x as i32, slice.y as i32) - pan.as_ivec2();
    let visible = |slice: &Slice| {
        viewport.intersects_rect(
            Vec2::new(slice.x as f32, slice.y as f32),
            Vec2::new(slice.width as f32, slice.height as f32),
        )
    };

    canvas.blit(sheet.pixels(), -pan.as_ivec2());

    for slice in slices.iter().filter(|s| visible(s)) {
        let origin = to_view(slice);
        canvas.stroke_dashed_rect(origin, slice.width, slice.height, WHITE);

        if let Some(number) = slice.frame_number.filter(|_| !slice.whitespace) {
            draw_label(canvas, origin, &number.to_string());
        }
    }

    for clip in clips.iter() {
        for frame in clip.frames.iter().filter(|f| visible(f)) {
            canvas.fill_rect(
                to_view(frame),
                i32::try_from(frame.width).unwrap_or(i32::MAX),
                i32::try_from(frame.height).unwrap_or(i32::MAX),
                CLIP_HIGHLIGHT,
            );
        }
    }
}

fn draw_label(canvas: &mut Canvas, slice_origin: IVec2, text: &str) {
    let origin = slice_origin + IVec2::splat(LABEL_MARGIN);
    let width = text_width(text) + 2 * LABEL_PADDING;
    canvas.fill_rect(origin, width, LABEL_HEIGHT, LABEL_BACKGROUND);

    let text_origin = origin + IVec2::new(LABEL_PADDING, (LABEL_HEIGHT - GLYPH_HEIGHT) / 2);
    canvas.draw_digits(text_origin, text, WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::SliceSheet;
    use crate::game::characters::{idle_over_all_frames, parse_actions};
    use crate::game::config::FrameDelays;
    use image::RgbaImage;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// 32x16 sheet: left frame red, right frame blue
    fn sheet() -> SheetImage {
        let pixels = RgbaImage::from_fn(32, 16, |x, _| if x < 16 { RED } else { BLUE });
        SheetImage::from_rgba("test.png", pixels)
    }

    fn frame(x: u32, number: u32) -> Slice {
        Slice {
            x,
            y: 0,
            width: 16,
            height: 16,
            whitespace: false,
            frame_number: Some(number),
        }
    }

    #[test]
    fn test_anchor_offset() {
        let sheet = sheet();
        let sprite = StageSprite {
            sheet: &sheet,
            frame: Slice {
                height: 24,
                ..frame(0, 1)
            },
            min_frame: (15, 16),
            position: Vec2::ZERO,
            facing_left: false,
            scale: 1.0,
        };
        assert_eq!(sprite.anchor_offset(), Vec2::new(-7.0, -16.0));
    }

    #[test]
    fn test_empty_stage_is_background() {
        let mut canvas = Canvas::new(8, 8);
        draw_stage(&mut canvas, None);
        assert_eq!(canvas.pixel(4, 4), Some(STAGE_BACKGROUND));
    }

    #[test]
    fn test_stage_draws_frame_at_anchor() {
        let sheet = sheet();
        let mut canvas = Canvas::new(64, 64);
        draw_stage(
            &mut canvas,
            Some(StageSprite {
                sheet: &sheet,
                frame: frame(16, 2),
                min_frame: (16, 16),
                position: Vec2::new(32.2, 32.0),
                facing_left: false,
                scale: 1.0,
            }),
        );

        // Frame spans x 24..40, y 24..40
        assert_eq!(canvas.pixel(24, 24), Some(BLUE));
        assert_eq!(canvas.pixel(39, 39), Some(BLUE));
        assert_eq!(canvas.pixel(23, 30), Some(STAGE_BACKGROUND));
        assert_eq!(canvas.pixel(30, 40), Some(STAGE_BACKGROUND));
    }

    #[test]
    fn test_stage_mirrors_when_facing_left() {
        let mut pixels = RgbaImage::from_pixel(4, 4, RED);
        pixels.put_pixel(0, 0, BLUE);
        let sheet = SheetImage::from_rgba("tiny.png", pixels);

        let mut canvas = Canvas::new(16, 16);
        draw_stage(
            &mut canvas,
            Some(StageSprite {
                sheet: &sheet,
                frame: Slice {
                    width: 4,
                    height: 4,
                    ..frame(0, 1)
                },
                min_frame: (4, 4),
                position: Vec2::new(8.0, 8.0),
                facing_left: true,
                scale: 1.0,
            }),
        );

        // Unmirrored the blue corner would be at (6, 6); mirrored it is at (9, 6)
        assert_eq!(canvas.pixel(9, 6), Some(BLUE));
        assert_eq!(canvas.pixel(6, 6), Some(RED));
    }

    #[test]
    fn test_preview_outlines_labels_and_highlights() {
        let sheet = sheet();
        let slices = SliceSheet::from_rows(["2:16x16"]);
        let clips = parse_actions("2:side_idle", &slices, &FrameDelays::default());

        let mut viewport = Viewport::new(Vec2::new(32.0, 16.0));
        viewport.set_content(Vec2::new(32.0, 16.0));

        let mut canvas = Canvas::new(32, 16);
        draw_preview(&mut canvas, Some(&sheet), slices.slices(), &clips, &viewport);

        // Dashed outline starts at each slice corner
        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
        assert_eq!(canvas.pixel(5, 0), Some(RED));
        // Label padding darkens the frame
        let label = canvas.pixel(5, 10).unwrap();
        assert!(label[0] < RED[0]);
        // Highlighted frame is tinted green, the other is not
        let tinted = canvas.pixel(30, 14).unwrap();
        assert!(tinted[1] > 0);
        assert_eq!(canvas.pixel(14, 14), Some(RED));
    }

    #[test]
    fn test_preview_with_slice_wider_than_any_canvas() {
        let sheet = SheetImage::from_rgba("tiny.png", RgbaImage::from_pixel(8, 8, RED));
        let slices = SliceSheet::from_rows(["1:1500000000x8"]);
        let mut clips = ClipSet::new();
        if let Some(idle) = idle_over_all_frames(&slices, &FrameDelays::default()) {
            clips.insert(idle);
        }

        let mut viewport = Viewport::new(Vec2::new(480.0, 480.0));
        viewport.set_content(Vec2::new(8.0, 8.0));

        let mut canvas = Canvas::new(480, 480);
        draw_preview(&mut canvas, Some(&sheet), slices.slices(), &clips, &viewport);

        assert_eq!(canvas.pixel(0, 0), Some(WHITE));
        // Highlight covers the frame well past the sheet's own pixels
        assert!(canvas.pixel(200, 4).unwrap()[1] > 0);
        assert_eq!(canvas.pixel(200, 100), Some(PREVIEW_BACKGROUND));
    }

    #[test]
    fn test_preview_respects_pan() {
        let sheet = sheet();
        let slices = SliceSheet::from_rows(["2:16x16"]);

        let mut viewport = Viewport::new(Vec2::new(16.0, 16.0));
        viewport.set_content(Vec2::new(32.0, 16.0));
        viewport.set_pan(Vec2::new(16.0, 0.0));

        let mut canvas = Canvas::new(16, 16);
        draw_preview(&mut canvas, Some(&sheet), slices.slices(), &ClipSet::new(), &viewport);
        assert_eq!(canvas.pixel(14, 2), Some(BLUE));
    }
}
