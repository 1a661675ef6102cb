//! Annotation drawing: track boxes, counting line, heatmap inset, sidebar.

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};

use crate::counting::FrameStats;
use crate::heatmap::Heatmap;
use crate::tracker::{Label, TrackObservation};

const SIDEBAR_BG: Rgb<u8> = Rgb([40, 40, 40]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const MAGENTA: Rgb<u8> = Rgb([255, 100, 255]);
const GREY: Rgb<u8> = Rgb([200, 200, 200]);

/// Margin between the heatmap inset and the frame edges.
const INSET_MARGIN: u32 = 10;

fn label_color(label: Option<Label>) -> Rgb<u8> {
    match label {
        Some(Label::Male) => GREEN,
        Some(Label::Female) => MAGENTA,
        None => GREY,
    }
}

fn label_caption(label: Option<Label>) -> &'static str {
    match label {
        Some(Label::Male) => "Male",
        Some(Label::Female) => "Female",
        None => "Unknown",
    }
}

/// Draws the per-frame annotations and appends the statistics sidebar.
///
/// Text rendering needs a font; without one the geometric overlays still
/// draw and captions/sidebar text are skipped.
pub struct OverlayRenderer {
    font: Option<FontArc>,
    sidebar_width: u32,
    inset_size: u32,
}

impl OverlayRenderer {
    pub fn new(sidebar_width: u32, inset_size: u32) -> Self {
        Self {
            font: None,
            sidebar_width,
            inset_size,
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Annotate one processed frame and return it widened by the sidebar.
    pub fn compose(
        &self,
        mut frame: RgbImage,
        observed: &[TrackObservation],
        stats: &FrameStats,
        line_y: f32,
        heatmap: &Heatmap,
    ) -> RgbImage {
        let (w, h) = frame.dimensions();

        self.paste_heatmap_inset(&mut frame, heatmap);

        draw_line_segment_mut(&mut frame, (0.0, line_y), (w as f32, line_y), WHITE);

        for obs in observed {
            let color = label_color(obs.label);
            self.draw_track_box(&mut frame, obs, color);
        }

        let mut out = RgbImage::from_pixel(w + self.sidebar_width, h, SIDEBAR_BG);
        imageops::replace(&mut out, &frame, 0, 0);
        self.draw_sidebar(&mut out, w, stats);
        out
    }

    fn paste_heatmap_inset(&self, frame: &mut RgbImage, heatmap: &Heatmap) {
        let (w, h) = frame.dimensions();
        let inset = self.inset_size;
        if inset == 0 || w < inset + 2 * INSET_MARGIN || h < inset + 2 * INSET_MARGIN {
            return;
        }

        let x0 = w - inset - INSET_MARGIN;
        let y0 = h - inset - INSET_MARGIN;
        let thumb = heatmap.render(inset, inset);
        imageops::replace(frame, &thumb, x0 as i64, y0 as i64);
        draw_hollow_rect_mut(
            frame,
            imageproc::rect::Rect::at(x0 as i32 - 1, y0 as i32 - 1).of_size(inset + 2, inset + 2),
            YELLOW,
        );
    }

    fn draw_track_box(&self, frame: &mut RgbImage, obs: &TrackObservation, color: Rgb<u8>) {
        let rect = obs.rect;
        let bw = rect.width().max(1.0) as u32;
        let bh = rect.height().max(1.0) as u32;
        draw_hollow_rect_mut(
            frame,
            imageproc::rect::Rect::at(rect.x1 as i32, rect.y1 as i32).of_size(bw, bh),
            color,
        );

        if let Some(font) = &self.font {
            let caption = format!("ID:{} {}", obs.id, label_caption(obs.label));
            draw_text_mut(
                frame,
                color,
                rect.x1 as i32,
                (rect.y1 as i32 - 18).max(0),
                PxScale::from(16.0),
                font,
                &caption,
            );
        }
    }

    fn draw_sidebar(&self, out: &mut RgbImage, frame_width: u32, stats: &FrameStats) {
        let Some(font) = &self.font else {
            return;
        };
        let x = frame_width as i32 + 20;

        draw_text_mut(out, YELLOW, x, 30, PxScale::from(28.0), font, "STATISTICS");

        let lines: [(String, Rgb<u8>); 6] = [
            (format!("Frame: {}", stats.frame), WHITE),
            (format!("Current Count: {}", stats.current_count), WHITE),
            (format!("Total Entered: {}", stats.total_entered), GREEN),
            (format!("Total Exited: {}", stats.total_exited), RED),
            (format!("Males: {}", stats.label_count(Label::Male)), GREEN),
            (
                format!("Females: {}", stats.label_count(Label::Female)),
                MAGENTA,
            ),
        ];

        let mut y = 80;
        for (text, color) in &lines {
            draw_text_mut(out, *color, x, y, PxScale::from(20.0), font, text);
            y += 40;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::HeatmapConfig;
    use crate::tracker::Rect;

    fn small_heatmap() -> Heatmap {
        Heatmap::new(64, 48, HeatmapConfig::default())
    }

    #[test]
    fn test_compose_appends_sidebar() {
        let renderer = OverlayRenderer::new(80, 0);
        let frame = RgbImage::new(64, 48);
        let out = renderer.compose(frame, &[], &FrameStats::default(), 24.0, &small_heatmap());
        assert_eq!(out.dimensions(), (144, 48));
        assert_eq!(*out.get_pixel(100, 10), SIDEBAR_BG);
    }

    #[test]
    fn test_counting_line_is_drawn() {
        let renderer = OverlayRenderer::new(40, 0);
        let frame = RgbImage::new(64, 48);
        let out = renderer.compose(frame, &[], &FrameStats::default(), 24.0, &small_heatmap());
        assert_eq!(*out.get_pixel(30, 24), WHITE);
    }

    #[test]
    fn test_track_box_uses_label_color() {
        let renderer = OverlayRenderer::new(40, 0);
        let frame = RgbImage::new(64, 48);
        let obs = TrackObservation {
            id: 1,
            rect: Rect::new(10.0, 10.0, 30.0, 30.0),
            label: Some(Label::Male),
        };
        let out = renderer.compose(frame, &[obs], &FrameStats::default(), 40.0, &small_heatmap());
        assert_eq!(*out.get_pixel(10, 20), GREEN);
    }

    #[test]
    fn test_inset_skipped_on_small_frames() {
        // Frame smaller than the inset: compose must not panic or paste.
        let renderer = OverlayRenderer::new(40, 240);
        let frame = RgbImage::new(64, 48);
        let out = renderer.compose(frame, &[], &FrameStats::default(), 24.0, &small_heatmap());
        assert_eq!(out.dimensions(), (104, 48));
    }
}
