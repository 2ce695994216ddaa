use std::f64::consts::PI;
use web_sys::{CanvasRenderingContext2d, HtmlVideoElement};
use vidcompare_core::compositor::{Blit, DividerMark, FramePlan};
use vidcompare_core::CompareConfig;

/// Paint one frame: panel slices from the current video frame, then the divider decorations.
pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    video: &HtmlVideoElement,
    plan: &FramePlan,
    config: &CompareConfig,
    canvas_height: f64,
) {
    for blit in &plan.blits {
        draw_slice(ctx, video, blit);
    }
    ctx.save();
    for mark in &plan.marks {
        draw_divider(ctx, mark, config, canvas_height);
    }
    ctx.restore();
}

fn draw_slice(ctx: &CanvasRenderingContext2d, video: &HtmlVideoElement, blit: &Blit) {
    if blit.width <= 0.0 {
        return;
    }
    // Throws while the video has no frame yet; the next tick tries again.
    let _ = ctx.draw_image_with_html_video_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        video,
        blit.src_x,
        0.0,
        blit.width,
        blit.height,
        blit.dst_x,
        0.0,
        blit.width,
        blit.height,
    );
}

/// Marker circle plus full-height line.
fn draw_divider(
    ctx: &CanvasRenderingContext2d,
    mark: &DividerMark,
    config: &CompareConfig,
    canvas_height: f64,
) {
    ctx.begin_path();
    let _ = ctx.arc(mark.x, mark.marker_y, mark.marker_radius, 0.0, PI * 2.0);
    ctx.set_fill_style_str(&config.marker_fill);
    ctx.fill();

    ctx.set_stroke_style_str(&config.line_color);
    ctx.set_line_width(config.line_width);
    ctx.begin_path();
    ctx.move_to(mark.x, 0.0);
    ctx.line_to(mark.x, canvas_height);
    ctx.stroke();

    if config.arrow_glyph {
        draw_arrow(ctx, mark, config);
    }
}

/// Double-headed horizontal arrow through the marker.
fn draw_arrow(ctx: &CanvasRenderingContext2d, mark: &DividerMark, config: &CompareConfig) {
    let half = mark.marker_radius * 0.7;
    let head = mark.marker_radius * 0.3;
    let (x, y) = (mark.x, mark.marker_y);

    ctx.set_stroke_style_str(&config.line_color);
    ctx.set_line_width((config.line_width * 0.5).max(1.0));
    ctx.begin_path();
    ctx.move_to(x - half, y);
    ctx.line_to(x + half, y);

    ctx.move_to(x - half + head, y - head);
    ctx.line_to(x - half, y);
    ctx.line_to(x - half + head, y + head);

    ctx.move_to(x + half - head, y - head);
    ctx.line_to(x + half, y);
    ctx.line_to(x + half - head, y + head);
    ctx.stroke();
}
