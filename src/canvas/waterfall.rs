//! Waterfall region: the sub-rectangle of the host surface below the
//! spectrum/waterfall split line, copied and scaled to fill the overlay's
//! waterfall canvas.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::spectrum::draw_tuned_marker;

/// Copy the host's waterfall rows into our canvas. Returns false when the
/// geometry isn't sane this frame (zero-sized source or no waterfall rows
/// below the split), which just skips the copy.
pub fn copy_waterfall_region(
    ctx: &CanvasRenderingContext2d,
    dest_width: f64,
    dest_height: f64,
    source: &HtmlCanvasElement,
    split_y: f64,
    marker_x: f64,
) -> bool {
    let src_w = source.width() as f64;
    let src_h = source.height() as f64;
    let wf_src_h = src_h - split_y;
    if src_w <= 0.0 || src_h <= 0.0 || wf_src_h <= 0.0 || dest_width <= 0.0 || dest_height <= 0.0 {
        return false;
    }
    let copied = ctx
        .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            source, 0.0, split_y, src_w, wf_src_h, 0.0, 0.0, dest_width, dest_height,
        )
        .is_ok();
    if copied {
        draw_tuned_marker(ctx, marker_x, dest_height);
    }
    copied
}
