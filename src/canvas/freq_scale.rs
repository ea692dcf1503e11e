//! Frequency scale bar: brushed-gradient background, vertical ticks at the
//! coarsest step that keeps at most ~14 visible, numeric labels.

use web_sys::CanvasRenderingContext2d;

use crate::geometry::{format_tick_label, pick_tick_step_mhz, visible_range_khz};

pub fn draw_scale(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    center_khz: f64,
    span_khz: f64,
) {
    if width <= 0.0 {
        return;
    }

    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    let _ = gradient.add_color_stop(0.0, "#c8c8c8");
    let _ = gradient.add_color_stop(0.5, "#e8e8e8");
    let _ = gradient.add_color_stop(1.0, "#c8c8c8");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, width, height);

    let (lo_khz, hi_khz) = visible_range_khz(center_khz, span_khz);
    let (lo, hi) = (lo_khz / 1000.0, hi_khz / 1000.0);
    let range = hi - lo;
    if range <= 0.0 {
        return;
    }
    let step = pick_tick_step_mhz(range);

    ctx.set_font("9px \"DejaVu Sans\",Verdana,Geneva,sans-serif");
    ctx.set_text_align("center");

    let mut f = (lo / step).ceil() * step;
    while f <= hi + step * 0.001 {
        let x = ((f - lo) / range) * width;
        ctx.set_stroke_style_str("rgba(0,0,0,.15)");
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, height);
        ctx.stroke();
        ctx.set_fill_style_str("#444");
        let _ = ctx.fill_text(&format_tick_label(f, step), x, height - 2.0);
        f += step;
    }
}
