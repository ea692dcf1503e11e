//! Spectrum trace rendering: dB gridlines, decayed max-hold stroke, the
//! live trace as a gradient-filled polygon with a solid stroke on top, and
//! the dashed tuned-frequency marker.

use js_sys::Array;
use web_sys::CanvasRenderingContext2d;

use crate::geometry::db_to_y;

/// Draw one frame of the spectrum region. `columns` is the raw bin data
/// already downsampled to one sample per pixel column; `None` means the
/// host isn't publishing bins yet, in which case only the gridlines and
/// marker are drawn.
pub fn draw_spectrum(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    columns: Option<&[f32]>,
    max_hold: &[f32],
    max_db: f64,
    min_db: f64,
    marker_x: f64,
) {
    ctx.set_fill_style_str("#000");
    ctx.fill_rect(0.0, 0.0, width, height);

    draw_db_gridlines(ctx, width, height, max_db, min_db);

    let Some(columns) = columns else {
        draw_tuned_marker(ctx, marker_x, height);
        return;
    };

    // Max-hold trace, dim, behind the live trace.
    ctx.begin_path();
    ctx.set_stroke_style_str("rgba(180,80,50,.4)");
    ctx.set_line_width(1.0);
    trace_path(ctx, max_hold, height, max_db, min_db);
    ctx.stroke();

    // Filled area under the live trace.
    ctx.begin_path();
    ctx.move_to(0.0, height);
    for (x, &s) in columns.iter().enumerate() {
        ctx.line_to(x as f64, db_to_y(s as f64, max_db, min_db, height));
    }
    ctx.line_to(width, height);
    ctx.close_path();
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    let _ = gradient.add_color_stop(0.0, "rgba(70,170,70,.72)");
    let _ = gradient.add_color_stop(0.5, "rgba(35,95,35,.25)");
    let _ = gradient.add_color_stop(1.0, "rgba(0,0,0,0)");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill();

    // Live trace stroke.
    ctx.begin_path();
    ctx.set_stroke_style_str("#55bb55");
    ctx.set_line_width(1.2);
    trace_path(ctx, columns, height, max_db, min_db);
    ctx.stroke();

    draw_tuned_marker(ctx, marker_x, height);
}

fn trace_path(ctx: &CanvasRenderingContext2d, samples: &[f32], height: f64, max_db: f64, min_db: f64) {
    for (x, &s) in samples.iter().enumerate() {
        let y = db_to_y(s as f64, max_db, min_db, height);
        if x == 0 {
            ctx.move_to(0.0, y);
        } else {
            ctx.line_to(x as f64, y);
        }
    }
}

fn draw_db_gridlines(ctx: &CanvasRenderingContext2d, width: f64, height: f64, max_db: f64, min_db: f64) {
    ctx.set_stroke_style_str("rgba(255,255,255,.04)");
    ctx.set_line_width(1.0);
    let mut db = (min_db / 10.0).ceil() * 10.0;
    while db <= max_db {
        let y = db_to_y(db, max_db, min_db, height);
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
        ctx.stroke();
        db += 10.0;
    }
}

/// Dashed vertical marker at the tuned-frequency column. Off-screen x
/// simply clips.
pub fn draw_tuned_marker(ctx: &CanvasRenderingContext2d, x: f64, height: f64) {
    ctx.save();
    ctx.set_stroke_style_str("rgba(200,180,0,.7)");
    ctx.set_line_width(1.0);
    let _ = ctx.set_line_dash(&Array::of2(&4.0.into(), &4.0.into()));
    ctx.begin_path();
    ctx.move_to(x, 0.0);
    ctx.line_to(x, height);
    ctx.stroke();
    let _ = ctx.set_line_dash(&Array::new());
    ctx.restore();
}
