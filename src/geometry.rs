//! Frequency/pixel coordinate mapping.
//!
//! Every drawing routine (spectrum trace, waterfall marker, frequency scale,
//! passband indicator, click-to-tune) goes through the same linear transform
//! so the traces, ticks and markers stay column-aligned:
//!
//! `pixel = (freq - (center - span/2)) / span * width`

/// Visible frequency window `(lo, hi)` in kHz for a given center/span.
pub fn visible_range_khz(center_khz: f64, span_khz: f64) -> (f64, f64) {
    (center_khz - span_khz / 2.0, center_khz + span_khz / 2.0)
}

/// Map a frequency (kHz) to a pixel column on a surface `width` px wide.
pub fn freq_to_pixel(freq_khz: f64, center_khz: f64, span_khz: f64, width: f64) -> f64 {
    let (lo, _) = visible_range_khz(center_khz, span_khz);
    (freq_khz - lo) / span_khz * width
}

/// Inverse of [`freq_to_pixel`]: frequency (kHz) under pixel column `x`.
pub fn pixel_to_freq(x: f64, center_khz: f64, span_khz: f64, width: f64) -> f64 {
    let (lo, _) = visible_range_khz(center_khz, span_khz);
    lo + (x / width) * span_khz
}

/// Tuned-marker column, rounded to the nearest pixel. The marker is only
/// meaningful when the result lies inside `0..width`; callers draw it anyway
/// (an off-screen x simply clips).
pub fn marker_column(freq_khz: f64, center_khz: f64, span_khz: f64, width: f64) -> f64 {
    freq_to_pixel(freq_khz, center_khz, span_khz, width).round()
}

/// Map a power level (dB) to a y coordinate on a surface `height` px tall,
/// clamped to the surface. `max_db` maps to the top edge, `min_db` to the
/// bottom.
pub fn db_to_y(db: f64, max_db: f64, min_db: f64, height: f64) -> f64 {
    let range = max_db - min_db;
    height - ((db - min_db) / range * height).clamp(0.0, height)
}

// ── Frequency scale ticks ─────────────────────────────────────────────────

/// Candidate tick steps in MHz, finest first.
pub const TICK_STEPS_MHZ: &[f64] = &[
    0.001, 0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 20.0,
];

/// At most this many ticks across the scale bar.
pub const MAX_TICKS: f64 = 14.0;

/// Pick the finest step from [`TICK_STEPS_MHZ`] that keeps the tick count
/// at or below [`MAX_TICKS`] for a visible range of `range_mhz`.
pub fn pick_tick_step_mhz(range_mhz: f64) -> f64 {
    TICK_STEPS_MHZ
        .iter()
        .copied()
        .find(|&s| range_mhz / s <= MAX_TICKS)
        .unwrap_or(*TICK_STEPS_MHZ.last().unwrap())
}

/// Format a tick label: sub-MHz steps label in whole kHz, MHz steps in
/// whole MHz.
pub fn format_tick_label(freq_mhz: f64, step_mhz: f64) -> String {
    if step_mhz < 1.0 {
        format!("{:.0}", freq_mhz * 1000.0)
    } else {
        format!("{:.0}", freq_mhz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_within_one_pixel() {
        let (center, span, width) = (15_000.0, 20_000.0, 1000.0);
        let khz_per_px = span / width;
        for f in [5_000.0, 7_074.0, 14_225.0, 24_999.9] {
            let back = pixel_to_freq(freq_to_pixel(f, center, span, width), center, span, width);
            assert!(
                (back - f).abs() <= khz_per_px,
                "{f} kHz round-tripped to {back}"
            );
        }
    }

    #[test]
    fn test_tuned_marker_scenario() {
        // span 20 MHz, center 15 MHz, 1000 px wide, tuned 14225 kHz
        let x = marker_column(14_225.0, 15_000.0, 20_000.0, 1000.0);
        assert_eq!(x, 461.0);
    }

    #[test]
    fn test_click_to_tune_scenario() {
        let f = pixel_to_freq(500.0, 15_000.0, 20_000.0, 1000.0);
        assert!((f - 15_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_off_screen_tuning_is_legal() {
        // Tuned below the visible window: negative column, no panic.
        let x = freq_to_pixel(1_000.0, 15_000.0, 20_000.0, 1000.0);
        assert!(x < 0.0);
    }

    #[test]
    fn test_db_mapping_endpoints() {
        assert_eq!(db_to_y(-30.0, -30.0, -130.0, 140.0), 0.0);
        assert_eq!(db_to_y(-130.0, -30.0, -130.0, 140.0), 140.0);
        // Clamped outside the range
        assert_eq!(db_to_y(-200.0, -30.0, -130.0, 140.0), 140.0);
    }

    #[test]
    fn test_tick_step_keeps_at_most_fourteen_ticks() {
        // 20 MHz range: 2 MHz step gives 10 ticks, 1 MHz would give 20.
        assert_eq!(pick_tick_step_mhz(20.0), 2.0);
        // Narrow range picks a sub-MHz step.
        assert_eq!(pick_tick_step_mhz(0.1), 0.01);
        // Wider than the ladder covers: coarsest step wins.
        assert_eq!(pick_tick_step_mhz(10_000.0), 20.0);
    }
}
