//! Overlay session state, shared between the leptos view tree and the
//! render runtime as one signal bundle provided via context. No ambient
//! globals: the runtime holds one copy, components get it from context.

use leptos::prelude::*;

/// Allowed span values in kHz, widest first. The host's zoom steppers walk
/// this ladder; the overlay only displays the result (and uses it to report
/// an approximate zoom level when the host doesn't expose one).
pub const SPAN_LADDER_KHZ: [f64; 10] = [
    30_000.0, 20_000.0, 15_000.0, 10_000.0, 5_000.0, 2_000.0, 1_000.0, 500.0, 200.0, 100.0,
];

/// Index of the ladder entry nearest to `span_khz`.
pub fn span_ladder_index(span_khz: f64) -> usize {
    SPAN_LADDER_KHZ
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - span_khz)
                .abs()
                .partial_cmp(&(*b - span_khz).abs())
                .unwrap()
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[derive(Clone, Copy)]
pub struct OverlayState {
    // Tuning
    pub tuned_khz: RwSignal<f64>,
    pub center_khz: RwSignal<f64>,
    pub span_khz: RwSignal<f64>,
    /// Active mode as the host spells it; kept as a string so an unknown
    /// host mode still displays (the passband lookup falls back).
    pub mode: RwSignal<String>,

    // Display scale (spectrum trace bounds; waterfall pair is pass-through
    // to the host but mirrored here for the sliders/labels)
    pub sp_max_db: RwSignal<f64>,
    pub sp_min_db: RwSignal<f64>,
    pub wf_max_db: RwSignal<f64>,
    pub wf_min_db: RwSignal<f64>,

    // Measured surface geometry, fed by the per-frame resize pass so the
    // reactive widgets (passband, tune label, dx markers, dB labels) share
    // the compositor's pixel space.
    pub scale_width_px: RwSignal<f64>,
    pub spectrum_height_px: RwSignal<f64>,

    // UI
    pub paused: RwSignal<bool>,
    pub connected: RwSignal<bool>,
    pub audio_on: RwSignal<bool>,
    pub volume: RwSignal<u32>,
    pub step_khz: RwSignal<f64>,
    pub panel_collapsed: RwSignal<bool>,
    pub topbar_closed: RwSignal<bool>,

    // Pointer readout: (x within waterfall wrap, frequency under pointer)
    pub pointer_readout: RwSignal<Option<(f64, f64)>>,

    // Meters / clock
    pub smeter: RwSignal<f64>, // 0..1
    pub clock_utc: RwSignal<String>,
}

impl OverlayState {
    pub fn new() -> Self {
        Self {
            tuned_khz: RwSignal::new(14_225.0),
            center_khz: RwSignal::new(15_000.0),
            span_khz: RwSignal::new(20_000.0),
            mode: RwSignal::new(String::from("usb")),
            sp_max_db: RwSignal::new(-30.0),
            sp_min_db: RwSignal::new(-130.0),
            wf_max_db: RwSignal::new(-30.0),
            wf_min_db: RwSignal::new(-120.0),
            scale_width_px: RwSignal::new(0.0),
            spectrum_height_px: RwSignal::new(0.0),
            paused: RwSignal::new(false),
            connected: RwSignal::new(false),
            audio_on: RwSignal::new(true),
            volume: RwSignal::new(70),
            step_khz: RwSignal::new(1.0),
            panel_collapsed: RwSignal::new(false),
            topbar_closed: RwSignal::new(false),
            pointer_readout: RwSignal::new(None),
            smeter: RwSignal::new(0.35),
            clock_utc: RwSignal::new(String::from("00:00:00 UTC")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_ladder_index_snaps_to_nearest() {
        assert_eq!(span_ladder_index(20_000.0), 1);
        assert_eq!(span_ladder_index(19_000.0), 1);
        assert_eq!(span_ladder_index(120.0), 9);
        assert_eq!(span_ladder_index(1_000_000.0), 0);
    }
}
