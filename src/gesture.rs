//! Pointer and wheel gesture disambiguation.
//!
//! One pointer stream has to serve three intents: click-to-tune, press-drag
//! to pan, and wheel/pinch zoom. The drag side is a small state machine
//! (idle → pressed → dragging) with a movement threshold so click jitter
//! never turns a tune into a pan. The wheel side classifies each event as
//! horizontal pan or zoom and feeds zoom deltas through an accumulator that
//! handles both notched mouse wheels (large deltas, immediate step) and
//! trackpad pinch/scroll (many small deltas, debounced).
//!
//! All timing is injected (`now_ms`) so every policy here is testable
//! without a browser clock.

use crate::geometry::pixel_to_freq;

/// Cumulative displacement before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Minimum interval between outbound center updates during a drag.
pub const PAN_SEND_INTERVAL_MS: f64 = 50.0;

/// Accumulated wheel delta that triggers an immediate zoom step.
pub const ZOOM_IMMEDIATE_THRESHOLD: f64 = 40.0;

/// Settled accumulator magnitude below which a deferred zoom is dropped.
pub const ZOOM_SETTLE_THRESHOLD: f64 = 5.0;

/// Debounce window for small-delta (trackpad) zoom input.
pub const ZOOM_DEBOUNCE_MS: i32 = 120;

/// Line-mode wheel deltas are scaled to match pixel-mode magnitude.
pub const LINE_DELTA_PX: f64 = 30.0;

// ── Press/drag state machine ──────────────────────────────────────────────

/// Live between a primary-button press and the matching release.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    start_x: f64,
    start_center_khz: f64,
    has_moved: bool,
    last_send_ms: f64,
}

/// Result of a pointer move while pressed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragMove {
    /// New center frequency; the caller redraws derived geometry on every
    /// move regardless of `send`.
    pub center_khz: f64,
    /// Whether the 50 ms send throttle allows a dispatch right now.
    pub send: bool,
}

/// Result of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutcome {
    /// Released without crossing the movement threshold: tune to the
    /// frequency under the release point.
    Tune { freq_khz: f64 },
    /// Released after panning: issue one final unthrottled center update.
    Pan { center_khz: f64 },
}

impl DragSession {
    pub fn begin(start_x: f64, center_khz: f64, now_ms: f64) -> Self {
        Self {
            start_x,
            start_center_khz: center_khz,
            has_moved: false,
            // Allow the first throttled send as soon as the drag starts.
            last_send_ms: now_ms - PAN_SEND_INTERVAL_MS,
        }
    }

    /// While true, the state synchronizer's host pull is suppressed so late
    /// host confirmations don't fight the drag.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Pointer moved to `x`. Returns `None` until the movement threshold is
    /// crossed; afterwards returns the recomputed center and whether the
    /// throttle permits sending it. Timestamp-gated rather than timer-gated:
    /// the release path always sends the final value even if the cadence
    /// was missed.
    pub fn motion(&mut self, x: f64, surface_width: f64, span_khz: f64, now_ms: f64) -> Option<DragMove> {
        let dx = x - self.start_x;
        if !self.has_moved && dx.abs() > DRAG_THRESHOLD_PX {
            self.has_moved = true;
        }
        if !self.has_moved || surface_width <= 0.0 {
            return None;
        }
        let center_khz = self.start_center_khz - (dx / surface_width) * span_khz;
        let send = now_ms - self.last_send_ms >= PAN_SEND_INTERVAL_MS;
        if send {
            self.last_send_ms = now_ms;
        }
        Some(DragMove { center_khz, send })
    }

    /// Primary-button release at client coordinate `x`. `surface_left` is
    /// the surface's left edge in the same coordinate space (pan only needs
    /// the displacement, but a click tune maps the absolute position).
    pub fn release(self, x: f64, surface_left: f64, surface_width: f64, span_khz: f64) -> DragOutcome {
        if self.has_moved {
            let dx = x - self.start_x;
            DragOutcome::Pan {
                center_khz: self.start_center_khz - (dx / surface_width) * span_khz,
            }
        } else {
            DragOutcome::Tune {
                freq_khz: pixel_to_freq(
                    x - surface_left,
                    self.start_center_khz,
                    span_khz,
                    surface_width,
                ),
            }
        }
    }
}

// ── Wheel classification ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WheelIntent {
    /// Horizontal two-finger scroll: shift the center by this many kHz and
    /// dispatch immediately (discrete wheel pan events are already coarse).
    Pan { delta_center_khz: f64 },
    /// Vertical scroll or pinch: feed this normalized delta to the
    /// [`ZoomAccumulator`].
    Zoom { delta: f64 },
}

/// Classify one wheel event. `line_mode` is true when the event reports
/// line-based deltas (classic mouse wheels on some platforms); `ctrl` is the
/// browser's pinch encoding and always means zoom.
pub fn classify_wheel(
    delta_x: f64,
    delta_y: f64,
    line_mode: bool,
    ctrl: bool,
    surface_width: f64,
    span_khz: f64,
) -> WheelIntent {
    if !ctrl && delta_x.abs() > delta_y.abs() * 0.5 && delta_x.abs() > 2.0 {
        return WheelIntent::Pan {
            delta_center_khz: (delta_x / surface_width) * span_khz * 0.5,
        };
    }
    let dy = if line_mode { delta_y * LINE_DELTA_PX } else { delta_y };
    WheelIntent::Zoom { delta: dy }
}

// ── Zoom accumulation ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// What the caller must do after feeding a zoom delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomAction {
    /// Dispatch one zoom step now and clear any pending debounce timer.
    Immediate(ZoomDirection),
    /// Start the debounce timer; [`ZoomAccumulator::settle`] decides later.
    ArmTimer,
    /// A timer is already pending; nothing to do.
    Pending,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ZoomAccumulator {
    accum: f64,
    timer_armed: bool,
}

impl ZoomAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one normalized vertical delta. Positive deltas (scroll
    /// down / pinch in) zoom out.
    pub fn feed(&mut self, delta: f64) -> ZoomAction {
        self.accum += delta;
        if self.accum.abs() >= ZOOM_IMMEDIATE_THRESHOLD {
            let dir = if self.accum > 0.0 {
                ZoomDirection::Out
            } else {
                ZoomDirection::In
            };
            self.accum = 0.0;
            self.timer_armed = false;
            return ZoomAction::Immediate(dir);
        }
        if self.timer_armed {
            ZoomAction::Pending
        } else {
            self.timer_armed = true;
            ZoomAction::ArmTimer
        }
    }

    /// Debounce timer fired. Always resets the accumulator; yields a step
    /// only when the settled magnitude exceeds the noise floor.
    pub fn settle(&mut self) -> Option<ZoomDirection> {
        self.timer_armed = false;
        let a = self.accum;
        self.accum = 0.0;
        if a > ZOOM_SETTLE_THRESHOLD {
            Some(ZoomDirection::Out)
        } else if a < -ZOOM_SETTLE_THRESHOLD {
            Some(ZoomDirection::In)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── drag ──

    #[test]
    fn test_small_jitter_release_is_a_tune() {
        let mut d = DragSession::begin(500.0, 15_000.0, 0.0);
        assert_eq!(d.motion(502.0, 1000.0, 20_000.0, 10.0), None);
        assert!(!d.has_moved());
        match d.release(500.0, 0.0, 1000.0, 20_000.0) {
            DragOutcome::Tune { freq_khz } => assert!((freq_khz - 15_000.0).abs() < 1e-9),
            other => panic!("expected tune, got {other:?}"),
        }
    }

    #[test]
    fn test_drag_recomputes_center_from_start() {
        let mut d = DragSession::begin(500.0, 15_000.0, 0.0);
        let m = d.motion(600.0, 1000.0, 20_000.0, 100.0).unwrap();
        // 100 px right over a 1000 px / 20 MHz surface = -2 MHz
        assert!((m.center_khz - 13_000.0).abs() < 1e-9);
        assert!(d.has_moved());
    }

    #[test]
    fn test_send_throttle_is_timestamp_gated() {
        let mut d = DragSession::begin(0.0, 15_000.0, 1000.0);
        assert!(d.motion(10.0, 1000.0, 20_000.0, 1000.0).unwrap().send);
        // Within 50 ms: center still updates, send suppressed.
        assert!(!d.motion(20.0, 1000.0, 20_000.0, 1030.0).unwrap().send);
        assert!(!d.motion(30.0, 1000.0, 20_000.0, 1049.0).unwrap().send);
        // Gate reopens at exactly 50 ms from the last send.
        assert!(d.motion(40.0, 1000.0, 20_000.0, 1050.0).unwrap().send);
    }

    #[test]
    fn test_release_after_drag_sends_final_center() {
        let mut d = DragSession::begin(500.0, 15_000.0, 0.0);
        d.motion(550.0, 1000.0, 20_000.0, 10.0);
        match d.release(550.0, 0.0, 1000.0, 20_000.0) {
            DragOutcome::Pan { center_khz } => assert!((center_khz - 14_000.0).abs() < 1e-9),
            other => panic!("expected pan, got {other:?}"),
        }
    }

    // ── wheel classification ──

    #[test]
    fn test_dominant_horizontal_delta_is_a_pan() {
        let intent = classify_wheel(10.0, 3.0, false, false, 1000.0, 20_000.0);
        match intent {
            WheelIntent::Pan { delta_center_khz } => {
                assert!((delta_center_khz - 100.0).abs() < 1e-9)
            }
            other => panic!("expected pan, got {other:?}"),
        }
    }

    #[test]
    fn test_horizontal_noise_floor() {
        // |dx| <= 2 is noise even when it dominates dy.
        assert_eq!(
            classify_wheel(1.5, 0.0, false, false, 1000.0, 20_000.0),
            WheelIntent::Zoom { delta: 0.0 }
        );
    }

    #[test]
    fn test_ctrl_wheel_is_always_zoom() {
        assert_eq!(
            classify_wheel(50.0, 4.0, false, true, 1000.0, 20_000.0),
            WheelIntent::Zoom { delta: 4.0 }
        );
    }

    #[test]
    fn test_line_mode_deltas_scaled() {
        assert_eq!(
            classify_wheel(0.0, -3.0, true, false, 1000.0, 20_000.0),
            WheelIntent::Zoom { delta: -90.0 }
        );
    }

    // ── zoom accumulator ──

    #[test]
    fn test_small_deltas_reaching_threshold_fire_immediately() {
        let mut z = ZoomAccumulator::new();
        assert_eq!(z.feed(15.0), ZoomAction::ArmTimer);
        assert_eq!(z.feed(15.0), ZoomAction::Pending);
        assert_eq!(z.feed(15.0), ZoomAction::Immediate(ZoomDirection::Out));
        // Accumulator reset: next small delta starts over.
        assert_eq!(z.feed(-10.0), ZoomAction::ArmTimer);
    }

    #[test]
    fn test_single_notch_fires_immediately() {
        let mut z = ZoomAccumulator::new();
        assert_eq!(z.feed(-53.0), ZoomAction::Immediate(ZoomDirection::In));
    }

    #[test]
    fn test_settle_below_noise_floor_drops_the_gesture() {
        let mut z = ZoomAccumulator::new();
        assert_eq!(z.feed(2.0), ZoomAction::ArmTimer);
        z.feed(1.0);
        assert_eq!(z.settle(), None);
        // Reset after settling regardless of outcome.
        assert_eq!(z.feed(1.0), ZoomAction::ArmTimer);
    }

    #[test]
    fn test_settle_above_noise_floor_zooms() {
        let mut z = ZoomAccumulator::new();
        z.feed(-4.0);
        z.feed(-4.0);
        assert_eq!(z.settle(), Some(ZoomDirection::In));
        z.feed(6.0);
        assert_eq!(z.settle(), Some(ZoomDirection::Out));
    }
}
