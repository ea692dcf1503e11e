//! Per-tick one-way pull of tuning state from the host into the overlay.
//!
//! Externally-triggered tuning (another control on the host page, a server
//! push) becomes visible here without any extra channel: the host's live
//! values are compared against local state each tick and adopted when they
//! differ beyond a small tolerance. The runtime skips the pull entirely
//! while a drag with movement is active, so late host confirmations never
//! fight the user's pan.

use leptos::prelude::*;

use crate::host::HostHandle;
use crate::state::OverlayState;

/// Differences below this are treated as the same value, so the host
/// echoing back a rounded frequency doesn't cause churn.
pub const SYNC_TOLERANCE_KHZ: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuningSnapshot {
    pub tuned_khz: f64,
    pub center_khz: f64,
    pub span_khz: f64,
}

/// True when any component differs beyond [`SYNC_TOLERANCE_KHZ`].
pub fn out_of_tolerance(local: TuningSnapshot, host: TuningSnapshot) -> bool {
    (local.tuned_khz - host.tuned_khz).abs() > SYNC_TOLERANCE_KHZ
        || (local.center_khz - host.center_khz).abs() > SYNC_TOLERANCE_KHZ
        || (local.span_khz - host.span_khz).abs() > SYNC_TOLERANCE_KHZ
}

/// Pull tuned/center/span and the active mode from the host. Returns true
/// when tuning changed (callers rebuild derived geometry). Also flips the
/// connection badge the first time the host data model shows up.
pub fn pull_from_host(state: &OverlayState, host: &HostHandle) -> bool {
    let Some(tuned) = host.tuned_khz() else {
        return false;
    };
    if !state.connected.get_untracked() {
        state.connected.set(true);
    }

    // Mode mirror: host mode selector → local highlight.
    if let Some(mode) = host.mode_str() {
        if state.mode.get_untracked() != mode {
            state.mode.set(mode);
        }
    }

    let host_snap = TuningSnapshot {
        tuned_khz: tuned,
        center_khz: host.center_khz().unwrap_or(0.0),
        span_khz: host.span_khz().unwrap_or(0.0),
    };
    let local = TuningSnapshot {
        tuned_khz: state.tuned_khz.get_untracked(),
        center_khz: state.center_khz.get_untracked(),
        span_khz: state.span_khz.get_untracked(),
    };
    if !out_of_tolerance(local, host_snap) {
        return false;
    }
    state.tuned_khz.set(host_snap.tuned_khz);
    state.center_khz.set(host_snap.center_khz);
    state.span_khz.set(host_snap.span_khz);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(t: f64, c: f64, s: f64) -> TuningSnapshot {
        TuningSnapshot {
            tuned_khz: t,
            center_khz: c,
            span_khz: s,
        }
    }

    #[test]
    fn test_within_tolerance_is_not_a_change() {
        let local = snap(14_225.0, 15_000.0, 20_000.0);
        assert!(!out_of_tolerance(local, snap(14_225.4, 15_000.3, 20_000.0)));
    }

    #[test]
    fn test_any_component_beyond_tolerance_triggers_adoption() {
        let local = snap(14_225.0, 15_000.0, 20_000.0);
        assert!(out_of_tolerance(local, snap(14_226.0, 15_000.0, 20_000.0)));
        assert!(out_of_tolerance(local, snap(14_225.0, 15_001.0, 20_000.0)));
        assert!(out_of_tolerance(local, snap(14_225.0, 15_000.0, 10_000.0)));
    }
}
