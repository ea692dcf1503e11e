//! Translation from overlay intents to the host's control surface.
//!
//! Every call is presence-guarded inside [`HostHandle`]; a missing setter or
//! closed socket skips silently and the outcome is visible only in the
//! console log. Local state is updated optimistically where the original UI
//! does so — the host's confirmation arrives through the synchronizer on a
//! later tick.

use std::rc::Rc;

use leptos::prelude::*;

use crate::host::HostHandle;
use crate::modes::Mode;
use crate::state::OverlayState;

#[derive(Clone)]
pub struct Dispatcher {
    host: Rc<HostHandle>,
    state: OverlayState,
}

impl Dispatcher {
    pub fn new(host: Rc<HostHandle>, state: OverlayState) -> Self {
        Self { host, state }
    }

    pub fn tune(&self, freq_khz: f64) {
        self.state.tuned_khz.set(freq_khz);
        let ok = self.host.tune(freq_khz);
        log::debug!("tune {freq_khz:.3} kHz dispatched={ok}");
    }

    pub fn set_mode(&self, mode: Mode) {
        self.state.mode.set(mode.as_str().to_string());
        let ok = self.host.set_mode(mode.as_str());
        log::debug!("mode {} dispatched={ok}", mode.as_str());
    }

    /// Center update: one textual socket command plus the data model's own
    /// center setter, attempted independently — one missing does not block
    /// the other.
    pub fn set_center(&self, center_khz: f64) {
        let sent = self.host.send_command(&format!("Z:c:{center_khz:.3}"));
        let applied = self.host.set_center_hz(center_khz * 1000.0);
        log::debug!("set_center {center_khz:.1} kHz ws={sent} setCenterHz={applied}");
    }

    pub fn zoom_in(&self) {
        let ok = self.host.zoom_in();
        log::debug!("zoom in dispatched={ok}");
    }

    pub fn zoom_out(&self) {
        let ok = self.host.zoom_out();
        log::debug!("zoom out dispatched={ok}");
    }

    pub fn zoom_center(&self) {
        let ok = self.host.zoom_center();
        log::debug!("zoom to center dispatched={ok}");
    }

    pub fn set_volume(&self, percent: u32) {
        self.state.volume.set(percent);
        self.host.set_volume(percent as f64 / 100.0);
    }

    pub fn toggle_audio(&self) {
        let on = !self.state.audio_on.get_untracked();
        self.state.audio_on.set(on);
        self.host.toggle_audio();
    }

    pub fn set_spectrum_scale(&self, max_db: f64, min_db: f64) {
        self.state.sp_max_db.set(max_db);
        self.state.sp_min_db.set(min_db);
        self.host.write_spectrum_scale(max_db, min_db);
    }

    pub fn set_waterfall_scale(&self, max_db: f64, min_db: f64) {
        self.state.wf_max_db.set(max_db);
        self.state.wf_min_db.set(min_db);
        self.host.write_waterfall_scale(max_db, min_db);
    }

    // Single-bound variants for the sliders; the untouched bound keeps its
    // current value.

    pub fn set_spectrum_scale_max(&self, max_db: f64) {
        self.set_spectrum_scale(max_db, self.state.sp_min_db.get_untracked());
    }

    pub fn set_spectrum_scale_min(&self, min_db: f64) {
        self.set_spectrum_scale(self.state.sp_max_db.get_untracked(), min_db);
    }

    pub fn set_waterfall_scale_max(&self, max_db: f64) {
        self.set_waterfall_scale(max_db, self.state.wf_min_db.get_untracked());
    }

    pub fn set_waterfall_scale_min(&self, min_db: f64) {
        self.set_waterfall_scale(self.state.wf_max_db.get_untracked(), min_db);
    }
}
