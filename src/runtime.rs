//! Overlay runtime: the readiness poll that gates startup, the per-frame
//! tick (synchronizer pull, then compositor draw — always in that order),
//! and the imperative event plumbing that can't live in the view tree
//! (window-level drag listeners, the zoom debounce timer, the clock).
//!
//! Everything runs on the one browser thread; the runtime lives in a
//! `thread_local` slot that event callbacks and the frame loop borrow in
//! turn.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

use crate::canvas::{self, freq_scale, spectrum as spectrum_draw, waterfall};
use crate::dispatch::Dispatcher;
use crate::gesture::{
    classify_wheel, DragOutcome, DragSession, WheelIntent, ZoomAccumulator, ZoomAction,
    ZoomDirection, ZOOM_DEBOUNCE_MS,
};
use crate::geometry::marker_column;
use crate::host::{self, HostHandle};
use crate::maxhold::{bins_to_columns, MaxHoldTrace};
use crate::readiness::{Readiness, ReadinessPhase};
use crate::state::OverlayState;
use crate::sync;

const POLL_INTERVAL_MS: i32 = 100;
const SMETER_FRAME_INTERVAL: u64 = 8;

pub const SPECTRUM_CANVAS_ID: &str = "p-sp";
pub const WATERFALL_CANVAS_ID: &str = "p-wf";
pub const SCALE_CANVAS_ID: &str = "p-sc";

struct ActiveDrag {
    session: DragSession,
    surface: HtmlCanvasElement,
}

struct Runtime {
    state: OverlayState,
    host: Rc<HostHandle>,
    dispatcher: Dispatcher,
    max_hold: MaxHoldTrace,
    drag: Option<ActiveDrag>,
    zoom: ZoomAccumulator,
    zoom_timer: Option<i32>,
    /// (center, span, width) of the last scale-bar draw; the bar is only
    /// redrawn when this changes.
    last_scale_key: Option<(f64, f64, u32)>,
    frame_count: u64,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = RefCell::new(None);
}

// ── Readiness poll ────────────────────────────────────────────────────────

/// Begin polling for the host. Called once at mount; drawing and event
/// side effects start only after both readiness conditions hold.
pub fn start(state: OverlayState) {
    log::info!("waiting for host surface and data model");
    poll_readiness(state, Readiness::new());
}

fn poll_readiness(state: OverlayState, mut readiness: Readiness) {
    let surface_ok = host::probe_source_canvas().is_some();
    let data_ok = host::probe_data_model();
    if readiness.advance(surface_ok, data_ok) == ReadinessPhase::Running && begin_running(state) {
        return;
    }
    let cb = Closure::once_into_js(move || poll_readiness(state, readiness));
    if let Some(win) = web_sys::window() {
        let _ = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), POLL_INTERVAL_MS);
    }
}

fn begin_running(state: OverlayState) -> bool {
    let Some(host) = HostHandle::new() else {
        return false;
    };
    let host = Rc::new(host);
    log::info!(
        "host ready, spectrum region height = {:?}, starting render loop",
        host.spectrum_region_height()
    );

    // Initial display-scale bounds from the host when present; the state's
    // defaults stand otherwise.
    if let Some(v) = host.spectrum_max_db() {
        state.sp_max_db.set(v);
    }
    if let Some(v) = host.spectrum_min_db() {
        state.sp_min_db.set(v);
    }
    if let Some(v) = host.waterfall_max_db() {
        state.wf_max_db.set(v);
    }
    if let Some(v) = host.waterfall_min_db() {
        state.wf_min_db.set(v);
    }

    let dispatcher = Dispatcher::new(Rc::clone(&host), state);
    RUNTIME.with(|rt| {
        *rt.borrow_mut() = Some(Runtime {
            state,
            host,
            dispatcher,
            max_hold: MaxHoldTrace::new(),
            drag: None,
            zoom: ZoomAccumulator::new(),
            zoom_timer: None,
            last_scale_key: None,
            frame_count: 0,
        });
    });

    attach_window_listeners();
    start_clock(state);
    schedule_frame();
    true
}

// ── Frame loop ────────────────────────────────────────────────────────────

fn schedule_frame() {
    let cb = Closure::once_into_js(|| {
        RUNTIME.with(|rt| {
            if let Some(rt) = rt.borrow_mut().as_mut() {
                rt.tick();
            }
        });
        schedule_frame();
    });
    if let Some(win) = web_sys::window() {
        let _ = win.request_animation_frame(cb.unchecked_ref());
    }
}

fn canvas_by_id(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

impl Runtime {
    fn tick(&mut self) {
        self.frame_count += 1;
        // The meter keeps sampling while display updates are paused.
        if self.frame_count % SMETER_FRAME_INTERVAL == 0 {
            self.tick_smeter();
        }
        if self.state.paused.get_untracked() {
            return;
        }
        self.resize_surfaces();
        // Pull before draw, so a frame never mixes half-updated tuning with
        // stale geometry. Suppressed while a moved drag is in flight.
        let suppressed = self
            .drag
            .as_ref()
            .map(|d| d.session.has_moved())
            .unwrap_or(false);
        if !suppressed {
            sync::pull_from_host(&self.state, &self.host);
        }
        self.composite();
    }

    /// Match each overlay canvas's backing store to its container. A size
    /// change on the spectrum surface invalidates the max-hold trace.
    fn resize_surfaces(&mut self) {
        for id in [SPECTRUM_CANVAS_ID, WATERFALL_CANVAS_ID, SCALE_CANVAS_ID] {
            let Some(canvas) = canvas_by_id(id) else {
                continue;
            };
            let Some(parent) = canvas.parent_element() else {
                continue;
            };
            let w = parent.client_width().max(0) as u32;
            let h = parent.client_height().max(0) as u32;
            if canvas.width() != w || canvas.height() != h {
                canvas.set_width(w);
                canvas.set_height(h);
                if id == SPECTRUM_CANVAS_ID {
                    self.max_hold = MaxHoldTrace::new();
                }
            }
            // Mirror measured geometry into signals for the reactive
            // widgets (passband, labels, dx markers).
            if id == SCALE_CANVAS_ID && self.state.scale_width_px.get_untracked() != w as f64 {
                self.state.scale_width_px.set(w as f64);
            }
            if id == SPECTRUM_CANVAS_ID && self.state.spectrum_height_px.get_untracked() != h as f64
            {
                self.state.spectrum_height_px.set(h as f64);
            }
        }
    }

    fn composite(&mut self) {
        let tuned = self.state.tuned_khz.get_untracked();
        let center = self.state.center_khz.get_untracked();
        let span = self.state.span_khz.get_untracked();
        if span <= 0.0 {
            return;
        }

        // Waterfall: restyled copy of the host's lower region.
        if let Some(wf) = canvas_by_id(WATERFALL_CANVAS_ID) {
            if let (Some(ctx), Some(split)) =
                (canvas::get_canvas_ctx(&wf), self.host.spectrum_region_height())
            {
                let (w, h) = (wf.width() as f64, wf.height() as f64);
                let marker = marker_column(tuned, center, span, w);
                waterfall::copy_waterfall_region(&ctx, w, h, self.host.source(), split, marker);
            }
        }

        // Spectrum: independent trace from raw bins.
        if let Some(sp) = canvas_by_id(SPECTRUM_CANVAS_ID) {
            if let Some(ctx) = canvas::get_canvas_ctx(&sp) {
                let (w, h) = (sp.width() as f64, sp.height() as f64);
                if w > 0.0 && h > 0.0 {
                    let max_db = self.state.sp_max_db.get_untracked();
                    let min_db = self.state.sp_min_db.get_untracked();
                    self.max_hold.ensure_width(w as usize, min_db as f32);
                    let columns = self
                        .host
                        .bins()
                        .map(|bins| bins_to_columns(&bins, w as usize));
                    if let Some(cols) = &columns {
                        self.max_hold.update(cols);
                    }
                    let marker = marker_column(tuned, center, span, w);
                    spectrum_draw::draw_spectrum(
                        &ctx,
                        w,
                        h,
                        columns.as_deref(),
                        self.max_hold.values(),
                        max_db,
                        min_db,
                        marker,
                    );
                }
            }
        }

        // Scale bar: only when center/span/width actually changed.
        if let Some(sc) = canvas_by_id(SCALE_CANVAS_ID) {
            let key = (center, span, sc.width());
            if self.last_scale_key != Some(key) {
                if let Some(ctx) = canvas::get_canvas_ctx(&sc) {
                    freq_scale::draw_scale(&ctx, sc.width() as f64, sc.height() as f64, center, span);
                    self.last_scale_key = Some(key);
                }
            }
        }
    }

    fn tick_smeter(&self) {
        let current = self.state.smeter.get_untracked();
        let level = match self.host.global_f64("power").filter(|p| p.is_finite()) {
            // Host baseband power is already dBm; map −120…−40 → 0…1.
            Some(dbm) => ((dbm + 120.0) / 80.0).clamp(0.0, 1.0),
            // No power readout: gentle random walk so the meter looks alive.
            None => (current + (js_sys::Math::random() - 0.5) * 0.05).clamp(0.02, 0.97),
        };
        self.state.smeter.set(level);
    }

    // ── zoom debounce ────────────────────────────────────────────────────

    fn arm_zoom_timer(&mut self) {
        let cb = Closure::once_into_js(|| {
            RUNTIME.with(|rt| {
                if let Some(rt) = rt.borrow_mut().as_mut() {
                    rt.zoom_timer = None;
                    if let Some(dir) = rt.zoom.settle() {
                        rt.dispatch_zoom(dir);
                    }
                }
            });
        });
        if let Some(win) = web_sys::window() {
            if let Ok(id) = win
                .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ZOOM_DEBOUNCE_MS)
            {
                self.zoom_timer = Some(id);
            }
        }
    }

    /// Cleared whenever an immediate zoom fires, so a stale deferred
    /// dispatch can't follow it.
    fn clear_zoom_timer(&mut self) {
        if let Some(id) = self.zoom_timer.take() {
            if let Some(win) = web_sys::window() {
                win.clear_timeout_with_handle(id);
            }
        }
    }

    fn dispatch_zoom(&self, dir: ZoomDirection) {
        match dir {
            ZoomDirection::In => self.dispatcher.zoom_in(),
            ZoomDirection::Out => self.dispatcher.zoom_out(),
        }
    }
}

// ── Pointer/wheel entry points (wired from the view tree) ────────────────

fn event_canvas(ev: &MouseEvent) -> Option<HtmlCanvasElement> {
    ev.current_target()?.dyn_into::<HtmlCanvasElement>().ok()
}

pub fn on_canvas_press(ev: &MouseEvent) {
    if ev.button() != 0 {
        return;
    }
    let Some(surface) = event_canvas(ev) else {
        return;
    };
    RUNTIME.with(|rt| {
        if let Some(rt) = rt.borrow_mut().as_mut() {
            let _ = web_sys::HtmlElement::style(&surface).set_property("cursor", "grabbing");
            rt.drag = Some(ActiveDrag {
                session: DragSession::begin(
                    ev.client_x() as f64,
                    rt.state.center_khz.get_untracked(),
                    js_sys::Date::now(),
                ),
                surface,
            });
        }
    });
}

pub fn on_canvas_wheel(ev: &WheelEvent) {
    ev.prevent_default();
    let Some(surface) = event_canvas(ev) else {
        return;
    };
    RUNTIME.with(|rt| {
        if let Some(rt) = rt.borrow_mut().as_mut() {
            let rect = surface.get_bounding_client_rect();
            let span = rt.state.span_khz.get_untracked();
            let line_mode = ev.delta_mode() == WheelEvent::DOM_DELTA_LINE;
            match classify_wheel(
                ev.delta_x(),
                ev.delta_y(),
                line_mode,
                ev.ctrl_key(),
                rect.width(),
                span,
            ) {
                WheelIntent::Pan { delta_center_khz } => {
                    let center = rt.state.center_khz.get_untracked() + delta_center_khz;
                    rt.state.center_khz.set(center);
                    log::debug!("wheel pan to {center:.1} kHz");
                    rt.dispatcher.set_center(center);
                }
                WheelIntent::Zoom { delta } => match rt.zoom.feed(delta) {
                    ZoomAction::Immediate(dir) => {
                        rt.clear_zoom_timer();
                        rt.dispatch_zoom(dir);
                    }
                    ZoomAction::ArmTimer => rt.arm_zoom_timer(),
                    ZoomAction::Pending => {}
                },
            }
        }
    });
}

/// Attached at window level so a drag survives the pointer leaving the
/// canvas.
fn attach_window_listeners() {
    let Some(win) = web_sys::window() else {
        return;
    };
    let mv = Closure::<dyn FnMut(MouseEvent)>::new(on_window_mousemove);
    let _ = win.add_event_listener_with_callback("mousemove", mv.as_ref().unchecked_ref());
    mv.forget();
    let up = Closure::<dyn FnMut(MouseEvent)>::new(on_window_mouseup);
    let _ = win.add_event_listener_with_callback("mouseup", up.as_ref().unchecked_ref());
    up.forget();
}

fn on_window_mousemove(ev: MouseEvent) {
    RUNTIME.with(|rt| {
        if let Some(rt) = rt.borrow_mut().as_mut() {
            let Some(drag) = rt.drag.as_mut() else {
                return;
            };
            let rect = drag.surface.get_bounding_client_rect();
            let span = rt.state.span_khz.get_untracked();
            let was_moved = drag.session.has_moved();
            if let Some(mv) =
                drag.session
                    .motion(ev.client_x() as f64, rect.width(), span, js_sys::Date::now())
            {
                if !was_moved {
                    log::debug!("drag started");
                }
                rt.state.center_khz.set(mv.center_khz);
                if mv.send {
                    rt.dispatcher.set_center(mv.center_khz);
                }
            }
        }
    });
}

fn on_window_mouseup(ev: MouseEvent) {
    if ev.button() != 0 {
        return;
    }
    RUNTIME.with(|rt| {
        if let Some(rt) = rt.borrow_mut().as_mut() {
            let Some(drag) = rt.drag.take() else {
                return;
            };
            let _ = web_sys::HtmlElement::style(&drag.surface).set_property("cursor", "crosshair");
            let rect = drag.surface.get_bounding_client_rect();
            let span = rt.state.span_khz.get_untracked();
            match drag
                .session
                .release(ev.client_x() as f64, rect.left(), rect.width(), span)
            {
                DragOutcome::Tune { freq_khz } => {
                    log::debug!("click-tune {:.4} MHz", freq_khz / 1000.0);
                    rt.dispatcher.tune(freq_khz);
                }
                DragOutcome::Pan { center_khz } => {
                    log::debug!("drag end, final center {center_khz:.1} kHz");
                    rt.state.center_khz.set(center_khz);
                    rt.dispatcher.set_center(center_khz);
                }
            }
        }
    });
}

// ── Panel hooks ───────────────────────────────────────────────────────────

/// Run an intent against the dispatcher once the runtime exists; silently a
/// no-op before readiness (the controls are visible but the host isn't).
pub fn with_dispatcher(f: impl FnOnce(&Dispatcher)) {
    RUNTIME.with(|rt| {
        if let Some(rt) = rt.borrow().as_ref() {
            f(&rt.dispatcher);
        }
    });
}

/// Pan by a signed fraction of the current span (panel ◀/▶ buttons).
pub fn pan_by_span_fraction(fraction: f64) {
    RUNTIME.with(|rt| {
        if let Some(rt) = rt.borrow().as_ref() {
            let center = rt.state.center_khz.get_untracked()
                + rt.state.span_khz.get_untracked() * fraction;
            rt.state.center_khz.set(center);
            rt.dispatcher.set_center(center);
        }
    });
}

/// Telemetry rows for the diagnostics panel; every field individually
/// optional.
pub fn diagnostics_rows() -> Vec<(String, String)> {
    RUNTIME.with(|rt| {
        let borrowed = rt.borrow();
        let Some(rt) = borrowed.as_ref() else {
            return Vec::new();
        };
        let h = &rt.host;
        let f1 = |v: Option<f64>, unit: &str| {
            v.map(|x| format!("{x:.1}{unit}")).unwrap_or_else(dash)
        };
        let (lo, hi) = crate::geometry::visible_range_khz(
            rt.state.center_khz.get_untracked(),
            rt.state.span_khz.get_untracked(),
        );
        vec![
            (
                "Tune".into(),
                h.global_f64("frequencyHz")
                    .map(|hz| format!("{:.6} MHz", hz / 1e6))
                    .unwrap_or_else(dash),
            ),
            ("RF Gain".into(), f1(h.global_f64("rf_gain"), " dB")),
            ("RF Atten".into(), f1(h.global_f64("rf_atten"), " dB")),
            (
                "RF AGC".into(),
                h.global_f64("rf_agc")
                    .map(|v| if v == 1.0 { "enabled".into() } else { "disabled".into() })
                    .unwrap_or_else(dash),
            ),
            ("A/D".into(), f1(h.global_f64("if_power"), " dBFS")),
            ("SSRC".into(), h.global_display("ssrc").unwrap_or_else(dash)),
            (
                "Bins".into(),
                h.global_f64("binCount")
                    .map(|v| format!("{v:.0}"))
                    .unwrap_or_else(dash),
            ),
            (
                "Bin width".into(),
                h.global_f64("binWidthHz")
                    .map(|v| format!("{v:.0} Hz"))
                    .unwrap_or_else(dash),
            ),
            (
                "Overranges".into(),
                h.global_f64("ad_over")
                    .map(|v| format!("{v:.0}"))
                    .unwrap_or_else(dash),
            ),
            (
                "N₀".into(),
                f1(h.global_f64("noise_density_audio"), " dBm/Hz"),
            ),
            (
                "Zoom".into(),
                h.zoom_level_display().unwrap_or_else(|| {
                    format!(
                        "~{}",
                        crate::state::span_ladder_index(rt.state.span_khz.get_untracked())
                    )
                }),
            ),
            (
                "Span".into(),
                format!("{:.3}–{:.3} MHz", lo / 1000.0, hi / 1000.0),
            ),
            (
                "Split".into(),
                h.spectrum_region_height()
                    .map(|v| format!("{v:.0} px"))
                    .unwrap_or_else(dash),
            ),
            ("Source".into(), {
                let (w, hgt) = h.source_size();
                format!("{w:.0}×{hgt:.0}")
            }),
        ]
    })
}

pub fn solar_text() -> Option<String> {
    RUNTIME.with(|rt| rt.borrow().as_ref().and_then(|rt| rt.host.solar_text()))
}

fn dash() -> String {
    "—".into()
}

// ── Clock ─────────────────────────────────────────────────────────────────

fn start_clock(state: OverlayState) {
    update_clock(&state);
    let cb = Closure::<dyn FnMut()>::new(move || update_clock(&state));
    if let Some(win) = web_sys::window() {
        let _ = win
            .set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 1000);
    }
    cb.forget();
}

fn update_clock(state: &OverlayState) {
    let now = js_sys::Date::new_0();
    state.clock_utc.set(format!(
        "{:02}:{:02}:{:02} UTC",
        now.get_utc_hours(),
        now.get_utc_minutes(),
        now.get_utc_seconds()
    ));
}
