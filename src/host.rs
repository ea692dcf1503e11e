//! Read-only adapter over the host receiver page.
//!
//! The host exposes its state as page globals (`frequencyHz`, `centerHz`, a
//! `spectrum` object) and its controls as optional global functions. None
//! of that is guaranteed to exist, so every capability is resolved once at
//! construction — after the readiness gate — into an explicit `Option`, and
//! every per-tick value read goes through `Reflect` (the globals are
//! reassigned by the host, not mutated in place).
//!
//! The overlay never writes host state except the two display-scale pairs
//! on the spectrum object; everything else goes through the host's own
//! setters or the socket.

use js_sys::{Array, Float32Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, WebSocket, Window};

/// DOM id of the canvas the host renders both regions into.
const SOURCE_CANVAS_ID: &str = "waterfall";

// ── Pre-construction probes (used by the readiness poll) ─────────────────

/// The host's render surface, once it exists with real dimensions.
pub fn probe_source_canvas() -> Option<HtmlCanvasElement> {
    let doc = web_sys::window()?.document()?;
    let canvas = doc
        .get_element_by_id(SOURCE_CANVAS_ID)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    if canvas.width() > 0 && canvas.height() > 0 {
        Some(canvas)
    } else {
        None
    }
}

/// True once the host's data model reports a measured spectrum-region
/// height, which it only does after its own async init finishes.
pub fn probe_data_model() -> bool {
    let Some(win) = web_sys::window() else {
        return false;
    };
    let Ok(sp) = Reflect::get(&win, &JsValue::from_str("spectrum")) else {
        return false;
    };
    Reflect::get(&sp, &JsValue::from_str("spectrumHeight"))
        .ok()
        .and_then(|v| v.as_f64())
        .map(|h| h > 0.0)
        .unwrap_or(false)
}

// ── Handle ────────────────────────────────────────────────────────────────

pub struct HostHandle {
    window: Window,
    document: Document,
    source: HtmlCanvasElement,
    spectrum: Object,

    // Capabilities, each presence-checked exactly once.
    set_frequency_w: Option<Function>,
    freq_input: Option<HtmlInputElement>,
    set_mode_fn: Option<Function>,
    zoom_in_fn: Option<Function>,
    zoom_out_fn: Option<Function>,
    zoom_center_fn: Option<Function>,
    set_volume_fn: Option<Function>,
    audio_toggle_fn: Option<Function>,
    set_center_hz_fn: Option<Function>,
    mode_select: Option<HtmlSelectElement>,
}

fn global_fn(win: &Window, name: &str) -> Option<Function> {
    Reflect::get(win, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

impl HostHandle {
    /// Construct after readiness: the source canvas and spectrum object are
    /// both guaranteed present, the optional setters may or may not be.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let source = probe_source_canvas()?;
        let spectrum = Reflect::get(&window, &JsValue::from_str("spectrum"))
            .ok()?
            .dyn_into::<Object>()
            .ok()?;

        let set_center_hz_fn = Reflect::get(&spectrum, &JsValue::from_str("setCenterHz"))
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok());

        let freq_input = document
            .get_element_by_id("freq")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok());
        let mode_select = document
            .get_element_by_id("mode")
            .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok());

        Some(Self {
            set_frequency_w: global_fn(&window, "setFrequencyW"),
            set_mode_fn: global_fn(&window, "setMode"),
            zoom_in_fn: global_fn(&window, "zoomin"),
            zoom_out_fn: global_fn(&window, "zoomout"),
            zoom_center_fn: global_fn(&window, "zoomcenter"),
            set_volume_fn: global_fn(&window, "setPlayerVolume"),
            audio_toggle_fn: global_fn(&window, "audio_start_stop"),
            window,
            document,
            source,
            spectrum,
            set_center_hz_fn,
            freq_input,
            mode_select,
        })
    }

    // ── Value reads ───────────────────────────────────────────────────────

    pub fn global_f64(&self, name: &str) -> Option<f64> {
        Reflect::get(&self.window, &JsValue::from_str(name))
            .ok()?
            .as_f64()
    }

    /// Telemetry field formatted for display, whatever JS type it holds.
    pub fn global_display(&self, name: &str) -> Option<String> {
        let v = Reflect::get(&self.window, &JsValue::from_str(name)).ok()?;
        if v.is_undefined() || v.is_null() {
            return None;
        }
        v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
    }

    fn spectrum_f64(&self, field: &str) -> Option<f64> {
        Reflect::get(&self.spectrum, &JsValue::from_str(field))
            .ok()?
            .as_f64()
    }

    pub fn tuned_khz(&self) -> Option<f64> {
        self.global_f64("frequencyHz").map(|hz| hz / 1000.0)
    }

    pub fn center_khz(&self) -> Option<f64> {
        self.global_f64("centerHz").map(|hz| hz / 1000.0)
    }

    /// `spanHz` lives on the spectrum object; the page-level binding is not
    /// a global.
    pub fn span_khz(&self) -> Option<f64> {
        self.spectrum_f64("spanHz").map(|hz| hz / 1000.0)
    }

    /// Vertical split between the host's spectrum and waterfall regions.
    pub fn spectrum_region_height(&self) -> Option<f64> {
        self.spectrum_f64("spectrumHeight").filter(|h| *h > 0.0)
    }

    /// Raw per-bin power samples, when the host publishes them. Absence is
    /// a defined degraded mode, not an error.
    pub fn bins(&self) -> Option<Vec<f32>> {
        let v = Reflect::get(&self.spectrum, &JsValue::from_str("bin_copy")).ok()?;
        if let Some(arr) = v.dyn_ref::<Float32Array>() {
            let out = arr.to_vec();
            return if out.is_empty() { None } else { Some(out) };
        }
        let arr = v.dyn_ref::<Array>()?;
        let out: Vec<f32> = arr.iter().filter_map(|x| x.as_f64()).map(|x| x as f32).collect();
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    pub fn spectrum_max_db(&self) -> Option<f64> {
        self.spectrum_f64("max_db")
    }

    pub fn spectrum_min_db(&self) -> Option<f64> {
        self.spectrum_f64("min_db")
    }

    pub fn waterfall_max_db(&self) -> Option<f64> {
        self.spectrum_f64("wf_max_db")
    }

    pub fn waterfall_min_db(&self) -> Option<f64> {
        self.spectrum_f64("wf_min_db")
    }

    /// Host mode as spelled by its mode selector, lower-cased.
    pub fn mode_str(&self) -> Option<String> {
        let sel = self.mode_select.as_ref()?;
        let v = sel.value();
        if v.is_empty() {
            None
        } else {
            Some(v.to_ascii_lowercase())
        }
    }

    pub fn source(&self) -> &HtmlCanvasElement {
        &self.source
    }

    pub fn source_size(&self) -> (f64, f64) {
        (self.source.width() as f64, self.source.height() as f64)
    }

    /// Host zoom-level readout, display only.
    pub fn zoom_level_display(&self) -> Option<String> {
        let el = self.document.get_element_by_id("zoom_level")?;
        el.dyn_ref::<HtmlInputElement>().map(|i| i.value())
    }

    /// Solar/propagation text the host page maintains.
    pub fn solar_text(&self) -> Option<String> {
        let el = self.document.get_element_by_id("wwv_solar")?;
        el.text_content().filter(|t| !t.is_empty())
    }

    // ── Writes (display scale only) ──────────────────────────────────────

    pub fn write_spectrum_scale(&self, max_db: f64, min_db: f64) {
        let _ = Reflect::set(&self.spectrum, &JsValue::from_str("max_db"), &max_db.into());
        let _ = Reflect::set(&self.spectrum, &JsValue::from_str("min_db"), &min_db.into());
    }

    pub fn write_waterfall_scale(&self, max_db: f64, min_db: f64) {
        let _ = Reflect::set(&self.spectrum, &JsValue::from_str("wf_max_db"), &max_db.into());
        let _ = Reflect::set(&self.spectrum, &JsValue::from_str("wf_min_db"), &min_db.into());
    }

    // ── Setter calls (presence-guarded; false = capability absent) ───────

    /// The host tunes by reading its own `#freq` input inside
    /// `setFrequencyW`, so both must exist.
    pub fn tune(&self, freq_khz: f64) -> bool {
        let (Some(input), Some(f)) = (&self.freq_input, &self.set_frequency_w) else {
            return false;
        };
        input.set_value(&format!("{freq_khz:.3}"));
        f.call0(&JsValue::NULL).is_ok()
    }

    pub fn set_mode(&self, mode: &str) -> bool {
        self.set_mode_fn
            .as_ref()
            .map(|f| f.call1(&JsValue::NULL, &JsValue::from_str(mode)).is_ok())
            .unwrap_or(false)
    }

    pub fn set_center_hz(&self, hz: f64) -> bool {
        self.set_center_hz_fn
            .as_ref()
            .map(|f| f.call1(&self.spectrum, &hz.into()).is_ok())
            .unwrap_or(false)
    }

    pub fn zoom_in(&self) -> bool {
        call0(&self.zoom_in_fn)
    }

    pub fn zoom_out(&self) -> bool {
        call0(&self.zoom_out_fn)
    }

    pub fn zoom_center(&self) -> bool {
        call0(&self.zoom_center_fn)
    }

    pub fn set_volume(&self, fraction: f64) -> bool {
        self.set_volume_fn
            .as_ref()
            .map(|f| f.call1(&JsValue::NULL, &fraction.into()).is_ok())
            .unwrap_or(false)
    }

    pub fn toggle_audio(&self) -> bool {
        call0(&self.audio_toggle_fn)
    }

    // ── Socket ────────────────────────────────────────────────────────────

    /// Outbound-only command channel. The host's `ws` global is created
    /// late and can close at any time, so it is looked up per send.
    pub fn send_command(&self, command: &str) -> bool {
        let Ok(v) = Reflect::get(&self.window, &JsValue::from_str("ws")) else {
            return false;
        };
        let Some(ws) = v.dyn_ref::<WebSocket>() else {
            return false;
        };
        if ws.ready_state() != WebSocket::OPEN {
            return false;
        }
        ws.send_with_str(command).is_ok()
    }
}

fn call0(f: &Option<Function>) -> bool {
    f.as_ref()
        .map(|f| f.call0(&JsValue::NULL).is_ok())
        .unwrap_or(false)
}
