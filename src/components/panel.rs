//! Side control panel: frequency readout/entry, stepping, mode selection,
//! zoom/pan, S-meter, audio, display scale sliders, run/pause, status.
//! Every control is an intent fed to the dispatcher; before the runtime is
//! ready the clicks are silent no-ops.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, KeyboardEvent};

use crate::modes::{Mode, ALL_MODES};
use crate::runtime;
use crate::state::OverlayState;

use super::diagnostics::DiagnosticsPanel;

/// Tuning step choices: label and size in kHz.
const STEPS: &[(&str, f64)] = &[
    ("1 Hz", 0.001),
    ("10 Hz", 0.01),
    ("100 Hz", 0.1),
    ("500 Hz", 0.5),
    ("1 kHz", 1.0),
    ("5 kHz", 5.0),
    ("10 kHz", 10.0),
    ("100 kHz", 100.0),
    ("1 MHz", 1000.0),
];

#[component]
pub fn ControlPanel() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        <div
            id="p-panel"
            class:collapsed=move || state.panel_collapsed.get()
            class:fullh=move || state.topbar_closed.get()
        >
            <div
                id="p-vis"
                on:click=move |_| state.panel_collapsed.update(|c| *c = !*c)
            >
                {move || if state.panel_collapsed.get() { "▶" } else { "◀" }}
            </div>
            <div id="p-inner">
                <FreqDisplay />
                <StepRow />

                <hr class="p-hr" />
                <div class="p-s">"Mode"</div>
                <div class="br">
                    {ALL_MODES[..4].iter().map(|&m| mode_button(state, m)).collect_view()}
                </div>
                <div class="br p-row-gap">
                    {ALL_MODES[4..].iter().map(|&m| mode_button(state, m)).collect_view()}
                </div>

                <hr class="p-hr" />
                <div class="p-s">"Zoom / Pan"</div>
                <div class="br">
                    <button class="cb" on:click=move |_| runtime::with_dispatcher(|d| d.zoom_out())>"Z −"</button>
                    <button class="cb" on:click=move |_| runtime::with_dispatcher(|d| d.zoom_in())>"Z +"</button>
                    <button class="cb" on:click=move |_| runtime::pan_by_span_fraction(-0.2)>"◀"</button>
                    <button class="cb" on:click=move |_| runtime::pan_by_span_fraction(0.2)>"▶"</button>
                    <button class="cb" on:click=move |_| runtime::with_dispatcher(|d| d.zoom_center())>"Ctr"</button>
                </div>

                <hr class="p-hr" />
                <div class="p-s">"Signal"</div>
                <SMeter />

                <hr class="p-hr" />
                <div class="p-s">"Audio"</div>
                <div class="br">
                    <button
                        class=move || if state.audio_on.get() { "wb sel" } else { "wb" }
                        on:click=move |_| runtime::with_dispatcher(|d| d.toggle_audio())
                    >
                        {move || if state.audio_on.get() { "▶ Audio" } else { "⏸ Audio" }}
                    </button>
                </div>
                <div class="p-sl p-row-gap">
                    <span class="p-sll">"Volume"</span>
                    <input
                        type="range"
                        min="0"
                        max="100"
                        prop:value=move || state.volume.get().to_string()
                        on:input=move |ev| {
                            if let Ok(v) = event_target_value(&ev).parse::<u32>() {
                                runtime::with_dispatcher(|d| d.set_volume(v));
                            }
                        }
                    />
                    <span class="p-slv">{move || state.volume.get()}</span>
                </div>

                <hr class="p-hr" />
                <div class="p-s">"Display"</div>
                <ScaleSliders />

                <div class="p-spacer"></div>

                <DiagnosticsPanel />

                <div id="p-stat">
                    <div id="p-clk">{move || state.clock_utc.get()}</div>
                    <div
                        id="p-badge"
                        class:live=move || state.connected.get()
                    >
                        {move || if state.connected.get() { "live — connected" } else { "connecting…" }}
                    </div>
                    <div class="p-credit">"Palomar SDR · WA2N / WA2ZKD"</div>
                </div>
            </div>
        </div>
    }
}

fn mode_button(state: OverlayState, mode: Mode) -> impl IntoView {
    view! {
        <button
            class=move || if state.mode.get() == mode.as_str() { "wb sel" } else { "wb" }
            on:click=move |_| runtime::with_dispatcher(|d| d.set_mode(mode))
        >
            {mode.label()}
        </button>
    }
}

/// Tuned-frequency readout that doubles as an entry field. Enter commits,
/// Escape or blur reverts; non-numeric input is discarded and the field
/// falls back to the last known-good value.
#[component]
fn FreqDisplay() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    let editing = RwSignal::new(false);
    let buffer = RwSignal::new(String::new());

    let blur_target = |ev: &KeyboardEvent| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        {
            let _ = input.blur();
        }
    };

    view! {
        <div id="p-fdisp">
            <input
                id="p-fnum"
                prop:value=move || {
                    if editing.get() {
                        buffer.get()
                    } else {
                        format!("{:.3}", state.tuned_khz.get())
                    }
                }
                on:focus=move |_| {
                    buffer.set(format!("{:.3}", state.tuned_khz.get_untracked()));
                    editing.set(true);
                }
                on:input=move |ev| buffer.set(event_target_value(&ev))
                on:keydown=move |ev: KeyboardEvent| {
                    match ev.key().as_str() {
                        "Enter" => {
                            ev.prevent_default();
                            if let Ok(khz) = buffer.get_untracked().trim().parse::<f64>() {
                                runtime::with_dispatcher(|d| d.tune(khz));
                            }
                            blur_target(&ev);
                        }
                        "Escape" => blur_target(&ev),
                        _ => {}
                    }
                }
                on:blur=move |_| editing.set(false)
            />
            <span id="p-funit">"kHz"</span>
        </div>
    }
}

#[component]
fn StepRow() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    let step_tune = move |sign: f64| {
        let step = state.step_khz.get_untracked();
        let tuned = state.tuned_khz.get_untracked();
        let target = (tuned + sign * step).max(1.0);
        runtime::with_dispatcher(|d| d.tune(target));
    };
    view! {
        <div class="br">
            <button class="cb p-stepbtn" on:click=move |_| step_tune(-1.0)>"<"</button>
            <button class="cb p-stepbtn" on:click=move |_| step_tune(1.0)>">"</button>
            <select
                class="ps"
                on:change=move |ev| {
                    if let Ok(khz) = event_target_value(&ev).parse::<f64>() {
                        state.step_khz.set(khz);
                    }
                }
            >
                {STEPS
                    .iter()
                    .map(|&(label, khz)| {
                        view! {
                            <option value=khz.to_string() selected=(khz == 1.0)>{label}</option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[component]
fn SMeter() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        <div id="p-sm">
            <div
                id="p-smf"
                style=move || format!("width:{:.0}%", (1.0 - state.smeter.get()) * 100.0)
            ></div>
        </div>
        <div class="p-sms">
            <span>"1"</span><span>"3"</span><span>"5"</span><span>"7"</span>
            <span>"9"</span><span>"+20"</span><span>"+40"</span>
        </div>
        <div id="p-smv">
            {move || {
                let level = state.smeter.get();
                let s_unit = ((level * 9.0).ceil() as i32).clamp(1, 9);
                format!("S{s_unit}  {:.0} dBm", -120.0 + level * 80.0)
            }}
        </div>
    }
}

/// Waterfall and spectrum dB bounds. Waterfall values pass through to the
/// host's color mapping; spectrum values bound our own trace.
#[component]
fn ScaleSliders() -> impl IntoView {
    let state = expect_context::<OverlayState>();

    let slider = move |label: &'static str,
                       value: RwSignal<f64>,
                       apply: fn(f64)| {
        view! {
            <div class="p-sl">
                <span class="p-sll">{label}</span>
                <input
                    type="range"
                    min="-160"
                    max="0"
                    prop:value=move || format!("{:.0}", value.get())
                    on:input=move |ev| {
                        if let Ok(db) = event_target_value(&ev).parse::<f64>() {
                            apply(db);
                        }
                    }
                />
                <span class="p-slv">{move || format!("{:.0}", value.get())}</span>
            </div>
        }
    };

    fn apply_wf_max(db: f64) {
        runtime::with_dispatcher(|d| d.set_waterfall_scale_max(db));
    }
    fn apply_wf_min(db: f64) {
        runtime::with_dispatcher(|d| d.set_waterfall_scale_min(db));
    }
    fn apply_sp_max(db: f64) {
        runtime::with_dispatcher(|d| d.set_spectrum_scale_max(db));
    }
    fn apply_sp_min(db: f64) {
        runtime::with_dispatcher(|d| d.set_spectrum_scale_min(db));
    }

    view! {
        {slider("WF max", state.wf_max_db, apply_wf_max)}
        {slider("WF min", state.wf_min_db, apply_wf_min)}
        {slider("Sp max", state.sp_max_db, apply_sp_max)}
        {slider("Sp min", state.sp_min_db, apply_sp_min)}
        <div class="br p-row-gap">
            <button
                class=move || if state.paused.get() { "cb" } else { "wb sel" }
                on:click=move |_| state.paused.update(|p| *p = !*p)
            >
                {move || if state.paused.get() { "⏸ Paused" } else { "▶ Run" }}
            </button>
        </div>
    }
}
