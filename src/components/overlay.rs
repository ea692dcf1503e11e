//! Root overlay view: top bar, the three render surfaces with their
//! passband/marker/tooltip furniture, and the side control panel. The
//! surfaces themselves are repainted imperatively by the runtime each
//! frame; everything positioned here is reactive on the tuning signals so
//! it moves with drags without waiting for the next frame.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use crate::geometry::{freq_to_pixel, pixel_to_freq};
use crate::modes::{passband_for, Mode};
use crate::runtime;
use crate::state::OverlayState;

use super::panel::ControlPanel;

/// Well-known stations marked in the strip above the frequency scale.
const DX_STATIONS: &[(f64, &str)] = &[
    (5_000.0, "WWV"),
    (10_000.0, "WWV"),
    (15_000.0, "WWV"),
    (7_074.0, "FT8"),
    (14_074.0, "FT8"),
    (21_074.0, "FT8"),
    (14_100.0, "WSPR"),
    (14_225.0, "SSB"),
    (9_975.0, "CHU"),
    (7_200.0, "AM"),
    (9_500.0, "SW"),
];

#[component]
pub fn Overlay() -> impl IntoView {
    let state = OverlayState::new();
    provide_context(state);
    runtime::start(state);

    view! {
        <div id="p-overlay">
            <TopBar />
            <div id="p-rf">
                <RfView />
            </div>
            <ControlPanel />
        </div>
    }
}

#[component]
fn TopBar() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        <div id="p-tbar" class:closed=move || state.topbar_closed.get()>
            <div class="p-tcol">
                <div id="p-title">"Palomar SDR"</div>
                <div id="p-desc">"palomar-sdr.com · 0–30 MHz · WA2N / WA2ZKD"</div>
            </div>
            <div id="p-ident">{move || state.clock_utc.get()}</div>
            <div
                id="p-tbar-arr"
                on:click=move |_| state.topbar_closed.update(|c| *c = !*c)
            >
                {move || if state.topbar_closed.get() { "▼" } else { "▲" }}
            </div>
        </div>
    }
}

#[component]
fn RfView() -> impl IntoView {
    let state = expect_context::<OverlayState>();

    // Pointer frequency readout, shared by all three surfaces. Surfaces
    // span the full width, so the x offset is valid for the tooltip
    // regardless of which one the pointer is over.
    let on_hover = move |ev: MouseEvent| {
        let Some(target) = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return;
        };
        let rect = target.get_bounding_client_rect();
        if rect.width() <= 0.0 {
            return;
        }
        let x = ev.client_x() as f64 - rect.left();
        let freq = pixel_to_freq(
            x,
            state.center_khz.get_untracked(),
            state.span_khz.get_untracked(),
            rect.width(),
        );
        state.pointer_readout.set(Some((x, freq)));
    };
    let on_leave = move |_: MouseEvent| state.pointer_readout.set(None);
    let on_press = move |ev: MouseEvent| runtime::on_canvas_press(&ev);
    let on_wheel = move |ev: web_sys::WheelEvent| runtime::on_canvas_wheel(&ev);

    view! {
        <div id="p-sp-wrap">
            <DbLabels />
            <canvas
                id="p-sp"
                on:mousedown=on_press
                on:mousemove=on_hover
                on:mouseleave=on_leave
                on:wheel=on_wheel
            />
        </div>

        <div id="p-tune-wrap">
            <TuneLabel />
            <DxBar />
            <div id="p-sc-wrap">
                <canvas
                    id="p-sc"
                    on:mousedown=on_press
                    on:mousemove=on_hover
                    on:mouseleave=on_leave
                    on:wheel=on_wheel
                />
                <PassbandIndicator />
            </div>
        </div>

        <div id="p-wf-wrap">
            <canvas
                id="p-wf"
                on:mousedown=on_press
                on:mousemove=on_hover
                on:mouseleave=on_leave
                on:wheel=on_wheel
            />
            <Tooltip />
        </div>
    }
}

/// dB labels along the left edge of the spectrum region, one per 20 dB.
#[component]
fn DbLabels() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        <div id="p-sp-db">
            {move || {
                let max = state.sp_max_db.get();
                let min = state.sp_min_db.get();
                let h = state.spectrum_height_px.get();
                let range = max - min;
                let mut labels = Vec::new();
                if h > 0.0 && range > 0.0 {
                    let mut db = (min / 20.0).ceil() * 20.0;
                    while db <= max {
                        let top = h - ((db - min) / range) * h - 6.0;
                        labels.push(view! {
                            <span style=format!("top:{top:.0}px")>{format!("{db:.0}")}</span>
                        });
                        db += 20.0;
                    }
                }
                labels
            }}
        </div>
    }
}

/// Floating tuned-frequency text above the scale bar, riding the marker.
#[component]
fn TuneLabel() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        <span
            id="p-tunelbl"
            style=move || {
                let x = freq_to_pixel(
                    state.tuned_khz.get(),
                    state.center_khz.get(),
                    state.span_khz.get(),
                    state.scale_width_px.get(),
                );
                format!("left:{x:.0}px")
            }
        >
            {move || format!("{:.3} MHz", state.tuned_khz.get() / 1000.0)}
        </span>
    }
}

#[component]
fn DxBar() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        <div id="p-dx-bar">
            {move || {
                let center = state.center_khz.get();
                let span = state.span_khz.get();
                let w = state.scale_width_px.get();
                DX_STATIONS
                    .iter()
                    .filter_map(|&(freq, label)| {
                        let x = freq_to_pixel(freq, center, span, w);
                        (x >= 2.0 && x <= w - 2.0).then(|| view! {
                            <div class="p-dxl" style=format!("left:{x:.0}px")></div>
                            <div class="p-dxt" style=format!("left:{:.0}px", x + 2.0)>{label}</div>
                        })
                    })
                    .collect_view()
            }}
        </div>
    }
}

/// Lower cut, upper cut, filled span and carrier line for the active
/// mode's passband, in the same pixel space as the scale canvas.
#[component]
fn PassbandIndicator() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        {move || {
            let w = state.scale_width_px.get();
            let tuned = state.tuned_khz.get();
            let center = state.center_khz.get();
            let span = state.span_khz.get();
            let (lo_off, hi_off) = passband_for(Mode::parse(&state.mode.get()));
            let carrier = freq_to_pixel(tuned, center, span, w).round();
            let x0 = freq_to_pixel(tuned + lo_off, center, span, w).round();
            let x1 = freq_to_pixel(tuned + hi_off, center, span, w).round();
            view! {
                <div class="p-pb-cut" style=format!("left:{:.0}px", x0 - 2.0)></div>
                <div class="p-pb-cut" style=format!("left:{:.0}px", x1 - 2.0)></div>
                <div class="p-pb-cf" style=format!("left:{x0:.0}px;width:{:.0}px", (x1 - x0).max(0.0))></div>
                <div class="p-pb-car" style=format!("left:{:.0}px", carrier - 1.0)></div>
            }
        }}
    }
}

#[component]
fn Tooltip() -> impl IntoView {
    let state = expect_context::<OverlayState>();
    view! {
        <div
            id="p-tip"
            style=move || match state.pointer_readout.get() {
                Some((x, _)) => {
                    let max_left = (state.scale_width_px.get() - 90.0).max(0.0);
                    format!("display:block;left:{:.0}px", (x + 8.0).min(max_left))
                }
                None => String::from("display:none"),
            }
        >
            {move || {
                state
                    .pointer_readout
                    .get()
                    .map(|(_, freq)| format!("{:.4} MHz", freq / 1000.0))
                    .unwrap_or_default()
            }}
        </div>
    }
}
