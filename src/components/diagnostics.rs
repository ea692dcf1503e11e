//! Collapsible receiver-telemetry readout at the bottom of the panel.
//! Rows come from the runtime's host probe; they refresh on a slow timer
//! and only while the section is open.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::runtime;

const REFRESH_INTERVAL_MS: i32 = 2000;

#[component]
pub fn DiagnosticsPanel() -> impl IntoView {
    let open = RwSignal::new(false);
    let rows = RwSignal::new(Vec::<(String, String)>::new());
    let solar = RwSignal::new(Option::<String>::None);
    let timer = StoredValue::new(Option::<i32>::None);

    let refresh = move || {
        rows.set(runtime::diagnostics_rows());
        solar.set(runtime::solar_text());
    };

    let toggle = move |_| {
        let now_open = !open.get_untracked();
        open.set(now_open);
        if now_open {
            refresh();
            let cb = Closure::<dyn FnMut()>::new(refresh);
            if let Some(win) = web_sys::window() {
                if let Ok(id) = win.set_interval_with_callback_and_timeout_and_arguments_0(
                    cb.as_ref().unchecked_ref(),
                    REFRESH_INTERVAL_MS,
                ) {
                    timer.set_value(Some(id));
                }
            }
            cb.forget();
        } else if let Some(id) = timer.get_value() {
            timer.set_value(None);
            if let Some(win) = web_sys::window() {
                win.clear_interval_with_handle(id);
            }
        }
    };

    view! {
        <div id="p-dg">
            <div id="p-dg-head" on:click=toggle>
                {move || if open.get() { "▾ Diagnostics" } else { "▸ Diagnostics" }}
            </div>
            <div id="p-dg-body" style:display=move || if open.get() { "block" } else { "none" }>
                <table id="p-dg-tbl">
                    <tbody>
                        {move || {
                            rows.get()
                                .into_iter()
                                .map(|(k, v)| {
                                    view! {
                                        <tr>
                                            <td class="p-dg-k">{k}</td>
                                            <td class="p-dg-v">{v}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
                {move || {
                    solar
                        .get()
                        .map(|text| view! { <div id="p-dg-solar">{text}</div> })
                }}
            </div>
        </div>
    }
}
