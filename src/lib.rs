//! Full-viewport replacement UI for the Palomar SDR web receiver.
//!
//! The module mounts over the host page, hides the stock chrome, and
//! re-renders the receiver's spectrum and waterfall through its own canvases
//! while driving tuning, mode and zoom through whatever control surface the
//! host exposes. Nothing here assumes a particular host build: every global
//! is probed before use and absent pieces degrade to read-only display.

pub mod canvas;
pub mod components;
pub mod dispatch;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod maxhold;
pub mod modes;
pub mod readiness;
pub mod runtime;
pub mod state;
pub mod sync;

use wasm_bindgen::prelude::*;

/// Suppress the host page's own UI. Children of `<body>` are faded with
/// opacity rather than removed or display:none'd: the host's scripts keep
/// running, and the source waterfall canvas keeps painting in place so the
/// compositor can copy from it. Hiding it any other way makes drawImage()
/// read black pixels.
const HIDE_HOST_CSS: &str = "
html, body { overflow: hidden !important; }
body > *:not(#p-overlay) { opacity: 0 !important; pointer-events: none !important; }
canvas#waterfall { opacity: 0 !important; pointer-events: none !important; }
canvas#p-sp, canvas#p-wf, canvas#p-sc {
  opacity: 1 !important;
  position: static !important;
  visibility: visible !important;
  pointer-events: all !important;
}
";

fn inject_css(css: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let style = document.create_element("style")?;
    style.set_text_content(Some(css));
    document
        .head()
        .ok_or_else(|| JsValue::from_str("no head"))?
        .append_child(&style)?;
    Ok(())
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("overlay loading");

    inject_css(HIDE_HOST_CSS)?;
    inject_css(include_str!("overlay.css"))?;

    leptos::mount::mount_to_body(components::overlay::Overlay);
    Ok(())
}
