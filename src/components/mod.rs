pub mod diagnostics;
pub mod overlay;
pub mod panel;
