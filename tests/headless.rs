// Runs under `wasm-pack test --node`: no window, so every browser capability
// must degrade to a no-op. Under a browser runner these checks are skipped;
// `browser.rs` covers that side.
#![cfg(target_arch = "wasm32")]

use folio_nav::{
    is_mobile_device, on_viewport_change, read_viewport, BrowserRuntime, NavConfig, Section,
    SectionNav, DEFAULT_MOBILE_BREAKPOINT,
};
use wasm_bindgen_test::*;

const CONFIG: &str = r#"{
    "sections": [
        {"id": "hero", "label": "Home"},
        {"id": "about", "label": "About"},
        {"id": "experience", "label": "Experience"},
        {"id": "contact", "label": "Contact"}
    ]
}"#;

fn has_window() -> bool {
    web_sys::window().is_some()
}

#[wasm_bindgen_test]
fn classifier_without_window() {
    if has_window() {
        return;
    }
    assert!(read_viewport().is_none());
    assert!(!is_mobile_device(DEFAULT_MOBILE_BREAKPOINT));
    let subscription = on_viewport_change(|_| {});
    assert!(!subscription.is_active());
}

#[wasm_bindgen_test]
fn runtime_mounts_detached() {
    if has_window() {
        return;
    }
    let runtime = BrowserRuntime::mount(NavConfig::with_sections(vec![
        Section::new("hero", "Home"),
        Section::new("about", "About"),
    ]))
    .unwrap();
    assert_eq!(runtime.listener_count(), 0);
    assert!(!runtime.is_observing());
    assert!(runtime.system().observed_sections().is_empty());
    runtime.unmount();
}

#[wasm_bindgen_test]
fn handle_reads_and_navigates_as_noops() {
    if has_window() {
        return;
    }
    let nav = SectionNav::new(CONFIG).unwrap();
    assert_eq!(nav.current_section().unwrap(), "hero");
    assert!(nav.is_active("hero").unwrap());
    assert_eq!(nav.input_mode().as_deref(), Some("desktop"));

    nav.navigate_to_section("contact").unwrap();
    nav.navigate_to_section("not-a-real-id").unwrap();
    assert_eq!(nav.current_section().unwrap(), "hero");
    assert!(!nav.is_scrolling().unwrap());
}

#[wasm_bindgen_test]
fn reads_after_unmount_throw() {
    let nav = SectionNav::new(CONFIG).unwrap();
    nav.unmount();
    assert!(nav.current_section().is_err());
    assert!(nav.navigate_to_section("about").is_err());
    assert_eq!(nav.intercepted_listener_count(), 0);
    nav.unmount();
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    assert!(SectionNav::new(r#"{"sections": []}"#).is_err());
    assert!(SectionNav::new("not json").is_err());
}
