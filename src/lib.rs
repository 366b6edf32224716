// folio_nav: section navigation and scroll orchestration for a single-page portfolio.
// The state machine is plain Rust driven through `ScrollHost`; `dom` binds it to the window.

mod animator;
mod dom;
mod error;
mod host;
mod navigator;
mod platform;
mod store;
mod system;
mod types;
mod visibility;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub use animator::{ease_in_out_cubic, FrameStep, ScrollAnimation, ScrollAnimator, ScrollOptions};
pub use dom::{BrowserRuntime, WindowHost};
pub use error::NavError;
pub use host::{DetachedHost, ScrollHost};
pub use navigator::{
    FocusTarget, InputDisposition, InterceptedEvent, InterceptionSet, NavKey, NavOutcome,
    NavPhase, NavigatorSettings, SectionNavigator,
};
pub use platform::{
    is_mobile_device, on_viewport_change, read_viewport, Subscription, ViewportSnapshot,
};
pub use store::{NavStore, NavigationState, StoreProvider};
pub use system::NavigationSystem;
pub use types::*;
pub use visibility::{
    most_visible, IntersectionSample, VisibilityOptions, VisibilityTracker, RATIO_TIE_BAND,
};

/// Initialize panic hook and console tracing.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
}

fn js_error(err: NavError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Navigation handle exposed to JavaScript.
/// Reads after `unmount` throw: the store is no longer provided.
#[wasm_bindgen]
pub struct SectionNav {
    provider: StoreProvider,
    runtime: RefCell<Option<Rc<BrowserRuntime>>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

#[wasm_bindgen]
impl SectionNav {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<SectionNav, JsValue> {
        let config = NavConfig::from_json(config_json).map_err(js_error)?;
        let runtime = BrowserRuntime::mount(config).map_err(js_error)?;
        let provider = StoreProvider::new();
        provider.provide(runtime.system().store());

        Ok(SectionNav {
            provider,
            runtime: RefCell::new(Some(runtime)),
            subscriptions: RefCell::new(Vec::new()),
        })
    }

    /// Fire-and-forget; unknown, unmounted, throttled or busy targets do nothing.
    pub fn navigate_to_section(&self, id: &str) -> Result<(), JsValue> {
        self.provider
            .store()
            .and_then(|store| store.navigate_to_section(&SectionId::new(id)))
            .map_err(js_error)
    }

    pub fn current_section(&self) -> Result<String, JsValue> {
        let store = self.provider.store().map_err(js_error)?;
        Ok(store.current_section().to_string())
    }

    pub fn is_scrolling(&self) -> Result<bool, JsValue> {
        let store = self.provider.store().map_err(js_error)?;
        Ok(store.is_scrolling())
    }

    pub fn is_active(&self, id: &str) -> Result<bool, JsValue> {
        let store = self.provider.store().map_err(js_error)?;
        Ok(store.is_active(&SectionId::new(id)))
    }

    /// "desktop" or "mobile".
    pub fn input_mode(&self) -> Option<String> {
        let runtime = self.runtime.borrow();
        let mode = runtime.as_ref()?.system().navigator().input_mode();
        Some(
            match mode {
                InputMode::Desktop => "desktop",
                InputMode::Mobile => "mobile",
            }
            .to_string(),
        )
    }

    /// Number of window listeners attached for input interception.
    pub fn intercepted_listener_count(&self) -> usize {
        self.runtime
            .borrow()
            .as_ref()
            .map(|runtime| runtime.listener_count())
            .unwrap_or(0)
    }

    /// Call `callback` with the state as JSON `{ current_section, is_scrolling }`
    /// after every change.
    pub fn on_change(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        let store = self.provider.store().map_err(js_error)?;
        let subscription = store.subscribe(move |state| {
            let Ok(json) = serde_json::to_string(state) else {
                return;
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                tracing::warn!("navigation change callback failed: {:?}", err);
            }
        });
        self.subscriptions.borrow_mut().push(subscription);
        Ok(())
    }

    /// Observe sections rendered after construction.
    pub fn refresh(&self) {
        if let Some(runtime) = self.runtime.borrow().as_ref() {
            runtime.refresh_observation();
        }
    }

    pub fn unmount(&self) {
        self.subscriptions.borrow_mut().clear();
        self.provider.withdraw();
        if let Some(runtime) = self.runtime.borrow_mut().take() {
            runtime.unmount();
        }
    }
}

impl Drop for SectionNav {
    fn drop(&mut self) {
        self.unmount();
    }
}
