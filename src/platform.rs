// Viewport/platform classification: mobile (native scroll) vs desktop (paginated).
// Width below the breakpoint OR any touch capability means mobile.

use gloo::events::EventListener;
use wasm_bindgen::JsValue;

use crate::types::InputMode;

/// What the classifier looks at, read from `window` at call time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    pub width: f64,
    pub max_touch_points: u32,
    /// `ontouchstart` is present on the window.
    pub touch_events: bool,
}

impl ViewportSnapshot {
    pub fn desktop(width: f64) -> Self {
        ViewportSnapshot {
            width,
            max_touch_points: 0,
            touch_events: false,
        }
    }

    pub fn has_touch(&self) -> bool {
        self.touch_events || self.max_touch_points > 0
    }

    pub fn is_mobile(&self, breakpoint: f64) -> bool {
        self.width < breakpoint || self.has_touch()
    }
}

impl InputMode {
    pub fn from_viewport(viewport: &ViewportSnapshot, breakpoint: f64) -> Self {
        if viewport.is_mobile(breakpoint) {
            InputMode::Mobile
        } else {
            InputMode::Desktop
        }
    }

    /// Outside a browser there is nothing to intercept; treat it as desktop so
    /// static rendering sees the paginated layout.
    pub fn from_optional(viewport: Option<&ViewportSnapshot>, breakpoint: f64) -> Self {
        viewport
            .map(|v| InputMode::from_viewport(v, breakpoint))
            .unwrap_or(InputMode::Desktop)
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, InputMode::Mobile)
    }
}

/// Handle returned by change registrations. `unsubscribe` is idempotent and
/// dropping the handle unsubscribes.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Subscription {
            release: Some(Box::new(release)),
        }
    }

    pub fn noop() -> Self {
        Subscription { release: None }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Read the live viewport. `None` when there is no `window` (worker, node, tests).
pub fn read_viewport() -> Option<ViewportSnapshot> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let max_touch_points = window.navigator().max_touch_points().max(0) as u32;
    let touch_events = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart"))
        .unwrap_or(false);
    Some(ViewportSnapshot {
        width,
        max_touch_points,
        touch_events,
    })
}

pub fn is_mobile_device(breakpoint: f64) -> bool {
    read_viewport()
        .map(|v| v.is_mobile(breakpoint))
        .unwrap_or(false)
}

/// Invoke `callback` with a fresh snapshot on every window resize.
pub fn on_viewport_change(callback: impl Fn(ViewportSnapshot) + 'static) -> Subscription {
    let Some(window) = web_sys::window() else {
        return Subscription::noop();
    };
    let listener = EventListener::new(&window, "resize", move |_event| {
        if let Some(viewport) = read_viewport() {
            callback(viewport);
        }
    });
    Subscription::new(move || drop(listener))
}
