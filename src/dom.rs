// Browser bindings: window scroll host, intercepted input listeners,
// IntersectionObserver feed and the animation-frame loop.
// Without a window everything is skipped and the system runs detached.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, WheelEvent, Window,
};

use crate::error::NavError;
use crate::host::{DetachedHost, ScrollHost};
use crate::navigator::{FocusTarget, InputDisposition, InterceptedEvent};
use crate::platform::{on_viewport_change, read_viewport, Subscription, ViewportSnapshot};
use crate::system::NavigationSystem;
use crate::types::{NavConfig, SectionId, Timestamp};
use crate::visibility::IntersectionSample;

/// The real page.
pub struct WindowHost {
    window: Window,
}

impl WindowHost {
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| WindowHost { window })
    }

    fn element(&self, id: &SectionId) -> Option<Element> {
        self.window.document()?.get_element_by_id(id.as_str())
    }
}

impl ScrollHost for WindowHost {
    fn now(&self) -> Timestamp {
        let ms = self.window.performance().map(|p| p.now()).unwrap_or(0.0);
        Timestamp::from_millis(ms)
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn set_scroll_offset(&self, offset: f64) {
        self.window.scroll_to_with_x_and_y(0.0, offset);
    }

    fn section_offset(&self, id: &SectionId) -> Option<f64> {
        let element = self.element(id)?;
        Some(element.get_bounding_client_rect().top() + self.scroll_offset())
    }

    fn viewport(&self) -> Option<ViewportSnapshot> {
        read_viewport()
    }
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct DomObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// A navigation system attached to the window.
pub struct BrowserRuntime {
    system: NavigationSystem,
    listeners: RefCell<Vec<EventListener>>,
    resize: RefCell<Option<Subscription>>,
    frame: RefCell<Option<AnimationFrame>>,
    observer: RefCell<Option<DomObserver>>,
}

impl BrowserRuntime {
    pub fn mount(config: NavConfig) -> Result<Rc<Self>, NavError> {
        let host: Rc<dyn ScrollHost> = match WindowHost::new() {
            Some(host) => Rc::new(host),
            None => {
                debug!("no window, navigation runs detached");
                Rc::new(DetachedHost)
            }
        };
        let system = NavigationSystem::mount(config, host)?;
        let runtime = Rc::new(BrowserRuntime {
            system,
            listeners: RefCell::new(Vec::new()),
            resize: RefCell::new(None),
            frame: RefCell::new(None),
            observer: RefCell::new(None),
        });

        let weak = Rc::downgrade(&runtime);
        runtime.system.navigator().set_frame_requester(move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.schedule_frame();
            }
        });
        runtime.install_interception();
        runtime.install_observer();
        runtime.install_resize();
        Ok(runtime)
    }

    pub fn system(&self) -> &NavigationSystem {
        &self.system
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_observing(&self) -> bool {
        self.observer.borrow().is_some()
    }

    /// Drop every intercepted listener, then attach the current mode's set.
    fn install_interception(self: &Rc<Self>) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.clear();
        let Some(window) = web_sys::window() else {
            return;
        };
        for kind in self.system.navigator().attached_events() {
            listeners.push(self.intercept(&window, kind));
        }
    }

    fn intercept(self: &Rc<Self>, window: &Window, kind: InterceptedEvent) -> EventListener {
        let weak = Rc::downgrade(self);
        EventListener::new_with_options(
            window,
            kind.event_type(),
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: false,
            },
            move |event: &Event| {
                let Some(runtime) = weak.upgrade() else {
                    return;
                };
                let navigator = runtime.system.navigator();
                let disposition = match kind {
                    InterceptedEvent::Wheel => {
                        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                            return;
                        };
                        navigator.handle_wheel(wheel.delta_y())
                    }
                    InterceptedEvent::KeyDown => {
                        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                            return;
                        };
                        navigator.handle_key(&key.key(), focus_target())
                    }
                    InterceptedEvent::TouchMove => navigator.handle_touch_move(),
                };
                if disposition == InputDisposition::PreventDefault {
                    event.prevent_default();
                }
            },
        )
    }

    fn install_observer(self: &Rc<Self>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let weak = Rc::downgrade(self);
        let on_batch = move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let Some(runtime) = weak.upgrade() else {
                return;
            };
            let samples: Vec<IntersectionSample> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| sample_from_entry(&entry))
                .collect();
            runtime.system.handle_intersections(&samples);
        };
        let callback: ObserverCallback =
            Closure::wrap(Box::new(on_batch) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = self.system.visibility_options();
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        let thresholds: js_sys::Array = options
            .threshold
            .iter()
            .map(|t| JsValue::from_f64(*t))
            .collect();
        init.set_threshold(&thresholds);

        let observer =
            match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            {
                Ok(observer) => observer,
                Err(err) => {
                    warn!("intersection observer unavailable: {:?}", err);
                    return;
                }
            };
        for id in self.system.observed_sections() {
            if let Some(element) = document.get_element_by_id(id.as_str()) {
                observer.observe(&element);
            }
        }
        *self.observer.borrow_mut() = Some(DomObserver {
            observer,
            _callback: callback,
        });
    }

    fn install_resize(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let subscription = on_viewport_change(move |viewport| {
            let Some(runtime) = weak.upgrade() else {
                return;
            };
            if runtime.system.handle_viewport_change(&viewport) {
                runtime.install_interception();
            }
        });
        *self.resize.borrow_mut() = Some(subscription);
    }

    /// Observe sections that mounted after startup.
    pub fn refresh_observation(&self) {
        let observed = self.system.refresh_observation();
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(dom) = self.observer.borrow().as_ref() {
            for id in observed {
                if let Some(element) = document.get_element_by_id(id.as_str()) {
                    dom.observer.observe(&element);
                }
            }
        }
    }

    fn schedule_frame(self: &Rc<Self>) {
        if self.frame.borrow().is_some() || !self.system.is_mounted() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = request_animation_frame(move |timestamp| {
            let Some(runtime) = weak.upgrade() else {
                return;
            };
            runtime.frame.borrow_mut().take();
            if runtime
                .system
                .navigator()
                .tick(Timestamp::from_millis(timestamp))
            {
                runtime.schedule_frame();
            }
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    /// Cancel the frame loop, remove every listener, stop observing.
    pub fn unmount(&self) {
        self.frame.borrow_mut().take();
        self.listeners.borrow_mut().clear();
        self.resize.borrow_mut().take();
        self.observer.borrow_mut().take();
        self.system.unmount();
    }
}

impl Drop for BrowserRuntime {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn focus_target() -> FocusTarget {
    let Some(active) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
    else {
        return FocusTarget::Page;
    };
    let editable = active
        .dyn_ref::<HtmlElement>()
        .map(|el| el.is_content_editable())
        .unwrap_or(false);
    FocusTarget::from_element(&active.tag_name(), editable)
}

fn sample_from_entry(entry: &IntersectionObserverEntry) -> IntersectionSample {
    let rect = entry.intersection_rect();
    IntersectionSample {
        id: SectionId::new(entry.target().id()),
        is_intersecting: entry.is_intersecting(),
        ratio: entry.intersection_ratio(),
        area: rect.width() * rect.height(),
    }
}
