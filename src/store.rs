// Navigation state store: the one shared record of the active section and the
// in-flight flag, handed to every consumer as a cloneable handle.
//
// Writers: the visibility path writes `current_section` only while idle; the
// navigator writes `current_section` and `is_scrolling` while navigating.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::error::NavError;
use crate::platform::Subscription;
use crate::types::SectionId;

/// Snapshot of the shared navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub current_section: SectionId,
    pub is_scrolling: bool,
}

type Navigate = Rc<dyn Fn(&SectionId)>;
type Listener = Rc<dyn Fn(&NavigationState)>;

struct StoreInner {
    state: RefCell<NavigationState>,
    navigator: RefCell<Option<Navigate>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

/// Shared handle to the navigation state. Clones point at the same state.
#[derive(Clone)]
pub struct NavStore {
    inner: Rc<StoreInner>,
}

impl NavStore {
    pub fn new(initial: SectionId) -> Self {
        NavStore {
            inner: Rc::new(StoreInner {
                state: RefCell::new(NavigationState {
                    current_section: initial,
                    is_scrolling: false,
                }),
                navigator: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> NavigationState {
        self.inner.state.borrow().clone()
    }

    pub fn current_section(&self) -> SectionId {
        self.inner.state.borrow().current_section.clone()
    }

    pub fn is_scrolling(&self) -> bool {
        self.inner.state.borrow().is_scrolling
    }

    /// Whether `id` is the highlighted section (nav links, dot indicators).
    pub fn is_active(&self, id: &SectionId) -> bool {
        &self.inner.state.borrow().current_section == id
    }

    pub fn set_current_section(&self, id: SectionId) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            if state.current_section == id {
                false
            } else {
                state.current_section = id;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_is_scrolling(&self, scrolling: bool) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.is_scrolling != scrolling;
            state.is_scrolling = scrolling;
            changed
        };
        if changed {
            self.notify();
        }
    }

    /// Optimistic start of a navigation: highlight `id` and raise the in-flight
    /// flag in one update, so listeners never see one without the other.
    pub fn begin_navigation(&self, id: SectionId) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let changed = state.current_section != id || !state.is_scrolling;
            state.current_section = id;
            state.is_scrolling = true;
            changed
        };
        if changed {
            self.notify();
        }
    }

    /// Install the navigate capability. Called once by the composition root
    /// after the navigator exists.
    pub fn register_navigator(&self, navigate: impl Fn(&SectionId) + 'static) {
        *self.inner.navigator.borrow_mut() = Some(Rc::new(navigate));
    }

    pub fn clear_navigator(&self) {
        self.inner.navigator.borrow_mut().take();
    }

    pub fn has_navigator(&self) -> bool {
        self.inner.navigator.borrow().is_some()
    }

    /// Fire-and-forget navigation. Dropped requests are not errors; only a
    /// missing navigator is.
    pub fn navigate_to_section(&self, id: &SectionId) -> Result<(), NavError> {
        let navigate = self
            .inner
            .navigator
            .borrow()
            .clone()
            .ok_or(NavError::NavigatorNotRegistered)?;
        navigate(id);
        Ok(())
    }

    /// Called after every change with the new state.
    pub fn subscribe(&self, listener: impl Fn(&NavigationState) + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        let weak: Weak<StoreInner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl std::fmt::Debug for NavStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavStore")
            .field("state", &*self.inner.state.borrow())
            .field("navigator", &self.has_navigator())
            .finish()
    }
}

/// Scope that makes a store reachable. Reading it before `provide` is a wiring
/// bug and fails loudly.
#[derive(Debug, Default)]
pub struct StoreProvider {
    store: RefCell<Option<NavStore>>,
}

impl StoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provide(&self, store: NavStore) {
        *self.store.borrow_mut() = Some(store);
    }

    pub fn withdraw(&self) -> Option<NavStore> {
        self.store.borrow_mut().take()
    }

    pub fn store(&self) -> Result<NavStore, NavError> {
        self.store
            .borrow()
            .clone()
            .ok_or(NavError::StoreNotProvided)
    }
}
