// Composition root. Builds the store, then the navigator, then registers the
// navigator's capability into the store, then starts visibility observation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::error::NavError;
use crate::host::ScrollHost;
use crate::navigator::{NavigatorSettings, SectionNavigator};
use crate::platform::ViewportSnapshot;
use crate::store::NavStore;
use crate::types::{InputMode, NavConfig, SectionId, SectionRegistry};
use crate::visibility::{IntersectionSample, VisibilityOptions, VisibilityTracker};

/// A mounted navigation subsystem.
pub struct NavigationSystem {
    config: NavConfig,
    store: NavStore,
    navigator: Rc<SectionNavigator>,
    tracker: RefCell<VisibilityTracker>,
    host: Rc<dyn ScrollHost>,
    mounted: Cell<bool>,
}

impl NavigationSystem {
    pub fn mount(config: NavConfig, host: Rc<dyn ScrollHost>) -> Result<Self, NavError> {
        config.validate()?;
        let registry = SectionRegistry::new(config.sections.clone())?;
        let store = NavStore::new(registry.first().id.clone());
        let mode = InputMode::from_optional(host.viewport().as_ref(), config.mobile_breakpoint_px);
        let ids: Vec<SectionId> = registry.ids().cloned().collect();

        let navigator = Rc::new(SectionNavigator::new(
            registry,
            store.clone(),
            host.clone(),
            NavigatorSettings::from(&config),
            mode,
        ));
        let weak = Rc::downgrade(&navigator);
        store.register_navigator(move |id| {
            if let Some(navigator) = weak.upgrade() {
                navigator.navigate_to_section(id);
            }
        });

        let mut tracker = VisibilityTracker::new(
            ids,
            VisibilityOptions {
                threshold: config.visibility_threshold.clone(),
                root_margin: config.root_margin.clone(),
            },
        );
        let observed = tracker.observe(host.as_ref()).len();
        debug!(
            "navigation mounted: {} sections, {} observed, {:?} mode",
            config.sections.len(),
            observed,
            mode
        );

        Ok(NavigationSystem {
            config,
            store,
            navigator,
            tracker: RefCell::new(tracker),
            host,
            mounted: Cell::new(true),
        })
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn store(&self) -> NavStore {
        self.store.clone()
    }

    pub fn navigator(&self) -> &Rc<SectionNavigator> {
        &self.navigator
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn observed_sections(&self) -> Vec<SectionId> {
        self.tracker.borrow().observed().to_vec()
    }

    pub fn visibility_options(&self) -> VisibilityOptions {
        self.tracker.borrow().options().clone()
    }

    /// Re-resolve sections that were not mounted at startup.
    pub fn refresh_observation(&self) -> Vec<SectionId> {
        if !self.is_mounted() {
            return Vec::new();
        }
        self.tracker
            .borrow_mut()
            .observe(self.host.as_ref())
            .to_vec()
    }

    /// Feed one intersection batch through the tracker into the navigator.
    pub fn handle_intersections(&self, samples: &[IntersectionSample]) -> bool {
        let visible = self.tracker.borrow().process_batch(samples);
        self.navigator.handle_visibility(visible)
    }

    /// Recompute the input mode. Returns whether it changed.
    pub fn handle_viewport_change(&self, viewport: &ViewportSnapshot) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let mode = InputMode::from_viewport(viewport, self.config.mobile_breakpoint_px);
        self.navigator.set_input_mode(mode)
    }

    /// Disconnect observation, cancel any animation, release interception.
    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        self.tracker.borrow_mut().disconnect();
        self.navigator.shutdown();
        self.store.clear_navigator();
        debug!("navigation unmounted");
    }
}

impl Drop for NavigationSystem {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for NavigationSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationSystem")
            .field("navigator", &self.navigator)
            .field("store", &self.store)
            .field("mounted", &self.mounted.get())
            .finish()
    }
}
