// Section navigation orchestrator.
// Idle -> Navigating on an accepted request, Navigating -> Settling when the
// animator finishes, Settling -> Idle once the settle delay has passed.
// One cooldown gate covers both throttling and mutual exclusion: a request is
// accepted only while Idle and at least `throttle_delay_ms` after the previous
// accepted request.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::animator::{FrameStep, ScrollAnimator, ScrollOptions};
use crate::host::ScrollHost;
use crate::store::NavStore;
use crate::types::{
    InputMode, NavConfig, SectionId, SectionRegistry, Timestamp, DEFAULT_HEADER_OFFSET_PX,
    DEFAULT_SCROLL_DURATION_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_THROTTLE_DELAY_MS,
};

/// Timing knobs taken from [`NavConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorSettings {
    pub throttle_delay_ms: f64,
    pub scroll_duration_ms: f64,
    pub header_offset_px: f64,
    pub settle_delay_ms: f64,
}

impl From<&NavConfig> for NavigatorSettings {
    fn from(config: &NavConfig) -> Self {
        NavigatorSettings {
            throttle_delay_ms: config.throttle_delay_ms,
            scroll_duration_ms: config.scroll_duration_ms,
            header_offset_px: config.header_offset_px,
            settle_delay_ms: config.settle_delay_ms,
        }
    }
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        NavigatorSettings {
            throttle_delay_ms: DEFAULT_THROTTLE_DELAY_MS,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
            header_offset_px: DEFAULT_HEADER_OFFSET_PX,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavPhase {
    Idle,
    Navigating,
    /// Animation done; input stays blocked until `until`.
    Settling { until: Timestamp },
}

/// What happened to a navigation request. Only `Accepted` has effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Accepted,
    UnknownSection,
    OutOfRange,
    Throttled,
    Busy,
    MissingTarget,
}

/// Whether the page should still run its default action for an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    PreventDefault,
    PassThrough,
}

/// Relative or absolute keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Previous,
    First,
    Last,
}

impl NavKey {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "PageDown" | " " | "Spacebar" => Some(NavKey::Next),
            "ArrowUp" | "PageUp" => Some(NavKey::Previous),
            "Home" => Some(NavKey::First),
            "End" => Some(NavKey::Last),
            _ => None,
        }
    }
}

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Page,
    /// A text field or editable region; keys belong to it.
    TextEntry,
}

impl FocusTarget {
    pub fn from_element(tag_name: &str, content_editable: bool) -> Self {
        let tag = tag_name.to_ascii_uppercase();
        if content_editable || matches!(tag.as_str(), "INPUT" | "TEXTAREA" | "SELECT") {
            FocusTarget::TextEntry
        } else {
            FocusTarget::Page
        }
    }
}

/// Window-level events intercepted in desktop mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptedEvent {
    Wheel,
    KeyDown,
    TouchMove,
}

impl InterceptedEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InterceptedEvent::Wheel => "wheel",
            InterceptedEvent::KeyDown => "keydown",
            InterceptedEvent::TouchMove => "touchmove",
        }
    }

    pub fn for_mode(mode: InputMode) -> &'static [InterceptedEvent] {
        match mode {
            InputMode::Desktop => &[
                InterceptedEvent::Wheel,
                InterceptedEvent::KeyDown,
                InterceptedEvent::TouchMove,
            ],
            InputMode::Mobile => &[],
        }
    }
}

/// The set of intercepted events currently attached.
#[derive(Debug, Default)]
pub struct InterceptionSet {
    mode: Option<InputMode>,
    attached: Vec<InterceptedEvent>,
}

impl InterceptionSet {
    /// Detach everything, then attach what `mode` needs. Returns whether the
    /// mode differs from the previous reconciliation.
    pub fn reconcile(&mut self, mode: InputMode) -> bool {
        let changed = self.mode != Some(mode);
        self.detach_all();
        self.attached.extend_from_slice(InterceptedEvent::for_mode(mode));
        self.mode = Some(mode);
        changed
    }

    pub fn detach_all(&mut self) {
        self.attached.clear();
    }

    pub fn attached(&self) -> &[InterceptedEvent] {
        &self.attached
    }

    pub fn mode(&self) -> Option<InputMode> {
        self.mode
    }
}

struct NavigatorState {
    phase: NavPhase,
    last_accepted: Option<Timestamp>,
    mode: InputMode,
}

/// Coordinates the store, the animator and user input.
pub struct SectionNavigator {
    registry: SectionRegistry,
    store: NavStore,
    host: Rc<dyn ScrollHost>,
    settings: NavigatorSettings,
    state: RefCell<NavigatorState>,
    animator: RefCell<ScrollAnimator>,
    interception: RefCell<InterceptionSet>,
    frame_requester: RefCell<Option<Rc<dyn Fn()>>>,
}

impl SectionNavigator {
    pub fn new(
        registry: SectionRegistry,
        store: NavStore,
        host: Rc<dyn ScrollHost>,
        settings: NavigatorSettings,
        mode: InputMode,
    ) -> Self {
        let mut interception = InterceptionSet::default();
        interception.reconcile(mode);
        SectionNavigator {
            registry,
            store,
            host,
            settings,
            state: RefCell::new(NavigatorState {
                phase: NavPhase::Idle,
                last_accepted: None,
                mode,
            }),
            animator: RefCell::new(ScrollAnimator::new()),
            interception: RefCell::new(interception),
            frame_requester: RefCell::new(None),
        }
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &NavStore {
        &self.store
    }

    pub fn phase(&self) -> NavPhase {
        self.state.borrow().phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == NavPhase::Idle
    }

    pub fn input_mode(&self) -> InputMode {
        self.state.borrow().mode
    }

    pub fn attached_events(&self) -> Vec<InterceptedEvent> {
        self.interception.borrow().attached().to_vec()
    }

    /// Hook run after a navigation starts, used to begin the frame loop.
    pub fn set_frame_requester(&self, request: impl Fn() + 'static) {
        *self.frame_requester.borrow_mut() = Some(Rc::new(request));
    }

    /// Switch interception for a new mode. Returns whether the mode changed.
    pub fn set_input_mode(&self, mode: InputMode) -> bool {
        self.state.borrow_mut().mode = mode;
        let changed = self.interception.borrow_mut().reconcile(mode);
        if changed {
            debug!("input mode now {:?}", mode);
        }
        changed
    }

    pub fn navigate_to_section(&self, id: &SectionId) -> NavOutcome {
        match self.registry.index_of(id) {
            Some(index) => self.navigate_to_index(index),
            None => {
                trace!("navigation to unknown section `{}` ignored", id);
                NavOutcome::UnknownSection
            }
        }
    }

    pub fn navigate_to_index(&self, index: usize) -> NavOutcome {
        let Some(section) = self.registry.get(index) else {
            return NavOutcome::OutOfRange;
        };
        let id = section.id.clone();
        let now = self.host.now();

        {
            let state = self.state.borrow();
            if state.phase != NavPhase::Idle {
                trace!("navigation to `{}` dropped: busy", id);
                return NavOutcome::Busy;
            }
            if let Some(last) = state.last_accepted {
                if now.since(last) < self.settings.throttle_delay_ms {
                    trace!("navigation to `{}` dropped: throttled", id);
                    return NavOutcome::Throttled;
                }
            }
        }
        if !self.host.has_section(&id) {
            trace!("navigation to `{}` dropped: not mounted", id);
            return NavOutcome::MissingTarget;
        }

        {
            let mut state = self.state.borrow_mut();
            state.phase = NavPhase::Navigating;
            state.last_accepted = Some(now);
        }
        // Optimistic: highlight the target before the scroll lands.
        self.store.begin_navigation(id.clone());

        let options = ScrollOptions {
            duration_ms: self.settings.scroll_duration_ms,
            offset_px: self.settings.header_offset_px,
            on_start: None,
            on_complete: None,
        };
        let started =
            self.animator
                .borrow_mut()
                .scroll_to_element(self.host.as_ref(), &id, options, now);
        if !started {
            self.state.borrow_mut().phase = NavPhase::Idle;
            self.store.set_is_scrolling(false);
            return NavOutcome::MissingTarget;
        }
        debug!("navigating to `{}` (index {})", id, index);

        let request = self.frame_requester.borrow().clone();
        if let Some(request) = request {
            request();
        }
        NavOutcome::Accepted
    }

    /// Move relative to the currently active section.
    pub fn navigate_relative(&self, step: isize) -> NavOutcome {
        let current = self
            .registry
            .index_of(&self.store.current_section())
            .unwrap_or(0) as isize;
        let target = current + step;
        if target < 0 {
            return NavOutcome::OutOfRange;
        }
        self.navigate_to_index(target as usize)
    }

    pub fn handle_key_action(&self, key: NavKey) -> NavOutcome {
        match key {
            NavKey::Next => self.navigate_relative(1),
            NavKey::Previous => self.navigate_relative(-1),
            NavKey::First => self.navigate_to_index(0),
            NavKey::Last => self.navigate_to_index(self.registry.last_index()),
        }
    }

    /// Desktop: the wheel never scrolls natively; its sign picks the neighbour.
    pub fn handle_wheel(&self, delta_y: f64) -> InputDisposition {
        if self.input_mode().is_mobile() {
            return InputDisposition::PassThrough;
        }
        if delta_y > 0.0 {
            self.navigate_relative(1);
        } else if delta_y < 0.0 {
            self.navigate_relative(-1);
        }
        InputDisposition::PreventDefault
    }

    pub fn handle_key(&self, key: &str, focus: FocusTarget) -> InputDisposition {
        if self.input_mode().is_mobile() || focus == FocusTarget::TextEntry {
            return InputDisposition::PassThrough;
        }
        match NavKey::from_key(key) {
            Some(action) => {
                self.handle_key_action(action);
                InputDisposition::PreventDefault
            }
            None => InputDisposition::PassThrough,
        }
    }

    pub fn handle_touch_move(&self) -> InputDisposition {
        if self.input_mode().is_mobile() {
            InputDisposition::PassThrough
        } else {
            InputDisposition::PreventDefault
        }
    }

    /// Passive update from the visibility tracker. Ignored unless idle so a
    /// mid-animation position never overrides the optimistic target. A `None`
    /// report keeps the current highlight.
    pub fn handle_visibility(&self, visible: Option<SectionId>) -> bool {
        if !self.is_idle() {
            return false;
        }
        match visible {
            Some(id) if self.registry.index_of(&id).is_some() => {
                self.store.set_current_section(id);
                true
            }
            _ => false,
        }
    }

    /// Advance animation and settle timers. Returns whether another frame is needed.
    pub fn tick(&self, now: Timestamp) -> bool {
        let step = self.animator.borrow_mut().step(self.host.as_ref(), now);
        let settled = {
            let mut state = self.state.borrow_mut();
            if state.phase == NavPhase::Navigating && !step.needs_frame() {
                state.phase = NavPhase::Settling {
                    until: now.plus_millis(self.settings.settle_delay_ms),
                };
            }
            match state.phase {
                NavPhase::Settling { until } if now >= until => {
                    state.phase = NavPhase::Idle;
                    true
                }
                _ => false,
            }
        };
        if settled {
            trace!("navigation settled on `{}`", self.store.current_section());
            self.store.set_is_scrolling(false);
        }
        matches!(step, FrameStep::Running(_)) || !self.is_idle()
    }

    /// Stop everything: no more scroll writes, no completion, no interception.
    pub fn shutdown(&self) {
        self.animator.borrow_mut().cancel();
        self.interception.borrow_mut().detach_all();
        self.frame_requester.borrow_mut().take();
        self.state.borrow_mut().phase = NavPhase::Idle;
        self.store.set_is_scrolling(false);
    }
}

impl std::fmt::Debug for SectionNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SectionNavigator")
            .field("phase", &state.phase)
            .field("mode", &state.mode)
            .field("sections", &self.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use proptest::prelude::*;

    use super::*;
    use crate::host::mock::MockHost;
    use crate::types::Section;

    const IDS: [&str; 4] = ["hero", "about", "experience", "contact"];

    fn setup(mode: InputMode) -> (Rc<MockHost>, SectionNavigator) {
        setup_with(mode, NavigatorSettings::default())
    }

    fn setup_with(mode: InputMode, settings: NavigatorSettings) -> (Rc<MockHost>, SectionNavigator) {
        let host = Rc::new(MockHost::with_sections(&IDS, 1000.0));
        let registry =
            SectionRegistry::new(IDS.iter().map(|id| Section::new(id, id)).collect()).unwrap();
        let store = NavStore::new(SectionId::from("hero"));
        let navigator = SectionNavigator::new(
            registry,
            store,
            host.clone(),
            settings,
            mode,
        );
        (host, navigator)
    }

    /// Drive frames at ~60fps until the navigator goes idle.
    fn run_frames(host: &MockHost, navigator: &SectionNavigator) {
        for _ in 0..200 {
            host.advance(16.0);
            if !navigator.tick(host.at()) {
                return;
            }
        }
        panic!("navigation never settled");
    }

    fn current(navigator: &SectionNavigator) -> String {
        navigator.store().current_section().to_string()
    }

    #[test]
    fn wheel_down_from_hero_targets_about() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);

        assert_eq!(navigator.handle_wheel(100.0), InputDisposition::PreventDefault);
        assert_eq!(current(&navigator), "about");
        assert!(navigator.store().is_scrolling());
        assert_eq!(navigator.phase(), NavPhase::Navigating);

        run_frames(&host, &navigator);
        assert!(!navigator.store().is_scrolling());
        assert_eq!(current(&navigator), "about");
        assert_eq!(host.scroll_offset(), 920.0);
    }

    #[test]
    fn wheel_direction_and_bounds() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);

        assert_eq!(navigator.handle_wheel(-40.0), InputDisposition::PreventDefault);
        assert_eq!(current(&navigator), "hero");
        assert!(navigator.is_idle());
        assert!(host.writes.borrow().is_empty());

        assert_eq!(navigator.handle_wheel(0.0), InputDisposition::PreventDefault);
        assert!(navigator.is_idle());

        navigator.handle_wheel(3.0);
        run_frames(&host, &navigator);
        host.advance(500.0);
        navigator.handle_wheel(-3.0);
        assert_eq!(current(&navigator), "hero");
    }

    #[test]
    fn keys_map_to_sections() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);

        assert_eq!(
            navigator.handle_key("End", FocusTarget::Page),
            InputDisposition::PreventDefault
        );
        assert_eq!(current(&navigator), "contact");
        run_frames(&host, &navigator);

        host.advance(500.0);
        navigator.handle_key("PageUp", FocusTarget::Page);
        assert_eq!(current(&navigator), "experience");
        run_frames(&host, &navigator);

        host.advance(500.0);
        navigator.handle_key("Home", FocusTarget::Page);
        assert_eq!(current(&navigator), "hero");
        run_frames(&host, &navigator);

        host.advance(500.0);
        navigator.handle_key(" ", FocusTarget::Page);
        assert_eq!(current(&navigator), "about");
    }

    #[test]
    fn unrelated_keys_and_text_entry_pass_through() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        assert_eq!(
            navigator.handle_key("a", FocusTarget::Page),
            InputDisposition::PassThrough
        );
        assert_eq!(
            navigator.handle_key("ArrowDown", FocusTarget::TextEntry),
            InputDisposition::PassThrough
        );
        assert_eq!(current(&navigator), "hero");
        assert!(navigator.is_idle());
    }

    #[test]
    fn focus_classification() {
        assert_eq!(FocusTarget::from_element("textarea", false), FocusTarget::TextEntry);
        assert_eq!(FocusTarget::from_element("INPUT", false), FocusTarget::TextEntry);
        assert_eq!(FocusTarget::from_element("DIV", true), FocusTarget::TextEntry);
        assert_eq!(FocusTarget::from_element("BUTTON", false), FocusTarget::Page);
    }

    #[test]
    fn unknown_section_never_animates() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        assert_eq!(
            navigator.navigate_to_section(&SectionId::from("not-a-real-id")),
            NavOutcome::UnknownSection
        );
        assert!(navigator.is_idle());
        assert!(!navigator.tick(host.at()));
        assert!(host.writes.borrow().is_empty());
    }

    #[test]
    fn unmounted_target_is_a_silent_noop() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        host.unmount("experience");
        assert_eq!(
            navigator.navigate_to_section(&SectionId::from("experience")),
            NavOutcome::MissingTarget
        );
        assert_eq!(current(&navigator), "hero");
        assert!(!navigator.store().is_scrolling());
        assert_eq!(
            navigator.navigate_to_section(&SectionId::from("about")),
            NavOutcome::Accepted,
            "a missing target consumes no cooldown"
        );
    }

    #[test]
    fn requests_during_navigation_are_dropped() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        assert_eq!(
            navigator.navigate_to_section(&SectionId::from("about")),
            NavOutcome::Accepted
        );
        host.advance(400.0);
        navigator.tick(host.at());
        assert_eq!(
            navigator.navigate_to_section(&SectionId::from("contact")),
            NavOutcome::Busy
        );
        assert_eq!(current(&navigator), "about");
    }

    #[test]
    fn cooldown_outlasts_a_short_animation() {
        let settings = NavigatorSettings {
            scroll_duration_ms: 50.0,
            settle_delay_ms: 0.0,
            ..NavigatorSettings::default()
        };
        let (host, navigator) = setup_with(InputMode::Desktop, settings);
        host.advance(1000.0);
        assert_eq!(navigator.navigate_to_index(1), NavOutcome::Accepted);
        run_frames(&host, &navigator);
        assert!(navigator.is_idle());
        assert!(host.at().since(Timestamp::from_millis(1000.0)) < 300.0);

        assert_eq!(navigator.navigate_to_index(2), NavOutcome::Throttled);
        assert_eq!(current(&navigator), "about");
        assert!(!navigator.store().is_scrolling());

        host.now.set(1300.0);
        assert_eq!(navigator.navigate_to_index(2), NavOutcome::Accepted);
        assert_eq!(current(&navigator), "experience");
    }

    #[test]
    fn acceptance_publishes_target_and_flag_together() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = navigator.store().subscribe(move |state| {
            sink.borrow_mut()
                .push((state.current_section.to_string(), state.is_scrolling));
        });

        navigator.navigate_to_section(&SectionId::from("about"));
        assert_eq!(*seen.borrow(), vec![("about".to_string(), true)]);
        run_frames(&host, &navigator);
        assert_eq!(
            *seen.borrow(),
            vec![("about".to_string(), true), ("about".to_string(), false)]
        );
    }

    #[test]
    fn settle_delay_holds_scrolling_flag() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        navigator.navigate_to_section(&SectionId::from("about"));
        host.advance(800.0);
        assert!(navigator.tick(host.at()));
        assert!(matches!(navigator.phase(), NavPhase::Settling { .. }));
        assert!(navigator.store().is_scrolling());
        assert_eq!(
            navigator.navigate_to_section(&SectionId::from("contact")),
            NavOutcome::Busy
        );

        host.advance(100.0);
        assert!(!navigator.tick(host.at()));
        assert!(!navigator.store().is_scrolling());
        assert!(navigator.is_idle());
    }

    #[test]
    fn tracker_updates_ignored_while_navigating() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        navigator.navigate_to_section(&SectionId::from("contact"));
        assert!(!navigator.handle_visibility(Some(SectionId::from("about"))));
        assert_eq!(current(&navigator), "contact");

        run_frames(&host, &navigator);
        assert!(navigator.handle_visibility(Some(SectionId::from("experience"))));
        assert_eq!(current(&navigator), "experience");
        assert!(!navigator.handle_visibility(None));
        assert_eq!(current(&navigator), "experience");
    }

    #[test]
    fn mobile_mode_leaves_input_alone() {
        let (host, navigator) = setup(InputMode::Mobile);
        host.advance(1000.0);
        assert!(navigator.attached_events().is_empty());
        assert_eq!(navigator.handle_wheel(120.0), InputDisposition::PassThrough);
        assert_eq!(
            navigator.handle_key("ArrowDown", FocusTarget::Page),
            InputDisposition::PassThrough
        );
        assert_eq!(navigator.handle_touch_move(), InputDisposition::PassThrough);
        assert_eq!(current(&navigator), "hero");

        assert!(navigator.handle_visibility(Some(SectionId::from("about"))));
        assert_eq!(current(&navigator), "about");
        assert_eq!(
            navigator.navigate_to_section(&SectionId::from("contact")),
            NavOutcome::Accepted,
            "explicit navigation still animates on mobile"
        );
    }

    #[test]
    fn desktop_intercepts_three_events() {
        let (_host, navigator) = setup(InputMode::Desktop);
        assert_eq!(
            navigator.attached_events(),
            vec![
                InterceptedEvent::Wheel,
                InterceptedEvent::KeyDown,
                InterceptedEvent::TouchMove
            ]
        );
        assert_eq!(navigator.handle_touch_move(), InputDisposition::PreventDefault);

        assert!(navigator.set_input_mode(InputMode::Mobile));
        assert!(navigator.attached_events().is_empty());
        assert!(!navigator.set_input_mode(InputMode::Mobile));
        assert!(navigator.set_input_mode(InputMode::Desktop));
        assert_eq!(navigator.attached_events().len(), 3);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut set = InterceptionSet::default();
        assert!(set.reconcile(InputMode::Desktop));
        assert!(!set.reconcile(InputMode::Desktop));
        assert_eq!(set.attached().len(), 3);
    }

    #[test]
    fn shutdown_mid_animation_stops_scrolling() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        navigator.navigate_to_section(&SectionId::from("experience"));
        host.advance(200.0);
        navigator.tick(host.at());
        let offset = host.scroll_offset();
        let writes = host.writes.borrow().len();

        navigator.shutdown();
        host.advance(2000.0);
        assert!(!navigator.tick(host.at()));
        assert_eq!(host.scroll_offset(), offset);
        assert_eq!(host.writes.borrow().len(), writes);
        assert!(navigator.attached_events().is_empty());
        assert!(!navigator.store().is_scrolling());
    }

    #[test]
    fn frame_requester_runs_on_acceptance_only() {
        let (host, navigator) = setup(InputMode::Desktop);
        host.advance(1000.0);
        let requests = Rc::new(Cell::new(0));
        let counter = requests.clone();
        navigator.set_frame_requester(move || counter.set(counter.get() + 1));

        navigator.navigate_to_section(&SectionId::from("about"));
        navigator.navigate_to_section(&SectionId::from("contact"));
        navigator.navigate_to_section(&SectionId::from("nowhere"));
        assert_eq!(requests.get(), 1);
    }

    #[test]
    fn every_section_is_reachable() {
        let (host, navigator) = setup(InputMode::Desktop);
        for (index, id) in IDS.iter().enumerate().rev() {
            host.advance(1000.0);
            assert_eq!(
                navigator.navigate_to_section(&SectionId::from(*id)),
                NavOutcome::Accepted
            );
            run_frames(&host, &navigator);
            assert_eq!(current(&navigator), *id);
            assert!(!navigator.store().is_scrolling());
            assert_eq!(host.scroll_offset(), index as f64 * 1000.0 - 80.0);
        }
    }

    proptest! {
        #[test]
        fn rapid_requests_honor_only_the_first(
            gaps in prop::collection::vec(0.0f64..299.0, 1..12),
            targets in prop::collection::vec(0usize..4, 12),
        ) {
            let (host, navigator) = setup(InputMode::Desktop);
            host.advance(1000.0);
            let mut outcomes = Vec::new();
            for (gap, target) in gaps.iter().zip(targets.iter()) {
                outcomes.push(navigator.navigate_to_index(*target));
                host.advance(*gap);
            }
            let accepted = outcomes.iter().filter(|o| **o == NavOutcome::Accepted).count();
            prop_assert_eq!(accepted, 1);
            prop_assert_eq!(outcomes[0], NavOutcome::Accepted);
        }
    }
}
