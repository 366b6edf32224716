// The DOM-like environment the navigation core runs against.
// The browser implementation lives in `dom`; tests use `MockHost`.

use crate::platform::ViewportSnapshot;
use crate::types::{SectionId, Timestamp};

/// Everything the core needs from the page: a clock, the window scroll offset,
/// section positions and the viewport.
pub trait ScrollHost {
    /// Current time on the animation-frame clock.
    fn now(&self) -> Timestamp;

    fn scroll_offset(&self) -> f64;

    fn set_scroll_offset(&self, offset: f64);

    /// Document-relative top edge of a section's region, `None` if it is not mounted.
    fn section_offset(&self, id: &SectionId) -> Option<f64>;

    /// Current viewport, `None` outside a browser.
    fn viewport(&self) -> Option<ViewportSnapshot>;

    fn has_section(&self, id: &SectionId) -> bool {
        self.section_offset(id).is_some()
    }
}

/// Host for a page without a window: nothing is mounted, scroll writes vanish.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedHost;

impl ScrollHost for DetachedHost {
    fn now(&self) -> Timestamp {
        Timestamp::default()
    }

    fn scroll_offset(&self) -> f64 {
        0.0
    }

    fn set_scroll_offset(&self, _offset: f64) {}

    fn section_offset(&self, _id: &SectionId) -> Option<f64> {
        None
    }

    fn viewport(&self) -> Option<ViewportSnapshot> {
        None
    }
}
