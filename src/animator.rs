// Smooth scroll animator: eased, fixed-duration window scroll to a section.
// At most one animation runs; starting another cancels it without completing it.

use tracing::trace;

use crate::host::ScrollHost;
use crate::types::{SectionId, Timestamp, DEFAULT_HEADER_OFFSET_PX, DEFAULT_SCROLL_DURATION_MS};

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub type Callback = Box<dyn FnOnce()>;

/// Per-call options for [`ScrollAnimator::scroll_to_element`].
pub struct ScrollOptions {
    pub duration_ms: f64,
    /// Distance kept between the viewport top and the section top (fixed header).
    pub offset_px: f64,
    pub on_start: Option<Callback>,
    pub on_complete: Option<Callback>,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        ScrollOptions {
            duration_ms: DEFAULT_SCROLL_DURATION_MS,
            offset_px: DEFAULT_HEADER_OFFSET_PX,
            on_start: None,
            on_complete: None,
        }
    }
}

/// One in-flight animated scroll.
pub struct ScrollAnimation {
    pub start_offset: f64,
    pub target_offset: f64,
    pub start: Timestamp,
    pub duration_ms: f64,
    on_complete: Option<Callback>,
}

impl ScrollAnimation {
    pub fn progress_at(&self, now: Timestamp) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (now.since(self.start) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn offset_at(&self, now: Timestamp) -> f64 {
        let eased = ease_in_out_cubic(self.progress_at(now));
        self.start_offset + (self.target_offset - self.start_offset) * eased
    }
}

impl std::fmt::Debug for ScrollAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollAnimation")
            .field("start_offset", &self.start_offset)
            .field("target_offset", &self.target_offset)
            .field("start", &self.start)
            .field("duration_ms", &self.duration_ms)
            .finish()
    }
}

#[derive(Debug, Default)]
enum AnimatorState {
    #[default]
    Idle,
    Running(ScrollAnimation),
}

/// Result of advancing the animator by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// Nothing running; no scroll written.
    Idle,
    /// Scroll written, another frame is needed.
    Running(f64),
    /// Final scroll written and completion fired.
    Finished(f64),
}

impl FrameStep {
    pub fn needs_frame(&self) -> bool {
        matches!(self, FrameStep::Running(_))
    }
}

/// Animator state machine: `Idle | Running`.
#[derive(Debug)]
pub struct ScrollAnimator {
    state: AnimatorState,
}

impl ScrollAnimator {
    pub fn new() -> Self {
        ScrollAnimator {
            state: AnimatorState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimatorState::Running(_))
    }

    pub fn current(&self) -> Option<&ScrollAnimation> {
        match &self.state {
            AnimatorState::Running(animation) => Some(animation),
            AnimatorState::Idle => None,
        }
    }

    /// Start scrolling so the section's top lands `offset_px` below the viewport top.
    ///
    /// Returns `false` without side effects when the section is not mounted.
    /// Otherwise fires `on_start`, replaces any running animation (its completion
    /// is dropped), and waits for [`step`](Self::step) to drive frames.
    pub fn scroll_to_element(
        &mut self,
        host: &dyn ScrollHost,
        id: &SectionId,
        options: ScrollOptions,
        now: Timestamp,
    ) -> bool {
        let Some(top) = host.section_offset(id) else {
            trace!("scroll target `{}` not mounted", id);
            return false;
        };
        if let Some(on_start) = options.on_start {
            on_start();
        }
        self.cancel();
        let animation = ScrollAnimation {
            start_offset: host.scroll_offset(),
            target_offset: top - options.offset_px,
            start: now,
            duration_ms: options.duration_ms,
            on_complete: options.on_complete,
        };
        trace!(
            "scroll to `{}`: {} -> {}",
            id,
            animation.start_offset,
            animation.target_offset
        );
        self.state = AnimatorState::Running(animation);
        true
    }

    /// Advance one frame: write the eased offset, completing at progress 1.
    pub fn step(&mut self, host: &dyn ScrollHost, now: Timestamp) -> FrameStep {
        let AnimatorState::Running(animation) = &self.state else {
            return FrameStep::Idle;
        };
        let offset = animation.offset_at(now);
        let done = animation.progress_at(now) >= 1.0;
        host.set_scroll_offset(offset);
        if !done {
            return FrameStep::Running(offset);
        }
        let AnimatorState::Running(mut finished) = std::mem::take(&mut self.state) else {
            return FrameStep::Idle;
        };
        if let Some(on_complete) = finished.on_complete.take() {
            on_complete();
        }
        FrameStep::Finished(offset)
    }

    /// Drop the running animation, if any. Its completion never fires.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.is_running();
        self.state = AnimatorState::Idle;
        cancelled
    }
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new()
    }
}
