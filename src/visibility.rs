// Visibility tracking: which observed section is the most visible right now.
// Larger intersection ratio wins; ratios within RATIO_TIE_BAND of the best are
// treated as equal and the larger visible area wins among them.

use tracing::trace;

use crate::host::ScrollHost;
use crate::types::{default_root_margin, default_visibility_threshold, SectionId};

pub const RATIO_TIE_BAND: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOptions {
    pub threshold: Vec<f64>,
    pub root_margin: String,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        VisibilityOptions {
            threshold: default_visibility_threshold(),
            root_margin: default_root_margin(),
        }
    }
}

/// One intersection observation for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionSample {
    pub id: SectionId,
    pub is_intersecting: bool,
    pub ratio: f64,
    /// Visible area in px² (intersection rect width × height).
    pub area: f64,
}

impl IntersectionSample {
    pub fn new(id: &str, is_intersecting: bool, ratio: f64, area: f64) -> Self {
        IntersectionSample {
            id: SectionId::new(id),
            is_intersecting,
            ratio,
            area,
        }
    }
}

/// Pick the most visible intersecting sample. `None` if nothing intersects.
///
/// The best ratio is found first; every sample within the tie band of it is a
/// contender and the largest area wins. Equal areas keep the earlier sample.
pub fn most_visible(samples: &[IntersectionSample]) -> Option<&IntersectionSample> {
    let best_ratio = samples
        .iter()
        .filter(|s| s.is_intersecting)
        .map(|s| s.ratio)
        .reduce(f64::max)?;
    samples
        .iter()
        .filter(|s| s.is_intersecting && best_ratio - s.ratio < RATIO_TIE_BAND)
        .fold(None, |best: Option<&IntersectionSample>, candidate| match best {
            Some(current) if candidate.area <= current.area => Some(current),
            _ => Some(candidate),
        })
}

/// Observes a fixed set of section ids and reduces observation batches to the
/// active id.
#[derive(Debug)]
pub struct VisibilityTracker {
    ids: Vec<SectionId>,
    options: VisibilityOptions,
    observed: Vec<SectionId>,
    connected: bool,
}

impl VisibilityTracker {
    pub fn new(ids: Vec<SectionId>, options: VisibilityOptions) -> Self {
        VisibilityTracker {
            ids,
            options,
            observed: Vec::new(),
            connected: false,
        }
    }

    pub fn options(&self) -> &VisibilityOptions {
        &self.options
    }

    /// Resolve every id against the page. Unmounted sections are skipped.
    /// Returns the ids now under observation.
    pub fn observe(&mut self, host: &dyn ScrollHost) -> &[SectionId] {
        self.observed = self
            .ids
            .iter()
            .filter(|id| {
                let mounted = host.has_section(id);
                if !mounted {
                    trace!("section `{}` not mounted, not observed", id);
                }
                mounted
            })
            .cloned()
            .collect();
        self.connected = true;
        &self.observed
    }

    pub fn observed(&self) -> &[SectionId] {
        &self.observed
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Reduce one observation batch. Samples for unobserved ids are ignored.
    /// After [`disconnect`](Self::disconnect) every batch reports `None`.
    pub fn process_batch(&self, samples: &[IntersectionSample]) -> Option<SectionId> {
        if !self.connected {
            return None;
        }
        let relevant: Vec<IntersectionSample> = samples
            .iter()
            .filter(|s| self.observed.contains(&s.id))
            .cloned()
            .collect();
        most_visible(&relevant).map(|s| s.id.clone())
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
        self.observed.clear();
    }
}
