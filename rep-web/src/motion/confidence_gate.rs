//! Confidence Gate - first layer of the rep pipeline
//!
//! A joint measurement is only trusted when every landmark feeding it was
//! detected with confidence >= threshold. Anything else is a frame-skip,
//! never an error.

use super::landmarks::Landmark;

/// Default per-landmark confidence floor
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Confidence gate for landmark triples
#[derive(Clone, Copy, Debug)]
pub struct ConfidenceGate {
    /// Minimum confidence to accept raw data
    threshold: f32,
}

impl ConfidenceGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Set confidence threshold
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Single landmark check. NaN confidence never passes.
    pub fn accepts(&self, landmark: &Landmark) -> bool {
        landmark.confidence >= self.threshold
            && landmark.x.is_finite()
            && landmark.y.is_finite()
    }

    /// Returns the positions of a (proximal, vertex, distal) triple, or None
    /// if any landmark is missing or below threshold.
    pub fn apply(
        &self,
        proximal: Option<Landmark>,
        vertex: Option<Landmark>,
        distal: Option<Landmark>,
    ) -> Option<[(f32, f32); 3]> {
        let (p1, p2, p3) = (proximal?, vertex?, distal?);
        if self.accepts(&p1) && self.accepts(&p2) && self.accepts(&p3) {
            Some([p1.position(), p2.position(), p3.position()])
        } else {
            None
        }
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}
