//! Rep phase - where in the motion cycle the athlete currently is

use serde::Serialize;

/// Motion cycle phase
///
/// Four-phase cycle: `Ready → Descending → Bottom → Ascending → Ready`.
/// The two-phase model only occupies `Ready` (UP) and `Bottom` (DOWN).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepPhase {
    /// Standing / extended
    #[default]
    Ready,
    Descending,
    /// Fully flexed
    Bottom,
    Ascending,
}

impl RepPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RepPhase::Ready => "READY",
            RepPhase::Descending => "DESCENDING",
            RepPhase::Bottom => "BOTTOM",
            RepPhase::Ascending => "ASCENDING",
        }
    }

    /// Label in the two-phase vocabulary
    pub fn up_down_name(&self) -> &'static str {
        match self {
            RepPhase::Ready | RepPhase::Ascending => "UP",
            RepPhase::Descending | RepPhase::Bottom => "DOWN",
        }
    }

    /// Next phase in the cycle
    pub fn next(&self) -> Self {
        match self {
            RepPhase::Ready => RepPhase::Descending,
            RepPhase::Descending => RepPhase::Bottom,
            RepPhase::Bottom => RepPhase::Ascending,
            RepPhase::Ascending => RepPhase::Ready,
        }
    }
}

impl std::fmt::Display for RepPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
