//! Rep state machine - turns a joint-angle signal into counted repetitions
//!
//! One call to `process` per frame. Invalid frames are no-ops. A cycle
//! completes on the transition back into `Ready`; it is counted only if more
//! than `min_rep_duration_ms` has passed since the previous counted rep.

use log::{debug, info};

use super::config::{ConfigError, PhaseModel, RepConfig};
use super::phase::RepPhase;

/// Upper bound on transitions per frame (one full cycle)
const MAX_TRANSITIONS_PER_FRAME: u8 = 4;

/// Emitted when a frame completes a cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RepEvent {
    /// Valid repetition. `duration_ms` runs from leaving Ready to completion.
    Counted { count: u32, duration_ms: f64 },
    /// Cycle finished inside the debounce window and was dropped
    Rejected { since_last_ms: f64 },
}

/// What a single frame did to the machine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// No usable measurement; state untouched
    Skipped,
    Advanced {
        phase: RepPhase,
        transitions: u8,
        event: Option<RepEvent>,
    },
}

impl FrameOutcome {
    pub fn counted(&self) -> bool {
        matches!(
            self,
            FrameOutcome::Advanced {
                event: Some(RepEvent::Counted { .. }),
                ..
            }
        )
    }
}

/// Phase machine with debounce
pub struct RepStateMachine {
    model: PhaseModel,
    up_threshold: f32,
    down_threshold: f32,
    descend_entry: f32,
    ascend_entry: f32,
    min_rep_duration_ms: f64,

    // State
    phase: RepPhase,
    rep_count: u32,
    /// None until the first counted rep, so that rep is never debounced
    last_rep_at: Option<f64>,
    cycle_started_at: Option<f64>,
    rejected_cycles: u32,
    last_rep_duration_ms: Option<f64>,
}

impl RepStateMachine {
    pub fn new(config: &RepConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            model: config.phase_model,
            up_threshold: config.up_angle_threshold,
            down_threshold: config.down_angle_threshold,
            descend_entry: config.descend_entry(),
            ascend_entry: config.ascend_entry(),
            min_rep_duration_ms: config.min_rep_duration_ms,
            phase: RepPhase::Ready,
            rep_count: 0,
            last_rep_at: None,
            cycle_started_at: None,
            rejected_cycles: 0,
            last_rep_duration_ms: None,
        })
    }

    /// Feed one frame's aggregated angle
    ///
    /// Transitions cascade within the frame while the next condition holds,
    /// so one deep sample walks Ready → Descending → Bottom without skipping.
    pub fn process(&mut self, angle: Option<f32>, now_ms: f64) -> FrameOutcome {
        let angle = match angle {
            Some(a) if a.is_finite() => a,
            _ => return FrameOutcome::Skipped,
        };

        let mut transitions = 0;
        let mut event = None;

        while transitions < MAX_TRANSITIONS_PER_FRAME {
            let Some(next) = self.next_phase(angle) else {
                break;
            };
            debug!("rep phase {} -> {} at {:.1}°", self.phase, next, angle);

            if self.phase == RepPhase::Ready {
                self.cycle_started_at = Some(now_ms);
            }
            self.phase = next;
            transitions += 1;

            if next == RepPhase::Ready {
                event = Some(self.complete_cycle(now_ms));
            }
        }

        FrameOutcome::Advanced {
            phase: self.phase,
            transitions,
            event,
        }
    }

    fn next_phase(&self, angle: f32) -> Option<RepPhase> {
        match (self.model, self.phase) {
            (PhaseModel::FourPhase, RepPhase::Ready) if angle < self.descend_entry => {
                Some(RepPhase::Descending)
            }
            (PhaseModel::FourPhase, RepPhase::Descending) if angle < self.down_threshold => {
                Some(RepPhase::Bottom)
            }
            (PhaseModel::FourPhase, RepPhase::Bottom) if angle > self.ascend_entry => {
                Some(RepPhase::Ascending)
            }
            (PhaseModel::FourPhase, RepPhase::Ascending) if angle > self.up_threshold => {
                Some(RepPhase::Ready)
            }
            (PhaseModel::TwoPhase, RepPhase::Ready) if angle < self.down_threshold => {
                Some(RepPhase::Bottom)
            }
            (PhaseModel::TwoPhase, RepPhase::Bottom) if angle > self.up_threshold => {
                Some(RepPhase::Ready)
            }
            _ => None,
        }
    }

    fn complete_cycle(&mut self, now_ms: f64) -> RepEvent {
        // A clock that ran backwards reads as "window not yet elapsed"
        let since_last = self.last_rep_at.map(|t| (now_ms - t).max(0.0));
        let started = self.cycle_started_at.take().unwrap_or(now_ms);

        match since_last {
            Some(elapsed) if elapsed <= self.min_rep_duration_ms => {
                self.rejected_cycles += 1;
                debug!(
                    "rep cycle dropped: {:.0}ms since last rep (window {:.0}ms)",
                    elapsed, self.min_rep_duration_ms
                );
                RepEvent::Rejected {
                    since_last_ms: elapsed,
                }
            }
            _ => {
                let duration_ms = (now_ms - started).max(0.0);
                self.rep_count += 1;
                self.last_rep_at = Some(now_ms);
                self.last_rep_duration_ms = Some(duration_ms);
                info!("rep {} counted ({:.0}ms)", self.rep_count, duration_ms);
                RepEvent::Counted {
                    count: self.rep_count,
                    duration_ms,
                }
            }
        }
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    /// Phase label in the vocabulary of the configured model
    pub fn phase_label(&self) -> &'static str {
        match self.model {
            PhaseModel::FourPhase => self.phase.name(),
            PhaseModel::TwoPhase => self.phase.up_down_name(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn last_rep_at(&self) -> Option<f64> {
        self.last_rep_at
    }

    /// Completed cycles dropped by the debounce window
    pub fn rejected_cycles(&self) -> u32 {
        self.rejected_cycles
    }

    pub fn last_rep_duration_ms(&self) -> Option<f64> {
        self.last_rep_duration_ms
    }

    /// Reset machine state (thresholds kept)
    pub fn reset(&mut self) {
        self.phase = RepPhase::Ready;
        self.rep_count = 0;
        self.last_rep_at = None;
        self.cycle_started_at = None;
        self.rejected_cycles = 0;
        self.last_rep_duration_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUAT: [f32; 8] = [170.0, 150.0, 120.0, 95.0, 85.0, 95.0, 130.0, 165.0];

    fn machine() -> RepStateMachine {
        RepStateMachine::new(&RepConfig::default()).unwrap()
    }

    /// Feed angles spaced `step_ms` apart starting at `start_ms`, returns the next timestamp
    fn feed(m: &mut RepStateMachine, angles: &[f32], start_ms: f64, step_ms: f64) -> f64 {
        let mut t = start_ms;
        for &a in angles {
            m.process(Some(a), t);
            t += step_ms;
        }
        t
    }

    #[test]
    fn test_single_squat_counts_once() {
        let mut m = machine();
        feed(&mut m, &SQUAT, 0.0, 500.0);
        assert_eq!(m.rep_count(), 1);
        assert_eq!(m.phase(), RepPhase::Ready);
    }

    #[test]
    fn test_phase_sequence() {
        let mut m = machine();
        let mut phases = Vec::new();
        for (i, &a) in [170.0, 105.0, 95.0, 155.0, 165.0].iter().enumerate() {
            m.process(Some(a), i as f64 * 100.0);
            phases.push(m.phase());
        }
        assert_eq!(
            phases,
            vec![
                RepPhase::Ready,
                RepPhase::Descending,
                RepPhase::Bottom,
                RepPhase::Ascending,
                RepPhase::Ready,
            ]
        );
    }

    #[test]
    fn test_never_skips_bottom() {
        let mut m = machine();
        // Dips into the entry band but never below the down threshold
        feed(&mut m, &[170.0, 105.0, 103.0, 130.0, 170.0], 0.0, 300.0);
        assert_eq!(m.phase(), RepPhase::Descending);
        assert_eq!(m.rep_count(), 0);
    }

    #[test]
    fn test_cascade_reports_transitions() {
        let mut m = machine();
        let outcome = m.process(Some(80.0), 0.0);
        assert_eq!(
            outcome,
            FrameOutcome::Advanced {
                phase: RepPhase::Bottom,
                transitions: 2,
                event: None,
            }
        );
    }

    #[test]
    fn test_hovering_at_threshold_does_not_chatter() {
        let mut m = machine();
        feed(&mut m, &[170.0, 95.0], 0.0, 100.0);
        // Wobble around the down threshold
        for (i, a) in [99.0, 101.0, 99.5, 100.5, 98.0, 102.0].iter().enumerate() {
            let outcome = m.process(Some(*a), 300.0 + i as f64 * 30.0);
            assert_eq!(
                outcome,
                FrameOutcome::Advanced {
                    phase: RepPhase::Bottom,
                    transitions: 0,
                    event: None,
                }
            );
        }
    }

    #[test]
    fn test_invalid_frame_is_noop() {
        let mut m = machine();
        feed(&mut m, &[170.0, 95.0], 0.0, 100.0);
        assert_eq!(m.process(None, 300.0), FrameOutcome::Skipped);
        assert_eq!(m.process(Some(f32::NAN), 400.0), FrameOutcome::Skipped);
        assert_eq!(m.phase(), RepPhase::Bottom);
        assert_eq!(m.rep_count(), 0);
    }

    #[test]
    fn test_debounce_blocks_fast_second_cycle() {
        let mut m = machine();
        let t = feed(&mut m, &SQUAT, 0.0, 12.0);
        feed(&mut m, &SQUAT, t, 12.0);
        assert_eq!(m.rep_count(), 1);
        assert_eq!(m.rejected_cycles(), 1);
        assert_eq!(m.phase(), RepPhase::Ready);
    }

    #[test]
    fn test_cycles_outside_window_both_count() {
        let mut m = machine();
        let t = feed(&mut m, &SQUAT, 0.0, 150.0);
        feed(&mut m, &SQUAT, t, 150.0);
        assert_eq!(m.rep_count(), 2);
        assert_eq!(m.rejected_cycles(), 0);
    }

    #[test]
    fn test_exact_window_is_not_enough() {
        let config = RepConfig {
            min_rep_duration_ms: 800.0,
            ..Default::default()
        };
        let mut m = RepStateMachine::new(&config).unwrap();
        m.process(Some(90.0), 0.0);
        m.process(Some(170.0), 100.0);
        m.process(Some(90.0), 500.0);
        let outcome = m.process(Some(170.0), 900.0);
        assert!(!outcome.counted());
        m.process(Some(90.0), 1000.0);
        assert!(m.process(Some(170.0), 1001.0).counted());
        assert_eq!(m.rep_count(), 2);
    }

    #[test]
    fn test_clock_going_backwards_is_debounced() {
        let mut m = machine();
        m.process(Some(90.0), 10_000.0);
        m.process(Some(170.0), 10_100.0);
        // Timestamp source reset
        m.process(Some(90.0), 5.0);
        let outcome = m.process(Some(170.0), 50.0);
        assert_eq!(
            outcome,
            FrameOutcome::Advanced {
                phase: RepPhase::Ready,
                transitions: 2,
                event: Some(RepEvent::Rejected { since_last_ms: 0.0 }),
            }
        );
        assert_eq!(m.rep_count(), 1);
    }

    #[test]
    fn test_rep_duration_measured_from_leaving_ready() {
        let mut m = machine();
        m.process(Some(170.0), 0.0);
        m.process(Some(105.0), 1000.0);
        m.process(Some(90.0), 1500.0);
        let outcome = m.process(Some(170.0), 2600.0);
        assert_eq!(
            outcome,
            FrameOutcome::Advanced {
                phase: RepPhase::Ready,
                transitions: 2,
                event: Some(RepEvent::Counted {
                    count: 1,
                    duration_ms: 1600.0,
                }),
            }
        );
        assert_eq!(m.last_rep_duration_ms(), Some(1600.0));
    }

    #[test]
    fn test_two_phase_model() {
        let config = RepConfig {
            phase_model: PhaseModel::TwoPhase,
            ..Default::default()
        };
        let mut m = RepStateMachine::new(&config).unwrap();
        m.process(Some(105.0), 0.0);
        assert_eq!(m.phase(), RepPhase::Ready);
        assert_eq!(m.phase_label(), "UP");
        m.process(Some(95.0), 100.0);
        assert_eq!(m.phase(), RepPhase::Bottom);
        assert_eq!(m.phase_label(), "DOWN");
        m.process(Some(155.0), 200.0);
        assert_eq!(m.phase(), RepPhase::Bottom);
        m.process(Some(165.0), 300.0);
        assert_eq!(m.phase(), RepPhase::Ready);
        assert_eq!(m.rep_count(), 1);
    }

    #[test]
    fn test_reset() {
        let mut m = machine();
        feed(&mut m, &SQUAT, 0.0, 100.0);
        m.process(Some(90.0), 2000.0);
        m.reset();
        assert_eq!(m.phase(), RepPhase::Ready);
        assert_eq!(m.rep_count(), 0);
        assert_eq!(m.last_rep_at(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RepConfig {
            down_angle_threshold: 170.0,
            ..Default::default()
        };
        assert!(RepStateMachine::new(&config).is_err());
    }
}
