//! One Euro Filter - adaptive low-pass filter for angle jitter
//!
//! Smooth when the joint is still, responsive while the athlete moves.
//! Applied to the aggregated joint angle before the rep state machine.

use std::f32::consts::PI;

use super::config::SmoothingConfig;

/// Adaptive low-pass filter over a scalar signal (degrees)
pub struct OneEuroFilter {
    /// Minimum cutoff frequency (Hz) - lower = smoother at rest
    min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    beta: f32,
    /// Derivative cutoff frequency (Hz)
    d_cutoff: f32,

    // State
    x_prev: f32,
    dx_prev: f32,
    t_prev_ms: f64,
    initialized: bool,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f32, beta: f32) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff: 1.0,
            x_prev: 0.0,
            dx_prev: 0.0,
            t_prev_ms: 0.0,
            initialized: false,
        }
    }

    pub fn from_config(config: &SmoothingConfig) -> Self {
        Self::new(config.min_cutoff, config.beta)
    }

    fn smoothing_factor(t_e: f32, cutoff: f32) -> f32 {
        let r = 2.0 * PI * cutoff * t_e;
        r / (r + 1.0)
    }

    /// Filter a single sample
    ///
    /// - `t_ms`: timestamp in milliseconds
    /// - `x`: raw angle in degrees
    ///
    /// Non-increasing timestamps return the previous output unchanged.
    pub fn filter(&mut self, t_ms: f64, x: f32) -> f32 {
        if !self.initialized {
            self.x_prev = x;
            self.t_prev_ms = t_ms;
            self.initialized = true;
            return x;
        }

        let t_e = ((t_ms - self.t_prev_ms) / 1000.0) as f32;
        if t_e <= 0.0 {
            return self.x_prev;
        }

        // Derivative estimate (deg/s)
        let a_d = Self::smoothing_factor(t_e, self.d_cutoff);
        let dx = (x - self.x_prev) / t_e;
        let dx_hat = a_d * dx + (1.0 - a_d) * self.dx_prev;

        // More smoothing when slow, less when fast
        let cutoff = self.min_cutoff + self.beta * dx_hat.abs();
        let a = Self::smoothing_factor(t_e, cutoff);
        let x_hat = a * x + (1.0 - a) * self.x_prev;

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        self.t_prev_ms = t_ms;

        x_hat
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.initialized = false;
        self.dx_prev = 0.0;
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::from_config(&SmoothingConfig::default())
    }
}
