//! Chart renderers: aggregated rows plus dimensions in, [`Scene`] out
//!
//! [`Scene`]: crate::scene::Scene

pub mod pass_fail;
pub mod xp_by_project;
pub mod xp_over_time;

pub use pass_fail::PassFailDonut;
pub use xp_by_project::XpByProjectChart;
pub use xp_over_time::{HoverReadout, HoverState, XpOverTimeChart};

/// Space reserved around a plot area for axes and labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Padding {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn zero() -> Self {
        Padding::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Plot width and height left inside `width` x `height`, never negative
    pub fn inner(&self, width: f64, height: f64) -> (f64, f64) {
        (
            (width - self.left - self.right).max(0.0),
            (height - self.top - self.bottom).max(0.0),
        )
    }
}

/// `count` evenly spaced fractions from 0 to 1 inclusive
pub(crate) fn tick_fractions(count: usize) -> Vec<f64> {
    let steps = count.saturating_sub(1).max(1) as f64;
    (0..count).map(|i| i as f64 / steps).collect()
}
