//! Domain-to-pixel scale mappers

use chrono::{DateTime, Utc};

/// Linear interpolation from a numeric domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    d0: f64,
    r0: f64,
    slope: f64,
}

impl LinearScale {
    /// A degenerate domain (`d0 == d1`) is treated as spanning 1 unit
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (d0, d1) = domain;
        let (r0, r1) = range;
        let span = d1 - d0;
        let span = if span == 0.0 || !span.is_finite() { 1.0 } else { span };
        LinearScale {
            d0,
            r0,
            slope: (r1 - r0) / span,
        }
    }

    pub fn map(&self, x: f64) -> f64 {
        self.r0 + (x - self.d0) * self.slope
    }
}

/// A value a [`TimeScale`] can place: a timestamp or an epoch-millisecond number
pub trait TimeValue {
    fn epoch_millis(&self) -> f64;
}

impl TimeValue for DateTime<Utc> {
    fn epoch_millis(&self) -> f64 {
        self.timestamp_millis() as f64
    }
}

impl TimeValue for f64 {
    fn epoch_millis(&self) -> f64 {
        *self
    }
}

impl TimeValue for i64 {
    fn epoch_millis(&self) -> f64 {
        *self as f64
    }
}

impl<T: TimeValue + ?Sized> TimeValue for &T {
    fn epoch_millis(&self) -> f64 {
        (**self).epoch_millis()
    }
}

/// Linear scale over a time domain; endpoints are converted once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> Self {
        let d0 = domain.0.epoch_millis();
        let d1 = domain.1.epoch_millis();
        TimeScale {
            linear: LinearScale::new((d0, d1), range),
        }
    }

    pub fn map(&self, x: impl TimeValue) -> f64 {
        self.linear.map(x.epoch_millis())
    }
}
