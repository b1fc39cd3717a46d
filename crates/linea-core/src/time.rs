use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Authored duration, stored as fractional seconds. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration {
    seconds: f64,
}

impl Duration {
    /// Negative and NaN inputs collapse to zero.
    pub fn from_seconds(s: f64) -> Self {
        Self {
            seconds: if s.is_nan() { 0.0 } else { s.max(0.0) },
        }
    }

    pub fn from_millis(ms: f64) -> Self {
        Self::from_seconds(ms / 1000.0)
    }

    pub const fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0.0
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Mul<f64> for Duration {
    type Output = Duration;
    fn mul(self, rhs: f64) -> Duration {
        Duration::from_seconds(self.seconds * rhs)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds < 1.0 {
            write!(f, "{:.0}ms", self.seconds * 1000.0)
        } else {
            write!(f, "{:.2}s", self.seconds)
        }
    }
}

/// Converts authored durations into frame ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// Non-positive or non-finite rates fall back to 1 fps so the clock always advances.
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 1.0 };
        Self { fps }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Number of ticks needed to cover `d`. A non-zero duration always gets
    /// at least one tick.
    pub fn ticks(&self, d: Duration) -> u64 {
        if d.is_zero() {
            return 0;
        }
        // Trim float noise so 1.0s at 30fps is 30 ticks rather than 31.
        let raw = d.as_seconds() * self.fps;
        let ticks = (raw - 1e-9).ceil();
        ticks.max(1.0) as u64
    }

    /// Sample times inside `d` for ticks 1..=n. The last sample is exactly `d`.
    pub fn sample_times(&self, d: Duration) -> Vec<f64> {
        let n = self.ticks(d);
        (1..=n)
            .map(|k| {
                if k == n {
                    d.as_seconds()
                } else {
                    (k as f64 / self.fps).min(d.as_seconds())
                }
            })
            .collect()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_clamps_negative_and_nan() {
        assert_eq!(Duration::from_seconds(-2.0), Duration::zero());
        assert_eq!(Duration::from_seconds(f64::NAN), Duration::zero());
        assert!((Duration::from_millis(250.0).as_seconds() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(Duration::from_seconds(2.5).to_string(), "2.50s");
        assert_eq!(Duration::from_millis(500.0).to_string(), "500ms");
    }

    #[test]
    fn test_clock_ticks() {
        let clock = FrameClock::new(30.0);
        assert_eq!(clock.ticks(Duration::from_seconds(1.0)), 30);
        assert_eq!(clock.ticks(Duration::from_seconds(0.8)), 24);
        assert_eq!(clock.ticks(Duration::from_seconds(0.01)), 1);
        assert_eq!(clock.ticks(Duration::zero()), 0);
    }

    #[test]
    fn test_sample_times_end_exactly_on_duration() {
        let clock = FrameClock::new(30.0);
        let d = Duration::from_seconds(0.7);
        let times = clock.sample_times(d);
        assert_eq!(times.len(), 21);
        assert_eq!(*times.last().unwrap(), 0.7);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_clock_rejects_bad_fps() {
        assert_eq!(FrameClock::new(0.0).fps(), 1.0);
        assert_eq!(FrameClock::new(f64::INFINITY).fps(), 1.0);
    }
}
