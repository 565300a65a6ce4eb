//! Rotation animation between a start angle and a planned target.
//!
//! The wheel decelerates along the standard fast-out/slow-in curve
//! (cubic bezier `0.4, 0, 0.2, 1`). Resynchronization uses [`Easing::Snap`],
//! which reaches the target on the first frame.

use std::time::Duration;

use log::debug;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(20_000);
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    FastOutSlowIn,
    Snap,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    pub fn apply(self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, progress),
            Easing::Snap => 1.0,
        }
    }
}

/// Solves the bezier for `t` at horizontal position `x`, then returns `y(t)`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let curve = |a: f64, b: f64, t: f64| {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    };
    let (mut lo, mut hi) = (0.0, 1.0);
    let mut t = x;
    for _ in 0..64 {
        let value = curve(x1, x2, t);
        if (value - x).abs() < 1e-9 {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    curve(y1, y2, t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl SpinAnimation {
    pub fn tween(from: f64, to: f64, duration: Duration) -> Self {
        SpinAnimation {
            from,
            to,
            duration,
            easing: Easing::FastOutSlowIn,
        }
    }

    pub fn snap(from: f64, to: f64) -> Self {
        SpinAnimation {
            from,
            to,
            duration: Duration::ZERO,
            easing: Easing::Snap,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.easing == Easing::Snap || elapsed >= self.duration
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }
}

/// Plays `animation` on the tokio clock, reporting each frame's rotation.
///
/// Resolves with the final rotation once it has been reported; the caller
/// then delivers the completion notification to the session.
pub async fn drive<F: FnMut(f64)>(animation: SpinAnimation, frame: Duration, mut on_frame: F) -> f64 {
    if animation.is_finished(Duration::ZERO) {
        on_frame(animation.to);
        return animation.to;
    }
    debug!(
        "animating {:.1} -> {:.1} over {:?}",
        animation.from, animation.to, animation.duration
    );
    let start = Instant::now();
    let mut ticker = time::interval(frame.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let elapsed = start.elapsed();
        on_frame(animation.value_at(elapsed));
        if animation.is_finished(elapsed) {
            return animation.to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints_and_monotonic() {
        let easing = Easing::FastOutSlowIn;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
        let mut previous = 0.0;
        for step in 1..=100 {
            let value = easing.apply(step as f64 / 100.0);
            assert!(value >= previous - 1e-9);
            previous = value;
        }
        // Front-loaded: more than half the travel done at the midpoint.
        assert!(easing.apply(0.5) > 0.7);
    }

    #[test]
    fn test_value_at_clamps_to_target() {
        let animation = SpinAnimation::tween(0.0, 3000.0, Duration::from_secs(20));
        assert_eq!(animation.value_at(Duration::ZERO), 0.0);
        assert_eq!(animation.value_at(Duration::from_secs(20)), 3000.0);
        assert_eq!(animation.value_at(Duration::from_secs(25)), 3000.0);
        let mid = animation.value_at(Duration::from_secs(10));
        assert!(mid > 1500.0 && mid < 3000.0);
    }

    #[test]
    fn test_snap_jumps_immediately() {
        let animation = SpinAnimation::snap(3000.0, 0.0);
        assert!(animation.is_finished(Duration::ZERO));
        assert_eq!(animation.value_at(Duration::ZERO), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_reports_frames_until_target() {
        let animation = SpinAnimation::tween(0.0, 3000.0, Duration::from_millis(200));
        let mut frames = Vec::new();
        let last = drive(animation, Duration::from_millis(16), |v| frames.push(v)).await;
        assert_eq!(last, 3000.0);
        assert_eq!(*frames.last().unwrap(), 3000.0);
        assert!(frames.len() > 5);
        assert!(frames.windows(2).all(|w| w[1] >= w[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_snap_single_frame() {
        let mut frames = Vec::new();
        let last = drive(SpinAnimation::snap(6240.0, 0.0), DEFAULT_FRAME_INTERVAL, |v| {
            frames.push(v)
        })
        .await;
        assert_eq!(last, 0.0);
        assert_eq!(frames, vec![0.0]);
    }
}
