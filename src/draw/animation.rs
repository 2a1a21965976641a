//! Timed scroll animations

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// CSS-style cubic bezier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    pub const FAST_OUT_SLOW_IN: Easing = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);

    /// Map linear progress `t` in `[0, 1]` to eased progress
    pub fn transform(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::CubicBezier(x1, y1, x2, y2) => {
                if t <= 0.0 || t >= 1.0 {
                    return t;
                }
                let s = solve_bezier_parameter(x1 as f64, x2 as f64, t);
                bezier(y1 as f64, y2 as f64, s)
            }
        }
    }
}

fn bezier(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find `s` with `x(s) == x`; x is monotonic for control points in `[0, 1]`
fn solve_bezier_parameter(x1: f64, x2: f64, x: f64) -> f64 {
    let mut s = x;
    for _ in 0..8 {
        let error = bezier(x1, x2, s) - x;
        if error.abs() < 1e-7 {
            return s;
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= error / slope;
    }

    let (mut low, mut high) = (0.0, 1.0);
    s = x;
    for _ in 0..64 {
        let value = bezier(x1, x2, s);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            low = s;
        } else {
            high = s;
        }
        s = (low + high) / 2.0;
    }
    s
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration: Duration,
    pub easing: Easing,
    /// Time between published frames
    pub frame_interval: Duration,
}

impl AnimationSpec {
    pub fn tween(duration: Duration) -> Self {
        Self {
            duration,
            easing: Easing::FAST_OUT_SLOW_IN,
            frame_interval: Duration::from_millis(16),
        }
    }

    /// Eased fraction of the distance covered `elapsed` into the animation
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.transform(t)
    }
}

/// Drive one timed animation, calling `frame` with eased progress until it reaches 1
pub async fn run_frames<F>(spec: &AnimationSpec, mut frame: F)
where
    F: FnMut(f64),
{
    let start = Instant::now();
    let mut ticker = tokio::time::interval(spec.frame_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let elapsed = start.elapsed();
        if elapsed >= spec.duration {
            frame(1.0);
            return;
        }
        frame(spec.progress(elapsed));
    }
}
