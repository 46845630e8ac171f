//! Float curves for pull-down/pull-up animation progress.
//!
//! Keys are sampled over normalized time (0.0 = sequence start, 1.0 = end);
//! the sequence duration lives in `HandlingConfig`, so one curve shape can be
//! reused at any speed.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Piecewise-linear curve. Keys are kept sorted by time.
#[derive(Debug, Clone, PartialEq, Reflect, Deserialize)]
#[serde(from = "Vec<CurveKey>")]
pub struct FloatCurve {
    keys: Vec<CurveKey>,
}

impl From<Vec<CurveKey>> for FloatCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl FloatCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    pub fn from_points(points: &[(f32, f32)]) -> Self {
        Self::new(
            points
                .iter()
                .map(|&(time, value)| CurveKey { time, value })
                .collect(),
        )
    }

    /// 0 → 1 (weapon goes down)
    pub fn pull_down() -> Self {
        Self::from_points(&[(0.0, 0.0), (1.0, 1.0)])
    }

    /// 1 → 0 (weapon comes back up)
    pub fn pull_up() -> Self {
        Self::from_points(&[(0.0, 1.0), (1.0, 0.0)])
    }

    /// Down by the swap checkpoint, back up by the end.
    pub fn down_then_up(checkpoint: f32) -> Self {
        Self::from_points(&[(0.0, 0.0), (checkpoint, 1.0), (1.0, 0.0)])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Linear interpolation, clamped to the first/last key outside the range.
    /// An empty curve samples as 0.
    pub fn sample(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };

        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let alpha = (t - a.time) / span;
                return a.value + (b.value - a.value) * alpha;
            }
        }

        last.value
    }
}
