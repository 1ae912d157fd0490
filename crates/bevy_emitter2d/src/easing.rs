//! Easing curves used to drive particle properties over a particle's age.
//!
//! Every curve follows the classic `(t, b, c, d)` contract: `t` is the
//! elapsed time, `b` the start value, `c` the change in value and `d` the
//! total duration. The result equals `b` at `t == 0` and `b + c` at `t == d`.

use std::f32::consts::PI;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

const BACK_OVERSHOOT: f32 = 1.70158;

/// Named easing curve. The declaration order is stable and is used when an
/// easing is persisted by index.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum Easing {
    #[default]
    Linear,
    SineIn,
    SineOut,
    SineInOut,
    CircIn,
    CircOut,
    CircInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    BackIn,
    BackOut,
    BackInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
}

impl Easing {
    pub const ALL: [Self; 25] = [
        Self::Linear,
        Self::SineIn,
        Self::SineOut,
        Self::SineInOut,
        Self::CircIn,
        Self::CircOut,
        Self::CircInOut,
        Self::CubicIn,
        Self::CubicOut,
        Self::CubicInOut,
        Self::QuadIn,
        Self::QuadOut,
        Self::QuadInOut,
        Self::ExpoIn,
        Self::ExpoOut,
        Self::ExpoInOut,
        Self::BackIn,
        Self::BackOut,
        Self::BackInOut,
        Self::BounceIn,
        Self::BounceOut,
        Self::BounceInOut,
        Self::ElasticIn,
        Self::ElasticOut,
        Self::ElasticInOut,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::SineIn => "Sine In",
            Self::SineOut => "Sine Out",
            Self::SineInOut => "Sine In/Out",
            Self::CircIn => "Circ In",
            Self::CircOut => "Circ Out",
            Self::CircInOut => "Circ In/Out",
            Self::CubicIn => "Cubic In",
            Self::CubicOut => "Cubic Out",
            Self::CubicInOut => "Cubic In/Out",
            Self::QuadIn => "Quad In",
            Self::QuadOut => "Quad Out",
            Self::QuadInOut => "Quad In/Out",
            Self::ExpoIn => "Expo In",
            Self::ExpoOut => "Expo Out",
            Self::ExpoInOut => "Expo In/Out",
            Self::BackIn => "Back In",
            Self::BackOut => "Back Out",
            Self::BackInOut => "Back In/Out",
            Self::BounceIn => "Bounce In",
            Self::BounceOut => "Bounce Out",
            Self::BounceInOut => "Bounce In/Out",
            Self::ElasticIn => "Elastic In",
            Self::ElasticOut => "Elastic Out",
            Self::ElasticInOut => "Elastic In/Out",
        }
    }

    /// Position of this curve in [`Easing::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|e| e == self)
            .unwrap_or_default()
    }

    /// Inverse of [`Easing::index`]; out-of-range indices fall back to linear.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    /// Evaluate the curve at elapsed time `t` for start value `b`, change `c`
    /// and duration `d`. A non-positive duration yields the end value.
    pub fn ease(self, t: f32, b: f32, c: f32, d: f32) -> f32 {
        if d <= 0.0 {
            return b + c;
        }

        match self {
            Self::Linear => c * t / d + b,

            Self::SineIn => -c * (t / d * (PI / 2.0)).cos() + c + b,
            Self::SineOut => c * (t / d * (PI / 2.0)).sin() + b,
            Self::SineInOut => -c / 2.0 * ((PI * t / d).cos() - 1.0) + b,

            Self::CircIn => {
                let t = t / d;
                -c * ((1.0 - t * t).max(0.0).sqrt() - 1.0) + b
            }
            Self::CircOut => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).max(0.0).sqrt() + b
            }
            Self::CircInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    -c / 2.0 * ((1.0 - t * t).max(0.0).sqrt() - 1.0) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * ((1.0 - t * t).max(0.0).sqrt() + 1.0) + b
                }
            }

            Self::CubicIn => {
                let t = t / d;
                c * t * t * t + b
            }
            Self::CubicOut => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            Self::CubicInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t * t + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * t + 2.0) + b
                }
            }

            Self::QuadIn => {
                let t = t / d;
                c * t * t + b
            }
            Self::QuadOut => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            Self::QuadInOut => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t + b
                } else {
                    -c / 2.0 * ((t - 1.0) * (t - 3.0) - 1.0) + b
                }
            }

            Self::ExpoIn => {
                if t == 0.0 {
                    b
                } else {
                    c * 2f32.powf(10.0 * (t / d - 1.0)) + b
                }
            }
            Self::ExpoOut => {
                if t == d {
                    b + c
                } else {
                    c * (1.0 - 2f32.powf(-10.0 * t / d)) + b
                }
            }
            Self::ExpoInOut => {
                if t == 0.0 {
                    return b;
                }
                if t == d {
                    return b + c;
                }
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * 2f32.powf(10.0 * (t - 1.0)) + b
                } else {
                    c / 2.0 * (2.0 - 2f32.powf(-10.0 * (t - 1.0))) + b
                }
            }

            Self::BackIn => {
                let s = BACK_OVERSHOOT;
                let t = t / d;
                c * t * t * ((s + 1.0) * t - s) + b
            }
            Self::BackOut => {
                let s = BACK_OVERSHOOT;
                let t = t / d - 1.0;
                c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
            }
            Self::BackInOut => {
                let s = BACK_OVERSHOOT * 1.525;
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
                }
            }

            Self::BounceIn => c - bounce_out(d - t, 0.0, c, d) + b,
            Self::BounceOut => bounce_out(t, b, c, d),
            Self::BounceInOut => {
                if t < d / 2.0 {
                    (c - bounce_out(d - t * 2.0, 0.0, c, d)) * 0.5 + b
                } else {
                    bounce_out(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
                }
            }

            Self::ElasticIn => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                let t = t - 1.0;
                let post = c * 2f32.powf(10.0 * t);
                -(post * ((t * d - s) * (2.0 * PI) / p).sin()) + b
            }
            Self::ElasticOut => {
                if t == 0.0 {
                    return b;
                }
                let t = t / d;
                if t == 1.0 {
                    return b + c;
                }
                let p = d * 0.3;
                let s = p / 4.0;
                c * 2f32.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
            }
            Self::ElasticInOut => {
                if t == 0.0 {
                    return b;
                }
                let t = t / (d / 2.0);
                if t == 2.0 {
                    return b + c;
                }
                let p = d * (0.3 * 1.5);
                let s = p / 4.0;
                let t = t - 1.0;
                if t < 0.0 {
                    let post = c * 2f32.powf(10.0 * t);
                    -0.5 * (post * ((t * d - s) * (2.0 * PI) / p).sin()) + b
                } else {
                    let post = c * 2f32.powf(-10.0 * t);
                    post * ((t * d - s) * (2.0 * PI) / p).sin() * 0.5 + c + b
                }
            }
        }
    }
}

fn bounce_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_curve_hits_its_endpoints() {
        for easing in Easing::ALL {
            let start = easing.ease(0.0, 2.0, 3.0, 1.5);
            let end = easing.ease(1.5, 2.0, 3.0, 1.5);
            assert!((start - 2.0).abs() < 1e-3, "{} starts at {}", easing.label(), start);
            assert!((end - 5.0).abs() < 1e-3, "{} ends at {}", easing.label(), end);
        }
    }

    #[test]
    fn linear_midpoint() {
        assert!((Easing::Linear.ease(0.5, 0.0, 1.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((Easing::Linear.ease(2.0, 10.0, -10.0, 4.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn symmetric_in_out_curves_pass_through_midpoint() {
        for easing in [
            Easing::SineInOut,
            Easing::CubicInOut,
            Easing::QuadInOut,
            Easing::CircInOut,
        ] {
            let mid = easing.ease(1.0, 0.0, 1.0, 2.0);
            assert!((mid - 0.5).abs() < 1e-3, "{} mid = {}", easing.label(), mid);
        }
    }

    #[test]
    fn zero_duration_returns_end_value() {
        assert_eq!(Easing::QuadIn.ease(0.0, 1.0, 4.0, 0.0), 5.0);
    }

    #[test]
    fn index_round_trips() {
        for (i, easing) in Easing::ALL.iter().enumerate() {
            assert_eq!(easing.index(), i);
            assert_eq!(Easing::from_index(i), *easing);
        }
        assert_eq!(Easing::from_index(999), Easing::Linear);
    }
}
