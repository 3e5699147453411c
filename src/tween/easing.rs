use std::f32::consts::PI;

/// # Easing
///
/// Progress curves mapping linear time `t` in `[0, 1]` to eased progress. Every curve starts at 0
/// and ends at 1; elastic and back curves overshoot in between.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,
    /// Quadratic, accelerating.
    QuadIn,
    /// Quadratic, decelerating.
    QuadOut,
    /// Quadratic, both.
    QuadInOut,
    /// Cubic, accelerating.
    CubicIn,
    /// Cubic, decelerating.
    CubicOut,
    /// Cubic, both.
    CubicInOut,
    /// Quartic, accelerating.
    QuartIn,
    /// Quartic, decelerating.
    QuartOut,
    /// Quartic, both.
    QuartInOut,
    /// Quintic, accelerating.
    QuintIn,
    /// Quintic, decelerating.
    QuintOut,
    /// Quintic, both.
    QuintInOut,
    /// Sinusoidal, accelerating.
    SineIn,
    /// Sinusoidal, decelerating.
    SineOut,
    /// Sinusoidal, both.
    SineInOut,
    /// Exponential, accelerating.
    ExpoIn,
    /// Exponential, decelerating.
    ExpoOut,
    /// Exponential, both.
    ExpoInOut,
    /// Circular, accelerating.
    CircIn,
    /// Circular, decelerating.
    CircOut,
    /// Circular, both.
    CircInOut,
    /// Elastic, accelerating.
    ElasticIn,
    /// Elastic, decelerating.
    ElasticOut,
    /// Elastic, both.
    ElasticInOut,
    /// Overshooting, accelerating.
    BackIn,
    /// Overshooting, decelerating.
    BackOut,
    /// Overshooting, both.
    BackInOut,
    /// Bouncing, accelerating.
    BounceIn,
    /// Bouncing, decelerating.
    BounceOut,
    /// Bouncing, both.
    BounceInOut,
}

const BACK: f32 = 1.70158;
const BACK_IN_OUT: f32 = BACK * 1.525;
const ELASTIC: f32 = (2.0 * PI) / 3.0;
const ELASTIC_IN_OUT: f32 = (2.0 * PI) / 4.5;

impl Easing {
    /// Every curve, in declaration order.
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::CircIn,
        Easing::CircOut,
        Easing::CircInOut,
        Easing::ElasticIn,
        Easing::ElasticOut,
        Easing::ElasticInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::BounceIn,
        Easing::BounceOut,
        Easing::BounceInOut,
    ];

    /// Applies the curve to `t`, clamped to `[0, 1]`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::QuintIn => t.powi(5),
            Easing::QuintOut => 1.0 - (1.0 - t).powi(5),
            Easing::QuintInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::ExpoIn => 2f32.powf(10.0 * t - 10.0),
            Easing::ExpoOut => 1.0 - 2f32.powf(-10.0 * t),
            Easing::ExpoInOut => {
                if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Easing::ElasticIn => {
                -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC).sin()
            }
            Easing::ElasticOut => {
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC).sin() + 1.0
            }
            Easing::ElasticInOut => {
                if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT).sin())
                        / 2.0
                } else {
                    (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT).sin())
                        / 2.0
                        + 1.0
                }
            }
            Easing::BackIn => (BACK + 1.0) * t * t * t - BACK * t * t,
            Easing::BackOut => {
                1.0 + (BACK + 1.0) * (t - 1.0).powi(3) + BACK * (t - 1.0).powi(2)
            }
            Easing::BackInOut => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_IN_OUT + 1.0) * 2.0 * t - BACK_IN_OUT)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_IN_OUT + 1.0) * (t * 2.0 - 2.0) + BACK_IN_OUT)
                        + 2.0)
                        / 2.0
                }
            }
            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn apply_endpoints_are_zero_and_one() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn apply_out_of_range_clamps() {
        for easing in Easing::ALL {
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(7.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn apply_in_out_curves_are_symmetric_at_half() {
        for easing in [
            Easing::QuadInOut,
            Easing::CubicInOut,
            Easing::QuartInOut,
            Easing::QuintInOut,
            Easing::SineInOut,
            Easing::ExpoInOut,
            Easing::CircInOut,
            Easing::BounceInOut,
        ] {
            assert_relative_eq!(easing.apply(0.5), 0.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn apply_polynomial_curves_are_monotonic() {
        for easing in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::CubicInOut,
            Easing::QuartOut,
            Easing::QuintIn,
            Easing::SineInOut,
            Easing::ExpoOut,
            Easing::CircIn,
        ] {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = easing.apply(step as f32 / 100.0);
                assert!(value >= previous, "{easing:?} at {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn apply_known_values() {
        assert_relative_eq!(Easing::QuadIn.apply(0.5), 0.25);
        assert_relative_eq!(Easing::CubicOut.apply(0.5), 0.875);
        assert_relative_eq!(Easing::BounceOut.apply(0.5), 0.765625);
        assert!(Easing::BackIn.apply(0.2) < 0.0);
        assert!(Easing::ElasticOut.apply(0.2) > 1.0);
    }
}
