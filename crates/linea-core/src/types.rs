use serde::{Deserialize, Serialize};

/// The kind of drawable an object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A filled dot.
    Point,
    /// A sampled path, possibly with gaps.
    Curve,
    /// A straight segment between two points.
    Line,
    /// Text or a typeset formula.
    Text,
    /// An ordered collection of other objects.
    Group,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Point => write!(f, "point"),
            ObjectKind::Curve => write!(f, "curve"),
            ObjectKind::Line => write!(f, "line"),
            ObjectKind::Text => write!(f, "text"),
            ObjectKind::Group => write!(f, "group"),
        }
    }
}

/// Rate function applied to a transition's local progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Sigmoid ease in and out.
    Smooth,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply the rate function to `t`, clamped to [0, 1]. Both endpoints are exact.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Easing::Linear => t,
            Easing::Smooth => {
                const INFLECTION: f64 = 10.0;
                let sigmoid = |x: f64| 1.0 / (1.0 + (-x).exp());
                let floor = sigmoid(-INFLECTION / 2.0);
                ((sigmoid(INFLECTION * (t - 0.5)) - floor) / (1.0 - 2.0 * floor)).clamp(0.0, 1.0)
            }
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::Smooth,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    #[test]
    fn test_easing_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
            assert_eq!(easing.apply(1.7), 1.0, "{:?}", easing);
            assert_eq!(easing.apply(-0.3), 0.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_easing_is_monotonic() {
        for easing in ALL {
            let samples: Vec<f64> = (0..=100).map(|i| easing.apply(i as f64 / 100.0)).collect();
            assert!(samples.windows(2).all(|w| w[0] <= w[1]), "{:?}", easing);
        }
    }

    #[test]
    fn test_smooth_is_symmetric() {
        let e = Easing::Smooth;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-9);
        assert!((e.apply(0.2) + e.apply(0.8) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_object_kind_display() {
        assert_eq!(ObjectKind::Curve.to_string(), "curve");
        assert_eq!(ObjectKind::Group.to_string(), "group");
    }
}
