//! Residual geometry: how far each observed point sits from a candidate line.

use linea_core::{Color, LineaResult, ObjectId, TrackerId};
use linea_ir::{Axes, DrawableObject, ScriptBuilder};

/// Squares never collapse completely, so a perfect fit still shows a mark.
pub const MIN_SIDE: f64 = 0.01;

/// Dashed vertical segment from the fitted value up (or down) to the observation.
pub fn residual_line(axes: &Axes, (x, y): (f64, f64), m: f64, b: f64) -> DrawableObject {
    let predicted = m * x + b;
    DrawableObject::dashed_line(axes.c2p(x, predicted), axes.c2p(x, y))
        .with_color(Color::GRAY)
        .with_stroke_width(2.0)
}

/// Square with side `|residual|`, centered halfway between fit and observation.
pub fn residual_square(axes: &Axes, (x, y): (f64, f64), m: f64, b: f64) -> DrawableObject {
    let predicted = m * x + b;
    let (_, unit) = axes.unit_size();
    let side = (y - predicted).abs().max(MIN_SIDE) * unit;
    DrawableObject::square(axes.c2p(x, (y + predicted) / 2.0), side)
        .with_color(Color::BLUE)
        .with_fill_opacity(0.5)
}

pub fn residual_lines(axes: &Axes, points: &[(f64, f64)], m: f64, b: f64) -> Vec<DrawableObject> {
    points.iter().map(|p| residual_line(axes, *p, m, b)).collect()
}

pub fn residual_squares(axes: &Axes, points: &[(f64, f64)], m: f64, b: f64) -> Vec<DrawableObject> {
    points.iter().map(|p| residual_square(axes, *p, m, b)).collect()
}

/// One bound square per point over the `[slope, intercept]` trackers.
/// Returns the slots in point order.
pub fn bind_squares(
    builder: &mut ScriptBuilder,
    axes: &Axes,
    points: &[(f64, f64)],
    slope: TrackerId,
    intercept: TrackerId,
) -> LineaResult<Vec<ObjectId>> {
    points
        .iter()
        .map(|point| {
            let axes = *axes;
            let point = *point;
            builder.bind(&[slope, intercept], move |v| {
                residual_square(&axes, point, v[0], v[1])
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_ir::{AxisRange, Shape};

    fn axes() -> Axes {
        Axes::new(
            AxisRange::new(0.0, 7.0, 1.0),
            AxisRange::new(0.0, 7.0, 1.0),
            7.0,
            7.0,
        )
    }

    #[test]
    fn test_residual_line_spans_fit_to_observation() {
        let axes = axes();
        let line = residual_line(&axes, (2.0, 5.0), 1.0, 1.0);
        assert!(line.style.dashed);
        match line.shape {
            Shape::Line { start, end } => {
                assert_eq!(start, axes.c2p(2.0, 3.0));
                assert_eq!(end, axes.c2p(2.0, 5.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_square_side_is_absolute_residual() {
        let axes = axes();
        let below = residual_square(&axes, (2.0, 1.0), 1.0, 1.0);
        let bounds = below.shape.bounds().unwrap();
        assert!((bounds.width() - 2.0).abs() < 1e-12);
        assert!((bounds.center().y - axes.c2p(2.0, 2.0).y).abs() < 1e-12);

        let exact = residual_square(&axes, (2.0, 3.0), 1.0, 1.0);
        assert!((exact.shape.bounds().unwrap().width() - MIN_SIDE).abs() < 1e-12);
    }

    #[test]
    fn test_bound_squares_follow_trackers() {
        let axes = axes();
        let points = [(1.0, 2.0), (3.0, 3.0)];
        let mut b = ScriptBuilder::new("squares");
        let m = b.tracker("m", 0.0);
        let c = b.tracker("b", 2.0);
        let slots = bind_squares(&mut b, &axes, &points, m, c).unwrap();
        assert_eq!(slots.len(), 2);

        let script = b.build();
        let mut trackers = script.trackers.clone();
        trackers.set(c, 0.0).unwrap();
        let square = script.bindings.evaluate(slots[1], &trackers).unwrap().unwrap();
        assert_eq!(square.id, slots[1]);
        let bounds = square.shape.bounds().unwrap();
        assert!((bounds.width() - 3.0).abs() < 1e-12);
        assert!(bounds.center().distance(&axes.c2p(3.0, 1.5)) < 1e-12);
    }
}
