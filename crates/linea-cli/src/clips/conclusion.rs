use linea_core::{BoundingBox, Color, LineaResult, Point2D};
use linea_ir::{AnimationStep, DrawableObject, Script, ScriptBuilder, Transition};

use super::{frame_box, layout, text};

const TAKEAWAYS: [&str; 3] = [
    "1. Linear regression models the relationship between variables.",
    "2. Best fit line minimizes the sum of squared errors (SSR).",
    "3. OLS provides closed form solutions for slope and intercept.",
];

/// Pause after each takeaway.
const READING_TIME: [f64; 3] = [2.5, 2.5, 3.0];

pub fn build() -> LineaResult<Script> {
    let mut b = ScriptBuilder::new("conclusion");

    let title = b.declare(text("Linear Regression: Key Takeaways", layout::TOP, 1.0));
    b.play(AnimationStep::new(1.0).with(Transition::Write(title)).then_wait(1.0));

    let mut points = Vec::with_capacity(TAKEAWAYS.len());
    for (i, (line, pause)) in TAKEAWAYS.iter().zip(READING_TIME).enumerate() {
        let at = Point2D::new(0.0, 1.9 - 1.0 * i as f64);
        let point = b.declare(text(*line, at, 0.7));
        b.play(AnimationStep::new(1.0).with(Transition::FadeIn(point)).then_wait(pause));
        points.push(point);
    }
    let points = b.group(&points);

    let formulas: Vec<DrawableObject> = [
        "m = sum (x_i - x_mean)(y_i - y_mean) / sum (x_i - x_mean)^2",
        "b = y_mean - m x_mean",
    ]
    .iter()
    .enumerate()
    .map(|(i, f)| text(*f, layout::BOTTOM + Point2D::new(0.0, 0.7 - 0.5 * i as f64), 0.6))
    .collect();
    let around = formulas
        .iter()
        .filter_map(|f| f.shape.bounds())
        .reduce(|a, c| a.union(&c))
        .unwrap_or_else(|| BoundingBox::around(layout::BOTTOM, 1.0, 1.0));
    let mut boxed = b.declare_all(formulas);
    boxed.push(b.declare(frame_box(&around, 0.2).with_color(Color::BLUE)));
    let boxed = b.group(&boxed);
    b.play(AnimationStep::new(1.0).with(Transition::FadeIn(boxed)).then_wait(3.0));

    b.play(AnimationStep::new(1.5).with_all([points, boxed, title].map(Transition::FadeOut)));

    let thanks = b.declare(text("Thank you!", Point2D::ORIGIN, 1.2).with_color(Color::BLUE));
    b.play(AnimationStep::new(1.0).with(Transition::Write(thanks)).then_wait(2.0));
    b.play(AnimationStep::new(1.0).with(Transition::FadeOut(thanks)).then_wait(1.0));

    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_anim::{FrameRecorder, Runner};

    #[test]
    fn test_takeaways_accumulate_before_the_closing_card() {
        let script = build().unwrap();
        let mut recorder = FrameRecorder::new();
        let report = Runner::default()
            .with_fps(2.0)
            .unwrap()
            .run(&script, &mut recorder)
            .unwrap();
        assert!((report.seconds - 23.5).abs() < 1e-9);

        let most = recorder
            .frames
            .iter()
            .map(|f| f.texts().filter(|t| TAKEAWAYS.contains(t)).count())
            .max();
        assert_eq!(most, Some(3));
        let thanks_alone = recorder
            .frames
            .iter()
            .any(|f| f.texts().collect::<Vec<_>>() == ["Thank you!"]);
        assert!(thanks_alone);
    }
}
