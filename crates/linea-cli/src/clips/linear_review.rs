//! Review of `y = mx + b`: a short gallery of functions, then slope and
//! intercept trackers driving the line and every label that quotes them.

use linea_core::{BoundingBox, Color, LineaError, LineaResult, ObjectId, Point2D};
use linea_ir::{AnimationStep, Axes, AxisRange, DrawableObject, Script, ScriptBuilder, Transition};

use super::{clipped_plot, layout, text};

const M0: f64 = 0.8;
const B0: f64 = 1.5;
/// Run of the slope triangle, in x units.
const RUN: f64 = 1.0;
const TRIANGLE_X: f64 = 1.0;
const PINK: Color = Color::rgb(0.81961, 0.27843, 0.74118);

type Gallery = [(fn(f64) -> f64, &'static str, Color); 4];

const GALLERY: Gallery = [
    (|x| x.powi(3) / 4.0, "y = x^3 / 4", Color::RED),
    (|x| (x / 2.0).exp() - 1.0, "y = e^(x/2) - 1", Color::GREEN),
    (|x| 2.0 * x.sin(), "y = 2 sin(x)", Color::BLUE),
    (|x| M0 * x + B0, "y = mx + b", Color::YELLOW),
];

fn signed(value: f64, precision: usize) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{} {:.*}", sign, precision, value.abs())
}

/// Rise/run legs under the line, starting at `TRIANGLE_X`.
fn slope_triangle(axes: &Axes, m: f64, b: f64) -> DrawableObject {
    let y0 = m * TRIANGLE_X + b;
    DrawableObject::polyline(vec![
        axes.c2p(TRIANGLE_X, y0),
        axes.c2p(TRIANGLE_X + RUN, y0),
        axes.c2p(TRIANGLE_X + RUN, y0 + m * RUN),
    ])
    .with_color(Color::WHITE)
    .with_stroke_width(2.0)
}

pub fn build() -> LineaResult<Script> {
    let mut b = ScriptBuilder::new("linear-review");

    let title = b.declare(text("Linear Regression", Point2D::ORIGIN, 1.5));
    b.play(AnimationStep::new(1.0).with(Transition::FadeIn(title)).then_wait(1.0));
    b.play(AnimationStep::new(1.0).with(Transition::FadeOut(title)).then_wait(0.5));

    let axes = Axes::new(
        AxisRange::new(-4.0, 4.0, 1.0),
        AxisRange::new(-3.0, 6.0, 1.0),
        8.0,
        6.0,
    );
    let drawn = axes.build(Color::WHITE);
    b.declare_all(drawn.parts);
    let axes_id = b.declare(drawn.group);
    let (x_label, y_label) = axes.axis_labels("x", "y");
    let axis_labels = [b.declare(x_label), b.declare(y_label)];
    let axis_labels = b.group(&axis_labels);
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::Create(axes_id))
            .with(Transition::Write(axis_labels))
            .then_wait(0.5),
    );

    // Each function replaces the previous one; the last is the line.
    let mut shown: Option<(ObjectId, ObjectId)> = None;
    for (i, (f, equation, color)) in GALLERY.iter().enumerate() {
        let graph = b.declare(clipped_plot(&axes, f).with_color(*color));
        let label = b.declare(text(*equation, layout::UPPER_LEFT, 0.8).with_color(*color));
        let step = match shown {
            Some((old_graph, old_label)) => AnimationStep::new(1.0)
                .with(Transition::replace(old_graph, graph))
                .with(Transition::replace(old_label, label)),
            None => AnimationStep::new(1.0)
                .with(Transition::Create(graph))
                .with(Transition::Write(label)),
        };
        b.play(step.then_wait(if i + 1 < GALLERY.len() { 1.5 } else { 0.5 }));
        shown = Some((graph, label));
    }
    let (static_line, static_equation) =
        shown.ok_or_else(|| LineaError::Validation("empty function gallery".into()))?;

    b.play(
        AnimationStep::new(1.0)
            .with(Transition::set_stroke_width(static_line, 6.0))
            .then_wait(1.0),
    );

    let m = b.tracker("m", M0);
    let c = b.tracker("b", B0);

    let line = b.bind(&[m, c], move |v| {
        clipped_plot(&axes, |x| v[0] * x + v[1])
            .with_color(Color::YELLOW)
            .with_stroke_width(6.0)
    })?;
    // Hand the static line over to its tracker-driven twin without a visible cut.
    b.play(
        AnimationStep::new(0.0)
            .with(Transition::Remove(static_line))
            .with(Transition::Add(line)),
    );

    let triangle = b.bind(&[m, c], move |v| slope_triangle(&axes, v[0], v[1]))?;
    let slope_label = b.bind(&[m, c], move |v| {
        let rise = v[0] * RUN;
        let above = slope_triangle(&axes, v[0], v[1]).shape.bounds();
        let label = text(
            format!("m = rise / run = {:.2} / {:.1} = {:.2}", rise, RUN, v[0]),
            Point2D::ORIGIN,
            0.7,
        );
        match above {
            Some(bounds) => label.next_to(&bounds, Point2D::UP, 0.2),
            None => label,
        }
    })?;
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::Create(triangle))
            .with(Transition::Write(slope_label))
            .then_wait(3.0),
    );

    let equation_with_m = b.bind(&[m], |v| {
        text(format!("y = {:.2}x + b", v[0]), layout::UPPER_LEFT, 0.8)
            .with_color(Color::YELLOW)
            .with_z_index(1)
    })?;
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::replace(static_equation, equation_with_m))
            .then_wait(1.5),
    );

    let dot = b.bind(&[c], move |v| {
        DrawableObject::point(axes.c2p(0.0, v[0]))
            .with_color(PINK)
            .with_z_index(2)
    })?;
    let intercept_label = b.bind(&[c], move |v| {
        let at = axes.c2p(0.0, v[0]);
        let side = if v[0] >= 0.0 { Point2D::RIGHT } else { Point2D::LEFT };
        let bounds = BoundingBox::around(at, 0.2, 0.2);
        text(format!("b = y-intercept = {:.1}", v[0]), at, 0.7).next_to(&bounds, side, 0.2)
    })?;
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeIn(dot))
            .with(Transition::Write(intercept_label))
            .then_wait(3.0),
    );

    let equation = b.bind(&[m, c], |v| {
        text(
            format!("y = {:.2}x {}", v[0], signed(v[1], 1)),
            layout::UPPER_LEFT,
            0.8,
        )
        .with_color(Color::YELLOW)
        .with_z_index(1)
    })?;
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::replace(equation_with_m, equation))
            .then_wait(1.5),
    );

    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(dot))
            .with(Transition::FadeOut(intercept_label))
            .then_wait(0.5),
    );

    let slope_caption = b.declare(text("Changing slope 'm'", layout::LOWER_RIGHT, 0.6));
    b.play_one(Transition::Write(slope_caption), 1.0);
    b.play(AnimationStep::new(2.0).with(Transition::set_value(m, 1.6)).then_wait(1.0));
    b.play(AnimationStep::new(2.0).with(Transition::set_value(m, -1.0)).then_wait(1.0));
    b.play_one(Transition::set_value(m, M0), 1.0);
    b.play(AnimationStep::new(1.0).with(Transition::FadeOut(slope_caption)).then_wait(0.5));

    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(triangle))
            .with(Transition::FadeOut(slope_label))
            .then_wait(0.5),
    );

    let intercept_caption = b.declare(text("Changing intercept 'b'", layout::LOWER_RIGHT, 0.6));
    b.play_one(Transition::Write(intercept_caption), 1.0);
    b.play(AnimationStep::new(2.0).with(Transition::set_value(c, 4.0)).then_wait(0.5));
    b.play(AnimationStep::new(3.0).with(Transition::set_value(c, -1.0)).then_wait(0.5));
    b.play_one(Transition::set_value(c, B0), 2.0);
    b.play(AnimationStep::new(1.0).with(Transition::FadeOut(intercept_caption)).then_wait(1.0));

    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(line))
            .with(Transition::FadeOut(equation))
            .with(Transition::FadeOut(axes_id))
            .with(Transition::FadeOut(axis_labels))
            .then_wait(1.0),
    );

    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_anim::{FrameRecorder, Runner};

    #[test]
    fn test_signed_formats_both_signs() {
        assert_eq!(signed(1.5, 1), "+ 1.5");
        assert_eq!(signed(-1.0, 1), "- 1.0");
    }

    #[test]
    fn test_slope_triangle_rises_by_m() {
        let axes = Axes::new(
            AxisRange::new(-4.0, 4.0, 1.0),
            AxisRange::new(-3.0, 6.0, 1.0),
            8.0,
            6.0,
        );
        let triangle = slope_triangle(&axes, 2.0, 1.0);
        let outline = triangle.shape.outline();
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0], axes.c2p(1.0, 3.0));
        assert_eq!(outline[2], axes.c2p(2.0, 5.0));
    }

    #[test]
    fn test_equation_quotes_trackers_while_sweeping() {
        let script = build().unwrap();
        let mut recorder = FrameRecorder::new();
        Runner::default()
            .with_fps(5.0)
            .unwrap()
            .run(&script, &mut recorder)
            .unwrap();

        let all: Vec<String> = recorder
            .frames
            .iter()
            .flat_map(|f| f.texts().map(str::to_string))
            .collect();
        assert!(all.iter().any(|t| t == "y = -1.00x + 1.5"));
        assert!(all.iter().any(|t| t == "y = 0.80x - 1.0"));
        assert!(all.iter().any(|t| t == "m = rise / run = 1.60 / 1.0 = 1.60"));
        assert!(all.iter().any(|t| t == "b = y-intercept = 1.5"));
        assert!(recorder.last().unwrap().items.is_empty());
    }
}
