//! From "which line fits?" to ordinary least squares: a parameter search,
//! residuals, residuals squared, and the SSR shrinking as the trackers reach
//! the least-squares solution.

use linea_core::{BoundingBox, Color, LineaResult, ObjectId, Point2D};
use linea_ir::{AnimationStep, Axes, AxisRange, DrawableObject, Script, ScriptBuilder, Transition};

use super::{clipped_plot, frame_box, layout, text};
use crate::regression::{fit_line, ssr, LinearFit};
use crate::residuals::{bind_squares, residual_lines, residual_squares};

pub const XS: [f64; 8] = [1.0, 1.5, 2.5, 3.0, 4.0, 4.5, 5.5, 6.0];
pub const YS: [f64; 8] = [3.611, 2.870, 4.033, 5.393, 5.794, 3.868, 6.110, 5.579];

/// Hand-picked `(m, b)` guesses, ending on the poor fit examined below.
const SEARCH: [(f64, f64); 6] = [
    (0.9, 0.8),
    (1.2, 1.5),
    (0.5, 2.0),
    (0.8, 3.0),
    (0.4, 3.8),
    (0.2, 3.5),
];

fn points() -> Vec<(f64, f64)> {
    XS.iter().copied().zip(YS.iter().copied()).collect()
}

fn params_text(m: f64, b: f64, below: &BoundingBox) -> DrawableObject {
    text(format!("m = {:.1},  b = {:.1}", m, b), Point2D::ORIGIN, 0.7).next_to(
        below,
        Point2D::DOWN,
        0.3,
    )
}

/// The minimisation target, symbolic until `numeric` passes one half.
fn ssr_formula(m: f64, b: f64, numeric: f64) -> String {
    if numeric < 0.5 {
        "Minimize: SSR = sum (y_i - (m x_i + b))^2".to_string()
    } else {
        let value = ssr(&LinearFit::new(m, b), &XS, &YS);
        format!(
            "Minimize: SSR = sum (y_i - ({:.2} x_i + {:.2}))^2 = {:.2}",
            m, b, value
        )
    }
}

fn bounds_of(object: &DrawableObject) -> BoundingBox {
    object
        .shape
        .bounds()
        .unwrap_or_else(|| BoundingBox::around(Point2D::ORIGIN, 0.0, 0.0))
}

pub fn build() -> LineaResult<Script> {
    let mut b = ScriptBuilder::new("ols");
    let best = fit_line(&XS, &YS)?;
    let points = points();

    let title = b.declare(text("Fitting a Line: How to Choose?", Point2D::ORIGIN, 1.1));
    b.play(AnimationStep::new(1.0).with(Transition::Write(title)).then_wait(1.5));
    b.play(AnimationStep::new(1.0).with(Transition::FadeOut(title)).then_wait(0.5));

    let axes = Axes::new(
        AxisRange::new(0.0, 7.0, 1.0),
        AxisRange::new(0.0, 7.0, 1.0),
        7.0,
        5.5,
    )
    .shifted(Point2D::DOWN);
    let drawn = axes.build(Color::WHITE.with_alpha(0.5));
    b.declare_all(drawn.parts);
    let axes_id = b.declare(drawn.group);
    let (x_label, y_label) = axes.axis_labels("X", "Y");
    let x_label = b.declare(x_label);
    let y_label = b.declare(y_label);
    let centers: Vec<Point2D> = points.iter().map(|(x, y)| axes.c2p(*x, *y)).collect();
    let dot_bounds = BoundingBox::from_points(&centers)
        .unwrap_or_else(|| BoundingBox::around(axes.center, 1.0, 1.0));
    let dots = b.declare_all(
        centers
            .iter()
            .map(|p| DrawableObject::point(*p).with_color(Color::YELLOW)),
    );
    let dots = b.group(&dots);
    let plot = b.group(&[axes_id, x_label, y_label, dots]);
    b.play(AnimationStep::new(1.0).with(Transition::Create(plot)).then_wait(1.0));

    // Parameter search: each guess replaces the previous line and its caption.
    let search_text_obj = text("We choose parameters to fit this data...", layout::TOP, 0.6);
    let search_bounds = bounds_of(&search_text_obj);
    let search_text = b.declare(search_text_obj);
    b.play(AnimationStep::new(1.0).with(Transition::Write(search_text)).then_wait(0.5));

    let (m_first, b_first) = SEARCH[0];
    let mut line = b.declare(axes.line_graph(m_first, b_first).with_color(Color::YELLOW_D));
    let mut params = b.declare(params_text(m_first, b_first, &search_bounds));
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::Create(line))
            .with(Transition::Write(params))
            .then_wait(0.5),
    );
    for (m, c) in SEARCH.iter().skip(1) {
        let next_line = b.declare(axes.line_graph(*m, *c).with_color(Color::YELLOW_D));
        let next_params = b.declare(params_text(*m, *c, &search_bounds));
        b.play(
            AnimationStep::new(0.8)
                .with(Transition::replace(line, next_line))
                .with(Transition::replace(params, next_params))
                .then_wait(0.3),
        );
        line = next_line;
        params = next_params;
    }

    let (m_a, b_a) = SEARCH[SEARCH.len() - 1];
    let line_a_obj = axes.line_graph(m_a, b_a).with_color(Color::RED);
    let line_a_bounds = bounds_of(&line_a_obj);
    let line_a = b.declare(line_a_obj);
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(search_text))
            .with(Transition::FadeOut(params))
            .with(Transition::replace(line, line_a))
            .then_wait(1.0),
    );

    let intro = b.declare(text(
        "Visually, it is easy to determine if a line is a good fit for a set of points.",
        layout::TOP,
        0.6,
    ));
    b.play(AnimationStep::new(1.0).with(Transition::Write(intro)).then_wait(1.5));

    let label_a_obj = text(format!("y = {:.1}x + {:.1}", m_a, b_a), Point2D::ORIGIN, 0.7)
        .with_color(Color::RED)
        .next_to(&line_a_bounds, Point2D::UP, 0.1);
    let label_a_bounds = bounds_of(&label_a_obj);
    let label_a = b.declare(label_a_obj);
    let good_fit = b.declare(
        text("Good Fit?", Point2D::ORIGIN, 0.6)
            .with_color(Color::RED)
            .next_to(&label_a_bounds, Point2D::RIGHT, 0.25),
    );
    let residuals_a = b.declare_all(residual_lines(&axes, &points, m_a, b_a));
    let residuals_a = b.group(&residuals_a);
    b.play(
        AnimationStep::new(1.5)
            .with(Transition::Write(label_a))
            .with(Transition::Write(good_fit))
            .with(Transition::Create(residuals_a))
            .then_wait(1.0),
    );

    let definition_obj = text("These vertical lines are 'residuals'", Point2D::new(0.0, 2.4), 0.6);
    let definition_bounds = bounds_of(&definition_obj);
    let definition = b.declare(definition_obj);
    let residual_formula = b.declare(
        text(
            "e_i = y_i - (m x_i + b) = actual - predicted",
            Point2D::ORIGIN,
            0.7,
        )
        .next_to(&definition_bounds, Point2D::DOWN, 0.2),
    );
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(intro))
            .with(Transition::Write(definition))
            .with(Transition::Write(residual_formula))
            .then_wait(1.5),
    );

    let circumscribe = b.declare(frame_box(&dot_bounds, 0.25).with_color(Color::RED));
    b.play_one(Transition::Create(circumscribe), 0.75);
    b.play(
        AnimationStep::new(0.75)
            .with(Transition::FadeOut(circumscribe))
            .then_wait(2.5),
    );
    b.play(
        AnimationStep::new(1.0)
            .with_all(
                [residuals_a, definition, residual_formula, good_fit, label_a, line_a]
                    .map(Transition::FadeOut),
            )
            .then_wait(0.5),
    );

    let question = b.declare(text(
        "How do we mathematically define and find the 'best' line?",
        layout::TOP,
        0.6,
    ));
    b.play(AnimationStep::new(1.0).with(Transition::Write(question)).then_wait(2.0));
    b.play_one(Transition::FadeOut(question), 1.0);

    let ols_intro_obj = text("One common method: Ordinary Least Squares (OLS)", layout::TOP, 0.6);
    let ols_intro_bounds = bounds_of(&ols_intro_obj);
    let ols_intro = b.declare(ols_intro_obj);
    b.play_one(Transition::Write(ols_intro), 1.0);

    // Start from a deliberately poor fit, drawn red.
    let (m_poor, b_poor) = (0.2, best.intercept + 2.0);
    let m = b.tracker("m", m_poor);
    let c = b.tracker("b", b_poor);
    let redness = b.tracker("line color", 1.0);
    let display = b.tracker("numeric display", 0.0);

    let fitted = b.bind(&[m, c, redness], move |v| {
        clipped_plot(&axes, |x| v[0] * x + v[1]).with_color(Color::GREEN.lerp(&Color::RED, v[2]))
    })?;
    b.play(AnimationStep::new(1.0).with(Transition::Create(fitted)).then_wait(0.5));

    let residual_objs = residual_lines(&axes, &points, m_poor, b_poor);
    let copies: Vec<DrawableObject> = residual_objs
        .iter()
        .map(|r| DrawableObject {
            id: ObjectId::fresh(),
            ..r.clone()
        })
        .collect();
    let residuals = b.declare_all(residual_objs);
    let residuals = b.group(&residuals);

    let recall_obj = text("Recall: residuals are the vertical distances", Point2D::ORIGIN, 0.6)
        .next_to(&ols_intro_bounds, Point2D::DOWN, 0.25);
    let recall_bounds = bounds_of(&recall_obj);
    let recall = b.declare(recall_obj);
    let recall_formula = b.declare(
        text("e_i = y_i - (m x_i + b)", Point2D::ORIGIN, 0.6).next_to(
            &recall_bounds,
            Point2D::DOWN,
            0.25,
        ),
    );
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::Write(recall))
            .with(Transition::Write(recall_formula)),
    );
    b.play(AnimationStep::new(1.0).with(Transition::Create(residuals)).then_wait(2.0));

    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(recall))
            .with(Transition::FadeOut(recall_formula)),
    );
    let ssr_text_obj = text(
        "OLS minimizes the Sum of the Squared Residuals (SSR)",
        Point2D::ORIGIN,
        0.6,
    )
    .next_to(&ols_intro_bounds, Point2D::DOWN, 0.25);
    let ssr_text_bounds = bounds_of(&ssr_text_obj);
    let ssr_text = b.declare(ssr_text_obj);
    let ssr_definition = b.declare(
        text(
            "SSR = sum e_i^2\n    = sum (y_i - (m x_i + b))^2",
            Point2D::ORIGIN,
            0.6,
        )
        .next_to(&ssr_text_bounds, Point2D::DOWN, 0.25),
    );
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::Write(ssr_text))
            .with(Transition::Write(ssr_definition)),
    );

    // Copies of the residuals turn into squares one after another, then the
    // tracker-bound squares take over.
    let copies = b.declare_all(copies);
    let stills = b.declare_all(residual_squares(&axes, &points, m_poor, b_poor));
    b.play(AnimationStep::new(0.0).with_all(copies.iter().map(|id| Transition::Add(*id))));
    b.play(
        AnimationStep::new(1.0)
            .with_all(
                copies
                    .iter()
                    .zip(&stills)
                    .map(|(copy, still)| Transition::replace(*copy, *still)),
            )
            .lag_ratio(0.1),
    );
    let squares = bind_squares(&mut b, &axes, &points, m, c)?;
    let squares = b.group(&squares);
    b.play(AnimationStep::new(0.0).with(Transition::Add(squares)));
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(residuals))
            .with_all(stills.iter().map(|id| Transition::FadeOut(*id)))
            .then_wait(3.0),
    );
    b.play_one(Transition::FadeOut(ols_intro), 1.0);
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(ssr_text))
            .with(Transition::FadeOut(ssr_definition)),
    );

    let objective = b.bind(&[m, c, display], |v| {
        text(ssr_formula(v[0], v[1], v[2]), layout::TOP, 0.7)
    })?;
    b.play(AnimationStep::new(1.0).with(Transition::Write(objective)).then_wait(0.5));
    b.play(AnimationStep::new(0.7).with(Transition::set_value(display, 1.0)).then_wait(0.5));

    // Two more poor fits, then the least-squares solution.
    b.play(
        AnimationStep::new(2.0)
            .with(Transition::set_value(c, best.intercept - 2.0))
            .then_wait(0.5),
    );
    b.play(AnimationStep::new(2.0).with(Transition::set_value(m, 1.2)).then_wait(0.5));
    b.play(
        AnimationStep::new(2.0)
            .with(Transition::set_value(m, best.slope))
            .then_wait(0.3),
    );
    b.play(
        AnimationStep::new(2.0)
            .with(Transition::set_value(c, best.intercept))
            .then_wait(0.3),
    );
    b.play_one(Transition::set_value(redness, 0.0), 0.7);

    let best_bounds = bounds_of(&clipped_plot(&axes, |x| best.predict(x)));
    let ols_label = b.declare(
        text("OLS Best-Fit Line", Point2D::ORIGIN, 0.6)
            .with_color(Color::GREEN)
            .next_to(&best_bounds, Point2D::RIGHT, 0.1),
    );
    b.play(AnimationStep::new(1.0).with(Transition::Write(ols_label)).then_wait(2.0));

    let calculus = b.declare(text(
        "To minimize SSR, we use calculus:\nd SSR / dm = 0   and   d SSR / db = 0",
        layout::BOTTOM,
        0.6,
    ));
    b.play(AnimationStep::new(1.0).with(Transition::Write(calculus)).then_wait(2.0));
    b.play(
        AnimationStep::new(1.0)
            .with_all([plot, fitted, squares, ols_label, objective, calculus].map(Transition::FadeOut))
            .then_wait(0.5),
    );

    let solved = [
        "Solving the equations gives us:",
        "m = sum (x_i - x_mean)(y_i - y_mean) / sum (x_i - x_mean)^2",
        "b = y_mean - m x_mean",
    ];
    let solved: Vec<ObjectId> = solved
        .iter()
        .enumerate()
        .map(|(i, line)| b.declare(text(*line, Point2D::new(0.0, 0.8 - 0.8 * i as f64), 0.6)))
        .collect();
    let solved = b.group(&solved);
    let preview = b.declare(text(
        "We use these to compute the line for real data.",
        Point2D::new(0.0, -1.6),
        0.6,
    ));
    b.play(AnimationStep::new(1.0).with(Transition::Write(solved)).then_wait(3.0));
    b.play(AnimationStep::new(1.0).with(Transition::Write(preview)).then_wait(2.5));
    b.play(
        AnimationStep::new(1.0)
            .with(Transition::FadeOut(solved))
            .with(Transition::FadeOut(preview))
            .then_wait(0.5),
    );

    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_anim::{FrameRecorder, Runner};

    #[test]
    fn test_objective_switches_to_numbers() {
        assert_eq!(
            ssr_formula(0.2, 4.9, 0.4),
            "Minimize: SSR = sum (y_i - (m x_i + b))^2"
        );
        let numeric = ssr_formula(0.2, 4.9, 1.0);
        assert!(numeric.contains("(0.20 x_i + 4.90)"));
    }

    #[test]
    fn test_objective_settles_on_the_least_squares_value() {
        let best = fit_line(&XS, &YS).unwrap();
        let expected = format!("= {:.2}", ssr(&best, &XS, &YS));
        let worse = format!("= {:.2}", ssr(&LinearFit::new(1.2, best.intercept - 2.0), &XS, &YS));

        let script = build().unwrap();
        let mut recorder = FrameRecorder::new();
        Runner::default()
            .with_fps(4.0)
            .unwrap()
            .run(&script, &mut recorder)
            .unwrap();

        let objective_texts: Vec<String> = recorder
            .frames
            .iter()
            .flat_map(|f| f.texts())
            .filter(|t| t.starts_with("Minimize"))
            .map(str::to_string)
            .collect();
        assert!(objective_texts.iter().any(|t| t.ends_with(&worse)));
        assert!(objective_texts.iter().any(|t| t.ends_with(&expected)));
        assert!(recorder.last().unwrap().items.is_empty());
    }

    #[test]
    fn test_squares_shrink_towards_the_fit() {
        let axes = Axes::new(
            AxisRange::new(0.0, 7.0, 1.0),
            AxisRange::new(0.0, 7.0, 1.0),
            7.0,
            7.0,
        );
        let best = fit_line(&XS, &YS).unwrap();
        let area = |fit: &LinearFit| -> f64 {
            residual_squares(&axes, &points(), fit.slope, fit.intercept)
                .iter()
                .filter_map(|s| s.shape.bounds())
                .map(|b| b.width() * b.height())
                .sum()
        };
        assert!(area(&best) < area(&LinearFit::new(0.2, 3.5)));
        assert!((area(&best) - ssr(&best, &XS, &YS)).abs() < 1e-9);
    }
}
