//! Worked example: days spent studying against exam grade, fitted step by
//! step with the closed-form OLS solution, then used for a prediction.

use linea_core::{BoundingBox, Color, LineaError, LineaResult, ObjectId, Point2D};
use linea_ir::{AnimationStep, Axes, AxisRange, DrawableObject, Script, ScriptBuilder, Transition};

use super::{frame_box, layout, text};
use crate::regression::{fit_line, ols_terms, r_squared};

pub const DAYS: [f64; 7] = [2.0, 5.0, 1.0, 7.0, 3.0, 4.0, 6.0];
pub const GRADES: [f64; 7] = [60.0, 85.0, 60.0, 88.0, 75.0, 72.0, 80.0];
const HEADERS: [&str; 2] = ["Days (X)", "Grade (Y)"];
const PREDICT_AT: f64 = 4.5;
const LIGHT_RED: Color = Color::rgb(0.96863, 0.63137, 0.63922);

/// Data table centered on `center`: cells, outer box, header rule and
/// column rule, in a fixed order so one table morphs cell for cell into
/// another.
fn table(center: Point2D, scale: f64) -> Vec<DrawableObject> {
    let row_height = 0.45 * scale;
    let col_width = 1.8 * scale;
    let rows = DAYS.len() + 1;
    let height = rows as f64 * row_height;
    let top = center.y + height / 2.0;

    let cell = |row: usize, col: usize, content: String| {
        let at = Point2D::new(
            center.x + (col as f64 - 0.5) * col_width,
            top - (row as f64 + 0.5) * row_height,
        );
        text(content, at, 0.55 * scale)
    };

    let mut out: Vec<DrawableObject> = HEADERS
        .iter()
        .enumerate()
        .map(|(col, h)| cell(0, col, h.to_string()))
        .collect();
    for (i, (x, y)) in DAYS.iter().zip(GRADES.iter()).enumerate() {
        out.push(cell(i + 1, 0, x.to_string()));
        out.push(cell(i + 1, 1, y.to_string()));
    }
    out.push(
        frame_box(&BoundingBox::around(center, 2.0 * col_width, height), 0.0)
            .with_stroke_width(2.0),
    );
    out.push(
        DrawableObject::line(
            Point2D::new(center.x - col_width, top - row_height),
            Point2D::new(center.x + col_width, top - row_height),
        )
        .with_stroke_width(2.0),
    );
    out.push(
        DrawableObject::line(
            Point2D::new(center.x, top),
            Point2D::new(center.x, top - height),
        )
        .with_stroke_width(2.0),
    );
    out
}

fn declare_table(b: &mut ScriptBuilder, center: Point2D, scale: f64) -> ObjectId {
    let cells = b.declare_all(table(center, scale));
    b.group(&cells)
}

/// Lines of text stacked downwards from `first`, `spacing` apart.
fn stacked(b: &mut ScriptBuilder, first: Point2D, spacing: f64, scale: f64, lines: &[String]) -> Vec<ObjectId> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let at = Point2D::new(first.x, first.y - spacing * i as f64);
            b.declare(text(line.as_str(), at, scale))
        })
        .collect()
}

fn write_each(b: &mut ScriptBuilder, ids: &[ObjectId], seconds: f64, pauses: &[f64]) {
    for (i, id) in ids.iter().enumerate() {
        let pause = pauses.get(i).copied().unwrap_or(0.5);
        b.play(AnimationStep::new(seconds).with(Transition::Write(*id)).then_wait(pause));
    }
}

fn fade_all(ids: &[ObjectId]) -> impl Iterator<Item = Transition> + '_ {
    ids.iter().map(|id| Transition::FadeOut(*id))
}

/// Axes plus their labels and the scatter of the data, as declared ids.
struct Chart {
    axes: Axes,
    axes_id: ObjectId,
    labels: ObjectId,
    dots: Vec<ObjectId>,
}

fn chart(b: &mut ScriptBuilder, center: Point2D, x_length: f64) -> Chart {
    let axes = Axes::new(
        AxisRange::new(0.0, 8.0, 1.0),
        AxisRange::new(50.0, 100.0, 10.0),
        x_length,
        4.0,
    )
    .shifted(center);
    let drawn = axes.build(Color::WHITE);
    b.declare_all(drawn.parts);
    let axes_id = b.declare(drawn.group);
    let (x_label, y_label) = axes.axis_labels("Days Studying (X)", "Exam Grade (Y)");
    let labels = [b.declare(x_label), b.declare(y_label)];
    let labels = b.group(&labels);
    let dots = DAYS
        .iter()
        .zip(GRADES.iter())
        .map(|(x, y)| b.declare(DrawableObject::point(axes.c2p(*x, *y)).with_color(Color::YELLOW)))
        .collect();
    Chart {
        axes,
        axes_id,
        labels,
        dots,
    }
}

pub fn build() -> LineaResult<Script> {
    let mut b = ScriptBuilder::new("real-life");
    let terms = ols_terms(&DAYS, &GRADES)?;
    let fit = fit_line(&DAYS, &GRADES)?;
    let r2 = r_squared(&fit, &DAYS, &GRADES)
        .ok_or_else(|| LineaError::Validation("grades have no variance".into()))?;
    let (m, c) = (fit.slope, fit.intercept);

    let title_obj = text("Example: Study Days vs. Exam Grade", layout::TOP, 0.9);
    let title_bounds = title_obj.shape.bounds();
    let title = b.declare(title_obj);
    b.play(AnimationStep::new(1.0).with(Transition::Write(title)).then_wait(1.0));

    let data_table = declare_table(&mut b, Point2D::new(0.0, 0.3), 1.0);
    b.play(AnimationStep::new(2.0).with(Transition::Create(data_table)).then_wait(2.0));

    // The table shrinks to the left while the chart comes in.
    let right = chart(&mut b, Point2D::new(3.4, -0.6), 5.5);
    let moved = declare_table(&mut b, Point2D::new(-4.2, -0.3), 0.7);
    b.play(
        AnimationStep::new(2.0)
            .with(Transition::morph(data_table, moved))
            .with(Transition::Create(right.axes_id))
            .with(Transition::Write(right.labels))
            .then_wait(1.0),
    );
    b.play(
        AnimationStep::new(2.0)
            .with_all(right.dots.iter().map(|id| Transition::Create(*id)))
            .lag_ratio(0.2)
            .then_wait(2.0),
    );

    let ols_obj = text("Ordinary Least Squares (OLS)", Point2D::ORIGIN, 0.6);
    let ols_obj = match title_bounds {
        Some(bounds) => ols_obj.next_to(&bounds, Point2D::DOWN, 0.2),
        None => ols_obj,
    };
    let ols_text = b.declare(ols_obj);
    b.play(AnimationStep::new(1.0).with(Transition::Write(ols_text)).then_wait(1.0));

    let centered = declare_table(&mut b, Point2D::new(-3.5, 0.4), 0.85);
    b.play(
        AnimationStep::new(1.5)
            .with(Transition::FadeOut(right.axes_id))
            .with(Transition::FadeOut(right.labels))
            .with_all(fade_all(&right.dots))
            .with(Transition::FadeOut(ols_text))
            .with(Transition::morph(data_table, centered)),
    );

    let closed_form = stacked(
        &mut b,
        Point2D::new(-3.5, -2.3),
        0.45,
        0.55,
        &[
            "OLS Formulas:".to_string(),
            "m = sum (x_i - x_mean)(y_i - y_mean) / sum (x_i - x_mean)^2".to_string(),
            "b = y_mean - m * x_mean".to_string(),
        ],
    );
    let closed_form = b.group(&closed_form);
    b.play(AnimationStep::new(1.5).with(Transition::Write(closed_form)).then_wait(1.0));

    let calc_title = b.declare(text("Step-by-step OLS Calculation:", Point2D::new(3.2, 2.6), 0.7));
    b.play_one(Transition::Write(calc_title), 1.0);

    let column = Point2D::new(3.2, 1.9);
    let days_sum = DAYS.map(|x| x.to_string()).join(" + ");
    let grades_sum = GRADES.map(|y| y.to_string()).join(" + ");
    let steps: [Vec<String>; 4] = [
        vec![
            "Step 1: Calculate means".to_string(),
            format!("x_mean = ({}) / {} = {:.2}", days_sum, DAYS.len(), terms.x_mean),
            format!("y_mean = ({}) / {} = {:.2}", grades_sum, GRADES.len(), terms.y_mean),
        ],
        vec![
            "Step 2: Calculate numerator and denominator".to_string(),
            "Numerator = sum (x_i - x_mean)(y_i - y_mean)".to_string(),
            format!(
                "= ({} - {:.0})({} - {:.2}) + ({} - {:.0})({} - {:.2}) + ... = {:.2}",
                DAYS[0], terms.x_mean, GRADES[0], terms.y_mean,
                DAYS[1], terms.x_mean, GRADES[1], terms.y_mean,
                terms.numerator
            ),
            "Denominator = sum (x_i - x_mean)^2".to_string(),
            format!(
                "= ({} - {:.0})^2 + ({} - {:.0})^2 + ... = {:.2}",
                DAYS[0], terms.x_mean, DAYS[1], terms.x_mean, terms.denominator
            ),
        ],
        vec![
            "Step 3: Calculate slope and intercept".to_string(),
            "m = Numerator / Denominator".to_string(),
            format!("= {:.2} / {:.2} = {:.2}", terms.numerator, terms.denominator, m),
            "b = y_mean - m * x_mean".to_string(),
            format!("= {:.2} - {:.2} * {:.2} = {:.2}", terms.y_mean, m, terms.x_mean, c),
        ],
        vec![
            "Step 4: Write the regression equation".to_string(),
            format!("y = m x + b = {:.2}x + {:.2}", m, c),
        ],
    ];

    let mut last_block = Vec::new();
    for (i, lines) in steps.iter().enumerate() {
        let block = stacked(&mut b, column, 0.5, 0.5, lines);
        let pauses: Vec<f64> = (0..block.len())
            .map(|j| if j + 1 == block.len() { 1.5 } else { 0.5 })
            .collect();
        write_each(&mut b, &block, if i == 3 { 1.5 } else { 1.0 }, &pauses);
        if i + 1 < steps.len() {
            b.play(AnimationStep::new(1.0).with_all(fade_all(&block)).then_wait(0.3));
        } else {
            last_block = block;
        }
    }
    b.wait(0.5);

    // Swap the table and working for the fitted chart on the left.
    let left = chart(&mut b, Point2D::new(-3.0, -0.3), 4.5);
    let equation_at = left.axes.c2p(5.0, 100.0) + Point2D::new(0.0, 0.3);
    let equation = b.declare(
        text(format!("y = {:.2}x + {:.2}", m, c), equation_at, 0.6).with_color(Color::GREEN),
    );
    let left_dots = b.group(&left.dots);
    b.play(
        AnimationStep::new(2.0)
            .with(Transition::FadeOut(data_table))
            .with(Transition::FadeOut(closed_form))
            .with(Transition::FadeOut(calc_title))
            .with_all(fade_all(&last_block))
            .with(Transition::FadeIn(left.axes_id))
            .with(Transition::FadeIn(left.labels))
            .with(Transition::FadeIn(left_dots))
            .with(Transition::Write(equation))
            .then_wait(1.0),
    );

    let line_obj = left.axes.line_graph(m, c).with_color(Color::GREEN);
    let label_anchor = left.axes.c2p(6.4, fit.predict(6.4));
    let line = b.declare(line_obj);
    let line_label = b.declare(
        text("Best-Fit Line (OLS)", Point2D::ORIGIN, 0.5)
            .with_color(Color::GREEN)
            .next_to(&BoundingBox::around(label_anchor, 0.0, 0.0), Point2D::UP, 0.2),
    );
    b.play(
        AnimationStep::new(2.0)
            .with(Transition::Create(line))
            .with(Transition::Write(line_label))
            .then_wait(1.5),
    );

    let interpretation = stacked(
        &mut b,
        Point2D::new(3.4, 2.2),
        0.55,
        0.5,
        &[
            "Interpreting the Results:".to_string(),
            format!("m = {:.2}: each day -> +{:.2} points", m, m),
            format!("b = {:.2}: 0 days -> {:.2} points", c, c),
            format!(
                "R^2 = {:.2}: model explains {}% of the variance",
                r2,
                (r2 * 100.0).floor()
            ),
        ],
    );
    write_each(&mut b, &interpretation, 1.5, &[0.5, 1.5, 1.5, 2.0]);
    let interpretation = b.group(&interpretation);
    b.play_one(Transition::FadeOut(interpretation), 1.0);

    let predicted = fit.predict(PREDICT_AT);
    let mut prediction = stacked(
        &mut b,
        Point2D::new(3.4, 2.2),
        0.55,
        0.5,
        &[
            "Making a Prediction:".to_string(),
            format!("If a student studies for {} days:", PREDICT_AT),
            format!("y = {:.2} * {} + {:.2}", m, PREDICT_AT, c),
            format!("= {:.2} + {:.2}", m * PREDICT_AT, c),
            format!("= {:.1}", predicted),
        ],
    );
    prediction.push(b.declare(
        text(format!("Expected Grade: {:.1}", predicted), Point2D::new(3.4, -0.8), 0.5)
            .with_color(Color::RED),
    ));
    write_each(&mut b, &prediction, 1.5, &[0.5, 1.0, 0.5, 0.5, 1.0, 2.0]);

    let axes = left.axes;
    let dot = b.declare(DrawableObject::point(axes.c2p(PREDICT_AT, predicted)).with_color(Color::RED));
    let guide_h = b.declare(
        DrawableObject::dashed_line(axes.c2p(0.0, predicted), axes.c2p(PREDICT_AT, predicted))
            .with_color(LIGHT_RED),
    );
    let guide_v = b.declare(
        DrawableObject::dashed_line(axes.c2p(PREDICT_AT, 50.0), axes.c2p(PREDICT_AT, predicted))
            .with_color(LIGHT_RED),
    );
    b.play(AnimationStep::new(1.5).with_all([dot, guide_h, guide_v].map(Transition::Create)));
    let x_mark = b.declare(text(
        format!("x = {}", PREDICT_AT),
        axes.c2p(PREDICT_AT, 50.0) + Point2D::new(0.0, -0.3),
        0.4,
    ));
    let y_mark = b.declare(text(
        format!("y = {:.1}", predicted),
        axes.c2p(0.0, predicted) + Point2D::new(-0.7, 0.0),
        0.4,
    ));
    b.play_one(Transition::Write(x_mark), 1.0);
    b.play_one(Transition::Write(y_mark), 1.0);

    b.play(
        AnimationStep::new(2.0)
            .with_all(
                [
                    title, left.axes_id, left.labels, left_dots, line, line_label, dot, guide_h,
                    guide_v, x_mark, y_mark, equation,
                ]
                .map(Transition::FadeOut),
            )
            .with_all(fade_all(&prediction))
            .then_wait(1.0),
    );

    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea_anim::{FrameRecorder, Runner};
    use linea_ir::Shape;

    #[test]
    fn test_table_has_every_cell_and_rule() {
        let cells = table(Point2D::ORIGIN, 1.0);
        // Header, data, box, two rules.
        assert_eq!(cells.len(), 2 + 2 * DAYS.len() + 3);
        let texts: Vec<&str> = cells.iter().filter_map(|c| c.text_content()).collect();
        assert_eq!(texts[0], "Days (X)");
        assert_eq!(texts[2], "2");
        assert_eq!(texts[3], "60");
    }

    #[test]
    fn test_working_quotes_the_fitted_numbers() {
        let script = build().unwrap();
        let mut recorder = FrameRecorder::new();
        let report = Runner::default()
            .with_fps(4.0)
            .unwrap()
            .run(&script, &mut recorder)
            .unwrap();
        assert_eq!(report.final_members, 0);

        let seen = |needle: &str| {
            recorder
                .frames
                .iter()
                .any(|f| f.texts().any(|t| t.contains(needle)))
        };
        assert!(seen("x_mean = (2 + 5 + 1 + 7 + 3 + 4 + 6) / 7 = 4.00"));
        assert!(seen("... = 134.00"));
        assert!(seen("= 134.00 / 28.00 = 4.79"));
        assert!(seen("y = 4.79x + 55.14"));
        assert!(seen("R^2 = 0.86: model explains 85%"));
        assert!(seen("Expected Grade: 76.7"));

        // The whole table slides left as one group.
        let Shape::Text { anchor: slid, .. } = table(Point2D::new(-4.2, -0.3), 0.7)[0].shape.clone() else {
            panic!("first cell is the header");
        };
        let header_at_left = recorder.frames.iter().any(|f| {
            f.items.iter().any(|i| {
                matches!(&i.shape, Shape::Text { content, anchor, .. } if content == "Days (X)" && *anchor == slid)
            })
        });
        assert!(header_at_left);
    }
}
