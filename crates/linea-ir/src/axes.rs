//! Cartesian axes: coordinate conversion, axis geometry and function plots.

use linea_core::{Color, LineaError, LineaResult, Point2D};

use crate::object::DrawableObject;

/// `[min, max]` with tick spacing `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Tick positions from `min` to `max` inclusive.
    pub fn ticks(&self) -> Vec<f64> {
        if !(self.step > 0.0) || self.span() <= 0.0 {
            return Vec::new();
        }
        let count = (self.span() / self.step + 1e-9).floor() as usize;
        (0..=count).map(|i| self.min + i as f64 * self.step).collect()
    }

    /// Where the other axis crosses this one: 0 if in range, else the nearest end.
    fn crossing(&self) -> f64 {
        0.0_f64.clamp(self.min, self.max)
    }
}

/// Objects making up a drawn set of axes. `group` references every part.
#[derive(Debug, Clone)]
pub struct AxesObjects {
    pub group: DrawableObject,
    pub parts: Vec<DrawableObject>,
}

/// A curve built from samples plus the samples that had to be omitted.
#[derive(Debug)]
pub struct Plot {
    pub curve: DrawableObject,
    pub domain_errors: Vec<LineaError>,
}

/// A coordinate system placed in the scene, centered on `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub x_length: f64,
    pub y_length: f64,
    pub center: Point2D,
    pub samples: usize,
}

impl Axes {
    pub fn new(x_range: AxisRange, y_range: AxisRange, x_length: f64, y_length: f64) -> Self {
        Self {
            x_range,
            y_range,
            x_length,
            y_length,
            center: Point2D::ORIGIN,
            samples: 64,
        }
    }

    pub fn shifted(mut self, offset: Point2D) -> Self {
        self.center = self.center + offset;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(1);
        self
    }

    /// Coordinates to scene point.
    pub fn c2p(&self, x: f64, y: f64) -> Point2D {
        let fx = (x - self.x_range.min) / self.x_range.span() - 0.5;
        let fy = (y - self.y_range.min) / self.y_range.span() - 0.5;
        Point2D::new(
            self.center.x + fx * self.x_length,
            self.center.y + fy * self.y_length,
        )
    }

    /// Scene point to coordinates.
    pub fn p2c(&self, p: Point2D) -> (f64, f64) {
        let fx = (p.x - self.center.x) / self.x_length + 0.5;
        let fy = (p.y - self.center.y) / self.y_length + 0.5;
        (
            self.x_range.min + fx * self.x_range.span(),
            self.y_range.min + fy * self.y_range.span(),
        )
    }

    /// Scene units per coordinate unit, per axis.
    pub fn unit_size(&self) -> (f64, f64) {
        (
            self.x_length / self.x_range.span(),
            self.y_length / self.y_range.span(),
        )
    }

    /// Axis lines and tick marks, with a group referencing them all.
    pub fn build(&self, color: Color) -> AxesObjects {
        const TICK: f64 = 0.08;
        let x_cross = self.y_range.crossing();
        let y_cross = self.x_range.crossing();
        let mut parts = vec![
            DrawableObject::line(
                self.c2p(self.x_range.min, x_cross),
                self.c2p(self.x_range.max, x_cross),
            )
            .with_color(color)
            .with_stroke_width(2.0),
            DrawableObject::line(
                self.c2p(y_cross, self.y_range.min),
                self.c2p(y_cross, self.y_range.max),
            )
            .with_color(color)
            .with_stroke_width(2.0),
        ];
        for x in self.x_range.ticks() {
            let p = self.c2p(x, x_cross);
            parts.push(
                DrawableObject::line(p + Point2D::new(0.0, -TICK), p + Point2D::new(0.0, TICK))
                    .with_color(color)
                    .with_stroke_width(2.0),
            );
        }
        for y in self.y_range.ticks() {
            let p = self.c2p(y_cross, y);
            parts.push(
                DrawableObject::line(p + Point2D::new(-TICK, 0.0), p + Point2D::new(TICK, 0.0))
                    .with_color(color)
                    .with_stroke_width(2.0),
            );
        }
        let group = DrawableObject::group(parts.iter().map(|p| p.id).collect());
        AxesObjects { group, parts }
    }

    /// Labels at the positive ends of both axes.
    pub fn axis_labels(&self, x_label: &str, y_label: &str) -> (DrawableObject, DrawableObject) {
        let x_end = self.c2p(self.x_range.max, self.y_range.crossing());
        let y_end = self.c2p(self.x_range.crossing(), self.y_range.max);
        (
            DrawableObject::text(x_label, x_end + Point2D::new(0.4, -0.3)),
            DrawableObject::text(y_label, y_end + Point2D::new(0.4, 0.1)),
        )
    }

    /// Plot `f` over the x range. Non-finite outputs are domain errors.
    pub fn plot<F>(&self, f: F) -> Plot
    where
        F: Fn(f64) -> f64,
    {
        self.try_plot(|x| {
            let y = f(x);
            if y.is_finite() {
                Ok(y)
            } else {
                Err(LineaError::domain(x, format!("function returned {}", y)))
            }
        })
    }

    /// Plot a partial function. Every rejected sample is recorded and leaves
    /// a gap in the curve; sampling never aborts.
    pub fn try_plot<F>(&self, f: F) -> Plot
    where
        F: Fn(f64) -> LineaResult<f64>,
    {
        let mut segments: Vec<Vec<Point2D>> = Vec::new();
        let mut current = Vec::new();
        let mut domain_errors = Vec::new();
        for i in 0..=self.samples {
            let x = self.x_range.min + self.x_range.span() * i as f64 / self.samples as f64;
            match f(x) {
                Ok(y) if y.is_finite() => current.push(self.c2p(x, y)),
                Ok(y) => {
                    domain_errors.push(LineaError::domain(x, format!("function returned {}", y)));
                    flush(&mut segments, &mut current);
                }
                Err(err) => {
                    domain_errors.push(err);
                    flush(&mut segments, &mut current);
                }
            }
        }
        flush(&mut segments, &mut current);
        if !domain_errors.is_empty() {
            tracing::debug!(
                omitted = domain_errors.len(),
                segments = segments.len(),
                "plotted curve with domain gaps"
            );
        }
        Plot {
            curve: DrawableObject::curve(segments),
            domain_errors,
        }
    }

    /// `y = m x + b` over the x range.
    pub fn line_graph(&self, m: f64, b: f64) -> DrawableObject {
        self.plot(|x| m * x + b).curve
    }
}

fn flush(segments: &mut Vec<Vec<Point2D>>, current: &mut Vec<Point2D>) {
    if current.len() > 1 {
        segments.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
