//! The four clips of the linear regression video, plus the chained cut.

mod conclusion;
mod linear_review;
pub(crate) mod ols;
pub(crate) mod real_life;

use clap::ValueEnum;
use linea_core::{BoundingBox, LineaError, LineaResult, Point2D};
use linea_ir::{Axes, DrawableObject, MonospaceTypesetter, Script};

/// Frame positions shared by the clips, in scene units (the visible area is
/// roughly 14.2 x 8 around the origin).
pub(crate) mod layout {
    use linea_core::Point2D;

    pub const TOP: Point2D = Point2D::new(0.0, 3.4);
    pub const UPPER_LEFT: Point2D = Point2D::new(-4.6, 3.2);
    pub const LOWER_RIGHT: Point2D = Point2D::new(4.4, -3.4);
    pub const BOTTOM: Point2D = Point2D::new(0.0, -3.3);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Clip {
    LinearReview,
    Ols,
    RealLife,
    Conclusion,
    /// Every clip back to back.
    Full,
}

impl Clip {
    pub const ALL: [Clip; 5] = [
        Clip::LinearReview,
        Clip::Ols,
        Clip::RealLife,
        Clip::Conclusion,
        Clip::Full,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Clip::LinearReview => "linear-review",
            Clip::Ols => "ols",
            Clip::RealLife => "real-life",
            Clip::Conclusion => "conclusion",
            Clip::Full => "full",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Clip::LinearReview => "what slope and intercept do to y = mx + b",
            Clip::Ols => "residuals, squared residuals and the least-squares line",
            Clip::RealLife => "study days against exam grade, fitted by hand",
            Clip::Conclusion => "recap and closing card",
            Clip::Full => "all clips chained into one timeline",
        }
    }

    pub fn build(&self) -> LineaResult<Script> {
        match self {
            Clip::LinearReview => linear_review::build(),
            Clip::Ols => ols::build(),
            Clip::RealLife => real_life::build(),
            Clip::Conclusion => conclusion::build(),
            Clip::Full => Script::chain(
                "full",
                [
                    linear_review::build()?,
                    ols::build()?,
                    real_life::build()?,
                    conclusion::build()?,
                ],
            ),
        }
    }
}

/// Text at `scale` times the configured font size.
pub(crate) fn text(content: impl Into<String>, at: Point2D, scale: f64) -> DrawableObject {
    let size = linea_core::config::global().style.font_size * scale;
    DrawableObject::text_with(&MonospaceTypesetter::default(), content, at, size)
}

/// Rectangle around `bounds` with `buff` clearance on every side.
pub(crate) fn frame_box(bounds: &BoundingBox, buff: f64) -> DrawableObject {
    let (lo, hi) = (bounds.min, bounds.max);
    DrawableObject::polygon(vec![
        Point2D::new(lo.x - buff, lo.y - buff),
        Point2D::new(hi.x + buff, lo.y - buff),
        Point2D::new(hi.x + buff, hi.y + buff),
        Point2D::new(lo.x - buff, hi.y + buff),
    ])
}

/// Plot `f`, leaving gaps wherever it leaves the visible y range.
pub(crate) fn clipped_plot<F>(axes: &Axes, f: F) -> DrawableObject
where
    F: Fn(f64) -> f64,
{
    let (low, high) = (axes.y_range.min, axes.y_range.max);
    axes.try_plot(|x| {
        let y = f(x);
        if (low..=high).contains(&y) {
            Ok(y)
        } else {
            Err(LineaError::domain(x, format!("{:.2} is off the chart", y)))
        }
    })
    .curve
}
