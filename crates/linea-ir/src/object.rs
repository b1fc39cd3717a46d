use serde::{Deserialize, Serialize};

use linea_core::{BoundingBox, Color, ObjectId, ObjectKind, Point2D};

use crate::typeset::{GlyphExtent, MonospaceTypesetter, Typesetter};

/// Visual style of a drawable. Changing it is a request for future frames,
/// not an animation; animating it is the scheduler's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Color,
    pub stroke_width: f64,
    /// Natural opacity, 0.0–1.0.
    pub opacity: f64,
    pub fill_opacity: f64,
    pub dashed: bool,
}

impl Style {
    pub fn lerp(&self, other: &Style, t: f64) -> Style {
        Style {
            color: self.color.lerp(&other.color, t),
            stroke_width: self.stroke_width + (other.stroke_width - self.stroke_width) * t,
            opacity: self.opacity + (other.opacity - self.opacity) * t,
            fill_opacity: self.fill_opacity + (other.fill_opacity - self.fill_opacity) * t,
            dashed: if t < 0.5 { self.dashed } else { other.dashed },
        }
    }
}

impl Default for Style {
    /// Defaults come from the process-wide configuration.
    fn default() -> Self {
        let cfg = linea_core::config::global();
        Self {
            color: cfg.default_color().unwrap_or(Color::WHITE),
            stroke_width: cfg.style.stroke_width,
            opacity: 1.0,
            fill_opacity: 0.0,
            dashed: false,
        }
    }
}

/// Geometry of a drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point {
        center: Point2D,
        radius: f64,
    },
    Line {
        start: Point2D,
        end: Point2D,
    },
    /// Polyline segments; a gap between segments marks omitted samples.
    Path {
        segments: Vec<Vec<Point2D>>,
        closed: bool,
    },
    Text {
        content: String,
        anchor: Point2D,
        font_size: f64,
        extent: GlyphExtent,
    },
    /// Member identities; members are shared, not owned.
    Group {
        members: Vec<ObjectId>,
    },
}

pub const DEFAULT_DOT_RADIUS: f64 = 0.08;

impl Shape {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Shape::Point { .. } => ObjectKind::Point,
            Shape::Line { .. } => ObjectKind::Line,
            Shape::Path { .. } => ObjectKind::Curve,
            Shape::Text { .. } => ObjectKind::Text,
            Shape::Group { .. } => ObjectKind::Group,
        }
    }

    /// Outline points in drawing order. Closed paths repeat their first point.
    pub fn outline(&self) -> Vec<Point2D> {
        match self {
            Shape::Point { center, .. } => vec![*center],
            Shape::Line { start, end } => vec![*start, *end],
            Shape::Path { segments, closed } => {
                let mut pts: Vec<Point2D> = segments.iter().flatten().copied().collect();
                if *closed {
                    if let Some(first) = pts.first().copied() {
                        pts.push(first);
                    }
                }
                pts
            }
            Shape::Text { anchor, .. } => vec![*anchor],
            Shape::Group { .. } => Vec::new(),
        }
    }

    /// Own bounds. Groups have none of their own; the scene graph unions members.
    pub fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Shape::Point { center, radius } => {
                Some(BoundingBox::around(*center, radius * 2.0, radius * 2.0))
            }
            Shape::Text { anchor, extent, .. } => {
                Some(BoundingBox::around(*anchor, extent.width, extent.height))
            }
            Shape::Group { .. } => None,
            _ => BoundingBox::from_points(&self.outline()),
        }
    }

    pub fn shift(&mut self, offset: Point2D) {
        match self {
            Shape::Point { center, .. } => *center = *center + offset,
            Shape::Line { start, end } => {
                *start = *start + offset;
                *end = *end + offset;
            }
            Shape::Path { segments, .. } => {
                for p in segments.iter_mut().flatten() {
                    *p = *p + offset;
                }
            }
            Shape::Text { anchor, .. } => *anchor = *anchor + offset,
            Shape::Group { .. } => {}
        }
    }

    /// The portion revealed after `alpha` of a build-in: paths grow along
    /// their arc length, dots grow from their center, text by characters.
    pub fn partial(&self, alpha: f64) -> Shape {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha >= 1.0 {
            return self.clone();
        }
        match self {
            Shape::Point { center, radius } => Shape::Point {
                center: *center,
                radius: radius * alpha,
            },
            Shape::Line { start, end } => Shape::Line {
                start: *start,
                end: start.lerp(end, alpha),
            },
            Shape::Path { segments, closed } => {
                let mut all = segments.clone();
                if *closed {
                    if let (Some(first), Some(last)) = (
                        segments.first().and_then(|s| s.first()).copied(),
                        all.last_mut(),
                    ) {
                        last.push(first);
                    }
                }
                Shape::Path {
                    segments: truncate_segments(&all, alpha),
                    closed: false,
                }
            }
            Shape::Text {
                content,
                anchor,
                font_size,
                extent,
            } => {
                let total = content.chars().count();
                let shown = (total as f64 * alpha).floor() as usize;
                Shape::Text {
                    content: content.chars().take(shown).collect(),
                    anchor: *anchor,
                    font_size: *font_size,
                    extent: *extent,
                }
            }
            Shape::Group { .. } => self.clone(),
        }
    }

    /// Interpolate geometry towards `other`. `t <= 0` is exactly `self`,
    /// `t >= 1` exactly `other`.
    pub fn interpolate(&self, other: &Shape, t: f64) -> Shape {
        if t <= 0.0 {
            return self.clone();
        }
        if t >= 1.0 {
            return other.clone();
        }
        match (self, other) {
            (
                Shape::Point { center: c0, radius: r0 },
                Shape::Point { center: c1, radius: r1 },
            ) => Shape::Point {
                center: c0.lerp(c1, t),
                radius: r0 + (r1 - r0) * t,
            },
            (Shape::Line { start: s0, end: e0 }, Shape::Line { start: s1, end: e1 }) => {
                Shape::Line {
                    start: s0.lerp(s1, t),
                    end: e0.lerp(e1, t),
                }
            }
            (
                Shape::Text {
                    content: c0,
                    anchor: a0,
                    font_size: f0,
                    extent: x0,
                },
                Shape::Text {
                    content: c1,
                    anchor: a1,
                    font_size: f1,
                    extent: x1,
                },
            ) => Shape::Text {
                content: if t < 0.5 { c0.clone() } else { c1.clone() },
                anchor: a0.lerp(a1, t),
                font_size: f0 + (f1 - f0) * t,
                extent: x0.lerp(x1, t),
            },
            (a, b) if a.is_morphable() && b.is_morphable() => {
                let from = a.outline();
                let to = b.outline();
                let n = from.len().max(to.len()).max(2);
                let from = resample(&from, n);
                let to = resample(&to, n);
                Shape::Path {
                    segments: vec![from.iter().zip(&to).map(|(p, q)| p.lerp(q, t)).collect()],
                    closed: false,
                }
            }
            // Text <-> outline and groups have no shared geometry to blend.
            _ => self.clone(),
        }
    }

    fn is_morphable(&self) -> bool {
        matches!(
            self,
            Shape::Point { .. } | Shape::Line { .. } | Shape::Path { .. }
        )
    }
}

fn polyline_length(points: &[Point2D]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Keep the first `alpha` of the total arc length across all segments.
fn truncate_segments(segments: &[Vec<Point2D>], alpha: f64) -> Vec<Vec<Point2D>> {
    let total: f64 = segments.iter().map(|s| polyline_length(s)).sum();
    let mut budget = total * alpha;
    let mut out = Vec::new();
    for seg in segments {
        if seg.is_empty() {
            continue;
        }
        let mut kept = vec![seg[0]];
        for w in seg.windows(2) {
            let len = w[0].distance(&w[1]);
            if len <= budget {
                kept.push(w[1]);
                budget -= len;
            } else {
                if budget > 0.0 {
                    kept.push(w[0].lerp(&w[1], budget / len));
                }
                budget = 0.0;
                break;
            }
        }
        if kept.len() > 1 {
            out.push(kept);
        }
        if budget <= 0.0 {
            break;
        }
    }
    out
}

/// Resample a polyline to `n` points evenly spaced by arc length.
pub fn resample(points: &[Point2D], n: usize) -> Vec<Point2D> {
    match points.len() {
        0 => return vec![Point2D::ORIGIN; n],
        1 => return vec![points[0]; n],
        _ => {}
    }
    if n < 2 {
        return points.iter().take(n).copied().collect();
    }
    let total = polyline_length(points);
    if total == 0.0 {
        return vec![points[0]; n];
    }
    let mut out = Vec::with_capacity(n);
    let mut seg = 0;
    let mut walked = 0.0;
    for i in 0..n {
        let target = total * i as f64 / (n - 1) as f64;
        while seg < points.len() - 2 && walked + points[seg].distance(&points[seg + 1]) < target {
            walked += points[seg].distance(&points[seg + 1]);
            seg += 1;
        }
        let len = points[seg].distance(&points[seg + 1]);
        let local = if len == 0.0 {
            0.0
        } else {
            ((target - walked) / len).clamp(0.0, 1.0)
        };
        out.push(points[seg].lerp(&points[seg + 1], local));
    }
    out
}

/// A typed drawable primitive with stable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawableObject {
    pub id: ObjectId,
    pub shape: Shape,
    pub style: Style,
    pub z_index: i32,
}

impl DrawableObject {
    pub fn new(shape: Shape) -> Self {
        Self {
            id: ObjectId::fresh(),
            shape,
            style: Style::default(),
            z_index: 0,
        }
    }

    pub fn point(center: Point2D) -> Self {
        let mut obj = Self::new(Shape::Point {
            center,
            radius: DEFAULT_DOT_RADIUS,
        });
        obj.style.fill_opacity = 1.0;
        obj
    }

    pub fn line(start: Point2D, end: Point2D) -> Self {
        Self::new(Shape::Line { start, end })
    }

    pub fn dashed_line(start: Point2D, end: Point2D) -> Self {
        let mut obj = Self::line(start, end);
        obj.style.dashed = true;
        obj
    }

    pub fn polyline(points: Vec<Point2D>) -> Self {
        Self::curve(vec![points])
    }

    pub fn curve(segments: Vec<Vec<Point2D>>) -> Self {
        Self::new(Shape::Path {
            segments,
            closed: false,
        })
    }

    pub fn polygon(vertices: Vec<Point2D>) -> Self {
        Self::new(Shape::Path {
            segments: vec![vertices],
            closed: true,
        })
    }

    pub fn square(center: Point2D, side: f64) -> Self {
        let h = side / 2.0;
        Self::polygon(vec![
            center + Point2D::new(-h, -h),
            center + Point2D::new(h, -h),
            center + Point2D::new(h, h),
            center + Point2D::new(-h, h),
        ])
    }

    /// Text laid out with the default typesetter.
    pub fn text(content: impl Into<String>, anchor: Point2D) -> Self {
        let size = linea_core::config::global().style.font_size;
        Self::text_with(&MonospaceTypesetter::default(), content, anchor, size)
    }

    pub fn text_with(
        typesetter: &dyn Typesetter,
        content: impl Into<String>,
        anchor: Point2D,
        font_size: f64,
    ) -> Self {
        let content = content.into();
        let extent = typesetter.typeset(&content, font_size);
        let mut obj = Self::new(Shape::Text {
            content,
            anchor,
            font_size,
            extent,
        });
        obj.style.fill_opacity = 1.0;
        obj
    }

    pub fn group(members: Vec<ObjectId>) -> Self {
        Self::new(Shape::Group { members })
    }

    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    /// Group members, empty for leaf objects.
    pub fn members(&self) -> &[ObjectId] {
        match &self.shape {
            Shape::Group { members } => members,
            _ => &[],
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.shape {
            Shape::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.style.stroke_width = width.max(0.0);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.style.fill_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    pub fn shifted(mut self, offset: Point2D) -> Self {
        self.shape.shift(offset);
        self
    }

    /// Move so the own bounding box is centered on `center`.
    pub fn moved_to(mut self, center: Point2D) -> Self {
        if let Some(b) = self.shape.bounds() {
            self.shape.shift(center - b.center());
        }
        self
    }

    /// Place to the side of `other` (a unit direction such as `Point2D::UP`)
    /// with `buff` spacing between the two bounding boxes.
    pub fn next_to(self, other: &BoundingBox, direction: Point2D, buff: f64) -> Self {
        let Some(own) = self.shape.bounds() else {
            return self;
        };
        let c = other.center();
        let target = Point2D::new(
            c.x + direction.x * (other.width() / 2.0 + own.width() / 2.0 + buff),
            c.y + direction.y * (other.height() / 2.0 + own.height() / 2.0 + buff),
        );
        self.moved_to(target)
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.style.stroke_width = width.max(0.0);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.style.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_z_index(&mut self, z: i32) {
        self.z_index = z;
    }

    /// Blend geometry and style towards `target`, keeping this identity.
    /// At `t >= 1` the result is exactly the target's state.
    pub fn interpolate(&self, target: &DrawableObject, t: f64) -> DrawableObject {
        let t = t.clamp(0.0, 1.0);
        DrawableObject {
            id: self.id,
            shape: self.shape.interpolate(&target.shape, t),
            style: if t >= 1.0 {
                target.style.clone()
            } else {
                self.style.lerp(&target.style, t)
            },
            z_index: if t >= 1.0 { target.z_index } else { self.z_index },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind_and_unique_ids() {
        let p = DrawableObject::point(Point2D::ORIGIN);
        let l = DrawableObject::line(Point2D::ORIGIN, Point2D::RIGHT);
        let t = DrawableObject::text("y = mx + b", Point2D::UP);
        let g = DrawableObject::group(vec![p.id, l.id]);
        assert_eq!(p.kind(), ObjectKind::Point);
        assert_eq!(l.kind(), ObjectKind::Line);
        assert_eq!(t.kind(), ObjectKind::Text);
        assert_eq!(g.kind(), ObjectKind::Group);
        assert_eq!(g.members(), &[p.id, l.id]);
        assert_ne!(p.id, l.id);
    }

    #[test]
    fn test_style_setters_clamp() {
        let mut obj = DrawableObject::line(Point2D::ORIGIN, Point2D::UP).with_opacity(2.0);
        assert_eq!(obj.style.opacity, 1.0);
        obj.set_stroke_width(-3.0);
        assert_eq!(obj.style.stroke_width, 0.0);
        obj.set_color(Color::RED);
        assert_eq!(obj.style.color, Color::RED);
    }

    #[test]
    fn test_partial_line_and_path() {
        let line = Shape::Line {
            start: Point2D::ORIGIN,
            end: Point2D::new(4.0, 0.0),
        };
        assert_eq!(
            line.partial(0.25),
            Shape::Line {
                start: Point2D::ORIGIN,
                end: Point2D::new(1.0, 0.0)
            }
        );

        // Two segments of length 2 each: half reveals exactly the first one.
        let path = Shape::Path {
            segments: vec![
                vec![Point2D::new(0.0, 0.0), Point2D::new(2.0, 0.0)],
                vec![Point2D::new(3.0, 0.0), Point2D::new(5.0, 0.0)],
            ],
            closed: false,
        };
        match path.partial(0.5) {
            Shape::Path { segments, .. } => {
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].last(), Some(&Point2D::new(2.0, 0.0)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(path.partial(1.0), path);
    }

    #[test]
    fn test_partial_text_reveals_characters() {
        let t = DrawableObject::text("abcd", Point2D::ORIGIN);
        assert_eq!(t.shape.partial(0.5).kind(), ObjectKind::Text);
        match t.shape.partial(0.5) {
            Shape::Text { content, .. } => assert_eq!(content, "ab"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_interpolate_hits_endpoints_exactly() {
        let a = DrawableObject::line(Point2D::ORIGIN, Point2D::new(1.0, 1.0)).with_color(Color::RED);
        let b = DrawableObject::square(Point2D::new(3.0, 3.0), 0.5).with_color(Color::BLUE);
        let start = a.interpolate(&b, 0.0);
        assert_eq!(start.shape, a.shape);
        assert_eq!(start.style, a.style);

        let end = a.interpolate(&b, 1.0);
        assert_eq!(end.id, a.id);
        assert_eq!(end.shape, b.shape);
        assert_eq!(end.style, b.style);

        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.kind(), ObjectKind::Curve);
    }

    #[test]
    fn test_text_interpolation_switches_content_at_midpoint() {
        let a = DrawableObject::text("m = 0.9", Point2D::ORIGIN);
        let b = DrawableObject::text("m = 1.2", Point2D::new(0.0, 1.0));
        assert_eq!(a.interpolate(&b, 0.4).text_content(), Some("m = 0.9"));
        assert_eq!(a.interpolate(&b, 0.6).text_content(), Some("m = 1.2"));
    }

    #[test]
    fn test_resample_even_spacing() {
        let pts = [Point2D::new(0.0, 0.0), Point2D::new(3.0, 0.0), Point2D::new(3.0, 1.0)];
        let out = resample(&pts, 5);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[4], pts[2]);
        assert!((out[2].x - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_bounds_are_not_own() {
        let g = DrawableObject::group(vec![]);
        assert!(g.shape.bounds().is_none());
        let sq = DrawableObject::square(Point2D::new(1.0, 1.0), 2.0);
        let b = sq.shape.bounds().unwrap();
        assert_eq!(b.min, Point2D::ORIGIN);
        assert_eq!(b.max, Point2D::new(2.0, 2.0));
    }

    #[test]
    fn test_next_to_places_above() {
        let anchor = BoundingBox::around(Point2D::ORIGIN, 2.0, 2.0);
        let label = DrawableObject::text("x", Point2D::new(5.0, 5.0)).next_to(&anchor, Point2D::UP, 0.1);
        let b = label.shape.bounds().unwrap();
        assert!((b.min.y - 1.1).abs() < 1e-9);
        assert!(b.center().x.abs() < 1e-9);
    }
}
