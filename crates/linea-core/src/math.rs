use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point (or offset) in scene units. The scene is centered on the origin
/// with +y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };
    pub const UP: Point2D = Point2D { x: 0.0, y: 1.0 };
    pub const DOWN: Point2D = Point2D { x: 0.0, y: -1.0 };
    pub const LEFT: Point2D = Point2D { x: -1.0, y: 0.0 };
    pub const RIGHT: Point2D = Point2D { x: 1.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points.
    pub fn lerp(&self, other: &Point2D, t: f64) -> Point2D {
        Point2D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;
    fn mul(self, rhs: f64) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point2D,
    pub max: Point2D,
}

impl BoundingBox {
    pub fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// A box centered on `center` with the given extent.
    pub fn around(center: Point2D, width: f64, height: f64) -> Self {
        let half = Point2D::new(width / 2.0, height / 2.0);
        Self::new(center - half, center + half)
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        points.into_iter().fold(None, |acc, p| {
            let single = BoundingBox::new(*p, *p);
            Some(match acc {
                Some(b) => b.union(&single),
                None => single,
            })
        })
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point2D::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2D::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn center(&self) -> Point2D {
        self.min.lerp(&self.max, 0.5)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lerp_and_ops() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(10.0, 20.0);
        assert_eq!(a.lerp(&b, 0.5), Point2D::new(5.0, 10.0));
        assert_eq!(b - a, b);
        assert_eq!(Point2D::UP * 2.0 + Point2D::LEFT, Point2D::new(-1.0, 2.0));
        assert!((Point2D::new(3.0, 4.0).distance(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_from_points_and_union() {
        let pts = [Point2D::new(1.0, -1.0), Point2D::new(-2.0, 3.0)];
        let bb = BoundingBox::from_points(&pts).unwrap();
        assert_eq!(bb.min, Point2D::new(-2.0, -1.0));
        assert_eq!(bb.max, Point2D::new(1.0, 3.0));
        assert!(BoundingBox::from_points(&[] as &[Point2D]).is_none());

        let other = BoundingBox::around(Point2D::new(5.0, 0.0), 2.0, 2.0);
        let u = bb.union(&other);
        assert_eq!(u.max.x, 6.0);
        assert_eq!(u.width(), 8.0);
        assert!(u.contains(&Point2D::new(5.5, 0.5)));
    }
}
