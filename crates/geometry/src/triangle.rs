//! Triangle containment via angular-sector inclusion.
//!
//! A point lies inside a triangle exactly when it lies inside the angular
//! sector spanned at two of its vertices. Each sector is bounded by the
//! bearings from the vertex to the other two vertices.

use crate::point::{angular_distance, bearing, Direction, Orientation, Point};
use std::f64::consts::PI;

/// Three vertices, in placement order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Point; 3],
}

impl Triangle {
    pub fn new(vertices: [Point; 3]) -> Self {
        Self { vertices }
    }

    /// Builds a triangle from partially placed pins.
    ///
    /// Every missing slot takes the last placed pin, so an incomplete set
    /// collapses into a point or a segment and covers no area. Returns `None`
    /// when no pin is placed at all.
    pub fn from_partial(slots: &[Option<Point>; 3]) -> Option<Self> {
        let last_known = slots.iter().flatten().last().copied()?;
        Some(Self {
            vertices: slots.map(|slot| slot.unwrap_or(last_known)),
        })
    }

    pub fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    /// Twice the signed area (shoelace formula on lng/lat).
    pub fn doubled_area(&self) -> f64 {
        let [a, b, c] = self.vertices;
        (b.lng - a.lng) * (c.lat - a.lat) - (c.lng - a.lng) * (b.lat - a.lat)
    }

    /// True for collinear or coincident vertices.
    pub fn is_degenerate(&self) -> bool {
        self.doubled_area() == 0.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_triangle(&self.vertices, point)
    }
}

impl From<[Point; 3]> for Triangle {
    fn from(vertices: [Point; 3]) -> Self {
        Self::new(vertices)
    }
}

/// Tests whether `point` falls inside the sector at `apex` bounded by the
/// rays towards `a` and `b`. The sector is always the minor arc, and it is
/// empty when either bound coincides with the apex.
fn within_sector(apex: Point, a: Point, b: Point, point: Point) -> bool {
    if apex == a || apex == b {
        return false;
    }

    let bound_a = bearing(apex, a, Orientation::Mathematical);
    let bound_b = bearing(apex, b, Orientation::Mathematical);

    let (mut start, mut end) = (bound_a.min(bound_b), bound_a.max(bound_b));
    if end - start > PI {
        std::mem::swap(&mut start, &mut end);
    }

    let target = bearing(apex, point, Orientation::Mathematical);
    angular_distance(start, target, Direction::Anticlockwise)
        < angular_distance(start, end, Direction::Anticlockwise)
}

/// Tests whether `point` lies inside `triangle`.
///
/// The check runs the sector test at the first and at the second vertex;
/// the point is inside only when both agree. The arc test is half open, so
/// points on the closing edge of a sector are outside. A triangle with two
/// coincident vertices contains nothing; other degenerate triangles get no
/// special treatment.
pub fn point_in_triangle(triangle: &[Point; 3], point: Point) -> bool {
    let [v0, v1, v2] = *triangle;
    within_sector(v0, v1, v2, point) && within_sector(v1, v2, v0, point)
}
