//! Grid-sampled overlap between two triangles.
//!
//! Both triangles are enclosed in their shared bounding box, which is cut
//! into an `n × n` grid. Every cell center is tested against both
//! triangles and the ratios are computed from cell counts, so results are
//! approximations whose error shrinks with the cell size.

use crate::error::GeometryError;
use crate::point::Point;
use crate::triangle::point_in_triangle;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling density tier.
///
/// Precision trades accuracy for CPU time; it never changes what the
/// result means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 10 × 10 grid
    Normal,
    /// 100 × 100 grid
    #[default]
    High,
    /// 1000 × 1000 grid
    Extreme,
}

impl Precision {
    /// Number of cells along each side of the sampling grid.
    pub fn grid_size(self) -> usize {
        match self {
            Precision::Normal => 10,
            Precision::High => 100,
            Precision::Extreme => 1000,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Precision::Normal => "normal",
            Precision::High => "high",
            Precision::Extreme => "extreme",
        };
        f.write_str(name)
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Precision::Normal),
            "high" => Ok(Precision::High),
            "extreme" => Ok(Precision::Extreme),
            other => Err(format!(
                "Invalid precision: {other}. Must be one of: normal, high, extreme"
            )),
        }
    }
}

/// Result of sampling two triangles `a` and `b` over the same grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// `|a ∩ b| / |a|`, or `None` when no cell center fell inside `a`
    pub ratio_a: Option<f64>,
    /// `|a ∩ b| / |b|`, or `None` when no cell center fell inside `b`
    pub ratio_b: Option<f64>,
    /// Cells whose center lies inside `a`
    pub cells_a: usize,
    /// Cells whose center lies inside `b`
    pub cells_b: usize,
    /// Cells whose center lies inside both
    pub cells_both: usize,
}

impl Overlap {
    /// Every sampled cell of `a` is also inside `b`.
    pub fn a_covered(&self) -> bool {
        self.ratio_a == Some(1.0)
    }

    /// Every sampled cell of `b` is also inside `a`.
    pub fn b_covered(&self) -> bool {
        self.ratio_b == Some(1.0)
    }
}

#[derive(Clone, Copy, Default)]
struct CellCounts {
    a: usize,
    b: usize,
    both: usize,
}

impl std::ops::Add for CellCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            a: self.a + other.a,
            b: self.b + other.b,
            both: self.both + other.both,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Measures how much of each triangle is covered by the other.
///
/// # Arguments
///
/// * `a` - First triangle
/// * `b` - Second triangle
/// * `precision` - Grid density tier
///
/// # Returns
///
/// The sampled [`Overlap`], or [`GeometryError::DegenerateGeometry`] when
/// the shared bounding box has zero width or height, or when a coordinate
/// is not finite.
///
/// # Cost
///
/// `O(n²)` containment tests where `n` is [`Precision::grid_size`]. Rows
/// are sampled in parallel.
pub fn overlap_ratio(
    a: &[Point; 3],
    b: &[Point; 3],
    precision: Precision,
) -> Result<Overlap, GeometryError> {
    let points: Vec<Point> = a.iter().chain(b.iter()).copied().collect();

    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        return Err(GeometryError::DegenerateGeometry(format!(
            "non-finite coordinate ({}, {})",
            bad.lat, bad.lng
        )));
    }

    let min_x = points.iter().map(|p| p.lng).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.lng).fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.lat).fold(f64::NEG_INFINITY, f64::max);

    let width = max_x - min_x;
    let height = max_y - min_y;
    if width <= 0.0 || height <= 0.0 {
        return Err(GeometryError::DegenerateGeometry(format!(
            "bounding box has no area ({width} × {height})"
        )));
    }

    let n = precision.grid_size();
    let steps = n as f64;
    let half_cell_x = 0.5 * width / steps;
    let half_cell_y = 0.5 * height / steps;

    let counts = (0..n)
        .into_par_iter()
        .map(|row| {
            let center_lat = min_y + height * row as f64 / steps + half_cell_y;
            let mut counts = CellCounts::default();
            for column in 0..n {
                let center_lng = min_x + width * column as f64 / steps + half_cell_x;
                let center = Point::new(center_lat, center_lng);

                let in_a = point_in_triangle(a, center);
                let in_b = point_in_triangle(b, center);
                counts.a += in_a as usize;
                counts.b += in_b as usize;
                counts.both += (in_a && in_b) as usize;
            }
            counts
        })
        .reduce(CellCounts::default, |left, right| left + right);

    Ok(Overlap {
        ratio_a: ratio(counts.both, counts.a),
        ratio_b: ratio(counts.both, counts.b),
        cells_a: counts.a,
        cells_b: counts.b,
        cells_both: counts.both,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big() -> [Point; 3] {
        [Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 0.0)]
    }

    fn small_inside_big() -> [Point; 3] {
        [Point::new(1.0, 1.0), Point::new(3.0, 1.0), Point::new(1.0, 3.0)]
    }

    #[test]
    fn test_self_overlap_is_exact_at_high_precision() {
        let t = big();
        let overlap = overlap_ratio(&t, &t, Precision::High).unwrap();
        assert_eq!(overlap.ratio_a, Some(1.0));
        assert_eq!(overlap.ratio_b, Some(1.0));
        assert!(overlap.cells_a > 0);
    }

    #[test]
    fn test_self_overlap_at_normal_precision() {
        let t = [Point::new(48.85, 2.29), Point::new(48.87, 2.35), Point::new(48.84, 2.36)];
        let overlap = overlap_ratio(&t, &t, Precision::Normal).unwrap();
        assert!(overlap.ratio_a.unwrap() >= 0.95);
        assert!(overlap.ratio_b.unwrap() >= 0.95);
    }

    #[test]
    fn test_disjoint_triangles() {
        let far = [Point::new(50.0, 50.0), Point::new(50.0, 60.0), Point::new(60.0, 50.0)];
        let overlap = overlap_ratio(&big(), &far, Precision::High).unwrap();
        assert_eq!(overlap.ratio_a, Some(0.0));
        assert_eq!(overlap.ratio_b, Some(0.0));
        assert_eq!(overlap.cells_both, 0);
    }

    #[test]
    fn test_contained_triangle_is_fully_covered() {
        let overlap = overlap_ratio(&big(), &small_inside_big(), Precision::High).unwrap();
        assert!(overlap.b_covered());
        assert!(!overlap.a_covered());

        // Small is 2 / 50 of the big triangle's area
        let share = overlap.ratio_a.unwrap();
        assert!((share - 0.04).abs() < 0.01, "unexpected share {share}");
    }

    #[test]
    fn test_half_overlap() {
        let mirrored = [Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 10.0)];
        let overlap = overlap_ratio(&big(), &mirrored, Precision::High).unwrap();
        assert!((overlap.ratio_a.unwrap() - 0.5).abs() < 0.03);
        assert!((overlap.ratio_b.unwrap() - 0.5).abs() < 0.03);
    }

    #[test]
    fn test_point_triangle_never_covers() {
        let point = [Point::new(2.0, 2.0); 3];
        let overlap = overlap_ratio(&big(), &point, Precision::High).unwrap();
        assert!(!overlap.a_covered());
        assert_eq!(overlap.ratio_a, Some(0.0));
        assert_eq!(overlap.cells_b, 0);
        assert_eq!(overlap.ratio_b, None);
    }

    #[test]
    fn test_two_pin_segment_samples_no_cells() {
        let enclosing = [Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 10.0)];
        let segment = crate::Triangle::from_partial(&[
            Some(Point::new(0.0, 0.0)),
            None,
            Some(Point::new(1.0, 2.0)),
        ])
        .unwrap();

        let overlap = overlap_ratio(&enclosing, segment.vertices(), Precision::High).unwrap();
        assert!(overlap.cells_a > 0);
        assert_eq!(overlap.cells_b, 0);
        assert!(!overlap.b_covered());
    }

    #[test]
    fn test_flat_bounding_box_is_degenerate() {
        let a = [Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(0.0, 2.0)];
        let b = [Point::new(0.0, 3.0), Point::new(0.0, 4.0), Point::new(0.0, 5.0)];
        assert!(matches!(
            overlap_ratio(&a, &b, Precision::High),
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_non_finite_is_degenerate() {
        let mut b = small_inside_big();
        b[1].lat = f64::NAN;
        assert!(overlap_ratio(&big(), &b, Precision::Normal).is_err());
    }

    #[test]
    fn test_precision_parsing_and_grid() {
        assert_eq!("HIGH".parse::<Precision>().unwrap(), Precision::High);
        assert_eq!("extreme".parse::<Precision>().unwrap().grid_size(), 1000);
        assert!("ultra".parse::<Precision>().is_err());
        assert_eq!(Precision::default(), Precision::High);

        let json = serde_json::to_string(&Precision::Normal).unwrap();
        assert_eq!(json, "\"normal\"");
    }
}
